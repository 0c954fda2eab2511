#![doc(test(attr(deny(warnings))))]

//! Cascade Core derives dependent branch → line → area pickers from a flat
//! relation listing, remembers a chosen selection across sessions, and manages
//! the bounded mapping lists (reference contacts, line-to-expense mappings)
//! that hang off those pickers.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

pub use errors::{CascadeError, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Cascade Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
