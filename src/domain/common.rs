use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    type Id: Copy + Eq;

    fn id(&self) -> Self::Id;
}

/// Provides access to a human-friendly entity name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Supplies a presentation-ready label for pickers or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

macro_rules! server_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

server_id!(
    /// Server-assigned branch identifier.
    BranchId
);
server_id!(
    /// Server-assigned line identifier. A line belongs to exactly one branch.
    LineId
);
server_id!(
    /// Server-assigned area identifier. An area belongs to one (branch, line) pair.
    AreaId
);
server_id!(
    /// Identifier of an expense category offered by the lookup service.
    ExpenseId
);

/// A selectable option: identifier plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedOption<Id> {
    pub id: Id,
    pub name: String,
}

impl<Id> NamedOption<Id> {
    pub fn new(id: Id, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl<Id: Copy + Eq> Identifiable for NamedOption<Id> {
    type Id = Id;

    fn id(&self) -> Id {
        self.id
    }
}

impl<Id> NamedEntity for NamedOption<Id> {
    fn name(&self) -> &str {
        &self.name
    }
}

impl<Id: fmt::Display> Displayable for NamedOption<Id> {
    fn display_label(&self) -> String {
        format!("{} (#{})", self.name, self.id)
    }
}
