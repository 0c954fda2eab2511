//! Free-text expense lookup support.
//!
//! The host performs the actual fetch. This module only decides when a
//! keystroke should fire a request and which response is allowed to land:
//! the newest request always wins, older responses are dropped on arrival.

use std::time::{Duration, Instant};

use strsim::jaro_winkler;

use crate::config::SearchSettings;
use crate::domain::{ExpenseId, NamedOption};

pub type ExpenseOption = NamedOption<ExpenseId>;

const FUZZY_THRESHOLD: f64 = 0.82;

/// Handle for one issued lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedSearch {
    pub ticket: SearchTicket,
    pub query: String,
}

/// Last-write-wins gate between issued lookups and their responses.
#[derive(Debug, Clone)]
pub struct SearchSequencer<T> {
    latest: u64,
    applied: Option<SearchTicket>,
    min_query_len: usize,
    results: Vec<T>,
}

impl<T> SearchSequencer<T> {
    pub fn new(settings: &SearchSettings) -> Self {
        Self {
            latest: 0,
            applied: None,
            min_query_len: settings.min_query_len.max(1),
            results: Vec::new(),
        }
    }

    /// Registers a new lookup. Blank or too-short queries clear the current
    /// results at once, supersede anything in flight and need no fetch.
    pub fn issue(&mut self, query: &str) -> Option<IssuedSearch> {
        self.latest += 1;
        let ticket = SearchTicket(self.latest);
        let query = query.trim();
        if query.chars().count() < self.min_query_len {
            self.results.clear();
            self.applied = Some(ticket);
            return None;
        }
        Some(IssuedSearch {
            ticket,
            query: query.to_string(),
        })
    }

    /// Applies a response if it belongs to the newest lookup. Returns whether
    /// the results were taken.
    pub fn accept(&mut self, ticket: SearchTicket, results: Vec<T>) -> bool {
        if ticket != SearchTicket(self.latest) {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.latest,
                "discarding superseded search results"
            );
            return false;
        }
        self.results = results;
        self.applied = Some(ticket);
        true
    }

    /// A failed newest lookup empties the list; failures of superseded ones
    /// are ignored like their results would have been.
    pub fn fail(&mut self, ticket: SearchTicket) -> bool {
        self.accept(ticket, Vec::new())
    }

    pub fn is_pending(&self) -> bool {
        self.applied != Some(SearchTicket(self.latest)) && self.latest > 0
    }

    pub fn results(&self) -> &[T] {
        &self.results
    }
}

/// Quiet-period gate for keystroke-driven lookups.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    last_input: Option<Instant>,
}

impl Debouncer {
    pub fn new(settings: &SearchSettings) -> Self {
        Self {
            quiet: Duration::from_millis(settings.debounce_ms),
            last_input: None,
        }
    }

    pub fn input(&mut self, now: Instant) {
        self.last_input = Some(now);
    }

    /// True once the quiet period has elapsed since the last input. Firing
    /// consumes the pending input.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.last_input {
            Some(last) if now.saturating_duration_since(last) >= self.quiet => {
                self.last_input = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.last_input.is_some()
    }
}

/// Locally held expense options with fuzzy filtering, for hosts that load the
/// catalogue once instead of querying per keystroke.
#[derive(Debug, Clone, Default)]
pub struct ExpenseCatalog {
    options: Vec<ExpenseOption>,
}

impl ExpenseCatalog {
    pub fn new(options: Vec<ExpenseOption>) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &[ExpenseOption] {
        &self.options
    }

    pub fn get(&self, id: ExpenseId) -> Option<&ExpenseOption> {
        self.options.iter().find(|option| option.id == id)
    }

    /// [`rank`](Self::rank) bounded by the configured query length and
    /// result count.
    pub fn search(&self, query: &str, settings: &SearchSettings) -> Vec<ExpenseOption> {
        if query.trim().chars().count() < settings.min_query_len.max(1) {
            return Vec::new();
        }
        self.rank(query, settings.max_results)
    }

    /// Substring matches first (earlier match position ranks higher), then
    /// close fuzzy matches by similarity. Ties keep catalogue order.
    pub fn rank(&self, query: &str, limit: usize) -> Vec<ExpenseOption> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let mut scored: Vec<(u8, f64, usize, &ExpenseOption)> = self
            .options
            .iter()
            .enumerate()
            .filter_map(|(order, option)| {
                let haystack = option.name.to_lowercase();
                if let Some(position) = haystack.find(&needle) {
                    return Some((0, -(position as f64), order, option));
                }
                let similarity = jaro_winkler(&needle, &haystack);
                (similarity >= FUZZY_THRESHOLD).then_some((1, similarity, order, option))
            })
            .collect();
        scored.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then(b.1.total_cmp(&a.1))
                .then(a.2.cmp(&b.2))
        });
        scored
            .into_iter()
            .take(limit)
            .map(|(_, _, _, option)| option.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SearchSettings {
        SearchSettings::default()
    }

    #[test]
    fn older_response_is_discarded_after_newer_issue() {
        let mut sequencer: SearchSequencer<&str> = SearchSequencer::new(&settings());
        let first = sequencer.issue("fu").unwrap();
        let second = sequencer.issue("fuel").unwrap();

        assert!(sequencer.accept(second.ticket, vec!["Fuel"]));
        assert!(!sequencer.accept(first.ticket, vec!["Furniture", "Fuel"]));
        assert_eq!(sequencer.results(), &["Fuel"]);
    }

    #[test]
    fn older_response_arriving_first_is_also_dropped() {
        let mut sequencer: SearchSequencer<&str> = SearchSequencer::new(&settings());
        let first = sequencer.issue("fu").unwrap();
        let second = sequencer.issue("fuel").unwrap();

        assert!(!sequencer.accept(first.ticket, vec!["Furniture"]));
        assert!(sequencer.is_pending());
        assert!(sequencer.results().is_empty());
        assert!(sequencer.accept(second.ticket, vec!["Fuel"]));
        assert!(!sequencer.is_pending());
    }

    #[test]
    fn empty_query_clears_and_supersedes_in_flight() {
        let mut sequencer: SearchSequencer<&str> = SearchSequencer::new(&settings());
        let issued = sequencer.issue("rent").unwrap();
        assert!(sequencer.accept(issued.ticket, vec!["Rent"]));

        let pending = sequencer.issue("tea").unwrap();
        assert!(sequencer.issue("   ").is_none());
        assert!(sequencer.results().is_empty());
        assert!(!sequencer.accept(pending.ticket, vec!["Tea"]));
        assert!(!sequencer.is_pending());
    }

    #[test]
    fn debouncer_waits_for_quiet_period() {
        let mut debouncer = Debouncer::new(&settings());
        let start = Instant::now();
        assert!(!debouncer.fire(start));

        debouncer.input(start);
        assert!(!debouncer.fire(start + Duration::from_millis(120)));
        debouncer.input(start + Duration::from_millis(200));
        assert!(!debouncer.fire(start + Duration::from_millis(400)));
        assert!(debouncer.fire(start + Duration::from_millis(500)));
        assert!(!debouncer.is_waiting());
    }

    #[test]
    fn catalog_ranks_substrings_before_fuzzy_matches() {
        let catalog = ExpenseCatalog::new(vec![
            ExpenseOption::new(ExpenseId(1), "Office Rent"),
            ExpenseOption::new(ExpenseId(2), "Rent"),
            ExpenseOption::new(ExpenseId(3), "Stationery"),
            ExpenseOption::new(ExpenseId(4), "Rnet"),
        ]);
        let ids: Vec<_> = catalog.rank("rent", 10).iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![ExpenseId(2), ExpenseId(1), ExpenseId(4)]);
        assert!(catalog.rank("  ", 10).is_empty());
        assert_eq!(catalog.rank("rent", 1).len(), 1);
    }

    #[test]
    fn catalog_search_honours_settings() {
        let catalog = ExpenseCatalog::new(
            (1..=30)
                .map(|id| ExpenseOption::new(ExpenseId(id), format!("Travel {id}")))
                .collect(),
        );
        assert_eq!(catalog.search("travel", &settings()).len(), 20);

        let narrow = SearchSettings {
            min_query_len: 3,
            max_results: 5,
            ..settings()
        };
        assert_eq!(catalog.search("travel", &narrow).len(), 5);
        assert!(catalog.search("tr", &narrow).is_empty());
    }
}
