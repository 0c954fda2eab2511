//! Row shapes for the dynamically sized mapping lists.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{ExpenseId, LineId};

/// Stable per-row key; survives reordering caused by removals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowKey(pub Uuid);

impl RowKey {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single reference phone number attached to a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceContact {
    pub key: RowKey,
    #[serde(rename = "reference_number")]
    pub value: String,
}

impl ReferenceContact {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            key: RowKey::generate(),
            value: value.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// Editable fields of a [`ReferenceContact`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceContactField {
    Value(String),
}

/// One line paired with the expense categories a user may book against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseMapping {
    pub key: RowKey,
    pub line_id: Option<LineId>,
    /// Set semantics: kept free of duplicates, insertion order preserved.
    pub expense_ids: Vec<ExpenseId>,
}

impl ExpenseMapping {
    pub fn new(line_id: Option<LineId>, expense_ids: impl IntoIterator<Item = ExpenseId>) -> Self {
        let mut mapping = Self {
            key: RowKey::generate(),
            line_id,
            expense_ids: Vec::new(),
        };
        mapping.set_expenses(expense_ids);
        mapping
    }

    pub fn set_expenses(&mut self, expense_ids: impl IntoIterator<Item = ExpenseId>) {
        self.expense_ids.clear();
        for id in expense_ids {
            if !self.expense_ids.contains(&id) {
                self.expense_ids.push(id);
            }
        }
    }

    /// Drops the line and every expense tied to it.
    pub fn clear_line(&mut self) {
        self.line_id = None;
        self.expense_ids.clear();
    }
}

/// Editable fields of an [`ExpenseMapping`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseMappingField {
    Line(Option<LineId>),
    Expenses(Vec<ExpenseId>),
}
