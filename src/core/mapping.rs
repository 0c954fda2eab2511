//! Bounded, ordered lists of editable rows: reference contacts and
//! line-to-expense mappings.

use std::collections::HashSet;
use std::marker::PhantomData;

use serde::Serialize;

use crate::config::ListLimits;
use crate::domain::{
    ExpenseId, ExpenseMapping, ExpenseMappingField, LineId, ReferenceContact,
    ReferenceContactField, RowKey,
};
use crate::errors::{CascadeError, Result, RowError, RowErrorReason};

/// Row shape managed by a [`MappingListEditor`].
pub trait MappingRow: Clone {
    type Field;

    fn blank() -> Self;
    fn key(&self) -> RowKey;
    fn apply(&mut self, field: Self::Field);
}

/// Submission-time check over the whole list.
pub trait RowValidator<R> {
    type Output;

    fn validate(rows: &[R]) -> Result<Self::Output>;
}

impl MappingRow for ReferenceContact {
    type Field = ReferenceContactField;

    fn blank() -> Self {
        ReferenceContact::new("")
    }

    fn key(&self) -> RowKey {
        self.key
    }

    fn apply(&mut self, field: ReferenceContactField) {
        match field {
            ReferenceContactField::Value(value) => self.value = value,
        }
    }
}

impl MappingRow for ExpenseMapping {
    type Field = ExpenseMappingField;

    fn blank() -> Self {
        ExpenseMapping::new(None, Vec::<ExpenseId>::new())
    }

    fn key(&self) -> RowKey {
        self.key
    }

    fn apply(&mut self, field: ExpenseMappingField) {
        match field {
            ExpenseMappingField::Line(line) => self.line_id = line,
            ExpenseMappingField::Expenses(expenses) => self.set_expenses(expenses),
        }
    }
}

/// Blank reference contacts are skipped; they are never an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct DropBlankContacts;

impl RowValidator<ReferenceContact> for DropBlankContacts {
    type Output = Vec<String>;

    fn validate(rows: &[ReferenceContact]) -> Result<Vec<String>> {
        Ok(rows
            .iter()
            .filter(|row| !row.is_blank())
            .map(|row| row.value.trim().to_string())
            .collect())
    }
}

/// Every expense mapping needs a line and at least one expense; the list is
/// accepted or rejected as a whole.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequireCompleteMappings;

/// A validated line → expenses pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompleteMapping {
    pub line_id: LineId,
    pub expense_ids: Vec<ExpenseId>,
}

impl RowValidator<ExpenseMapping> for RequireCompleteMappings {
    type Output = Vec<CompleteMapping>;

    fn validate(rows: &[ExpenseMapping]) -> Result<Vec<CompleteMapping>> {
        let mut errors = Vec::new();
        let mut complete = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            if row.line_id.is_none() {
                errors.push(RowError {
                    index,
                    key: row.key,
                    reason: RowErrorReason::MissingLine,
                });
            }
            if row.expense_ids.is_empty() {
                errors.push(RowError {
                    index,
                    key: row.key,
                    reason: RowErrorReason::MissingValues,
                });
            }
            if let Some(line_id) = row.line_id {
                complete.push(CompleteMapping {
                    line_id,
                    expense_ids: row.expense_ids.clone(),
                });
            }
        }
        if errors.is_empty() {
            Ok(complete)
        } else {
            tracing::debug!(rows = rows.len(), errors = errors.len(), "mapping list rejected");
            Err(CascadeError::ValidationErrors(errors))
        }
    }
}

/// Ordered, bounded list of rows. Never holds fewer than
/// [`ListLimits::floor`] rows.
#[derive(Debug, Clone)]
pub struct MappingListEditor<R, V> {
    rows: Vec<R>,
    limits: ListLimits,
    _validator: PhantomData<V>,
}

pub type ReferenceContactList = MappingListEditor<ReferenceContact, DropBlankContacts>;
pub type ExpenseMappingList = MappingListEditor<ExpenseMapping, RequireCompleteMappings>;

impl<R: MappingRow, V: RowValidator<R>> MappingListEditor<R, V> {
    /// Starts with the minimum number of blank rows.
    pub fn new(limits: ListLimits) -> Self {
        Self {
            rows: (0..limits.floor()).map(|_| R::blank()).collect(),
            limits,
            _validator: PhantomData,
        }
    }

    /// Seeds the list with existing rows, padding with blanks up to the floor.
    /// Stored data above the maximum is kept as is; only `add` is refused.
    pub fn from_rows(rows: Vec<R>, limits: ListLimits) -> Self {
        if rows.len() > limits.max {
            tracing::warn!(rows = rows.len(), max = limits.max, "stored list exceeds the row maximum");
        }
        let mut editor = Self {
            rows,
            limits,
            _validator: PhantomData,
        };
        while editor.rows.len() < limits.floor() {
            editor.rows.push(R::blank());
        }
        editor
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn limits(&self) -> ListLimits {
        self.limits
    }

    pub fn can_add(&self) -> bool {
        self.rows.len() < self.limits.max
    }

    pub fn can_remove(&self) -> bool {
        self.rows.len() > self.limits.floor()
    }

    pub fn get(&self, key: RowKey) -> Option<&R> {
        self.rows.iter().find(|row| row.key() == key)
    }

    pub fn position(&self, key: RowKey) -> Option<usize> {
        self.rows.iter().position(|row| row.key() == key)
    }

    /// Appends a blank row and returns its key.
    pub fn add(&mut self) -> Result<RowKey> {
        if !self.can_add() {
            return Err(CascadeError::LimitReached {
                max: self.limits.max,
            });
        }
        let row = R::blank();
        let key = row.key();
        self.rows.push(row);
        Ok(key)
    }

    pub fn remove(&mut self, key: RowKey) -> Result<R> {
        let position = self.position(key).ok_or(CascadeError::RowNotFound(key))?;
        if !self.can_remove() {
            return Err(CascadeError::MinimumRequired {
                min: self.limits.floor(),
            });
        }
        Ok(self.rows.remove(position))
    }

    /// Replaces one field of one row; other rows are untouched.
    pub fn update(&mut self, key: RowKey, field: R::Field) -> Result<()> {
        let row = self
            .rows
            .iter_mut()
            .find(|row| row.key() == key)
            .ok_or(CascadeError::RowNotFound(key))?;
        row.apply(field);
        Ok(())
    }

    pub fn validate(&self) -> Result<V::Output> {
        V::validate(&self.rows)
    }

    /// Back to the initial blank state.
    pub fn clear(&mut self) {
        self.rows = (0..self.limits.floor()).map(|_| R::blank()).collect();
    }
}

/// Display label of a row ("Mapping 1", "Mapping 2", ...).
pub fn row_label(position: usize) -> String {
    format!("Mapping {}", position + 1)
}

impl ReferenceContactList {
    pub fn reference_contacts() -> Self {
        Self::new(ListLimits::reference_contacts())
    }

    /// Non-blank numbers ready for submission.
    pub fn submission(&self) -> Vec<String> {
        self.validate().unwrap_or_default()
    }
}

/// Payload shape expected by the user endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpenseSubmission {
    pub line_ids: Vec<LineId>,
    pub expense_ids: Vec<ExpenseId>,
}

impl ExpenseSubmission {
    pub fn from_mappings(mappings: &[CompleteMapping]) -> Self {
        let mut seen_lines = HashSet::new();
        let mut seen_expenses = HashSet::new();
        let mut submission = ExpenseSubmission::default();
        for mapping in mappings {
            if seen_lines.insert(mapping.line_id) {
                submission.line_ids.push(mapping.line_id);
            }
            for expense in &mapping.expense_ids {
                if seen_expenses.insert(*expense) {
                    submission.expense_ids.push(*expense);
                }
            }
        }
        submission
    }
}

impl ExpenseMappingList {
    pub fn expense_mappings() -> Self {
        Self::new(ListLimits::expense_mappings())
    }

    /// Rebuilds rows for an existing user: one row per allocated line, each
    /// carrying the full expense set. Expenses without allocations become a
    /// single line-less row; nothing at all yields one blank row.
    pub fn hydrate(
        line_allocations: &[LineId],
        expense_ids: &[ExpenseId],
        limits: ListLimits,
    ) -> Self {
        let mut seen = HashSet::new();
        let rows: Vec<ExpenseMapping> = if line_allocations.is_empty() {
            if expense_ids.is_empty() {
                Vec::new()
            } else {
                vec![ExpenseMapping::new(None, expense_ids.iter().copied())]
            }
        } else {
            line_allocations
                .iter()
                .filter(|line| seen.insert(**line))
                .map(|line| ExpenseMapping::new(Some(*line), expense_ids.iter().copied()))
                .collect()
        };
        Self::from_rows(rows, limits)
    }

    /// Clears the line and expenses of every row whose line is no longer
    /// offered. Rows are invalidated one by one, never as a list. Returns the
    /// number of rows cleared.
    pub fn retain_valid_lines(&mut self, valid: &[LineId]) -> usize {
        let mut cleared = 0;
        for row in &mut self.rows {
            if let Some(line) = row.line_id {
                if !valid.contains(&line) {
                    row.clear_line();
                    cleared += 1;
                }
            }
        }
        if cleared > 0 {
            tracing::debug!(cleared, "mapping rows lost their line");
        }
        cleared
    }

    /// Validated payload, or the row errors that block submission.
    pub fn submission(&self) -> Result<ExpenseSubmission> {
        let mappings = self.validate()?;
        Ok(ExpenseSubmission::from_mappings(&mappings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_list_starts_with_one_row_and_caps_at_five() {
        let mut list = ReferenceContactList::reference_contacts();
        assert_eq!(list.len(), 1);
        for _ in 0..4 {
            list.add().unwrap();
        }
        assert!(matches!(
            list.add(),
            Err(CascadeError::LimitReached { max: 5 })
        ));
        assert_eq!(list.len(), 5);
    }

    #[test]
    fn removing_last_row_is_refused() {
        let mut list = ReferenceContactList::reference_contacts();
        let only = list.rows()[0].key;
        assert!(matches!(
            list.remove(only),
            Err(CascadeError::MinimumRequired { min: 1 })
        ));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn remove_unknown_key_reports_row_not_found() {
        let mut list = ReferenceContactList::reference_contacts();
        list.add().unwrap();
        let stray = RowKey::generate();
        assert!(matches!(list.remove(stray), Err(CascadeError::RowNotFound(k)) if k == stray));
    }

    #[test]
    fn blank_contacts_are_dropped_at_submission() {
        let mut list = ReferenceContactList::reference_contacts();
        let first = list.rows()[0].key;
        let second = list.add().unwrap();
        list.add().unwrap();
        list.update(first, ReferenceContactField::Value(" 9876543210 ".into()))
            .unwrap();
        list.update(second, ReferenceContactField::Value("   ".into()))
            .unwrap();
        assert_eq!(list.submission(), vec!["9876543210".to_string()]);
    }

    #[test]
    fn update_touches_only_the_addressed_row() {
        let mut list = ExpenseMappingList::expense_mappings();
        let first = list.rows()[0].key;
        let second = list.add().unwrap();
        list.update(second, ExpenseMappingField::Line(Some(LineId(3))))
            .unwrap();
        assert_eq!(list.get(first).unwrap().line_id, None);
        assert_eq!(list.get(second).unwrap().line_id, Some(LineId(3)));
    }

    #[test]
    fn line_without_expenses_rejects_whole_list() {
        let mut list = ExpenseMappingList::expense_mappings();
        let first = list.rows()[0].key;
        list.update(first, ExpenseMappingField::Line(Some(LineId(1))))
            .unwrap();
        list.update(first, ExpenseMappingField::Expenses(vec![ExpenseId(5)]))
            .unwrap();
        let second = list.add().unwrap();
        list.update(second, ExpenseMappingField::Line(Some(LineId(2))))
            .unwrap();

        match list.validate() {
            Err(CascadeError::ValidationErrors(errors)) => {
                assert_eq!(
                    errors,
                    vec![RowError {
                        index: 1,
                        key: second,
                        reason: RowErrorReason::MissingValues,
                    }]
                );
            }
            other => panic!("expected validation errors, got {other:?}"),
        }
    }

    #[test]
    fn blank_row_reports_both_missing_parts() {
        let list = ExpenseMappingList::expense_mappings();
        let Err(CascadeError::ValidationErrors(errors)) = list.validate() else {
            panic!("blank row must not validate");
        };
        let reasons: Vec<_> = errors.iter().map(|e| e.reason).collect();
        assert_eq!(
            reasons,
            vec![RowErrorReason::MissingLine, RowErrorReason::MissingValues]
        );
        assert!(errors.iter().all(|e| e.index == 0));
    }

    #[test]
    fn submission_deduplicates_lines_and_expenses() {
        let rows = vec![
            ExpenseMapping::new(Some(LineId(1)), [ExpenseId(7), ExpenseId(8)]),
            ExpenseMapping::new(Some(LineId(2)), [ExpenseId(8), ExpenseId(9)]),
            ExpenseMapping::new(Some(LineId(1)), [ExpenseId(7)]),
        ];
        let list = ExpenseMappingList::from_rows(rows, ListLimits::expense_mappings());
        let submission = list.submission().unwrap();
        assert_eq!(submission.line_ids, vec![LineId(1), LineId(2)]);
        assert_eq!(
            submission.expense_ids,
            vec![ExpenseId(7), ExpenseId(8), ExpenseId(9)]
        );
    }

    #[test]
    fn invalidated_line_clears_only_that_row() {
        let rows = vec![
            ExpenseMapping::new(Some(LineId(1)), [ExpenseId(7)]),
            ExpenseMapping::new(Some(LineId(2)), [ExpenseId(8)]),
        ];
        let mut list = ExpenseMappingList::from_rows(rows, ListLimits::expense_mappings());
        assert_eq!(list.retain_valid_lines(&[LineId(2)]), 1);
        assert_eq!(list.len(), 2);
        assert_eq!(list.rows()[0].line_id, None);
        assert!(list.rows()[0].expense_ids.is_empty());
        assert_eq!(list.rows()[1].line_id, Some(LineId(2)));
    }

    #[test]
    fn hydrate_builds_one_row_per_allocated_line() {
        let list = ExpenseMappingList::hydrate(
            &[LineId(4), LineId(5), LineId(4)],
            &[ExpenseId(1), ExpenseId(2)],
            ListLimits::expense_mappings(),
        );
        assert_eq!(list.len(), 2);
        assert!(list
            .rows()
            .iter()
            .all(|row| row.expense_ids == vec![ExpenseId(1), ExpenseId(2)]));

        let expenses_only =
            ExpenseMappingList::hydrate(&[], &[ExpenseId(3)], ListLimits::expense_mappings());
        assert_eq!(expenses_only.rows()[0].line_id, None);

        let empty = ExpenseMappingList::hydrate(&[], &[], ListLimits::expense_mappings());
        assert_eq!(empty.len(), 1);
        assert!(empty.rows()[0].expense_ids.is_empty());
    }

    #[test]
    fn stored_rows_above_maximum_load_but_block_add() {
        let rows = (0..6).map(|n| ReferenceContact::new(format!("90000000{n:02}"))).collect();
        let mut list = ReferenceContactList::from_rows(rows, ListLimits::reference_contacts());
        assert_eq!(list.len(), 6);
        assert!(!list.can_add());
        assert!(matches!(list.add(), Err(CascadeError::LimitReached { max: 5 })));
        assert_eq!(list.submission().len(), 6);
    }

    #[test]
    fn hydrating_more_lines_than_maximum_keeps_every_line() {
        let lines: Vec<LineId> = (1..=11).map(LineId).collect();
        let mut list =
            ExpenseMappingList::hydrate(&lines, &[ExpenseId(1)], ListLimits::expense_mappings());
        assert_eq!(list.len(), 11);
        assert!(matches!(list.add(), Err(CascadeError::LimitReached { max: 10 })));

        let first = list.rows()[0].key;
        list.remove(first).unwrap();
        assert_eq!(list.len(), 10);
        assert_eq!(list.submission().unwrap().line_ids.len(), 10);
    }

    #[test]
    fn labels_are_one_based() {
        assert_eq!(row_label(0), "Mapping 1");
        assert_eq!(row_label(4), "Mapping 5");
    }
}
