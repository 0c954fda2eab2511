//! Remembered branch/line/area selection and its persistence.
//!
//! Names rather than identifiers are the durable key: the store outlives any
//! single fetch, and identifiers may differ between datasets. Names are mapped
//! back to identifiers against the current [`RelationIndex`] on restore.

use serde::Serialize;

use crate::config::StorageKeys;
use crate::core::cascade::CascadeState;
use crate::core::relation_index::RelationIndex;
use crate::domain::AreaId;
use crate::errors::{CascadeError, Result, StaleReason};
use crate::storage::KeyValueStore;

/// Whether a remembered selection may be edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MementoMode {
    /// Restored or entity-sourced; pickers are read-only.
    Locked,
    /// Freshly chosen by the user; still editable.
    Free,
}

/// Snapshot of a completed selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionMemento {
    pub branch_name: String,
    pub line_name: String,
    pub area_id: AreaId,
    pub area_name: Option<String>,
    pub mode: MementoMode,
}

impl SelectionMemento {
    /// A blank `area_name` is stored as `None`; restore reads it back the same way.
    pub fn new(
        branch_name: impl Into<String>,
        line_name: impl Into<String>,
        area_id: AreaId,
        area_name: impl Into<String>,
    ) -> Self {
        let area_name: String = area_name.into();
        Self {
            branch_name: branch_name.into(),
            line_name: line_name.into(),
            area_id,
            area_name: (!area_name.trim().is_empty()).then_some(area_name),
            mode: MementoMode::Free,
        }
    }

    pub fn locked(mut self) -> Self {
        self.mode = MementoMode::Locked;
        self
    }

    pub fn is_locked(&self) -> bool {
        self.mode == MementoMode::Locked
    }

    /// Describes a complete `state` by name; `None` while any level is unset.
    pub fn from_state(
        index: &RelationIndex,
        state: &CascadeState,
        mode: MementoMode,
    ) -> Option<Self> {
        let selection = state.selection()?;
        let branch = index.branch(selection.branch)?;
        let line = state
            .available_lines
            .iter()
            .find(|line| line.id == selection.line)?;
        let area = state
            .available_areas
            .iter()
            .find(|area| area.id == selection.area)?;
        Some(Self {
            branch_name: branch.name.clone(),
            line_name: line.name.clone(),
            area_id: area.id,
            area_name: Some(area.name.clone()),
            mode,
        })
    }

    /// Maps the stored names back to identifiers.
    ///
    /// The line is looked up only under the resolved branch, so a line of the
    /// same name under another branch is never picked up.
    pub fn resolve(&self, index: &RelationIndex) -> Result<CascadeState> {
        let outcome = self.resolve_inner(index);
        if let Err(err) = &outcome {
            tracing::warn!(
                branch = %self.branch_name,
                line = %self.line_name,
                area = %self.area_id,
                error = %err,
                "remembered selection is stale"
            );
        }
        outcome
    }

    fn resolve_inner(&self, index: &RelationIndex) -> Result<CascadeState> {
        let branch = index.find_branch_by_name(&self.branch_name).ok_or_else(|| {
            CascadeError::StaleSelection(StaleReason::BranchNotFound(self.branch_name.clone()))
        })?;
        let line = index
            .find_line_by_name(branch.id, &self.line_name)
            .ok_or_else(|| {
                CascadeError::StaleSelection(StaleReason::LineNotFound {
                    branch: self.branch_name.clone(),
                    line: self.line_name.clone(),
                })
            })?;
        if !index
            .areas_for(branch.id, line.id)
            .iter()
            .any(|area| area.id == self.area_id)
        {
            return Err(CascadeError::StaleSelection(StaleReason::AreaNotFound(
                self.area_id,
            )));
        }
        CascadeState::from_ids(index, branch.id, line.id, self.area_id)
    }
}

/// Reads and writes a [`SelectionMemento`] through a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct MementoStore<S> {
    store: S,
    keys: StorageKeys,
}

impl<S: KeyValueStore> MementoStore<S> {
    pub fn new(store: S, keys: StorageKeys) -> Self {
        Self { store, keys }
    }

    pub fn with_default_keys(store: S) -> Self {
        Self::new(store, StorageKeys::default())
    }

    /// Persists a selection, replacing any previous one.
    pub fn capture(
        &mut self,
        branch_name: &str,
        line_name: &str,
        area_id: AreaId,
        area_name: &str,
    ) -> Result<SelectionMemento> {
        let memento = SelectionMemento::new(branch_name, line_name, area_id, area_name);
        self.capture_memento(&memento)?;
        Ok(memento)
    }

    pub fn capture_memento(&mut self, memento: &SelectionMemento) -> Result<()> {
        // Optional key first, branch name last: a partial write never restores.
        self.clear()?;
        if let Some(area_name) = &memento.area_name {
            self.store.set(&self.keys.area_name, area_name)?;
        }
        self.store
            .set(&self.keys.area_id, &memento.area_id.to_string())?;
        self.store.set(&self.keys.line_name, &memento.line_name)?;
        self.store.set(&self.keys.branch_name, &memento.branch_name)?;
        tracing::info!(
            branch = %memento.branch_name,
            line = %memento.line_name,
            area = %memento.area_id,
            "selection remembered"
        );
        Ok(())
    }

    /// Returns the stored selection in locked mode, or `None` when any
    /// mandatory part is missing or unreadable.
    pub fn restore(&self) -> Option<SelectionMemento> {
        let branch_name = self.non_empty(&self.keys.branch_name);
        let line_name = self.non_empty(&self.keys.line_name);
        let raw_area = self.non_empty(&self.keys.area_id);

        let (Some(branch_name), Some(line_name), Some(raw_area)) = (branch_name, line_name, raw_area)
        else {
            tracing::debug!("no complete remembered selection");
            return None;
        };
        let area_id = match raw_area.trim().parse::<u64>() {
            Ok(value) => AreaId(value),
            Err(_) => {
                tracing::warn!(value = %raw_area, "remembered area id is not numeric");
                return None;
            }
        };
        Some(SelectionMemento {
            branch_name,
            line_name,
            area_id,
            area_name: self.non_empty(&self.keys.area_name),
            mode: MementoMode::Locked,
        })
    }

    pub fn clear(&mut self) -> Result<()> {
        self.store.remove(&self.keys.branch_name)?;
        self.store.remove(&self.keys.line_name)?;
        self.store.remove(&self.keys.area_id)?;
        self.store.remove(&self.keys.area_name)?;
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn non_empty(&self, key: &str) -> Option<String> {
        self.store.get(key).filter(|value| !value.trim().is_empty())
    }
}
