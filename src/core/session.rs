//! One form's selection lifecycle: create mode with an optional remembered
//! selection, or edit mode seeded from an existing entity.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::core::cascade::{CascadeController, CascadeState};
use crate::core::memento::{MementoMode, MementoStore, SelectionMemento};
use crate::core::relation_index::RelationIndex;
use crate::domain::{AreaId, BranchId, LineId};
use crate::errors::{CascadeError, Result};
use crate::storage::KeyValueStore;

/// Where the initial selection of a session came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOrigin {
    Fresh,
    Restored(SelectionMemento),
    Entity {
        branch: BranchId,
        line: LineId,
        area: AreaId,
    },
}

#[derive(Debug, Clone)]
pub struct SelectionSession {
    controller: CascadeController,
    origin: SelectionOrigin,
    locked: bool,
}

impl SelectionSession {
    /// Empty, editable create-mode session.
    pub fn fresh(index: Arc<RelationIndex>) -> Self {
        Self {
            controller: CascadeController::new(index),
            origin: SelectionOrigin::Fresh,
            locked: false,
        }
    }

    /// Create-mode session seeded from the remembered selection.
    ///
    /// A memento that no longer resolves is erased from the store and the
    /// session falls back to an empty, editable selection.
    pub fn restore<S: KeyValueStore>(
        index: Arc<RelationIndex>,
        mementos: &mut MementoStore<S>,
    ) -> Result<Self> {
        let Some(memento) = mementos.restore() else {
            return Ok(Self::fresh(index));
        };
        match memento.resolve(&index) {
            Ok(state) => {
                tracing::info!(branch = %memento.branch_name, line = %memento.line_name, "restored remembered selection");
                Ok(Self {
                    controller: CascadeController::with_state(index, state),
                    origin: SelectionOrigin::Restored(memento),
                    locked: true,
                })
            }
            Err(err) if err.is_stale() => {
                mementos.clear()?;
                Ok(Self::fresh(index))
            }
            Err(err) => Err(err),
        }
    }

    /// Edit-mode session; the entity's own identifiers are authoritative and
    /// the persisted memento is neither read nor written.
    pub fn for_entity(
        index: Arc<RelationIndex>,
        branch: BranchId,
        line: LineId,
        area: AreaId,
    ) -> Result<Self> {
        let controller = CascadeController::from_entity(index, branch, line, area)?;
        Ok(Self {
            controller,
            origin: SelectionOrigin::Entity { branch, line, area },
            locked: true,
        })
    }

    pub fn state(&self) -> &CascadeState {
        self.controller.state()
    }

    pub fn controller(&self) -> &CascadeController {
        &self.controller
    }

    pub fn origin(&self) -> &SelectionOrigin {
        &self.origin
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_edit_mode(&self) -> bool {
        matches!(self.origin, SelectionOrigin::Entity { .. })
    }

    pub fn mode(&self) -> MementoMode {
        if self.locked {
            MementoMode::Locked
        } else {
            MementoMode::Free
        }
    }

    /// Display snapshot of the current selection, if complete.
    pub fn memento(&self) -> Option<SelectionMemento> {
        SelectionMemento::from_state(self.controller.index(), self.state(), self.mode())
    }

    pub fn select_branch(&mut self, branch: BranchId) -> Result<&CascadeState> {
        self.ensure_editable()?;
        self.controller.set_branch(branch)
    }

    pub fn select_line(&mut self, line: LineId) -> Result<&CascadeState> {
        self.ensure_editable()?;
        self.controller.set_line(line)
    }

    pub fn select_area(&mut self, area: AreaId) -> Result<&CascadeState> {
        self.ensure_editable()?;
        self.controller.set_area(area)
    }

    /// Lets the user change a restored selection. Entity selections stay
    /// locked for the whole edit.
    pub fn unlock(&mut self) -> Result<()> {
        if self.is_edit_mode() {
            return Err(CascadeError::SelectionLocked);
        }
        self.locked = false;
        Ok(())
    }

    /// Clears a free selection; a locked one returns to its seeded values.
    pub fn reset(&mut self) {
        if !self.locked {
            self.controller.reset();
            return;
        }
        match self.seeded_state(self.controller.index()) {
            Ok(state) => {
                let index = Arc::clone(self.controller.index());
                self.controller = CascadeController::with_state(index, state);
            }
            Err(_) => self.fall_back_to_fresh(),
        }
    }

    /// Swaps in a rebuilt index. A locked selection that no longer resolves
    /// is dropped in favour of an empty, editable one.
    pub fn replace_index(&mut self, index: Arc<RelationIndex>) {
        if !self.locked {
            self.controller.replace_index(index);
            return;
        }
        match self.seeded_state(&index) {
            Ok(state) => self.controller = CascadeController::with_state(index, state),
            Err(_) => {
                self.controller = CascadeController::new(index);
                self.fall_back_to_fresh();
            }
        }
    }

    /// Remembers the current selection for later create-mode sessions.
    /// Returns `None` without touching the store while the selection is
    /// incomplete or when editing an existing entity.
    pub fn record_selection<S: KeyValueStore>(
        &self,
        mementos: &mut MementoStore<S>,
    ) -> Result<Option<SelectionMemento>> {
        if self.is_edit_mode() {
            return Ok(None);
        }
        let Some(memento) = SelectionMemento::from_state(
            self.controller.index(),
            self.state(),
            MementoMode::Free,
        ) else {
            return Ok(None);
        };
        mementos.capture_memento(&memento)?;
        Ok(Some(memento))
    }

    /// Called by the host after the dependent entity was created.
    pub fn complete_creation<S: KeyValueStore>(
        &mut self,
        mementos: &mut MementoStore<S>,
        config: &EngineConfig,
    ) -> Result<()> {
        if self.is_edit_mode() || !config.clear_memento_on_create {
            return Ok(());
        }
        mementos.clear()?;
        tracing::info!("remembered selection cleared after creation");
        Ok(())
    }

    fn ensure_editable(&self) -> Result<()> {
        if self.locked {
            Err(CascadeError::SelectionLocked)
        } else {
            Ok(())
        }
    }

    fn seeded_state(&self, index: &RelationIndex) -> Result<CascadeState> {
        match &self.origin {
            SelectionOrigin::Fresh => Ok(CascadeState::default()),
            SelectionOrigin::Restored(memento) => memento.resolve(index),
            SelectionOrigin::Entity { branch, line, area } => {
                CascadeState::from_ids(index, *branch, *line, *area)
            }
        }
    }

    fn fall_back_to_fresh(&mut self) {
        tracing::warn!(origin = ?self.origin, "seeded selection lost; falling back to empty selection");
        self.controller.reset();
        self.origin = SelectionOrigin::Fresh;
        self.locked = false;
    }
}
