//! Dependent branch → line → area selection state.
//!
//! Transitions are pure: [`CascadeState::transition`] returns the next state
//! for an event and leaves the current one untouched on failure. The host feeds
//! the resulting `available_*` lists into whatever pickers it renders.

use std::sync::Arc;

use serde::Serialize;

use crate::core::relation_index::RelationIndex;
use crate::domain::{AreaId, BranchId, LineId, NamedOption};
use crate::errors::{CascadeError, Result, SelectionLevel, StaleReason};

/// A user action against the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeEvent {
    SelectBranch(BranchId),
    SelectLine(LineId),
    SelectArea(AreaId),
    Reset,
}

/// Identifiers of a fully completed selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompleteSelection {
    pub branch: BranchId,
    pub line: LineId,
    pub area: AreaId,
}

/// Current selection plus the option lists derived from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeState {
    pub branch: Option<BranchId>,
    pub line: Option<LineId>,
    pub area: Option<AreaId>,
    pub available_lines: Vec<NamedOption<LineId>>,
    pub available_areas: Vec<NamedOption<AreaId>>,
}

impl CascadeState {
    pub fn transition(&self, index: &RelationIndex, event: CascadeEvent) -> Result<CascadeState> {
        let next = match event {
            CascadeEvent::SelectBranch(branch) => CascadeState {
                branch: Some(branch),
                line: None,
                area: None,
                available_lines: index.lines_for(branch).to_vec(),
                available_areas: Vec::new(),
            },
            CascadeEvent::SelectLine(line) => {
                let branch = match self.branch {
                    Some(branch) if contains(&self.available_lines, line) => branch,
                    _ => return Err(CascadeError::invalid(SelectionLevel::Line, line)),
                };
                CascadeState {
                    branch: Some(branch),
                    line: Some(line),
                    area: None,
                    available_lines: self.available_lines.clone(),
                    available_areas: index.areas_for(branch, line).to_vec(),
                }
            }
            CascadeEvent::SelectArea(area) => {
                if self.line.is_none() || !contains(&self.available_areas, area) {
                    return Err(CascadeError::invalid(SelectionLevel::Area, area));
                }
                CascadeState {
                    area: Some(area),
                    ..self.clone()
                }
            }
            CascadeEvent::Reset => CascadeState::default(),
        };
        tracing::debug!(?event, branch = ?next.branch, line = ?next.line, area = ?next.area, "cascade transition");
        Ok(next)
    }

    /// Recomputes derived lists against a rebuilt index, clearing any
    /// descendant that is no longer offered.
    pub fn reconcile(&self, index: &RelationIndex) -> CascadeState {
        let Some(branch) = self.branch else {
            return CascadeState::default();
        };
        let available_lines = index.lines_for(branch).to_vec();
        let line = self.line.filter(|line| contains(&available_lines, *line));
        let available_areas = line
            .map(|line| index.areas_for(branch, line).to_vec())
            .unwrap_or_default();
        let area = self.area.filter(|area| contains(&available_areas, *area));
        if line != self.line || area != self.area {
            tracing::debug!(
                %branch,
                dropped_line = line.is_none() && self.line.is_some(),
                dropped_area = area.is_none() && self.area.is_some(),
                "selection reconciled against rebuilt index"
            );
        }
        CascadeState {
            branch: Some(branch),
            line,
            area,
            available_lines,
            available_areas,
        }
    }

    /// Builds the state for a known triple of identifiers, as stored on an
    /// existing entity.
    pub fn from_ids(
        index: &RelationIndex,
        branch: BranchId,
        line: LineId,
        area: AreaId,
    ) -> Result<CascadeState> {
        let branch_name = index
            .branch(branch)
            .map(|b| b.name.clone())
            .ok_or_else(|| CascadeError::StaleSelection(StaleReason::BranchNotFound(branch.to_string())))?;
        let state = CascadeState::default().transition(index, CascadeEvent::SelectBranch(branch))?;
        let state = state
            .transition(index, CascadeEvent::SelectLine(line))
            .map_err(|_| {
                CascadeError::StaleSelection(StaleReason::LineNotFound {
                    branch: branch_name,
                    line: line.to_string(),
                })
            })?;
        state
            .transition(index, CascadeEvent::SelectArea(area))
            .map_err(|_| CascadeError::StaleSelection(StaleReason::AreaNotFound(area)))
    }

    pub fn selection(&self) -> Option<CompleteSelection> {
        Some(CompleteSelection {
            branch: self.branch?,
            line: self.line?,
            area: self.area?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.branch.is_none()
    }
}

fn contains<Id: PartialEq>(options: &[NamedOption<Id>], id: Id) -> bool {
    options.iter().any(|option| option.id == id)
}

/// Owns a [`CascadeState`] and the index it is evaluated against.
#[derive(Debug, Clone)]
pub struct CascadeController {
    index: Arc<RelationIndex>,
    state: CascadeState,
}

impl CascadeController {
    pub fn new(index: Arc<RelationIndex>) -> Self {
        Self {
            index,
            state: CascadeState::default(),
        }
    }

    /// Seeds the controller from an existing entity's stored identifiers.
    pub fn from_entity(
        index: Arc<RelationIndex>,
        branch: BranchId,
        line: LineId,
        area: AreaId,
    ) -> Result<Self> {
        let state = CascadeState::from_ids(&index, branch, line, area)?;
        Ok(Self { index, state })
    }

    pub(crate) fn with_state(index: Arc<RelationIndex>, state: CascadeState) -> Self {
        Self { index, state }
    }

    pub fn index(&self) -> &Arc<RelationIndex> {
        &self.index
    }

    pub fn state(&self) -> &CascadeState {
        &self.state
    }

    pub fn apply(&mut self, event: CascadeEvent) -> Result<&CascadeState> {
        match self.state.transition(&self.index, event) {
            Ok(next) => {
                self.state = next;
                Ok(&self.state)
            }
            Err(err) => {
                tracing::warn!(?event, error = %err, "rejected cascade event");
                Err(err)
            }
        }
    }

    pub fn set_branch(&mut self, branch: BranchId) -> Result<&CascadeState> {
        self.apply(CascadeEvent::SelectBranch(branch))
    }

    pub fn set_line(&mut self, line: LineId) -> Result<&CascadeState> {
        self.apply(CascadeEvent::SelectLine(line))
    }

    pub fn set_area(&mut self, area: AreaId) -> Result<&CascadeState> {
        self.apply(CascadeEvent::SelectArea(area))
    }

    pub fn reset(&mut self) {
        self.state = CascadeState::default();
    }

    /// Swaps in a rebuilt index and drops selections it no longer offers.
    pub fn replace_index(&mut self, index: Arc<RelationIndex>) {
        self.state = self.state.reconcile(&index);
        self.index = index;
    }

    pub fn available_lines(&self) -> &[NamedOption<LineId>] {
        &self.state.available_lines
    }

    pub fn available_areas(&self) -> &[NamedOption<AreaId>] {
        &self.state.available_areas
    }
}
