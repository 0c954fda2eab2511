//! Lookup structures derived from the flat branch/line/area listing.

use std::collections::{HashMap, HashSet};

use crate::domain::{
    AreaEntry, AreaId, BranchId, LineEntry, LineId, NamedOption, RelationRecord,
};

/// Read-only index over a set of [`RelationRecord`]s.
///
/// Every collection keeps first-seen order from the input. The index is rebuilt
/// wholesale whenever the source list changes and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct RelationIndex {
    branches: Vec<NamedOption<BranchId>>,
    lines: Vec<LineEntry>,
    areas: Vec<AreaEntry>,
    lines_by_branch: HashMap<BranchId, Vec<NamedOption<LineId>>>,
    areas_by_branch_line: HashMap<(BranchId, LineId), Vec<NamedOption<AreaId>>>,
    branch_pos: HashMap<BranchId, usize>,
    line_pos: HashMap<LineId, usize>,
    area_pos: HashMap<AreaId, usize>,
    record_count: usize,
}

impl RelationIndex {
    /// Builds the index in a single pass. An empty input yields an empty index.
    pub fn build(records: &[RelationRecord]) -> Self {
        let mut index = RelationIndex {
            record_count: records.len(),
            ..Default::default()
        };
        let mut branch_lines: HashSet<(BranchId, LineId)> = HashSet::new();
        let mut line_areas: HashSet<(BranchId, LineId, AreaId)> = HashSet::new();

        for record in records {
            if !index.branch_pos.contains_key(&record.branch_id) {
                index
                    .branch_pos
                    .insert(record.branch_id, index.branches.len());
                index
                    .branches
                    .push(NamedOption::new(record.branch_id, record.branch_name.clone()));
            }

            match index.line_pos.get(&record.line_id).copied() {
                Some(pos) if index.lines[pos].branch_id != record.branch_id => {
                    tracing::warn!(
                        line = %record.line_id,
                        first_branch = %index.lines[pos].branch_id,
                        other_branch = %record.branch_id,
                        "line appears under more than one branch"
                    );
                }
                Some(_) => {}
                None => {
                    index.line_pos.insert(record.line_id, index.lines.len());
                    index.lines.push(LineEntry {
                        id: record.line_id,
                        name: record.line_name.clone(),
                        branch_id: record.branch_id,
                    });
                }
            }

            if !index.area_pos.contains_key(&record.area_id) {
                index.area_pos.insert(record.area_id, index.areas.len());
                index.areas.push(AreaEntry {
                    id: record.area_id,
                    name: record.area_name.clone(),
                    branch_id: record.branch_id,
                    line_id: record.line_id,
                });
            }

            if branch_lines.insert((record.branch_id, record.line_id)) {
                index
                    .lines_by_branch
                    .entry(record.branch_id)
                    .or_default()
                    .push(NamedOption::new(record.line_id, record.line_name.clone()));
            }

            if line_areas.insert((record.branch_id, record.line_id, record.area_id)) {
                index
                    .areas_by_branch_line
                    .entry((record.branch_id, record.line_id))
                    .or_default()
                    .push(NamedOption::new(record.area_id, record.area_name.clone()));
            }
        }

        tracing::info!(
            records = index.record_count,
            branches = index.branches.len(),
            lines = index.lines.len(),
            areas = index.areas.len(),
            "relation index rebuilt"
        );
        index
    }

    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn branches(&self) -> &[NamedOption<BranchId>] {
        &self.branches
    }

    /// Every unique line across all branches.
    pub fn lines(&self) -> &[LineEntry] {
        &self.lines
    }

    /// Every unique area across all lines.
    pub fn areas(&self) -> &[AreaEntry] {
        &self.areas
    }

    pub fn branch(&self, id: BranchId) -> Option<&NamedOption<BranchId>> {
        self.branch_pos.get(&id).map(|&pos| &self.branches[pos])
    }

    pub fn line(&self, id: LineId) -> Option<&LineEntry> {
        self.line_pos.get(&id).map(|&pos| &self.lines[pos])
    }

    pub fn area(&self, id: AreaId) -> Option<&AreaEntry> {
        self.area_pos.get(&id).map(|&pos| &self.areas[pos])
    }

    /// Lines of `branch`; empty for an unknown branch.
    pub fn lines_for(&self, branch: BranchId) -> &[NamedOption<LineId>] {
        self.lines_by_branch
            .get(&branch)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Areas of the `(branch, line)` pair; empty when the pair is unknown.
    pub fn areas_for(&self, branch: BranchId, line: LineId) -> &[NamedOption<AreaId>] {
        self.areas_by_branch_line
            .get(&(branch, line))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Union of the lines of every listed branch, in branch order then
    /// first-seen line order, without duplicates.
    pub fn lines_for_branches(&self, branches: &[BranchId]) -> Vec<NamedOption<LineId>> {
        let mut seen = HashSet::new();
        let mut lines = Vec::new();
        for branch in branches {
            for line in self.lines_for(*branch) {
                if seen.insert(line.id) {
                    lines.push(line.clone());
                }
            }
        }
        lines
    }

    pub fn find_branch_by_name(&self, name: &str) -> Option<&NamedOption<BranchId>> {
        self.branches.iter().find(|branch| branch.name == name)
    }

    /// Looks a line up by name within one branch only, so equally named lines
    /// of other branches never match.
    pub fn find_line_by_name(&self, branch: BranchId, name: &str) -> Option<&NamedOption<LineId>> {
        self.lines_for(branch).iter().find(|line| line.name == name)
    }
}

impl From<&[RelationRecord]> for RelationIndex {
    fn from(records: &[RelationRecord]) -> Self {
        RelationIndex::build(records)
    }
}
