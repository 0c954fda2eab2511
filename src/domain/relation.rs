//! The flat branch/line/area join rows supplied by the host.

use serde::{Deserialize, Serialize};

use super::common::{AreaId, BranchId, Identifiable, LineId, NamedEntity, NamedOption};

/// One row of the denormalised area listing.
///
/// Field names follow the area endpoint payload, so a host can deserialize the
/// response body directly into `Vec<RelationRecord>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationRecord {
    #[serde(rename = "id", alias = "area_id")]
    pub area_id: AreaId,
    #[serde(rename = "areaName", alias = "area_name")]
    pub area_name: String,
    pub line_id: LineId,
    pub line_name: String,
    pub branch_id: BranchId,
    pub branch_name: String,
}

impl RelationRecord {
    pub fn new(
        branch: (u64, &str),
        line: (u64, &str),
        area: (u64, &str),
    ) -> Self {
        Self {
            area_id: AreaId(area.0),
            area_name: area.1.to_string(),
            line_id: LineId(line.0),
            line_name: line.1.to_string(),
            branch_id: BranchId(branch.0),
            branch_name: branch.1.to_string(),
        }
    }
}

/// A unique line together with the branch that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineEntry {
    pub id: LineId,
    pub name: String,
    pub branch_id: BranchId,
}

impl LineEntry {
    pub fn option(&self) -> NamedOption<LineId> {
        NamedOption::new(self.id, self.name.clone())
    }
}

/// A unique area together with its owning (branch, line) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaEntry {
    pub id: AreaId,
    pub name: String,
    pub branch_id: BranchId,
    pub line_id: LineId,
}

impl Identifiable for LineEntry {
    type Id = LineId;

    fn id(&self) -> LineId {
        self.id
    }
}

impl NamedEntity for LineEntry {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Identifiable for AreaEntry {
    type Id = AreaId;

    fn id(&self) -> AreaId {
        self.id
    }
}

impl NamedEntity for AreaEntry {
    fn name(&self) -> &str {
        &self.name
    }
}
