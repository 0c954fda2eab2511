mod common;

use std::sync::Arc;

use cascade_core::{
    core::{CascadeController, CascadeEvent, CascadeState, RelationIndex},
    domain::{AreaId, BranchId, LineId},
    errors::{CascadeError, SelectionLevel},
};
use common::{fixture_index, scenario_records};

fn names<Id>(options: &[cascade_core::domain::NamedOption<Id>]) -> Vec<&str> {
    options.iter().map(|o| o.name.as_str()).collect()
}

#[test]
fn scenario_branch_line_branch() {
    let index = Arc::new(RelationIndex::build(&scenario_records()));
    let mut controller = CascadeController::new(index);

    controller.set_branch(BranchId(1)).unwrap();
    assert_eq!(names(controller.available_lines()), vec!["L1", "L2"]);

    controller.set_line(LineId(10)).unwrap();
    assert_eq!(names(controller.available_areas()), vec!["X", "Y"]);

    controller.set_branch(BranchId(2)).unwrap();
    assert_eq!(controller.state().line, None);
    assert_eq!(controller.state().area, None);
    assert_eq!(names(controller.available_lines()), vec!["L3"]);
}

#[test]
fn same_line_name_under_two_branches_stays_separate() {
    let index = fixture_index();
    let mut controller = CascadeController::new(index);

    controller.set_branch(BranchId(1)).unwrap();
    assert!(controller.set_line(LineId(21)).is_err());
    controller.set_line(LineId(11)).unwrap();
    assert_eq!(names(controller.available_areas()), vec!["Market Road", "Harbour"]);

    controller.set_branch(BranchId(2)).unwrap();
    controller.set_line(LineId(21)).unwrap();
    assert_eq!(names(controller.available_areas()), vec!["Mill Lane", "Quay"]);
}

#[test]
fn transitions_are_pure() {
    let index = fixture_index();
    let start = CascadeState::default()
        .transition(&index, CascadeEvent::SelectBranch(BranchId(1)))
        .unwrap();
    let snapshot = start.clone();

    let next = start
        .transition(&index, CascadeEvent::SelectLine(LineId(12)))
        .unwrap();
    assert_eq!(start, snapshot);
    assert_eq!(next.line, Some(LineId(12)));

    let err = next
        .transition(&index, CascadeEvent::SelectArea(AreaId(201)))
        .unwrap_err();
    assert!(matches!(
        err,
        CascadeError::InvalidSelection { level: SelectionLevel::Area, .. }
    ));
}

#[test]
fn rebuilt_index_keeps_still_valid_selection() {
    let mut controller = CascadeController::new(fixture_index());
    controller.set_branch(BranchId(2)).unwrap();
    controller.set_line(LineId(21)).unwrap();
    controller.set_area(AreaId(202)).unwrap();

    let mut records = common::FIXTURE_RECORDS.to_vec();
    records.push(cascade_core::domain::RelationRecord::new(
        (2, "Riverside"),
        (21, "Morning"),
        (203, "Weir"),
    ));
    controller.replace_index(Arc::new(RelationIndex::build(&records)));

    assert_eq!(controller.state().area, Some(AreaId(202)));
    assert_eq!(
        names(controller.available_areas()),
        vec!["Mill Lane", "Quay", "Weir"]
    );
}
