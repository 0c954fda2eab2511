use std::fmt::Write;

use colored::Colorize;

use crate::core::{CascadeState, RelationIndex, SelectionMemento};
use crate::domain::Displayable;

/// Branch → line → area outline of the whole index.
pub fn render_tree(index: &RelationIndex) -> String {
    let mut out = String::new();
    if index.is_empty() {
        let _ = writeln!(out, "{}", "No branches available.".yellow());
        return out;
    }
    for branch in index.branches() {
        let _ = writeln!(out, "{}", branch.display_label().bold());
        for line in index.lines_for(branch.id) {
            let _ = writeln!(out, "  {}", line.display_label().cyan());
            let areas: Vec<String> = index
                .areas_for(branch.id, line.id)
                .iter()
                .map(|area| area.display_label())
                .collect();
            let _ = writeln!(out, "    {}", areas.join(", "));
        }
    }
    out
}

/// "Branch / Line / Area" for a remembered selection.
pub fn memento_line(memento: &SelectionMemento) -> String {
    let area = memento
        .area_name
        .clone()
        .unwrap_or_else(|| format!("#{}", memento.area_id));
    format!("{} / {} / {}", memento.branch_name, memento.line_name, area)
}

pub fn state_summary(index: &RelationIndex, state: &CascadeState) -> String {
    let branch = state
        .branch
        .and_then(|id| index.branch(id))
        .map_or("-".to_string(), |b| b.name.clone());
    let line = state
        .line
        .and_then(|id| state.available_lines.iter().find(|l| l.id == id))
        .map_or("-".to_string(), |l| l.name.clone());
    let area = state
        .area
        .and_then(|id| state.available_areas.iter().find(|a| a.id == id))
        .map_or("-".to_string(), |a| a.name.clone());
    format!("{branch} / {line} / {area}")
}

pub fn notice(message: &str) -> String {
    message.green().to_string()
}

pub fn warning(message: &str) -> String {
    message.yellow().to_string()
}
