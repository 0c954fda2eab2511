use std::sync::Arc;

use dialoguer::{theme::ColorfulTheme, Confirm, Select};

use crate::core::{MementoStore, RelationIndex, SelectionSession};
use crate::domain::{Identifiable, NamedEntity};
use crate::storage::KeyValueStore;

use super::{render, CliError};

/// Interactive create-mode flow: reuse the remembered selection when it still
/// resolves, otherwise walk branch → line → area and remember the result.
pub fn run_select<S: KeyValueStore>(
    index: Arc<RelationIndex>,
    mementos: &mut MementoStore<S>,
) -> Result<(), CliError> {
    let theme = ColorfulTheme::default();
    let mut session = SelectionSession::restore(Arc::clone(&index), mementos)?;

    if let Some(memento) = session.memento().filter(|_| session.is_locked()) {
        println!("Remembered selection: {}", render::memento_line(&memento));
        let keep = Confirm::with_theme(&theme)
            .with_prompt("Keep it?")
            .default(true)
            .interact()?;
        if keep {
            return Ok(());
        }
        session.unlock()?;
    }

    if index.branches().is_empty() {
        println!("{}", render::warning("No branches available."));
        return Ok(());
    }
    let branch = pick(&theme, "Branch", index.branches())?;
    session.select_branch(branch)?;

    let lines = session.state().available_lines.clone();
    if lines.is_empty() {
        println!("{}", render::warning("Selected branch has no lines."));
        return Ok(());
    }
    let line = pick(&theme, "Line", &lines)?;
    session.select_line(line)?;

    let areas = session.state().available_areas.clone();
    if areas.is_empty() {
        println!("{}", render::warning("Selected line has no areas."));
        return Ok(());
    }
    let area = pick(&theme, "Area", &areas)?;
    session.select_area(area)?;

    println!("Selected: {}", render::state_summary(&index, session.state()));
    if let Some(memento) = session.record_selection(mementos)? {
        println!(
            "{}",
            render::notice(&format!("Remembered {}", render::memento_line(&memento)))
        );
    }
    Ok(())
}

fn pick<T: Identifiable + NamedEntity>(
    theme: &ColorfulTheme,
    prompt: &str,
    options: &[T],
) -> Result<T::Id, CliError> {
    let labels: Vec<&str> = options.iter().map(|option| option.name()).collect();
    let choice = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(options[choice].id())
}
