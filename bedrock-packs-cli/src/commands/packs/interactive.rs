//! Interactive menu for managing packs.
//!
//! The menus only collect choices; every change goes through a
//! [`ManageSession`] and the pack service.

use std::path::PathBuf;

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect, Select};

use bedrock_packs::inventory::{PackFilter, StatusFilter};
use bedrock_packs::orchestrator::{
    Confirmation, ManageSession, SelectionIntent, TransitionError,
};
use bedrock_packs::{ErrorKind, PackType};

use super::handlers::{format_entry, print_batch};
use super::traits::{Output, PackService};
use crate::error::CliError;

const MAIN_MENU: &[&str] = &[
    "Manage active packs",
    "Install from a folder or archive",
    "Scan the auto-install queue",
    "Delete packs",
    "Write report",
    "Quit",
];

const MANAGE_MENU: &[&str] = &["Choose active packs", "Change filter", "Back"];

/// Ask which server to work on when several were detected.
pub fn choose_server(roots: &[PathBuf]) -> Result<PathBuf, CliError> {
    let theme = ColorfulTheme::default();
    let items: Vec<String> = roots.iter().map(|r| r.display().to_string()).collect();

    println!("{}", style("Several servers detected:").green());
    let selection = Select::with_theme(&theme)
        .with_prompt("Server")
        .items(&items)
        .default(0)
        .interact()?;

    Ok(roots[selection].clone())
}

/// Run the main menu until the user quits.
pub fn run(packs: &dyn PackService, output: &dyn Output) -> Result<(), CliError> {
    let theme = ColorfulTheme::default();

    println!();
    println!(
        "{} {}",
        style("Server:").bold(),
        style(packs.server_root().display()).cyan()
    );
    println!(
        "{} {}",
        style("World:").bold(),
        style(packs.world_name()).cyan()
    );
    println!();

    loop {
        let choice = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(MAIN_MENU)
            .default(0)
            .interact()?;

        let result = match choice {
            0 => manage(packs, output, &theme),
            1 => install(packs, output, &theme),
            2 => scan(packs, output),
            3 => delete(packs, output, &theme),
            4 => packs
                .write_report()
                .map(|path| output.success(&format!("report written to {}", path.display())))
                .map_err(CliError::from),
            _ => return Ok(()),
        };

        if let Err(e) = result {
            if stops_menu(&e) {
                return Err(e);
            }
            output.error(&e.to_string());
        }
        output.newline();
    }
}

fn manage(
    packs: &dyn PackService,
    output: &dyn Output,
    theme: &ColorfulTheme,
) -> Result<(), CliError> {
    let mut session = ManageSession::new(packs.combined_view()?);

    loop {
        let candidates = session.candidates();
        output.header(&format!(
            "{} of {} pack(s) shown, {} active",
            candidates.len(),
            session.view().entries.len(),
            session.view().active_count()
        ));
        for entry in &candidates {
            output.indented(&format_entry(entry));
        }
        if !session.view().dangling.is_empty() {
            output.warning(&format!(
                "{} active reference(s) point to packs that are not installed",
                session.view().dangling.len()
            ));
        }
        output.newline();

        let choice = Select::with_theme(theme)
            .with_prompt("Manage")
            .items(MANAGE_MENU)
            .default(0)
            .interact()?;

        match choice {
            0 => {
                if candidates.is_empty() {
                    output.println("No packs to choose from.");
                    continue;
                }
                let labels: Vec<String> = candidates.iter().map(|v| format_entry(v)).collect();
                let defaults: Vec<bool> = candidates.iter().map(|v| v.active).collect();
                let ids: Vec<String> = candidates.iter().map(|v| v.pack.id.clone()).collect();

                session.begin_selection().map_err(session_error)?;
                let chosen = MultiSelect::with_theme(theme)
                    .with_prompt("Active packs (space to toggle, enter to accept)")
                    .items(&labels)
                    .defaults(&defaults)
                    .interact_opt()?;

                let Some(chosen) = chosen else {
                    session.cancel();
                    continue;
                };
                let selected: Vec<String> = chosen.into_iter().map(|i| ids[i].clone()).collect();

                let Some(intent) = session.select(&selected).map_err(session_error)? else {
                    output.println("Nothing changed.");
                    continue;
                };
                let prompt = describe_intent(intent);

                let answer = Confirm::with_theme(theme)
                    .with_prompt(prompt)
                    .default(true)
                    .interact()?;

                if let Some(intent) = session
                    .confirm(Confirmation::from_flag(answer))
                    .map_err(session_error)?
                {
                    for (pack_type, outcome) in packs.apply_selection(&intent)? {
                        output.success(&format!(
                            "{}: {} activated, {} deactivated",
                            pack_type,
                            outcome.added.len(),
                            outcome.removed.len()
                        ));
                    }
                    session
                        .finish(packs.combined_view()?)
                        .map_err(session_error)?;
                }
            }
            1 => {
                let filter = ask_filter(theme, session.filter())?;
                session.set_filter(filter).map_err(session_error)?;
            }
            _ => return Ok(()),
        }
    }
}

fn ask_filter(theme: &ColorfulTheme, current: &PackFilter) -> Result<PackFilter, CliError> {
    let types = ["All types", "Behavior packs", "Resource packs"];
    let type_default = match current.pack_type {
        None => 0,
        Some(PackType::Behavior) => 1,
        Some(PackType::Resource) => 2,
    };
    let pack_type = match Select::with_theme(theme)
        .with_prompt("Type")
        .items(&types)
        .default(type_default)
        .interact()?
    {
        1 => Some(PackType::Behavior),
        2 => Some(PackType::Resource),
        _ => None,
    };

    let statuses = [StatusFilter::All, StatusFilter::Active, StatusFilter::Inactive];
    let status_default = statuses
        .iter()
        .position(|s| *s == current.status)
        .unwrap_or(0);
    let status = statuses[Select::with_theme(theme)
        .with_prompt("Status")
        .items(&statuses)
        .default(status_default)
        .interact()?];

    let text: String = Input::with_theme(theme)
        .with_prompt("Name or id contains (empty for any)")
        .allow_empty(true)
        .with_initial_text(current.text.clone().unwrap_or_default())
        .interact_text()?;

    Ok(PackFilter::all()
        .with_type(pack_type)
        .with_status(status)
        .with_text(Some(text.as_str())))
}

fn install(
    packs: &dyn PackService,
    output: &dyn Output,
    theme: &ColorfulTheme,
) -> Result<(), CliError> {
    let path: String = Input::with_theme(theme)
        .with_prompt("Folder or archive to install")
        .interact_text()?;
    let path = PathBuf::from(path.trim());

    let batch = packs.install(&path, output.progress())?;
    print_batch(output, &batch);
    if batch.is_empty() {
        output.warning("no packs found");
    } else if batch.is_complete() {
        output.success(&format!(
            "{} installed, {} already present",
            batch.installed.len(),
            batch.already_installed.len()
        ));
    }
    Ok(())
}

fn scan(packs: &dyn PackService, output: &dyn Output) -> Result<(), CliError> {
    let summary = packs.auto_scan()?;
    for item in &summary.processed {
        output.println(&item.archive.display().to_string());
        print_batch(output, &item.batch);
    }
    for failure in &summary.failed {
        output.error(&format!(
            "{}: {} ({})",
            failure.archive.display(),
            failure.message,
            failure.kind
        ));
    }
    output.println(&format!(
        "{} processed, {} failed",
        summary.processed.len(),
        summary.failed.len()
    ));
    Ok(())
}

fn delete(
    packs: &dyn PackService,
    output: &dyn Output,
    theme: &ColorfulTheme,
) -> Result<(), CliError> {
    let view = packs.combined_view()?;
    if view.entries.is_empty() {
        output.println("No packs installed.");
        return Ok(());
    }

    let labels: Vec<String> = view.entries.iter().map(format_entry).collect();
    let chosen = MultiSelect::with_theme(theme)
        .with_prompt("Packs to delete (space to toggle, enter to accept)")
        .items(&labels)
        .interact_opt()?
        .unwrap_or_default();
    if chosen.is_empty() {
        return Ok(());
    }

    let ids: Vec<String> = chosen
        .into_iter()
        .map(|i| view.entries[i].pack.id.clone())
        .collect();
    let answer = Confirm::with_theme(theme)
        .with_prompt(format!(
            "{} {} pack(s)? This cannot be undone",
            style("Permanently delete").red().bold(),
            ids.len()
        ))
        .default(false)
        .interact()?;

    let summary = packs.delete(&ids, Confirmation::from_flag(answer))?;
    if summary.cancelled {
        output.println("Delete cancelled, nothing changed.");
        return Ok(());
    }
    for failure in &summary.failed {
        output.error(&format!("{}: {}", failure.pack.name, failure.error));
    }
    output.success(&format!("{} pack(s) deleted", summary.deleted.len()));
    Ok(())
}

/// Errors the menu cannot continue past: a broken terminal, or a world
/// whose activation files need fixing first.
fn stops_menu(error: &CliError) -> bool {
    match error {
        CliError::Manager(e) => e.kind() == ErrorKind::ActivationFileCorrupt,
        CliError::Prompt(_) => true,
        _ => false,
    }
}

/// Confirmation prompt for a pending selection.
fn describe_intent(intent: &SelectionIntent) -> String {
    format!(
        "Activate {} and deactivate {} pack(s)?",
        intent.activations(),
        intent.deactivations()
    )
}

fn session_error(e: TransitionError) -> CliError {
    CliError::Prompt(e.to_string())
}
