//! Patterns command - lists and edits the configured security patterns.

use anyhow::Context as _;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use patrol_core::pattern::{validate_description, validate_name, validate_regex};
use patrol_core::prelude::*;

use crate::scanning::config_path;
use crate::ui::{
    colors, indicators, pluralise_word, print_command_header, print_info, print_success, print_warning,
    truncate_with_ellipsis,
};
use crate::{PatternFields, PatternsArgs, PatternsCommand};

const NAME_WIDTH: usize = 28;
const DESCRIPTION_WIDTH: usize = 60;

type Store = PatternStore<TomlConfigStore>;

/// Executes `patrol patterns` and its subcommands.
pub fn run(args: PatternsArgs) -> super::Result {
    let path = config_path(args.config.as_deref());
    let mut store = Store::load(TomlConfigStore::new(path)).context("loading patterns")?;

    match args.command.unwrap_or(PatternsCommand::List { verbose: false }) {
        PatternsCommand::List { verbose } => {
            list(&store, verbose);
            Ok(())
        }
        PatternsCommand::Add(fields) => add(&mut store, fields),
        PatternsCommand::Edit { target, fields } => edit(&mut store, target, fields),
        PatternsCommand::Remove { target } => remove(&mut store, target),
    }
}

fn list(store: &Store, verbose: bool) {
    print_command_header("patterns");

    if store.is_empty() {
        print_info("No security patterns configured. Run `patrol patterns add` to create one.");
        return;
    }

    println!(
        "{}",
        colors::muted().apply_to(format!("{} {}", store.len(), pluralise_word(store.len(), "pattern", "patterns")))
    );
    println!();

    for pattern in store.list() {
        println!(
            "  {}  {}",
            colors::accent().apply_to(format!("{:<NAME_WIDTH$}", pattern.name)),
            colors::secondary().apply_to(truncate_with_ellipsis(&pattern.description, DESCRIPTION_WIDTH))
        );
        if verbose {
            println!(
                "  {:NAME_WIDTH$}  {}",
                "",
                colors::muted().apply_to(format!("/{}/", pattern.pattern))
            );
        }
    }

    println!();
}

fn add(store: &mut Store, fields: PatternFields) -> super::Result {
    let pattern = complete_fields(fields, None)?;
    let name = pattern.name.clone();

    store.add(pattern)?;

    print_success(&format!("Added security pattern: {name}"));
    Ok(())
}

fn edit(store: &mut Store, target: Option<String>, fields: PatternFields) -> super::Result {
    let target = match target {
        Some(name) => name,
        None => select_pattern(store, "Select pattern to edit")?,
    };

    let existing = store
        .get(&target)
        .cloned()
        .ok_or_else(|| StoreError::NotFound { name: target.clone() })?;

    let pattern = complete_fields(fields, Some(&existing))?;
    let name = pattern.name.clone();

    store.edit(&target, pattern)?;

    print_success(&format!("Updated security pattern: {name}"));
    Ok(())
}

fn remove(store: &mut Store, target: Option<String>) -> super::Result {
    let target = match target {
        Some(name) => name,
        None => select_pattern(store, "Select pattern to remove")?,
    };

    if store.remove(&target)? {
        println!(
            "{} {}",
            colors::error().apply_to(indicators::REMOVED),
            colors::secondary().apply_to(format!("Removed security pattern: {target}"))
        );
    } else {
        print_warning(&format!("No pattern named '{target}'; nothing removed"));
    }

    Ok(())
}

fn select_pattern(store: &Store, prompt: &str) -> anyhow::Result<String> {
    if store.is_empty() {
        anyhow::bail!("no security patterns configured");
    }

    let names: Vec<&str> = store.list().iter().map(|p| p.name.as_str()).collect();
    let idx = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(&names)
        .default(0)
        .interact()
        .context("pattern selection cancelled")?;

    Ok(names[idx].to_string())
}

/// Fills in any fields not given on the command line.
///
/// When editing with at least one flag set, missing fields keep their current
/// values. Otherwise each missing field is prompted for, pre-filled with the
/// current value when there is one.
fn complete_fields(fields: PatternFields, existing: Option<&Pattern>) -> anyhow::Result<Pattern> {
    let any_given = fields.name.is_some() || fields.regex.is_some() || fields.description.is_some();

    if let (Some(current), true) = (existing, any_given) {
        return Ok(Pattern::new(
            fields.name.unwrap_or_else(|| current.name.clone()),
            fields.regex.unwrap_or_else(|| current.pattern.clone()),
            fields.description.unwrap_or_else(|| current.description.clone()),
        ));
    }

    let name = match fields.name {
        Some(name) => name,
        None => prompt_name(existing.map(|p| p.name.as_str()))?,
    };
    let regex = match fields.regex {
        Some(regex) => regex,
        None => prompt_regex(&name, existing.map(|p| p.pattern.as_str()))?,
    };
    let description = match fields.description {
        Some(description) => description,
        None => prompt_description(&name, existing.map(|p| p.description.as_str()))?,
    };

    Ok(Pattern::new(name, regex, description))
}

fn prompt_name(initial: Option<&str>) -> anyhow::Result<String> {
    prompt("Enter pattern name", initial, |input: &String| {
        if validate_name(input).is_ok() { Ok(()) } else { Err("Pattern name is required") }
    })
}

fn prompt_regex(name: &str, initial: Option<&str>) -> anyhow::Result<String> {
    prompt("Enter regex pattern", initial, |input: &String| {
        if validate_regex(name, input).is_ok() { Ok(()) } else { Err("Invalid regex pattern") }
    })
}

fn prompt_description(name: &str, initial: Option<&str>) -> anyhow::Result<String> {
    prompt("Enter pattern description", initial, |input: &String| {
        if validate_description(name, input).is_ok() { Ok(()) } else { Err("Description is required") }
    })
}

fn prompt<V>(message: &str, initial: Option<&str>, validator: V) -> anyhow::Result<String>
where
    V: FnMut(&String) -> Result<(), &'static str>,
{
    let theme = ColorfulTheme::default();
    let mut input = Input::<String>::with_theme(&theme)
        .with_prompt(message)
        .allow_empty(true)
        .validate_with(validator);

    if let Some(initial) = initial {
        input = input.with_initial_text(initial);
    }

    input
        .interact_text()
        .context("prompt cancelled (pass --name, --regex and --description when not attached to a terminal)")
}
