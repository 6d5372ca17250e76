//! Init command - creates a `.patrol.toml` with starter patterns.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context as _;
use console::style;
use dialoguer::Confirm;
use dialoguer::theme::ColorfulTheme;
use patrol_core::prelude::*;

use crate::CONFIG_FILENAME;
use crate::ui::{colors, format_duration, indicators, print_command_header, print_info};

/// Patterns written by `patrol init`: `(name, regex, description)`.
pub const STARTER_PATTERNS: &[(&str, &str, &str)] = &[
    (
        "eval-use",
        r"\beval\s*\(",
        "Use of eval() can execute arbitrary code",
    ),
    (
        "hardcoded-password",
        r#"(?i)password\s*[:=]\s*["'][^"']+["']"#,
        "Password literal assigned in source code",
    ),
    (
        "private-key",
        r"-----BEGIN (RSA |EC |DSA |OPENSSH )?PRIVATE KEY-----",
        "Private key material committed to the repository",
    ),
    (
        "inner-html",
        r"\.innerHTML\s*=",
        "Assignment to innerHTML can introduce cross-site scripting",
    ),
    (
        "shell-exec",
        r"\b(exec|execSync|spawn|system|popen)\s*\(",
        "Shell command execution may allow command injection",
    ),
];

/// Builds the starter configuration.
#[must_use]
pub fn starter_config() -> Config {
    Config {
        patterns: STARTER_PATTERNS
            .iter()
            .map(|(name, regex, description)| Pattern::new(*name, *regex, *description))
            .collect(),
        ..Config::default()
    }
}

/// Executes the `patrol init` command.
pub fn run(overwrite: bool, output_path: Option<PathBuf>) -> super::Result {
    print_command_header("init");

    let output_path = output_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

    if output_path.exists() && !overwrite && !confirm_overwrite(&output_path) {
        return Ok(());
    }

    let start = Instant::now();
    starter_config()
        .save(&output_path)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    print_results(&output_path, start.elapsed());
    Ok(())
}

fn confirm_overwrite(path: &Path) -> bool {
    println!(
        "{} {} already exists",
        colors::warning().apply_to(indicators::WARNING),
        style(path.display()).bold()
    );
    println!();

    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Overwrite?")
        .default(false)
        .interact()
        .unwrap_or(false);

    if !confirmed {
        println!(
            "  {}",
            colors::secondary().apply_to("pass --yes to overwrite without asking")
        );
        println!();
    }

    confirmed
}

fn print_results(config_path: &Path, elapsed: std::time::Duration) {
    println!(
        "{} {} {}",
        colors::success().apply_to(indicators::ADDED),
        style(config_path.display()).bold(),
        colors::muted().apply_to(format!("({})", format_duration(elapsed)))
    );
    println!();
    print_info(&format!(
        "{} starter patterns written. Run `patrol scan .` to scan your project",
        STARTER_PATTERNS.len()
    ));
}
