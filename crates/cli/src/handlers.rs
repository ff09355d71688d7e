//! Command handlers for nxsweep CLI

use anyhow::Result;
use clap::Command;
use clap_complete::{generate, Shell as ClapShell};
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use indicatif::{ProgressBar, ProgressStyle};
use nxsweep_core::{
    get_config_path, resolve_config, validate_config, Aggregate, DeleteEvent, Error, NexusClient,
    Overrides, PageLimit, PathFilter, Sweeper,
};
use serde::Serialize;
use std::io::IsTerminal;
use std::time::Duration;
use tabled::{Table, Tabled};

/// Output format for `list`
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per component, then totals
    Plain,
    /// Table with human-readable sizes
    Table,
    /// Single JSON document
    Json,
}

/// `config` subcommands
#[derive(clap::Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show the current configuration
    Show,
    /// Validate the configuration
    Validate,
    /// Print the config file location
    Path,
}

/// Resolve configuration and build the Nexus client
fn connect(overrides: Overrides) -> Result<(NexusClient, PageLimit)> {
    let config_path = get_config_path()?;

    let config = resolve_config(&config_path, overrides).map_err(|e| match e {
        Error::ConfigNotFound(path) => anyhow::anyhow!(
            "Configuration file not found: {}\n\
             Run 'nxsweep init' or pass --url and --user (or NEXUS_URL / NEXUS_USER).",
            path.display()
        ),
        other => other.into(),
    })?;
    validate_config(&config)?;

    let client = NexusClient::new(
        config.nexus.url.clone(),
        config.nexus.user.clone(),
        config.nexus.password.clone(),
        config.timeout(),
    )?;

    Ok((client, PageLimit::from_option(config.max_pages())))
}

/// Compile the optional path pattern before any request goes out
fn compile_filter(pattern: Option<&str>) -> Result<Option<PathFilter>> {
    Ok(pattern.map(PathFilter::new).transpose()?)
}

/// Spinner on stderr while a repository is walked
fn walk_spinner(repository: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(format!("Reading components of '{}'...", repository));
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

/// Handle list command
pub async fn handle_list(
    overrides: Overrides,
    repository: &str,
    pattern: Option<&str>,
    output: OutputFormat,
) -> Result<()> {
    let filter = compile_filter(pattern)?;
    let (client, limit) = connect(overrides)?;
    let sweeper = Sweeper::new(&client, limit);

    let pb = walk_spinner(repository)?;
    let report = match &filter {
        Some(filter) => sweeper.list_with_filter(repository, filter).await,
        None => sweeper.list(repository).await,
    };
    pb.finish_and_clear();
    let report = report?;

    match output {
        OutputFormat::Plain => print_plain(&report, filter.is_some()),
        OutputFormat::Table => print_table(&report, filter.is_some()),
        OutputFormat::Json => print_json(repository, pattern, &report)?,
    }

    Ok(())
}

fn print_plain(report: &Aggregate, filtered: bool) {
    for record in &report.matched {
        println!("{}  {:>15}  {}", record.id, record.file_size, record.path);
    }

    println!();
    println!();
    println!("Total components:  {}", report.total_count);
    if filtered {
        println!("Matches:           {}", report.match_count);
    }
    println!("Total size:        {}", report.matched_size);
    println!();
}

fn print_table(report: &Aggregate, filtered: bool) {
    if report.matched.is_empty() {
        println!("  No components found");
    } else {
        #[derive(Tabled)]
        struct ComponentRow {
            id: String,
            size: String,
            path: String,
        }

        let rows: Vec<ComponentRow> = report.matched.iter().map(|c| ComponentRow {
            id: c.id.clone(),
            size: format_bytes(c.file_size),
            path: c.path.clone(),
        }).collect();

        println!("{}", Table::new(rows));
    }

    println!();
    println!("Total components:  {}", report.total_count);
    if filtered {
        println!("Matches:           {}", report.match_count);
    }
    println!("Total size:        {} ({} bytes)", format_bytes(report.matched_size), report.matched_size);
}

fn print_json(repository: &str, pattern: Option<&str>, report: &Aggregate) -> Result<()> {
    #[derive(Serialize)]
    struct ListDocument<'a> {
        repository: &'a str,
        pattern: Option<&'a str>,
        total_count: usize,
        match_count: usize,
        total_size: u64,
        matched_size: u64,
        components: &'a [nxsweep_core::Component],
    }

    let document = ListDocument {
        repository,
        pattern,
        total_count: report.total_count,
        match_count: report.match_count,
        total_size: report.total_size,
        matched_size: report.matched_size,
        components: &report.matched,
    };

    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

/// Handle delete command
pub async fn handle_delete(
    overrides: Overrides,
    repository: &str,
    pattern: Option<&str>,
    yes: bool,
) -> Result<()> {
    let filter = compile_filter(pattern)?;
    let (client, limit) = connect(overrides)?;
    let sweeper = Sweeper::new(&client, limit);

    let pb = walk_spinner(repository)?;
    let plan = sweeper.plan(repository, filter.as_ref()).await;
    pb.finish_and_clear();
    let plan = plan?;

    if plan.matched.is_empty() {
        println!("  Nothing to delete in '{}'", repository);
        print_delete_totals(0, 0);
        return Ok(());
    }

    // dialoguer draws on stderr and reads stdin
    if should_confirm(yes, std::io::stdin().is_terminal(), console::Term::stderr().is_term()) {
        println!("⚠️  Warning: you are about to delete {} components ({}) from '{}'",
            plan.match_count,
            format_bytes(plan.matched_size),
            repository
        );
        println!("  This action is IRREVERSIBLE!");

        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Continue?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("❌ Deletion cancelled");
            return Ok(());
        }
    }

    println!("Deleting...");

    let summary = sweeper
        .delete_records(&plan.matched, |event| match event {
            DeleteEvent::Deleting { component, url } => {
                println!("Deleting [{}] -> {}", component.path, url);
            }
            DeleteEvent::Deleted { .. } => {}
            DeleteEvent::Failed { error, .. } => {
                println!("  {} {}", style("✗").red(), error);
            }
        })
        .await;

    print_delete_totals(summary.deleted, summary.deleted_size);

    if !summary.is_clean() {
        return Err(anyhow::anyhow!(
            "{} of {} deletions failed",
            summary.failures.len(),
            summary.attempted
        ));
    }

    Ok(())
}

/// Ask before deleting only when someone can answer
fn should_confirm(yes: bool, stdin_is_term: bool, stderr_is_term: bool) -> bool {
    !yes && stdin_is_term && stderr_is_term
}

fn print_delete_totals(deleted: usize, deleted_size: u64) {
    println!();
    println!();
    println!("Total deleted:  {}", deleted);
    println!("Total size:     {}", deleted_size);
    println!();
}

/// Handle config commands
pub async fn handle_config(action: ConfigAction, overrides: Overrides) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = resolve_config(&get_config_path()?, overrides)?;

            println!("Current configuration:");
            println!();
            println!("Nexus:");
            println!("  URL: {}", config.nexus.url);
            println!("  User: {}", config.nexus.user);
            println!("  Password: {}", mask(&config.nexus.password));
            println!();
            println!("Advanced:");
            println!("  Timeout: {}s", config.timeout().as_secs());
            println!(
                "  Max pages: {}",
                config.max_pages().map(|p| p.to_string()).unwrap_or_else(|| "unlimited".to_string())
            );

            Ok(())
        }
        ConfigAction::Validate => {
            println!("Validating configuration...");

            let config = resolve_config(&get_config_path()?, overrides)?;
            validate_config(&config)?;

            println!("  {} Valid configuration", style("✅").green());
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", get_config_path()?.display());
            Ok(())
        }
    }
}

/// Hide a secret, keeping only whether it is set
fn mask(secret: &str) -> &'static str {
    if secret.is_empty() {
        "(not set)"
    } else {
        "********"
    }
}

/// Format bytes to human-readable size
fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_index])
}

/// Handle shell completion generation
pub async fn handle_completion(shell: &str, cmd: &mut Command) -> Result<()> {
    use std::io;

    let clap_shell = match shell {
        "bash" => ClapShell::Bash,
        "zsh" => ClapShell::Zsh,
        "fish" => ClapShell::Fish,
        "elvish" => ClapShell::Elvish,
        "powershell" | "pwsh" => ClapShell::PowerShell,
        _ => {
            return Err(anyhow::anyhow!(
                "Unsupported shell: {}\nSupported shells: bash, zsh, fish, elvish, powershell",
                shell
            ));
        }
    };

    generate(clap_shell, cmd, "nxsweep", &mut io::stdout());

    Ok(())
}
