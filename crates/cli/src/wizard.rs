//! Interactive setup wizard for nxsweep configuration

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password};
use indicatif::{ProgressBar, ProgressStyle};
use nxsweep_core::{save_config_to, validate_config, ConfigFile, NexusConfig};
use std::path::Path;

/// Run the interactive setup wizard
pub async fn run_init_wizard(config_path: &Path) -> Result<()> {
    println!("🚀 Welcome to nxsweep setup!\n");

    println!("This wizard will guide you through the configuration process.");
    println!("You will need:");
    println!("  1. The base URL of your Nexus server");
    println!("  2. A user allowed to browse and delete components");
    println!("  3. That user's password\n");

    if config_path.exists() {
        let overwrite = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("{} already exists. Overwrite it?", config_path.display()))
            .default(false)
            .interact()?;

        if !overwrite {
            println!("❌ Configuration cancelled");
            return Ok(());
        }
    }

    let url = prompt_url()?;
    let user = prompt_user()?;
    let password = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Password")
        .allow_empty_password(true)
        .interact()?;

    // Summary
    println!("\n📋 Configuration summary:");
    println!("  URL: {}", url);
    println!("  User: {}", user);
    println!("  File: {}", config_path.display());

    // Confirmation
    let confirm = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Save this configuration?")
        .default(false)
        .interact()?;

    if !confirm {
        println!("❌ Configuration cancelled");
        return Ok(());
    }

    let config = ConfigFile {
        nexus: NexusConfig { url, user, password },
        advanced: None,
        logging: None,
    };
    validate_config(&config)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.set_message("Saving configuration...");

    save_config_to(&config, config_path)?;

    pb.finish_with_message("✅ Configuration saved");
    println!();
    println!("Try it with: nxsweep list <repository>");

    Ok(())
}

/// Prompt for the Nexus base URL
fn prompt_url() -> Result<String> {
    let url: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Nexus URL")
        .default("http://localhost:8081".to_string())
        .validate_with(|input: &String| -> std::result::Result<(), &str> {
            if input.starts_with("http://") || input.starts_with("https://") {
                Ok(())
            } else {
                Err("URL must start with http:// or https://")
            }
        })
        .interact_text()
        .map_err(|e| anyhow::anyhow!("Failed to get Nexus URL: {}", e))?;

    Ok(url.trim_end_matches('/').to_string())
}

/// Prompt for the Nexus user
fn prompt_user() -> Result<String> {
    let user: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("User")
        .validate_with(|input: &String| -> std::result::Result<(), &str> {
            if input.trim().is_empty() {
                Err("User cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .map_err(|e| anyhow::anyhow!("Failed to get user: {}", e))?;

    Ok(user.trim().to_string())
}
