//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig, CONFIG_FILE_NAMES};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match ctx.config_path {
        Some(ref path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let config = &ctx.config;

    ctx.output.info("[api]");
    ctx.output.kv("base_url", &config.api.base_url);
    ctx.output.kv("user_id", &config.api.user_id);
    ctx.output.kv("timeout_secs", &config.api.timeout_secs.to_string());
    ctx.output.kv("offline", &config.api.offline.to_string());

    ctx.output.info("[store]");
    ctx.output.kv("currency", &config.store.currency);
    for coupon in &config.store.coupons {
        ctx.output.list_item(&format!("{} ({}% off)", coupon.code, coupon.percent_off));
    }

    if !config.payment.accounts.is_empty() {
        ctx.output.info("[payment]");
        for account in &config.payment.accounts {
            ctx.output.list_item(&format!(
                "{}: {} {}",
                account.method.display_name(),
                account.name,
                account.number
            ));
        }
    }

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_FILE_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    // Re-read the file so problems that env overrides would mask still show.
    let config = match ctx.config_path {
        Some(ref path) => CliConfig::load(&path.to_string_lossy())?,
        None => {
            ctx.output.warn("No config file found, checking defaults");
            ctx.config.clone()
        }
    };

    let (errors, warnings) = config.check();

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}
