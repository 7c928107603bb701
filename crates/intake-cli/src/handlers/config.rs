//! Configuration command handlers

use crate::cli::{ConfigAction, ConfigArgs, ConfigFormat, ConfigInitArgs, ConfigShowArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use tracing::info;

/// Handle the config command
pub fn handle_config(args: ConfigArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    match args.action {
        ConfigAction::Init(init_args) => handle_config_init(init_args, output),
        ConfigAction::Show(show_args) => handle_config_show(show_args, config, output),
    }
}

/// Handle config init subcommand
fn handle_config_init(args: ConfigInitArgs, output: &mut OutputWriter) -> Result<()> {
    if args.path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {} (use --force to overwrite)",
            args.path.display()
        ))?;
        return Ok(());
    }

    Config::default().save(&args.path)?;
    info!("Wrote default configuration to {}", args.path.display());

    output.success(&format!("✓ Created config at {}", args.path.display()))?;
    output.info("Edit it to change the validator baseline, logging or output defaults.")?;
    Ok(())
}

/// Handle config show subcommand
fn handle_config_show(args: ConfigShowArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let content = match args.format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)
            .map_err(|e| Error::config(format!("Failed to serialize as JSON: {}", e)))?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)
            .map_err(|e| Error::config(format!("Failed to serialize as YAML: {}", e)))?,
    };

    output.write(&content)?;
    if !content.ends_with('\n') {
        output.writeln("")?;
    }
    Ok(())
}
