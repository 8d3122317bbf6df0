//! Config subcommand handlers.

use dialoguer::Input;
use tabled::Tabled;

use hyperadmin_config::{self as config, Config, Profile};
use hyperadmin_core::config::DEFAULT_ENTRY_PATH;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "API URL")]
    api_url: String,
    #[tabled(rename = "Entry path")]
    entry_path: String,
}

#[derive(serde::Serialize)]
struct ProfileEntry<'a> {
    name: &'a str,
    default: bool,
    #[serde(flatten)]
    profile: &'a Profile,
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("hyperadmin -- configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let mut cfg = config::load_config_or_default();

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let api_url: String = Input::new()
                .with_prompt("Forum API URL")
                .default("http://localhost:5000".into())
                .interact_text()
                .map_err(prompt_err)?;
            api_url.parse::<url::Url>().map_err(|e| CliError::Validation {
                field: "api_url".into(),
                reason: format!("invalid URL '{api_url}': {e}"),
            })?;

            let entry_path: String = Input::new()
                .with_prompt("Users collection path")
                .default(DEFAULT_ENTRY_PATH.into())
                .interact_text()
                .map_err(prompt_err)?;

            cfg.profiles.insert(
                profile_name.clone(),
                Profile {
                    api_url,
                    entry_path,
                    timeout: None,
                    strict_relations: None,
                },
            );
            if cfg.profiles.len() == 1 {
                cfg.default_profile = Some(profile_name.clone());
            }
            config::save_config(&cfg)?;

            eprintln!("\n   Profile '{profile_name}' saved to {}", config_path.display());
            Ok(())
        }

        // ── Show: resolved configuration ────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = match global.output {
                OutputFormat::Json => serde_json::to_string_pretty(&cfg)?,
                OutputFormat::JsonCompact => serde_json::to_string(&cfg)?,
                OutputFormat::Table | OutputFormat::Plain => {
                    toml::to_string_pretty(&cfg).map_err(|e| CliError::Validation {
                        field: "config".into(),
                        reason: format!("failed to serialize config: {e}"),
                    })?
                }
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), false);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let entries = profile_entries(&cfg);
            let out = output::render_list(
                &global.output,
                &entries,
                |e| ProfileRow {
                    marker: if e.default { "*" } else { "" },
                    name: e.name.to_owned(),
                    api_url: e.profile.api_url.clone(),
                    entry_path: e.profile.entry_path.clone(),
                },
                |e| e.name.to_owned(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config()?;
            if !cfg.profiles.contains_key(&name) {
                let available = cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ");
                return Err(CliError::ProfileNotFound { name, available });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Default profile set to '{name}'");
            }
            Ok(())
        }
    }
}

fn profile_entries(cfg: &Config) -> Vec<ProfileEntry<'_>> {
    cfg.profiles
        .iter()
        .map(|(name, profile)| ProfileEntry {
            name,
            default: cfg.default_profile.as_deref() == Some(name.as_str()),
            profile,
        })
        .collect()
}
