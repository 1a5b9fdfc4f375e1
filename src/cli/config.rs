//! Configuration inspection commands.

use clap::Subcommand;

use crate::config::Config;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// List all settings and their effective values
    List {
        /// Show only settings matching this prefix (e.g., "llm", "agent")
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Get a specific setting value
    Get {
        /// Setting path (e.g., "agent.max_iterations")
        path: String,
    },
}

/// Run a config command against the resolved configuration.
pub fn run_config_command(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::List { filter } => {
            print!("{}", render_settings(config, filter.as_deref()));
            Ok(())
        }
        ConfigCommand::Get { path } => match config.get(&path) {
            Some(value) => {
                println!("{}", value);
                Ok(())
            }
            None => anyhow::bail!("Setting not found: {}", path),
        },
    }
}

/// Aligned `key  value` lines, optionally filtered by key prefix.
fn render_settings(config: &Config, filter: Option<&str>) -> String {
    let all = config.list();
    let max_key_len = all.iter().map(|(k, _)| k.len()).max().unwrap_or(0);

    let mut out = String::from("Settings:\n\n");
    for (key, value) in all {
        if let Some(f) = filter {
            if !key.starts_with(f) {
                continue;
            }
        }
        out.push_str(&format!("  {:width$}  {}\n", key, value, width = max_key_len));
    }
    out
}
