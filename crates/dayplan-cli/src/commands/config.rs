//! Configuration commands for CLI.

use clap::Subcommand;
use dayplan_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the current configuration
    Show,
    /// Set the default user id
    SetUser {
        /// User id used when commands omit --user
        user: String,
    },
    /// Set the fallback wake/sleep window
    SetWindow {
        /// Fallback wake time (HH:MM)
        #[arg(long)]
        wake: Option<String>,
        /// Fallback sleep time (HH:MM)
        #[arg(long)]
        sleep: Option<String>,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load_or_default();
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::SetUser { user } => {
            let mut config = Config::load_or_default();
            config.default_user = user;
            config.save()?;
            println!("default user updated");
        }
        ConfigAction::SetWindow { wake, sleep } => {
            let mut config = Config::load_or_default();
            if let Some(wake) = wake {
                config.wake_time = wake;
            }
            if let Some(sleep) = sleep {
                config.sleep_time = sleep;
            }
            config.save()?;
            println!("fallback window updated");
        }
    }
    Ok(())
}
