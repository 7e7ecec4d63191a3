mod config;

pub use config::{ChimeConfig, Config, SessionConfig};

use std::path::PathBuf;

use crate::error::Result;

/// Returns the data directory, creating it if needed.
///
/// `MEDITIMER_HOME` overrides the location. Otherwise
/// `~/.config/meditimer[-dev]/` is used based on MEDITIMER_ENV; set
/// MEDITIMER_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("MEDITIMER_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env =
                std::env::var("MEDITIMER_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("meditimer-dev")
            } else {
                base_dir.join("meditimer")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
