//! Unified path management for dreamlog data files.
//!
//! All on-device state lives under the platform config directory:
//!
//! ```text
//! <config dir>/dreamlog/
//! ├── entries.json    # journal entries, all users on the device
//! ├── profiles.json   # user profile records
//! ├── config.toml     # optional app configuration
//! └── secret.json     # API keys and secrets
//! ```
//!
//! Absence of any of these files is a valid first-run state.

use dreamlog_core::{DreamlogError, Result};
use std::path::PathBuf;

/// Unified path management for dreamlog.
pub struct DreamlogPaths;

impl DreamlogPaths {
    /// Returns the dreamlog configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to the config directory (e.g. `~/.config/dreamlog/`)
    /// - `Err(_)`: The platform config directory could not be determined
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("dreamlog"))
            .ok_or_else(|| DreamlogError::config("Cannot determine the platform config directory"))
    }

    /// Returns the path to the journal entries file.
    pub fn entries_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("entries.json"))
    }

    /// Returns the path to the user profiles file.
    pub fn profiles_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("profiles.json"))
    }

    /// Returns the path to the optional app configuration file.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Ensure this file has appropriate permissions (e.g., 600) to prevent
    /// unauthorized access.
    pub fn secret_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("secret.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_files_live_in_config_dir() {
        let config = DreamlogPaths::config_dir().unwrap();
        assert!(DreamlogPaths::entries_file().unwrap().starts_with(&config));
        assert!(DreamlogPaths::profiles_file().unwrap().starts_with(&config));
        assert!(DreamlogPaths::config_file().unwrap().starts_with(&config));
        assert!(DreamlogPaths::secret_file().unwrap().starts_with(&config));
    }

    #[test]
    fn test_file_names() {
        assert_eq!(
            DreamlogPaths::entries_file().unwrap().file_name().unwrap(),
            "entries.json"
        );
        assert_eq!(
            DreamlogPaths::profiles_file().unwrap().file_name().unwrap(),
            "profiles.json"
        );
    }
}
