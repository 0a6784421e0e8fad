//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (`settings.toml`):
//!   Windows: %APPDATA%\spoofcheck\
//!   macOS:   ~/Library/Application Support/spoofcheck/
//!   Linux:   ~/.config/spoofcheck/
//!
//! Data dir (checkpoints and their hyperparameter files):
//!   Windows: %LOCALAPPDATA%\spoofcheck\
//!   macOS:   ~/Library/Application Support/spoofcheck/
//!   Linux:   ~/.local/share/spoofcheck/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Directory for model checkpoints.
    pub models_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "spoofcheck";

    /// File name of the default exported checkpoint.
    pub const CHECKPOINT_FILE: &'static str = "aasist.onnx";
    /// File name of the default hyperparameter file.
    pub const HYPERPARAMETERS_FILE: &'static str = "AASIST.conf";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let models_dir = data_dir.join("models");

        Self {
            config_dir,
            settings_file,
            models_dir,
        }
    }

    pub fn default_checkpoint(&self) -> PathBuf {
        self.models_dir.join(Self::CHECKPOINT_FILE)
    }

    pub fn default_hyperparameters(&self) -> PathBuf {
        self.models_dir.join(Self::HYPERPARAMETERS_FILE)
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
