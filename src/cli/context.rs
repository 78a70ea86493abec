use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::HarnessConfig;

use super::runtime::LoadedConfig;

pub struct CliContext {
    config: Arc<HarnessConfig>,
    config_path: PathBuf,
    from_file: bool,
}

impl CliContext {
    pub fn new(loaded: LoadedConfig) -> Self {
        let LoadedConfig {
            config,
            path,
            from_file,
        } = loaded;
        Self {
            config: Arc::new(config),
            config_path: path,
            from_file,
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        self.config.as_ref()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// False when running on defaults
    pub fn from_file(&self) -> bool {
        self.from_file
    }
}
