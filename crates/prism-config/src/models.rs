//! Model artifact store configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_root() -> PathBuf {
    PathBuf::from("models")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelsConfig {
    /// Directory scanned recursively for model and feature artifacts.
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
        }
    }
}
