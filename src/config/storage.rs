use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Persistent store location.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_db_root_dir")]
    pub db_root_dir: PathBuf,
}

fn default_db_root_dir() -> PathBuf {
    PathBuf::from("/tmp/tcoord/db")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_root_dir: default_db_root_dir(),
        }
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.db_root_dir.as_os_str().is_empty() {
            return Err(Error::InvalidConfig(
                "storage.db_root_dir path cannot be empty".into(),
            ));
        }
        Ok(())
    }
}
