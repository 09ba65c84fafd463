use std::path::PathBuf;

use anyhow::Context;

/// Where the roster lives, resolved from CLI flags and the environment.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageConfig {
    File { data_dir: PathBuf },
    Postgres { database_url: String },
}

impl StorageConfig {
    pub fn resolve(data_dir: PathBuf, use_postgres: bool) -> anyhow::Result<Self> {
        if use_postgres {
            let database_url = std::env::var("DATABASE_URL")
                .context("DATABASE_URL must be set when --postgres is used")?;
            Ok(Self::Postgres { database_url })
        } else {
            Ok(Self::File { data_dir })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_is_the_default() {
        let config = StorageConfig::resolve(PathBuf::from("grades"), false).unwrap();
        assert_eq!(
            config,
            StorageConfig::File {
                data_dir: PathBuf::from("grades")
            }
        );
    }
}
