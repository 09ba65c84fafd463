use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::models::Roster;

/// Key under which the whole roster is persisted.
pub const ROSTER_KEY: &str = "classroom_roster";

/// Whole-value key/value persistence. A `put` either replaces the value
/// completely or leaves the previous one in place.
#[allow(async_fn_in_trait)]
pub trait KeyValueBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Stores each key as `<dir>/<key>.json`.
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueBackend for FileBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        debug!(path = %path.display(), bytes = value.len(), "wrote roster file");
        Ok(())
    }
}

/// Loads and saves the roster through a backend, falling back to a default
/// roster when nothing usable is persisted.
pub struct RosterStore<B> {
    backend: B,
    default_roster: Roster,
}

impl<B: KeyValueBackend> RosterStore<B> {
    pub fn new(backend: B, default_roster: Roster) -> Self {
        Self {
            backend,
            default_roster,
        }
    }

    pub async fn load(&self) -> Result<Roster, StoreError> {
        let raw = self.backend.get(ROSTER_KEY).await?;
        let restored = match raw {
            None => {
                info!("no saved roster, initializing from defaults");
                None
            }
            Some(raw) => match decode(&raw) {
                Ok(roster) => Some(roster),
                Err(err) => {
                    warn!(error = %err, "discarding saved roster");
                    None
                }
            },
        };

        match restored {
            Some(roster) => {
                debug!(students = roster.len(), "restored roster");
                Ok(roster)
            }
            None => {
                let roster = self.default_roster.clone();
                self.save(&roster).await?;
                Ok(roster)
            }
        }
    }

    pub async fn save(&self, roster: &Roster) -> Result<(), StoreError> {
        let encoded = serde_json::to_string_pretty(roster)?;
        self.backend.put(ROSTER_KEY, &encoded).await
    }
}

fn decode(raw: &str) -> Result<Roster, StoreError> {
    let roster: Roster =
        serde_json::from_str(raw).map_err(|err| StoreError::Corrupt(err.to_string()))?;
    roster.check_consistency()?;
    Ok(roster)
}
