use crate::constants::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use crate::error::AppError;
use crate::storage::token_store::{TokenPair, TokenStore};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// Token store backed by a small JSON file, so a restarted process keeps its session.
///
/// The file holds a flat object with the two fixed keys used by the web
/// front-end's local storage (`edupredict.access`, `edupredict.refresh`).
/// Writes go through a temporary sibling file and a rename, so the file on
/// disk always holds either both values or neither.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Option<BTreeMap<String, String>>, AppError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<TokenPair> {
        let _guard = self.lock.lock();
        let entries = match self.read_entries() {
            Ok(Some(entries)) => entries,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read token file {}: {}", self.path.display(), e);
                return None;
            }
        };

        let access = entries.get(ACCESS_TOKEN_KEY)?;
        let refresh = entries.get(REFRESH_TOKEN_KEY)?;
        let pair = TokenPair::new(access.as_str(), refresh.as_str());
        pair.is_complete().then_some(pair)
    }

    fn set(&self, pair: &TokenPair) {
        if !pair.is_complete() {
            debug!("Refusing to store an incomplete token pair");
            return;
        }
        let _guard = self.lock.lock();
        let entries = BTreeMap::from([
            (ACCESS_TOKEN_KEY.to_string(), pair.access_token.clone()),
            (REFRESH_TOKEN_KEY.to_string(), pair.refresh_token.clone()),
        ]);
        if let Err(e) = self.write_entries(&entries) {
            error!("Failed to persist tokens to {}: {}", self.path.display(), e);
        }
    }

    fn clear(&self) {
        let _guard = self.lock.lock();
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed token file {}", self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => error!("Failed to remove token file {}: {}", self.path.display(), e),
        }
    }
}
