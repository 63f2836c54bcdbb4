use crate::session::SessionRecord;
use crate::store::SessionStore;
use directories::ProjectDirs;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Durable slot for the session store. One named slot, whole-store writes.
pub trait SessionStorage {
    /// Loads the persisted store. Absent or unreadable data yields an empty
    /// store; startup never fails on a bad slot.
    fn load(&self) -> SessionStore;
    /// Overwrites the slot with the full current store.
    fn save(&self, store: &SessionStore) -> io::Result<()>;
}

/// File-backed storage: a single JSON object keyed `"<week>_<slot>_<day>"`.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: Self::default_path().unwrap_or_else(|| PathBuf::from("mentorgrid_sessions.json")),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Prefer the XDG-style ~/.local/state directory, with ProjectDirs as
    /// the platform fallback.
    fn default_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("mentorgrid");
            Some(state_dir.join("sessions.json"))
        } else {
            ProjectDirs::from("", "", "mentorgrid")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("sessions.json"))
        }
    }
}

impl Default for FileSessionStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> SessionStore {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(map) = serde_json::from_slice::<BTreeMap<String, SessionRecord>>(&bytes) {
                return SessionStore::from_persisted(map);
            }
        }
        SessionStore::new()
    }

    fn save(&self, store: &SessionStore) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(&store.to_persisted()).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
