//! The advisory "logged in" flag.
//!
//! Set on sign-in, cleared on logout, on irrecoverable auth failure and when
//! the server reports the session as invalidated. It only gates UI; the real
//! session is the HTTP-only cookie held by the client's cookie jar.

use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// Storage for the session flag.
pub trait SessionStore: Debug + Send + Sync {
    /// Current value of the flag.
    fn is_logged_in(&self) -> bool;

    /// Record a successful sign-in.
    fn set_logged_in(&self);

    /// Forget the flag.
    fn clear(&self);
}

/// In-process flag. The default store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    flag: AtomicBool,
}

impl MemorySessionStore {
    /// New store with the flag cleared.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn is_logged_in(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    fn set_logged_in(&self) {
        self.flag.store(true, Ordering::Release);
    }

    fn clear(&self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Flag persisted as a small file, so it survives process restarts.
///
/// The file holds `true` while signed in and is removed on clear. I/O failures
/// are logged and treated as "not logged in"; the flag is advisory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Key under which the flag is recorded.
    pub const KEY: &'static str = "isLoggedIn";

    /// Store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, format!("{}=true\n", Self::KEY))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn is_logged_in(&self) -> bool {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents
                .lines()
                .filter_map(|line| line.split_once('='))
                .any(|(key, value)| key.trim() == Self::KEY && value.trim() == "true"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "failed to read session flag: {e}");
                false
            }
        }
    }

    fn set_logged_in(&self) {
        if let Err(e) = self.write() {
            tracing::warn!(path = %self.path.display(), "failed to persist session flag: {e}");
        }
    }

    fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "failed to clear session flag: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_toggles() {
        let store = MemorySessionStore::new();
        assert!(!store.is_logged_in());
        store.set_logged_in();
        assert!(store.is_logged_in());
        store.clear();
        assert!(!store.is_logged_in());
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session");

        let store = FileSessionStore::new(&path);
        assert!(!store.is_logged_in());
        store.set_logged_in();

        let reopened = FileSessionStore::new(&path);
        assert!(reopened.is_logged_in());

        reopened.clear();
        assert!(!store.is_logged_in());
        assert!(!path.exists());

        // Clearing twice is fine.
        reopened.clear();
    }

    #[cfg(unix)]
    #[test]
    fn file_store_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session"));
        store.set_logged_in();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn unrelated_file_contents_mean_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session");
        std::fs::write(&path, "isLoggedIn=false\n").unwrap();
        assert!(!FileSessionStore::new(&path).is_logged_in());
    }
}
