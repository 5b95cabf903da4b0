use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Identity of the signed-in user as remembered between runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub email: String,
    pub session_token: String,
}

impl SessionData {
    /// Tokens outside 8..=256 chars or with control characters are treated as corrupted
    fn is_plausible(&self) -> bool {
        let token = self.session_token.trim();
        (8..=256).contains(&token.len())
            && !token.chars().any(char::is_control)
            && self.email.contains('@')
    }
}

/// Manages session storage in the user's home directory.
///
/// The session is stored in `~/.nomex/session.json` with 0600 permissions
/// so only the owner can read it.
#[derive(Debug, Clone)]
pub struct SessionStore {
    file_path: PathBuf,
}

impl SessionStore {
    /// Creates a store at the default path `~/.nomex/session.json`.
    pub fn new() -> Result<Self> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;
        Ok(Self {
            file_path: home_dir.join(".nomex").join("session.json"),
        })
    }

    pub fn with_path(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    /// Loads the stored session.
    ///
    /// - `Ok(Some(session))` if the file exists and holds a usable session
    /// - `Ok(None)` if there is no file, or its content is empty or corrupted
    /// - `Err(_)` if the file cannot be read
    pub fn load(&self) -> Result<Option<SessionData>> {
        if !self.file_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.file_path).context("Failed to read session file")?;
        if content.trim().is_empty() {
            log::warn!("Session file is empty, treating as no session");
            return Ok(None);
        }

        let session: SessionData = match serde_json::from_str(&content) {
            Ok(session) => session,
            Err(e) => {
                log::warn!("Session file is not valid JSON ({}), treating as corrupted", e);
                return Ok(None);
            }
        };

        if !session.is_plausible() {
            log::warn!("Session file holds an unusable session, treating as corrupted");
            return Ok(None);
        }

        log::debug!("Loaded session for {} from {}", session.email, self.file_path.display());
        Ok(Some(session))
    }

    /// Saves the session with an atomic write and 0600 permissions.
    pub fn save(&self, session: &SessionData) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent).context("Failed to create .nomex directory")?;
        }

        let json = serde_json::to_string_pretty(session).context("Failed to serialize session")?;

        let temp_path = self.file_path.with_extension("tmp");
        let mut file =
            fs::File::create(&temp_path).context("Failed to create temporary session file")?;
        file.write_all(json.as_bytes())
            .context("Failed to write session")?;
        file.sync_all()
            .context("Failed to sync session file to disk")?;
        drop(file);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&temp_path, fs::Permissions::from_mode(0o600))
                .context("Failed to set session file permissions")?;
        }

        fs::rename(&temp_path, &self.file_path)
            .context("Failed to rename temporary session file")?;

        log::info!("Saved session to {}", self.file_path.display());
        Ok(())
    }

    /// Deletes the session file. Succeeds if there is none.
    pub fn delete(&self) -> Result<()> {
        if self.file_path.exists() {
            fs::remove_file(&self.file_path).context("Failed to delete session file")?;
            log::info!("Deleted session file at {}", self.file_path.display());
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store(temp_dir: &TempDir) -> SessionStore {
        SessionStore::with_path(temp_dir.path().join("nested").join("session.json"))
    }

    fn sample() -> SessionData {
        SessionData {
            email: "ana@example.com".to_string(),
            session_token: "tok-1234567890".to_string(),
        }
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample()));
        assert!(!store.path().with_extension("tmp").exists());
    }

    #[test]
    fn test_load_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_delete() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        store.save(&sample()).unwrap();
        store.delete().unwrap();
        assert!(!store.path().exists());

        // Nothing left to delete is fine
        store.delete().unwrap();
    }

    #[test]
    fn test_corrupted_content_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::with_path(temp_dir.path().join("session.json"));

        fs::write(store.path(), "   \n").unwrap();
        assert_eq!(store.load().unwrap(), None);

        fs::write(store.path(), "not json at all").unwrap();
        assert_eq!(store.load().unwrap(), None);

        fs::write(
            store.path(),
            r#"{"email":"ana@example.com","sessionToken":"short"}"#,
        )
        .unwrap();
        assert_eq!(store.load().unwrap(), None);

        fs::write(
            store.path(),
            "{\"email\":\"ana@example.com\",\"sessionToken\":\"token\\u0000with\\u0001control\"}",
        )
        .unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    #[cfg(unix)]
    fn test_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);
        store.save(&sample()).unwrap();

        let permissions = fs::metadata(store.path()).unwrap().permissions();
        assert_eq!(permissions.mode() & 0o777, 0o600);
    }
}
