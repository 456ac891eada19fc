use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

const MIN_TOKEN_LEN: usize = 8;
// JWT access tokens run well past a kilobyte once claims are added
const MAX_TOKEN_LEN: usize = 4096;

/// Persists the session token in `~/.postboard/session`.
///
/// The file is written atomically and restricted to the owner (0600 on unix).
/// A missing, empty or corrupted file reads as "no session".
#[derive(Debug, Clone)]
pub struct SessionStore {
    file_path: PathBuf,
}

impl SessionStore {
    /// Store at the default location under the home directory
    pub fn new() -> Result<Self> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;
        Ok(Self::at(home_dir.join(".postboard").join("session")))
    }

    /// Store at an explicit path
    pub fn at(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Load the token, if a usable one is stored
    pub fn load(&self) -> Result<Option<String>> {
        if !self.file_path.exists() {
            return Ok(None);
        }

        let content = fs::read(&self.file_path).context("Failed to read session file")?;
        let content = String::from_utf8_lossy(&content);

        match validate_token(&content) {
            Some(token) => {
                log::debug!("Loaded session token from {}", self.file_path.display());
                Ok(Some(token.to_string()))
            }
            None => {
                log::warn!(
                    "Session file {} is empty or corrupted, treating as no session",
                    self.file_path.display()
                );
                Ok(None)
            }
        }
    }

    /// Save the token via a temporary file and rename
    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent).context("Failed to create .postboard directory")?;
        }

        let temp_path = self.file_path.with_extension("tmp");
        let mut file =
            fs::File::create(&temp_path).context("Failed to create temporary session file")?;
        file.write_all(token.as_bytes())
            .context("Failed to write session token")?;
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

        log::info!("Saved session token to {}", self.file_path.display());
        Ok(())
    }

    /// Remove the stored token; succeeds when there is nothing to remove
    pub fn delete(&self) -> Result<()> {
        if self.file_path.exists() {
            fs::remove_file(&self.file_path).context("Failed to delete session file")?;
            log::info!("Deleted session file at {}", self.file_path.display());
        }
        Ok(())
    }
}

fn validate_token(content: &str) -> Option<&str> {
    let token = content.trim();
    if token.len() < MIN_TOKEN_LEN || token.len() > MAX_TOKEN_LEN {
        return None;
    }
    if token.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return None;
    }
    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(temp_dir: &TempDir) -> SessionStore {
        SessionStore::at(temp_dir.path().join("session"))
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        store.save("eyJhbGciOiJIUzI1NiJ9.payload.sig").unwrap();
        assert_eq!(
            store.load().unwrap().as_deref(),
            Some("eyJhbGciOiJIUzI1NiJ9.payload.sig")
        );
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(store_in(&temp_dir).load().unwrap(), None);
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::at(temp_dir.path().join("nested").join("session"));

        store.save("token-123456").unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        store.save("token-123456").unwrap();
        store.delete().unwrap();
        assert!(!store.path().exists());
        store.delete().unwrap();
    }

    #[test]
    fn test_blank_and_short_tokens_are_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        fs::write(store.path(), "   \n\t ").unwrap();
        assert_eq!(store.load().unwrap(), None);

        fs::write(store.path(), "short").unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_binary_content_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        fs::write(store.path(), b"token\x00with\x01control").unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    #[cfg(unix)]
    fn test_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        store.save("token-123456").unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
