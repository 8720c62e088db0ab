//! File operations

use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::errors::SeedError;

/// A file on local disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    path: PathBuf,
}

impl File {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final path component, used as the upload file name
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub async fn exists(&self) -> bool {
        fs::metadata(&self.path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    pub async fn read_string(&self) -> Result<String, SeedError> {
        Ok(fs::read_to_string(&self.path).await?)
    }

    pub async fn read_bytes(&self) -> Result<Vec<u8>, SeedError> {
        Ok(fs::read(&self.path).await?)
    }

    pub async fn read_json<T: DeserializeOwned>(&self) -> Result<T, SeedError> {
        let contents = self.read_string().await?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Serialize `value` and write it atomically
    pub async fn write_json<T: Serialize>(&self, value: &T) -> Result<(), SeedError> {
        let contents = serde_json::to_vec_pretty(value)?;
        self.write_atomic(&contents, None).await
    }

    /// Like `write_json`, but the file is owner read/write (0o600) from the
    /// moment it is created. Mode is ignored off Unix.
    pub async fn write_private_json<T: Serialize>(&self, value: &T) -> Result<(), SeedError> {
        let contents = serde_json::to_vec_pretty(value)?;
        self.write_atomic(&contents, Some(0o600)).await
    }

    /// Write through a sibling temp file and rename it over the target, so
    /// a crash never leaves a half-written file behind.
    pub async fn write_atomic(&self, contents: &[u8], mode: Option<u32>) -> Result<(), SeedError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = self
            .path
            .with_extension(format!("{}.tmp", uuid::Uuid::new_v4().simple()));

        let mut options = fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        if let Some(mode) = mode {
            options.mode(mode);
        }
        #[cfg(not(unix))]
        let _ = mode;

        let mut file = options.open(&temp_path).await?;
        file.write_all(contents).await?;
        file.sync_all().await?;
        drop(file);

        if let Err(e) = fs::rename(&temp_path, &self.path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        Ok(())
    }

    /// Move the file aside as `<name>.corrupt`, replacing an older one
    pub async fn quarantine(&self) -> Result<File, SeedError> {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".corrupt");
        let target = PathBuf::from(name);
        fs::rename(&self.path, &target).await?;
        Ok(File::new(target))
    }

    pub async fn delete(&self) -> Result<(), SeedError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_json_then_quarantine() {
        let dir = tempfile::tempdir().unwrap();
        let file = File::new(dir.path().join("nested").join("state.json"));

        file.write_json(&serde_json::json!({"a": 1})).await.unwrap();
        assert!(file.exists().await);
        let value: serde_json::Value = file.read_json().await.unwrap();
        assert_eq!(value["a"], 1);

        let moved = file.quarantine().await.unwrap();
        assert!(!file.exists().await);
        assert!(moved.exists().await);
        assert_eq!(moved.file_name(), "state.json.corrupt");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_private_json_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let file = File::new(dir.path().join("session.json"));
        file.write_private_json(&serde_json::json!({"token": "t"}))
            .await
            .unwrap();

        let mode = std::fs::metadata(file.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn test_delete_missing_file_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let file = File::new(dir.path().join("missing.json"));
        assert!(file.delete().await.is_ok());
    }
}
