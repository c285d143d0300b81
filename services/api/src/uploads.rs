//! Uploaded file storage.
//!
//! Images and videos land in a public uploads directory under a random
//! filename (original extension preserved) and rows reference them by that
//! filename. The file write and the row insert are not one transaction, so
//! callers run a compensating delete when the insert fails; removals of
//! files that are merely referenced (delete/replace flows) are best-effort
//! and never block the row operation.

use std::env;
use std::path::{Path, PathBuf};

use rand::RngCore;
use tokio::fs;
use tracing::warn;

const DEFAULT_UPLOAD_DIR: &str = "public/uploads";

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory from `UPLOADS_DIR` (default `public/uploads`), created if
    /// missing.
    pub fn from_env() -> anyhow::Result<Self> {
        let dir = env::var("UPLOADS_DIR").unwrap_or_else(|_| DEFAULT_UPLOAD_DIR.to_string());
        std::fs::create_dir_all(&dir)?;
        Ok(Self::new(dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Random 8-byte hex name keeping the original extension.
    pub fn generate_file_name(original: &str) -> String {
        let mut bytes = [0u8; 8];
        rand::thread_rng().fill_bytes(&mut bytes);
        let stem: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();

        match Path::new(original).extension().and_then(|e| e.to_str()) {
            Some(ext) if !ext.is_empty() => format!("{}.{}", stem, ext.to_lowercase()),
            _ => stem,
        }
    }

    /// Persist the bytes and return the stored filename.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> std::io::Result<String> {
        let file_name = Self::generate_file_name(original_name);
        fs::write(self.dir.join(&file_name), bytes).await?;
        Ok(file_name)
    }

    /// Best-effort removal. A missing physical file never blocks a database
    /// cleanup, so failures are logged and swallowed.
    pub async fn remove(&self, stored_name: &str) {
        let path = self.dir.join(stored_name);
        if let Err(e) = fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(file = %path.display(), "failed to remove uploaded file: {}", e);
            }
        }
    }

    pub async fn remove_all(&self, stored_names: &[String]) {
        for name in stored_names {
            self.remove(name).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_names_keep_the_extension_and_differ() {
        let a = UploadStore::generate_file_name("photo.JPG");
        let b = UploadStore::generate_file_name("photo.JPG");

        assert!(a.ends_with(".jpg"));
        assert!(b.ends_with(".jpg"));
        assert_ne!(a, b);
        assert_eq!(a.len(), 16 + 4); // 8 bytes hex + ".jpg"
    }

    #[test]
    fn extensionless_names_get_a_bare_stem() {
        let name = UploadStore::generate_file_name("README");
        assert_eq!(name.len(), 16);
        assert!(!name.contains('.'));
    }

    #[tokio::test]
    async fn save_and_remove_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = UploadStore::new(dir.path());

        let stored = store.save("plan.png", b"not-really-a-png").await.unwrap();
        assert!(dir.path().join(&stored).exists());

        store.remove(&stored).await;
        assert!(!dir.path().join(&stored).exists());

        // Removing again must be silent.
        store.remove(&stored).await;
    }
}
