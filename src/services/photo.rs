use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::config::UploadConfig;
use crate::constants::PHOTO_EXTENSIONS;
use crate::constants::limits::{MAX_FILENAME_LEN, PHOTO_NAME_ATTEMPTS};

#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("Photo exceeds the maximum size of {max_bytes} bytes")]
    TooLarge { max_bytes: usize },

    #[error("Unsupported photo type: {0}")]
    UnsupportedType(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl PhotoError {
    /// Whether the upload was rejected for its content rather than failing
    /// to write.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::TooLarge { .. } | Self::UnsupportedType(_))
    }
}

/// Writes profile photos into the public upload directory.
pub struct PhotoStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl PhotoStore {
    #[must_use]
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            dir: PathBuf::from(&config.photo_dir),
            max_bytes: config.max_photo_bytes,
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Checks type and size without touching the filesystem.
    pub fn check(&self, original_name: &str, len: usize) -> Result<(), PhotoError> {
        if len > self.max_bytes {
            return Err(PhotoError::TooLarge {
                max_bytes: self.max_bytes,
            });
        }

        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if !PHOTO_EXTENSIONS.contains(&extension.as_str()) {
            return Err(PhotoError::UnsupportedType(original_name.to_string()));
        }

        Ok(())
    }

    /// Saves the photo as `<unix-millis>_<sanitized name>` and returns that
    /// filename. The file is created exclusively; a clash bumps the
    /// timestamp and tries again.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, PhotoError> {
        self.check(original_name, bytes.len())?;

        fs::create_dir_all(&self.dir).await?;

        let safe_name = sanitize_filename(original_name);
        let mut stamp = chrono::Utc::now().timestamp_millis();

        for _ in 0..PHOTO_NAME_ATTEMPTS {
            let filename = format!("{stamp}_{safe_name}");
            let path = self.dir.join(&filename);

            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    if let Err(e) = write_all(&mut file, bytes).await {
                        drop(file);
                        fs::remove_file(&path).await.ok();
                        return Err(e.into());
                    }
                    info!(path = %path.display(), bytes = bytes.len(), "Stored profile photo");
                    return Ok(filename);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    stamp += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(PhotoError::Io(std::io::Error::new(
            ErrorKind::AlreadyExists,
            "could not find a free photo filename",
        )))
    }
}

async fn write_all(file: &mut fs::File, bytes: &[u8]) -> std::io::Result<()> {
    file.write_all(bytes).await?;
    file.flush().await
}

/// Keeps only the last path component and replaces anything outside
/// `[A-Za-z0-9._-]` with `_`.
#[must_use]
pub fn sanitize_filename(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let mut cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.len() != cleaned.len() {
        cleaned = trimmed.to_string();
    }

    if cleaned.len() > MAX_FILENAME_LEN {
        cleaned = cleaned[cleaned.len() - MAX_FILENAME_LEN..].to_string();
    }

    if cleaned.is_empty() {
        "photo".to_string()
    } else {
        cleaned
    }
}
