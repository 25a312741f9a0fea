//! Local directory of generated images.
//!
//! Saved images are never overwritten: a name that is already taken gets a
//! `-1`, `-2`, ... suffix on its stem. Reads go through [`ImageStore::resolve`],
//! which refuses any path that would leave the store root.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64_ENGINE;
use base64::Engine;
use image::ImageFormat;
use tokio::io::AsyncWriteExt;

use crate::error::CoreError;

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "generated_images";

/// Extension used when the image format cannot be sniffed.
pub const FALLBACK_EXTENSION: &str = "jpg";

/// Upper bound on `-N` suffixes tried before giving up on a name.
const MAX_NAME_ATTEMPTS: u32 = 10_000;

#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Open (creating if needed) the store rooted at `root`.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        tracing::debug!(path = %root.display(), "Image store ready");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` under `file_name`, picking a free name if it is taken.
    ///
    /// Returns the path actually written.
    pub async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, CoreError> {
        let candidate = Path::new(file_name);
        if candidate.file_name().map(|n| n != candidate.as_os_str()).unwrap_or(true) {
            return Err(CoreError::InvalidPath(file_name.to_string()));
        }

        let stem = candidate
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        let extension = candidate.extension().and_then(|e| e.to_str());

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = match (attempt, extension) {
                (0, _) => file_name.to_string(),
                (n, Some(ext)) => format!("{stem}-{n}.{ext}"),
                (n, None) => format!("{stem}-{n}"),
            };
            let path = self.root.join(&name);

            let file = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;

            match file {
                Ok(mut file) => {
                    file.write_all(bytes).await?;
                    file.flush().await?;
                    tracing::info!(path = %path.display(), bytes = bytes.len(), "Saved image");
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(CoreError::Internal(format!(
            "No free filename for '{file_name}' after {MAX_NAME_ATTEMPTS} attempts"
        )))
    }

    /// Map a request path to an existing file inside the store.
    ///
    /// Absolute paths and `..` components are rejected with
    /// [`CoreError::InvalidPath`]; a path that resolves (through symlinks)
    /// outside the root is rejected the same way.
    pub async fn resolve(&self, name: &str) -> Result<PathBuf, CoreError> {
        let requested = Path::new(name);
        if name.is_empty() {
            return Err(CoreError::InvalidPath(name.to_string()));
        }

        let mut relative = PathBuf::new();
        for component in requested.components() {
            match component {
                Component::Normal(part) => relative.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(CoreError::InvalidPath(name.to_string()));
                }
            }
        }
        if relative.as_os_str().is_empty() {
            return Err(CoreError::InvalidPath(name.to_string()));
        }

        let path = self.root.join(&relative);
        let not_found = || CoreError::NotFound {
            entity: "Image",
            key: name.to_string(),
        };

        let canonical = match tokio::fs::canonicalize(&path).await {
            Ok(p) => p,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_found()),
            Err(e) => return Err(e.into()),
        };
        let canonical_root = tokio::fs::canonicalize(&self.root).await?;
        if !canonical.starts_with(&canonical_root) {
            return Err(CoreError::InvalidPath(name.to_string()));
        }

        let metadata = tokio::fs::metadata(&canonical).await?;
        if !metadata.is_file() {
            return Err(not_found());
        }

        Ok(canonical)
    }
}

/// Decode a base64 image payload, tolerating a `data:image/...;base64,` prefix.
pub fn decode_base64(payload: &str) -> Result<Vec<u8>, CoreError> {
    let trimmed = payload.trim();
    let data = if trimmed.starts_with("data:image") {
        trimmed
            .split_once(',')
            .map(|(_, data)| data)
            .ok_or_else(|| CoreError::Decode("Data URL has no payload".into()))?
    } else {
        trimmed
    };

    BASE64_ENGINE
        .decode(data)
        .map_err(|e| CoreError::Decode(e.to_string()))
}

/// File extension for image bytes, sniffed from the header.
pub fn detect_extension(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Jpeg) => "jpg",
        Ok(ImageFormat::Png) => "png",
        Ok(ImageFormat::WebP) => "webp",
        Ok(ImageFormat::Gif) => "gif",
        _ => FALLBACK_EXTENSION,
    }
}

/// `Content-Type` for a stored image, by extension. Defaults to JPEG, which
/// is what the images API produces.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    match ext.as_str() {
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "image/jpeg",
    }
}
