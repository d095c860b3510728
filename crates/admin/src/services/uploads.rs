//! Image uploads for products and banners.
//!
//! Files land in `{UPLOAD_DIR}/{folder}/{uuid}{ext}` and are served by the
//! storefront under `/uploads/{folder}/...`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use axum::body::Bytes;
use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use thiserror::Error;
use tracing::instrument;

/// Largest accepted image.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Extensions accepted as images.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg"];

/// Errors from reading a multipart form or storing a file.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("malformed form data: {0}")]
    Multipart(#[from] MultipartError),

    #[error("file exceeds {} MB", MAX_IMAGE_BYTES / 1024 / 1024)]
    TooLarge,

    #[error("not an image: {0}")]
    NotAnImage(String),

    #[error("could not write upload: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    /// Whether the request itself was at fault.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}

/// Where an upload belongs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFolder {
    Products,
    Banners,
}

impl UploadFolder {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Banners => "banners",
        }
    }
}

/// A file part from a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Name as sent by the browser; used as alt text.
    pub file_name: String,
    pub bytes: Bytes,
}

/// A fully read `multipart/form-data` body: text fields plus file parts.
///
/// File inputs left empty by the browser (no name, no bytes) are dropped.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: Vec<(String, UploadedFile)>,
}

impl MultipartForm {
    /// Drain a multipart body.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Multipart` for a malformed body and
    /// `UploadError::TooLarge` when a file exceeds [`MAX_IMAGE_BYTES`].
    pub async fn read(mut multipart: Multipart) -> Result<Self, UploadError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if let Some(file_name) = field.file_name().map(str::to_owned) {
                let bytes = field.bytes().await?;
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                if bytes.len() > MAX_IMAGE_BYTES {
                    return Err(UploadError::TooLarge);
                }
                form.files.push((name, UploadedFile { file_name, bytes }));
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Add a text field.
    #[must_use]
    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_owned(), value.to_owned());
        self
    }

    /// Add a file part.
    #[must_use]
    pub fn with_file(mut self, name: &str, file: UploadedFile) -> Self {
        self.files.push((name.to_owned(), file));
        self
    }

    /// A text field, trimmed; empty when absent.
    #[must_use]
    pub fn text(&self, name: &str) -> &str {
        self.fields.get(name).map_or("", |v| v.trim())
    }

    /// Whether a checkbox was ticked.
    #[must_use]
    pub fn checked(&self, name: &str) -> bool {
        matches!(self.text(name), "on" | "true" | "1")
    }

    /// All files sent under `name`, in form order.
    pub fn files<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a UploadedFile> + use<'a, 'n> {
        self.files
            .iter()
            .filter(move |(field, _)| field == name)
            .map(|(_, file)| file)
    }

    /// The first file sent under `name`.
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files(name).next()
    }
}

/// Writes uploads below a root directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store a file under a fresh UUID name and return its public URL.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::NotAnImage` for a non-image extension and
    /// `UploadError::Io` if the file cannot be written.
    #[instrument(skip(self, file), fields(folder = folder.as_str(), file_name = %file.file_name, size = file.bytes.len()))]
    pub async fn save(&self, folder: UploadFolder, file: &UploadedFile) -> Result<String, UploadError> {
        let ext = image_extension(&file.file_name)
            .ok_or_else(|| UploadError::NotAnImage(file.file_name.clone()))?;

        let dir = self.root.join(folder.as_str());
        tokio::fs::create_dir_all(&dir).await?;

        let stored_name = format!("{}.{ext}", uuid::Uuid::new_v4());
        tokio::fs::write(dir.join(&stored_name), &file.bytes).await?;

        tracing::info!(stored_name = %stored_name, "upload stored");
        Ok(format!("/uploads/{}/{stored_name}", folder.as_str()))
    }
}

/// Lowercased extension of an image file name, if it is one we accept.
fn image_extension(file_name: &str) -> Option<String> {
    let ext = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}
