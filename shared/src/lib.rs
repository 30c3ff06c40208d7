use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod record_format;

pub use record_format::{
    decode_record_file, encode_record_file, RecordCodecError, RECORD_FILE_MAGIC,
    RECORD_FILE_VERSION,
};

pub const API_DRAWINGS_PATH: &str = "/api/drawings";
pub const MAX_TITLE_LEN: usize = 120;
pub const MAX_AUTHOR_LEN: usize = 80;

/// Body of `POST /api/drawings`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewDrawing {
    /// Encoded raster, usually a `data:image/png;base64,...` URL.
    pub image: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CreatedDrawing {
    pub id: String,
}

/// A saved drawing as stored by the server and listed in the gallery.
#[derive(Serialize, Deserialize, Encode, Decode, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DrawingRecord {
    pub id: String,
    pub image: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TitleError {
    #[error("Please enter a title for your drawing.")]
    Empty,
    #[error("Title must be at most 120 characters.")]
    TooLong,
}

/// Returns the trimmed title, or why it cannot be saved.
pub fn validate_title(title: &str) -> Result<&str, TitleError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TitleError::Empty);
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(TitleError::TooLong);
    }
    Ok(trimmed)
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthorError {
    #[error("Author must be at most 80 characters.")]
    TooLong,
}

/// Anything the user can fix in the save form.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FormError {
    #[error(transparent)]
    Title(#[from] TitleError),
    #[error(transparent)]
    Author(#[from] AuthorError),
}

/// Normalizes the author and rejects names over [`MAX_AUTHOR_LEN`].
pub fn validate_author(author: Option<&str>) -> Result<Option<String>, AuthorError> {
    match normalize_author(author) {
        Some(author) if author.chars().count() > MAX_AUTHOR_LEN => Err(AuthorError::TooLong),
        author => Ok(author),
    }
}

/// Blank authors are stored as absent.
pub fn normalize_author(author: Option<&str>) -> Option<String> {
    let trimmed = author?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Sorts newest first, breaking ties on the (time ordered) id.
pub fn sort_newest_first(records: &mut [DrawingRecord]) {
    records.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
