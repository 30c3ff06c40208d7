use doodleboard_shared::{validate_author, validate_title, DrawingRecord, FormError, NewDrawing};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("Drawing image is missing.")]
    MissingImage,
}

/// Checks a submitted drawing and turns it into the record to store.
pub fn build_record(
    drawing: NewDrawing,
    id: String,
    created_at: u64,
) -> Result<DrawingRecord, ValidationError> {
    let title = validate_title(&drawing.title)
        .map_err(FormError::from)?
        .to_string();
    let author = validate_author(drawing.author.as_deref()).map_err(FormError::from)?;
    if drawing.image.trim().is_empty() {
        return Err(ValidationError::MissingImage);
    }
    Ok(DrawingRecord {
        id,
        image: drawing.image,
        title,
        author,
        created_at,
    })
}
