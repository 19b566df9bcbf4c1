//! Error types for the print engine

use thiserror::Error;

use crate::template::TemplateId;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to the host application.
///
/// Rendering never fails; these come from persistence, uploads, font
/// registration and explicit setting edits.
#[derive(Error, Debug)]
pub enum Error {
    /// The backend has no template with this id
    #[error("Template {0} not found")]
    TemplateNotFound(TemplateId),

    /// The template backend rejected or failed the request
    #[error("Template backend failure: {0}")]
    Backend(String),

    /// An asset upload failed or returned no identifier
    #[error("Upload failed: {0}")]
    Upload(String),

    /// The designer has no persisted template to act on
    #[error("No saved template is selected")]
    NothingSelected,

    /// A setting edit carried a value the schema cannot represent
    #[error("Invalid value {value:?} for setting `{key}`")]
    InvalidSetting { key: String, value: String },

    /// Font bytes could not be parsed
    #[error("Font `{filename}` rejected: {reason}")]
    Font { filename: String, reason: String },

    /// The measurement pass failed
    #[error("Layout failed: {0}")]
    Layout(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
