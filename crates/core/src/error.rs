//! Error types for the deck pipeline.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, editing, or exporting a deck.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read input data.
    #[error("Failed to read input: {0}")]
    IoError(#[from] std::io::Error),

    /// The source document type is not supported.
    #[error("Unsupported source document: {0}")]
    UnsupportedSource(String),

    /// The source document could not be parsed into text.
    #[error("Could not extract text from source: {0}")]
    SourceParseError(String),

    /// The generation credential is missing from the environment.
    #[error("API key is missing. Set GEMINI_API_KEY to enable generation.")]
    MissingApiKey,

    /// The generation service call failed.
    #[error("Generation request failed: {0}")]
    GenerationError(String),

    /// The generation service returned no usable content.
    #[error("The generation service returned an empty response")]
    EmptyGeneration,

    /// The generation service returned content that does not match the
    /// slide schema.
    #[error("Malformed generation response: {0}")]
    InvalidGeneration(String),

    /// An edit referenced a slide id not present in the presentation.
    #[error("No slide with id '{0}'")]
    SlideNotFound(String),

    /// An edit referenced a bullet index past the end of the list.
    #[error("Point index {index} is out of range (slide has {len} points)")]
    PointIndexOutOfRange { index: usize, len: usize },

    /// An edit target string could not be parsed.
    #[error("Unrecognized edit target: {0}")]
    InvalidEditTarget(String),

    /// An edit or navigation request arrived outside the editing phase.
    #[error("No presentation is open for editing")]
    NotEditing,

    /// Rendering a standalone document failed.
    #[error("Template rendering error: {0}")]
    TemplateError(String),

    /// ZIP archive error (PPTX packages).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML error (PPTX parts).
    #[error("XML error: {0}")]
    XmlError(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
