use thiserror::Error;

/// Request-level failures of the mutation engine. Any of these aborts the
/// whole invocation; per-instruction problems (missing pages, bad image
/// payloads) are skips, not errors, and never surface here.
#[derive(Error, Debug)]
pub enum MutateError {
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    #[error("failed to save PDF: {0}")]
    Save(String),

    #[error("PDF object error: {0}")]
    Object(String),
}

/// Why one image payload could not be embedded. Always handled as a skip.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("not a data URL")]
    NotADataUrl,

    #[error("unsupported image MIME type: {0}")]
    Unsupported(String),

    #[error("failed to decode image: {0}")]
    Decode(String),
}
