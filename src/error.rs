use thiserror::Error;

/// Crate-wide error type.
///
/// Every failure in the pipeline falls into one of four categories, and each
/// variant carries a human-readable message for the caller. The serving layer
/// maps `Decode` and `InvalidInput` to client errors (HTTP 400), `Inference`
/// to a server error (500), and treats `ModelLoad` as fatal at startup.
#[derive(Debug, Error)]
pub enum Error {
    /// The supplied bytes could not be decoded into a pixel buffer, or the
    /// buffer itself is structurally impossible (bad channel count, byte
    /// length not matching the declared dimensions).
    #[error("decode error: {0}")]
    Decode(String),

    /// The input is structurally valid but unusable (e.g. zero width or
    /// height).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The model checkpoint is missing, unreadable, malformed, or does not
    /// match the network topology.
    #[error("model load error: {0}")]
    ModelLoad(String),

    /// The forward pass hit an internal shape mismatch.
    #[error("inference error: {0}")]
    Inference(String),
}

pub type Result<T> = std::result::Result<T, Error>;
