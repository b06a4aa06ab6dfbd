//! Library error type.

use thiserror::Error;

/// Errors surfaced by tree building and the pipeline API.
///
/// Build errors (`FontLoad`) are recoverable: the tree visible to the
/// pipeline is never touched by a failed build, so the caller can retry
/// with a corrected description. `ShutDown` is returned by the
/// synchronous wait calls when they race pipeline teardown.
#[derive(Debug, Error)]
pub enum Error {
    /// A text node named a font the font source could not provide.
    #[error("font {descriptor:?} could not be loaded: {reason}")]
    FontLoad { descriptor: String, reason: String },

    /// The pipeline shut down while a wait was outstanding.
    #[error("scene pipeline has shut down")]
    ShutDown,

    /// A backend reported a render failure. Logged by the render worker;
    /// never fatal to the pipeline.
    #[error("backend error: {0}")]
    Backend(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
