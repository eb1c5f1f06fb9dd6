use thiserror::Error;

/// Failure while loading a document into a session.
///
/// Load failures are terminal for the attempt: the session holds no document
/// afterwards and a fresh load is required.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The bytes could not be parsed as a PDF document.
    #[error("failed to parse document: {0}")]
    Corrupt(String),

    /// The document is password protected.
    #[error("document is encrypted")]
    Encrypted,

    /// The document parsed but cannot be worked with (e.g. it has no pages).
    #[error("unsupported document: {0}")]
    Unsupported(String),

    /// The rendering task itself failed to run.
    #[error("load task failed: {0}")]
    IoFailure(String),
}

/// Rejected before any reconstruction work begins. Causes no session state
/// transition; the caller may adjust the selection and try again.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Every page is selected for deletion; at least one page must remain.
    #[error("cannot remove every page; at least one page must be kept")]
    AllPagesSelectedForDeletion,

    /// The operation requires a loaded document.
    #[error("no document is loaded")]
    NoDocument,
}

/// Failure reported by a [`DocumentWriter`](crate::pdf::DocumentWriter)
/// while composing the output document.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct WriteError(pub String);

/// Failure of a reconstruction run.
///
/// Writer and task failures leave the catalog and selection untouched so the
/// same selection can be retried without reloading.
#[derive(Debug, Error)]
pub enum ReconstructionError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The document writer rejected or failed the compose operation.
    #[error("failed to compose output document: {0}")]
    Writer(#[from] WriteError),

    /// The reconstruction task failed to run to completion.
    #[error("reconstruction task failed: {0}")]
    Task(String),
}
