/// Alias for `core::result::Result<T, Error>`.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for MMR operations.
///
/// Covers store failures, merge failures and inconsistencies between the
/// MMR size and the data its store actually holds.
#[derive(Debug, PartialEq, Eq, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Tried to compute the root of an empty MMR.
    #[error("Get root on an empty MMR")]
    GetRootOnEmpty,
    /// The batch and store could not resolve a position that must exist for
    /// the current MMR size.
    #[error("Inconsistent store: no element at position {0}")]
    InconsistentStore(u64),
    /// An error propagated from the underlying storage layer.
    #[error("Store error: {0}")]
    StoreError(String),
    /// The merge function failed to combine two elements.
    #[error("Merge failed: {0}")]
    MergeFailed(String),
    /// Invalid input parameters.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
