use crate::access::GetError;
use crate::load::LoadError;
use thiserror::Error;

/// Top-level error type for the envbind library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    #[error(transparent)]
    Get(#[from] GetError),
}
