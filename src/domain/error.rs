// Domain errors
use super::dashboard::ListKey;
use thiserror::Error;

/// Rejection raised at the store boundary. The state is never modified when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("url must not be empty")]
    EmptyUrl,
    #[error("no such list: {0}")]
    UnknownList(ListKey),
    #[error("index {index} is out of range for a list of {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("cannot drag from {source_list} into {target_list}")]
    CrossListDrag {
        source_list: ListKey,
        target_list: ListKey,
    },
    #[error("drag release is missing its {0}")]
    MalformedDrag(&'static str),
}

/// Why a submitted whole-state document was refused.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Invalid JSON")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Invalid state data structure received: {0}")]
    InvalidStructure(String),
}
