use furni_types::ItemId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MergeError {
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("document has neither roomItems nor wallItems to add into")]
    NoTargetCollection,
}

pub type MergeResult<T> = Result<T, MergeError>;
