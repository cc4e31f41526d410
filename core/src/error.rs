use crate::storage::StorageError;
use climbate_async_utils::CancelErr;
use climbate_catalog_client::CatalogError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClimbateErr>;

#[derive(Error, Debug)]
pub enum ClimbateErr {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("configuration error: {0}")]
    Config(String),

    /// Superseded or dismissed work. Not a failure from the user's point of
    /// view.
    #[error("operation cancelled")]
    Cancelled,
}

impl From<CancelErr> for ClimbateErr {
    fn from(_: CancelErr) -> Self {
        ClimbateErr::Cancelled
    }
}

impl ClimbateErr {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClimbateErr::Cancelled)
    }
}
