use namepool_types::Name;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("mempool error: {0}")]
    Mempool(#[from] namepool_mempool::MempoolError),

    #[error("store error: {0}")]
    Store(#[from] namepool_store::StoreError),

    #[error("name operation on {0} conflicts with a pending transaction")]
    NameConflict(Name),

    #[error("there is already a pending registration for {0}")]
    PendingRegistration(Name),

    #[error("name {0} can not be updated")]
    NameNotUpdatable(Name),

    #[error("config error: {0}")]
    Config(String),

    #[error("metrics error: {0}")]
    Metrics(String),

    #[error("logging error: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
