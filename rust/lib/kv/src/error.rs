use thiserror::Error;

#[derive(Error, Debug)]
pub enum KVError {
    /// Any failure reported by the underlying database.
    #[error("storage error: {0}")]
    Storage(String),
}
