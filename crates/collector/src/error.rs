use thiserror::Error;

pub type Result<T> = std::result::Result<T, CollectorError>;

#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("field collection failed: {0}")]
    Collection(String),

    #[error("label \"{label}\" references unknown field id \"{target}\"")]
    DanglingLabel { label: String, target: String },

    #[error("transport closed: {0}")]
    TransportClosed(String),

    #[error("{0}")]
    Other(String),
}
