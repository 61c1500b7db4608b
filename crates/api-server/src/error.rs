use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("upstream event stream failed: {0}")]
    EventStream(#[from] common::error::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
