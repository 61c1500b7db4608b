use faststr::FastStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Validation,
    ModelResolution,
    Upstream,
    Transport,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(FastStr),

    #[error("invalid request: {0}")]
    InvalidRequest(FastStr),

    #[error("model not found: {0}")]
    ModelNotFound(FastStr),

    #[error("upstream returned {status}: {message}")]
    Upstream { status: u16, message: FastStr },

    #[error("invalid upstream response (status {status}): {body}")]
    InvalidResponse { status: u16, body: FastStr },

    #[error("transport error: {0}")]
    Transport(FastStr),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::InvalidRequest(_) => ErrorKind::Validation,
            Self::ModelNotFound(_) => ErrorKind::ModelResolution,
            Self::Upstream { .. } | Self::InvalidResponse { .. } => ErrorKind::Upstream,
            Self::Transport(_) => ErrorKind::Transport,
        }
    }
}

impl From<common::error::Error> for Error {
    fn from(err: common::error::Error) -> Self {
        use common::error::Error as E;
        match err {
            E::Configuration(msg) => Self::Configuration(msg),
            E::UpstreamStatus { status, message } => Self::Upstream { status, message },
            E::InvalidResponseData(body, status) => Self::InvalidResponse { status, body },
            E::InvalidResponseEventStream(body) => Self::InvalidResponse { status: 200, body },
            E::SerdeError(e) => Self::InvalidResponse {
                status: 200,
                body:   e.to_string().into(),
            },
            E::ReqwestError(e) => Self::Transport(e.to_string().into()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
