use std::io;
use std::path::PathBuf;

use livekit_api::access_token::AccessTokenError;
use livekit_api::services::ServiceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot reach room service: {0}")]
    Connection(String),

    #[error("room service error: {0}")]
    RemoteService(String),

    #[error("token signing failed: {0}")]
    Token(#[from] AccessTokenError),

    #[error("failed to read env file {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed line {} in {}: expected KEY=VALUE", .line, .path.display())]
    Parse { path: PathBuf, line: usize },
}

impl From<ServiceError> for Error {
    fn from(err: ServiceError) -> Self {
        if is_transport_error(&err) {
            Self::Connection(err.to_string())
        } else {
            Self::RemoteService(err.to_string())
        }
    }
}

/// Walk the source chain looking for a transport-level failure (connect,
/// timeout, raw socket error). Everything else coming out of the service
/// client is a rejection by the service itself.
fn is_transport_error(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = current {
        if let Some(req) = e.downcast_ref::<reqwest::Error>() {
            if req.is_connect() || req.is_timeout() {
                return true;
            }
        }
        if e.downcast_ref::<io::Error>().is_some() {
            return true;
        }
        current = e.source();
    }
    false
}

pub type Result<T> = std::result::Result<T, Error>;
