//! Error types for loading and traversing Wisent buffers

use std::path::PathBuf;
use wisent_core::WisentError;

/// Errors returned by the `wisent` crate
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed buffer: {0}")]
    Format(#[from] WisentError),
    #[error("channel not loaded: {0}")]
    ChannelNotLoaded(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::from(WisentError::AggregateOverflow);
        assert!(matches!(err, Error::Format(WisentError::AggregateOverflow)));
        assert!(err.to_string().starts_with("malformed buffer: "));

        let err = Error::io(
            "/missing/buffer.wisent",
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(err.to_string().contains("/missing/buffer.wisent"));
        assert!(std::error::Error::source(&err).is_some());

        let err = Error::ChannelNotLoaded("datapackage".into());
        assert_eq!(err.to_string(), "channel not loaded: datapackage");
    }
}
