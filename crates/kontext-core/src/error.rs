use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse kubeconfig {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("cluster {server} is not reachable: {message}")]
    Reachability { server: String, message: String },

    #[error("name conflict: {0}")]
    Conflict(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("sub-cluster discovery failed: {0}")]
    Discovery(String),

    #[error("kubeconfig integrity violation: {0}")]
    Integrity(String),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn discovery(msg: impl Into<String>) -> Self {
        Self::Discovery(msg.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Parse { path: path.into(), message: message.to_string() }
    }

    pub fn unreachable(server: &str, message: impl ToString) -> Self {
        Self::Reachability { server: server.to_string(), message: message.to_string() }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
