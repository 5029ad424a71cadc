use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Step of the upload pipeline an error is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStep {
    Load,
    Partition,
    Write(usize),
    Finalize,
}

impl fmt::Display for UploadStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadStep::Load => write!(f, "load"),
            UploadStep::Partition => write!(f, "partition"),
            UploadStep::Write(index) => write!(f, "write of partition {}", index),
            UploadStep::Finalize => write!(f, "finalize"),
        }
    }
}

/// Failures reported by a font contract endpoint
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("Provider error: {0}")]
    Provider(#[from] ethers::providers::ProviderError),

    #[error("Invalid RPC endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("{method} got no answer within {secs}s")]
    RequestTimeout { method: &'static str, secs: u64 },

    #[error("Node has no unlocked accounts")]
    NoAccounts,

    #[error("Transaction {tx_hash} reverted")]
    Reverted { tx_hash: String },

    #[error("Transaction {tx_hash} was dropped from the mempool")]
    Dropped { tx_hash: String },

    #[error("No receipt for transaction {tx_hash} after {waited_secs}s")]
    ReceiptTimeout { tx_hash: String, waited_secs: u64 },

    #[error("Rejected: {0}")]
    Rejected(String),
}

/// Uploader error type
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Remote {step} failed: {source}")]
    RemoteWrite {
        step: UploadStep,
        #[source]
        source: ContractError,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl UploadError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        UploadError::Io {
            path: path.into(),
            source,
        }
    }

    /// Step the error was raised at, if it came from the remote side
    pub fn remote_step(&self) -> Option<UploadStep> {
        match self {
            UploadError::RemoteWrite { step, .. } => Some(*step),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, UploadError>;
