//! Uploads a text-encoded font to an on-chain font contract.
//!
//! The payload is cut into ordered partitions which are written one
//! transaction at a time, after which the contract is finalized.

pub mod cli;
pub mod config;
pub mod contract;
pub mod driver;
pub mod error;
pub mod eth;
pub mod partition;
pub mod payload;

pub use config::UploaderConfig;
pub use contract::{AccountSummary, FontContract, UploadReceipt};
pub use driver::{FontUploadDriver, PartitionUpload, UploadReport, UploadState};
pub use error::{ContractError, Result, UploadError, UploadStep};
pub use eth::{ReceiptPolling, RpcFontContract};
pub use partition::{partition, Partition, DEFAULT_PARTITION_COUNT};
pub use payload::{load_payload, FontPayload};
