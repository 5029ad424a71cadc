//! Uploader configuration
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! `FONT_UPLOAD_*` environment variables or command line flags (see `cli`).

use crate::error::{Result, UploadError};
use crate::partition::DEFAULT_PARTITION_COUNT;
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const ENV_RPC_URL: &str = "FONT_UPLOAD_RPC_URL";
pub const ENV_CONTRACT: &str = "FONT_UPLOAD_CONTRACT";
pub const ENV_FROM: &str = "FONT_UPLOAD_FROM";

/// Font uploader configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UploaderConfig {
    /// JSON-RPC endpoint of the node
    pub rpc_url: String,
    /// Address of the deployed font contract
    pub contract_address: Option<String>,
    /// Sending account; the node's first account when unset
    pub from_address: Option<String>,
    /// Number of partitions the payload is split into
    pub partition_count: usize,
    /// Gas limit per transaction, left to the node when unset
    pub gas_limit: Option<u64>,
    /// Gas price in wei, left to the node when unset
    pub gas_price: Option<u64>,
    pub receipt_poll_interval_ms: u64,
    pub receipt_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Solidity signature of the partition write function
    pub write_signature: String,
    /// Solidity signature of the finalize function
    pub finalize_signature: String,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            contract_address: None,
            from_address: None,
            partition_count: DEFAULT_PARTITION_COUNT,
            gas_limit: None,
            gas_price: None,
            receipt_poll_interval_ms: 1000,
            receipt_timeout_secs: 120,
            request_timeout_secs: 30,
            write_signature: "saveFile(uint256,string)".to_string(),
            finalize_signature: "finalizeFont()".to_string(),
        }
    }
}

impl UploaderConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| UploadError::io(path, e))?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw).map_err(|e| UploadError::Config(format!("invalid YAML: {}", e)))
    }

    /// Check the configuration is complete enough to upload
    pub fn validate(&self) -> Result<()> {
        if self.rpc_url.trim().is_empty() {
            return Err(UploadError::Config("rpc_url is empty".to_string()));
        }
        match &self.contract_address {
            Some(addr) => {
                parse_address(addr)?;
            }
            None => {
                return Err(UploadError::Config(format!(
                    "contract address is required (set contract_address, {} or --contract)",
                    ENV_CONTRACT
                )))
            }
        }
        if self.receipt_timeout_secs == 0 || self.request_timeout_secs == 0 {
            return Err(UploadError::Config("timeouts must be positive".to_string()));
        }
        if let Some(from) = &self.from_address {
            parse_address(from)?;
        }
        if self.partition_count == 0 {
            return Err(UploadError::Config(
                "partition_count must be at least 1".to_string(),
            ));
        }
        if self.receipt_poll_interval_ms == 0 {
            return Err(UploadError::Config(
                "receipt_poll_interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parse a `0x`-prefixed 20 byte hex address
pub fn parse_address(raw: &str) -> Result<Address> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .ok_or_else(|| UploadError::Config(format!("address must start with 0x: {}", raw)))?;
    let bytes = hex::decode(digits)
        .map_err(|e| UploadError::Config(format!("invalid address {}: {}", raw, e)))?;
    if bytes.len() != 20 {
        return Err(UploadError::Config(format!(
            "address must be 20 bytes, got {}: {}",
            bytes.len(),
            raw
        )));
    }
    Ok(Address::from_slice(&bytes))
}
