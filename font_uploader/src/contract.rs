use crate::error::ContractError;
use async_trait::async_trait;
use ethers::types::{Address, U256};
use serde::Serialize;

/// What the endpoint returns for a write or finalize call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadReceipt {
    pub tx_hash: String,
    pub block_number: Option<u64>,
    pub gas_used: Option<u64>,
}

impl UploadReceipt {
    pub fn pending(tx_hash: impl Into<String>) -> Self {
        Self {
            tx_hash: tx_hash.into(),
            block_number: None,
            gas_used: None,
        }
    }
}

/// Account the uploads are sent from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSummary {
    pub address: Address,
    pub balance: U256,
}

/// Remote storage holding font partitions
///
/// Implementations must not return from `write` or `finalize` before the
/// call has completed on the remote side.
#[async_trait]
pub trait FontContract: Send + Sync {
    /// Store `content` as partition `index`
    async fn write(&self, index: usize, content: &str) -> Result<UploadReceipt, ContractError>;

    /// Lock the font against further writes. Irreversible.
    async fn finalize(&self) -> Result<UploadReceipt, ContractError>;

    /// Sending account, when the endpoint knows it
    async fn account_summary(&self) -> Result<Option<AccountSummary>, ContractError> {
        Ok(None)
    }
}
