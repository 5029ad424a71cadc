//! Font contract reached through an Ethereum JSON-RPC node
//!
//! Transactions are signed by the node (`eth_sendTransaction`), so the
//! sending account has to be unlocked there. Every transaction is followed
//! until it is mined; a write only counts once its receipt reports success.

use crate::config::{parse_address, UploaderConfig};
use crate::contract::{AccountSummary, FontContract, UploadReceipt};
use crate::error::{ContractError, Result, UploadError};
use async_trait::async_trait;
use ethers::abi::{self, Token};
use ethers::providers::{Http, Middleware, Provider, ProviderError};
use ethers::types::{Address, TransactionReceipt, TransactionRequest, U256, U64};
use ethers::utils::id;
use log::{debug, info};
use std::future::Future;
use std::time::Duration;
use tokio::sync::OnceCell;

/// How often and how long to wait for a transaction to be mined
#[derive(Debug, Clone, Copy)]
pub struct ReceiptPolling {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for ReceiptPolling {
    fn default() -> Self {
        let defaults = UploaderConfig::default();
        Self {
            interval: Duration::from_millis(defaults.receipt_poll_interval_ms),
            timeout: Duration::from_secs(defaults.receipt_timeout_secs),
        }
    }
}

/// Call data for a `(uint256 index, string content)` write function
pub fn write_calldata(signature: &str, index: usize, content: &str) -> Vec<u8> {
    let mut data = id(signature).to_vec();
    data.extend(abi::encode(&[
        Token::Uint(U256::from(index)),
        Token::String(content.to_string()),
    ]));
    data
}

/// Call data for a function without arguments
pub fn finalize_calldata(signature: &str) -> Vec<u8> {
    id(signature).to_vec()
}

pub struct RpcFontContract {
    provider: Provider<Http>,
    contract: Address,
    configured_from: Option<Address>,
    sender: OnceCell<Address>,
    gas_limit: Option<u64>,
    gas_price: Option<u64>,
    write_signature: String,
    finalize_signature: String,
    polling: ReceiptPolling,
    request_timeout: Duration,
}

impl RpcFontContract {
    pub fn new(rpc_url: &str, contract: Address) -> std::result::Result<Self, ContractError> {
        let defaults = UploaderConfig::default();
        let polling = ReceiptPolling::default();
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| ContractError::InvalidEndpoint {
                url: rpc_url.to_string(),
                reason: e.to_string(),
            })?
            .interval(polling.interval);

        Ok(Self {
            provider,
            contract,
            configured_from: None,
            sender: OnceCell::new(),
            gas_limit: None,
            gas_price: None,
            write_signature: defaults.write_signature,
            finalize_signature: defaults.finalize_signature,
            polling,
            request_timeout: Duration::from_secs(defaults.request_timeout_secs),
        })
    }

    /// Build from a validated configuration
    pub fn from_config(config: &UploaderConfig) -> Result<Self> {
        config.validate()?;
        let contract = match &config.contract_address {
            Some(addr) => parse_address(addr)?,
            None => return Err(UploadError::Config("contract address is required".to_string())),
        };
        let configured_from = config.from_address.as_deref().map(parse_address).transpose()?;

        let mut uploader = Self::new(&config.rpc_url, contract)
            .map_err(|e| UploadError::Config(e.to_string()))?
            .with_polling(ReceiptPolling {
                interval: Duration::from_millis(config.receipt_poll_interval_ms),
                timeout: Duration::from_secs(config.receipt_timeout_secs),
            })
            .with_request_timeout(Duration::from_secs(config.request_timeout_secs));
        uploader.configured_from = configured_from;
        uploader.gas_limit = config.gas_limit;
        uploader.gas_price = config.gas_price;
        uploader.write_signature = config.write_signature.clone();
        uploader.finalize_signature = config.finalize_signature.clone();
        Ok(uploader)
    }

    pub fn with_polling(mut self, polling: ReceiptPolling) -> Self {
        self.provider = self.provider.interval(polling.interval);
        self.polling = polling;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_sender(mut self, from: Address) -> Self {
        self.configured_from = Some(from);
        self
    }

    pub fn contract_address(&self) -> Address {
        self.contract
    }

    /// Sending account, resolved from the node once if not configured
    pub async fn sender(&self) -> std::result::Result<Address, ContractError> {
        if let Some(from) = self.configured_from {
            return Ok(from);
        }
        self.sender
            .get_or_try_init(|| async {
                let accounts = self
                    .request("eth_accounts", self.provider.get_accounts())
                    .await?;
                accounts.first().copied().ok_or(ContractError::NoAccounts)
            })
            .await
            .copied()
    }

    async fn request<T, F>(
        &self,
        method: &'static str,
        call: F,
    ) -> std::result::Result<T, ContractError>
    where
        F: Future<Output = std::result::Result<T, ProviderError>>,
    {
        match tokio::time::timeout(self.request_timeout, call).await {
            Ok(result) => result.map_err(ContractError::from),
            Err(_) => Err(ContractError::RequestTimeout {
                method,
                secs: self.request_timeout.as_secs(),
            }),
        }
    }

    /// Send `data` to the contract and wait until the transaction is mined
    async fn submit(&self, data: Vec<u8>) -> std::result::Result<UploadReceipt, ContractError> {
        let data_len = data.len();
        let mut tx = TransactionRequest::new()
            .from(self.sender().await?)
            .to(self.contract)
            .value(0)
            .data(data);
        if let Some(gas) = self.gas_limit {
            tx = tx.gas(gas);
        }
        if let Some(price) = self.gas_price {
            tx = tx.gas_price(price);
        }

        let pending_tx = self
            .request("eth_sendTransaction", self.provider.send_transaction(tx, None))
            .await?;
        let tx_hash = format!("{:?}", pending_tx.tx_hash());
        debug!("sent {} ({} bytes of call data)", tx_hash, data_len);

        let mined = pending_tx
            .interval(self.polling.interval)
            .confirmations(1);
        let receipt = tokio::time::timeout(self.polling.timeout, mined)
            .await
            .map_err(|_| ContractError::ReceiptTimeout {
                tx_hash: tx_hash.clone(),
                waited_secs: self.polling.timeout.as_secs(),
            })??
            .ok_or_else(|| ContractError::Dropped {
                tx_hash: tx_hash.clone(),
            })?;
        to_upload_receipt(receipt)
    }
}

fn to_upload_receipt(
    receipt: TransactionReceipt,
) -> std::result::Result<UploadReceipt, ContractError> {
    let tx_hash = format!("{:?}", receipt.transaction_hash);
    if receipt.status == Some(U64::zero()) {
        return Err(ContractError::Reverted { tx_hash });
    }
    // block and gas are informational; a success status is what counts
    Ok(UploadReceipt {
        tx_hash,
        block_number: receipt.block_number.map(|n| n.as_u64()),
        gas_used: receipt.gas_used.and_then(|gas| u64::try_from(gas).ok()),
    })
}

#[async_trait]
impl FontContract for RpcFontContract {
    async fn write(
        &self,
        index: usize,
        content: &str,
    ) -> std::result::Result<UploadReceipt, ContractError> {
        self.submit(write_calldata(&self.write_signature, index, content))
            .await
    }

    async fn finalize(&self) -> std::result::Result<UploadReceipt, ContractError> {
        info!("Finalizing font contract {:?}", self.contract);
        self.submit(finalize_calldata(&self.finalize_signature))
            .await
    }

    async fn account_summary(
        &self,
    ) -> std::result::Result<Option<AccountSummary>, ContractError> {
        let address = self.sender().await?;
        let balance = self
            .request("eth_getBalance", self.provider.get_balance(address, None))
            .await?;
        Ok(Some(AccountSummary { address, balance }))
    }
}
