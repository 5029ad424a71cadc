//! Font upload driver
//!
//! Load, partition, write every partition in index order, then finalize.
//! Each remote call is awaited before the next one is issued and the first
//! failure ends the run; partitions already written stay on the contract.

use crate::contract::{FontContract, UploadReceipt};
use crate::error::{Result, UploadError, UploadStep};
use crate::partition::{partition, DEFAULT_PARTITION_COUNT};
use crate::payload::{load_payload, FontPayload};
use log::{debug, info, warn};
use serde::Serialize;
use std::path::Path;

/// Progress of a driver run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum UploadState {
    NotStarted,
    Loaded,
    Partitioned,
    Uploading { completed: usize },
    Finalized,
    Failed { step: UploadStep },
}

impl UploadState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadState::Finalized | UploadState::Failed { .. })
    }
}

/// Receipt of one partition write
#[derive(Debug, Clone, Serialize)]
pub struct PartitionUpload {
    pub index: usize,
    pub char_len: usize,
    pub receipt: UploadReceipt,
}

/// Outcome of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct UploadReport {
    pub payload_chars: usize,
    pub partitions: Vec<PartitionUpload>,
    pub finalize: UploadReceipt,
}

pub struct FontUploadDriver<C> {
    contract: C,
    partition_count: usize,
    state: UploadState,
}

impl<C: FontContract> FontUploadDriver<C> {
    pub fn new(contract: C) -> Self {
        Self {
            contract,
            partition_count: DEFAULT_PARTITION_COUNT,
            state: UploadState::NotStarted,
        }
    }

    pub fn with_partition_count(mut self, count: usize) -> Self {
        self.partition_count = count;
        self
    }

    pub fn state(&self) -> UploadState {
        self.state
    }

    pub fn contract(&self) -> &C {
        &self.contract
    }

    /// Load the font at `path` and upload it
    pub async fn run(&mut self, path: impl AsRef<Path>) -> Result<UploadReport> {
        self.ensure_not_started()?;
        let payload = match load_payload(path) {
            Ok(payload) => payload,
            Err(e) => {
                self.state = UploadState::Failed {
                    step: UploadStep::Load,
                };
                return Err(e);
            }
        };
        self.upload(&payload).await
    }

    /// Upload an already loaded payload
    pub async fn upload(&mut self, payload: &FontPayload) -> Result<UploadReport> {
        self.ensure_not_started()?;
        self.state = UploadState::Loaded;
        let payload_chars = payload.char_len();
        info!(
            "Loaded {} ({} characters)",
            payload.path().display(),
            payload_chars
        );
        if let Some(decoded) = payload.decoded_len() {
            debug!("payload is base64 for a {} byte font", decoded);
        }

        self.log_account().await;

        let parts = match partition(payload.as_str(), self.partition_count) {
            Ok(parts) => parts,
            Err(e) => {
                self.state = UploadState::Failed {
                    step: UploadStep::Partition,
                };
                return Err(e);
            }
        };
        self.state = UploadState::Partitioned;

        let mut uploads = Vec::with_capacity(parts.len());
        for part in &parts {
            self.state = UploadState::Uploading {
                completed: uploads.len(),
            };
            let receipt = self
                .contract
                .write(part.index, part.content)
                .await
                .map_err(|source| self.fail(UploadStep::Write(part.index), source))?;
            let char_len = part.char_len();
            info!(
                "Partition {} ({} chars) written: {}",
                part.index, char_len, receipt.tx_hash
            );
            uploads.push(PartitionUpload {
                index: part.index,
                char_len,
                receipt,
            });
        }
        self.state = UploadState::Uploading {
            completed: uploads.len(),
        };

        let finalize = self
            .contract
            .finalize()
            .await
            .map_err(|source| self.fail(UploadStep::Finalize, source))?;
        info!("Font finalized: {}", finalize.tx_hash);
        self.state = UploadState::Finalized;

        Ok(UploadReport {
            payload_chars,
            partitions: uploads,
            finalize,
        })
    }

    fn ensure_not_started(&self) -> Result<()> {
        if self.state == UploadState::NotStarted {
            Ok(())
        } else {
            Err(UploadError::InvalidInput(format!(
                "driver already used (state {:?})",
                self.state
            )))
        }
    }

    fn fail(&mut self, step: UploadStep, source: crate::error::ContractError) -> UploadError {
        self.state = UploadState::Failed { step };
        UploadError::RemoteWrite { step, source }
    }

    async fn log_account(&self) {
        match self.contract.account_summary().await {
            Ok(Some(account)) => {
                info!("Uploading with the account: {:?}", account.address);
                info!("Account balance: {}", account.balance);
            }
            Ok(None) => {}
            Err(e) => warn!("Could not read sender account: {}", e),
        }
    }
}
