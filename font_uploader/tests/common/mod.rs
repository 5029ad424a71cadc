#![allow(dead_code)]

pub mod node;

use async_trait::async_trait;
use font_uploader::{ContractError, FontContract, UploadReceipt};
use std::sync::Mutex;

/// Remote call seen by the recording contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Write { index: usize, content: String },
    Finalize,
}

/// In-memory contract that records every attempted call in order
#[derive(Default)]
pub struct RecordingContract {
    calls: Mutex<Vec<Call>>,
    reject_write: Option<usize>,
    reject_finalize: bool,
}

impl RecordingContract {
    pub fn rejecting_write(index: usize) -> Self {
        Self {
            reject_write: Some(index),
            ..Default::default()
        }
    }

    pub fn rejecting_finalize() -> Self {
        Self {
            reject_finalize: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn written(&self) -> Vec<usize> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Write { index, .. } => Some(index),
                Call::Finalize => None,
            })
            .collect()
    }
}

#[async_trait]
impl FontContract for RecordingContract {
    async fn write(&self, index: usize, content: &str) -> Result<UploadReceipt, ContractError> {
        // yield so a caller that did not await in order would interleave
        tokio::task::yield_now().await;
        let mut calls = self.calls.lock().unwrap();
        calls.push(Call::Write {
            index,
            content: content.to_string(),
        });
        if self.reject_write == Some(index) {
            return Err(ContractError::Rejected(format!("partition {} refused", index)));
        }
        Ok(UploadReceipt::pending(format!("0x{:064x}", calls.len())))
    }

    async fn finalize(&self) -> Result<UploadReceipt, ContractError> {
        tokio::task::yield_now().await;
        let mut calls = self.calls.lock().unwrap();
        calls.push(Call::Finalize);
        if self.reject_finalize {
            return Err(ContractError::Rejected("font already finalized".to_string()));
        }
        Ok(UploadReceipt::pending(format!("0x{:064x}", calls.len())))
    }
}
