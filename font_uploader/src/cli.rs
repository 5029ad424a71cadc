//! `font-upload` command line
//!
//! Flags fall back to `FONT_UPLOAD_*` environment variables, and both
//! override the YAML config file.

use crate::config::{UploaderConfig, ENV_CONTRACT, ENV_FROM, ENV_RPC_URL};
use crate::driver::{FontUploadDriver, UploadReport};
use crate::eth::RpcFontContract;
use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

/// Font Upload Arguments
#[derive(Parser, Debug)]
#[clap(name = "font-upload")]
#[clap(about = "Upload a base64-encoded font to its contract in ordered partitions, then finalize it")]
pub struct Args {
    /// Text file holding the encoded font
    pub font_file: PathBuf,

    /// Path to uploader configuration file (YAML)
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// JSON-RPC endpoint of the node
    #[clap(long, env = ENV_RPC_URL)]
    pub rpc_url: Option<String>,

    /// Address of the deployed font contract
    #[clap(long, env = ENV_CONTRACT)]
    pub contract: Option<String>,

    /// Sending account (must be unlocked on the node)
    #[clap(long, env = ENV_FROM)]
    pub from: Option<String>,

    /// Number of partitions to split the font into
    #[clap(long)]
    pub partitions: Option<usize>,
}

impl Args {
    /// Resolve the font path and the effective configuration
    pub fn into_config(self) -> Result<(PathBuf, UploaderConfig)> {
        let mut config = match &self.config {
            Some(path) => UploaderConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => UploaderConfig::default(),
        };

        if let Some(rpc_url) = self.rpc_url {
            config.rpc_url = rpc_url;
        }
        if let Some(contract) = self.contract {
            config.contract_address = Some(contract);
        }
        if let Some(from) = self.from {
            config.from_address = Some(from);
        }
        if let Some(partitions) = self.partitions {
            config.partition_count = partitions;
        }
        Ok((self.font_file, config))
    }
}

/// Run one upload as the binary does; any error means a non-zero exit
pub async fn run(args: Args) -> Result<UploadReport> {
    let (font_file, config) = args.into_config()?;
    config.validate()?;

    info!("RPC endpoint: {}", config.rpc_url);
    info!(
        "Font contract: {}",
        config.contract_address.as_deref().unwrap_or_default()
    );
    info!("Partitions: {}", config.partition_count);

    let contract = RpcFontContract::from_config(&config)?;
    let mut driver = FontUploadDriver::new(contract).with_partition_count(config.partition_count);

    let report = driver
        .run(&font_file)
        .await
        .with_context(|| format!("uploading {}", font_file.display()))?;
    Ok(report)
}
