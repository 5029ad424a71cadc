use anyhow::Result;
use clap::Parser;
use font_uploader::cli::{run, Args};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let report = run(Args::parse()).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
