// src/main.rs
//! Command line front end: run scenarios or inspect program accounts

use banksy_client::{BanksyClient, BanksyError, ClientConfig, Result, Scenario};
use clap::{Parser, Subcommand};
use log::{error, info};
use serde::Serialize;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_program::pubkey::Pubkey;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(name = "banksy-client")]
#[command(about = "Exercise the Banksy NFT and Auction programs on a Solana cluster")]
struct Cli {
    /// JSON configuration file
    #[clap(long)]
    config: Option<PathBuf>,

    /// Override the RPC endpoint
    #[clap(long)]
    url: Option<String>,

    /// Override the fee payer keypair file
    #[clap(long)]
    wallet: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run scenarios against the cluster (all of them when none is given)
    Run {
        #[clap(value_enum)]
        scenarios: Vec<Scenario>,
    },
    /// Print an NFT account as JSON
    Nft { address: String },
    /// Print a user account as JSON
    User { address: String },
    /// Print an auction account as JSON
    Auction { address: String },
    /// Fund the fee payer from the cluster faucet
    Airdrop { lamports: u64 },
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let base = match &cli.config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    };
    let mut config = base.apply_env(|key| std::env::var(key).ok());

    if let Some(url) = &cli.url {
        config.rpc_url = url.clone();
    }
    if let Some(wallet) = &cli.wallet {
        config.wallet_path = wallet.clone();
    }

    config.validate()?;
    Ok(config)
}

fn parse_address(address: &str) -> Result<Pubkey> {
    Pubkey::from_str(address)
        .map_err(|e| BanksyError::Config(format!("invalid address {}: {}", address, e)))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| BanksyError::Serialization(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

async fn run_scenarios(client: &BanksyClient<RpcClient>, scenarios: Vec<Scenario>) -> bool {
    let scenarios = if scenarios.is_empty() {
        Scenario::all().to_vec()
    } else {
        scenarios
    };

    let mut failures = 0;
    for scenario in &scenarios {
        match scenario.run(client).await {
            Ok(()) => info!("PASS {}", scenario.name()),
            Err(e) => {
                failures += 1;
                error!("FAIL {}: {}", scenario.name(), e);
            }
        }
    }

    info!("{} passed, {} failed", scenarios.len() - failures, failures);
    failures == 0
}

async fn execute(cli: Cli) -> Result<bool> {
    let config = load_config(&cli)?;
    info!("Using {} with wallet {}", config.rpc_url, config.wallet_path.display());

    let client = BanksyClient::new(config.rpc_client()?, config.load_payer()?, config.program_ids()?);

    match cli.command {
        Command::Run { scenarios } => return Ok(run_scenarios(&client, scenarios).await),
        Command::Nft { address } => print_json(&client.fetch_nft(&parse_address(&address)?).await?)?,
        Command::User { address } => print_json(&client.fetch_user(&parse_address(&address)?).await?)?,
        Command::Auction { address } => {
            print_json(&client.fetch_auction(&parse_address(&address)?).await?)?
        }
        Command::Airdrop { lamports } => {
            let signature = client.airdrop(&client.payer(), lamports).await?;
            println!("{}", signature);
        }
    }

    Ok(true)
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match execute(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("{} (code {})", e, e.to_error_code());
            std::process::exit(2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_print_json_reports_serialization_errors() {
        // JSON objects only take string keys
        let mut value = BTreeMap::new();
        value.insert((1u8, 2u8), 3u8);

        assert!(matches!(print_json(&value), Err(BanksyError::Serialization(_))));
    }

    #[test]
    fn test_parse_address() {
        let key = Pubkey::new_unique();
        assert_eq!(parse_address(&key.to_string()).unwrap(), key);
        assert!(matches!(parse_address("nope"), Err(BanksyError::Config(_))));
    }
}
