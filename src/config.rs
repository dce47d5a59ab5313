// src/config.rs
//! Client configuration
//!
//! Settings come from defaults, then an optional JSON file, then the
//! environment variables the Anchor tooling exports, in that order of
//! precedence (last wins).

use serde::{Deserialize, Serialize};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_program::pubkey::Pubkey;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    signature::{read_keypair_file, Keypair},
};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error_handling::{BanksyError, Result};

/// Default local validator endpoint
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8899";

pub const ENV_RPC_URL: &str = "ANCHOR_PROVIDER_URL";
pub const ENV_WALLET: &str = "ANCHOR_WALLET";
pub const ENV_COMMITMENT: &str = "BANKSY_COMMITMENT";
pub const ENV_BANKSY_PROGRAM_ID: &str = "BANKSY_PROGRAM_ID";
pub const ENV_AUCTION_PROGRAM_ID: &str = "AUCTION_PROGRAM_ID";

/// Addresses of the two deployed programs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgramIds {
    /// Banksy NFT ledger program
    pub banksy: Pubkey,
    /// Auction program
    pub auction: Pubkey,
}

/// Client configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// JSON-RPC endpoint
    pub rpc_url: String,

    /// Keypair file of the fee payer
    pub wallet_path: PathBuf,

    /// `processed`, `confirmed` or `finalized`
    pub commitment: String,

    /// Base58 address of the Banksy program
    pub banksy_program_id: Option<String>,

    /// Base58 address of the Auction program
    pub auction_program_id: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            wallet_path: default_wallet_path(),
            commitment: "confirmed".to_string(),
            banksy_program_id: None,
            auction_program_id: None,
        }
    }
}

fn default_wallet_path() -> PathBuf {
    let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_default();
    home.join(".config").join("solana").join("id.json")
}

impl ClientConfig {
    /// Defaults overridden by the process environment
    pub fn from_env() -> Self {
        Self::default().apply_env(|key| std::env::var(key).ok())
    }

    /// Read a JSON configuration file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|e| {
            BanksyError::Config(format!("cannot parse {}: {}", path.display(), e))
        })
    }

    /// Override fields with values from `lookup`, keyed by variable name
    pub fn apply_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_RPC_URL) {
            self.rpc_url = url;
        }
        if let Some(wallet) = lookup(ENV_WALLET) {
            self.wallet_path = PathBuf::from(wallet);
        }
        if let Some(commitment) = lookup(ENV_COMMITMENT) {
            self.commitment = commitment;
        }
        if let Some(id) = lookup(ENV_BANKSY_PROGRAM_ID) {
            self.banksy_program_id = Some(id);
        }
        if let Some(id) = lookup(ENV_AUCTION_PROGRAM_ID) {
            self.auction_program_id = Some(id);
        }
        self
    }

    /// Check every field without touching the network or the filesystem
    pub fn validate(&self) -> Result<()> {
        if self.rpc_url.trim().is_empty() {
            return Err(BanksyError::Config("rpc_url is empty".to_string()));
        }
        self.commitment_config()?;
        self.program_ids()?;
        Ok(())
    }

    pub fn commitment_config(&self) -> Result<CommitmentConfig> {
        match self.commitment.as_str() {
            "processed" => Ok(CommitmentConfig::processed()),
            "confirmed" => Ok(CommitmentConfig::confirmed()),
            "finalized" => Ok(CommitmentConfig::finalized()),
            other => Err(BanksyError::Config(format!(
                "unknown commitment level: {}",
                other
            ))),
        }
    }

    pub fn program_ids(&self) -> Result<ProgramIds> {
        Ok(ProgramIds {
            banksy: parse_program_id("banksy_program_id", self.banksy_program_id.as_deref())?,
            auction: parse_program_id("auction_program_id", self.auction_program_id.as_deref())?,
        })
    }

    /// Load the fee payer keypair
    pub fn load_payer(&self) -> Result<Keypair> {
        read_keypair_file(&self.wallet_path).map_err(|e| {
            BanksyError::Config(format!(
                "cannot read wallet {}: {}",
                self.wallet_path.display(),
                e
            ))
        })
    }

    pub fn rpc_client(&self) -> Result<RpcClient> {
        Ok(RpcClient::new_with_commitment(
            self.rpc_url.clone(),
            self.commitment_config()?,
        ))
    }
}

fn parse_program_id(field: &str, value: Option<&str>) -> Result<Pubkey> {
    let value = value.ok_or_else(|| BanksyError::Config(format!("{} is not set", field)))?;
    Pubkey::from_str(value)
        .map_err(|e| BanksyError::Config(format!("{} is not a valid address: {}", field, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(config.commitment, "confirmed");
        assert!(config.wallet_path.ends_with(".config/solana/id.json"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_env() {
        let banksy = Pubkey::new_unique().to_string();
        let auction = Pubkey::new_unique().to_string();

        let config = ClientConfig::default().apply_env(env(&[
            (ENV_RPC_URL, "http://validator:8899"),
            (ENV_WALLET, "/tmp/payer.json"),
            (ENV_BANKSY_PROGRAM_ID, banksy.as_str()),
            (ENV_AUCTION_PROGRAM_ID, auction.as_str()),
        ]));

        assert_eq!(config.rpc_url, "http://validator:8899");
        assert_eq!(config.wallet_path, PathBuf::from("/tmp/payer.json"));
        assert!(config.validate().is_ok());

        let ids = config.program_ids().unwrap();
        assert_eq!(ids.banksy.to_string(), banksy);
        assert_eq!(ids.auction.to_string(), auction);
    }

    #[test]
    fn test_validation_errors() {
        let auction = Pubkey::new_unique().to_string();
        let mut config = ClientConfig::default().apply_env(env(&[
            (ENV_BANKSY_PROGRAM_ID, "not-a-key"),
            (ENV_AUCTION_PROGRAM_ID, auction.as_str()),
        ]));
        assert!(matches!(config.validate(), Err(BanksyError::Config(_))));

        config.banksy_program_id = Some(Pubkey::new_unique().to_string());
        config.commitment = "recent".to_string();
        assert!(matches!(config.validate(), Err(BanksyError::Config(_))));

        config.commitment = "finalized".to_string();
        assert!(config.validate().is_ok());

        config.rpc_url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_keeps_defaults_for_missing_keys() {
        let path = std::env::temp_dir().join(format!("banksy-config-{}.json", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, r#"{{ "rpc_url": "http://devnet:8899", "commitment": "processed" }}"#).unwrap();

        let config = ClientConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.rpc_url, "http://devnet:8899");
        assert_eq!(config.commitment, "processed");
        assert_eq!(config.wallet_path, ClientConfig::default().wallet_path);
        assert!(config.banksy_program_id.is_none());
    }

    #[test]
    fn test_from_file_rejects_bad_json() {
        let path = std::env::temp_dir().join(format!("banksy-bad-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();

        let result = ClientConfig::from_file(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(BanksyError::Config(_))));
    }

    #[test]
    fn test_load_payer_reports_missing_wallet() {
        let config = ClientConfig {
            wallet_path: PathBuf::from("/nonexistent/banksy/id.json"),
            ..ClientConfig::default()
        };
        assert!(matches!(config.load_payer(), Err(BanksyError::Config(_))));
    }
}
