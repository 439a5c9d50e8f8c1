use crate::domain::Address;
use crate::engine::LAMPORT_DECIMALS;
use crate::ingest::{DEFAULT_BATCH_SIZE, DEFAULT_PAGE_SIZE};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub token_mint: Address,
    pub wallet: Option<Address>,
    pub run_mode: RunMode,
    /// Account whose signature index is walked.
    /// Falls back per mode, see [`Config::history_account`].
    pub scan_account: Option<Address>,
    pub page_size: usize,
    pub batch_size: usize,
    pub base_decimals: u32,
    pub output_path: PathBuf,
    pub trades_csv_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// FIFO PnL for one wallet.
    Pnl,
    /// Distinct holder discovery for the token.
    Holders,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let rpc_url = required(&env_map, "RPC_URL")?;
        let token_mint = Address::new(required(&env_map, "TOKEN_MINT")?);

        let run_mode = match env_map
            .get("RUN_MODE")
            .map(|s| s.as_str())
            .unwrap_or("pnl")
        {
            "pnl" => RunMode::Pnl,
            "holders" => RunMode::Holders,
            other => {
                return Err(ConfigError::InvalidValue(
                    "RUN_MODE".to_string(),
                    format!("must be pnl or holders, got {}", other),
                ))
            }
        };

        let wallet = optional(&env_map, "WALLET_ADDRESS").map(Address::new);
        if run_mode == RunMode::Pnl && wallet.is_none() {
            return Err(ConfigError::MissingEnv("WALLET_ADDRESS".to_string()));
        }

        let scan_account = optional(&env_map, "SCAN_ACCOUNT").map(Address::new);

        let page_size = parse_or(&env_map, "PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        if !(1..=DEFAULT_PAGE_SIZE).contains(&page_size) {
            return Err(ConfigError::InvalidValue(
                "PAGE_SIZE".to_string(),
                format!("must be between 1 and {}", DEFAULT_PAGE_SIZE),
            ));
        }

        let batch_size = parse_or(&env_map, "BATCH_SIZE", DEFAULT_BATCH_SIZE)?;
        if batch_size == 0 {
            return Err(ConfigError::InvalidValue(
                "BATCH_SIZE".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let base_decimals = parse_or(&env_map, "BASE_DECIMALS", LAMPORT_DECIMALS)?;
        if base_decimals > 28 {
            return Err(ConfigError::InvalidValue(
                "BASE_DECIMALS".to_string(),
                "must be at most 28".to_string(),
            ));
        }

        let output_path = optional(&env_map, "OUTPUT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("holders.txt"));
        let trades_csv_path = optional(&env_map, "TRADES_CSV_PATH").map(PathBuf::from);

        Ok(Config {
            rpc_url,
            token_mint,
            wallet,
            run_mode,
            scan_account,
            page_size,
            batch_size,
            base_decimals,
            output_path,
            trades_csv_path,
        })
    }

    /// Account whose history is paged: `SCAN_ACCOUNT` if set, otherwise the
    /// wallet in pnl mode and the mint in holders mode.
    pub fn history_account(&self) -> &Address {
        if let Some(account) = &self.scan_account {
            return account;
        }
        match (self.run_mode, &self.wallet) {
            (RunMode::Pnl, Some(wallet)) => wallet,
            _ => &self.token_mint,
        }
    }
}

fn optional(env_map: &HashMap<String, String>, key: &str) -> Option<String> {
    env_map
        .get(key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn required(env_map: &HashMap<String, String>, key: &str) -> Result<String, ConfigError> {
    optional(env_map, key).ok_or_else(|| ConfigError::MissingEnv(key.to_string()))
}

fn parse_or<T: std::str::FromStr>(
    env_map: &HashMap<String, String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match optional(env_map, key) {
        Some(raw) => raw.parse::<T>().map_err(|_| {
            ConfigError::InvalidValue(key.to_string(), format!("cannot parse {:?}", raw))
        }),
        None => Ok(default),
    }
}
