//! Solana JSON-RPC client implementation.

use super::{DataSourceError, LedgerSource};
use crate::domain::{
    Address, BalanceMeta, BlockTime, Decimal, ParsedTransaction, Signature, SignatureInfo,
    TokenBalance,
};
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Ledger source speaking Solana's HTTP JSON-RPC.
#[derive(Debug, Clone)]
pub struct SolanaRpcSource {
    client: Client,
    rpc_url: String,
}

impl SolanaRpcSource {
    pub fn new(rpc_url: String) -> Self {
        Self {
            client: Client::new(),
            rpc_url,
        }
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, DataSourceError> {
        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(30)),
            ..Default::default()
        };

        let body = retry(backoff, || async {
            let response = self
                .client
                .post(&self.rpc_url)
                .json(&payload)
                .send()
                .await
                .map_err(|e| {
                    backoff::Error::transient(DataSourceError::NetworkError(e.to_string()))
                })?;

            let status = response.status();
            if status == 429 {
                return Err(backoff::Error::transient(DataSourceError::RateLimited));
            }
            if status.is_server_error() {
                return Err(backoff::Error::transient(DataSourceError::HttpError {
                    status: status.as_u16(),
                    message: "Server error".to_string(),
                }));
            }
            if !status.is_success() {
                return Err(backoff::Error::permanent(DataSourceError::HttpError {
                    status: status.as_u16(),
                    message: "Client error".to_string(),
                }));
            }

            response
                .json::<Value>()
                .await
                .map_err(|e| backoff::Error::permanent(DataSourceError::ParseError(e.to_string())))
        })
        .await?;

        unwrap_rpc_result(body)
    }
}

#[async_trait]
impl LedgerSource for SolanaRpcSource {
    async fn fetch_signatures(
        &self,
        address: &Address,
        before: Option<&Signature>,
        limit: usize,
    ) -> Result<Vec<SignatureInfo>, DataSourceError> {
        debug!(address = %address, before = ?before, limit, "getSignaturesForAddress");

        let mut options = serde_json::json!({
            "limit": limit,
            "commitment": "confirmed",
        });
        if let Some(before) = before {
            options["before"] = Value::String(before.as_str().to_string());
        }

        let result = self
            .call(
                "getSignaturesForAddress",
                serde_json::json!([address.as_str(), options]),
            )
            .await?;

        let entries = result
            .as_array()
            .ok_or_else(|| DataSourceError::ParseError("Expected array result".to_string()))?;

        let mut signatures = Vec::with_capacity(entries.len());
        for entry in entries {
            match parse_signature_info(entry) {
                Ok(info) => signatures.push(info),
                Err(e) => warn!("Failed to parse signature entry: {}", e),
            }
        }
        Ok(signatures)
    }

    async fn fetch_transaction(
        &self,
        signature: &Signature,
    ) -> Result<Option<ParsedTransaction>, DataSourceError> {
        let result = self
            .call(
                "getTransaction",
                serde_json::json!([
                    signature.as_str(),
                    {
                        "encoding": "json",
                        "commitment": "confirmed",
                        "maxSupportedTransactionVersion": 0
                    }
                ]),
            )
            .await?;

        if result.is_null() {
            return Ok(None);
        }
        parse_transaction(signature, &result).map(Some)
    }
}

fn unwrap_rpc_result(mut body: Value) -> Result<Value, DataSourceError> {
    if let Some(err) = body.get("error") {
        let code = err.get("code").and_then(|v| v.as_i64()).unwrap_or_default();
        let message = err
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown")
            .to_string();
        return Err(DataSourceError::RpcError { code, message });
    }
    body.get_mut("result")
        .map(Value::take)
        .ok_or_else(|| DataSourceError::ParseError("Missing result field".to_string()))
}

fn parse_signature_info(entry: &Value) -> Result<SignatureInfo, DataSourceError> {
    let signature = entry
        .get("signature")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DataSourceError::ParseError("Missing signature field".to_string()))?;
    let slot = entry
        .get("slot")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| DataSourceError::ParseError("Missing slot field".to_string()))?;
    let block_time = entry
        .get("blockTime")
        .and_then(|v| v.as_i64())
        .map(BlockTime::new);
    let failed = entry.get("err").is_some_and(|v| !v.is_null());

    Ok(SignatureInfo {
        signature: Signature::new(signature),
        slot,
        block_time,
        failed,
    })
}

fn parse_transaction(
    signature: &Signature,
    result: &Value,
) -> Result<ParsedTransaction, DataSourceError> {
    let slot = result
        .get("slot")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| DataSourceError::ParseError("Missing slot field".to_string()))?;
    let block_time = result
        .get("blockTime")
        .and_then(|v| v.as_i64())
        .map(BlockTime::new);

    let mut account_keys = result
        .pointer("/transaction/message/accountKeys")
        .and_then(|v| v.as_array())
        .map(|keys| keys.iter().filter_map(parse_account_key).collect::<Vec<_>>())
        .unwrap_or_default();

    let meta = match result.get("meta") {
        Some(meta) if !meta.is_null() => {
            for group in ["writable", "readonly"] {
                if let Some(loaded) = meta
                    .get("loadedAddresses")
                    .and_then(|l| l.get(group))
                    .and_then(|v| v.as_array())
                {
                    account_keys.extend(loaded.iter().filter_map(parse_account_key));
                }
            }
            parse_balance_meta(meta)?
        }
        _ => None,
    };

    Ok(ParsedTransaction {
        signature: signature.clone(),
        slot,
        block_time,
        meta,
        account_keys,
    })
}

/// Account keys are bare strings in `json` encoding and `{pubkey, ..}` objects in `jsonParsed`.
fn parse_account_key(key: &Value) -> Option<Address> {
    key.as_str()
        .or_else(|| key.get("pubkey").and_then(|v| v.as_str()))
        .map(Address::new)
}

/// A meta without both lamport snapshots is treated as absent, leaving the record incomplete.
fn parse_balance_meta(meta: &Value) -> Result<Option<BalanceMeta>, DataSourceError> {
    let (Some(pre_balances), Some(post_balances)) = (
        parse_lamports(meta, "preBalances")?,
        parse_lamports(meta, "postBalances")?,
    ) else {
        return Ok(None);
    };
    Ok(Some(BalanceMeta {
        pre_balances,
        post_balances,
        pre_token_balances: parse_token_balances(meta, "preTokenBalances")?,
        post_token_balances: parse_token_balances(meta, "postTokenBalances")?,
    }))
}

fn parse_lamports(meta: &Value, field: &str) -> Result<Option<Vec<u64>>, DataSourceError> {
    let Some(values) = meta.get(field).and_then(|v| v.as_array()) else {
        return Ok(None);
    };
    values
        .iter()
        .map(|v| {
            v.as_u64()
                .ok_or_else(|| DataSourceError::ParseError(format!("Invalid {} entry", field)))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

fn parse_token_balances(meta: &Value, field: &str) -> Result<Vec<TokenBalance>, DataSourceError> {
    let Some(values) = meta.get(field).and_then(|v| v.as_array()) else {
        return Ok(Vec::new());
    };
    values.iter().map(parse_token_balance).collect()
}

fn parse_token_balance(entry: &Value) -> Result<TokenBalance, DataSourceError> {
    let account_index = entry
        .get("accountIndex")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| DataSourceError::ParseError("Missing accountIndex field".to_string()))?
        as usize;
    let mint = entry
        .get("mint")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DataSourceError::ParseError("Missing mint field".to_string()))?;
    let owner = entry.get("owner").and_then(|v| v.as_str()).map(Address::new);
    let ui_amount = parse_ui_token_amount(
        entry
            .get("uiTokenAmount")
            .ok_or_else(|| DataSourceError::ParseError("Missing uiTokenAmount field".to_string()))?,
    )?;

    Ok(TokenBalance {
        account_index,
        mint: Address::new(mint),
        owner,
        ui_amount,
    })
}

/// Prefer the exact raw `amount` scaled by `decimals`; fall back to `uiAmountString`.
/// The float `uiAmount` field is never read.
fn parse_ui_token_amount(amount: &Value) -> Result<Decimal, DataSourceError> {
    let raw = amount
        .get("amount")
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse::<u64>().ok());
    let decimals = amount
        .get("decimals")
        .and_then(|v| v.as_u64())
        .and_then(|d| u32::try_from(d).ok());

    if let (Some(raw), Some(decimals)) = (raw, decimals) {
        if let Ok(value) = Decimal::from_base_units(i128::from(raw), decimals) {
            return Ok(value);
        }
    }

    let ui = amount
        .get("uiAmountString")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DataSourceError::ParseError("Missing token amount".to_string()))?;
    Decimal::from_str_canonical(ui)
        .map_err(|e| DataSourceError::ParseError(format!("Invalid uiAmountString: {}", e)))
}
