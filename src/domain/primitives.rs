//! Domain primitives: BlockTime, Address, Signature, Side, Currency.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Block time in seconds since Unix epoch, as reported by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockTime(pub i64);

impl BlockTime {
    /// Create a BlockTime from unix seconds.
    pub fn new(secs: i64) -> Self {
        BlockTime(secs)
    }

    /// Get the underlying seconds value.
    pub fn as_secs(&self) -> i64 {
        self.0
    }

    /// Render as a UTC timestamp, if representable.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.0, 0).single()
    }
}

/// Base58 account address (wallet, token account, or mint).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub String);

impl Address {
    /// Create an Address from a string.
    pub fn new(addr: impl Into<String>) -> Self {
        Address(addr.into())
    }

    /// Get the address as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transaction signature. Doubles as the pagination cursor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Signature(pub String);

impl Signature {
    pub fn new(sig: impl Into<String>) -> Self {
        Signature(sig.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trade side: Buy or Sell of the target token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Token balance increased.
    Buy,
    /// Token balance decreased.
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// Which balance grouping a delta belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    /// The token under analysis.
    Token,
    /// The settlement currency (native coin).
    Base,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_serialization() {
        assert_eq!(serde_json::to_string(&Side::Buy).unwrap(), "\"buy\"");
        assert_eq!(serde_json::to_string(&Side::Sell).unwrap(), "\"sell\"");
    }

    #[test]
    fn test_address_display() {
        let addr = Address::new("So11111111111111111111111111111111111111112");
        assert_eq!(addr.to_string(), "So11111111111111111111111111111111111111112");
    }

    #[test]
    fn test_block_time_ordering() {
        assert!(BlockTime::new(1000) < BlockTime::new(2000));
    }

    #[test]
    fn test_block_time_to_utc() {
        let dt = BlockTime::new(0).to_utc().unwrap();
        assert_eq!(dt.to_rfc3339(), "1970-01-01T00:00:00+00:00");
        assert!(BlockTime::new(i64::MAX).to_utc().is_none());
    }
}
