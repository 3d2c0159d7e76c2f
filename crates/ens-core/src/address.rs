//! Account and contract addresses
//!
//! A thin wrapper over [`alloy_primitives::Address`]. The all-zero address is
//! the registry's "unset" sentinel for owners and resolvers. Display is
//! lowercase `0x` hex so reverse-node names and logs stay stable.

use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Address length in bytes
pub const ADDRESS_LENGTH: usize = 20;

/// 20-byte ledger address
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(alloy_primitives::Address);

impl Address {
    /// The zero address (empty owner / no resolver)
    pub const ZERO: Self = Self(alloy_primitives::Address::ZERO);

    /// Wrap raw bytes
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(alloy_primitives::Address::new(bytes))
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0 .0 .0
    }

    /// The underlying alloy address
    pub fn into_inner(self) -> alloy_primitives::Address {
        self.0
    }

    /// True for the zero sentinel
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Build from a byte slice of exactly 20 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; ADDRESS_LENGTH] = bytes.try_into().map_err(|_| {
            Error::InvalidAddress(format!("expected 20 bytes, got {}", bytes.len()))
        })?;
        Ok(Self::new(raw))
    }

    /// Parse a hex address, with or without `0x`, in any letter case.
    ///
    /// Mixed-case input is not checksum-verified.
    pub fn parse(text: &str) -> Result<Self> {
        alloy_primitives::Address::from_str(text)
            .map(Self)
            .map_err(|e| Error::InvalidAddress(format!("{}: {}", text, e)))
    }

    /// Lowercase hex without the `0x` prefix
    pub fn to_hex_unprefixed(&self) -> String {
        hex::encode(self.as_bytes())
    }

    /// EIP-55 mixed-case checksum rendering
    pub fn to_checksum(&self) -> String {
        self.0.to_checksum(None)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex_unprefixed())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<[u8; ADDRESS_LENGTH]> for Address {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self::new(bytes)
    }
}

impl From<alloy_primitives::Address> for Address {
    fn from(inner: alloy_primitives::Address) -> Self {
        Self(inner)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let addr: Address = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse().unwrap();
        assert_eq!(
            addr.to_string(),
            "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"
        );
        assert_eq!(Address::parse("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap(), addr);
    }

    #[test]
    fn test_checksum() {
        let addr = Address::parse("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        assert_eq!(addr.to_checksum(), "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");

        let addr = Address::parse("0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359").unwrap();
        assert_eq!(addr.to_checksum(), "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359");
    }

    #[test]
    fn test_zero() {
        assert!(Address::ZERO.is_zero());
        assert!(Address::default().is_zero());
        assert_eq!(
            Address::ZERO.to_string(),
            "0x0000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn test_invalid() {
        assert!(Address::parse("0x0").is_err());
        assert!(Address::parse("0xzz00000000000000000000000000000000000000").is_err());
        assert!(Address::from_slice(&[1u8; 19]).is_err());
        assert!(Address::parse("").is_err());
    }

    #[test]
    fn test_alloy_interop() {
        let inner = alloy_primitives::Address::repeat_byte(0x42);
        let addr = Address::from(inner);
        assert_eq!(addr.as_bytes(), &[0x42; 20]);
        assert_eq!(addr.into_inner(), inner);
        assert_eq!(addr.to_checksum(), inner.to_checksum(None));
    }

    #[test]
    fn test_serde() {
        let addr = Address::new([0xab; 20]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", addr));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
