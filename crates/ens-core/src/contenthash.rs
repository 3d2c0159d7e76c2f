//! Content-hash record codec
//!
//! On chain a content hash is `<codec varint><payload>`, the codec naming
//! both the storage protocol and how the payload is laid out. This module
//! translates between that binary form and `<scheme>://<value>` URIs.
//!
//! Decoding never fails: malformed or unknown records come back as a
//! [`ContentHash`] with [`ProtocolType::Error`] and a diagnostic message, so
//! aggregate reads survive one bad record. Encoding reports
//! [`Error::UnsupportedScheme`] or [`Error::InvalidContent`].

use crate::cid::{self, Cid, Multihash};
use crate::{Error, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Length of a v2 onion address (without `.onion`)
pub const ONION_LENGTH: usize = 16;
/// Length of a v3 onion address (without `.onion`)
pub const ONION3_LENGTH: usize = 56;
/// Length of a skylink in base64url
pub const SKYLINK_LENGTH: usize = 46;
/// Length of an arweave transaction id in base64url
pub const ARWEAVE_LENGTH: usize = 43;

const ONION3_VERSION: u8 = 0x03;
const ONION3_CHECKSUM_PREFIX: &[u8] = b".onion checksum";

/// Storage protocol of a content record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolType {
    /// IPFS content
    Ipfs,
    /// IPNS name or key
    Ipns,
    /// Swarm manifest
    Bzz,
    /// Tor v2 hidden service
    Onion,
    /// Tor v3 hidden service
    Onion3,
    /// Skynet skylink
    Sia,
    /// Arweave transaction
    Arweave,
    /// Value from a resolver that predates content hashes
    OldContent,
    /// Record could not be read or decoded
    Error,
}

impl ProtocolType {
    /// URI scheme / display name
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolType::Ipfs => "ipfs",
            ProtocolType::Ipns => "ipns",
            ProtocolType::Bzz => "bzz",
            ProtocolType::Onion => "onion",
            ProtocolType::Onion3 => "onion3",
            ProtocolType::Sia => "sia",
            ProtocolType::Arweave => "arweave",
            ProtocolType::OldContent => "oldcontent",
            ProtocolType::Error => "error",
        }
    }

    fn codec(&self) -> Option<Codec> {
        match self {
            ProtocolType::Ipfs => Some(Codec::IpfsNs),
            ProtocolType::Ipns => Some(Codec::IpnsNs),
            ProtocolType::Bzz => Some(Codec::SwarmNs),
            ProtocolType::Onion => Some(Codec::Onion),
            ProtocolType::Onion3 => Some(Codec::Onion3),
            ProtocolType::Sia => Some(Codec::SkynetNs),
            ProtocolType::Arweave => Some(Codec::ArweaveNs),
            ProtocolType::OldContent | ProtocolType::Error => None,
        }
    }
}

impl fmt::Display for ProtocolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProtocolType {
    type Err = Error;

    /// Parse a URI scheme. `ar` is accepted as an alias of `arweave`.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ipfs" => Ok(ProtocolType::Ipfs),
            "ipns" => Ok(ProtocolType::Ipns),
            "bzz" => Ok(ProtocolType::Bzz),
            "onion" => Ok(ProtocolType::Onion),
            "onion3" => Ok(ProtocolType::Onion3),
            "sia" => Ok(ProtocolType::Sia),
            "arweave" | "ar" => Ok(ProtocolType::Arweave),
            other => Err(Error::UnsupportedScheme(other.to_string())),
        }
    }
}

/// Multicodec namespace prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Codec {
    IpfsNs,
    SwarmNs,
    IpnsNs,
    Onion,
    Onion3,
    SkynetNs,
    ArweaveNs,
}

impl Codec {
    const fn code(self) -> u64 {
        match self {
            Codec::IpfsNs => 0xe3,
            Codec::SwarmNs => 0xe4,
            Codec::IpnsNs => 0xe5,
            Codec::Onion => 0x01bc,
            Codec::Onion3 => 0x01bd,
            Codec::SkynetNs => 0xb19910,
            Codec::ArweaveNs => 0xb29910,
        }
    }

    fn from_code(code: u64) -> Option<Self> {
        [
            Codec::IpfsNs,
            Codec::SwarmNs,
            Codec::IpnsNs,
            Codec::Onion,
            Codec::Onion3,
            Codec::SkynetNs,
            Codec::ArweaveNs,
        ]
        .into_iter()
        .find(|c| c.code() == code)
    }

    fn protocol(self) -> ProtocolType {
        match self {
            Codec::IpfsNs => ProtocolType::Ipfs,
            Codec::SwarmNs => ProtocolType::Bzz,
            Codec::IpnsNs => ProtocolType::Ipns,
            Codec::Onion => ProtocolType::Onion,
            Codec::Onion3 => ProtocolType::Onion3,
            Codec::SkynetNs => ProtocolType::Sia,
            Codec::ArweaveNs => ProtocolType::Arweave,
        }
    }
}

/// Decoded content record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentHash {
    /// Storage protocol, or `error` / `oldcontent`
    pub protocol_type: ProtocolType,
    /// Protocol-specific text, or a diagnostic message for `error`
    pub decoded: String,
}

impl ContentHash {
    /// Build a decoded record
    pub fn new(protocol_type: ProtocolType, decoded: impl Into<String>) -> Self {
        Self {
            protocol_type,
            decoded: decoded.into(),
        }
    }

    /// Error-typed record carrying a diagnostic
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ProtocolType::Error, message)
    }

    /// Value read through a legacy `content(bytes32)` accessor; never run
    /// through the codec
    pub fn old_content(value: &[u8; 32]) -> Self {
        Self::new(ProtocolType::OldContent, format!("0x{}", hex::encode(value)))
    }

    /// True for error-typed records
    pub fn is_error(&self) -> bool {
        self.protocol_type == ProtocolType::Error
    }

    /// Browser-consumable `<protocol>://<value>`. Error and legacy records
    /// have no URI form.
    pub fn to_uri(&self) -> Option<String> {
        match self.protocol_type {
            ProtocolType::Error | ProtocolType::OldContent => None,
            protocol => Some(format!("{}://{}", protocol, self.decoded)),
        }
    }
}

/// Binary on-chain content hash
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EncodedContentHash(Vec<u8>);

impl EncodedContentHash {
    /// The empty record (clears the content hash)
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Wrap raw bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume into raw bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// True for the empty record
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `0x`-prefixed hex
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.0))
    }
}

impl fmt::Display for EncodedContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Split a content URI into protocol and value.
///
/// Accepts `<scheme>://<value>` and the gateway path forms `/ipfs/<cid>` and
/// `/ipns/<name>`.
pub fn parse_uri(uri: &str) -> Result<(ProtocolType, &str)> {
    if let Some(value) = uri.strip_prefix("/ipfs/") {
        return Ok((ProtocolType::Ipfs, value));
    }
    if let Some(value) = uri.strip_prefix("/ipns/") {
        return Ok((ProtocolType::Ipns, value));
    }
    let (scheme, value) = uri
        .split_once("://")
        .ok_or_else(|| Error::InvalidContent(format!("not a content URI: {}", uri)))?;
    Ok((scheme.parse()?, value))
}

/// Encode a content URI into its on-chain form
pub fn encode(uri: &str) -> Result<EncodedContentHash> {
    let (protocol, value) = parse_uri(uri)?;
    encode_value(protocol, value)
}

/// Encode a protocol value (the part after `://`)
pub fn encode_value(protocol: ProtocolType, value: &str) -> Result<EncodedContentHash> {
    let codec = protocol
        .codec()
        .ok_or_else(|| Error::UnsupportedScheme(protocol.to_string()))?;

    let payload = match codec {
        Codec::IpfsNs => Cid::parse(value)?.into_v1().to_bytes(),
        Codec::IpnsNs => encode_ipns(value)?,
        Codec::SwarmNs => encode_swarm(value)?,
        Codec::Onion => {
            validate_onion(value)?;
            value.as_bytes().to_vec()
        }
        Codec::Onion3 => {
            validate_onion3(value)?;
            value.as_bytes().to_vec()
        }
        Codec::SkynetNs => decode_base64_fixed(value, SKYLINK_LENGTH, "skylink")?,
        Codec::ArweaveNs => decode_base64_fixed(value, ARWEAVE_LENGTH, "arweave id")?,
    };

    let mut out = Vec::with_capacity(payload.len() + 4);
    cid::put_varint(&mut out, codec.code());
    out.extend_from_slice(&payload);
    Ok(EncodedContentHash(out))
}

/// Decode an on-chain content hash. Never fails; see [`ContentHash::error`].
pub fn decode(bytes: &[u8]) -> ContentHash {
    match try_decode(bytes) {
        Ok(content) => content,
        Err(e) => {
            debug!("Content hash decode failed: {}", e);
            ContentHash::error(e.to_string())
        }
    }
}

/// True if `bytes` decodes to a known protocol
pub fn is_valid_content_hash(bytes: &[u8]) -> bool {
    try_decode(bytes).is_ok()
}

fn try_decode(bytes: &[u8]) -> Result<ContentHash> {
    if bytes.is_empty() {
        return Err(Error::InvalidContent("empty content hash".to_string()));
    }
    let (code, payload) = cid::take_varint(bytes)?;
    let codec = Codec::from_code(code)
        .ok_or_else(|| Error::InvalidContent(format!("unknown codec 0x{:x}", code)))?;

    let decoded = match codec {
        Codec::IpfsNs => {
            let cid = Cid::from_bytes(payload)?;
            if cid.is_v0_compatible() {
                cid.multihash.to_base58()
            } else {
                cid.to_base32()
            }
        }
        Codec::IpnsNs => decode_ipns(payload)?,
        Codec::SwarmNs => {
            let cid = Cid::from_bytes(payload)?;
            if cid.multihash.code != cid::KECCAK_256 || cid.multihash.digest.len() != 32 {
                return Err(Error::InvalidContent(
                    "swarm reference must be a 32-byte keccak-256 hash".to_string(),
                ));
            }
            hex::encode(&cid.multihash.digest)
        }
        Codec::Onion => {
            let text = utf8(payload)?;
            validate_onion(&text)?;
            text
        }
        Codec::Onion3 => {
            let text = utf8(payload)?;
            validate_onion3(&text)?;
            text
        }
        Codec::SkynetNs => encode_base64_fixed(payload, SKYLINK_LENGTH, "skylink")?,
        Codec::ArweaveNs => encode_base64_fixed(payload, ARWEAVE_LENGTH, "arweave id")?,
    };

    Ok(ContentHash::new(codec.protocol(), decoded))
}

fn utf8(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|_| Error::InvalidContent("payload is not UTF-8".to_string()))
}

/// DNSLink names are stored as an identity multihash of their text; keys
/// and peer ids as their own multihash.
fn encode_ipns(value: &str) -> Result<Vec<u8>> {
    let multihash = if value.contains('.') {
        Multihash::new(cid::IDENTITY, value.as_bytes().to_vec())
    } else if value.starts_with('b') || value.starts_with('z') {
        Cid::parse(value)?.multihash
    } else {
        Multihash::from_base58(value)?
    };
    Ok(Cid::new_v1(cid::LIBP2P_KEY, multihash).to_bytes())
}

fn decode_ipns(payload: &[u8]) -> Result<String> {
    let cid = Cid::from_bytes(payload)?;
    if cid.multihash.code == cid::IDENTITY {
        if let Ok(text) = std::str::from_utf8(&cid.multihash.digest) {
            if is_dnslink_name(text) {
                return Ok(text.to_string());
            }
        }
    }
    Ok(cid.multihash.to_base58())
}

fn is_dnslink_name(text: &str) -> bool {
    text.contains('.')
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_')
}

fn encode_swarm(value: &str) -> Result<Vec<u8>> {
    if value.len() != 64 {
        return Err(Error::InvalidContent(format!(
            "swarm reference must be 64 hex characters: {}",
            value
        )));
    }
    let digest = hex::decode(value)
        .map_err(|e| Error::InvalidContent(format!("invalid swarm reference: {}", e)))?;
    let multihash = Multihash::new(cid::KECCAK_256, digest);
    Ok(Cid::new_v1(cid::SWARM_MANIFEST, multihash).to_bytes())
}

fn is_base32_alphabet(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_ascii_lowercase() || ('2'..='7').contains(&c))
}

fn validate_onion(value: &str) -> Result<()> {
    if value.len() != ONION_LENGTH || !is_base32_alphabet(value) {
        return Err(Error::InvalidContent(format!(
            "onion address must be {} base32 characters: {}",
            ONION_LENGTH, value
        )));
    }
    Ok(())
}

fn validate_onion3(value: &str) -> Result<()> {
    if value.len() != ONION3_LENGTH || !is_base32_alphabet(value) {
        return Err(Error::InvalidContent(format!(
            "onion3 address must be {} base32 characters: {}",
            ONION3_LENGTH, value
        )));
    }
    let raw = cid::base32_decode(value)?;
    // pubkey (32) || checksum (2) || version (1)
    if raw.len() != 35 || raw[34] != ONION3_VERSION {
        return Err(Error::InvalidContent(format!(
            "onion3 address has wrong version: {}",
            value
        )));
    }
    let mut hasher = Sha3_256::new();
    hasher.update(ONION3_CHECKSUM_PREFIX);
    hasher.update(&raw[..32]);
    hasher.update([ONION3_VERSION]);
    let digest = hasher.finalize();
    if digest[..2] != raw[32..34] {
        return Err(Error::InvalidContent(format!(
            "onion3 address checksum mismatch: {}",
            value
        )));
    }
    Ok(())
}

fn decode_base64_fixed(value: &str, text_len: usize, what: &str) -> Result<Vec<u8>> {
    if value.len() != text_len {
        return Err(Error::InvalidContent(format!(
            "{} must be {} characters: {}",
            what, text_len, value
        )));
    }
    URL_SAFE_NO_PAD
        .decode(value)
        .map_err(|e| Error::InvalidContent(format!("invalid {}: {}", what, e)))
}

fn encode_base64_fixed(payload: &[u8], text_len: usize, what: &str) -> Result<String> {
    let text = URL_SAFE_NO_PAD.encode(payload);
    if text.len() != text_len {
        return Err(Error::InvalidContent(format!(
            "{} payload has wrong length: {} bytes",
            what,
            payload.len()
        )));
    }
    Ok(text)
}
