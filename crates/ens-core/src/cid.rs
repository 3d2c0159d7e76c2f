//! Content identifiers and multihashes
//!
//! Just enough of the multiformats family to carry content-hash payloads:
//! unsigned varints, multihashes, CIDv0/CIDv1 and the base58btc / base32
//! text forms.

use crate::{Error, Result};
use data_encoding::BASE32_NOPAD;

/// dag-pb content codec
pub const DAG_PB: u64 = 0x70;
/// libp2p public key codec
pub const LIBP2P_KEY: u64 = 0x72;
/// swarm manifest codec
pub const SWARM_MANIFEST: u64 = 0xfa;

/// identity "hash" (digest is the data itself)
pub const IDENTITY: u64 = 0x00;
/// sha2-256 multihash code
pub const SHA2_256: u64 = 0x12;
/// keccak-256 multihash code
pub const KECCAK_256: u64 = 0x1b;

/// Append `value` as an unsigned varint
pub(crate) fn put_varint(out: &mut Vec<u8>, value: u64) {
    let mut buf = unsigned_varint::encode::u64_buffer();
    out.extend_from_slice(unsigned_varint::encode::u64(value, &mut buf));
}

/// Read an unsigned varint off the front of `bytes`
pub(crate) fn take_varint(bytes: &[u8]) -> Result<(u64, &[u8])> {
    unsigned_varint::decode::u64(bytes)
        .map_err(|e| Error::InvalidContent(format!("invalid varint: {}", e)))
}

/// Lowercase, unpadded RFC 4648 base32
pub(crate) fn base32_encode(bytes: &[u8]) -> String {
    BASE32_NOPAD.encode(bytes).to_ascii_lowercase()
}

/// Decode lowercase, unpadded base32
pub(crate) fn base32_decode(text: &str) -> Result<Vec<u8>> {
    if text.bytes().any(|b| b.is_ascii_uppercase()) {
        return Err(Error::InvalidContent(format!(
            "base32 text must be lowercase: {}",
            text
        )));
    }
    BASE32_NOPAD
        .decode(text.to_ascii_uppercase().as_bytes())
        .map_err(|e| Error::InvalidContent(format!("invalid base32: {}", e)))
}

/// Self-describing hash: `<code varint><length varint><digest>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Multihash {
    /// Hash function code
    pub code: u64,
    /// Digest bytes
    pub digest: Vec<u8>,
}

impl Multihash {
    /// Wrap a digest
    pub fn new(code: u64, digest: Vec<u8>) -> Self {
        Self { code, digest }
    }

    /// Read a multihash off the front of `bytes`, returning the rest
    pub fn read(bytes: &[u8]) -> Result<(Self, &[u8])> {
        let (code, rest) = take_varint(bytes)?;
        let (len, rest) = take_varint(rest)?;
        let len = usize::try_from(len)
            .map_err(|_| Error::InvalidContent("multihash length overflow".to_string()))?;
        if rest.len() < len {
            return Err(Error::InvalidContent(format!(
                "truncated multihash: declared {} bytes, found {}",
                len,
                rest.len()
            )));
        }
        let (digest, rest) = rest.split_at(len);
        Ok((Self::new(code, digest.to_vec()), rest))
    }

    /// Parse a complete multihash with no trailing bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (mh, rest) = Self::read(bytes)?;
        if !rest.is_empty() {
            return Err(Error::InvalidContent(format!(
                "{} trailing bytes after multihash",
                rest.len()
            )));
        }
        Ok(mh)
    }

    /// Binary form
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.digest.len() + 4);
        put_varint(&mut out, self.code);
        put_varint(&mut out, self.digest.len() as u64);
        out.extend_from_slice(&self.digest);
        out
    }

    /// base58btc of the binary form (the legacy `Qm…` / peer-id text)
    pub fn to_base58(&self) -> String {
        bs58::encode(self.to_bytes()).into_string()
    }

    /// Parse base58btc multihash text
    pub fn from_base58(text: &str) -> Result<Self> {
        let bytes = bs58::decode(text)
            .into_vec()
            .map_err(|e| Error::InvalidContent(format!("invalid base58: {}", e)))?;
        Self::from_bytes(&bytes)
    }
}

/// Content identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cid {
    /// CID version (0 or 1)
    pub version: u64,
    /// Content codec
    pub codec: u64,
    /// Content multihash
    pub multihash: Multihash,
}

impl Cid {
    /// Build a version-1 CID
    pub fn new_v1(codec: u64, multihash: Multihash) -> Self {
        Self {
            version: 1,
            codec,
            multihash,
        }
    }

    /// Upgrade to version 1, keeping codec and multihash
    pub fn into_v1(self) -> Self {
        Self { version: 1, ..self }
    }

    /// True for dag-pb content addressed by a 32-byte sha2-256 digest,
    /// which is exactly what a CIDv0 can express
    pub fn is_v0_compatible(&self) -> bool {
        self.codec == DAG_PB
            && self.multihash.code == SHA2_256
            && self.multihash.digest.len() == 32
    }

    /// Parse CID text: CIDv0 (`Qm…`), or multibase base32 (`b…`) / base58btc (`z…`) CIDv1
    pub fn parse(text: &str) -> Result<Self> {
        if text.len() == 46 && text.starts_with("Qm") {
            let multihash = Multihash::from_base58(text)?;
            return Ok(Self {
                version: 0,
                codec: DAG_PB,
                multihash,
            });
        }
        let bytes = match text.chars().next() {
            Some('b') => base32_decode(&text[1..])?,
            Some('z') => bs58::decode(&text[1..])
                .into_vec()
                .map_err(|e| Error::InvalidContent(format!("invalid base58: {}", e)))?,
            _ => {
                return Err(Error::InvalidContent(format!(
                    "unrecognized CID encoding: {}",
                    text
                )))
            }
        };
        Self::from_bytes(&bytes)
    }

    /// Parse a binary CID. A bare 34-byte sha2-256 multihash is read as CIDv0.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() == 34 && bytes[0] == SHA2_256 as u8 && bytes[1] == 32 {
            return Ok(Self {
                version: 0,
                codec: DAG_PB,
                multihash: Multihash::from_bytes(bytes)?,
            });
        }
        let (version, rest) = take_varint(bytes)?;
        if version != 1 {
            return Err(Error::InvalidContent(format!(
                "unsupported CID version {}",
                version
            )));
        }
        let (codec, rest) = take_varint(rest)?;
        let multihash = Multihash::from_bytes(rest)?;
        Ok(Self::new_v1(codec, multihash))
    }

    /// Binary form. Always CIDv1 layout, as stored on chain.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        put_varint(&mut out, 1);
        put_varint(&mut out, self.codec);
        out.extend_from_slice(&self.multihash.to_bytes());
        out
    }

    /// Multibase base32 text of the CIDv1 form
    pub fn to_base32(&self) -> String {
        format!("b{}", base32_encode(&self.to_bytes()))
    }
}
