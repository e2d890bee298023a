/// Identifier minting for shared documents
///
/// Two schemes are supported: a random lowercase alphanumeric id (optionally
/// suffixed with the creation time in base 36), or the trailing characters of
/// the URL-safe base64 encoding of the whole payload. Neither guarantees
/// uniqueness; [`crate::DocumentStore::create`] overwrites on collision.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use snote_core::{DocId, Error, IdScheme, Result, Timestamp};

/// Characters used by random identifiers
pub const ID_ALPHABET: [char; 36] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm',
    'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Longest identifier accepted from a link
pub const MAX_ID_LEN: usize = 256;

lazy_static! {
    static ref ID_PATTERN: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
}

#[derive(Serialize)]
struct EncodedPayload<'a> {
    title: &'a str,
    content: &'a str,
    timestamp: Timestamp,
}

/// Mints identifiers according to an [`IdScheme`]
#[derive(Debug, Clone, Copy)]
pub struct IdGenerator {
    scheme: IdScheme,
}

impl IdGenerator {
    pub fn new(scheme: IdScheme) -> Self {
        Self { scheme }
    }

    pub fn scheme(&self) -> IdScheme {
        self.scheme
    }

    /// Mint an identifier for a document about to be shared
    pub fn generate(&self, title: &str, content: &str, timestamp: Timestamp) -> Result<DocId> {
        let id = match self.scheme {
            IdScheme::Random { length, timestamp_suffix } => {
                let mut id = nanoid::nanoid!(length, &ID_ALPHABET);
                if timestamp_suffix {
                    id.push_str(&to_base36(timestamp.max(0) as u64));
                }
                id
            }
            IdScheme::Encoded { length } => {
                let encoded = encode_payload(title, content, timestamp)?;
                encoded_window(&encoded, length).to_string()
            }
        };

        Ok(DocId::from(id))
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(IdScheme::default())
    }
}

/// URL-safe base64 (no padding) of the whole `{title, content, timestamp}` payload
pub fn encode_payload(title: &str, content: &str, timestamp: Timestamp) -> Result<String> {
    let payload = serde_json::to_string(&EncodedPayload { title, content, timestamp })?;
    Ok(URL_SAFE_NO_PAD.encode(payload.as_bytes()))
}

/// The trailing `length` characters of an encoded payload
///
/// The head only encodes the constant `{"title":` prefix, so identifiers are
/// cut from the tail. Widening the window takes in more of the payload.
pub fn encoded_window(encoded: &str, length: usize) -> &str {
    // Base64 output is ASCII, so any byte offset is a char boundary
    &encoded[encoded.len().saturating_sub(length)..]
}

/// Lowercase base-36 rendering of `n`
pub fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while n > 0 {
        digits.push(ID_ALPHABET[(n % 36) as usize]);
        n /= 36;
    }
    digits.iter().rev().collect()
}

/// Check that `id` could have been minted by some scheme
pub fn validate_id(id: &str) -> Result<DocId> {
    if id.is_empty() {
        return Err(Error::InvalidIdentifier("empty identifier".to_string()));
    }

    if id.len() > MAX_ID_LEN {
        return Err(Error::InvalidIdentifier(format!(
            "identifier is {} characters, limit is {}",
            id.len(),
            MAX_ID_LEN
        )));
    }

    if !ID_PATTERN.is_match(id) {
        return Err(Error::InvalidIdentifier(format!("unexpected characters in {:?}", id)));
    }

    Ok(DocId::from(id))
}
