//! Opaque cursor tokens.
//!
//! A cursor wraps an arbitrary serialisable key. Clients treat the encoded
//! token as opaque; the server decodes it back into the key type it issued.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors raised while encoding or decoding cursor tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    /// The token is not valid unpadded base64url.
    #[error("cursor is not valid base64url: {message}")]
    Encoding {
        /// Decoder failure description.
        message: String,
    },
    /// The decoded bytes do not describe the expected key shape.
    #[error("cursor payload is malformed: {message}")]
    Payload {
        /// Parser failure description.
        message: String,
    },
}

/// Opaque pagination cursor carrying a typed key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor<K> {
    key: K,
}

impl<K> Cursor<K> {
    /// Wrap a key in a cursor.
    pub const fn new(key: K) -> Self {
        Self { key }
    }

    /// Borrow the wrapped key.
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// Consume the cursor and return the key.
    pub fn into_inner(self) -> K {
        self.key
    }
}

impl<K> Cursor<K>
where
    K: Serialize,
{
    /// Encode the cursor as an unpadded base64url token.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Payload`] when the key cannot be serialised.
    pub fn encode(&self) -> Result<String, CursorError> {
        let json = serde_json::to_vec(&self.key).map_err(|err| CursorError::Payload {
            message: err.to_string(),
        })?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }
}

impl<K> Cursor<K>
where
    K: DeserializeOwned,
{
    /// Decode a token previously produced by [`Cursor::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Encoding`] for non-base64url input and
    /// [`CursorError::Payload`] when the JSON does not match `K`.
    pub fn decode(token: &str) -> Result<Self, CursorError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|err| CursorError::Encoding {
                message: err.to_string(),
            })?;
        let key = serde_json::from_slice(&bytes).map_err(|err| CursorError::Payload {
            message: err.to_string(),
        })?;
        Ok(Self { key })
    }
}
