//! Hex encode/decode for the 32-byte ids that appear in URL path and
//! query segments — request/response *bodies* reuse the domain types'
//! own `Serialize`/`Deserialize` derives directly (see `http.rs`), but a
//! path segment has to be a plain string.

use crate::error::ApiError;
use ocs_service::OcsError;
use ocs_types::Hash;

/// Decode a `<hex>` path/query segment into a 32-byte id.
pub fn decode_hash(s: &str) -> Result<Hash, ApiError> {
    let bytes = hex::decode(s)
        .map_err(|e| ApiError(OcsError::BadRequest(format!("invalid hex: {e}"))))?;
    bytes
        .try_into()
        .map_err(|v: Vec<u8>| ApiError(OcsError::BadRequest(format!("expected 32 bytes, got {}", v.len()))))
}

/// Encode a 32-byte id as lowercase hex, for inclusion in a JSON body.
pub fn encode_hash(h: &Hash) -> String {
    hex::encode(h)
}
