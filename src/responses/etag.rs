// responses/etag.rs
use base64::Engine;
use sha2::{Digest, Sha256};

/// Strong ETag for a response body: quoted base64url SHA-256, no padding.
pub fn etag_for(body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body);
    let digest = hasher.finalize();
    format!(
        "\"{}\"",
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(digest)
    )
}
