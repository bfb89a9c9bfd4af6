use sha2::{Digest, Sha256};

/// 32 random bytes, hex encoded.
pub fn generate_opaque_token() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

/// Tokens are stored by digest; the raw value only ever leaves the server.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
