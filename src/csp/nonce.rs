//! Per-response nonces for inline scripts and styles

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use rand::prelude::*;

/// Size of a generated nonce in bytes (128 bits)
pub const NONCE_LEN: usize = 16;

/// Fresh random nonce, base64 encoded
pub fn generate_nonce() -> String {
    let mut bytes = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut bytes);
    BASE64_STANDARD.encode(bytes)
}
