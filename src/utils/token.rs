use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::rngs::OsRng;
use rand::RngCore;

/// Entropy per QR token. 24 bytes encodes to a 32-character URL-safe string
/// that fits directly in a QR payload.
pub const QR_TOKEN_BYTES: usize = 24;

pub fn new_qr_token() -> String {
    let mut buf = [0u8; QR_TOKEN_BYTES];
    OsRng.fill_bytes(&mut buf);
    URL_SAFE_NO_PAD.encode(buf)
}
