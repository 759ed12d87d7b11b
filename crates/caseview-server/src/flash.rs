//! One-shot flash messages carried in an HMAC-signed cookie.
//!
//! Cookie value: `hex(message).hex(hmac_sha256(secret, message))`. A cookie
//! whose signature does not verify is ignored.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const FLASH_COOKIE: &str = "caseview_flash";

#[derive(Clone)]
pub struct FlashSigner {
    key: Vec<u8>,
}

impl FlashSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            key: secret.as_bytes().to_vec(),
        }
    }

    fn mac(&self, message: &[u8]) -> Option<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(&self.key).ok()?;
        mac.update(message);
        Some(mac)
    }

    /// Encode and sign a message as a cookie value.
    pub fn seal(&self, message: &str) -> Option<String> {
        let tag = self.mac(message.as_bytes())?.finalize().into_bytes();
        Some(format!("{}.{}", hex::encode(message), hex::encode(tag)))
    }

    /// Verify and decode a cookie value.
    pub fn open(&self, value: &str) -> Option<String> {
        let (body, tag) = value.split_once('.')?;
        let message = hex::decode(body).ok()?;
        let tag = hex::decode(tag).ok()?;
        self.mac(&message)?.verify_slice(&tag).ok()?;
        String::from_utf8(message).ok()
    }

    /// `Set-Cookie` header carrying a signed message.
    pub fn set_cookie(&self, message: &str) -> Option<(axum::http::HeaderName, HeaderValue)> {
        let sealed = self.seal(message)?;
        let value = HeaderValue::from_str(&format!(
            "{FLASH_COOKIE}={sealed}; Path=/; HttpOnly; SameSite=Lax"
        ))
        .ok()?;
        Some((SET_COOKIE, value))
    }

    /// `Set-Cookie` header that deletes the flash cookie.
    pub fn clear_cookie() -> (axum::http::HeaderName, HeaderValue) {
        (
            SET_COOKIE,
            HeaderValue::from_static("caseview_flash=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax"),
        )
    }

    /// Read and verify the flash message from request cookies.
    pub fn read(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|h| h.to_str().ok())
            .flat_map(|h| h.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == FLASH_COOKIE)
            .and_then(|(_, value)| self.open(value))
    }
}
