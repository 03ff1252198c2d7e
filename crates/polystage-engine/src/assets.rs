//! Asset byte sources and shared decoders.
//!
//! This layer owns no network stack. Sources are limited to what can be
//! resolved locally:
//! - `data:` URLs (base64 or plain payloads)
//! - `file://` URLs
//! - bare filesystem paths (no scheme)
//!
//! Every other scheme fails with [`AssetError::UnsupportedScheme`].

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::AssetError;

/// Reads the bytes behind `url`.
///
/// Async so that callers already sit on the contract's async path; native
/// file reads complete immediately.
pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>, AssetError> {
    if let Some(rest) = url.strip_prefix("data:") {
        return decode_data_url(rest);
    }

    let path = if let Some(path) = url.strip_prefix("file://") {
        path
    } else if has_scheme(url) {
        return Err(AssetError::UnsupportedScheme(url.to_string()));
    } else {
        url
    };

    std::fs::read(path).map_err(|source| AssetError::Io { path: path.to_string(), source })
}

/// `scheme:` prefix per RFC 3986, excluding single-letter Windows drives.
fn has_scheme(url: &str) -> bool {
    let Some((scheme, _)) = url.split_once(':') else {
        return false;
    };
    scheme.len() > 1
        && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Decodes the part of a data URL after `data:`.
fn decode_data_url(rest: &str) -> Result<Vec<u8>, AssetError> {
    let (meta, payload) = rest.split_once(',').ok_or(AssetError::InvalidDataUrl)?;
    if meta.split(';').any(|p| p.eq_ignore_ascii_case("base64")) {
        Ok(STANDARD.decode(payload.trim())?)
    } else {
        Ok(payload.as_bytes().to_vec())
    }
}

// ── Images ────────────────────────────────────────────────────────────────

/// Decoded RGBA8 image.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// Straight-alpha RGBA, row-major, `width * height * 4` bytes.
    pub rgba: Vec<u8>,
}

impl DecodedImage {
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.rgba.len()
    }
}

/// Decodes any format enabled on the `image` dependency.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, AssetError> {
    let img = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = img.dimensions();
    Ok(DecodedImage { width, height, rgba: img.into_raw() })
}
