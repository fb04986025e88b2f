// src/utils/qr.rs
//! QR code generation for certificate validation links.
//!
//! A certificate's QR code encodes the public validation URL for its
//! unique code, so any third party can scan it and check validity
//! without knowing the signature scheme. Image rendering itself is kept
//! behind the [`QrRenderer`] trait: the API server only ever needs a
//! pure function from a URL string to an image buffer, and deployments
//! can swap the rendering backend without touching the core.

use crate::error::{Error, Result};
use qrcode::render::svg;
use qrcode::QrCode;

/// Builds the public validation URL embedded in a certificate QR code.
///
/// # Arguments
/// * `base_url` - Externally reachable base URL of this deployment
/// * `unique_code` - The certificate's public lookup token
///
/// # Returns
/// URL of the form `<base>/certificates/validate?code=<unique_code>`.
pub fn validation_url(base_url: &str, unique_code: &str) -> String {
    format!(
        "{}/certificates/validate?code={}",
        base_url.trim_end_matches('/'),
        unique_code
    )
}

/// Renders a validation URL into an image byte stream.
///
/// Implementations must be pure: the same URL always yields the same
/// image, and rendering has no side effects.
pub trait QrRenderer: Send + Sync {
    /// Renders the given URL as a QR code image.
    fn render(&self, url: &str) -> Result<Vec<u8>>;

    /// MIME type of the rendered image.
    fn content_type(&self) -> &'static str;

    /// File extension used in download filenames.
    fn file_extension(&self) -> &'static str;
}

/// Default renderer producing SVG images.
pub struct SvgQrRenderer;

impl QrRenderer for SvgQrRenderer {
    fn render(&self, url: &str) -> Result<Vec<u8>> {
        let code = QrCode::new(url.as_bytes())
            .map_err(|e| Error::Internal(format!("QR encoding failed: {}", e)))?;
        let image = code
            .render::<svg::Color>()
            .min_dimensions(200, 200)
            .build();
        Ok(image.into_bytes())
    }

    fn content_type(&self) -> &'static str {
        "image/svg+xml"
    }

    fn file_extension(&self) -> &'static str {
        "svg"
    }
}
