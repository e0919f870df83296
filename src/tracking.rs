//! Email open tracking via 1x1 pixel.
//!
//! Produces opaque per-message identifiers and renders plain-text bodies as
//! minimal HTML documents with an optional tracking pixel. The pixel
//! endpoint itself (a handler that logs the `mid` query parameter and
//! returns a 1x1 transparent GIF with no-cache headers) is a separately
//! deployed collaborator; this module only builds the URL pointing at it.
//!
//! Everything here is pure: no network, no clocks, no globals. Callers that
//! want per-send uniqueness pass a fresh nonce (timestamp or counter).

use sha2::{Digest, Sha256};
use std::fmt::Write;

/// Tracking configuration. `pixel_endpoint: None` disables open tracking;
/// HTML emails are still rendered, just without a pixel.
#[derive(Debug, Clone, Default)]
pub struct TrackingConfig {
    pub pixel_endpoint: Option<String>,
}

/// Derives a 16-hex-character opaque message ID from the logical key
/// `(lead_id, step)` plus a caller-supplied nonce.
///
/// Deterministic in its inputs: the same triple always yields the same ID,
/// so tests and replays are reproducible.
pub fn generate_message_id(lead_id: &str, step: u32, nonce: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{lead_id}:{step}:{nonce}").as_bytes());
    let digest = hasher.finalize();

    // First 8 bytes of the digest as lowercase hex.
    digest.iter().take(8).fold(String::new(), |mut out, byte| {
        let _ = write!(out, "{byte:02x}");
        out
    })
}

/// Returns the tracking pixel URL for a message, or `None` when no endpoint
/// is configured. No network call occurs; the URL is embedded for the
/// recipient's mail client to fetch.
pub fn tracking_pixel_url(config: &TrackingConfig, message_id: &str) -> Option<String> {
    let endpoint = config.pixel_endpoint.as_deref()?;
    Some(format!("{endpoint}?mid={message_id}"))
}

/// Converts a plain-text email body to a minimal HTML document, appending a
/// hidden 1x1 image tag just before `</body>` when `pixel_url` is given.
///
/// Escapes `&` before `<` and `>` so already-escaped entities are not
/// double-escaped, then converts newlines to `<br>`. The body is normalized
/// to end with exactly one line break so the closing tags sit on their own
/// lines.
pub fn wrap_html_email(text_body: &str, pixel_url: Option<&str>) -> String {
    let mut html_body = text_body
        .trim_end_matches('\n')
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\n', "<br>\n");
    html_body.push_str("<br>\n");

    let mut doc = String::from(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"></head>\n\
         <body style=\"font-family: sans-serif; font-size: 14px; line-height: 1.5; color: #333;\">\n",
    );
    doc.push_str(&html_body);
    if let Some(url) = pixel_url {
        let _ = writeln!(
            doc,
            "<img src=\"{url}\" width=\"1\" height=\"1\" alt=\"\" style=\"display:none\" />"
        );
    }
    doc.push_str("</body>\n</html>");
    doc
}
