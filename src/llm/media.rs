//! Image payload handling: MIME sniffing and the in-memory portrait value
//! attached to generation requests.

use std::path::Path;

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose, Engine as _};

/// Sniffs the MIME type from the leading bytes. `infer` misses the HEIC
/// family, so the ftyp box is probed first.
pub fn detect_mime_type(data: &[u8]) -> Option<String> {
    if data.len() > 12 {
        let ftyp = &data[4..12];
        if ftyp.starts_with(b"ftyp") {
            let brand = &ftyp[4..8];
            if brand == b"heic" || brand == b"heif" || brand == b"hevc" {
                return Some("image/heic".to_string());
            }
        }
    }

    infer::get(data).map(|kind| kind.mime_type().to_string())
}

/// An uploaded portrait: decoded bytes plus the declared media type.
/// The media type is always a non-empty `image/*` value.
#[derive(Debug, Clone)]
pub struct PortraitImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl PortraitImage {
    /// Reads an image file and sniffs its media type. Empty files and
    /// non-image payloads are rejected.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read image file {}", path.display()))?;
        Self::from_bytes(bytes)
            .with_context(|| format!("{} is not a usable portrait photo", path.display()))
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        if bytes.is_empty() {
            bail!("Image payload is empty");
        }
        let Some(mime_type) = detect_mime_type(&bytes) else {
            bail!("Unrecognized image format");
        };
        if !mime_type.starts_with("image/") {
            bail!("Expected an image, found {mime_type}");
        }
        Ok(Self { bytes, mime_type })
    }

    /// Self-contained data URI for display and round-tripping.
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}
