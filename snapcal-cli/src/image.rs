//! Images prepared for upload.

use std::path::Path;

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// An image file encoded for a chat-completions request.
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub mime_type: &'static str,
    pub base64: String,
}

impl ImageInput {
    pub fn load(path: &Path) -> Result<Self> {
        let mime_type = mime_for(path)?;
        let bytes =
            std::fs::read(path).with_context(|| format!("Could not read {}", path.display()))?;

        if bytes.is_empty() {
            anyhow::bail!("{} is empty", path.display());
        }

        Ok(ImageInput {
            mime_type,
            base64: STANDARD.encode(bytes),
        })
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }
}

/// MIME type from the file extension. Only formats vision models accept.
fn mime_for(path: &Path) -> Result<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "webp" => Ok("image/webp"),
        "gif" => Ok("image/gif"),
        _ => anyhow::bail!(
            "Unsupported file type '{}'. Use a PNG, JPEG, WebP or GIF image",
            path.display()
        ),
    }
}
