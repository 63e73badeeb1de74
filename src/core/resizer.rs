use crate::domain::model::{LoadedImage, SizePreset};
use crate::domain::ports::Resizer;
use crate::utils::error::{PackError, Result};
use async_trait::async_trait;
use image::imageops::FilterType;
use image::ImageReader;
use std::io::Cursor;
use std::sync::Arc;

/// Production resizer. Decodes in memory, scales to exactly the preset
/// dimensions (aspect ratio is intentionally not preserved), and re-encodes
/// in the source's container format. CPU-bound work runs on the blocking
/// thread pool.
#[derive(Debug, Clone, Default)]
pub struct StretchResizer;

impl StretchResizer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Resizer for StretchResizer {
    async fn resize(&self, image: &LoadedImage, preset: SizePreset) -> Result<Vec<u8>> {
        let name = image.name.clone();
        let bytes = Arc::clone(&image.bytes);
        let task_name = name.clone();
        tokio::task::spawn_blocking(move || resize_blocking(&task_name, &bytes, preset))
            .await
            .map_err(|e| PackError::ProcessingError {
                message: format!("resize worker for '{}' did not finish: {}", name, e),
            })?
    }
}

fn resize_blocking(name: &str, bytes: &[u8], preset: SizePreset) -> Result<Vec<u8>> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| PackError::DecodeError {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
    let format = reader.format().ok_or_else(|| PackError::DecodeError {
        name: name.to_string(),
        reason: "unrecognized image container".to_string(),
    })?;
    let decoded = reader.decode().map_err(|e| PackError::DecodeError {
        name: name.to_string(),
        reason: e.to_string(),
    })?;

    if preset.width == 0 || preset.height == 0 {
        return Err(PackError::ResizeError {
            name: name.to_string(),
            width: preset.width,
            height: preset.height,
            reason: "target dimensions must be positive".to_string(),
        });
    }

    tracing::debug!(
        "Resizing {} from {}x{} to {}",
        name,
        decoded.width(),
        decoded.height(),
        preset.label()
    );

    let resized = decoded.resize_exact(preset.width, preset.height, FilterType::Lanczos3);

    let mut out = Vec::new();
    resized
        .write_to(&mut Cursor::new(&mut out), format)
        .map_err(|e| PackError::ResizeError {
            name: name.to_string(),
            width: preset.width,
            height: preset.height,
            reason: format!("re-encode failed: {}", e),
        })?;
    Ok(out)
}
