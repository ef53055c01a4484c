//! Preview screenshots encoded as PNG data URLs.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::imageops::FilterType;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

use crate::config::ScreenshotSize;
use crate::error::ScreenshotError;
use crate::host::{PreviewRasterizer, Raster};

pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

pub async fn capture_screenshot(
    preview: Option<&dyn PreviewRasterizer>,
    size: ScreenshotSize,
) -> Result<String, ScreenshotError> {
    let preview = preview.ok_or(ScreenshotError::NoPreviewFrame)?;
    let raster = preview.rasterize(size).await?;
    encode_png_data_url(raster, size)
}

/// Scales `raster` to exactly `size` and encodes it as a PNG data URL.
pub fn encode_png_data_url(raster: Raster, size: ScreenshotSize) -> Result<String, ScreenshotError> {
    let Raster {
        width,
        height,
        rgba,
    } = raster;

    let expected = width as usize * height as usize * 4;
    if width == 0 || height == 0 || rgba.len() != expected {
        return Err(ScreenshotError::InvalidRaster {
            width,
            height,
            expected,
            actual: rgba.len(),
        });
    }
    if size.width == 0 || size.height == 0 {
        return Err(ScreenshotError::Encode(format!(
            "target size {}x{} is empty",
            size.width, size.height
        )));
    }

    let actual = rgba.len();
    let mut pixels = RgbaImage::from_raw(width, height, rgba).ok_or(
        ScreenshotError::InvalidRaster {
            width,
            height,
            expected,
            actual,
        },
    )?;
    if (width, height) != (size.width, size.height) {
        pixels = image::imageops::resize(&pixels, size.width, size.height, FilterType::Triangle);
    }

    let mut png = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png)
        .write_image(
            pixels.as_raw(),
            size.width,
            size.height,
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| ScreenshotError::Encode(e.to_string()))?;

    Ok(format!("{PNG_DATA_URL_PREFIX}{}", STANDARD.encode(png)))
}
