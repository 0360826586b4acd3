//! Codec boundary: TGA decode/encode and output hashing.
//!
//! Decoding accepts whatever `image::open` produces and converts to the
//! internal 1/3/4-channel RGBA-ordered layout here; palette, 16-bit, and
//! gray+alpha modes funnel through RGBA8. Encoding always writes 8-bit
//! L8/Rgb8/Rgba8 TGA. Encoded bytes are hashed with BLAKE3 so results and
//! run reports can carry a stable content digest.

use std::path::Path;

use image::codecs::tga::TgaEncoder;
use image::{DynamicImage, ExtendedColorType};

use crate::image::{Image, ImageError};

/// Load an image file and convert it to the internal layout.
pub fn load_image(path: &Path) -> Result<Image, ImageError> {
    let decoded = image::open(path)?;
    let (width, height) = (decoded.width(), decoded.height());
    match decoded {
        DynamicImage::ImageLuma8(buf) => Image::from_raw(width, height, 1, buf.into_raw()),
        DynamicImage::ImageRgb8(buf) => Image::from_raw(width, height, 3, buf.into_raw()),
        DynamicImage::ImageRgba8(buf) => Image::from_raw(width, height, 4, buf.into_raw()),
        other => Image::from_raw(width, height, 4, other.to_rgba8().into_raw()),
    }
}

/// Compute the BLAKE3 hash of encoded image data.
pub fn hash_bytes(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Encode to a TGA byte vector and return it with its hash.
pub fn encode_tga_with_hash(img: &Image) -> Result<(Vec<u8>, String), ImageError> {
    let color_type = match img.channels() {
        1 => ExtendedColorType::L8,
        3 => ExtendedColorType::Rgb8,
        4 => ExtendedColorType::Rgba8,
        n => return Err(ImageError::UnsupportedChannelCount(n)),
    };

    let mut data = Vec::new();
    TgaEncoder::new(&mut data).encode(img.as_bytes(), img.width(), img.height(), color_type)?;
    let hash = hash_bytes(&data);
    Ok((data, hash))
}

/// Write an image as TGA, creating parent directories as needed. Returns the
/// BLAKE3 hash of the written bytes.
pub fn write_tga(img: &Image, path: &Path) -> Result<String, ImageError> {
    let (data, hash) = encode_tga_with_hash(img)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &data)?;
    Ok(hash)
}
