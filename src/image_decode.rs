//! Decodes image XObjects (§4.7) into RGBA pixel buffers ready for base64 embedding in an
//! `<image>` element.
//!
//! Grounded on `xobject.rs`'s `ImageXObject`/`ColorSpace`/`ColorBits` field layout (kept, but
//! turned around: the teacher builds these structs to *write* a PDF, this reads the
//! corresponding dictionary entries back out of one). Flate/LZW/RunLength/ASCII decompression
//! is `lopdf`'s own filter chain (`Stream::decompressed_content`), not reimplemented here; DCT
//! (baseline and progressive JPEG) decoding is delegated to the `image` crate, the same crate
//! the teacher already depends on for its `embedded_images` feature.

use crate::color::ColorSpace;
use crate::errors::Error;

/// A fully decoded image, ready for `svg_emitter` to base64-encode into a data URI.
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// Interleaved 8-bit RGBA, row-major, top-to-bottom (matching SVG's `<image>` convention).
    pub rgba: Vec<u8>,
}

/// Declares which filter produced `image_data`, mirroring the `/Filter` entry on an image
/// XObject's stream dictionary. Flate/LZW/RunLength/ASCII are handled upstream by `lopdf`
/// before this module ever sees the bytes; only the two passthrough codecs are named here.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CompressedFormat {
    /// Baseline or progressive JFIF, handed to the `image` crate's JPEG decoder.
    Dct,
    /// Group 3/4 fax compression. Out of scope: see §2 Non-goals.
    Ccitt,
}

/// Decodes an already-`lopdf`-decompressed raw sample buffer (DeviceGray/RGB/CMYK, with
/// optional `Indexed` palette resolution) into RGBA8.
pub fn decode_raw_samples(
    data: &[u8],
    width: u32,
    height: u32,
    color_space: ColorSpace,
    bits_per_component: u8,
    palette: Option<&[u8]>,
) -> Result<DecodedImage, Error> {
    if bits_per_component != 8 && bits_per_component != 1 && bits_per_component != 4 {
        return Err(Error::UnsupportedFeature(format!(
            "unsupported bits-per-component: {bits_per_component}"
        )));
    }

    let samples = unpack_samples(data, width, height, color_space, bits_per_component, palette)?;

    let rgba = match color_space {
        ColorSpace::Greyscale => samples
            .chunks_exact(1)
            .flat_map(|c| [c[0], c[0], c[0], 255])
            .collect(),
        ColorSpace::Rgb | ColorSpace::Palette => samples
            .chunks_exact(3)
            .flat_map(|c| [c[0], c[1], c[2], 255])
            .collect(),
        ColorSpace::Cmyk => samples
            .chunks_exact(4)
            .flat_map(|c| {
                let (cy, m, y, k) = (
                    c[0] as f32 / 255.0,
                    c[1] as f32 / 255.0,
                    c[2] as f32 / 255.0,
                    c[3] as f32 / 255.0,
                );
                let r = ((1.0 - cy) * (1.0 - k) * 255.0) as u8;
                let g = ((1.0 - m) * (1.0 - k) * 255.0) as u8;
                let b = ((1.0 - y) * (1.0 - k) * 255.0) as u8;
                [r, g, b, 255]
            })
            .collect(),
        ColorSpace::Unsupported => {
            return Err(Error::UnsupportedFeature(
                "image uses an unsupported color space".to_string(),
            ));
        }
    };

    Ok(DecodedImage {
        width,
        height,
        rgba,
    })
}

/// Expands sub-byte sample packing (1/4 bpc) to one byte per sample, and resolves `Indexed`
/// samples through the supplied palette. 8bpc DeviceGray/RGB/CMYK pass through unchanged.
fn unpack_samples(
    data: &[u8],
    width: u32,
    height: u32,
    color_space: ColorSpace,
    bits_per_component: u8,
    palette: Option<&[u8]>,
) -> Result<Vec<u8>, Error> {
    let components_per_pixel = match color_space {
        ColorSpace::Greyscale | ColorSpace::Palette => 1,
        ColorSpace::Rgb => 3,
        ColorSpace::Cmyk => 4,
        ColorSpace::Unsupported => 0,
    };

    let indices: Vec<u8> = if bits_per_component == 8 {
        data.to_vec()
    } else {
        let row_bits = width as usize * components_per_pixel * bits_per_component as usize;
        let row_bytes = row_bits.div_ceil(8);
        let mut out = Vec::with_capacity(width as usize * height as usize * components_per_pixel);
        for row in 0..height as usize {
            let row_start = row * row_bytes;
            let row_data = data
                .get(row_start..row_start + row_bytes)
                .ok_or_else(|| Error::MalformedPdf("image data shorter than declared rows".into()))?;
            let mut bit_pos = 0usize;
            for _ in 0..(width as usize * components_per_pixel) {
                let byte_index = bit_pos / 8;
                let bit_offset = bit_pos % 8;
                let byte = row_data[byte_index];
                let value = match bits_per_component {
                    1 => (byte >> (7 - bit_offset)) & 0x1,
                    4 => {
                        if bit_offset == 0 {
                            byte >> 4
                        } else {
                            byte & 0x0F
                        }
                    }
                    _ => unreachable!(),
                };
                let scale = (255 / ((1 << bits_per_component) - 1)) as u8;
                out.push(value.saturating_mul(scale));
                bit_pos += bits_per_component as usize;
            }
        }
        out
    };

    if color_space == ColorSpace::Palette {
        let palette = palette
            .ok_or_else(|| Error::MalformedPdf("Indexed color space missing a palette".into()))?;
        let mut rgb = Vec::with_capacity(indices.len() * 3);
        for idx in &indices {
            // The raw index was scaled up by `unpack_samples`'s bit-expansion step when
            // bits_per_component < 8; undo that to recover the real palette offset.
            let real_index = if bits_per_component == 8 {
                *idx as usize
            } else {
                let scale = (255 / ((1u32 << bits_per_component) - 1)) as u8;
                (*idx / scale.max(1)) as usize
            };
            let base = real_index * 3;
            rgb.extend_from_slice(palette.get(base..base + 3).unwrap_or(&[0, 0, 0]));
        }
        return Ok(rgb);
    }

    Ok(indices)
}

/// Decodes a DCT (JPEG) stream via the `image` crate.
#[cfg(feature = "embedded_images")]
pub fn decode_dct(data: &[u8]) -> Result<DecodedImage, Error> {
    let img = image_crate::load_from_memory_with_format(data, image_crate::ImageFormat::Jpeg)
        .map_err(|e| Error::FilterError(format!("JPEG decode failed: {e}")))?;
    let rgba = img.to_rgba8();
    Ok(DecodedImage {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}

#[cfg(not(feature = "embedded_images"))]
pub fn decode_dct(_data: &[u8]) -> Result<DecodedImage, Error> {
    Err(Error::UnsupportedFeature(
        "DCT image decoding requires the `embedded_images` feature".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greyscale_8bit_expands_to_rgba() {
        let data = [0u8, 128, 255, 64];
        let img = decode_raw_samples(&data, 2, 2, ColorSpace::Greyscale, 8, None).unwrap();
        assert_eq!(img.rgba, vec![0, 0, 0, 255, 128, 128, 128, 255, 255, 255, 255, 255, 64, 64, 64, 255]);
    }

    #[test]
    fn one_bit_greyscale_unpacks_msb_first() {
        // A single row, 8 pixels, alternating black/white: 0b10101010
        let data = [0b1010_1010u8];
        let img = decode_raw_samples(&data, 8, 1, ColorSpace::Greyscale, 1, None).unwrap();
        assert_eq!(img.rgba[0], 255);
        assert_eq!(img.rgba[4], 0);
    }

    #[test]
    fn indexed_color_resolves_through_palette() {
        let palette = [0u8, 0, 0, 255, 255, 255];
        let data = [0u8, 1];
        let img = decode_raw_samples(&data, 2, 1, ColorSpace::Palette, 8, Some(&palette)).unwrap();
        assert_eq!(&img.rgba[0..4], &[0, 0, 0, 255]);
        assert_eq!(&img.rgba[4..8], &[255, 255, 255, 255]);
    }

    #[test]
    fn cmyk_full_black_is_rgb_black() {
        let data = [0u8, 0, 0, 255];
        let img = decode_raw_samples(&data, 1, 1, ColorSpace::Cmyk, 8, None).unwrap();
        assert_eq!(&img.rgba[0..3], &[0, 0, 0]);
    }

    #[test]
    fn unsupported_color_space_is_rejected() {
        let data = [0u8];
        let err = decode_raw_samples(&data, 1, 1, ColorSpace::Unsupported, 8, None);
        assert!(matches!(err, Err(Error::UnsupportedFeature(_))));
    }
}
