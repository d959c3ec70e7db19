//! Raster overlay decoding and XObject construction.
//!
//! Overlays arrive as data URLs. JPEG payloads embed as-is under
//! DCTDecode; PNG payloads are decoded, split into color and alpha
//! planes, and embedded flate-compressed, with the alpha plane as a
//! DeviceGray soft mask. Anything else is rejected — the caller treats
//! every [`ImageError`] as a per-instruction skip.

use std::io::Write;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::GenericImageView;
use lopdf::{Dictionary, Object};

use crate::error::ImageError;

/// Alpha plane destined for an SMask entry.
#[derive(Debug, Clone)]
pub struct SoftMask {
    pub dict: Dictionary,
    pub data: Vec<u8>,
}

/// A decoded raster ready to become an Image XObject.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub dict: Dictionary,
    pub data: Vec<u8>,
    pub soft_mask: Option<SoftMask>,
}

/// Split a `data:<mime>;base64,<payload>` URL into MIME type and bytes.
pub fn parse_data_url(data_url: &str) -> Result<(&str, Vec<u8>), ImageError> {
    let rest = data_url.strip_prefix("data:").ok_or(ImageError::NotADataUrl)?;
    let (mime, payload) = rest.split_once(";base64,").ok_or(ImageError::NotADataUrl)?;
    let bytes = BASE64
        .decode(payload.trim())
        .map_err(|_| ImageError::NotADataUrl)?;
    Ok((mime, bytes))
}

/// Decode a payload of the declared MIME type into an embeddable image.
pub fn decode_image(mime: &str, bytes: &[u8]) -> Result<DecodedImage, ImageError> {
    match mime {
        "image/png" => decode_png(bytes),
        "image/jpeg" | "image/jpg" => decode_jpeg(bytes),
        other => Err(ImageError::Unsupported(other.to_string())),
    }
}

fn base_dict(width: u32, height: u32, color_space: &[u8], filter: &[u8]) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(i64::from(width)));
    dict.set("Height", Object::Integer(i64::from(height)));
    dict.set("ColorSpace", Object::Name(color_space.to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict.set("Filter", Object::Name(filter.to_vec()));
    dict
}

fn decode_jpeg(bytes: &[u8]) -> Result<DecodedImage, ImageError> {
    // Decode only to learn dimensions and color layout; the original DCT
    // stream is embedded untouched.
    let img = image::load_from_memory_with_format(bytes, image::ImageFormat::Jpeg)
        .map_err(|e| ImageError::Decode(e.to_string()))?;
    let (width, height) = img.dimensions();

    let color_space: &[u8] = match img.color() {
        image::ColorType::L8 | image::ColorType::L16 => b"DeviceGray",
        _ => b"DeviceRGB",
    };

    Ok(DecodedImage {
        width,
        height,
        dict: base_dict(width, height, color_space, b"DCTDecode"),
        data: bytes.to_vec(),
        soft_mask: None,
    })
}

fn decode_png(bytes: &[u8]) -> Result<DecodedImage, ImageError> {
    let img = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .map_err(|e| ImageError::Decode(e.to_string()))?;
    let (width, height) = img.dimensions();

    let (color_space, pixels, alpha): (&[u8], Vec<u8>, Option<Vec<u8>>) = match img.color() {
        image::ColorType::L8 | image::ColorType::L16 => {
            (b"DeviceGray", img.to_luma8().into_raw(), None)
        }
        image::ColorType::La8 | image::ColorType::La16 => {
            let la = img.to_luma_alpha8();
            let mut gray = Vec::with_capacity((width * height) as usize);
            let mut mask = Vec::with_capacity((width * height) as usize);
            for pixel in la.pixels() {
                gray.push(pixel.0[0]);
                mask.push(pixel.0[1]);
            }
            (b"DeviceGray", gray, Some(mask))
        }
        image::ColorType::Rgb8 | image::ColorType::Rgb16 => {
            (b"DeviceRGB", img.to_rgb8().into_raw(), None)
        }
        _ => {
            let rgba = img.to_rgba8();
            let mut rgb = Vec::with_capacity((width * height * 3) as usize);
            let mut mask = Vec::with_capacity((width * height) as usize);
            for pixel in rgba.pixels() {
                rgb.push(pixel.0[0]);
                rgb.push(pixel.0[1]);
                rgb.push(pixel.0[2]);
                mask.push(pixel.0[3]);
            }
            (b"DeviceRGB", rgb, Some(mask))
        }
    };

    let soft_mask = alpha
        .map(|mask| {
            compress(&mask).map(|data| SoftMask {
                dict: base_dict(width, height, b"DeviceGray", b"FlateDecode"),
                data,
            })
        })
        .transpose()?;

    Ok(DecodedImage {
        width,
        height,
        dict: base_dict(width, height, color_space, b"FlateDecode"),
        data: compress(&pixels)?,
        soft_mask,
    })
}

fn compress(data: &[u8]) -> Result<Vec<u8>, ImageError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .and_then(|_| encoder.finish())
        .map_err(|e| ImageError::Decode(e.to_string()))
}
