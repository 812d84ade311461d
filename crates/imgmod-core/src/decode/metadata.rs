//! Embedded tag extraction for the metadata panel.
//!
//! Three sources feed one sorted map:
//!
//! - PNG ancillary chunks: `tEXt`/`zTXt`/`iTXt` under their own keywords,
//!   `pHYs` as `Density`, `gAMA` as `Gamma`
//! - the JPEG `APP0` JFIF header as `JFIF version` and `Density`
//! - primary-image EXIF fields under their EXIF tag names
//!
//! EXIF wins when a name appears twice.

use std::collections::BTreeMap;
use std::io::Cursor;

use exif::{In, Reader, Tag, Value};
use log::debug;
use png::Unit;

use super::SourceFormat;

/// Undefined-typed blobs longer than this are skipped (maker notes, previews).
const MAX_UNDEFINED_LEN: usize = 64;

const INCHES_PER_METER: f64 = 39.3701;
const CM_PER_INCH: f64 = 2.54;

/// Read every displayable tag from an uploaded JPEG or PNG.
///
/// Any failure yields fewer (or no) tags: metadata is display-only, so a
/// missing or malformed block must never fail the upload.
pub(crate) fn read_tags(bytes: &[u8], format: SourceFormat) -> BTreeMap<String, String> {
    let mut tags = match format {
        SourceFormat::Png => png_tags(bytes),
        SourceFormat::Jpeg => jfif_tags(bytes),
    };
    tags.extend(exif_tags(bytes));
    tags
}

/// Primary-image EXIF fields from a JPEG or PNG container.
pub(crate) fn exif_tags(bytes: &[u8]) -> BTreeMap<String, String> {
    let mut cursor = Cursor::new(bytes);

    let exif = match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif,
        Err(e) => {
            debug!("exif unavailable: {}", e);
            return BTreeMap::new();
        }
    };

    exif.fields()
        .filter(|field| field.ifd_num == In::PRIMARY && field.tag != Tag::MakerNote)
        .filter(|field| match &field.value {
            Value::Undefined(data, _) => data.len() <= MAX_UNDEFINED_LEN,
            _ => true,
        })
        .map(|field| {
            let value = field.display_value().with_unit(&exif).to_string();
            (field.tag.to_string(), value.trim_matches('"').to_string())
        })
        .collect()
}

/// Text, physical density and gamma from the PNG header chunks.
///
/// Only chunks ahead of the first `IDAT` are seen; text written after the
/// image data is not read.
pub(crate) fn png_tags(bytes: &[u8]) -> BTreeMap<String, String> {
    let mut tags = BTreeMap::new();

    let reader = match png::Decoder::new(Cursor::new(bytes)).read_info() {
        Ok(reader) => reader,
        Err(e) => {
            debug!("png chunks unavailable: {}", e);
            return tags;
        }
    };
    let info = reader.info();

    for chunk in &info.uncompressed_latin1_text {
        tags.insert(chunk.keyword.clone(), chunk.text.clone());
    }
    for chunk in &info.compressed_latin1_text {
        match chunk.get_text() {
            Ok(text) => {
                tags.insert(chunk.keyword.clone(), text);
            }
            Err(e) => debug!("skipping zTXt {}: {}", chunk.keyword, e),
        }
    }
    for chunk in &info.utf8_text {
        match chunk.get_text() {
            Ok(text) => {
                tags.insert(chunk.keyword.clone(), text);
            }
            Err(e) => debug!("skipping iTXt {}: {}", chunk.keyword, e),
        }
    }

    if let Some(dims) = info.pixel_dims {
        let density = match dims.unit {
            Unit::Meter => format_dpi(
                f64::from(dims.xppu) / INCHES_PER_METER,
                f64::from(dims.yppu) / INCHES_PER_METER,
            ),
            Unit::Unspecified => format_aspect(dims.xppu, dims.yppu),
        };
        tags.insert("Density".to_string(), density);
    }

    if let Some(gamma) = info.source_gamma {
        tags.insert("Gamma".to_string(), format!("{:.5}", gamma.into_value()));
    }

    tags
}

/// Version and density from a JPEG's `APP0` JFIF segment.
///
/// Walks the marker segments after SOI and stops at the first SOS, so the
/// entropy-coded data is never scanned.
pub(crate) fn jfif_tags(bytes: &[u8]) -> BTreeMap<String, String> {
    let mut tags = BTreeMap::new();
    if let Some(jfif) = find_jfif(bytes) {
        tags.insert(
            "JFIF version".to_string(),
            format!("{}.{:02}", jfif.major, jfif.minor),
        );
        let (x, y) = (f64::from(jfif.x_density), f64::from(jfif.y_density));
        let density = match jfif.units {
            1 => format_dpi(x, y),
            2 => format_dpi(x * CM_PER_INCH, y * CM_PER_INCH),
            _ => format_aspect(u32::from(jfif.x_density), u32::from(jfif.y_density)),
        };
        tags.insert("Density".to_string(), density);
    }
    tags
}

struct JfifHeader {
    major: u8,
    minor: u8,
    units: u8,
    x_density: u16,
    y_density: u16,
}

fn find_jfif(bytes: &[u8]) -> Option<JfifHeader> {
    if !bytes.starts_with(&[0xFF, 0xD8]) {
        return None;
    }

    let mut pos = 2;
    loop {
        if *bytes.get(pos)? != 0xFF {
            return None;
        }
        let marker = *bytes.get(pos + 1)?;
        match marker {
            // fill byte
            0xFF => {
                pos += 1;
                continue;
            }
            // SOS or EOI: no more header segments
            0xDA | 0xD9 => return None,
            _ => {}
        }

        let len = usize::from(u16::from_be_bytes([*bytes.get(pos + 2)?, *bytes.get(pos + 3)?]));
        if len < 2 {
            return None;
        }
        let body = bytes.get(pos + 4..pos + 2 + len)?;

        if marker == 0xE0 && body.len() >= 12 && body.starts_with(b"JFIF\0") {
            return Some(JfifHeader {
                major: body[5],
                minor: body[6],
                units: body[7],
                x_density: u16::from_be_bytes([body[8], body[9]]),
                y_density: u16::from_be_bytes([body[10], body[11]]),
            });
        }
        pos += 2 + len;
    }
}

fn format_dpi(x: f64, y: f64) -> String {
    format!("{} x {} dpi", x.round(), y.round())
}

fn format_aspect(x: u32, y: u32) -> String {
    format!("{} x {} (aspect ratio)", x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    // SOI, then a bare JFIF APP0 segment (1.01, no units, 1x1), then EOI
    const JFIF_ONLY: &[u8] = &[
        0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00, 0x01, 0x01, 0x00,
        0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0xFF, 0xD9,
    ];

    /// SOI + APP1 holding a little-endian TIFF with one IFD0 entry,
    /// Make = "Canon", + EOI.
    fn jpeg_with_exif_make() -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE1, 0x00, 0x28];
        bytes.extend_from_slice(b"Exif\0\0");
        bytes.extend_from_slice(&[
            b'I', b'I', 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00, // TIFF header
            0x01, 0x00, // one entry
            0x0F, 0x01, 0x02, 0x00, 0x06, 0x00, 0x00, 0x00, 0x1A, 0x00, 0x00, 0x00, // Make, ASCII x6 @26
            0x00, 0x00, 0x00, 0x00, // no next IFD
        ]);
        bytes.extend_from_slice(b"Canon\0");
        bytes.extend_from_slice(&[0xFF, 0xD9]);
        bytes
    }

    fn png_with_chunks(
        text: &[(&str, &str)],
        dims: Option<png::PixelDimensions>,
        gamma: Option<png::ScaledFloat>,
    ) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, 1, 1);
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
            for (keyword, value) in text {
                encoder
                    .add_text_chunk(keyword.to_string(), value.to_string())
                    .unwrap();
            }
            encoder.set_pixel_dims(dims);
            if let Some(gamma) = gamma {
                encoder.set_source_gamma(gamma);
            }
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[0, 0, 0]).unwrap();
            writer.finish().unwrap();
        }
        out
    }

    #[test]
    fn test_read_tags_invalid_data() {
        assert!(read_tags(&[0x00, 0x01, 0x02], SourceFormat::Jpeg).is_empty());
        assert!(read_tags(&[0x00, 0x01, 0x02], SourceFormat::Png).is_empty());
    }

    #[test]
    fn test_read_tags_empty_data() {
        assert!(read_tags(&[], SourceFormat::Jpeg).is_empty());
    }

    #[test]
    fn test_exif_make_is_read() {
        let tags = exif_tags(&jpeg_with_exif_make());
        assert_eq!(tags.get("Make").map(String::as_str), Some("Canon"));
    }

    #[test]
    fn test_jpeg_without_exif_still_has_jfif() {
        assert!(exif_tags(JFIF_ONLY).is_empty());

        let tags = read_tags(JFIF_ONLY, SourceFormat::Jpeg);
        assert_eq!(tags.get("JFIF version").map(String::as_str), Some("1.01"));
        assert_eq!(
            tags.get("Density").map(String::as_str),
            Some("1 x 1 (aspect ratio)")
        );
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_jfif_density_units() {
        let mut dpi = JFIF_ONLY.to_vec();
        dpi[13] = 1;
        dpi[14..18].copy_from_slice(&[0x01, 0x2C, 0x01, 0x2C]); // 300 x 300
        assert_eq!(
            jfif_tags(&dpi).get("Density").map(String::as_str),
            Some("300 x 300 dpi")
        );

        let mut per_cm = JFIF_ONLY.to_vec();
        per_cm[13] = 2;
        per_cm[14..18].copy_from_slice(&[0x00, 0x76, 0x00, 0x76]); // 118 per cm
        assert_eq!(
            jfif_tags(&per_cm).get("Density").map(String::as_str),
            Some("300 x 300 dpi")
        );
    }

    #[test]
    fn test_jfif_truncated_segment_is_ignored() {
        assert!(jfif_tags(&JFIF_ONLY[..10]).is_empty());
    }

    #[test]
    fn test_jfif_found_after_exif_segment() {
        let exif = jpeg_with_exif_make();
        let mut bytes = exif[..exif.len() - 2].to_vec();
        bytes.extend_from_slice(&JFIF_ONLY[2..]);

        let tags = read_tags(&bytes, SourceFormat::Jpeg);
        assert_eq!(tags.get("Make").map(String::as_str), Some("Canon"));
        assert_eq!(tags.get("JFIF version").map(String::as_str), Some("1.01"));
    }

    #[test]
    fn test_png_text_and_density() {
        let png = png_with_chunks(
            &[("Software", "GIMP"), ("Title", "Harbour at dusk")],
            Some(png::PixelDimensions {
                xppu: 2835,
                yppu: 2835,
                unit: Unit::Meter,
            }),
            None,
        );

        let tags = read_tags(&png, SourceFormat::Png);
        assert_eq!(tags.get("Software").map(String::as_str), Some("GIMP"));
        assert_eq!(tags.get("Title").map(String::as_str), Some("Harbour at dusk"));
        assert_eq!(tags.get("Density").map(String::as_str), Some("72 x 72 dpi"));
        assert!(!tags.contains_key("Gamma"));
    }

    #[test]
    fn test_png_gamma_and_unitless_density() {
        let png = png_with_chunks(
            &[],
            Some(png::PixelDimensions {
                xppu: 2,
                yppu: 1,
                unit: Unit::Unspecified,
            }),
            Some(png::ScaledFloat::from_scaled(45455)),
        );

        let tags = png_tags(&png);
        assert_eq!(
            tags.get("Density").map(String::as_str),
            Some("2 x 1 (aspect ratio)")
        );
        assert_eq!(tags.get("Gamma").map(String::as_str), Some("0.45455"));
    }

    #[test]
    fn test_plain_png_has_no_tags() {
        assert!(read_tags(&png_with_chunks(&[], None, None), SourceFormat::Png).is_empty());
    }
}
