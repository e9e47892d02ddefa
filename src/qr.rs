//! QR symbol rendering.
//!
//! Symbol construction (version selection, masking, error-correction
//! codewords) is delegated to the `qrcode` crate. This module only paints
//! the resulting module matrix onto a grayscale canvas and writes it out:
//!
//! ```text
//! ┌────────────────────────────┐
//! │        quiet zone          │  ← `border` modules of white
//! │    ┌──────────────────┐    │
//! │    │ ██ ██ █ ██  █ ██ │    │
//! │    │ █ ███ ██ █ ██ █  │    │  ← one module = `module_px` × `module_px`
//! │    │ ...              │    │
//! │    └──────────────────┘    │
//! └────────────────────────────┘
//! ```

use image::codecs::jpeg::JpegEncoder;
use image::{GrayImage, ImageEncoder, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use std::io::BufWriter;
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};

/// Pixels per QR module.
pub const MODULE_PX: u32 = 10;

/// Quiet zone in modules (the symbology requires at least 4).
pub const QUIET_MODULES: u32 = 4;

/// JPEG output quality (0–100).
const JPEG_QUALITY: u8 = 95;

const DARK: Luma<u8> = Luma([0u8]);
const LIGHT: Luma<u8> = Luma([255u8]);

/// How a symbol is rasterised.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub module_px: u32,
    pub border: u32,
    pub ec_level: EcLevel,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            module_px: MODULE_PX,
            border: QUIET_MODULES,
            ec_level: EcLevel::L,
        }
    }
}

/// What was written, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rendered {
    /// Modules per side, excluding the quiet zone.
    pub modules: u32,
    /// Image side length in pixels.
    pub pixels: u32,
}

/// Paint the QR matrix onto `img` with its top-left module at `(x, y)`.
fn draw_qr(img: &mut GrayImage, x: u32, y: u32, qr: &QrCode, module_px: u32) {
    let w = qr.width();
    let colors = qr.to_colors();
    for qy in 0..w {
        for qx in 0..w {
            if colors[qy * w + qx] != qrcode::Color::Dark {
                continue;
            }
            for py in 0..module_px {
                for px in 0..module_px {
                    let ix = x + qx as u32 * module_px + px;
                    let iy = y + qy as u32 * module_px + py;
                    if ix < img.width() && iy < img.height() {
                        img.put_pixel(ix, iy, DARK);
                    }
                }
            }
        }
    }
}

/// Encode `text` into the smallest symbol that fits and rasterise it.
pub fn render(text: &str, opts: &RenderOptions) -> Result<GrayImage> {
    if opts.module_px == 0 {
        return Err(Error::EncodingFailure(
            "module size must be at least 1 pixel".to_string(),
        ));
    }
    let qr = QrCode::with_error_correction_level(text.as_bytes(), opts.ec_level)
        .map_err(|e| Error::EncodingFailure(e.to_string()))?;
    debug!(version = ?qr.version(), width = qr.width(), "symbol built");

    let quiet = opts.border * opts.module_px;
    let side = qr.width() as u32 * opts.module_px + quiet * 2;
    let mut img = GrayImage::from_pixel(side, side, LIGHT);
    draw_qr(&mut img, quiet, quiet, &qr, opts.module_px);
    Ok(img)
}

/// Write an image to `path`.
///
/// The format follows the file extension:
/// - `.jpg` / `.jpeg` — JPEG at 95% quality
/// - anything else — lossless PNG (safest for scanning)
pub fn save(img: &GrayImage, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let write_failed = |e: &dyn std::fmt::Display| {
        Error::EncodingFailure(format!("cannot write {}: {e}", path.display()))
    };

    match ext.as_deref() {
        Some("jpg" | "jpeg") => {
            let file = std::fs::File::create(path).map_err(|e| write_failed(&e))?;
            JpegEncoder::new_with_quality(BufWriter::new(file), JPEG_QUALITY)
                .write_image(
                    img.as_raw(),
                    img.width(),
                    img.height(),
                    image::ExtendedColorType::L8,
                )
                .map_err(|e| write_failed(&e))?;
        }
        _ => {
            img.save_with_format(path, ImageFormat::Png)
                .map_err(|e| write_failed(&e))?;
        }
    }
    Ok(())
}

/// Render `text` and save it to `path`.
pub fn generate(text: &str, path: &Path, opts: &RenderOptions) -> Result<Rendered> {
    let img = render(text, opts)?;
    save(&img, path)?;
    let pixels = img.width();
    let modules = pixels / opts.module_px - opts.border * 2;
    debug!(path = %path.display(), pixels, modules, "image written");
    Ok(Rendered { modules, pixels })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD as B64;
    use base64::Engine;
    use rqrr::PreparedImage;
    use tempfile::TempDir;

    /// Decode the first QR symbol found in `img`.
    fn scan_image(img: &GrayImage) -> Vec<u8> {
        let mut prepared = PreparedImage::prepare_from_greyscale(
            img.width() as usize,
            img.height() as usize,
            |x, y| img.get_pixel(x as u32, y as u32).0[0],
        );
        let grids = prepared.detect_grids();
        assert!(!grids.is_empty(), "no QR code detected in image");
        let mut data = Vec::new();
        grids[0].decode_to(&mut data).expect("QR decode failed");
        data
    }

    fn small() -> RenderOptions {
        RenderOptions {
            module_px: 4,
            ..RenderOptions::default()
        }
    }

    // -- rendering --

    #[test]
    fn version_one_dimensions() {
        // "Hello, world!" fits in a version 1 symbol (21 modules).
        let img = render("Hello, world!", &RenderOptions::default()).unwrap();
        assert_eq!(img.dimensions(), (290, 290));
    }

    #[test]
    fn custom_module_size_and_border() {
        let opts = RenderOptions {
            module_px: 1,
            border: 0,
            ec_level: EcLevel::L,
        };
        let img = render("Hello, world!", &opts).unwrap();
        assert_eq!(img.dimensions(), (21, 21));
    }

    #[test]
    fn quiet_zone_is_white_and_symbol_has_dark() {
        let img = render("https://example.com", &RenderOptions::default()).unwrap();
        let quiet = QUIET_MODULES * MODULE_PX;
        for i in 0..img.width() {
            assert_eq!(img.get_pixel(i, 0).0[0], 255);
            assert_eq!(img.get_pixel(0, i).0[0], 255);
            assert_eq!(img.get_pixel(i, quiet - 1).0[0], 255);
        }
        // Finder pattern corner module is dark.
        assert_eq!(img.get_pixel(quiet, quiet).0[0], 0);
    }

    #[test]
    fn only_black_and_white_pixels() {
        let img = render("mono", &small()).unwrap();
        assert!(img.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[test]
    fn larger_payload_grows_symbol() {
        let a = render("x", &small()).unwrap();
        let b = render(&"x".repeat(500), &small()).unwrap();
        assert!(b.width() > a.width());
    }

    #[test]
    fn too_long_is_encoding_failure() {
        let text = "a".repeat(2954);
        assert!(matches!(
            render(&text, &small()),
            Err(Error::EncodingFailure(_))
        ));
    }

    #[test]
    fn max_capacity_fits() {
        let text = "a".repeat(2953);
        let opts = RenderOptions {
            module_px: 1,
            ..RenderOptions::default()
        };
        let img = render(&text, &opts).unwrap();
        // Version 40 is 177 modules wide.
        assert_eq!(img.width(), 177 + 8);
    }

    #[test]
    fn zero_module_size_rejected() {
        let opts = RenderOptions {
            module_px: 0,
            ..RenderOptions::default()
        };
        assert!(matches!(render("x", &opts), Err(Error::EncodingFailure(_))));
    }

    // -- round trips through an actual symbol --

    #[test]
    fn url_roundtrip() {
        let url = "https://example.com/path?query=1&other=two#frag";
        let img = render(url, &RenderOptions::default()).unwrap();
        assert_eq!(scan_image(&img), url.as_bytes());
    }

    #[test]
    fn unicode_text_roundtrip() {
        let text = "Grüße, 世界! Line two\nand a tab\there.";
        let img = render(text, &small()).unwrap();
        assert_eq!(String::from_utf8(scan_image(&img)).unwrap(), text);
    }

    #[test]
    fn medium_text_roundtrip() {
        let text: String = (0..600)
            .map(|i| char::from(b'a' + (i % 26) as u8))
            .collect();
        let img = render(&text, &small()).unwrap();
        assert_eq!(String::from_utf8(scan_image(&img)).unwrap(), text);
    }

    #[test]
    fn base64_bytes_roundtrip() {
        let bytes: Vec<u8> = (0..300u32).map(|i| (i * 37 % 256) as u8).collect();
        let text = B64.encode(&bytes);
        let img = render(&text, &small()).unwrap();
        let scanned = scan_image(&img);
        assert_eq!(B64.decode(scanned).unwrap(), bytes);
    }

    // -- file output --

    #[test]
    fn save_png_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("qrcode.png");
        let rendered = generate("saved", &path, &small()).unwrap();
        assert_eq!(rendered.modules, 21);

        let reloaded = image::open(&path).unwrap().into_luma8();
        assert_eq!(reloaded.width(), rendered.pixels);
        assert_eq!(scan_image(&reloaded), b"saved");
    }

    #[test]
    fn save_jpeg() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("qrcode.JPG");
        generate("jpeg output", &path, &RenderOptions::default()).unwrap();
        let size = std::fs::metadata(&path).unwrap().len();
        assert!(size > 100, "JPEG should have non-trivial size, got {size}");
        let reloaded = image::open(&path).unwrap().into_luma8();
        assert_eq!(scan_image(&reloaded), b"jpeg output");
    }

    #[test]
    fn unknown_extension_written_as_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("qrcode.out");
        generate("fallback", &path, &small()).unwrap();
        let head = std::fs::read(&path).unwrap();
        assert_eq!(&head[..4], b"\x89PNG");
    }

    #[test]
    fn unwritable_path_is_encoding_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing-dir").join("qrcode.png");
        assert!(matches!(
            generate("x", &path, &small()),
            Err(Error::EncodingFailure(_))
        ));
    }
}
