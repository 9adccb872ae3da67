//! Immutable RGB raster the viewer reads pixels from.

use std::fmt;
use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::constants::{GRAYSCALE_SAMPLE_GRID, GRID_INK_LUMINANCE};
use crate::error::{Result, ViewerError};

/// Value of one pixel as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelValue {
    Gray(u8),
    Rgb(u8, u8, u8),
}

impl fmt::Display for PixelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelValue::Gray(v) => write!(f, "Gray={v}"),
            PixelValue::Rgb(r, g, b) => write!(f, "RGB={r}, {g}, {b}"),
        }
    }
}

/// Label color for text drawn on top of a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ink {
    Black,
    White,
}

impl Ink {
    pub fn for_rgb(rgb: [u8; 3]) -> Self {
        if luminance(rgb) > GRID_INK_LUMINANCE {
            Ink::Black
        } else {
            Ink::White
        }
    }
}

/// Perceived brightness (ITU-R BT.601 weights).
pub fn luminance([r, g, b]: [u8; 3]) -> f32 {
    0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32
}

pub struct ImageBuffer {
    pixels: RgbImage,
    grayscale: bool,
    path: Option<PathBuf>,
}

impl ImageBuffer {
    /// Decode an image file. Alpha is dropped.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| ViewerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let decoded = image::load_from_memory(&bytes).map_err(|source| ViewerError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        let rgb = decoded.into_rgb8();
        let (width, height) = rgb.dimensions();
        let mut buffer = Self::from_rgb(width, height, rgb.into_raw())?;
        buffer.path = Some(path.to_path_buf());
        log::info!(
            "loaded {} ({}x{}, {})",
            path.display(),
            buffer.width(),
            buffer.height(),
            if buffer.grayscale { "grayscale" } else { "color" }
        );
        Ok(buffer)
    }

    /// Wrap a buffer handed over by a caller (tightly packed RGB8 rows).
    pub fn from_rgb(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ViewerError::InvalidBuffer(format!(
                "zero dimension {width}x{height}"
            )));
        }
        let expected = width as usize * height as usize * 3;
        if bytes.len() != expected {
            return Err(ViewerError::InvalidBuffer(format!(
                "expected {expected} bytes for {width}x{height}, got {}",
                bytes.len()
            )));
        }
        let pixels = RgbImage::from_raw(width, height, bytes)
            .ok_or_else(|| ViewerError::InvalidBuffer("buffer too small".into()))?;
        Ok(Self::from_image(pixels))
    }

    pub fn from_image(pixels: RgbImage) -> Self {
        let grayscale = detect_grayscale(&pixels);
        Self {
            pixels,
            grayscale,
            path: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn is_grayscale(&self) -> bool {
        self.grayscale
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn raw(&self) -> &RgbImage {
        &self.pixels
    }

    pub fn pixel(&self, x: i64, y: i64) -> Option<[u8; 3]> {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return None;
        }
        Some(self.pixels.get_pixel(x as u32, y as u32).0)
    }

    pub fn value_at(&self, x: i64, y: i64) -> Option<PixelValue> {
        let [r, g, b] = self.pixel(x, y)?;
        Some(if self.grayscale {
            PixelValue::Gray(r)
        } else {
            PixelValue::Rgb(r, g, b)
        })
    }
}

/// Sample a grid of at most ~100x100 points; grayscale iff r == g == b
/// everywhere sampled.
fn detect_grayscale(pixels: &RgbImage) -> bool {
    let (w, h) = pixels.dimensions();
    let step_x = (w / GRAYSCALE_SAMPLE_GRID).max(1) as usize;
    let step_y = (h / GRAYSCALE_SAMPLE_GRID).max(1) as usize;

    (0..h).step_by(step_y).all(|y| {
        (0..w).step_by(step_x).all(|x| {
            let [r, g, b] = pixels.get_pixel(x, y).0;
            r == g && g == b
        })
    })
}
