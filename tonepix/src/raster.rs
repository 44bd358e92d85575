//! 8-bit grayscale rasters and the image file boundary.

use std::{
    io::{
        BufRead,
        Seek,
        Write,
    },
    path::Path,
};

use image::{
    GrayImage,
    ImageFormat,
    ImageReader,
};

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("expected {expected} pixels for {width}x{height}, got {len}")]
    LengthMismatch {
        width: usize,
        height: usize,
        expected: usize,
        len: usize,
    },
    #[error("image of {width}x{height} is too large, dimensions are limited to 65535")]
    DimensionOverflow { width: usize, height: usize },
    #[error("rows have different lengths")]
    RaggedRows,
    #[error("image error")]
    Image(#[from] image::ImageError),
    #[error("io error")]
    Io(#[from] std::io::Error),
}

/// Read access to a grayscale frame, row-major.
pub trait FrameBuffer {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn pixel(&self, x: usize, y: usize) -> u8;
}

impl<F> FrameBuffer for &F
where
    F: FrameBuffer,
{
    #[inline]
    fn width(&self) -> usize {
        (**self).width()
    }

    #[inline]
    fn height(&self) -> usize {
        (**self).height()
    }

    #[inline]
    fn pixel(&self, x: usize, y: usize) -> u8 {
        (**self).pixel(x, y)
    }
}

impl FrameBuffer for GrayImage {
    #[inline]
    fn width(&self) -> usize {
        GrayImage::width(self) as usize
    }

    #[inline]
    fn height(&self) -> usize {
        GrayImage::height(self) as usize
    }

    #[inline]
    fn pixel(&self, x: usize, y: usize) -> u8 {
        self.get_pixel(x as u32, y as u32).0[0]
    }
}

/// A `width` x `height` grid of bytes, stored row by row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: u16,
    height: u16,
    pixels: Vec<u8>,
}

impl Raster {
    pub fn new(width: u16, height: u16, pixels: Vec<u8>) -> Result<Self, RasterError> {
        let expected = usize::from(width) * usize::from(height);
        if pixels.len() != expected {
            return Err(RasterError::LengthMismatch {
                width: width.into(),
                height: height.into(),
                expected,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub(crate) fn from_raw(width: u16, height: u16, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), usize::from(width) * usize::from(height));
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn filled(width: u16, height: u16, value: u8) -> Self {
        Self {
            width,
            height,
            pixels: vec![value; usize::from(width) * usize::from(height)],
        }
    }

    pub fn from_rows<R>(rows: &[R]) -> Result<Self, RasterError>
    where
        R: AsRef<[u8]>,
    {
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        if rows.iter().any(|row| row.as_ref().len() != width) {
            return Err(RasterError::RaggedRows);
        }
        let (width, height) = checked_dimensions(width, rows.len())?;
        let pixels = rows
            .iter()
            .flat_map(|row| row.as_ref().iter().copied())
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Copies any frame buffer into a raster.
    pub fn from_frame<F>(frame: &F) -> Result<Self, RasterError>
    where
        F: FrameBuffer,
    {
        let (width, height) = checked_dimensions(frame.width(), frame.height())?;
        let mut pixels = Vec::with_capacity(frame.width() * frame.height());
        for y in 0..frame.height() {
            for x in 0..frame.width() {
                pixels.push(frame.pixel(x, y));
            }
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Bright in the center, fading to black towards the corners.
    pub fn radial_gradient(width: u16, height: u16) -> Self {
        let center_x = f64::from(width / 2);
        let center_y = f64::from(height / 2);
        let max_distance = center_x.hypot(center_y);

        let mut pixels = Vec::with_capacity(usize::from(width) * usize::from(height));
        for y in 0..height {
            for x in 0..width {
                let value = if max_distance > 0.0 {
                    let distance = (f64::from(x) - center_x).hypot(f64::from(y) - center_y);
                    (255.0 * (1.0 - distance / max_distance)).clamp(0.0, 255.0) as u8
                }
                else {
                    255
                };
                pixels.push(value);
            }
        }

        Self {
            width,
            height,
            pixels,
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        (x < usize::from(self.width))
            .then(|| self.pixels.get(y * usize::from(self.width) + x).copied())
            .flatten()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        // chunks_exact panics on 0
        self.pixels.chunks_exact(usize::from(self.width).max(1))
    }

    pub fn from_image(image: &GrayImage) -> Result<Self, RasterError> {
        let (width, height) = checked_dimensions(
            GrayImage::width(image) as usize,
            GrayImage::height(image) as usize,
        )?;
        Ok(Self {
            width,
            height,
            pixels: image.as_raw().clone(),
        })
    }

    pub fn to_image(&self) -> GrayImage {
        GrayImage::from_raw(
            self.width.into(),
            self.height.into(),
            self.pixels.clone(),
        )
        .expect("raster length is checked on construction")
    }

    /// Reads an image in any supported format and converts it to 8-bit luma.
    pub fn read<R>(reader: R) -> Result<Self, RasterError>
    where
        R: BufRead + Seek,
    {
        let image = ImageReader::new(reader)
            .with_guessed_format()?
            .decode()?
            .into_luma8();
        Self::from_image(&image)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, RasterError> {
        let image = ImageReader::open(path)?.decode()?.into_luma8();
        Self::from_image(&image)
    }

    pub fn write_png<W>(&self, mut writer: W) -> Result<(), RasterError>
    where
        W: Write + Seek,
    {
        self.to_image().write_to(&mut writer, ImageFormat::Png)?;
        Ok(())
    }

    /// Saves the raster, picking the format from the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RasterError> {
        self.to_image().save(path)?;
        Ok(())
    }
}

impl FrameBuffer for Raster {
    #[inline]
    fn width(&self) -> usize {
        self.width.into()
    }

    #[inline]
    fn height(&self) -> usize {
        self.height.into()
    }

    #[inline]
    fn pixel(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * usize::from(self.width) + x]
    }
}

fn checked_dimensions(width: usize, height: usize) -> Result<(u16, u16), RasterError> {
    match (u16::try_from(width), u16::try_from(height)) {
        (Ok(width), Ok(height)) => Ok((width, height)),
        _ => Err(RasterError::DimensionOverflow { width, height }),
    }
}
