use image::{imageops, Rgba, RgbaImage};

use crate::error::{BridgeError, Result};

/// Bytes per RGBA pixel
pub const CHANNELS: usize = 4;

/// Rectangle in surface pixels, origin top-left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Region of the given size anchored at the origin
    pub fn at_origin(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * CHANNELS
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// RGBA bytes in row-major order, freshly read from a drawing surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    image: RgbaImage,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes, checking they cover exactly `width` x `height`
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = Region::at_origin(width, height).byte_len();
        let actual = data.len();
        // from_raw accepts oversized buffers, so check the length first
        if actual != expected {
            return Err(BridgeError::BufferSize { expected, actual });
        }
        let image = RgbaImage::from_raw(width, height, data)
            .ok_or(BridgeError::BufferSize { expected, actual })?;
        Ok(Self { image })
    }

    /// Buffer where every pixel is `rgba`
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba(rgba)),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn len(&self) -> usize {
        self.image.as_raw().len()
    }

    pub fn is_empty(&self) -> bool {
        self.image.as_raw().is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// RGBA of the pixel at (x, y), if inside the buffer
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Iterate pixels as RGBA quadruples in row-major order
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.image.pixels().map(|p| p.0)
    }

    /// Copy out `region`, as `getImageData` would. Pixels that fall outside
    /// this buffer read as transparent black, so the result always has the
    /// region's size.
    pub fn crop(&self, region: Region) -> PixelBuffer {
        let mut image = RgbaImage::new(region.width, region.height);
        // replace copies without alpha blending
        imageops::replace(&mut image, &self.image, -(region.x as i64), -(region.y as i64));
        PixelBuffer { image }
    }
}
