//! Interface pixel format selection.

use embedded_graphics_core::pixelcolor::PixelColor;
use embedded_graphics_core::prelude::RawData;

/// Parameter of the option command sent after COLMOD in 16 bpp mode.
/// Swaps the RGB565 byte order.
pub const SWAP_RGB565_BYTES: u8 = 0b0001_0000;

/// Pixel formats supported by the controller's memory interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PixelFormat {
    /// 3 bpp, one bit per channel
    Rgb111 = 0b0011_0011,
    /// 8 bpp grayscale
    Gray8 = 0b0001_0001,
    /// 8 bpp color
    Rgb332 = 0b0010_0010,
    Rgb565 = 0b0101_0101,
    Rgb666 = 0b0110_0110,
    Rgb888 = 0b0111_0111,
}

impl PixelFormat {
    /// Selects the format for a bit depth.
    ///
    /// Returns `None` for depths the controller doesn't support, and for
    /// grayscale at any depth other than 8.
    pub const fn select(bits_per_pixel: u8, grayscale: bool) -> Option<Self> {
        if grayscale && bits_per_pixel != 8 {
            return None;
        }

        match bits_per_pixel {
            3 => Some(Self::Rgb111),
            8 if grayscale => Some(Self::Gray8),
            8 => Some(Self::Rgb332),
            16 => Some(Self::Rgb565),
            18 => Some(Self::Rgb666),
            24 => Some(Self::Rgb888),
            _ => None,
        }
    }

    /// Format matching the raw storage of an `embedded-graphics` color type.
    pub fn for_color<C: PixelColor>(grayscale: bool) -> Option<Self> {
        let bits = <C::Raw as RawData>::BITS_PER_PIXEL;
        u8::try_from(bits)
            .ok()
            .and_then(|bits| Self::select(bits, grayscale))
    }

    /// COLMOD parameter byte.
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn bits_per_pixel(self) -> u8 {
        match self {
            Self::Rgb111 => 3,
            Self::Gray8 | Self::Rgb332 => 8,
            Self::Rgb565 => 16,
            Self::Rgb666 => 18,
            Self::Rgb888 => 24,
        }
    }

    /// Whether the byte order option command must follow COLMOD.
    pub const fn needs_byte_swap(self) -> bool {
        matches!(self, Self::Rgb565)
    }
}
