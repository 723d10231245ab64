//! Memory access control (MADCTL) encoding.
//!
//! Not every combination of axis swap and mirroring works on the RM690B0.
//! Observed behaviour of the scan direction bits:
//!
//! ```text
//! 0x60  swap xy + mirror y (rotate 90)
//! 0x50  display goes wonky
//! 0x40  display goes wonky
//! 0x30  swap xy + mirror x (rotate -90)
//! 0x20  swap xy
//! 0x10  mirror y
//! 0x00  default
//! ```
//!
//! Requests without a working code map onto the closest one that does work,
//! see [`ScanDirection::from_flags`].

/// RGB/BGR element order bit.
const BGR_BIT: u8 = 0b0000_1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorOrder {
    #[default]
    Rgb,
    Bgr,
}

impl ColorOrder {
    pub const fn bits(self) -> u8 {
        match self {
            Self::Rgb => 0,
            Self::Bgr => BGR_BIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ScanDirection {
    Normal = 0x00,
    MirrorY = 0x10,
    SwapXY = 0x20,
    /// Swap xy + mirror x
    Minus90 = 0x30,
    /// Swap xy + mirror y
    Plus90 = 0x60,
}

/// Indexed by `swap_xy << 2 | mirror_x << 1 | mirror_y`.
///
/// Without a swap there is no code for mirror x, so it is dropped. With a
/// swap, mirroring both axes has no code either and falls back to -90, which
/// is only an approximation of the requested image.
const SCAN_TABLE: [ScanDirection; 8] = [
    // no swap
    ScanDirection::Normal,  // -  -
    ScanDirection::MirrorY, // -  my
    ScanDirection::Normal,  // mx -
    ScanDirection::MirrorY, // mx my
    // swap
    ScanDirection::SwapXY,  // -  -
    ScanDirection::Plus90,  // -  my
    ScanDirection::Minus90, // mx -
    ScanDirection::Minus90, // mx my
];

impl ScanDirection {
    pub const fn from_flags(swap_xy: bool, mirror_x: bool, mirror_y: bool) -> Self {
        let index = ((swap_xy as usize) << 2) | ((mirror_x as usize) << 1) | mirror_y as usize;
        SCAN_TABLE[index]
    }

    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Axis mapping and element order of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Orientation {
    pub swap_xy: bool,
    pub mirror_x: bool,
    pub mirror_y: bool,
    pub color_order: ColorOrder,
}

impl Orientation {
    pub const fn scan_direction(&self) -> ScanDirection {
        ScanDirection::from_flags(self.swap_xy, self.mirror_x, self.mirror_y)
    }

    /// MADCTL parameter byte.
    pub const fn madctl(&self) -> u8 {
        self.scan_direction().bits() | self.color_order.bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected(swap_xy: bool, mirror_x: bool, mirror_y: bool) -> u8 {
        match (swap_xy, mirror_x, mirror_y) {
            (false, _, false) => 0x00,
            (false, _, true) => 0x10,
            (true, true, _) => 0x30,
            (true, false, true) => 0x60,
            (true, false, false) => 0x20,
        }
    }

    #[test]
    fn all_flag_combinations() {
        for bits in 0..8u8 {
            let (swap_xy, mirror_x, mirror_y) = (bits & 4 != 0, bits & 2 != 0, bits & 1 != 0);
            let want = expected(swap_xy, mirror_x, mirror_y);

            for (order, extra) in [(ColorOrder::Rgb, 0x00), (ColorOrder::Bgr, 0x08)] {
                let orientation = Orientation {
                    swap_xy,
                    mirror_x,
                    mirror_y,
                    color_order: order,
                };
                assert_eq!(
                    orientation.madctl(),
                    want | extra,
                    "swap={swap_xy} mx={mirror_x} my={mirror_y} {order:?}"
                );
            }
        }
    }

    #[test]
    fn swap_with_both_mirrors_approximates_minus_90() {
        assert_eq!(ScanDirection::from_flags(true, true, true), ScanDirection::Minus90);
    }

    #[test]
    fn mirror_x_without_swap_is_ignored() {
        assert_eq!(ScanDirection::from_flags(false, true, false), ScanDirection::Normal);
    }

    #[test]
    fn default_is_rgb_normal() {
        assert_eq!(Orientation::default().madctl(), 0x00);
    }
}
