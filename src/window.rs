//! Address window and payload size for a rectangular pixel write.

use embedded_graphics_core::primitives::Rectangle;

/// Area to draw, in panel coordinates. The end coordinates are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Window {
    pub x_start: u16,
    pub y_start: u16,
    pub x_end: u16,
    pub y_end: u16,
}

impl Window {
    pub const fn new(x_start: u16, y_start: u16, x_end: u16, y_end: u16) -> Self {
        Self {
            x_start,
            y_start,
            x_end,
            y_end,
        }
    }

    /// Converts an `embedded-graphics` rectangle.
    ///
    /// Returns `None` if the rectangle has negative coordinates or doesn't fit
    /// in 16 bits.
    pub fn from_rectangle(rect: &Rectangle) -> Option<Self> {
        let x_start = u16::try_from(rect.top_left.x).ok()?;
        let y_start = u16::try_from(rect.top_left.y).ok()?;
        let width = u16::try_from(rect.size.width).ok()?;
        let height = u16::try_from(rect.size.height).ok()?;

        Some(Self::new(
            x_start,
            y_start,
            x_start.checked_add(width)?,
            y_start.checked_add(height)?,
        ))
    }

    pub const fn width(&self) -> u16 {
        self.x_end.saturating_sub(self.x_start)
    }

    pub const fn height(&self) -> u16 {
        self.y_end.saturating_sub(self.y_start)
    }

    pub const fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// Parameters of the commands that open a window for writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AddressWindow {
    /// Column Address Set (2Ah) parameters
    pub columns: [u8; 4],
    /// Row Address Set (2Bh) parameters
    pub rows: [u8; 4],
    /// Number of pixel bytes the controller expects after Memory Write
    pub payload_len: usize,
}

impl AddressWindow {
    /// Applies the panel gap and converts the exclusive end coordinates to the
    /// inclusive ones the controller uses.
    ///
    /// Payload length is `width * height * bits_per_pixel / 8`. Depths that
    /// aren't a whole number of bytes are left to the transport to pack.
    ///
    /// Returns `None` for an empty window or one that overflows 16 bits once
    /// the gap is added.
    pub fn new(window: Window, x_gap: u16, y_gap: u16, bits_per_pixel: u8) -> Option<Self> {
        if window.is_empty() {
            return None;
        }

        let columns = span(window.x_start, window.x_end, x_gap)?;
        let rows = span(window.y_start, window.y_end, y_gap)?;
        let payload_len = usize::from(window.width()) * usize::from(window.height())
            * usize::from(bits_per_pixel)
            / 8;

        Some(Self {
            columns,
            rows,
            payload_len,
        })
    }
}

fn span(start: u16, end: u16, gap: u16) -> Option<[u8; 4]> {
    let start = start.checked_add(gap)?;
    let end = end.checked_add(gap)?.checked_sub(1)?;

    let [start_hi, start_lo] = start.to_be_bytes();
    let [end_hi, end_lo] = end.to_be_bytes();
    Some([start_hi, start_lo, end_hi, end_lo])
}
