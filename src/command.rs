//! RM690B0 command encoding.
//!
//! The controller frames every transaction with a four-byte header:
//!
//! 1. `0x02` for a register write (parameters arrive on a single data line,
//!    even in quad SPI mode), or `0x32` for a pixel stream
//! 2. `0x00`
//! 3. the command address
//! 4. `0x00`
//!
//! The datasheet describes addresses as two bytes with the low byte always
//! zero. Commands that need a non-zero low byte are not supported here.

/// Header prefix for register writes.
pub const COMMAND_PREFIX: u32 = 0x0200_0000;
/// Header prefix for bulk pixel writes.
pub const PIXEL_PREFIX: u32 = 0x3200_0000;

/// Header used for the pixel stream that follows a memory write.
pub const PIXEL_WORD: u32 = PIXEL_PREFIX | ((Instruction::MemoryWrite as u32) << 8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Instruction {
    /// Sleep In (10h) - Enter low-power mode
    SleepIn = 0x10,
    /// Sleep Out (11h) - Exit low-power mode
    SleepOut = 0x11,

    /// Display Inversion Off (20h) - Disable color inversion
    DisplayInversionOff = 0x20,
    /// Display Inversion On (21h) - Enable color inversion
    DisplayInversionOn = 0x21,

    /// Undocumented (24h). Part of the vendor wake sequence.
    VendorWake24 = 0x24,

    /// Display Off (28h) - Disable panel output
    DisplayOff = 0x28,
    /// Display On (29h) - Enable panel output
    DisplayOn = 0x29,
    /// Column Address Set (2Ah) - Horizontal addressing bounds
    ColumnAddressSet = 0x2A,
    /// Row Address Set (2Bh) - Vertical addressing bounds
    RowAddressSet = 0x2B,
    /// Memory Write (2Ch) - Write to memory
    MemoryWrite = 0x2C,

    /// Tearing Effect Line On (35h) - Enable VSync output
    TearingEffectEnable = 0x35,
    /// Memory Access Control (36h) - Scan direction and RGB/BGR order
    MemoryAccessControl = 0x36,
    /// Interface Pixel Format (3Ah) - Color depth configuration
    PixelFormatSet = 0x3A,

    /// Write Display Brightness (51h)
    WriteDisplayBrightness = 0x51,

    /// Undocumented (5Bh). Part of the vendor wake sequence.
    VendorWake5B = 0x5B,

    /// Interface Pixel Format Option (80h) - RGB565 byte order
    PixelFormatOption = 0x80,

    /// Set DISP Mode (C2h) - Internal or external timing
    SetDisplayMode = 0xC2,

    /// CMD Mode Switch (FEh) - Select the active command page
    CommandModeSwitch = 0xFE,
}

/// Builds the transport word for a register write to `address`.
pub const fn command_word(address: u8) -> u32 {
    COMMAND_PREFIX | ((address as u32) << 8)
}

/// Time the controller needs after `instruction` before it accepts the next one.
pub const fn settle_delay_ms(instruction: Instruction) -> u32 {
    match instruction {
        Instruction::SleepIn => 5,
        Instruction::SleepOut => 120,
        Instruction::DisplayOn | Instruction::SetDisplayMode => 10,
        _ => 0,
    }
}

/// A single register write: an instruction and its parameter bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command<'a> {
    instruction: Instruction,
    params: &'a [u8],
}

impl<'a> Command<'a> {
    pub const fn new(instruction: Instruction, params: &'a [u8]) -> Self {
        Self {
            instruction,
            params,
        }
    }

    pub const fn address(&self) -> u8 {
        self.instruction as u8
    }

    pub const fn params(&self) -> &'a [u8] {
        self.params
    }

    /// Transport word for this command.
    pub const fn word(&self) -> u32 {
        command_word(self.address())
    }

    pub const fn delay_ms(&self) -> u32 {
        settle_delay_ms(self.instruction)
    }
}

/// Bring-up sequence sent by `init`, in order.
///
/// Based on LilyGo's RM690B0 init sequence. `0x24` and `0x5B` are not in the
/// datasheet; the panel stays dark without them.
pub fn init_sequence() -> [Command<'static>; 8] {
    [
        // Manufacture command set page
        Command::new(Instruction::CommandModeSwitch, &[0x20]),
        // SPI write RAM
        Command::new(Instruction::VendorWake24, &[0x80]),
        // SWIRE for BV6804
        Command::new(Instruction::VendorWake5B, &[0x2E]),
        // User command set (UCS = CMD1)
        Command::new(Instruction::CommandModeSwitch, &[0x00]),
        // Internal timing
        Command::new(Instruction::SetDisplayMode, &[0x00]),
        Command::new(Instruction::TearingEffectEnable, &[0x00]),
        Command::new(Instruction::SleepOut, &[]),
        Command::new(Instruction::DisplayOn, &[]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_word_places_address_in_third_byte() {
        assert_eq!(command_word(0x11), 0x0200_1100);
        assert_eq!(command_word(0xFE), 0x0200_FE00);
        assert_eq!(Command::new(Instruction::MemoryAccessControl, &[0]).word(), 0x0200_3600);
    }

    #[test]
    fn pixel_word_uses_memory_write() {
        assert_eq!(PIXEL_WORD, 0x3200_2C00);
    }

    #[test]
    fn settle_delays() {
        assert_eq!(settle_delay_ms(Instruction::SleepIn), 5);
        assert_eq!(settle_delay_ms(Instruction::SleepOut), 120);
        assert_eq!(settle_delay_ms(Instruction::DisplayOn), 10);
        assert_eq!(settle_delay_ms(Instruction::SetDisplayMode), 10);
        assert_eq!(settle_delay_ms(Instruction::DisplayOff), 0);
        assert_eq!(settle_delay_ms(Instruction::MemoryWrite), 0);
        assert_eq!(settle_delay_ms(Instruction::WriteDisplayBrightness), 0);
    }

    #[test]
    fn init_sequence_order() {
        let addresses = init_sequence().map(|cmd| cmd.address());
        assert_eq!(addresses, [0xFE, 0x24, 0x5B, 0xFE, 0xC2, 0x35, 0x11, 0x29]);
    }

    #[test]
    fn init_sequence_params() {
        let seq = init_sequence();
        assert_eq!(seq[0].params(), &[0x20]);
        assert_eq!(seq[1].params(), &[0x80]);
        assert_eq!(seq[2].params(), &[0x2E]);
        assert_eq!(seq[3].params(), &[0x00]);
        assert!(seq[6].params().is_empty());
        assert!(seq[7].params().is_empty());
        assert_eq!(seq[6].delay_ms(), 120);
    }
}
