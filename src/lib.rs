#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

//! Driver for the RM690B0 AMOLED controller.
//!
//! The controller is driven through a [`PanelIo`] transport that the caller
//! owns; the driver only borrows it. Enable and reset pins are optional.
//!
//! The driver is blocking by default. Enable the `async` feature for an async
//! variant of the same API.

pub mod command;
pub mod format;
pub mod interface;
pub mod orientation;
pub mod window;

use core::marker::PhantomData;

use embedded_graphics_core::primitives::Rectangle;
use embedded_hal::digital::{Error as _, ErrorKind, OutputPin, PinState};

use command::{Command, Instruction, PIXEL_WORD, init_sequence};
use format::SWAP_RGB565_BYTES;
use window::AddressWindow;

pub use format::PixelFormat;
pub use interface::{NoPin, PanelIo, Timer};
pub use orientation::{ColorOrder, Orientation, ScanDirection};
pub use window::Window;

/// Time the controller needs after power up before it processes commands.
const POWER_ON_DELAY_MS: u64 = 25;
/// Hold time of each level in the reset sequence.
const RESET_DELAY_MS: u64 = 300;

pub const MAX_BRIGHTNESS: u8 = 0xFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// One of 3, 8, 16, 18 or 24.
    pub bits_per_pixel: u8,
    /// 8-bit grayscale. Only valid with 8 bits per pixel.
    pub grayscale: bool,
    pub orientation: Orientation,
    pub x_gap: u16,
    pub y_gap: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bits_per_pixel: 16,
            grayscale: false,
            orientation: Orientation::default(),
            x_gap: 0,
            y_gap: 0,
        }
    }
}

impl Config {
    pub fn pixel_format(&self) -> Result<PixelFormat, ConfigError> {
        PixelFormat::select(self.bits_per_pixel, self.grayscale).ok_or(
            if self.grayscale && self.bits_per_pixel != 8 {
                ConfigError::GrayscaleRequires8Bpp(self.bits_per_pixel)
            } else {
                ConfigError::UnsupportedBitsPerPixel(self.bits_per_pixel)
            },
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    UnsupportedBitsPerPixel(u8),
    GrayscaleRequires8Bpp(u8),
}

#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E = ()> {
    /// Communication error
    Comm(E),
    /// Pin setting error
    Pin(ErrorKind),
    /// Unsupported pixel format settings
    InvalidConfig(ConfigError),
    /// Window is empty, inverted, or out of the 16-bit address range
    InvalidWindow,
    /// Color data is shorter than the window needs
    BufferTooSmall { required: usize, actual: usize },
}

fn pin_error<P: embedded_hal::digital::Error, E>(err: P) -> Error<E> {
    Error::Pin(err.kind())
}

/// RM690B0 panel.
///
/// The transport is borrowed for the lifetime of the driver. The driver isn't
/// synchronised; share it between tasks behind a mutex.
pub struct RM690B0<'io, IO, RST, EN, TIMER>
where
    IO: PanelIo,
    RST: OutputPin,
    EN: OutputPin,
    TIMER: Timer,
{
    io: &'io mut IO,
    reset: Option<RST>,
    enable: Option<EN>,
    brightness: u8,
    x_gap: u16,
    y_gap: u16,
    format: PixelFormat,
    orientation: Orientation,
    _timer: PhantomData<TIMER>,
}

#[maybe_async_cfg::maybe(
    sync(cfg(not(feature = "async")), self = "RM690B0",),
    async(feature = "async", keep_self)
)]
impl<'io, IO, RST, EN, E, TIMER> RM690B0<'io, IO, RST, EN, TIMER>
where
    IO: PanelIo<Error = E>,
    RST: OutputPin,
    EN: OutputPin,
    TIMER: Timer,
{
    /// Creates the driver. Nothing is sent until [`init`](Self::init).
    ///
    /// Without an enable pin the caller must power the controller before
    /// calling `init`. Pins are expected to be configured as outputs already.
    pub fn new(
        io: &'io mut IO,
        config: Config,
        reset: Option<RST>,
        enable: Option<EN>,
    ) -> Result<Self, Error<E>> {
        let format = match config.pixel_format() {
            Ok(format) => format,
            Err(err) => {
                #[cfg(feature = "defmt")]
                defmt::error!(
                    "Unsupported pixel format setting: {} bits per pixel, grayscale: {}",
                    config.bits_per_pixel,
                    config.grayscale
                );
                return Err(Error::InvalidConfig(err));
            }
        };

        if enable.is_none() {
            #[cfg(feature = "defmt")]
            defmt::warn!("No EN pin configured. Caller must power up the RM690B0 before init.");
        }

        Ok(Self {
            io,
            reset,
            enable,
            brightness: 0,
            x_gap: config.x_gap,
            y_gap: config.y_gap,
            format,
            orientation: config.orientation,
            _timer: PhantomData,
        })
    }

    pub async fn init(&mut self) -> Result<(), Error<E>> {
        // Power up the controller
        if let Some(en) = self.enable.as_mut() {
            en.set_high().map_err(pin_error::<_, E>)?;
            TIMER::delay_ms(POWER_ON_DELAY_MS).await;
        }

        self.send_commands(&init_sequence()).await?;

        if self.update_orientation().await.is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Failed to apply orientation during init");
        }

        self.write_pixel_format().await?;
        self.set_brightness(MAX_BRIGHTNESS).await
    }

    /// Hardware reset: high, low, high with 300 ms at each level.
    ///
    /// Without a reset pin only the delays run.
    pub async fn reset(&mut self) -> Result<(), Error<E>> {
        if self.reset.is_none() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Reset requested but no RESET pin is configured");
        }

        for level in [PinState::High, PinState::Low, PinState::High] {
            if let Some(rst) = self.reset.as_mut() {
                rst.set_state(level).map_err(pin_error::<_, E>)?;
            }
            TIMER::delay_ms(RESET_DELAY_MS).await;
        }

        Ok(())
    }

    /// Drives the reset and enable pins low and hands them back.
    ///
    /// A pin that fails to change level is logged and skipped so the other
    /// one is still released.
    pub fn teardown(mut self) -> (Option<RST>, Option<EN>) {
        if let Some(rst) = self.reset.as_mut() {
            release_pin(rst, "RESET");
        }
        if let Some(en) = self.enable.as_mut() {
            release_pin(en, "EN");
        }

        (self.reset, self.enable)
    }

    /// Writes `color` into `window`.
    ///
    /// `color` must hold at least `width * height * bits_per_pixel / 8`
    /// bytes, already in the controller's pixel format. Extra bytes are not
    /// sent.
    pub async fn draw(&mut self, window: Window, color: &[u8]) -> Result<(), Error<E>> {
        let bits_per_pixel = self.format.bits_per_pixel();
        let Some(area) = AddressWindow::new(window, self.x_gap, self.y_gap, bits_per_pixel) else {
            return Err(Error::InvalidWindow);
        };

        let Some(color) = color.get(..area.payload_len) else {
            return Err(Error::BufferTooSmall {
                required: area.payload_len,
                actual: color.len(),
            });
        };

        self.send_commands(&[
            Command::new(Instruction::ColumnAddressSet, &area.columns),
            Command::new(Instruction::RowAddressSet, &area.rows),
            Command::new(Instruction::MemoryWrite, &[]),
        ])
        .await?;

        self.io.tx_color(PIXEL_WORD, color).await.map_err(Error::Comm)
    }

    /// [`draw`](Self::draw) for an `embedded-graphics` rectangle.
    pub async fn draw_rect(&mut self, rect: &Rectangle, color: &[u8]) -> Result<(), Error<E>> {
        match Window::from_rectangle(rect) {
            Some(window) => self.draw(window, color).await,
            None => Err(Error::InvalidWindow),
        }
    }

    pub async fn invert_color(&mut self, invert: bool) -> Result<(), Error<E>> {
        let instruction = if invert {
            Instruction::DisplayInversionOn
        } else {
            Instruction::DisplayInversionOff
        };
        self.send_command(Command::new(instruction, &[])).await
    }

    /// Sets the offset added to every window. Takes effect on the next draw.
    pub fn set_gap(&mut self, x_gap: u16, y_gap: u16) {
        self.x_gap = x_gap;
        self.y_gap = y_gap;
    }

    pub fn gap(&self) -> (u16, u16) {
        (self.x_gap, self.y_gap)
    }

    /// Flags are kept even if sending the new scan direction fails.
    pub async fn set_mirror(&mut self, mirror_x: bool, mirror_y: bool) -> Result<(), Error<E>> {
        self.orientation.mirror_x = mirror_x;
        self.orientation.mirror_y = mirror_y;
        self.update_orientation().await
    }

    pub async fn set_swap_xy(&mut self, swap_xy: bool) -> Result<(), Error<E>> {
        self.orientation.swap_xy = swap_xy;
        self.update_orientation().await
    }

    pub async fn set_color_order(&mut self, color_order: ColorOrder) -> Result<(), Error<E>> {
        self.orientation.color_order = color_order;
        self.update_orientation().await
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// `(mirror_x, mirror_y)`
    pub fn mirror(&self) -> (bool, bool) {
        (self.orientation.mirror_x, self.orientation.mirror_y)
    }

    pub fn swap_xy(&self) -> bool {
        self.orientation.swap_xy
    }

    pub fn color_order(&self) -> ColorOrder {
        self.orientation.color_order
    }

    /// Switches to another pixel format and sends it right away.
    ///
    /// Nothing changes if the format is unsupported.
    pub async fn set_pixel_format(
        &mut self,
        bits_per_pixel: u8,
        grayscale: bool,
    ) -> Result<(), Error<E>> {
        let config = Config {
            bits_per_pixel,
            grayscale,
            ..Config::default()
        };
        match config.pixel_format() {
            Ok(format) => self.format = format,
            Err(err) => return Err(Error::InvalidConfig(err)),
        }
        self.write_pixel_format().await
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    pub fn bits_per_pixel(&self) -> u8 {
        self.format.bits_per_pixel()
    }

    pub fn grayscale(&self) -> bool {
        self.format == PixelFormat::Gray8
    }

    /// Display on/off. The panel keeps its memory while off.
    pub async fn set_power(&mut self, on: bool) -> Result<(), Error<E>> {
        let instruction = if on {
            Instruction::DisplayOn
        } else {
            Instruction::DisplayOff
        };
        self.send_command(Command::new(instruction, &[])).await
    }

    pub async fn set_sleep(&mut self, sleep: bool) -> Result<(), Error<E>> {
        let instruction = if sleep {
            Instruction::SleepIn
        } else {
            Instruction::SleepOut
        };
        self.send_command(Command::new(instruction, &[])).await
    }

    /// Last brightness passed to [`set_brightness`](Self::set_brightness),
    /// whether or not the controller accepted it.
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub async fn set_brightness(&mut self, brightness: u8) -> Result<(), Error<E>> {
        // Cached up front and not rolled back on failure.
        self.brightness = brightness;
        self.send_command(Command::new(Instruction::WriteDisplayBrightness, &[brightness]))
            .await
    }

    async fn update_orientation(&mut self) -> Result<(), Error<E>> {
        let param = self.orientation.madctl();
        #[cfg(feature = "defmt")]
        defmt::debug!("Applying rotation code: {=u8:#x}", param);

        self.send_command(Command::new(Instruction::MemoryAccessControl, &[param]))
            .await
    }

    async fn write_pixel_format(&mut self) -> Result<(), Error<E>> {
        let format = self.format;
        self.send_command(Command::new(Instruction::PixelFormatSet, &[format.code()]))
            .await?;

        if format.needs_byte_swap()
            && self
                .send_command(Command::new(
                    Instruction::PixelFormatOption,
                    &[SWAP_RGB565_BYTES],
                ))
                .await
                .is_err()
        {
            #[cfg(feature = "defmt")]
            defmt::warn!("Failed to set RGB565 byte order");
        }

        Ok(())
    }

    /// Sends the command, then waits out its settle delay.
    ///
    /// The delay runs even if the transport reports an error.
    async fn send_command(&mut self, cmd: Command<'_>) -> Result<(), Error<E>> {
        log_command(&cmd);
        let result = self.io.tx_param(cmd.word(), cmd.params()).await;

        let delay = cmd.delay_ms();
        if delay > 0 {
            TIMER::delay_ms(u64::from(delay)).await;
        }

        result.map_err(Error::Comm)
    }

    /// Sends `cmds` in order and stops at the first failure.
    async fn send_commands(&mut self, cmds: &[Command<'_>]) -> Result<(), Error<E>> {
        for cmd in cmds {
            if let Err(err) = self.send_command(*cmd).await {
                #[cfg(feature = "defmt")]
                defmt::error!("Command {=u8:#x} failed", cmd.address());
                return Err(err);
            }
        }
        Ok(())
    }
}

#[cfg(feature = "defmt")]
fn log_command(cmd: &Command<'_>) {
    match cmd.params() {
        [param] => defmt::debug!(
            "Sending command {=u32:#x} with parameter {=u8:#x}",
            cmd.word(),
            param
        ),
        params => defmt::debug!(
            "Sending command {=u32:#x} with {} parameters",
            cmd.word(),
            params.len()
        ),
    }
}

#[cfg(not(feature = "defmt"))]
fn log_command(_cmd: &Command<'_>) {}

fn release_pin<P: OutputPin>(pin: &mut P, _name: &str) {
    match pin.set_low() {
        Ok(()) => {
            #[cfg(feature = "defmt")]
            defmt::debug!("{=str} pin released", _name);
        }
        Err(_err) => {
            #[cfg(feature = "defmt")]
            defmt::error!("Failed to release {=str} pin: {}", _name, _err.kind());
        }
    }
}
