use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};

#[maybe_async_cfg::maybe(
    sync(cfg(not(feature = "async")), self = "PanelIo",),
    async(feature = "async", keep_self)
)]
/// Command transport to the controller (usually a QSPI bus).
///
/// `command` is the 32-bit header built by [`crate::command::command_word`]
/// or [`crate::command::PIXEL_WORD`]. The transport sends it ahead of the
/// payload in the same transaction.
pub trait PanelIo {
    type Error: core::fmt::Debug;

    /// Send a register write with its parameter bytes.
    async fn tx_param(&mut self, command: u32, params: &[u8]) -> Result<(), Self::Error>;

    /// Stream pixel data. `color` is sent as-is.
    async fn tx_color(&mut self, command: u32, color: &[u8]) -> Result<(), Self::Error>;
}

#[cfg(not(feature = "async"))]
impl<T: PanelIo + ?Sized> PanelIo for &mut T {
    type Error = T::Error;

    fn tx_param(&mut self, command: u32, params: &[u8]) -> Result<(), Self::Error> {
        T::tx_param(self, command, params)
    }

    fn tx_color(&mut self, command: u32, color: &[u8]) -> Result<(), Self::Error> {
        T::tx_color(self, command, color)
    }
}

#[cfg(feature = "async")]
impl<T: PanelIo + ?Sized> PanelIo for &mut T {
    type Error = T::Error;

    async fn tx_param(&mut self, command: u32, params: &[u8]) -> Result<(), Self::Error> {
        T::tx_param(self, command, params).await
    }

    async fn tx_color(&mut self, command: u32, color: &[u8]) -> Result<(), Self::Error> {
        T::tx_color(self, command, color).await
    }
}

#[maybe_async_cfg::maybe(
    sync(cfg(not(feature = "async")), self = "Timer",),
    async(feature = "async", keep_self)
)]
/// Simplified timer trait for delay operations.
pub trait Timer {
    /// Delay for the specified number of milliseconds.
    async fn delay_ms(milliseconds: u64);
}

/// Placeholder for a reset or enable pin that isn't wired up.
///
/// Use it as the pin type parameter when passing `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPin;

impl ErrorType for NoPin {
    type Error = Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
