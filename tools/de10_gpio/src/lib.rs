//! GPIO driver for the DE10-Lite Nios II board
//!
//! Binds LEDs, slide switches and push buttons to memory-mapped registers
//! behind one [`Gpio`] handle. Register access goes through a [`RegisterBus`]
//! so the same driver runs against real MMIO or the in-memory [`SimBus`].

pub mod board;
pub mod bus;
pub mod delay;
pub mod demo;
pub mod gpio;

pub use board::{AddressMap, Board, DeviceKind, Target};
pub use bus::{Mmio, RegisterBus, SimBus};
pub use delay::{Delay, NoDelay, SleepDelay, SpinDelay};
pub use gpio::{Gpio, Port};

/// Errors that can occur while binding or accessing GPIO registers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GpioError {
    #[error("Invalid device kind: {0}")]
    InvalidDeviceKind(String),
    #[error("Pin {pin} out of range for {kind} (valid 0..={max})")]
    PinOutOfRange { kind: DeviceKind, pin: u8, max: u8 },
    #[error("Cannot write to {0} register")]
    NotWritable(DeviceKind),
    #[error("Cannot read from {0} register")]
    NotReadable(DeviceKind),
    #[error("No register mapped at {0:#010X}")]
    UnmappedAddress(u32),
    #[error("Register lock poisoned at {0:#010X}")]
    Poisoned(u32),
}
