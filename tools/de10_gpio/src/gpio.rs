//! Pin and port handles
//!
//! A [`Gpio`] is one bit of one register. A [`Port`] is the whole register,
//! used where a demo writes a full word at once.

use log::debug;

use crate::board::{Board, DeviceKind, REGISTER_WIDTH};
use crate::bus::RegisterBus;
use crate::GpioError;

/// One GPIO line bound to a register bit
///
/// The handle stores the base address resolved at init time and never
/// caches register contents.
#[derive(Debug)]
pub struct Gpio<'a, B: RegisterBus> {
    board: &'a Board<B>,
    base: u32,
    kind: DeviceKind,
    pin: u8,
}

impl<'a, B: RegisterBus> Gpio<'a, B> {
    /// Bind `pin` of the `kind` register. Touches no register.
    pub fn init(board: &'a Board<B>, pin: u8, kind: DeviceKind) -> Result<Self, GpioError> {
        let max = kind.max_pin();
        if pin > max || pin >= REGISTER_WIDTH {
            return Err(GpioError::PinOutOfRange { kind, pin, max });
        }

        let base = board.base(kind);
        debug!("Bound {} pin {} at {:#010X}", kind, pin, base);

        Ok(Self {
            board,
            base,
            kind,
            pin,
        })
    }

    /// Like [`Gpio::init`], taking the kind as a raw selector (0 = LED, 1 = switch, 2 = button)
    pub fn init_raw(board: &'a Board<B>, pin: u8, selector: u8) -> Result<Self, GpioError> {
        let kind = DeviceKind::try_from(selector)?;
        Self::init(board, pin, kind)
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }

    pub fn base_address(&self) -> u32 {
        self.base
    }

    fn mask(&self) -> u32 {
        1 << self.pin
    }

    /// Set or clear this pin, leaving the rest of the register untouched
    pub fn write(&self, high: bool) -> Result<(), GpioError> {
        if !self.kind.is_output() {
            return Err(GpioError::NotWritable(self.kind));
        }

        let mask = self.mask();
        self.board.bus().modify(self.base, |value| {
            if high {
                value | mask
            } else {
                value & !mask
            }
        })
    }

    /// Integer form of [`Gpio::write`]: any nonzero value sets the pin
    pub fn write_raw(&self, value: u32) -> Result<(), GpioError> {
        self.write(value != 0)
    }

    #[inline]
    pub fn set_high(&self) -> Result<(), GpioError> {
        self.write(true)
    }

    #[inline]
    pub fn set_low(&self) -> Result<(), GpioError> {
        self.write(false)
    }

    /// Raw level of the pin, without polarity correction
    pub fn read(&self) -> Result<bool, GpioError> {
        if !self.kind.is_input() {
            return Err(GpioError::NotReadable(self.kind));
        }

        let value = self.board.bus().read(self.base)?;
        Ok(value & self.mask() != 0)
    }

    /// Whether the input is asserted, honouring active-low buttons
    pub fn is_active(&self) -> Result<bool, GpioError> {
        let level = self.read()?;
        Ok(level != self.kind.is_active_low())
    }
}

/// A whole GPIO register
#[derive(Debug)]
pub struct Port<'a, B: RegisterBus> {
    board: &'a Board<B>,
    base: u32,
    kind: DeviceKind,
}

impl<'a, B: RegisterBus> Port<'a, B> {
    pub fn new(board: &'a Board<B>, kind: DeviceKind) -> Self {
        Self {
            board,
            base: board.base(kind),
            kind,
        }
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn read(&self) -> Result<u32, GpioError> {
        self.board.bus().read(self.base)
    }

    /// Overwrite every bit of an output register
    pub fn write(&self, value: u32) -> Result<(), GpioError> {
        if !self.kind.is_output() {
            return Err(GpioError::NotWritable(self.kind));
        }
        self.board.bus().write(self.base, value)
    }

    pub fn clear(&self) -> Result<(), GpioError> {
        self.write(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::AddressMap;
    use crate::bus::SimBus;
    use pretty_assertions::assert_eq;

    fn board() -> Board<SimBus> {
        Board::simulated(AddressMap::CASE_GOLD)
    }

    #[test]
    fn test_init_keeps_inputs() {
        let board = board();
        for kind in DeviceKind::ALL {
            for pin in 0..=kind.max_pin() {
                let gpio = Gpio::init(&board, pin, kind).unwrap();
                assert_eq!(gpio.kind(), kind);
                assert_eq!(gpio.pin(), pin);
                assert_eq!(gpio.base_address(), AddressMap::CASE_GOLD.base(kind));
            }
        }
    }

    #[test]
    fn test_init_does_not_touch_registers() {
        let board = board();
        board.bus().preset(DeviceKind::Led, 0xA5).unwrap();
        let _led = Gpio::init(&board, 3, DeviceKind::Led).unwrap();
        assert_eq!(board.bus().peek(DeviceKind::Led).unwrap(), 0xA5);
    }

    #[test]
    fn test_init_raw_rejects_unknown_selector() {
        let board = board();
        assert_eq!(
            Gpio::init_raw(&board, 0, 1).unwrap().kind(),
            DeviceKind::Switch
        );
        assert_eq!(
            Gpio::init_raw(&board, 0, 7).unwrap_err(),
            GpioError::InvalidDeviceKind("7".to_string())
        );
    }

    #[test]
    fn test_pin_out_of_range() {
        let board = board();
        assert_eq!(
            Gpio::init(&board, 10, DeviceKind::Led).unwrap_err(),
            GpioError::PinOutOfRange {
                kind: DeviceKind::Led,
                pin: 10,
                max: 9
            }
        );
        assert!(matches!(
            Gpio::init(&board, 2, DeviceKind::Button),
            Err(GpioError::PinOutOfRange { max: 1, .. })
        ));
        assert!(Gpio::init(&board, 32, DeviceKind::Switch).is_err());
    }

    #[test]
    fn test_direction_checks() {
        let board = board();
        let led = Gpio::init(&board, 0, DeviceKind::Led).unwrap();
        let switch = Gpio::init(&board, 0, DeviceKind::Switch).unwrap();
        let button = Gpio::init(&board, 0, DeviceKind::Button).unwrap();

        assert_eq!(led.read(), Err(GpioError::NotReadable(DeviceKind::Led)));
        assert_eq!(
            switch.write(true),
            Err(GpioError::NotWritable(DeviceKind::Switch))
        );
        assert_eq!(
            button.write_raw(1),
            Err(GpioError::NotWritable(DeviceKind::Button))
        );
        assert_eq!(
            Port::new(&board, DeviceKind::Switch).write(1),
            Err(GpioError::NotWritable(DeviceKind::Switch))
        );
    }

    #[test]
    fn test_write_raw_truthiness() {
        let board = board();
        let led = Gpio::init(&board, 4, DeviceKind::Led).unwrap();

        led.write_raw(42).unwrap();
        assert_eq!(board.bus().peek(DeviceKind::Led).unwrap(), 1 << 4);
        led.write_raw(0).unwrap();
        assert_eq!(board.bus().peek(DeviceKind::Led).unwrap(), 0);
    }

    #[test]
    fn test_is_active_polarity() {
        let board = board();
        let switch = Gpio::init(&board, 1, DeviceKind::Switch).unwrap();
        let key1 = Gpio::init(&board, 1, DeviceKind::Button).unwrap();

        board.bus().preset(DeviceKind::Switch, 0b10).unwrap();
        board.bus().preset(DeviceKind::Button, 0b01).unwrap();

        assert!(switch.is_active().unwrap());
        assert!(!key1.read().unwrap());
        assert!(key1.is_active().unwrap());
    }

    #[test]
    fn test_handles_alias_register() {
        let board = board();
        let led0 = Gpio::init(&board, 0, DeviceKind::Led).unwrap();
        let led0_again = Gpio::init(&board, 0, DeviceKind::Led).unwrap();
        let port = Port::new(&board, DeviceKind::Led);

        led0.set_high().unwrap();
        led0_again.set_low().unwrap();
        assert_eq!(port.read().unwrap(), 0);
    }
}
