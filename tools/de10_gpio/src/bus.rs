//! Register access
//!
//! [`RegisterBus`] is the only way the driver touches a register. [`Mmio`]
//! talks to the real peripherals with volatile accesses; [`SimBus`] keeps
//! the three registers in memory for host runs and tests.

use std::sync::{Mutex, MutexGuard};

use log::trace;

use crate::board::{AddressMap, DeviceKind};
use crate::GpioError;

/// Word-wide access to memory-mapped registers
pub trait RegisterBus {
    fn read(&self, addr: u32) -> Result<u32, GpioError>;

    fn write(&self, addr: u32, value: u32) -> Result<(), GpioError>;

    /// Read-modify-write of a whole register
    fn modify<F>(&self, addr: u32, f: F) -> Result<(), GpioError>
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.read(addr)?;
        self.write(addr, f(value))
    }
}

/// Volatile access to physical registers
#[derive(Debug)]
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// # Safety
    ///
    /// Every address later passed to this bus must be a valid, 4-byte aligned
    /// device register mapped into the address space, and nothing else may
    /// hold Rust references to that memory. On the target this holds for the
    /// addresses of the active [`AddressMap`].
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl RegisterBus for Mmio {
    #[inline]
    fn read(&self, addr: u32) -> Result<u32, GpioError> {
        // SAFETY: the caller of `Mmio::new` vouched for every address used here.
        Ok(unsafe { (addr as usize as *const u32).read_volatile() })
    }

    #[inline]
    fn write(&self, addr: u32, value: u32) -> Result<(), GpioError> {
        // SAFETY: see `read`.
        unsafe { (addr as usize as *mut u32).write_volatile(value) };
        Ok(())
    }
}

/// In-memory stand-in for the LED, switch and button registers
///
/// Each register sits behind its own lock, and [`RegisterBus::modify`] holds
/// it for the whole read-modify-write.
#[derive(Debug)]
pub struct SimBus {
    map: AddressMap,
    leds: Mutex<u32>,
    switches: Mutex<u32>,
    buttons: Mutex<u32>,
}

impl SimBus {
    /// All three registers start at zero
    pub fn new(map: AddressMap) -> Self {
        Self {
            map,
            leds: Mutex::new(0),
            switches: Mutex::new(0),
            buttons: Mutex::new(0),
        }
    }

    pub fn map(&self) -> &AddressMap {
        &self.map
    }

    /// Force a register to `value`, e.g. to model switch positions
    pub fn preset(&self, kind: DeviceKind, value: u32) -> Result<(), GpioError> {
        let addr = self.map.base(kind);
        *self.lock(addr)? = value;
        Ok(())
    }

    /// Current value of a register without going through a handle
    pub fn peek(&self, kind: DeviceKind) -> Result<u32, GpioError> {
        let addr = self.map.base(kind);
        Ok(*self.lock(addr)?)
    }

    fn bank(&self, addr: u32) -> Result<&Mutex<u32>, GpioError> {
        match self.map.kind_at(addr) {
            Some(DeviceKind::Led) => Ok(&self.leds),
            Some(DeviceKind::Switch) => Ok(&self.switches),
            Some(DeviceKind::Button) => Ok(&self.buttons),
            None => Err(GpioError::UnmappedAddress(addr)),
        }
    }

    fn lock(&self, addr: u32) -> Result<MutexGuard<'_, u32>, GpioError> {
        self.bank(addr)?
            .lock()
            .map_err(|_| GpioError::Poisoned(addr))
    }
}

impl RegisterBus for SimBus {
    fn read(&self, addr: u32) -> Result<u32, GpioError> {
        let value = *self.lock(addr)?;
        trace!("read  {:#010X} -> {:#010X}", addr, value);
        Ok(value)
    }

    fn write(&self, addr: u32, value: u32) -> Result<(), GpioError> {
        *self.lock(addr)? = value;
        trace!("write {:#010X} <- {:#010X}", addr, value);
        Ok(())
    }

    fn modify<F>(&self, addr: u32, f: F) -> Result<(), GpioError>
    where
        F: FnOnce(u32) -> u32,
    {
        let mut reg = self.lock(addr)?;
        let old = *reg;
        *reg = f(old);
        trace!("rmw   {:#010X}: {:#010X} -> {:#010X}", addr, old, *reg);
        Ok(())
    }
}
