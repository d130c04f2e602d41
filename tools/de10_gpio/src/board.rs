//! DE10-Lite board description
//!
//! Device kinds, the two register address sets and the build-time choice
//! between them.

use std::fmt;
use std::str::FromStr;

use crate::bus::{RegisterBus, SimBus};
use crate::GpioError;

/// Width of every GPIO register in bits
pub const REGISTER_WIDTH: u8 = 32;

/// GPIO peripheral class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeviceKind {
    /// LEDR[9:0], output
    Led,
    /// SW[9:0], input
    Switch,
    /// KEY[1:0], input, active-low
    Button,
}

impl DeviceKind {
    pub const ALL: [DeviceKind; 3] = [DeviceKind::Led, DeviceKind::Switch, DeviceKind::Button];

    /// Highest pin index wired on the board for this kind
    pub const fn max_pin(self) -> u8 {
        match self {
            DeviceKind::Led => 9,
            DeviceKind::Switch => 9,
            DeviceKind::Button => 1,
        }
    }

    pub const fn is_output(self) -> bool {
        matches!(self, DeviceKind::Led)
    }

    pub const fn is_input(self) -> bool {
        !self.is_output()
    }

    /// Whether a 0 bit means "active" (pressed)
    pub const fn is_active_low(self) -> bool {
        matches!(self, DeviceKind::Button)
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceKind::Led => "LED",
            DeviceKind::Switch => "switch",
            DeviceKind::Button => "button",
        };
        f.write_str(name)
    }
}

/// Raw selector in declaration order: 0 = LED, 1 = switch, 2 = button.
impl TryFrom<u8> for DeviceKind {
    type Error = GpioError;

    fn try_from(selector: u8) -> Result<Self, Self::Error> {
        match selector {
            0 => Ok(DeviceKind::Led),
            1 => Ok(DeviceKind::Switch),
            2 => Ok(DeviceKind::Button),
            other => Err(GpioError::InvalidDeviceKind(other.to_string())),
        }
    }
}

impl FromStr for DeviceKind {
    type Err = GpioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "led" | "leds" => Ok(DeviceKind::Led),
            "switch" | "switches" | "sw" => Ok(DeviceKind::Switch),
            "button" | "buttons" | "key" => Ok(DeviceKind::Button),
            _ => Err(GpioError::InvalidDeviceKind(s.to_string())),
        }
    }
}

/// Which address set the registers live at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// CASE GOLD hardware
    CaseGold,
    /// cpulator Nios II DE10-Lite simulator
    Simulator,
}

impl Target {
    #[cfg(not(feature = "simulator"))]
    pub const ACTIVE: Target = Target::CaseGold;
    #[cfg(feature = "simulator")]
    pub const ACTIVE: Target = Target::Simulator;

    /// Busy-wait iterations for one demo pause
    pub const fn delay_iterations(self) -> u32 {
        match self {
            Target::CaseGold => 100_000,
            Target::Simulator => 1_000_000,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::CaseGold => f.write_str("case-gold"),
            Target::Simulator => f.write_str("simulator"),
        }
    }
}

/// Base addresses of the three GPIO registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressMap {
    pub leds: u32,
    pub switches: u32,
    pub buttons: u32,
}

impl AddressMap {
    pub const CASE_GOLD: AddressMap = AddressMap {
        leds: 0x0809_1740,
        switches: 0x0809_1750,
        buttons: 0x0809_1760,
    };

    pub const SIMULATOR: AddressMap = AddressMap {
        leds: 0xFF20_0000,
        switches: 0xFF20_0040,
        buttons: 0xFF20_0050,
    };

    /// The address set selected by the `simulator` feature
    pub const ACTIVE: AddressMap = AddressMap::for_target(Target::ACTIVE);

    pub const fn for_target(target: Target) -> Self {
        match target {
            Target::CaseGold => AddressMap::CASE_GOLD,
            Target::Simulator => AddressMap::SIMULATOR,
        }
    }

    pub const fn base(&self, kind: DeviceKind) -> u32 {
        match kind {
            DeviceKind::Led => self.leds,
            DeviceKind::Switch => self.switches,
            DeviceKind::Button => self.buttons,
        }
    }

    /// Reverse lookup of a register address
    pub fn kind_at(&self, addr: u32) -> Option<DeviceKind> {
        DeviceKind::ALL.into_iter().find(|kind| self.base(*kind) == addr)
    }
}

impl Default for AddressMap {
    fn default() -> Self {
        AddressMap::ACTIVE
    }
}

/// A register bus together with the address set it is wired to
#[derive(Debug)]
pub struct Board<B: RegisterBus> {
    bus: B,
    map: AddressMap,
}

impl<B: RegisterBus> Board<B> {
    pub fn new(bus: B, map: AddressMap) -> Self {
        Self { bus, map }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn map(&self) -> &AddressMap {
        &self.map
    }

    pub fn base(&self, kind: DeviceKind) -> u32 {
        self.map.base(kind)
    }
}

impl Board<SimBus> {
    /// Board backed by zeroed in-memory registers at `map`
    pub fn simulated(map: AddressMap) -> Self {
        Self::new(SimBus::new(map), map)
    }
}
