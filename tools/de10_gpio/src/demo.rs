//! The DE10-Lite teaching programs
//!
//! Each demo drives the LEDs from constants, loops, arrays or the other
//! inputs. The polling demos run forever on hardware; pass a cycle limit to
//! stop them on the host.

use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::board::{Board, DeviceKind};
use crate::bus::RegisterBus;
use crate::delay::Delay;
use crate::gpio::{Gpio, Port};
use crate::GpioError;

/// LED[9:0] all on
pub const ALL_LEDS: u32 = 0x3FF;

/// Number of words written by the array demo
pub const ARRAY_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demo {
    WriteLeds,
    Count,
    ButtonLed,
    PointerSum,
    Array,
    Struct,
}

impl Demo {
    pub const ALL: [Demo; 6] = [
        Demo::WriteLeds,
        Demo::Count,
        Demo::ButtonLed,
        Demo::PointerSum,
        Demo::Array,
        Demo::Struct,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Demo::WriteLeds => "write-leds",
            Demo::Count => "count",
            Demo::ButtonLed => "button-led",
            Demo::PointerSum => "pointer-sum",
            Demo::Array => "array",
            Demo::Struct => "struct",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Demo::WriteLeds => "Light LED[9:0] with a single register write",
            Demo::Count => "Write 0..=1023 to the LEDs with a pause between writes",
            Demo::ButtonLed => "LED0 follows KEY0 (lit while pressed)",
            Demo::PointerSum => "Assign 3 and 4 through references, show the sum on the LEDs",
            Demo::Array => "Show the odd numbers 1..=31 from an array on the LEDs",
            Demo::Struct => "LED0 follows SW0, LED1 lit while KEY0 is pressed",
        }
    }

    /// Whether the demo loops until stopped
    pub fn is_polling(self) -> bool {
        matches!(self, Demo::ButtonLed | Demo::Struct)
    }

    /// Run the demo. `cycles` bounds the polling demos; `None` polls forever.
    pub fn run<B, D>(self, board: &Board<B>, delay: D, cycles: Option<u64>) -> Result<(), GpioError>
    where
        B: RegisterBus,
        D: Delay,
    {
        debug!("Running demo {}", self);
        match self {
            Demo::WriteLeds => write_leds(board),
            Demo::Count => count(board, delay),
            Demo::ButtonLed => button_led(board, cycles),
            Demo::PointerSum => pointer_sum(board).map(|_| ()),
            Demo::Array => array(board, delay),
            Demo::Struct => struct_io(board, cycles),
        }
    }
}

impl fmt::Display for Demo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Demo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Demo::ALL
            .into_iter()
            .find(|demo| demo.name() == s)
            .ok_or_else(|| format!("unknown demo '{}'", s))
    }
}

fn poll<F>(cycles: Option<u64>, mut step: F) -> Result<(), GpioError>
where
    F: FnMut() -> Result<(), GpioError>,
{
    match cycles {
        Some(n) => (0..n).try_for_each(|_| step()),
        None => loop {
            step()?;
        },
    }
}

/// Light every LED with one write
pub fn write_leds<B: RegisterBus>(board: &Board<B>) -> Result<(), GpioError> {
    Port::new(board, DeviceKind::Led).write(ALL_LEDS)
}

/// Binary count on the LEDs from 0 to 1023
pub fn count<B: RegisterBus, D: Delay>(board: &Board<B>, mut delay: D) -> Result<(), GpioError> {
    let leds = Port::new(board, DeviceKind::Led);
    for value in 0..=ALL_LEDS {
        leds.write(value)?;
        delay.pause();
    }
    Ok(())
}

pub fn button_led<B: RegisterBus>(board: &Board<B>, cycles: Option<u64>) -> Result<(), GpioError> {
    let led1 = Gpio::init(board, 0, DeviceKind::Led)?;
    let button1 = Gpio::init(board, 0, DeviceKind::Button)?;

    Port::new(board, DeviceKind::Led).clear()?;
    poll(cycles, || led1.write(button1.is_active()?))
}

fn assign(x: &mut u32, y: &mut u32) {
    *x = 3;
    *y = 4;
}

/// Writes 3 + 4 to the LEDs and returns it
pub fn pointer_sum<B: RegisterBus>(board: &Board<B>) -> Result<u32, GpioError> {
    let mut x = 0;
    let mut y = 0;
    assign(&mut x, &mut y);

    let sum = x + y;
    Port::new(board, DeviceKind::Led).write(sum)?;
    Ok(sum)
}

/// Fill `data` with `start`, `start + step`, ...
pub fn fill(data: &mut [u32], start: u32, step: u32) {
    let mut value = start;
    for slot in data.iter_mut() {
        *slot = value;
        value = value.wrapping_add(step);
    }
}

pub fn array<B: RegisterBus, D: Delay>(board: &Board<B>, mut delay: D) -> Result<(), GpioError> {
    let mut data = [0u32; ARRAY_LEN];
    fill(&mut data, 1, 2);

    let leds = Port::new(board, DeviceKind::Led);
    for value in data {
        leds.write(value)?;
        delay.pause();
    }
    Ok(())
}

/// LED0 mirrors SW0, LED1 is lit while KEY0 is held
pub fn struct_io<B: RegisterBus>(board: &Board<B>, cycles: Option<u64>) -> Result<(), GpioError> {
    let led1 = Gpio::init(board, 0, DeviceKind::Led)?;
    let led2 = Gpio::init(board, 1, DeviceKind::Led)?;
    let switch1 = Gpio::init(board, 0, DeviceKind::Switch)?;
    let button1 = Gpio::init(board, 0, DeviceKind::Button)?;

    poll(cycles, || {
        led1.write(switch1.read()?)?;
        led2.write(!button1.read()?)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fill_odd_numbers() {
        let mut data = [0u32; ARRAY_LEN];
        fill(&mut data, 1, 2);
        assert_eq!(data[0], 1);
        assert_eq!(data[ARRAY_LEN - 1], 31);
        assert!(data.iter().all(|v| v % 2 == 1));
    }

    #[test]
    fn test_assign() {
        let (mut x, mut y) = (0, 0);
        assign(&mut x, &mut y);
        assert_eq!((x, y), (3, 4));
    }

    #[test]
    fn test_demo_names_round_trip() {
        for demo in Demo::ALL {
            assert_eq!(demo.name().parse::<Demo>().unwrap(), demo);
        }
        assert!("blink".parse::<Demo>().is_err());
    }

    #[test]
    fn test_poll_bounded() {
        let mut calls = 0;
        poll(Some(5), || {
            calls += 1;
            Ok(())
        })
        .unwrap();
        assert_eq!(calls, 5);
    }

    #[test]
    fn test_poll_stops_on_error() {
        let mut calls = 0;
        let result = poll(None, || {
            calls += 1;
            if calls == 3 {
                Err(GpioError::NotReadable(DeviceKind::Led))
            } else {
                Ok(())
            }
        });
        assert_eq!(result, Err(GpioError::NotReadable(DeviceKind::Led)));
        assert_eq!(calls, 3);
    }
}
