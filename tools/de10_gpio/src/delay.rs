//! Pauses between demo steps

use std::hint::{black_box, spin_loop};
use std::thread;
use std::time::Duration;

use crate::board::Target;

/// Something that blocks the caller for a while
pub trait Delay {
    fn pause(&mut self);
}

/// Busy-wait for a fixed number of iterations
#[derive(Debug, Clone, Copy)]
pub struct SpinDelay {
    pub iterations: u32,
}

impl SpinDelay {
    pub const fn new(iterations: u32) -> Self {
        Self { iterations }
    }

    /// Iteration count tuned for `target`
    pub const fn for_target(target: Target) -> Self {
        Self::new(target.delay_iterations())
    }
}

impl Default for SpinDelay {
    fn default() -> Self {
        Self::for_target(Target::ACTIVE)
    }
}

impl Delay for SpinDelay {
    fn pause(&mut self) {
        // black_box keeps the loop from being optimized out
        for i in 0..self.iterations {
            black_box(i);
            spin_loop();
        }
    }
}

/// Sleep the current thread
#[derive(Debug, Clone, Copy)]
pub struct SleepDelay(pub Duration);

impl Delay for SleepDelay {
    fn pause(&mut self) {
        thread::sleep(self.0);
    }
}

/// Return immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Delay for NoDelay {
    fn pause(&mut self) {}
}

impl<D: Delay + ?Sized> Delay for &mut D {
    fn pause(&mut self) {
        (**self).pause();
    }
}
