/*!
DMG timer: DIV ($FF04), TIMA ($FF05), TMA ($FF06), TAC ($FF07).

Model
=====
- A free-running 16-bit system counter advances once per T-cycle; DIV is its
  upper byte and any write to DIV clears the whole counter.
- When TAC bit 2 enables the timer, TIMA increments on every falling edge of
  the counter bit selected by TAC bits 0-1:
    00 -> bit 9 (4096 Hz), 01 -> bit 3 (262144 Hz),
    10 -> bit 5 (65536 Hz), 11 -> bit 7 (16384 Hz).
- On TIMA overflow TIMA reloads from TMA and the timer interrupt is raised.

The one-cycle reload delay of real hardware is not modelled.
*/

use crate::bus::interrupts::{Interrupt, InterruptLines};

#[derive(Clone, Debug, Default)]
pub struct Timer {
    counter: u16,
    tima: u8,
    tma: u8,
    tac: u8,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `cycles` T-cycles, raising the timer interrupt on overflow.
    pub fn tick(&mut self, cycles: u32, irq: &mut InterruptLines) {
        for _ in 0..cycles {
            let before = self.selected_bit();
            self.counter = self.counter.wrapping_add(1);
            if before && !self.selected_bit() {
                self.increment_tima(irq);
            }
        }
    }

    pub fn read(&self, addr: u16) -> u8 {
        match addr {
            0xFF04 => (self.counter >> 8) as u8,
            0xFF05 => self.tima,
            0xFF06 => self.tma,
            0xFF07 => self.tac | 0xF8,
            _ => 0xFF,
        }
    }

    pub fn write(&mut self, addr: u16, value: u8, irq: &mut InterruptLines) {
        match addr {
            0xFF04 => {
                // Clearing the counter can itself produce a falling edge.
                let before = self.selected_bit();
                self.counter = 0;
                if before {
                    self.increment_tima(irq);
                }
            }
            0xFF05 => self.tima = value,
            0xFF06 => self.tma = value,
            0xFF07 => self.tac = value & 0x07,
            _ => {}
        }
    }

    /// Upper byte of the system counter.
    #[inline]
    pub fn div(&self) -> u8 {
        (self.counter >> 8) as u8
    }

    #[inline]
    fn enabled(&self) -> bool {
        self.tac & 0x04 != 0
    }

    #[inline]
    fn selected_bit(&self) -> bool {
        let bit = match self.tac & 0x03 {
            0 => 9,
            1 => 3,
            2 => 5,
            _ => 7,
        };
        self.enabled() && (self.counter >> bit) & 1 != 0
    }

    fn increment_tima(&mut self, irq: &mut InterruptLines) {
        let (next, overflow) = self.tima.overflowing_add(1);
        if overflow {
            self.tima = self.tma;
            irq.request(Interrupt::Timer);
        } else {
            self.tima = next;
        }
    }
}
