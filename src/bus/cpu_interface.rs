/*!
CPU interface dispatcher

Purpose
- Centralize CPU-visible memory mapping and delegate to devices.
- Provide a single place to evolve address decoding without touching the Bus facade.

Notes
- This module does not own device state. It operates on a &mut Bus and delegates to
  the cartridge mapper, RAM blocks, timer and interrupt registers.
- I/O registers of devices that are not emulated (joypad, serial, audio, LCD) are
  plain storage so software can read back what it wrote.
- Writing $FF46 performs the whole 160-byte OAM DMA transfer immediately.

Address map: see the `bus` module documentation.
*/

use crate::bus::{Bus, BusError};

/// CPU-visible read from the unified address space.
pub fn cpu_read(bus: &mut Bus, addr: u16) -> Result<u8, BusError> {
    match addr {
        0x0000..=0x7FFF => Ok(bus.cartridge.read_rom(addr)),
        0x8000..=0x9FFF => Ok(bus.vram.read(addr - 0x8000)),
        0xA000..=0xBFFF => match bus.cartridge.read_ram(addr) {
            Some(v) => Ok(v),
            None => open_bus(bus, addr),
        },
        // Work RAM plus its echo ($E000-$FDFF wraps onto $C000-$DDFF)
        0xC000..=0xFDFF => Ok(bus.wram.read(addr - 0xC000)),
        0xFE00..=0xFE9F => Ok(bus.oam.read(addr - 0xFE00)),
        0xFEA0..=0xFEFF => open_bus(bus, addr),
        0xFF00..=0xFF7F => Ok(io_read(bus, addr)),
        0xFF80..=0xFFFE => Ok(bus.hram.read(addr - 0xFF80)),
        0xFFFF => Ok(bus.interrupts.read_enable()),
    }
}

/// CPU-visible write to the unified address space.
pub fn cpu_write(bus: &mut Bus, addr: u16, value: u8) -> Result<(), BusError> {
    match addr {
        0x0000..=0x7FFF => {
            if bus.cartridge.write_rom(addr, value) {
                Ok(())
            } else if bus.config.strict {
                Err(BusError::ReadOnly { addr })
            } else {
                log::warn!("ignored write {value:#04x} to ROM at {addr:#06x}");
                Ok(())
            }
        }
        0x8000..=0x9FFF => {
            bus.vram.write(addr - 0x8000, value);
            Ok(())
        }
        0xA000..=0xBFFF => {
            if bus.cartridge.write_ram(addr, value) {
                Ok(())
            } else {
                ignored_write(bus, addr, value)
            }
        }
        0xC000..=0xFDFF => {
            bus.wram.write(addr - 0xC000, value);
            Ok(())
        }
        0xFE00..=0xFE9F => {
            bus.oam.write(addr - 0xFE00, value);
            Ok(())
        }
        0xFEA0..=0xFEFF => ignored_write(bus, addr, value),
        0xFF00..=0xFF7F => io_write(bus, addr, value),
        0xFF80..=0xFFFE => {
            bus.hram.write(addr - 0xFF80, value);
            Ok(())
        }
        0xFFFF => {
            bus.interrupts.write_enable(value);
            Ok(())
        }
    }
}

// -------------------------------------------------------------------------
// I/O registers ($FF00-$FF7F)
// -------------------------------------------------------------------------

fn io_read(bus: &Bus, addr: u16) -> u8 {
    match addr {
        // Joypad: no buttons pressed, upper bits read as 1.
        0xFF00 => bus.io[0x00] | 0xCF,
        0xFF04..=0xFF07 => bus.timer.read(addr),
        0xFF0F => bus.interrupts.read_flag(),
        _ => bus.io[(addr - 0xFF00) as usize],
    }
}

fn io_write(bus: &mut Bus, addr: u16, value: u8) -> Result<(), BusError> {
    match addr {
        0xFF00 => bus.io[0x00] = value & 0x30,
        0xFF04..=0xFF07 => bus.timer.write(addr, value, &mut bus.interrupts),
        0xFF0F => bus.interrupts.write_flag(value),
        0xFF46 => {
            bus.io[0x46] = value;
            oam_dma(bus, value)?;
        }
        _ => bus.io[(addr - 0xFF00) as usize] = value,
    }
    Ok(())
}

/// Copy $XX00-$XX9F into OAM. Pages $E0-$FF read from work RAM.
fn oam_dma(bus: &mut Bus, page: u8) -> Result<(), BusError> {
    let page = if page >= 0xE0 { page - 0x20 } else { page };
    let src = (page as u16) << 8;
    for i in 0..0xA0u16 {
        let v = cpu_read(bus, src.wrapping_add(i))?;
        bus.oam.write(i, v);
    }
    Ok(())
}

// -------------------------------------------------------------------------
// Unmapped regions
// -------------------------------------------------------------------------

fn open_bus(bus: &Bus, addr: u16) -> Result<u8, BusError> {
    if bus.config.strict {
        Err(BusError::Unmapped { addr })
    } else {
        Ok(0xFF)
    }
}

fn ignored_write(bus: &Bus, addr: u16, value: u8) -> Result<(), BusError> {
    if bus.config.strict {
        Err(BusError::Unmapped { addr })
    } else {
        log::warn!("ignored write {value:#04x} to unmapped {addr:#06x}");
        Ok(())
    }
}
