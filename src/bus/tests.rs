use crate::bus::{Bus, BusConfig, BusError, CpuBus, Interrupt};
use crate::cartridge::Cartridge;
use crate::test_utils::{build_rom, build_rom_with, fix_global_checksum};

fn rom_only_bus(strict: bool) -> Bus {
    let cart = Cartridge::from_bytes(build_rom(&[0x3E, 0x42])).expect("valid");
    Bus::with_config(cart, BusConfig { strict })
}

fn mbc1_bus() -> Bus {
    // 64 KiB ROM, 8 KiB RAM; mark the first byte of every bank.
    let mut rom = build_rom_with(0x03, 0x01, 0x02, &[]);
    for bank in 1..4usize {
        rom[bank * 0x4000] = bank as u8 | 0xB0;
    }
    fix_global_checksum(&mut rom);
    Bus::new(Cartridge::from_bytes(rom).expect("valid"))
}

#[test]
fn rom_is_readable_through_the_bus() {
    let mut bus = rom_only_bus(false);
    assert_eq!(bus.read(0x0150).unwrap(), 0x3E);
    assert_eq!(bus.read(0x0151).unwrap(), 0x42);
    assert_eq!(bus.read(0x0101).unwrap(), 0xC3);
}

#[test]
fn work_ram_and_echo_alias() {
    let mut bus = rom_only_bus(false);
    bus.write(0xC123, 0x5A).unwrap();
    assert_eq!(bus.read(0xE123).unwrap(), 0x5A);
    bus.write(0xFDFF, 0x77).unwrap();
    assert_eq!(bus.read(0xDDFF).unwrap(), 0x77);
}

#[test]
fn vram_oam_and_hram_are_plain_storage() {
    let mut bus = rom_only_bus(true);
    for (addr, v) in [(0x8000u16, 1u8), (0x9FFF, 2), (0xFE00, 3), (0xFE9F, 4), (0xFF80, 5), (0xFFFE, 6)] {
        bus.write(addr, v).unwrap();
        assert_eq!(bus.read(addr).unwrap(), v, "{addr:#06x}");
    }
}

#[test]
fn lenient_bus_ignores_faults() {
    let mut bus = rom_only_bus(false);
    assert_eq!(bus.read(0xFEA0).unwrap(), 0xFF);
    assert_eq!(bus.read(0xA000).unwrap(), 0xFF);
    bus.write(0xFEA0, 0x12).unwrap();
    bus.write(0xA000, 0x12).unwrap();
    bus.write(0x0150, 0x00).unwrap();
    assert_eq!(bus.read(0x0150).unwrap(), 0x3E);
}

#[test]
fn strict_bus_reports_faults() {
    let mut bus = rom_only_bus(true);
    assert_eq!(bus.read(0xFEA0), Err(BusError::Unmapped { addr: 0xFEA0 }));
    assert_eq!(bus.read(0xA000), Err(BusError::Unmapped { addr: 0xA000 }));
    assert_eq!(bus.write(0xFEFF, 0), Err(BusError::Unmapped { addr: 0xFEFF }));
    assert_eq!(bus.write(0x2000, 1), Err(BusError::ReadOnly { addr: 0x2000 }));
}

#[test]
fn interrupt_registers() {
    let mut bus = rom_only_bus(false);
    assert_eq!(bus.read(0xFF0F).unwrap(), 0xE0);
    bus.write(0xFFFF, 0x05).unwrap();
    bus.request_interrupt(Interrupt::Timer);
    bus.request_interrupt(Interrupt::Serial);
    assert_eq!(bus.read(0xFF0F).unwrap(), 0xEC);
    assert_eq!(bus.pending_interrupts(), 0x04);
    assert_eq!(bus.requested_interrupts(), 0x0C);
    bus.acknowledge_interrupt(Interrupt::Timer);
    assert_eq!(bus.pending_interrupts(), 0);
    bus.write(0xFF0F, 0xFF).unwrap();
    assert_eq!(bus.requested_interrupts(), 0x1F);
    assert_eq!(bus.read(0xFFFF).unwrap(), 0x05);
}

#[test]
fn joypad_reads_unpressed() {
    let mut bus = rom_only_bus(false);
    bus.write(0xFF00, 0x20).unwrap();
    assert_eq!(bus.read(0xFF00).unwrap(), 0xEF);
}

#[test]
fn unemulated_io_reads_back() {
    let mut bus = rom_only_bus(false);
    bus.write(0xFF40, 0x91).unwrap();
    assert_eq!(bus.read(0xFF40).unwrap(), 0x91);
}

#[test]
fn oam_dma_copies_a_page() {
    let mut bus = rom_only_bus(false);
    for i in 0..0xA0u16 {
        bus.write(0xC000 + i, i as u8).unwrap();
    }
    bus.write(0xFF46, 0xC0).unwrap();
    assert_eq!(bus.read(0xFE00).unwrap(), 0x00);
    assert_eq!(bus.read(0xFE9F).unwrap(), 0x9F);
}

#[test]
fn oam_dma_from_high_pages_reads_work_ram() {
    let mut bus = rom_only_bus(true);
    bus.write(0xDE00, 0x11).unwrap();
    bus.write(0xDF9F, 0x22).unwrap();
    bus.write(0xFF46, 0xFE).unwrap();
    assert_eq!(bus.read(0xFE00).unwrap(), 0x11);
    bus.write(0xFF46, 0xFF).unwrap();
    assert_eq!(bus.read(0xFE9F).unwrap(), 0x22);
}

#[test]
fn mbc1_bank_switching_through_the_bus() {
    let mut bus = mbc1_bus();
    // Bank 0 selects bank 1.
    assert_eq!(bus.read(0x4000).unwrap(), 0xB1);
    bus.write(0x2000, 0x02).unwrap();
    assert_eq!(bus.read(0x4000).unwrap(), 0xB2);
    bus.write(0x2000, 0x00).unwrap();
    assert_eq!(bus.read(0x4000).unwrap(), 0xB1);
}

#[test]
fn mbc1_ram_needs_enable() {
    let mut bus = mbc1_bus();
    assert_eq!(bus.read(0xA000).unwrap(), 0xFF);
    bus.write(0x0000, 0x0A).unwrap();
    bus.write(0xA010, 0x66).unwrap();
    assert_eq!(bus.read(0xA010).unwrap(), 0x66);
    bus.write(0x0000, 0x00).unwrap();
    assert_eq!(bus.read(0xA010).unwrap(), 0xFF);
}

#[test]
fn tick_drives_timer_interrupt() {
    let mut bus = rom_only_bus(false);
    // Fastest rate: TIMA increments every 16 cycles.
    bus.write(0xFF06, 0xFE).unwrap();
    bus.write(0xFF05, 0xFF).unwrap();
    bus.write(0xFF07, 0x05).unwrap();
    bus.tick(15);
    assert_eq!(bus.requested_interrupts(), 0);
    bus.tick(1);
    assert_eq!(bus.requested_interrupts(), Interrupt::Timer.mask());
    assert_eq!(bus.read(0xFF05).unwrap(), 0xFE);
    assert_eq!(bus.total_ticks(), 16);
}

#[test]
fn reset_clears_ram_and_registers() {
    let mut bus = rom_only_bus(false);
    bus.write(0xC000, 1).unwrap();
    bus.write(0xFFFF, 0x1F).unwrap();
    bus.tick(100);
    bus.reset();
    assert_eq!(bus.read(0xC000).unwrap(), 0);
    assert_eq!(bus.read(0xFFFF).unwrap(), 0);
    assert_eq!(bus.total_ticks(), 0);
}
