use std::env;
use std::process::ExitCode;

use dmgcore::cartridge::{global_checksum, header_checksum};
use dmgcore::cpu::{CpuRegs, Reg16};
use dmgcore::GameBoy;

const MAX_STEPS: usize = 1_000_000;

fn build_demo_rom() -> Vec<u8> {
    let mut rom = vec![0u8; 32 * 1024];

    // Entry point: NOP; JP $0150
    rom[0x0100..0x0104].copy_from_slice(&[0x00, 0xC3, 0x50, 0x01]);
    rom[0x0134..0x0138].copy_from_slice(b"DEMO");

    // Sum 1..=10 into A, store it at $C000, then halt with nothing enabled.
    let program: &[u8] = &[
        0xAF, // XOR A
        0x06, 0x0A, // LD B,10
        0x80, // ADD A,B      <- loop
        0x05, // DEC B
        0x20, 0xFC, // JR NZ,loop
        0xEA, 0x00, 0xC0, // LD ($C000),A
        0xF3, // DI
        0x76, // HALT
    ];
    rom[0x0150..0x0150 + program.len()].copy_from_slice(program);

    rom[0x014D] = header_checksum(&rom);
    let [hi, lo] = global_checksum(&rom).to_be_bytes();
    rom[0x014E] = hi;
    rom[0x014F] = lo;
    rom
}

/// Halted with IE empty: nothing can ever resume execution.
fn parked(gb: &GameBoy) -> bool {
    gb.cpu().is_halted() && gb.bus().interrupts().read_enable() & 0x1F == 0
}

fn main() -> ExitCode {
    let session = match env::args().nth(1) {
        Some(path) => GameBoy::from_file(&path),
        None => GameBoy::from_rom_bytes(build_demo_rom()),
    };
    let mut gb = match session {
        Ok(gb) => gb,
        Err(err) => {
            eprintln!("failed to load cartridge: {err}");
            return ExitCode::FAILURE;
        }
    };

    // Run until the CPU halts with no interrupt source enabled to wake it, or
    // the step cap is reached. Idle-loop HALTs keep running.
    let mut steps = 0usize;
    while steps < MAX_STEPS && !parked(&gb) {
        if let Err(err) = gb.step() {
            eprintln!("CPU fault: {err}");
            break;
        }
        steps += 1;
    }

    // Inspect state
    let cpu = gb.cpu().state();
    println!("title: {}", gb.bus().cartridge().title());
    println!("steps: {steps}, cycles: {}", cpu.cycles);
    println!("AF: 0x{:04X}", cpu.pair(Reg16::AF));
    println!("BC: 0x{:04X}", cpu.pair(Reg16::BC));
    println!("DE: 0x{:04X}", cpu.pair(Reg16::DE));
    println!("HL: 0x{:04X}", cpu.pair(Reg16::HL));
    println!("SP: 0x{:04X}", cpu.sp);
    println!("PC: 0x{:04X}", cpu.pc);
    println!("F (flags): 0b{:08b}", cpu.f());
    println!("IME: {}, halted: {}", cpu.ime, cpu.halted);
    ExitCode::SUCCESS
}
