/*
Module: mappers

Slimmed dispatcher module: declares mapper submodules and re-exports their
public types. Concrete implementations live in their own files for clarity.

Implemented:
- MBC1 (cartridge types $01-$03)
- MBC5 (cartridge types $19-$1E; rumble motor ignored)
*/

pub mod mbc1;
pub mod mbc5;

pub use mbc1::Mbc1;
pub use mbc5::Mbc5;
