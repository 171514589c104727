/*!
Interrupt request lines (IF at $FF0F) and enable mask (IE at $FFFF).

Peripherals raise a source with `request`; the CPU core reads
`pending()` at instruction boundaries and clears exactly one bit per
service with `acknowledge`. Nothing here decides *when* an interrupt is
taken; that policy belongs to `cpu::interrupts`.

Sources, highest priority first (bit index = priority):
- 0 VBlank   -> $0040
- 1 LCD STAT -> $0048
- 2 Timer    -> $0050
- 3 Serial   -> $0058
- 4 Joypad   -> $0060
*/

/// Mask of the five architecturally defined interrupt bits.
pub const INTERRUPT_MASK: u8 = 0x1F;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Interrupt {
    VBlank,
    LcdStat,
    Timer,
    Serial,
    Joypad,
}

impl Interrupt {
    /// All sources in service priority order.
    pub const ALL: [Interrupt; 5] = [
        Interrupt::VBlank,
        Interrupt::LcdStat,
        Interrupt::Timer,
        Interrupt::Serial,
        Interrupt::Joypad,
    ];

    /// Bit index within IF / IE.
    #[inline]
    pub fn index(self) -> u8 {
        match self {
            Interrupt::VBlank => 0,
            Interrupt::LcdStat => 1,
            Interrupt::Timer => 2,
            Interrupt::Serial => 3,
            Interrupt::Joypad => 4,
        }
    }

    #[inline]
    pub fn mask(self) -> u8 {
        1 << self.index()
    }

    /// Fixed service routine address.
    #[inline]
    pub fn vector(self) -> u16 {
        0x0040 + 8 * self.index() as u16
    }

    /// Source for a bit index; `None` outside 0..=4.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Highest-priority source present in `bits`.
    pub fn highest_priority(bits: u8) -> Option<Self> {
        let bits = bits & INTERRUPT_MASK;
        if bits == 0 {
            return None;
        }
        Self::from_index(bits.trailing_zeros() as u8)
    }
}

/// IF / IE register pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InterruptLines {
    flag: u8,
    enable: u8,
}

impl InterruptLines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise a source in IF.
    #[inline]
    pub fn request(&mut self, irq: Interrupt) {
        self.flag |= irq.mask();
    }

    /// Clear a source in IF (done by the CPU when servicing it).
    #[inline]
    pub fn acknowledge(&mut self, irq: Interrupt) {
        self.flag &= !irq.mask();
    }

    /// Requested sources, enabled or not.
    #[inline]
    pub fn requested(&self) -> u8 {
        self.flag & INTERRUPT_MASK
    }

    /// Requested AND enabled sources.
    #[inline]
    pub fn pending(&self) -> u8 {
        self.flag & self.enable & INTERRUPT_MASK
    }

    /// IF as seen by the CPU: upper three bits read back as 1.
    #[inline]
    pub fn read_flag(&self) -> u8 {
        self.flag | !INTERRUPT_MASK
    }

    #[inline]
    pub fn write_flag(&mut self, value: u8) {
        self.flag = value & INTERRUPT_MASK;
    }

    /// IE is a full 8-bit register even though only five bits matter.
    #[inline]
    pub fn read_enable(&self) -> u8 {
        self.enable
    }

    #[inline]
    pub fn write_enable(&mut self, value: u8) {
        self.enable = value;
    }
}
