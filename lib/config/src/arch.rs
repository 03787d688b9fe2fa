//! Architecture-dependent address types and widths.

use core::fmt::Debug;
use utils::impl_basic;

// region: address newtypes

/// A physical address.
///
/// Wide enough for every supported platform; on 32-bit platforms the upper
/// half is always zero, enforced where multi-cell addresses are decoded.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
pub struct Paddr {
    inner: u64,
}
impl_basic!(Paddr, u64);

impl Debug for Paddr {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!("{:#x}", self.inner))
    }
}

/// A virtual address in the core's own address space.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
pub struct Vaddr {
    inner: usize,
}
impl_basic!(Vaddr, usize);

impl Debug for Vaddr {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!("{:#x}", self.inner))
    }
}

// endregion

/// How many bits of a physical address the platform can actually use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrWidth {
    /// Physical addresses fit one 32-bit cell.
    Bits32,
    /// Physical addresses may span two cells.
    Bits64,
}

/// Address width of the platform this kernel is built for.
pub const PADDR_WIDTH: AddrWidth = if cfg!(target_pointer_width = "32") {
    AddrWidth::Bits32
} else {
    AddrWidth::Bits64
};
