//! Decoding of `reg` register windows.
//!
//! A node's `reg` property encodes (base, size) pairs as 32-bit big-endian
//! cells; the parent's `#address-cells`/`#size-cells` say how many cells
//! each half takes. Every read here is bounds-checked against the declared
//! property length, and only the first window of a `reg` list is decoded.

use crate::blob::{BlobDecoder, NodeOffset};
use config::arch::{AddrWidth, PADDR_WIDTH, Paddr};

/// Size in bytes of one device-tree cell.
pub const CELL_SIZE: usize = 4;

/// Physical register window of a device node.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct RegWindow {
    pub base: Paddr,
    pub size: usize,
}

/// Failures while decoding a register window.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RegError {
    /// The node has no parent to supply cell counts (e.g. the root).
    NoParent,
    /// The `reg` property or a required cell count is missing or unreadable.
    PropNotFound,
    /// A cell count outside {1, 2}.
    BadCellCount { cells: usize },
    /// The `reg` property ends before the cells it must hold.
    Truncated,
    /// The decoded address is zero, which is reserved as "unset".
    NullAddr,
    /// Two-cell address with a nonzero high word on a 32-bit platform.
    AddrOverflow,
    /// Two-cell size with a nonzero high word; sizes must fit one cell.
    SizeOverflow,
}

/// Read the big-endian cell at `index`, bounds-checked against the
/// property's declared length.
fn cell_at(data: &[u8], index: usize) -> Result<u32, RegError> {
    let start = index * CELL_SIZE;
    let bytes = data
        .get(start..start + CELL_SIZE)
        .ok_or(RegError::Truncated)?;
    let mut raw = [0u8; CELL_SIZE];
    raw.copy_from_slice(bytes);
    Ok(u32::from_be_bytes(raw))
}

/// Decode a physical address from the leading `cell_count` cells of `data`.
///
/// Zero is rejected: the tree uses it for "no address assigned", so a window
/// can never legitimately start there.
pub fn read_paddr(data: &[u8], cell_count: usize, width: AddrWidth) -> Result<Paddr, RegError> {
    if cell_count < 1 || cell_count > 2 {
        return Err(RegError::BadCellCount { cells: cell_count });
    }

    let mut addr = cell_at(data, 0)? as u64;
    if cell_count == 2 {
        let low = cell_at(data, 1)? as u64;
        addr = match width {
            AddrWidth::Bits32 => {
                // High order 32 bits can't be nonzero here.
                if addr != 0 {
                    return Err(RegError::AddrOverflow);
                }
                low
            }
            AddrWidth::Bits64 => (addr << 32) | low,
        };
    }

    if addr == 0 {
        return Err(RegError::NullAddr);
    }
    Ok(Paddr::from(addr))
}

/// Decode a byte count from the leading `cell_count` cells of `data`.
///
/// Unlike addresses, zero is legal: a node may declare an empty window.
/// Sizes are assumed to fit one cell, so a two-cell size only passes when
/// its high word is zero.
pub fn read_size(data: &[u8], cell_count: usize) -> Result<usize, RegError> {
    if cell_count < 1 || cell_count > 2 {
        return Err(RegError::BadCellCount { cells: cell_count });
    }

    let mut size = cell_at(data, 0)?;
    if cell_count == 2 {
        if size != 0 {
            return Err(RegError::SizeOverflow);
        }
        size = cell_at(data, 1)?;
    }
    Ok(size as usize)
}

/// Base address of the node's first `reg` window.
pub fn reg_base_address(blob: &impl BlobDecoder, node: NodeOffset) -> Result<Paddr, RegError> {
    let parent = blob.parent(node).ok_or(RegError::NoParent)?;
    let reg = blob.property(node, "reg").ok_or(RegError::PropNotFound)?;
    let ncells = blob.address_cells(parent).ok_or(RegError::PropNotFound)?;

    read_paddr(reg, ncells, PADDR_WIDTH)
}

/// Byte size of the node's first `reg` window.
pub fn reg_size(blob: &impl BlobDecoder, node: NodeOffset) -> Result<usize, RegError> {
    let parent = blob.parent(node).ok_or(RegError::NoParent)?;
    let reg = blob.property(node, "reg").ok_or(RegError::PropNotFound)?;

    let ncells = blob.address_cells(parent).ok_or(RegError::PropNotFound)?;
    if ncells < 1 || ncells > 2 {
        return Err(RegError::BadCellCount { cells: ncells });
    }
    let scells = blob.size_cells(parent).ok_or(RegError::PropNotFound)?;

    // Size cells start right after the address cells.
    let tail = reg.get(ncells * CELL_SIZE..).ok_or(RegError::Truncated)?;
    read_size(tail, scells)
}

/// Resolve a node's full register window.
///
/// Base and size are decoded independently; the mapping path needs both, so
/// the first failure wins here.
pub fn extract_register_window(
    blob: &impl BlobDecoder,
    node: NodeOffset,
) -> Result<RegWindow, RegError> {
    let base = reg_base_address(blob, node)?;
    let size = reg_size(blob, node)?;
    Ok(RegWindow { base, size })
}
