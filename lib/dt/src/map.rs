//! Mapping a device node's register window into the virtual address space.

use crate::blob::{BlobDecoder, NodeOffset};
use crate::reg::{self, RegError};
use crate::status::{self, DtStatus};
use config::arch::{Paddr, Vaddr};

/// Classification of an I/O mapping by the world allowed to reach it.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MemType {
    /// Device registers reachable from the secure world only.
    IoSecure,
    /// Device registers reachable from the non-secure world.
    IoNonSecure,
}

/// The memory-manager capability the mapping path delegates to.
///
/// Implementations own the physical-to-virtual tables; this crate never
/// inspects them beyond these calls.
pub trait IoMapper {
    /// Whether virtual-memory translation is active on the calling CPU.
    fn translation_enabled(&self) -> bool;

    /// Ensure a mapping exists for the window; may be a no-op when one is
    /// already present. Returns `false` when no mapping can be established,
    /// in which case no partial state remains behind.
    fn ensure_mapped(&self, mtype: MemType, base: Paddr, size: usize) -> bool;

    /// Virtual address of `base` within the mappings of `mtype`.
    fn phys_to_virt(&self, base: Paddr, mtype: MemType) -> Option<Vaddr>;
}

/// A register window mapped into the core's address space.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct IoMapping {
    pub base: Vaddr,
    pub size: usize,
}

/// Failures while mapping a device node.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MapError {
    /// The node is disabled in both worlds; nothing to map.
    Disabled,
    /// The register window could not be decoded.
    Reg(RegError),
    /// The memory manager could not establish the mapping.
    MapFailed,
    /// The mapping exists but translated to no usable address.
    NoVirtualAddress,
}

impl From<RegError> for MapError {
    fn from(err: RegError) -> MapError {
        MapError::Reg(err)
    }
}

/// Map the register window of `node` and return its virtual base and size.
///
/// A node left enabled for the non-secure world maps as non-secure I/O
/// memory even when the secure world may also use it; only a
/// secure-exclusive node gets the secure classification.
///
/// # Panics
///
/// Translation must already be enabled. Calling this earlier is a
/// sequencing bug in the caller, not bad input, and trips the assertion.
pub fn map_device(
    blob: &impl BlobDecoder,
    mm: &impl IoMapper,
    node: NodeOffset,
) -> Result<IoMapping, MapError> {
    assert!(mm.translation_enabled());

    let st = status::resolve_status(blob, node);
    if st.is_empty() {
        return Err(MapError::Disabled);
    }

    let window = reg::extract_register_window(blob, node)?;

    let mtype = if st.contains(DtStatus::OK_SEC) && !st.contains(DtStatus::OK_NSEC) {
        MemType::IoSecure
    } else {
        MemType::IoNonSecure
    };

    if !mm.ensure_mapped(mtype, window.base, window.size) {
        log::error!("failed to map {} bytes at PA {:?}", window.size, window.base);
        return Err(MapError::MapFailed);
    }

    // The lookup can still come back empty or null if the mapping tables
    // are inconsistent; treat that as a failure rather than handing out a
    // null window.
    match mm.phys_to_virt(window.base, mtype) {
        Some(vbase) if *vbase != 0 => Ok(IoMapping {
            base: vbase,
            size: window.size,
        }),
        _ => {
            log::error!("no VA for PA {:?}", window.base);
            Err(MapError::NoVirtualAddress)
        }
    }
}
