//! Device-tree driven hardware discovery for the trusted core.
//!
//! This crate binds device nodes found in a flattened device tree to the
//! kernel's compiled-in drivers and turns their register descriptions into
//! mapped virtual windows:
//!
//! - [driver::find_compatible_driver] scans the registered drivers for the
//!   first one claiming a node's `compatible` strings.
//! - [map::map_device] resolves a node's enablement status and register
//!   window, then asks the memory manager for a secure or non-secure I/O
//!   mapping.
//!
//! The tree blob itself is decoded elsewhere; everything here goes through
//! the [blob::BlobDecoder] capability and treats the blob as untrusted
//! input, so each read is validated against the declared property lengths.

#![no_std]
extern crate alloc;
#[cfg(test)]
extern crate std;

pub mod blob;
pub mod driver;
pub mod map;
pub mod reg;
pub mod status;
