//! Platform configuration for the trusted core.
//! Split out as a library so every member crate shares one address model.

#![no_std]

pub mod arch;
