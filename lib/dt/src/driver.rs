//! Driver descriptors: registration and lookup by node compatibility.
//!
//! Responsibilities:
//! - Define the [DtDriver] trait implemented by every compiled-in driver.
//! - Own the process-wide registry the probing loop matches nodes against.
//!   Registration order is the match priority: [find_compatible_driver]
//!   scans in that order and the first hit wins, so a platform arranges
//!   precedence purely by the order of its `register_driver` calls.
//!
//! The registry is append-only and populated during early init, before the
//! probing loop runs; drivers are never unregistered.

use crate::blob::{BlobDecoder, NodeOffset};
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;
use utils::vec::LockedVecStatic;

/// A compiled-in driver known to the discovery core.
pub trait DtDriver: Sync + Debug {
    /// Short driver name, used in logs.
    fn name(&self) -> &'static str;

    /// Compatible strings this driver binds to, most specific first.
    fn match_table(&self) -> &'static [&'static str];
}

/// Global storage owning every registered driver, in registration order.
static DRIVER_REG: LockedVecStatic<dyn DtDriver> = LockedVecStatic::new();

/// Register a driver.
///
/// Intended to run at boot, once per driver. The position this call gets in
/// the registration sequence decides the driver's match priority.
pub fn register_driver<T: 'static + DtDriver>(driver: Box<T>) {
    let (driver, _) = DRIVER_REG.push_boxed(driver);
    log::debug!("registered driver '{}'", driver.name());
}

/// All registered drivers, in registration order.
pub fn registered_drivers() -> Vec<&'static dyn DtDriver> {
    DRIVER_REG.snapshot()
}

/// Find the first registered driver claiming compatibility with `node`.
///
/// Every call rescans the registry; the table is small and lookups happen
/// once per node during probing, so nothing is cached.
pub fn find_compatible_driver(
    blob: &impl BlobDecoder,
    node: NodeOffset,
) -> Option<&'static dyn DtDriver> {
    scan_drivers(&DRIVER_REG.snapshot(), blob, node)
}

fn scan_drivers<'d>(
    drivers: &[&'d dyn DtDriver],
    blob: &impl BlobDecoder,
    node: NodeOffset,
) -> Option<&'d dyn DtDriver> {
    for driver in drivers {
        for compat in driver.match_table() {
            if blob.is_compatible(node, compat) {
                return Some(*driver);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::mock::MockTree;

    #[derive(Debug)]
    struct TableDriver {
        name: &'static str,
        table: &'static [&'static str],
    }

    impl DtDriver for TableDriver {
        fn name(&self) -> &'static str {
            self.name
        }
        fn match_table(&self) -> &'static [&'static str] {
            self.table
        }
    }

    static UART: TableDriver = TableDriver {
        name: "uart",
        table: &["ns16550a", "snps,dw-apb-uart"],
    };
    static GENERIC_UART: TableDriver = TableDriver {
        name: "generic-uart",
        table: &["ns16550a"],
    };
    static RNG: TableDriver = TableDriver {
        name: "rng",
        table: &["arm,cctrng"],
    };

    fn uart_node(tree: &mut MockTree) -> NodeOffset {
        let node = tree.add_node(tree.root());
        tree.set_prop(node, "compatible", b"acme,uart\0ns16550a\0");
        node
    }

    #[test]
    fn first_registered_match_wins() {
        let mut tree = MockTree::new();
        let node = uart_node(&mut tree);

        let drivers: &[&dyn DtDriver] = &[&RNG, &UART, &GENERIC_UART];
        let found = scan_drivers(drivers, &tree, node).unwrap();
        assert_eq!(found.name(), "uart");
    }

    #[test]
    fn later_table_entries_still_match() {
        let mut tree = MockTree::new();
        let node = tree.add_node(tree.root());
        tree.set_prop(node, "compatible", b"snps,dw-apb-uart\0");

        let drivers: &[&dyn DtDriver] = &[&UART];
        assert!(scan_drivers(drivers, &tree, node).is_some());
    }

    #[test]
    fn no_match_and_no_compatible_yield_none() {
        let mut tree = MockTree::new();
        let plain = tree.add_node(tree.root());
        let node = uart_node(&mut tree);

        let drivers: &[&dyn DtDriver] = &[&RNG];
        assert!(scan_drivers(drivers, &tree, node).is_none());
        // A node with no compatible property at all matches nothing.
        assert!(scan_drivers(drivers, &tree, plain).is_none());
        assert!(scan_drivers(&[], &tree, node).is_none());
    }

    // The single test touching the global registry, so parallel tests never
    // observe each other's registrations.
    #[test]
    fn global_registry_preserves_registration_order() {
        let before = registered_drivers().len();
        register_driver(Box::new(TableDriver {
            name: "uart-global",
            table: &["ns16550a"],
        }));
        register_driver(Box::new(TableDriver {
            name: "uart-global-fallback",
            table: &["ns16550a"],
        }));

        let drivers = registered_drivers();
        assert_eq!(drivers.len(), before + 2);
        assert_eq!(drivers[before].name(), "uart-global");
        assert_eq!(drivers[before + 1].name(), "uart-global-fallback");

        let mut tree = MockTree::new();
        let node = uart_node(&mut tree);
        let found = find_compatible_driver(&tree, node).unwrap();
        assert_eq!(found.name(), "uart-global");
    }
}
