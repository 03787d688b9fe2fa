//! Node enablement across the secure and non-secure worlds.

use crate::blob::{BlobDecoder, NodeOffset};
use bitflags::bitflags;

bitflags! {
    /// Which execution worlds may use a device node.
    ///
    /// An empty set means the node is disabled everywhere.
    pub struct DtStatus: u32 {
        /// Usable from the non-secure world.
        const OK_NSEC = 1 << 0;
        /// Usable from the secure world.
        const OK_SEC  = 1 << 1;
    }
}

/// Whether a `status`-like value reads as enabled.
///
/// Strings in the blob are not guaranteed to carry their terminator, so the
/// compare runs over the declared length with trailing terminators dropped.
fn is_okay(value: &[u8]) -> bool {
    match core::str::from_utf8(value) {
        Ok(text) => {
            let text = text.trim_end_matches('\0');
            text == "ok" || text == "okay"
        }
        Err(_) => false,
    }
}

/// Derive the enablement state of `node` from its `status` and
/// `secure-status` properties.
///
/// Absent or unreadable properties degrade to the documented defaults, so
/// this never fails:
/// - no `status` means "okay";
/// - no `secure-status` inherits the `status` result, but only when that
///   result was okay. A node disabled by `status` stays disabled in the
///   secure world unless `secure-status` explicitly enables it.
pub fn resolve_status(blob: &impl BlobDecoder, node: NodeOffset) -> DtStatus {
    let mut st = DtStatus::empty();

    match blob.property(node, "status") {
        Some(value) => {
            if is_okay(value) {
                st |= DtStatus::OK_NSEC;
            }
        }
        None => st |= DtStatus::OK_NSEC,
    }

    match blob.property(node, "secure-status") {
        Some(value) => {
            if is_okay(value) {
                st |= DtStatus::OK_SEC;
            }
        }
        None => {
            if st.contains(DtStatus::OK_NSEC) {
                st |= DtStatus::OK_SEC;
            }
        }
    }

    st
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::mock::MockTree;

    fn node_with(status: Option<&str>, secure_status: Option<&str>) -> (MockTree, NodeOffset) {
        let mut tree = MockTree::new();
        let node = tree.add_node(tree.root());
        if let Some(value) = status {
            tree.set_str_prop(node, "status", value);
        }
        if let Some(value) = secure_status {
            tree.set_str_prop(node, "secure-status", value);
        }
        (tree, node)
    }

    #[test]
    fn absent_properties_enable_both_worlds() {
        let (tree, node) = node_with(None, None);
        assert_eq!(
            resolve_status(&tree, node),
            DtStatus::OK_NSEC | DtStatus::OK_SEC
        );
    }

    #[test]
    fn disabled_status_disables_both_worlds() {
        let (tree, node) = node_with(Some("disabled"), None);
        assert_eq!(resolve_status(&tree, node), DtStatus::empty());
    }

    #[test]
    fn secure_status_can_disable_independently() {
        let (tree, node) = node_with(Some("okay"), Some("disabled"));
        assert_eq!(resolve_status(&tree, node), DtStatus::OK_NSEC);
    }

    #[test]
    fn secure_status_can_enable_a_disabled_node() {
        let (tree, node) = node_with(Some("disabled"), Some("okay"));
        assert_eq!(resolve_status(&tree, node), DtStatus::OK_SEC);
    }

    #[test]
    fn secure_default_does_not_resurrect_a_disabled_node() {
        // Inheriting from status only applies to a positive result; this
        // stays disabled in the secure world too.
        let (tree, node) = node_with(Some("disabled"), None);
        assert!(!resolve_status(&tree, node).contains(DtStatus::OK_SEC));
    }

    #[test]
    fn short_ok_spelling_counts() {
        let (tree, node) = node_with(Some("ok"), None);
        assert_eq!(
            resolve_status(&tree, node),
            DtStatus::OK_NSEC | DtStatus::OK_SEC
        );
    }

    #[test]
    fn unterminated_string_compares_at_declared_length() {
        let mut tree = MockTree::new();
        let node = tree.add_node(tree.root());
        // No trailing terminator at all; still reads as okay.
        tree.set_prop(node, "status", b"okay");
        assert!(resolve_status(&tree, node).contains(DtStatus::OK_NSEC));
    }

    #[test]
    fn garbage_status_reads_as_disabled() {
        let mut tree = MockTree::new();
        let node = tree.add_node(tree.root());
        tree.set_prop(node, "status", &[0xff, 0xfe, 0x00]);
        assert_eq!(resolve_status(&tree, node), DtStatus::empty());

        let (tree, node) = node_with(Some("okays"), None);
        assert_eq!(resolve_status(&tree, node), DtStatus::empty());
    }
}
