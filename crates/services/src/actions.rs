use hanyu_core::NodeId;

/// Tree mutations as a closed set of typed actions.
///
/// Context menus and bottom sheets produce one of these; the app
/// dispatches through a single exhaustive match, so there is no
/// action-by-name lookup anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeAction {
    /// New folder under `parent`, or at the root when `None`.
    CreateFolder {
        parent: Option<NodeId>,
        name: String,
    },
    /// New empty vocabulary file under `parent`, or at the root.
    CreateFile {
        parent: Option<NodeId>,
        name: String,
    },
    Rename { id: NodeId, name: String },
    /// Removes the node and, for folders, the whole subtree.
    Delete { id: NodeId },
    ToggleOpen { id: NodeId },
}
