use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::NodeId;
use crate::model::vocab::{VocabEntry, renumber};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Refusals from tree mutations. Any error leaves the tree untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TreeError {
    #[error("name cannot be empty")]
    EmptyName,

    #[error("no node with id {0}")]
    NotFound(NodeId),

    #[error("node {0} is not a folder")]
    NotAFolder(NodeId),

    #[error("node {0} is not a file")]
    NotAFile(NodeId),
}

//
// ─── NODE ──────────────────────────────────────────────────────────────────────
//

/// One node of the document tree: a folder owning its children, or a
/// vocabulary file. Serializes in the tagged camelCase shape of the
/// persisted record (`"type": "folder" | "file"`, `createdAt`,
/// `vocabData`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    #[serde(rename_all = "camelCase")]
    Folder {
        id: NodeId,
        name: String,
        #[serde(default)]
        open: bool,
        #[serde(default)]
        children: Vec<TreeNode>,
    },
    #[serde(rename_all = "camelCase")]
    File {
        id: NodeId,
        name: String,
        #[serde(with = "chrono::serde::ts_milliseconds")]
        created_at: DateTime<Utc>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        vocab_data: Option<Vec<VocabEntry>>,
    },
}

impl TreeNode {
    #[must_use]
    pub fn id(&self) -> NodeId {
        match self {
            TreeNode::Folder { id, .. } | TreeNode::File { id, .. } => *id,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            TreeNode::Folder { name, .. } | TreeNode::File { name, .. } => name,
        }
    }

    #[must_use]
    pub fn is_folder(&self) -> bool {
        matches!(self, TreeNode::Folder { .. })
    }

    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self, TreeNode::File { .. })
    }

    /// A folder's children; `None` for files.
    #[must_use]
    pub fn children(&self) -> Option<&[TreeNode]> {
        match self {
            TreeNode::Folder { children, .. } => Some(children),
            TreeNode::File { .. } => None,
        }
    }

    /// A file's vocabulary rows; `None` for folders and files with no
    /// vocabulary yet.
    #[must_use]
    pub fn vocab(&self) -> Option<&[VocabEntry]> {
        match self {
            TreeNode::File {
                vocab_data: Some(rows),
                ..
            } => Some(rows),
            _ => None,
        }
    }

    /// Number of vocabulary rows (0 for folders and empty files).
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.vocab().map_or(0, <[VocabEntry]>::len)
    }

    fn set_name(&mut self, new_name: String) {
        match self {
            TreeNode::Folder { name, .. } | TreeNode::File { name, .. } => *name = new_name,
        }
    }
}

//
// ─── TREE ──────────────────────────────────────────────────────────────────────
//

/// The folder/file forest. The root is an ordered sequence of top-level
/// nodes; each folder exclusively owns its children, so the structure is
/// acyclic by construction and deleting a folder drops its subtree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree {
    nodes: Vec<TreeNode>,
}

impl Tree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The fixed seed used when no tree has been persisted yet: two HSK
    /// folders with three lesson files and one empty extras folder,
    /// ids 1 through 6.
    #[must_use]
    pub fn starter(now: DateTime<Utc>) -> Self {
        let file = |id: i64, name: &str| TreeNode::File {
            id: NodeId::new(id),
            name: name.to_owned(),
            created_at: now,
            vocab_data: None,
        };
        Self {
            nodes: vec![
                TreeNode::Folder {
                    id: NodeId::new(1),
                    name: "HSK 1".to_owned(),
                    open: true,
                    children: vec![file(2, "Bài 1 - Chào hỏi"), file(3, "Bài 2 - Gia đình")],
                },
                TreeNode::Folder {
                    id: NodeId::new(4),
                    name: "HSK 2".to_owned(),
                    open: false,
                    children: vec![file(5, "Bài 1 - Thời gian")],
                },
                TreeNode::Folder {
                    id: NodeId::new(6),
                    name: "Từ vựng thêm".to_owned(),
                    open: false,
                    children: Vec::new(),
                },
            ],
        }
    }

    #[must_use]
    pub fn roots(&self) -> &[TreeNode] {
        &self.nodes
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth-first pre-order search; first match wins.
    #[must_use]
    pub fn find(&self, id: NodeId) -> Option<&TreeNode> {
        find_in(&self.nodes, id)
    }

    #[must_use]
    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        find_in_mut(&mut self.nodes, id)
    }

    /// Every file in the tree, flattened depth-first. Drives the review
    /// file picker.
    #[must_use]
    pub fn files(&self) -> Vec<&TreeNode> {
        let mut out = Vec::new();
        collect_files(&self.nodes, &mut out);
        out
    }

    /// Total node count, folders included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        fn count(nodes: &[TreeNode]) -> usize {
            nodes
                .iter()
                .map(|n| 1 + n.children().map_or(0, count))
                .sum()
        }
        count(&self.nodes)
    }

    /// Calls `f` with every node id in the tree.
    pub fn for_each_id(&self, mut f: impl FnMut(NodeId)) {
        fn walk(nodes: &[TreeNode], f: &mut impl FnMut(NodeId)) {
            for node in nodes {
                f(node.id());
                if let Some(children) = node.children() {
                    walk(children, f);
                }
            }
        }
        walk(&self.nodes, &mut f);
    }

    /// Appends a new folder under `parent`, or at the root when no
    /// parent is given or the parent id no longer resolves to a folder
    /// (a stale context-menu target). The parent folder is expanded.
    ///
    /// # Errors
    ///
    /// Returns `TreeError::EmptyName` if the name is blank after
    /// trimming; nothing is created.
    pub fn create_folder(
        &mut self,
        parent: Option<NodeId>,
        name: &str,
        id: NodeId,
    ) -> Result<NodeId, TreeError> {
        let name = trimmed_name(name)?;
        let node = TreeNode::Folder {
            id,
            name,
            open: false,
            children: Vec::new(),
        };
        self.append(parent, node);
        Ok(id)
    }

    /// Appends a new file with no vocabulary; placement rules match
    /// [`Tree::create_folder`].
    ///
    /// # Errors
    ///
    /// Returns `TreeError::EmptyName` if the name is blank after trimming.
    pub fn create_file(
        &mut self,
        parent: Option<NodeId>,
        name: &str,
        id: NodeId,
        created_at: DateTime<Utc>,
    ) -> Result<NodeId, TreeError> {
        let name = trimmed_name(name)?;
        let node = TreeNode::File {
            id,
            name,
            created_at,
            vocab_data: None,
        };
        self.append(parent, node);
        Ok(id)
    }

    fn append(&mut self, parent: Option<NodeId>, node: TreeNode) {
        if let Some(parent_id) = parent {
            if let Some(TreeNode::Folder { open, children, .. }) = self.find_mut(parent_id) {
                *open = true;
                children.push(node);
                return;
            }
        }
        self.nodes.push(node);
    }

    /// Renames a node in place.
    ///
    /// # Errors
    ///
    /// `TreeError::EmptyName` on blank input, `TreeError::NotFound` on a
    /// stale id; the tree is unchanged on either.
    pub fn rename(&mut self, id: NodeId, new_name: &str) -> Result<(), TreeError> {
        let new_name = trimmed_name(new_name)?;
        let node = self.find_mut(id).ok_or(TreeError::NotFound(id))?;
        node.set_name(new_name);
        Ok(())
    }

    /// Removes a node wherever it is nested and returns it. Removing a
    /// folder removes its entire subtree.
    ///
    /// # Errors
    ///
    /// Returns `TreeError::NotFound` if the id does not resolve.
    pub fn delete(&mut self, id: NodeId) -> Result<TreeNode, TreeError> {
        remove_in(&mut self.nodes, id).ok_or(TreeError::NotFound(id))
    }

    /// Flips a folder's expanded flag and returns the new state.
    ///
    /// # Errors
    ///
    /// `TreeError::NotFound` on a stale id, `TreeError::NotAFolder` on a
    /// file.
    pub fn toggle_open(&mut self, id: NodeId) -> Result<bool, TreeError> {
        match self.find_mut(id) {
            Some(TreeNode::Folder { open, .. }) => {
                *open = !*open;
                Ok(*open)
            }
            Some(TreeNode::File { .. }) => Err(TreeError::NotAFolder(id)),
            None => Err(TreeError::NotFound(id)),
        }
    }

    /// Replaces a file's vocabulary wholesale, renumbering positions.
    ///
    /// # Errors
    ///
    /// `TreeError::NotFound` on a stale id, `TreeError::NotAFile` on a
    /// folder.
    pub fn attach_vocabulary(
        &mut self,
        file_id: NodeId,
        mut rows: Vec<VocabEntry>,
    ) -> Result<(), TreeError> {
        match self.find_mut(file_id) {
            Some(TreeNode::File { vocab_data, .. }) => {
                renumber(&mut rows);
                *vocab_data = Some(rows);
                Ok(())
            }
            Some(TreeNode::Folder { .. }) => Err(TreeError::NotAFile(file_id)),
            None => Err(TreeError::NotFound(file_id)),
        }
    }

    /// Mutable access to a file's vocabulary rows, for in-place field
    /// edits. `None` when the id is stale, a folder, or a file with no
    /// vocabulary.
    #[must_use]
    pub fn vocab_mut(&mut self, file_id: NodeId) -> Option<&mut Vec<VocabEntry>> {
        match self.find_mut(file_id) {
            Some(TreeNode::File {
                vocab_data: Some(rows),
                ..
            }) => Some(rows),
            _ => None,
        }
    }
}

fn trimmed_name(name: &str) -> Result<String, TreeError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TreeError::EmptyName);
    }
    Ok(name.to_owned())
}

fn find_in(nodes: &[TreeNode], id: NodeId) -> Option<&TreeNode> {
    for node in nodes {
        if node.id() == id {
            return Some(node);
        }
        if let Some(children) = node.children() {
            if let Some(found) = find_in(children, id) {
                return Some(found);
            }
        }
    }
    None
}

fn find_in_mut(nodes: &mut [TreeNode], id: NodeId) -> Option<&mut TreeNode> {
    for node in nodes {
        if node.id() == id {
            return Some(node);
        }
        if let TreeNode::Folder { children, .. } = node {
            if let Some(found) = find_in_mut(children, id) {
                return Some(found);
            }
        }
    }
    None
}

fn remove_in(nodes: &mut Vec<TreeNode>, id: NodeId) -> Option<TreeNode> {
    if let Some(index) = nodes.iter().position(|n| n.id() == id) {
        return Some(nodes.remove(index));
    }
    for node in nodes {
        if let TreeNode::Folder { children, .. } = node {
            if let Some(removed) = remove_in(children, id) {
                return Some(removed);
            }
        }
    }
    None
}

fn collect_files<'a>(nodes: &'a [TreeNode], out: &mut Vec<&'a TreeNode>) {
    for node in nodes {
        match node {
            TreeNode::File { .. } => out.push(node),
            TreeNode::Folder { children, .. } => collect_files(children, out),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
