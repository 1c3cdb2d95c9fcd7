//! Tree → visual tree.
//!
//! The visual tree mirrors the folder structure: every node gets one row,
//! and a folder with children owns a child list whose visibility follows
//! the folder's `expanded` flag. Collapsed subtrees are still rendered so a
//! toggle only flips flags on one node instead of rebuilding anything.

use super::format::format_size;
use super::tree::{NodeKind, TreeNode};

/// Placeholder shown instead of a tree when the device reports no files.
pub const EMPTY_MESSAGE: &str = "No files found on device";

/// One indentation unit in front of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guide {
    /// Vertical continuation line for an outer ancestor level.
    Continuation,
    /// Horizontal connector at the immediate parent level.
    Connector,
}

/// Expand/collapse slot of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrow {
    Collapsed,
    Expanded,
    /// Folder without children: slot present, nothing to toggle.
    Disabled,
    /// Files keep the slot width for alignment.
    Spacer,
}

/// File type icon, chosen by lowercased extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileIcon {
    Html,
    Css,
    Script,
    Json,
    Text,
    Log,
    Markdown,
    Xml,
    Config,
    Generic,
}

impl FileIcon {
    pub fn from_name(name: &str) -> Self {
        let ext = name.rsplit('.').next().unwrap_or("").to_lowercase();
        match ext.as_str() {
            "html" => FileIcon::Html,
            "css" => FileIcon::Css,
            "js" => FileIcon::Script,
            "json" => FileIcon::Json,
            "txt" => FileIcon::Text,
            "log" => FileIcon::Log,
            "md" => FileIcon::Markdown,
            "xml" => FileIcon::Xml,
            "cfg" | "config" | "ini" => FileIcon::Config,
            _ => FileIcon::Generic,
        }
    }
}

/// Type icon of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    FolderOpen,
    FolderClosed,
    File(FileIcon),
}

/// A single display row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub path: String,
    pub name: String,
    pub kind: NodeKind,
    pub depth: usize,
    pub is_last_sibling: bool,
    pub guides: Vec<Guide>,
    pub arrow: Arrow,
    pub icon: Icon,
    pub size_label: String,
    /// Files carry a download action; folders don't.
    pub downloadable: bool,
    pub selected: bool,
}

/// Children of a rendered folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildList {
    pub visible: bool,
    pub nodes: Vec<VisualNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualNode {
    pub row: Row,
    pub children: Option<ChildList>,
}

impl VisualNode {
    /// Swap arrow, icon and child-list visibility for a folder.
    fn set_expanded(&mut self, expanded: bool) {
        if self.row.kind != NodeKind::Folder {
            return;
        }
        if self.row.arrow != Arrow::Disabled {
            self.row.arrow = if expanded {
                Arrow::Expanded
            } else {
                Arrow::Collapsed
            };
        }
        self.row.icon = folder_icon(expanded);
        if let Some(list) = &mut self.children {
            list.visible = expanded;
        }
    }

    fn find_mut(&mut self, path: &str) -> Option<&mut VisualNode> {
        if self.row.path == path {
            return Some(self);
        }
        self.children
            .as_mut()?
            .nodes
            .iter_mut()
            .find_map(|child| child.find_mut(path))
    }

    fn collect_visible<'a>(&'a self, rows: &mut Vec<&'a Row>) {
        rows.push(&self.row);
        if let Some(list) = &self.children {
            if list.visible {
                for child in &list.nodes {
                    child.collect_visible(rows);
                }
            }
        }
    }
}

/// Display-facing form of the whole tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisualTree {
    /// The listing was empty; show [`EMPTY_MESSAGE`] instead of rows.
    Empty,
    Nodes(Vec<VisualNode>),
}

impl VisualTree {
    /// Rows a user can currently see, in display order.
    pub fn visible_rows(&self) -> Vec<&Row> {
        let mut rows = Vec::new();
        if let VisualTree::Nodes(nodes) = self {
            for node in nodes {
                node.collect_visible(&mut rows);
            }
        }
        rows
    }

    fn find_mut(&mut self, path: &str) -> Option<&mut VisualNode> {
        match self {
            VisualTree::Empty => None,
            VisualTree::Nodes(nodes) => nodes.iter_mut().find_map(|n| n.find_mut(path)),
        }
    }

    /// Apply an expand/collapse to one folder. Returns false when the path
    /// isn't rendered.
    pub fn set_expanded(&mut self, path: &str, expanded: bool) -> bool {
        match self.find_mut(path) {
            Some(node) => {
                node.set_expanded(expanded);
                true
            }
            None => false,
        }
    }

    /// Move the selected marker from `previous` to `current`.
    pub fn set_selected(&mut self, previous: Option<&str>, current: &str) {
        if let Some(prev) = previous {
            if let Some(node) = self.find_mut(prev) {
                node.row.selected = false;
            }
        }
        if let Some(node) = self.find_mut(current) {
            node.row.selected = true;
        }
    }
}

fn folder_icon(expanded: bool) -> Icon {
    if expanded {
        Icon::FolderOpen
    } else {
        Icon::FolderClosed
    }
}

/// Render the root's children. The root itself has no row.
pub fn render(root: &TreeNode, selected: Option<&str>) -> VisualTree {
    if root.children.is_empty() {
        return VisualTree::Empty;
    }
    let last = root.children.len() - 1;
    VisualTree::Nodes(
        root.children
            .iter()
            .enumerate()
            .map(|(i, child)| render_node(child, 0, i == last, selected))
            .collect(),
    )
}

/// Render one node and everything below it.
pub fn render_node(
    node: &TreeNode,
    depth: usize,
    is_last_sibling: bool,
    selected: Option<&str>,
) -> VisualNode {
    let guides = (0..depth)
        .map(|level| {
            if level + 1 == depth {
                Guide::Connector
            } else {
                Guide::Continuation
            }
        })
        .collect();

    let (arrow, icon) = match node.kind {
        NodeKind::Folder => {
            let arrow = if node.children.is_empty() {
                Arrow::Disabled
            } else if node.expanded {
                Arrow::Expanded
            } else {
                Arrow::Collapsed
            };
            (arrow, folder_icon(node.expanded))
        }
        NodeKind::File => (Arrow::Spacer, Icon::File(FileIcon::from_name(&node.name))),
    };

    let row = Row {
        path: node.path.clone(),
        name: node.name.clone(),
        kind: node.kind,
        depth,
        is_last_sibling,
        guides,
        arrow,
        icon,
        size_label: format_size(node.size),
        downloadable: node.kind == NodeKind::File,
        selected: selected == Some(node.path.as_str()),
    };

    let children = if node.is_folder() && !node.children.is_empty() {
        let last = node.children.len() - 1;
        Some(ChildList {
            visible: node.expanded,
            nodes: node
                .children
                .iter()
                .enumerate()
                .map(|(i, child)| render_node(child, depth + 1, i == last, selected))
                .collect(),
        })
    } else {
        None
    };

    VisualNode { row, children }
}

/// Contents of the details panel for a selected node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Details {
    pub path: String,
    pub type_label: &'static str,
    pub size_label: String,
    /// Direct child count, folders only.
    pub item_count: Option<usize>,
}

impl Details {
    pub fn of(node: &TreeNode) -> Self {
        Self {
            path: node.path.clone(),
            type_label: node.kind.label(),
            size_label: format_size(node.size),
            item_count: node.is_folder().then_some(node.children.len()),
        }
    }

    /// `"<n> items"` for folders.
    pub fn contains_label(&self) -> Option<String> {
        self.item_count.map(|n| format!("{} items", n))
    }
}
