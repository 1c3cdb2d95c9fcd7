use std::cmp::Ordering;

use tracing::debug;

use crate::api::FileRecord;

/// Path of the synthetic root folder.
pub const ROOT_PATH: &str = "/";

/// Type of tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Folder,
    File,
}

impl NodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Folder => "Folder",
            NodeKind::File => "File",
        }
    }
}

/// A node in the device file tree.
///
/// A folder's `size` is the sum of every file below it. Files never have
/// children and are never expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,
    pub kind: NodeKind,
    pub path: String,
    pub size: u64,
    pub children: Vec<TreeNode>,
    pub expanded: bool,
}

impl TreeNode {
    /// The root folder: path `/`, always expanded.
    pub fn root() -> Self {
        Self {
            name: "root".to_string(),
            kind: NodeKind::Folder,
            path: ROOT_PATH.to_string(),
            size: 0,
            children: Vec::new(),
            expanded: true,
        }
    }

    fn folder(name: &str, path: String) -> Self {
        Self {
            name: name.to_string(),
            kind: NodeKind::Folder,
            path,
            size: 0,
            children: Vec::new(),
            expanded: false,
        }
    }

    fn file(name: &str, path: &str, size: u64) -> Self {
        Self {
            name: name.to_string(),
            kind: NodeKind::File,
            path: path.to_string(),
            size,
            children: Vec::new(),
            expanded: false,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    pub fn is_root(&self) -> bool {
        self.path == ROOT_PATH
    }

    /// Find a node by path.
    pub fn find(&self, target: &str) -> Option<&TreeNode> {
        if self.path == target {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(target))
    }

    /// Find a mutable reference to a node by path.
    pub fn find_mut(&mut self, target: &str) -> Option<&mut TreeNode> {
        if self.path == target {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_mut(target))
    }

    /// Set `expanded` on this folder and every folder below it.
    pub fn set_expanded_recursive(&mut self, expanded: bool) {
        if !self.is_folder() {
            return;
        }
        self.expanded = expanded;
        for child in self.children.iter_mut() {
            child.set_expanded_recursive(expanded);
        }
    }

    /// Find the folder child called `name`, creating it if missing.
    fn folder_child(&mut self, name: &str, path: String, created: &mut usize) -> &mut TreeNode {
        let idx = match self
            .children
            .iter()
            .position(|c| c.is_folder() && c.name == name)
        {
            Some(idx) => idx,
            None => {
                self.children.push(TreeNode::folder(name, path));
                *created += 1;
                self.children.len() - 1
            }
        };
        &mut self.children[idx]
    }

    /// Sort children folders-first, then by name, all the way down.
    fn sort_recursive(&mut self) {
        self.children.sort_by(compare_children);
        for child in self.children.iter_mut() {
            if child.is_folder() {
                child.sort_recursive();
            }
        }
    }
}

fn compare_children(a: &TreeNode, b: &TreeNode) -> Ordering {
    match (a.kind, b.kind) {
        (NodeKind::Folder, NodeKind::File) => Ordering::Less,
        (NodeKind::File, NodeKind::Folder) => Ordering::Greater,
        _ => a.name.cmp(&b.name),
    }
}

/// Name and size of the largest file in a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LargestFile {
    pub name: String,
    pub size: u64,
}

/// Aggregates over one build of the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub files: usize,
    pub folders: usize,
    pub total_size: u64,
    pub largest_file: LargestFile,
}

/// Non-empty segments of a path, ignoring the leading and any trailing `/`.
fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn joined_path(parts: &[&str]) -> String {
    format!("/{}", parts.join("/"))
}

/// Build the tree and its stats from a flat listing.
///
/// Directories are placed first so that the folder skeleton exists before
/// any file is attached. The file pass still creates missing ancestor
/// folders, so a listing that omits directory entries builds the same tree.
/// Every folder except the root starts collapsed.
pub fn build(records: &[FileRecord]) -> (TreeNode, Stats) {
    let mut root = TreeNode::root();
    let mut stats = Stats::default();

    let (mut dirs, mut files): (Vec<&FileRecord>, Vec<&FileRecord>) =
        records.iter().partition(|r| r.is_directory);
    dirs.sort_by(|a, b| a.path.cmp(&b.path));
    files.sort_by(|a, b| a.path.cmp(&b.path));

    for dir in dirs {
        let parts = segments(&dir.path);
        let mut current = &mut root;
        for (i, part) in parts.iter().enumerate() {
            current = current.folder_child(part, joined_path(&parts[..=i]), &mut stats.folders);
        }
    }

    for file in files {
        let (parent, file_name) = match file.path.rsplit_once('/') {
            Some((parent, name)) => (parent, name),
            None => ("", file.path.as_str()),
        };
        if file_name.is_empty() {
            debug!(path = %file.path, "skipping file record without a name");
            continue;
        }

        let parts = segments(parent);
        let mut current = &mut root;
        for (i, part) in parts.iter().enumerate() {
            current = current.folder_child(part, joined_path(&parts[..=i]), &mut stats.folders);
            current.size += file.size;
        }
        current
            .children
            .push(TreeNode::file(file_name, &file.path, file.size));

        stats.files += 1;
        stats.total_size += file.size;
        if file.size > stats.largest_file.size {
            stats.largest_file = LargestFile {
                name: file_name.to_string(),
                size: file.size,
            };
        }
    }
    root.size = stats.total_size;

    root.sort_recursive();
    debug!(
        files = stats.files,
        folders = stats.folders,
        total_size = stats.total_size,
        "built file tree"
    );
    (root, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<FileRecord> {
        vec![
            FileRecord::file("/www/js/app.js", 4000),
            FileRecord::dir("/www"),
            FileRecord::file("/config.json", 120),
            FileRecord::dir("/www/css"),
            FileRecord::file("/www/index.html", 2048),
            FileRecord::dir("/www/js"),
            FileRecord::file("/www/css/site.css", 900),
            FileRecord::dir("/logs"),
            FileRecord::file("/logs/boot.log", 4000),
            FileRecord::file("/README.md", 64),
        ]
    }

    fn file_sum(node: &TreeNode) -> u64 {
        node.children
            .iter()
            .map(|c| match c.kind {
                NodeKind::File => c.size,
                NodeKind::Folder => file_sum(c),
            })
            .sum()
    }

    fn assert_invariants(node: &TreeNode) {
        match node.kind {
            NodeKind::File => assert!(node.children.is_empty(), "{} has children", node.path),
            NodeKind::Folder => {
                assert_eq!(node.size, file_sum(node), "size of {}", node.path);
                for pair in node.children.windows(2) {
                    assert_ne!(
                        compare_children(&pair[0], &pair[1]),
                        Ordering::Greater,
                        "{} before {}",
                        pair[0].name,
                        pair[1].name
                    );
                }
                for child in &node.children {
                    let expected = if node.is_root() {
                        format!("/{}", child.name)
                    } else {
                        format!("{}/{}", node.path, child.name)
                    };
                    assert_eq!(child.path, expected);
                    assert_invariants(child);
                }
            }
        }
    }

    fn names(node: &TreeNode) -> Vec<&str> {
        node.children.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn two_level_listing() {
        let records = vec![
            FileRecord::file("/a/b.txt", 100),
            FileRecord::dir("/a"),
            FileRecord::file("/c.txt", 50),
        ];
        let (root, stats) = build(&records);

        assert_eq!(names(&root), vec!["a", "c.txt"]);
        let a = &root.children[0];
        assert_eq!(a.kind, NodeKind::Folder);
        assert_eq!(a.size, 100);
        assert_eq!(names(a), vec!["b.txt"]);
        assert_eq!(a.children[0].size, 100);
        assert_eq!(root.children[1].kind, NodeKind::File);
        assert_eq!(root.children[1].size, 50);

        assert_eq!(
            stats,
            Stats {
                files: 2,
                folders: 1,
                total_size: 150,
                largest_file: LargestFile {
                    name: "b.txt".into(),
                    size: 100
                },
            }
        );
    }

    #[test]
    fn empty_listing_builds_bare_root() {
        let (root, stats) = build(&[]);
        assert!(root.children.is_empty());
        assert!(root.expanded);
        assert_eq!(root.path, "/");
        assert_eq!(stats, Stats::default());
    }

    #[test]
    fn folder_sizes_sum_their_files() {
        let (root, _) = build(&sample_records());
        assert_invariants(&root);
        let www = root.find("/www").unwrap();
        assert_eq!(www.size, 4000 + 2048 + 900);
        assert_eq!(root.size, 4000 + 120 + 2048 + 900 + 4000 + 64);
    }

    #[test]
    fn folders_precede_files_in_name_order() {
        let (root, _) = build(&sample_records());
        assert_eq!(names(&root), vec!["logs", "www", "README.md", "config.json"]);
        let www = root.find("/www").unwrap();
        assert_eq!(names(www), vec!["css", "js", "index.html"]);
    }

    #[test]
    fn stats_count_records() {
        let (_, stats) = build(&sample_records());
        assert_eq!(stats.files, 6);
        assert_eq!(stats.folders, 4);
        assert_eq!(stats.total_size, 11132);
    }

    #[test]
    fn largest_file_tie_goes_to_first_path() {
        let (_, stats) = build(&sample_records());
        // /logs/boot.log sorts before /www/js/app.js; both are 4000 bytes.
        assert_eq!(
            stats.largest_file,
            LargestFile {
                name: "boot.log".into(),
                size: 4000
            }
        );
    }

    #[test]
    fn rebuild_is_structurally_identical() {
        let records = sample_records();
        let (first, first_stats) = build(&records);
        let (second, second_stats) = build(&records);
        assert_eq!(first, second);
        assert_eq!(first_stats, second_stats);
    }

    #[test]
    fn input_order_does_not_matter() {
        let mut records = sample_records();
        let (forward, _) = build(&records);
        records.reverse();
        let (reversed, _) = build(&records);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn non_root_folders_start_collapsed() {
        let (root, _) = build(&sample_records());
        assert!(root.expanded);
        for child in root.children.iter().filter(|c| c.is_folder()) {
            assert!(!child.expanded, "{} expanded", child.path);
        }
    }

    #[test]
    fn missing_directory_records_are_created() {
        let records = vec![FileRecord::file("/data/2024/readings.csv", 10)];
        let (root, stats) = build(&records);
        assert_eq!(stats.folders, 2);
        let year = root.find("/data/2024").unwrap();
        assert_eq!(year.kind, NodeKind::Folder);
        assert_eq!(year.size, 10);
        assert_eq!(root.find("/data").unwrap().size, 10);
        assert_invariants(&root);
    }

    #[test]
    fn trailing_slash_directory_is_normalized() {
        let records = vec![FileRecord::dir("/www/"), FileRecord::file("/www/a.txt", 1)];
        let (root, stats) = build(&records);
        assert_eq!(stats.folders, 1);
        assert_eq!(root.find("/www").unwrap().children.len(), 1);
    }

    #[test]
    fn nameless_file_record_is_skipped() {
        let records = vec![
            FileRecord::dir("/www"),
            FileRecord::file("/www/", 77),
            FileRecord::file("/new/", 5),
        ];
        let (root, stats) = build(&records);
        assert_eq!(stats.files, 0);
        assert_eq!(stats.folders, 1);
        assert_eq!(stats.total_size, 0);
        assert_eq!(root.find("/www").unwrap().size, 0);
        assert!(root.find("/new").is_none());
    }

    #[test]
    fn relative_file_path_attaches_to_root() {
        let (root, stats) = build(&[FileRecord::file("loose.txt", 9)]);
        assert_eq!(names(&root), vec!["loose.txt"]);
        assert_eq!(stats.files, 1);
        assert_eq!(root.size, 9);
    }

    #[test]
    fn file_keeps_record_path() {
        let (root, _) = build(&sample_records());
        let css = root.find("/www/css/site.css").unwrap();
        assert_eq!(css.kind, NodeKind::File);
        assert_eq!(css.size, 900);
    }

    #[test]
    fn expand_recursive_touches_only_folders() {
        let (mut root, _) = build(&sample_records());
        root.set_expanded_recursive(true);
        assert!(root.find("/www/css").unwrap().expanded);
        assert!(!root.find("/README.md").unwrap().expanded);
        root.set_expanded_recursive(false);
        assert!(!root.find("/www").unwrap().expanded);
    }

    #[test]
    fn find_mut_reaches_nested_nodes() {
        let (mut root, _) = build(&sample_records());
        root.find_mut("/www/js").unwrap().expanded = true;
        assert!(root.find("/www/js").unwrap().expanded);
        assert!(root.find_mut("/nope").is_none());
    }
}
