//! Interaction controller: an explicit state object plus `dispatch`.
//!
//! Every user or network event becomes an [`Action`]. `dispatch` applies it
//! to [`ExplorerState`] and describes what changed as a [`Patch`] for the
//! visual tree, an optional user-facing [`Notice`], and an optional
//! [`Effect`] the caller has to run (fetch or download).

use tracing::{debug, info, warn};

use super::render::Details;
use super::tree::{build, Stats, TreeNode};
use crate::api::{download_endpoint, file_name, FsUsage, LoadOutcome};

/// Placeholder text when the listing could not be fetched.
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load file system";
/// Toast after a successful refresh.
pub const REFRESHED_MESSAGE: &str = "File system refreshed";

/// What the tree panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Loading,
    Ready,
    /// The device reported no files.
    Empty,
    Error(String),
}

/// Which kind of load is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadKind {
    Initial,
    Refresh,
}

#[derive(Debug)]
pub enum Action {
    /// Start the initial load.
    BeginLoad,
    /// A fetch started by `BeginLoad` or `Refresh` finished.
    Loaded(LoadOutcome),
    Toggle(String),
    Select(String),
    ExpandAll,
    CollapseAll,
    Refresh,
    Download(String),
}

/// Minimal change to apply to the visual tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch {
    None,
    /// Re-render everything from the state.
    Full,
    /// One folder's expansion changed.
    Node { path: String, expanded: bool },
    /// Selection moved.
    Selection {
        previous: Option<String>,
        current: String,
    },
}

/// Transient user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Success(String),
    Error(String),
}

/// Side effect the caller must carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch usage and listing, then dispatch `Action::Loaded`.
    Fetch,
    /// Download `path` from the relative `endpoint`.
    Download { path: String, endpoint: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub patch: Patch,
    pub notice: Option<Notice>,
    pub effect: Option<Effect>,
}

impl Transition {
    fn patch(patch: Patch) -> Self {
        Self {
            patch,
            notice: None,
            effect: None,
        }
    }

    fn none() -> Self {
        Self::patch(Patch::None)
    }

    fn notice(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self
    }

    fn effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }
}

/// State of one explorer: tree, stats, usage, selection and load status.
#[derive(Debug)]
pub struct ExplorerState {
    tree: TreeNode,
    stats: Stats,
    usage: Option<FsUsage>,
    selected: Option<String>,
    view: View,
    in_flight: Option<LoadKind>,
}

impl Default for ExplorerState {
    fn default() -> Self {
        Self::new()
    }
}

impl ExplorerState {
    pub fn new() -> Self {
        Self {
            tree: TreeNode::root(),
            stats: Stats::default(),
            usage: None,
            selected: None,
            view: View::Loading,
            in_flight: None,
        }
    }

    pub fn tree(&self) -> &TreeNode {
        &self.tree
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn usage(&self) -> Option<&FsUsage> {
        self.usage.as_ref()
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_node(&self) -> Option<&TreeNode> {
        self.tree.find(self.selected.as_deref()?)
    }

    /// Details panel contents for the current selection. Nothing while the
    /// tree is hidden behind a placeholder.
    pub fn details(&self) -> Option<Details> {
        if !self.is_interactive() {
            return None;
        }
        self.selected_node().map(Details::of)
    }

    /// Whether the tree is on screen and accepts tree actions.
    pub fn is_interactive(&self) -> bool {
        self.view == View::Ready
    }

    /// Whether a load or refresh is running. The refresh control is
    /// disabled while this holds.
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn dispatch(&mut self, action: Action) -> Transition {
        debug!(?action, "dispatch");
        match action {
            Action::BeginLoad => self.begin(LoadKind::Initial),
            Action::Refresh => self.begin(LoadKind::Refresh),
            Action::Loaded(outcome) => self.loaded(outcome),
            Action::Toggle(_)
            | Action::Select(_)
            | Action::ExpandAll
            | Action::CollapseAll
            | Action::Download(_)
                if !self.is_interactive() =>
            {
                debug!(view = ?self.view, "tree hidden, action ignored");
                Transition::none()
            }
            Action::Toggle(path) => self.toggle(&path),
            Action::Select(path) => self.select(path),
            Action::ExpandAll => {
                self.tree.set_expanded_recursive(true);
                Transition::patch(Patch::Full)
            }
            Action::CollapseAll => {
                self.tree.set_expanded_recursive(false);
                self.tree.expanded = true;
                Transition::patch(Patch::Full)
            }
            Action::Download(path) => self.download(path),
        }
    }

    fn begin(&mut self, kind: LoadKind) -> Transition {
        if self.in_flight.is_some() {
            debug!(?kind, "load already in flight");
            return Transition::none();
        }
        self.in_flight = Some(kind);
        self.view = View::Loading;
        Transition::patch(Patch::Full).effect(Effect::Fetch)
    }

    fn loaded(&mut self, outcome: LoadOutcome) -> Transition {
        let kind = self.in_flight.take();

        if let Some(usage) = outcome.usage {
            self.usage = Some(usage);
        }

        match outcome.files {
            Ok(records) => {
                let (tree, stats) = build(&records);
                info!(files = stats.files, folders = stats.folders, "file system loaded");
                self.tree = tree;
                self.stats = stats;
                self.selected = None;
                self.view = if self.tree.children.is_empty() {
                    View::Empty
                } else {
                    View::Ready
                };
                let transition = Transition::patch(Patch::Full);
                if kind == Some(LoadKind::Refresh) {
                    transition.notice(Notice::Success(REFRESHED_MESSAGE.to_string()))
                } else {
                    transition
                }
            }
            Err(message) => {
                warn!(%message, "load failed");
                self.view = View::Error(LOAD_ERROR_MESSAGE.to_string());
                let transition = Transition::patch(Patch::Full);
                if kind == Some(LoadKind::Refresh) {
                    transition.notice(Notice::Error(LOAD_ERROR_MESSAGE.to_string()))
                } else {
                    transition
                }
            }
        }
    }

    fn toggle(&mut self, path: &str) -> Transition {
        match self.tree.find_mut(path) {
            Some(node) if node.is_folder() && !node.is_root() => {
                node.expanded = !node.expanded;
                Transition::patch(Patch::Node {
                    path: node.path.clone(),
                    expanded: node.expanded,
                })
            }
            _ => Transition::none(),
        }
    }

    fn select(&mut self, path: String) -> Transition {
        if self.tree.find(&path).is_none() || self.tree.path == path {
            return Transition::none();
        }
        let previous = self.selected.replace(path.clone());
        Transition::patch(Patch::Selection {
            previous,
            current: path,
        })
    }

    fn download(&self, path: String) -> Transition {
        let notice = Notice::Info(format!("Downloading: {}", file_name(&path)));
        let endpoint = download_endpoint(&path);
        Transition::none()
            .notice(notice)
            .effect(Effect::Download { path, endpoint })
    }
}
