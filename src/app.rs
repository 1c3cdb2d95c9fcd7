use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::{self, DeviceApi, DownloadResult, LoadOutcome};
use crate::event::Event;
use crate::explorer::controller::{Action, Effect, ExplorerState, Notice, Patch};
use crate::explorer::render::{render, Arrow, Row, VisualTree};
use crate::explorer::tree::NodeKind;
use crate::theme::ThemeColors;

/// Width of one indentation guide in the tree widget.
pub const GUIDE_WIDTH: u16 = 3;
/// Width of the expand/collapse slot in the tree widget.
pub const ARROW_WIDTH: u16 = 2;

/// How long a status message stays visible.
const STATUS_TTL_SECS: u64 = 3;

/// Construction options derived from config and CLI.
pub struct AppOptions {
    pub device_label: String,
    pub download_dir: PathBuf,
    pub use_icons: bool,
    pub theme: ThemeColors,
}

/// Main application state.
pub struct App {
    pub explorer: ExplorerState,
    pub visual: VisualTree,
    /// Index into the visible rows.
    pub cursor: usize,
    pub scroll_offset: usize,
    pub should_quit: bool,
    pub status_message: Option<(Notice, Instant)>,
    pub device_label: String,
    pub use_icons: bool,
    pub theme: ThemeColors,
    /// Inner area of the tree panel from the last draw, for mouse hits.
    pub tree_area: Rect,
    download_dir: PathBuf,
    api: Arc<dyn DeviceApi>,
    event_tx: mpsc::UnboundedSender<Event>,
}

impl App {
    pub fn new(
        api: Arc<dyn DeviceApi>,
        options: AppOptions,
        event_tx: mpsc::UnboundedSender<Event>,
    ) -> Self {
        Self {
            explorer: ExplorerState::new(),
            visual: VisualTree::Empty,
            cursor: 0,
            scroll_offset: 0,
            should_quit: false,
            status_message: None,
            device_label: options.device_label,
            use_icons: options.use_icons,
            theme: options.theme,
            tree_area: Rect::default(),
            download_dir: options.download_dir,
            api,
            event_tx,
        }
    }

    /// Kick off the initial load.
    pub fn init(&mut self) {
        self.dispatch(Action::BeginLoad);
    }

    /// Run an action through the controller and apply its results.
    pub fn dispatch(&mut self, action: Action) {
        let transition = self.explorer.dispatch(action);
        self.apply_patch(transition.patch);
        if let Some(notice) = transition.notice {
            self.set_status_message(notice);
        }
        if let Some(effect) = transition.effect {
            self.run_effect(effect);
        }
    }

    fn apply_patch(&mut self, patch: Patch) {
        match patch {
            Patch::None => {}
            Patch::Full => self.rerender(),
            Patch::Node { path, expanded } => {
                if self.visual.set_expanded(&path, expanded) {
                    self.sync_cursor();
                } else {
                    self.rerender();
                }
            }
            Patch::Selection { previous, current } => {
                self.visual.set_selected(previous.as_deref(), &current);
                if let Some(idx) = self.row_index(&current) {
                    self.cursor = idx;
                }
            }
        }
    }

    fn rerender(&mut self) {
        self.visual = render(self.explorer.tree(), self.explorer.selected());
        self.sync_cursor();
    }

    /// Keep the cursor on the selected row, or at least inside the list.
    fn sync_cursor(&mut self) {
        if let Some(idx) = self.explorer.selected().and_then(|p| self.row_index(p)) {
            self.cursor = idx;
            return;
        }
        let len = self.visual.visible_rows().len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }

    fn row_index(&self, path: &str) -> Option<usize> {
        self.visual
            .visible_rows()
            .iter()
            .position(|row| row.path == path)
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Fetch => {
                let api = Arc::clone(&self.api);
                let tx = self.event_tx.clone();
                tokio::task::spawn_blocking(move || {
                    let outcome = api::fetch_snapshot(api.as_ref());
                    let _ = tx.send(Event::Loaded(outcome));
                });
            }
            Effect::Download { path, endpoint } => {
                debug!(%path, %endpoint, "starting download");
                let api = Arc::clone(&self.api);
                let tx = self.event_tx.clone();
                let dir = self.download_dir.clone();
                tokio::task::spawn_blocking(move || {
                    let result = api.download(&path, &dir).map_err(|e| e.to_string());
                    let _ = tx.send(Event::DownloadFinished(result));
                });
            }
        }
    }

    /// Apply a finished load or refresh.
    pub fn handle_loaded(&mut self, outcome: LoadOutcome) {
        self.dispatch(Action::Loaded(outcome));
    }

    /// Report a finished download.
    pub fn handle_download_finished(&mut self, result: DownloadResult) {
        match result {
            Ok(path) => {
                self.set_status_message(Notice::Success(format!("Saved {}", path.display())))
            }
            Err(e) => {
                warn!(error = %e, "download failed");
                self.set_status_message(Notice::Error(format!("Download failed: {}", e)));
            }
        }
    }

    /// Tree keys and clicks only apply while the tree is on screen.
    pub fn interactive(&self) -> bool {
        self.explorer.is_interactive()
    }

    /// The row under the cursor, if the tree is on screen.
    pub fn current_row(&self) -> Option<&Row> {
        if !self.interactive() {
            return None;
        }
        self.visual.visible_rows().get(self.cursor).copied()
    }

    fn current_path(&self) -> Option<String> {
        self.current_row().map(|row| row.path.clone())
    }

    fn select_index(&mut self, idx: usize) {
        if !self.interactive() {
            return;
        }
        let path = self
            .visual
            .visible_rows()
            .get(idx)
            .map(|row| row.path.clone());
        if let Some(path) = path {
            self.cursor = idx;
            self.dispatch(Action::Select(path));
        }
    }

    /// Move selection down by one row.
    pub fn select_next(&mut self) {
        let len = self.visual.visible_rows().len();
        if len == 0 {
            return;
        }
        let next = if self.explorer.selected().is_none() {
            self.cursor
        } else {
            (self.cursor + 1).min(len - 1)
        };
        self.select_index(next);
    }

    /// Move selection up by one row.
    pub fn select_previous(&mut self) {
        self.select_index(self.cursor.saturating_sub(1));
    }

    /// Jump to the first row.
    pub fn select_first(&mut self) {
        self.select_index(0);
    }

    /// Jump to the last row.
    pub fn select_last(&mut self) {
        let len = self.visual.visible_rows().len();
        if len > 0 {
            self.select_index(len - 1);
        }
    }

    /// Toggle the folder under the cursor.
    pub fn toggle_current(&mut self) {
        if let Some(path) = self.current_path() {
            self.dispatch(Action::Toggle(path));
        }
    }

    /// Expand the folder under the cursor if it is collapsed.
    pub fn expand_current(&mut self) {
        if let Some(row) = self.current_row() {
            if row.arrow == Arrow::Collapsed {
                let path = row.path.clone();
                self.dispatch(Action::Toggle(path));
            }
        }
    }

    /// Collapse the folder under the cursor, or jump to its parent.
    pub fn collapse_current(&mut self) {
        let Some(row) = self.current_row() else {
            return;
        };
        if row.arrow == Arrow::Expanded {
            let path = row.path.clone();
            self.dispatch(Action::Toggle(path));
            return;
        }
        let parent = match row.path.rsplit_once('/') {
            Some((parent, _)) if !parent.is_empty() => parent.to_string(),
            _ => return,
        };
        if let Some(idx) = self.row_index(&parent) {
            self.select_index(idx);
        }
    }

    /// Download the file under the cursor.
    pub fn download_current(&mut self) {
        if !self.interactive() {
            return;
        }
        let file_path = self
            .current_row()
            .filter(|row| row.kind == NodeKind::File)
            .map(|row| row.path.clone());
        match file_path {
            Some(path) => self.dispatch(Action::Download(path)),
            None => self.set_status_message(Notice::Info("Select a file to download".into())),
        }
    }

    pub fn expand_all(&mut self) {
        self.dispatch(Action::ExpandAll);
    }

    pub fn collapse_all(&mut self) {
        self.dispatch(Action::CollapseAll);
    }

    /// Refetch everything. Ignored while a load is running.
    pub fn refresh(&mut self) {
        self.dispatch(Action::Refresh);
    }

    /// Handle a click at a position relative to the tree panel's inner area.
    ///
    /// A click on a folder's arrow slot toggles it; anywhere else on a row
    /// selects it.
    pub fn click(&mut self, column: u16, row: u16) {
        if !self.interactive() {
            return;
        }
        let idx = self.scroll_offset + row as usize;
        let Some((path, on_arrow)) = self.visual.visible_rows().get(idx).map(|r| {
            let arrow_start = r.depth as u16 * GUIDE_WIDTH;
            let on_arrow = column >= arrow_start && column < arrow_start + ARROW_WIDTH;
            (r.path.clone(), on_arrow && r.kind == NodeKind::Folder)
        }) else {
            return;
        };

        self.select_index(idx);
        if on_arrow {
            self.dispatch(Action::Toggle(path));
        }
    }

    /// Update the scroll offset to ensure the cursor row is visible.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + visible_height {
            self.scroll_offset = self.cursor - visible_height + 1;
        }
    }

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, notice: Notice) {
        self.status_message = Some((notice, Instant::now()));
    }

    /// Clear the status message once it has been displayed long enough.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, ref created)) = self.status_message {
            if created.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
            }
        }
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}
