//! TUI application state.

use std::collections::VecDeque;

use crate::topology::layout::{TreeLayout, compute_layout};
use crate::watcher::Scene;

/// A consumed scene plus its computed grid layout.
#[derive(Debug, Clone)]
pub struct SceneEntry {
    pub scene: Scene,
    pub layout: Option<TreeLayout>,
}

/// State shared between input handling and rendering.
///
/// Scenes live in a bounded ring: snapshots arriving faster than a human
/// can watch stay inspectable by pausing and stepping backwards, and the
/// oldest fall off the front.
pub struct AppState {
    scenes: VecDeque<SceneEntry>,
    capacity: usize,
    /// Index of the scene on screen.
    cursor: usize,
    /// When true, the cursor jumps to each newly arrived scene.
    pub follow: bool,
    /// When true, ticks stop consuming new files.
    pub paused: bool,
    pub show_help: bool,
    /// Total names consumed by the watcher, for the header.
    pub processed_total: usize,
    /// Shown while waiting for the first snapshot.
    pub dir_label: String,
}

impl AppState {
    pub fn new(capacity: usize, dir_label: impl Into<String>) -> Self {
        Self {
            scenes: VecDeque::new(),
            capacity: capacity.max(1),
            cursor: 0,
            follow: true,
            paused: false,
            show_help: false,
            processed_total: 0,
            dir_label: dir_label.into(),
        }
    }

    /// Appends a freshly consumed scene, evicting the oldest past capacity.
    pub fn push_scene(&mut self, scene: Scene) {
        let layout = scene.graph.as_ref().map(compute_layout);
        self.scenes.push_back(SceneEntry { scene, layout });

        if self.scenes.len() > self.capacity {
            self.scenes.pop_front();
            self.cursor = self.cursor.saturating_sub(1);
        }
        if self.follow {
            self.cursor = self.scenes.len() - 1;
        }
    }

    pub fn current(&self) -> Option<&SceneEntry> {
        self.scenes.get(self.cursor)
    }

    /// Cursor position as (1-based index, total), for the header.
    pub fn cursor_info(&self) -> (usize, usize) {
        if self.scenes.is_empty() {
            (0, 0)
        } else {
            (self.cursor + 1, self.scenes.len())
        }
    }

    /// Steps to the previous retained scene and stops following.
    pub fn rewind(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
        self.follow = false;
    }

    /// Steps toward the newest retained scene; reaching it resumes follow.
    pub fn advance(&mut self) {
        if self.cursor + 1 < self.scenes.len() {
            self.cursor += 1;
        }
        if self.cursor + 1 == self.scenes.len() {
            self.follow = true;
        }
    }

    /// Jumps to the newest scene and resumes following.
    pub fn latest(&mut self) {
        if !self.scenes.is_empty() {
            self.cursor = self.scenes.len() - 1;
        }
        self.follow = true;
    }
}
