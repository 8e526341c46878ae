//! Gallery engine: one balancer, one viewport controller, one selection
//!
//! Hosts feed it items, viewport samples and user input; it hands back
//! tile geometry, transition plans, and selection notifications through the
//! [`SelectionHost`].

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::gallery::{ensure_unique_ids, Item};
use crate::layout::{
    self, BreakpointTable, MasonryLayout, TransitionPlan, ViewportController, ViewportMetrics,
    ViewportObserver, ViewportSample,
};
use crate::selection::{
    direct_select, keyboard_command, resolve_key, DeepLinkSync, NavCommand, NavKey, Selection,
    SelectionChange, SelectionHost, SelectionState, SwipeTracker, DEFAULT_SWIPE_THRESHOLD,
};

/// Card chrome / action styling; the behaviour is identical for every variant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GalleryVariant {
    #[default]
    Standard,
    Fusion,
}

/// Colour-scheme hint passed through to renderers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub breakpoints: BreakpointTable,
    pub swipe_threshold: f64,
    /// Deep-link key supplied by the host at mount time
    pub initial_key: Option<String>,
    pub variant: GalleryVariant,
    pub theme_mode: ThemeMode,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            breakpoints: BreakpointTable::default(),
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            initial_key: None,
            variant: GalleryVariant::default(),
            theme_mode: ThemeMode::default(),
        }
    }
}

impl EngineOptions {
    pub fn from_config(config: &crate::AppConfig) -> Self {
        Self {
            breakpoints: BreakpointTable::new(config.layout.breakpoints.clone()),
            swipe_threshold: config.navigation.swipe_threshold,
            initial_key: None,
            variant: config.ui.variant,
            theme_mode: config.ui.theme.mode,
        }
    }

    pub fn with_initial_key(mut self, key: Option<String>) -> Self {
        self.initial_key = key;
        self
    }
}

/// Which lightbox arrows to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewerControls {
    pub show_previous: bool,
    pub show_next: bool,
}

pub struct GalleryEngine {
    items: Vec<Item>,
    viewport: ViewportController,
    layout: MasonryLayout,
    selection: Selection,
    swipe: SwipeTracker,
    deep_link: DeepLinkSync,
    initial_key: Option<String>,
    variant: GalleryVariant,
    theme_mode: ThemeMode,
}

impl std::fmt::Debug for GalleryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GalleryEngine")
            .field("items", &self.items.len())
            .field("metrics", &self.viewport.metrics())
            .field("selection", &self.selection.state())
            .finish_non_exhaustive()
    }
}

fn check_ids(items: &[Item]) {
    if let Err(e) = ensure_unique_ids(items) {
        debug_assert!(false, "gallery items must have unique ids: {}", e);
        error!("{}", e);
    }
}

impl GalleryEngine {
    pub fn new(items: Vec<Item>, options: EngineOptions, host: Box<dyn SelectionHost>) -> Self {
        check_ids(&items);
        let len = items.len();
        Self {
            items,
            viewport: ViewportController::new(options.breakpoints),
            layout: MasonryLayout::default(),
            selection: Selection::new(len),
            swipe: SwipeTracker::new(options.swipe_threshold),
            deep_link: DeepLinkSync::new(host),
            initial_key: options.initial_key,
            variant: options.variant,
            theme_mode: options.theme_mode,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn layout(&self) -> &MasonryLayout {
        &self.layout
    }

    pub fn metrics(&self) -> Option<ViewportMetrics> {
        self.viewport.metrics()
    }

    pub fn selection(&self) -> SelectionState {
        self.selection.state()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.selection.active_index()
    }

    pub fn active_item(&self) -> Option<&Item> {
        self.active_index().and_then(|i| self.items.get(i))
    }

    pub fn variant(&self) -> GalleryVariant {
        self.variant
    }

    pub fn theme_mode(&self) -> ThemeMode {
        self.theme_mode
    }

    pub fn set_theme_mode(&mut self, mode: ThemeMode) {
        self.theme_mode = mode;
    }

    pub fn is_mounted(&self) -> bool {
        self.viewport.is_mounted()
    }

    /// Arrows are hidden at the list ends and on compact viewports, where
    /// swiping replaces them
    pub fn controls(&self) -> ViewerControls {
        let compact = self.metrics().map(|m| m.compact).unwrap_or(false);
        ViewerControls {
            show_previous: !compact && self.selection.has_previous(),
            show_next: !compact && self.selection.has_next(),
        }
    }

    fn relayout(&mut self) -> TransitionPlan {
        let next = match self.viewport.metrics() {
            Some(metrics) => layout::layout(&self.items, metrics.column_count, metrics.track_width),
            None => MasonryLayout::default(),
        };
        let plan = layout::plan(&self.layout.tiles, &next.tiles);
        debug!(
            tiles = next.tiles.len(),
            columns = next.columns.len(),
            height = next.content_height(),
            "Layout pass"
        );
        self.layout = next;
        plan
    }

    fn commit(&mut self, change: Option<SelectionChange>) -> bool {
        match change {
            Some(change) => {
                self.deep_link.publish(change, &self.items);
                true
            }
            None => false,
        }
    }

    /// Measure, lay out, and apply the initial deep link
    pub fn mount(&mut self, observer: &dyn ViewportObserver) -> TransitionPlan {
        self.viewport.mount(observer);
        let plan = self.relayout();

        if let Some(key) = self.initial_key.take() {
            match resolve_key(&self.items, &key) {
                Some(index) => {
                    let change = self.selection.open_at(index);
                    self.commit(change);
                }
                None => debug!(key = %key, "Initial deep link matched no item"),
            }
        }
        plan
    }

    /// Replace the item list
    ///
    /// An open viewer follows its item by id to the item's new index, and
    /// closes if the item is gone.
    pub fn set_items(&mut self, items: Vec<Item>) -> TransitionPlan {
        check_ids(&items);
        let active_id = self.active_item().map(|item| item.id.clone());
        self.items = items;
        let active = active_id.and_then(|id| self.items.iter().position(|item| item.id == id));
        let change = self.selection.reconcile(self.items.len(), active);
        let plan = self.relayout();
        self.commit(change);
        plan
    }

    pub fn notify_resize(&mut self, sample: ViewportSample) {
        self.viewport.notify_resize(sample);
    }

    /// Animation-frame hook: applies a pending resize
    pub fn on_frame(&mut self) -> Option<TransitionPlan> {
        self.viewport.on_frame()?;
        Some(self.relayout())
    }

    /// Apply a navigation command; returns whether the selection changed
    pub fn dispatch(&mut self, command: NavCommand) -> bool {
        let change = match command {
            NavCommand::Next => self.selection.next(),
            NavCommand::Previous => self.selection.previous(),
            NavCommand::Close => self.selection.close(),
            NavCommand::OpenAt(index) => self.selection.open_at(index),
        };
        self.commit(change)
    }

    pub fn handle_key(&mut self, key: NavKey) -> bool {
        match keyboard_command(key, self.selection.state()) {
            Some(command) => self.dispatch(command),
            None => false,
        }
    }

    /// Tile or thumbnail click
    pub fn select_tile(&mut self, index: usize) -> bool {
        self.dispatch(direct_select(index))
    }

    pub fn touch_start(&mut self, x: f64) {
        if self.selection.is_open() {
            self.swipe.touch_start(x);
        }
    }

    pub fn touch_move(&mut self, x: f64) {
        self.swipe.touch_move(x);
    }

    pub fn touch_end(&mut self) -> bool {
        match self.swipe.touch_end() {
            Some(command) if self.selection.is_open() => self.dispatch(command),
            _ => false,
        }
    }

    /// Stop reacting to resizes and drop any gesture in progress
    pub fn unmount(&mut self) {
        self.viewport.unmount();
        self.swipe.cancel();
    }
}
