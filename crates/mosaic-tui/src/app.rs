use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use mosaic_core::layout::{GridItem, ViewportObserver};
use mosaic_core::selection::{NavCommand, SelectionHost};
use mosaic_core::{AppConfig, EngineOptions, GalleryEngine, Item, ThemeMode};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use tracing::debug;
use url::Url;

use crate::animation::timing::to_cells;
use crate::animation::TileAnimator;
use crate::input::Action;
use crate::link::QueryParamLink;
use crate::media::MediaCache;
use crate::theme::Theme;
use crate::themes;
use crate::viewport::TerminalViewport;

/// Neighbours of the active item whose previews are fetched ahead of time
const PRELOAD_RANGE: usize = 2;
/// Rows scrolled per mouse wheel step
const WHEEL_ROWS: u16 = 3;

/// What the host has been told about the selection
#[derive(Debug, Default)]
pub struct LinkState {
    /// External key of the open item
    pub key: Option<String>,
    /// Host URL carrying the key, when a base URL is configured
    pub url: Option<Url>,
    /// Grid scrolling is locked while the viewer is open
    pub viewer_open: bool,
    link: Option<QueryParamLink>,
}

/// Selection host handed to the engine; shares its state with [`App`]
pub struct LinkRecorder(Rc<RefCell<LinkState>>);

impl SelectionHost for LinkRecorder {
    fn on_selection_change(&mut self, is_open: bool, key: Option<&str>) {
        let state = &mut *self.0.borrow_mut();
        state.key = key.map(str::to_string);
        state.url = state.link.as_ref().map(|link| link.key_to_url(key));
        debug!(is_open, key, "Deep link updated");
    }

    fn on_viewer_open_change(&mut self, open: bool) {
        self.0.borrow_mut().viewer_open = open;
    }
}

/// Clickable regions of the lightbox from the last frame
#[derive(Debug, Default, Clone)]
pub struct LightboxHits {
    pub previous: Option<Rect>,
    pub next: Option<Rect>,
    pub close: Option<Rect>,
    pub thumbnails: Vec<(Rect, usize)>,
}

impl LightboxHits {
    fn command_at(&self, column: u16, row: u16) -> Option<NavCommand> {
        let hit = |rect: &Rect| {
            column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
        };
        if self.previous.as_ref().is_some_and(hit) {
            return Some(NavCommand::Previous);
        }
        if self.next.as_ref().is_some_and(hit) {
            return Some(NavCommand::Next);
        }
        if self.close.as_ref().is_some_and(hit) {
            return Some(NavCommand::Close);
        }
        self.thumbnails
            .iter()
            .find(|(rect, _)| hit(rect))
            .map(|(_, index)| NavCommand::OpenAt(*index))
    }
}

/// Application state
pub struct App {
    pub config: Arc<AppConfig>,
    pub theme: Theme,
    pub engine: GalleryEngine,
    pub animator: TileAnimator,
    pub media: MediaCache,
    /// Focused tile (item index) on the grid
    pub focus: usize,
    /// Grid scroll offset in rows
    pub scroll: u16,
    pub viewport: Option<TerminalViewport>,
    pub gallery_area: Rect,
    pub lightbox_hits: LightboxHits,
    pub status_message: Option<String>,
    pub should_quit: bool,
    link_state: Rc<RefCell<LinkState>>,
}

impl App {
    pub fn new(
        items: Vec<Item>,
        config: Arc<AppConfig>,
        link: Option<QueryParamLink>,
        initial_key: Option<String>,
    ) -> Self {
        let link_state = Rc::new(RefCell::new(LinkState {
            link,
            ..LinkState::default()
        }));
        let options = EngineOptions::from_config(&config).with_initial_key(initial_key);
        let engine = GalleryEngine::new(items, options, Box::new(LinkRecorder(link_state.clone())));

        Self {
            theme: themes::load_theme(&config.ui.theme),
            animator: TileAnimator::new(config.ui.transition.clone()),
            config,
            engine,
            media: MediaCache::new(),
            focus: 0,
            scroll: 0,
            viewport: None,
            gallery_area: Rect::default(),
            lightbox_hits: LightboxHits::default(),
            status_message: None,
            should_quit: false,
            link_state,
        }
    }

    /// Split the terminal into gallery and status bar
    pub fn areas(size: Rect) -> (Rect, Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(size);
        (chunks[0], chunks[1])
    }

    fn measure(&mut self, size: Rect) -> TerminalViewport {
        let (gallery, _) = Self::areas(size);
        self.gallery_area = gallery;
        let viewport = TerminalViewport::new(
            size.width,
            gallery.width,
            self.config.layout.cell_width,
            self.config.layout.cell_height,
        );
        self.viewport = Some(viewport);
        viewport
    }

    /// First layout pass for a terminal of `size`
    pub fn mount(&mut self, size: Rect) {
        let viewport = self.measure(size);
        let plan = self.engine.mount(&viewport);
        self.animator.apply(plan, &self.engine.layout().tiles);
        if let Some(index) = self.engine.active_index() {
            self.focus = index;
        }
        self.ensure_focus_visible();
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        let viewport = self.measure(Rect::new(0, 0, width, height));
        self.engine.notify_resize(viewport.measure());
    }

    /// Per-frame work: pending relayout and animation progress
    pub fn on_frame(&mut self) {
        if let Some(plan) = self.engine.on_frame() {
            self.animator.apply(plan, &self.engine.layout().tiles);
            self.ensure_focus_visible();
        }
        self.animator.update();
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    pub fn unmount(&mut self) {
        self.engine.unmount();
        self.animator.cancel();
    }

    pub fn is_viewer_open(&self) -> bool {
        self.engine.selection().is_open()
    }

    /// Current deep-link key and URL
    pub fn link_key(&self) -> Option<String> {
        self.link_state.borrow().key.clone()
    }

    pub fn link_url(&self) -> Option<Url> {
        self.link_state.borrow().url.clone()
    }

    pub fn locale(&self) -> (&str, &str) {
        (&self.config.general.locale, &self.config.general.fallback_locale)
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn set_theme_mode(&mut self, mode: ThemeMode) {
        self.engine.set_theme_mode(mode);
        self.theme = themes::load_theme_for(mode, &self.config.ui.theme.colors);
    }

    pub fn toggle_theme(&mut self) {
        let next = match self.engine.theme_mode() {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        };
        self.set_theme_mode(next);
    }

    /// Apply an action; returns a URL the caller should open externally
    pub fn handle_action(&mut self, action: Action) -> Option<String> {
        match action {
            Action::Quit => self.should_quit = true,
            Action::FocusLeft => self.move_focus_horizontal(-1),
            Action::FocusRight => self.move_focus_horizontal(1),
            Action::FocusUp => self.move_focus_vertical(false),
            Action::FocusDown => self.move_focus_vertical(true),
            Action::JumpToFirst => self.set_focus(0),
            Action::JumpToLast => self.set_focus(self.engine.items().len().saturating_sub(1)),
            Action::Open => {
                let changed = self.engine.select_tile(self.focus);
                self.after_selection(changed);
            }
            Action::Close => self.dispatch(NavCommand::Close),
            Action::Next => self.dispatch(NavCommand::Next),
            Action::Previous => self.dispatch(NavCommand::Previous),
            Action::Viewer(key) => {
                let changed = self.engine.handle_key(key);
                self.after_selection(changed);
            }
            Action::OpenAction => return self.action_link(),
            Action::OpenDocument(n) => return self.document_link(n),
            Action::ToggleTheme => self.toggle_theme(),
            Action::None => {}
        }
        None
    }

    fn dispatch(&mut self, command: NavCommand) {
        let changed = self.engine.dispatch(command);
        self.after_selection(changed);
    }

    fn after_selection(&mut self, changed: bool) {
        if !changed {
            return;
        }
        self.clear_status();
        self.lightbox_hits = LightboxHits::default();
        if let Some(index) = self.engine.active_index() {
            self.focus = index;
            self.ensure_focus_visible();
        }
    }

    fn action_link(&mut self) -> Option<String> {
        let url = self
            .engine
            .active_item()
            .and_then(|item| item.action_link.as_ref())
            .map(|action| action.url.clone());
        if url.is_none() {
            self.set_status("No action link for this item");
        }
        url
    }

    fn document_link(&mut self, n: usize) -> Option<String> {
        let url = self
            .engine
            .active_item()
            .and_then(|item| item.document_links.get(n))
            .map(|doc| doc.url.clone());
        if url.is_none() {
            self.set_status(format!("No document #{}", n + 1));
        }
        url
    }

    // Grid focus

    fn tile(&self, index: usize) -> Option<&GridItem> {
        self.engine.layout().tiles.iter().find(|tile| tile.index == index)
    }

    fn set_focus(&mut self, index: usize) {
        if index < self.engine.items().len() {
            self.focus = index;
            self.ensure_focus_visible();
        }
    }

    fn move_focus_vertical(&mut self, down: bool) {
        let Some(current) = self.tile(self.focus) else { return };
        let (column, y) = (current.column, current.rect.y);
        let tiles = &self.engine.layout().tiles;
        let target = if down {
            tiles
                .iter()
                .filter(|t| t.column == column && t.rect.y > y)
                .min_by(|a, b| a.rect.y.total_cmp(&b.rect.y))
        } else {
            tiles
                .iter()
                .filter(|t| t.column == column && t.rect.y < y)
                .max_by(|a, b| a.rect.y.total_cmp(&b.rect.y))
        };
        if let Some(index) = target.map(|t| t.index) {
            self.set_focus(index);
        }
    }

    fn move_focus_horizontal(&mut self, step: isize) {
        let Some(current) = self.tile(self.focus) else { return };
        let Some(column) = current.column.checked_add_signed(step) else { return };
        let center = current.rect.y + current.rect.height / 2.0;
        let target = self
            .engine
            .layout()
            .tiles
            .iter()
            .filter(|t| t.column == column)
            .min_by(|a, b| {
                let da = (a.rect.y + a.rect.height / 2.0 - center).abs();
                let db = (b.rect.y + b.rect.height / 2.0 - center).abs();
                da.total_cmp(&db)
            })
            .map(|t| t.index);
        if let Some(index) = target {
            self.set_focus(index);
        }
    }

    fn max_scroll(&self) -> u16 {
        let Some(viewport) = self.viewport else { return 0 };
        let content = to_cells(self.engine.layout().content_height(), viewport.cell_height);
        content.saturating_sub(self.gallery_area.height)
    }

    fn ensure_focus_visible(&mut self) {
        let (Some(viewport), Some(tile)) = (self.viewport, self.tile(self.focus)) else {
            return;
        };
        let top = to_cells(tile.rect.y, viewport.cell_height);
        let bottom = to_cells(tile.rect.bottom(), viewport.cell_height);
        let height = self.gallery_area.height;

        if top < self.scroll {
            self.scroll = top;
        } else if bottom > self.scroll.saturating_add(height) {
            self.scroll = bottom.saturating_sub(height).min(top);
        }
        self.scroll = self.scroll.min(self.max_scroll());
    }

    pub fn scroll_by(&mut self, rows: i32) {
        if self.link_state.borrow().viewer_open {
            return;
        }
        let next = (self.scroll as i32 + rows).clamp(0, self.max_scroll() as i32);
        self.scroll = next as u16;
    }

    // Mouse

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.is_viewer_open() {
                    self.press_in_viewer(mouse.column, mouse.row);
                } else {
                    self.click_grid(mouse.column, mouse.row);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(viewport) = self.viewport {
                    self.engine.touch_move(viewport.units_x(mouse.column));
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let changed = self.engine.touch_end();
                self.after_selection(changed);
            }
            MouseEventKind::ScrollDown => self.scroll_by(WHEEL_ROWS as i32),
            MouseEventKind::ScrollUp => self.scroll_by(-(WHEEL_ROWS as i32)),
            _ => {}
        }
    }

    fn press_in_viewer(&mut self, column: u16, row: u16) {
        if let Some(command) = self.lightbox_hits.command_at(column, row) {
            self.dispatch(command);
            return;
        }
        if let Some(viewport) = self.viewport {
            self.engine.touch_start(viewport.units_x(column));
        }
    }

    fn click_grid(&mut self, column: u16, row: u16) {
        let Some(viewport) = self.viewport else { return };
        let Some((x, y)) = viewport.cell_to_units(column, row, self.gallery_area, self.scroll) else {
            return;
        };
        let Some(index) = self.engine.layout().hit_test(x, y).map(|t| t.index) else {
            return;
        };
        self.focus = index;
        let changed = self.engine.select_tile(index);
        self.after_selection(changed);
    }

    // Media

    /// Preview references that should be fetched now and are not cached yet
    pub fn media_requests(&self) -> Vec<String> {
        let items = self.engine.items();
        let mut wanted: Vec<&str> = Vec::new();

        match self.engine.active_index() {
            Some(active) => {
                if self.config.ui.media_preview {
                    wanted.extend(items.get(active).and_then(|i| i.media.preview_ref()));
                }
                if self.config.ui.show_thumbnails {
                    let start = active.saturating_sub(PRELOAD_RANGE);
                    let end = (active + PRELOAD_RANGE + 1).min(items.len());
                    wanted.extend(items[start..end].iter().filter_map(|i| i.media.preview_ref()));
                }
            }
            None if self.config.ui.show_thumbnails => {
                if let Some(viewport) = self.viewport {
                    for tile in &self.engine.layout().tiles {
                        if viewport.project(&tile.rect, self.gallery_area, self.scroll).is_some() {
                            wanted.extend(items.get(tile.index).and_then(|i| i.media.preview_ref()));
                        }
                    }
                }
            }
            None => {}
        }

        let mut requests: Vec<String> = Vec::new();
        for reference in wanted {
            if self.media.get(reference).is_none() && !requests.iter().any(|r| r == reference) {
                requests.push(reference.to_string());
            }
        }
        requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use mosaic_core::gallery::{ActionLink, DocumentLink};
    use mosaic_core::selection::NavKey;

    fn items(n: usize) -> Vec<Item> {
        (0..n)
            .map(|i| {
                Item::image(format!("tile-{}", i), 400.0 + 200.0 * (i % 3) as f64, format!("img/{}.png", i))
                    .with_title(format!("Tile {}", i).as_str())
            })
            .collect()
    }

    fn app(n: usize, key: Option<&str>) -> App {
        let link = QueryParamLink::parse("https://studio.example/work", "item").unwrap();
        let mut app = App::new(items(n), Arc::new(AppConfig::default()), Some(link), key.map(str::to_string));
        // 130 cols => 1040 units => 4 columns
        app.mount(Rect::new(0, 0, 130, 41));
        app
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_mount_measures_terminal() {
        let app = app(8, None);
        assert_eq!(app.engine.layout().columns.len(), 4);
        assert_eq!(app.gallery_area, Rect::new(0, 0, 130, 40));
        assert!(!app.is_viewer_open());
    }

    #[test]
    fn test_open_updates_link_and_locks_scroll() {
        let mut app = app(8, None);
        app.handle_action(Action::FocusRight);
        app.handle_action(Action::Open);
        assert!(app.is_viewer_open());
        assert_eq!(app.link_key().as_deref(), Some("tile-1"));
        assert_eq!(
            app.link_url().map(|u| u.to_string()).as_deref(),
            Some("https://studio.example/work?item=tile-1")
        );

        let before = app.scroll;
        app.scroll_by(10);
        assert_eq!(app.scroll, before);

        app.handle_action(Action::Viewer(NavKey::Escape));
        assert_eq!(app.link_key(), None);
        assert_eq!(
            app.link_url().map(|u| u.to_string()).as_deref(),
            Some("https://studio.example/work")
        );
    }

    #[test]
    fn test_initial_key_opens_viewer_and_focuses() {
        let app = app(8, Some("tile-5"));
        assert_eq!(app.engine.active_index(), Some(5));
        assert_eq!(app.focus, 5);
    }

    #[test]
    fn test_viewer_navigation_moves_focus() {
        let mut app = app(4, None);
        app.handle_action(Action::Open);
        app.handle_action(Action::Viewer(NavKey::ArrowRight));
        app.handle_action(Action::Next);
        assert_eq!(app.engine.active_index(), Some(2));
        assert_eq!(app.focus, 2);
        app.handle_action(Action::Close);
        assert!(!app.is_viewer_open());
        assert_eq!(app.focus, 2);
    }

    #[test]
    fn test_grid_focus_moves_between_columns() {
        let mut app = app(8, None);
        app.handle_action(Action::FocusRight);
        assert_eq!(app.focus, 1);
        app.handle_action(Action::FocusLeft);
        assert_eq!(app.focus, 0);
        app.handle_action(Action::FocusLeft);
        assert_eq!(app.focus, 0);

        app.handle_action(Action::FocusDown);
        let below = app.focus;
        assert_ne!(below, 0);
        assert_eq!(app.tile(below).map(|t| t.column), Some(0));
        app.handle_action(Action::FocusUp);
        assert_eq!(app.focus, 0);

        app.handle_action(Action::JumpToLast);
        assert_eq!(app.focus, 7);
    }

    #[test]
    fn test_click_tile_opens_viewer() {
        let mut app = app(8, None);
        // second column spans 260..520 units
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 40, 2));
        assert_eq!(app.engine.active_index(), Some(1));
    }

    #[test]
    fn test_drag_swipes_in_viewer() {
        let mut app = app(8, None);
        app.handle_action(Action::Open);

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 60, 20));
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 50, 20));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 50, 20));
        assert_eq!(app.engine.active_index(), Some(1));

        // 6 cells = 48 units, below the threshold
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 50, 20));
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 56, 20));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 56, 20));
        assert_eq!(app.engine.active_index(), Some(1));
    }

    #[test]
    fn test_thumbnail_hit_selects() {
        let mut app = app(8, None);
        app.handle_action(Action::Open);
        app.lightbox_hits.thumbnails = vec![(Rect::new(10, 38, 6, 2), 6)];
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 12, 39));
        assert_eq!(app.engine.active_index(), Some(6));
    }

    #[test]
    fn test_links_and_documents() {
        let mut list = items(2);
        list[0].action_link = Some(ActionLink {
            url: "https://studio.example/contact".into(),
            label: "Get in touch".into(),
        });
        list[0].document_links.push(DocumentLink {
            display_name: "Case study".into(),
            url: "https://studio.example/case.pdf".into(),
        });
        let mut app = App::new(list, Arc::new(AppConfig::default()), None, None);
        app.mount(Rect::new(0, 0, 130, 41));

        app.handle_action(Action::Open);
        assert_eq!(
            app.handle_action(Action::OpenAction).as_deref(),
            Some("https://studio.example/contact")
        );
        assert_eq!(
            app.handle_action(Action::OpenDocument(0)).as_deref(),
            Some("https://studio.example/case.pdf")
        );
        assert_eq!(app.handle_action(Action::OpenDocument(3)), None);
        assert!(app.status_message.is_some());

        app.handle_action(Action::Next);
        assert_eq!(app.handle_action(Action::OpenAction), None);
        assert_eq!(app.link_url(), None);
    }

    #[test]
    fn test_media_requests_follow_selection() {
        let mut app = app(8, None);
        let grid = app.media_requests();
        assert!(grid.contains(&"img/0.png".to_string()));

        app.handle_action(Action::JumpToLast);
        app.handle_action(Action::Open);
        let viewer = app.media_requests();
        assert_eq!(viewer.first().map(String::as_str), Some("img/7.png"));
        assert!(viewer.contains(&"img/5.png".to_string()));
        assert!(!viewer.contains(&"img/4.png".to_string()));

        app.media.start_loading("img/7.png");
        assert!(!app.media_requests().contains(&"img/7.png".to_string()));
    }

    #[test]
    fn test_resize_relayouts_on_next_frame() {
        let mut app = app(8, None);
        app.resize(70, 30);
        assert_eq!(app.engine.layout().columns.len(), 4);
        app.on_frame();
        assert_eq!(app.engine.layout().columns.len(), 1);
        assert!(app.is_animating());
        app.unmount();
        assert!(!app.is_animating());
    }

    #[test]
    fn test_toggle_theme() {
        let mut app = app(1, None);
        let dark = app.theme.clone();
        app.handle_action(Action::ToggleTheme);
        assert_eq!(app.engine.theme_mode(), ThemeMode::Light);
        assert_ne!(app.theme, dark);
    }
}
