use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{info, warn};

use mosaic_core::gallery::manifest;
use mosaic_core::AppConfig;
use mosaic_tui::{
    app::App,
    event::{AppEvent, EventHandler},
    input::handle_key_event,
    keymap::Keymap,
    link::{extract_key, QueryParamLink},
    media::{self, MediaLoadResult},
    widgets::{GalleryWidget, LightboxWidget, StatusBarWidget},
};

pub async fn run(config: Arc<AppConfig>, manifest_path: &Path, link: Option<String>) -> Result<()> {
    let items = manifest::load(manifest_path)
        .with_context(|| format!("Failed to load manifest {}", manifest_path.display()))?;
    info!(items = items.len(), manifest = %manifest_path.display(), "Loaded gallery");

    let param = config.navigation.deep_link_param.clone();
    let query_link = match &config.navigation.base_url {
        Some(base) => Some(
            QueryParamLink::parse(base, param.clone())
                .with_context(|| format!("Invalid navigation.base_url '{}'", base))?,
        ),
        None => None,
    };
    let initial_key = link.as_deref().and_then(|input| extract_key(input, &param));

    let keymap = Keymap::from_config(&config.keymap);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("Mosaic"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(items, config.clone(), query_link, initial_key);
    let size = terminal.size()?;
    app.mount(ratatui::layout::Rect::new(0, 0, size.width, size.height));

    let event_handler = EventHandler::from_config(&config.ui);

    // Channel for async media loading results
    let (media_tx, mut media_rx) = mpsc::unbounded_channel::<MediaLoadResult>();

    let result = run_loop(&mut terminal, &mut app, &keymap, &event_handler, &media_tx, &mut media_rx);

    app.unmount();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Some(url) = app.link_url() {
        println!("{}", url);
    } else if let Some(key) = app.link_key() {
        println!("{}", key);
    }

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    keymap: &Keymap,
    event_handler: &EventHandler,
    media_tx: &mpsc::UnboundedSender<MediaLoadResult>,
    media_rx: &mut mpsc::UnboundedReceiver<MediaLoadResult>,
) -> Result<()> {
    loop {
        // Process any completed media loads (non-blocking)
        while let Ok(result) = media_rx.try_recv() {
            app.media.apply(result);
        }

        for reference in app.media_requests() {
            media::request(&mut app.media, &reference, media_tx);
        }

        app.on_frame();

        terminal.draw(|frame| {
            let size = frame.area();
            if app.is_viewer_open() {
                LightboxWidget::render(frame, size, app);
                return;
            }
            let (gallery, status) = App::areas(size);
            GalleryWidget::render(frame, gallery, app);
            StatusBarWidget::render(frame, status, app);
        })?;

        // Faster polling while tiles are moving
        let event = if app.is_animating() {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };

        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, app.is_viewer_open(), keymap);
                    if let Some(url) = app.handle_action(action) {
                        open_external(app, &url);
                    }
                }
                AppEvent::Mouse(mouse) => app.handle_mouse(mouse),
                AppEvent::Resize(width, height) => app.resize(width, height),
                AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn open_external(app: &mut App, url: &str) {
    if let Err(e) = open::that(url) {
        warn!(url, error = %e, "Failed to open link");
        app.set_status(format!("Failed to open {}: {}", url, e));
    } else {
        app.set_status(format!("Opened {}", url));
    }
}
