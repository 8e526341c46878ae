use image::imageops::FilterType;
use mosaic_core::{GalleryVariant, Item, Media};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use super::halfblock::render_halfblocks;
use super::text::truncate_str;
use crate::app::App;
use crate::theme::Theme;

/// Tiles below this opacity are drawn dimmed
const DIM_BELOW: f64 = 0.5;

pub struct GalleryWidget;

impl GalleryWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        frame.render_widget(Block::default().style(Style::default().bg(theme.bg0)), area);

        if app.engine.items().is_empty() {
            render_message(frame, area, "No items in this gallery", theme);
            return;
        }
        let Some(viewport) = app.viewport else {
            render_message(frame, area, "Measuring…", theme);
            return;
        };
        if app.engine.layout().is_empty() {
            render_message(frame, area, "Not enough room to lay out tiles", theme);
            return;
        }

        for tile in app.animator.frames() {
            let Some(rect) = viewport.project(&tile.rect, area, app.scroll) else {
                continue;
            };
            let dim = tile.opacity < DIM_BELOW;
            match tile.index.and_then(|i| app.engine.items().get(i).map(|item| (i, item))) {
                Some((index, item)) => render_tile(frame, rect, app, item, index == app.focus, dim),
                None => {
                    // Leaving tile, no longer backed by an item
                    let block = Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(theme.grey).add_modifier(Modifier::DIM))
                        .style(Style::default().bg(theme.placeholder));
                    frame.render_widget(block, rect);
                }
            }
        }
    }
}

fn render_tile(frame: &mut Frame, area: Rect, app: &App, item: &Item, focused: bool, dim: bool) {
    let theme = &app.theme;
    let (locale, fallback) = app.locale();
    let title = item.display_title(locale, fallback);

    let mut border_style = Style::default().fg(if focused { theme.accent } else { theme.grey });
    if dim {
        border_style = border_style.add_modifier(Modifier::DIM);
    }
    let title_style = if focused {
        Style::default().fg(theme.fg1).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.fg0)
    };

    let max_title = area.width.saturating_sub(4) as usize;
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .style(Style::default().bg(theme.bg1));

    block = match app.engine.variant() {
        GalleryVariant::Standard => block
            .border_type(BorderType::Rounded)
            .title(Span::styled(truncate_str(&title, max_title), title_style)),
        GalleryVariant::Fusion => {
            let mut block = block
                .border_type(if focused { BorderType::Thick } else { BorderType::Plain })
                .title_bottom(Line::from(Span::styled(truncate_str(&title, max_title), title_style)));
            if item.action_link.is_some() {
                block = block.title(
                    Line::from(Span::styled("↗", Style::default().fg(theme.action))).right_aligned(),
                );
            }
            block
        }
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let preview = item.media.preview_ref();
    let image = preview
        .filter(|_| app.config.ui.show_thumbnails)
        .and_then(|reference| app.media.image(reference));

    match image {
        Some(image) if !dim => render_halfblocks(frame, inner, image, FilterType::Nearest),
        _ => {
            let label = placeholder_label(item, app);
            let color = match preview {
                Some(reference) if app.media.is_failed(reference) => theme.error,
                _ => theme.grey,
            };
            frame.render_widget(
                Block::default().style(Style::default().bg(theme.placeholder)),
                inner,
            );
            let line = Line::from(Span::styled(
                truncate_str(&label, inner.width as usize),
                Style::default().fg(color).add_modifier(Modifier::ITALIC),
            ));
            let y = inner.y + inner.height / 2;
            frame.render_widget(
                Paragraph::new(line).alignment(Alignment::Center),
                Rect::new(inner.x, y, inner.width, 1),
            );
        }
    }
}

fn placeholder_label(item: &Item, app: &App) -> String {
    let kind = item.media.kind().label();
    match &item.media {
        Media::Missing(_) => format!("{} unavailable", kind),
        Media::Video { .. } => format!("▶ {}", kind),
        Media::EmbeddedScene { .. } => format!("◆ {}", kind),
        Media::Image { src } => app
            .media
            .status_text(src)
            .filter(|_| app.config.ui.show_thumbnails)
            .unwrap_or_else(|| kind.to_string()),
    }
}

fn render_message(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let line = Line::from(Span::styled(
        message,
        Style::default().fg(theme.grey).add_modifier(Modifier::ITALIC),
    ));
    let y = area.y + area.height / 2;
    frame.render_widget(
        Paragraph::new(line).alignment(Alignment::Center),
        Rect::new(area.x, y, area.width, 1.min(area.height)),
    );
}
