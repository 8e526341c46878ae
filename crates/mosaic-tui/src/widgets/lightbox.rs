use image::imageops::FilterType;
use mosaic_core::{GalleryVariant, Item, Media};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use super::halfblock::render_halfblocks;
use super::text::{truncate_str, wrap_text_unicode};
use crate::app::{App, LightboxHits};
use crate::theme::Theme;

/// Width of a thumbnail cell including its gap
const THUMB_SLOT: u16 = 9;
const THUMB_HEIGHT: u16 = 3;
/// Width of the previous / next control columns
const CONTROL_WIDTH: u16 = 3;
/// Description rows shown under the media
const DESCRIPTION_ROWS: usize = 4;

pub struct LightboxWidget;

impl LightboxWidget {
    /// Render the fullscreen viewer for the active item and record its
    /// clickable regions on the app
    pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
        let mut hits = LightboxHits::default();
        frame.render_widget(Block::default().style(Style::default().bg(app.theme.bg0)), area);

        let active = app
            .engine
            .active_index()
            .filter(|index| *index < app.engine.items().len());
        let Some(index) = active else {
            app.lightbox_hits = hits;
            return;
        };
        let app_ref: &App = app;
        let item = &app_ref.engine.items()[index];
        let theme = &app_ref.theme;
        let (locale, fallback) = app_ref.locale();

        let description = item
            .description
            .as_ref()
            .and_then(|d| d.resolve(locale, fallback))
            .map(|d| wrap_text_unicode(d, area.width.saturating_sub(4) as usize))
            .unwrap_or_default();
        let description_rows = description.len().min(DESCRIPTION_ROWS) as u16;
        let link_rows = u16::from(!item.document_links.is_empty()) + u16::from(item.action_link.is_some());
        let info_height = description_rows + link_rows;
        let thumbs_height = if app_ref.config.ui.show_thumbnails { THUMB_HEIGHT } else { 0 };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(info_height),
                Constraint::Length(thumbs_height),
                Constraint::Length(1),
            ])
            .split(area);

        let total = app_ref.engine.items().len();
        hits.close = render_header(frame, chunks[0], app_ref, item, index, total);
        render_body(frame, chunks[1], app_ref, item, &mut hits);
        render_info(frame, chunks[2], app_ref, item, &description[..description_rows as usize]);
        if thumbs_height > 0 {
            render_thumbnails(frame, chunks[3], app_ref, index, &mut hits);
        }
        render_hints(frame, chunks[4], app_ref.engine.variant(), theme);

        app.lightbox_hits = hits;
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App, item: &Item, index: usize, total: usize) -> Option<Rect> {
    let theme = &app.theme;
    let (locale, fallback) = app.locale();
    let counter = format!(" {}/{} ", index + 1, total);
    let close = " [x] ";
    let kind = format!(" {} ", item.media.kind().label());
    let room = area
        .width
        .saturating_sub((counter.len() + close.len() + kind.len() + 1) as u16) as usize;

    let line = Line::from(vec![
        Span::styled(
            counter,
            Style::default()
                .fg(theme.bg0)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            truncate_str(&item.display_title(locale, fallback), room),
            Style::default().fg(theme.fg1).add_modifier(Modifier::BOLD),
        ),
        Span::styled(kind, Style::default().fg(theme.grey)),
    ]);
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(theme.bg1)), area);

    if area.width < close.len() as u16 {
        return None;
    }
    let close_area = Rect::new(area.right() - close.len() as u16, area.y, close.len() as u16, 1);
    frame.render_widget(
        Paragraph::new(Span::styled(close, Style::default().fg(theme.fg0).bg(theme.bg2))),
        close_area,
    );
    Some(close_area)
}

fn render_body(frame: &mut Frame, area: Rect, app: &App, item: &Item, hits: &mut LightboxHits) {
    let theme = &app.theme;
    let controls = app.engine.controls();

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(CONTROL_WIDTH),
            Constraint::Min(1),
            Constraint::Length(CONTROL_WIDTH),
        ])
        .split(area);

    if controls.show_previous {
        hits.previous = Some(render_control(frame, columns[0], "◀", theme));
    }
    if controls.show_next {
        hits.next = Some(render_control(frame, columns[2], "▶", theme));
    }

    let media_area = columns[1];
    let caption = match &item.media {
        Media::Image { .. } => None,
        Media::Video { src, .. } => Some(format!("▶ Video · {}", src)),
        Media::EmbeddedScene { scene, .. } => Some(format!("◆ Interactive scene · {}", scene)),
        Media::Missing(kind) => Some(format!("{} unavailable", kind.label())),
    };

    let picture_area = match caption {
        Some(ref caption) if media_area.height > 1 => {
            let caption_area = Rect::new(media_area.x, media_area.bottom() - 1, media_area.width, 1);
            frame.render_widget(
                Paragraph::new(Span::styled(
                    truncate_str(caption, media_area.width as usize),
                    Style::default().fg(theme.fg0).add_modifier(Modifier::ITALIC),
                ))
                .alignment(Alignment::Center),
                caption_area,
            );
            Rect { height: media_area.height - 1, ..media_area }
        }
        _ => media_area,
    };

    let preview = item.media.preview_ref().filter(|_| app.config.ui.media_preview);
    match preview {
        Some(reference) => match app.media.image(reference) {
            Some(image) => render_halfblocks(frame, picture_area, image, FilterType::Triangle),
            None => {
                let message = app
                    .media
                    .status_text(reference)
                    .unwrap_or_else(|| "[Loading...]".to_string());
                let color = if app.media.is_failed(reference) {
                    theme.error
                } else {
                    theme.grey
                };
                render_centered(frame, picture_area, &message, color);
            }
        },
        None if item.media.is_missing() => {}
        None => render_centered(frame, picture_area, "No preview", theme.grey),
    }
}

fn render_control(frame: &mut Frame, area: Rect, glyph: &str, theme: &Theme) -> Rect {
    let y = area.y + area.height / 2;
    frame.render_widget(
        Paragraph::new(Span::styled(
            glyph,
            Style::default().fg(theme.fg1).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        Rect::new(area.x, y, area.width, 1.min(area.height)),
    );
    area
}

fn render_info(frame: &mut Frame, area: Rect, app: &App, item: &Item, description: &[String]) {
    if area.height == 0 {
        return;
    }
    let theme = &app.theme;
    let mut lines: Vec<Line> = description
        .iter()
        .map(|row| Line::from(Span::styled(row.clone(), Style::default().fg(theme.fg0))))
        .collect();

    if !item.document_links.is_empty() {
        let mut spans = vec![Span::styled("Documents: ", Style::default().fg(theme.grey))];
        for (n, doc) in item.document_links.iter().enumerate().take(9) {
            spans.push(Span::styled(format!("[{}] ", n + 1), Style::default().fg(theme.accent)));
            spans.push(Span::styled(format!("{}  ", doc.display_name), Style::default().fg(theme.fg0)));
        }
        lines.push(Line::from(spans));
    }

    if let Some(action) = &item.action_link {
        let styled = match app.engine.variant() {
            GalleryVariant::Standard => Span::styled(
                format!("[ {} ]", action.label),
                Style::default().fg(theme.action).add_modifier(Modifier::BOLD),
            ),
            GalleryVariant::Fusion => Span::styled(
                format!(" {} ↗ ", action.label),
                Style::default()
                    .fg(theme.bg0)
                    .bg(theme.action)
                    .add_modifier(Modifier::BOLD),
            ),
        };
        lines.push(Line::from(vec![styled, Span::styled("  o", Style::default().fg(theme.grey))]));
    }

    let inner = Rect {
        x: area.x + 2,
        width: area.width.saturating_sub(4),
        ..area
    };
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_thumbnails(frame: &mut Frame, area: Rect, app: &App, active: usize, hits: &mut LightboxHits) {
    let theme = &app.theme;
    let total = app.engine.items().len();
    let visible = ((area.width / THUMB_SLOT) as usize).max(1).min(total);
    let start = active
        .saturating_sub(visible / 2)
        .min(total.saturating_sub(visible));

    for (slot, index) in (start..start + visible).enumerate() {
        let rect = Rect::new(
            area.x + slot as u16 * THUMB_SLOT,
            area.y,
            (THUMB_SLOT - 1).min(area.width),
            area.height,
        );
        let is_active = index == active;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(if is_active { BorderType::Thick } else { BorderType::Plain })
            .border_style(Style::default().fg(if is_active { theme.accent } else { theme.grey }));
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let thumb = app.engine.items()[index]
            .media
            .preview_ref()
            .and_then(|reference| app.media.image(reference));
        match thumb {
            Some(image) => render_halfblocks(frame, inner, image, FilterType::Nearest),
            None => frame.render_widget(
                Paragraph::new(format!("{}", index + 1))
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(theme.fg0)),
                inner,
            ),
        }
        hits.thumbnails.push((rect, index));
    }
}

fn render_hints(frame: &mut Frame, area: Rect, variant: GalleryVariant, theme: &Theme) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(theme.accent));
    let text = |t: &'static str| Span::styled(t, Style::default().fg(theme.fg0));
    let mut spans = vec![
        key(" ←/→"),
        text(" prev/next "),
        key("drag"),
        text(" swipe "),
        key("1-9"),
        text(" documents "),
        key("o"),
        text(" action "),
        key("Esc"),
        text(" close"),
    ];
    if variant == GalleryVariant::Fusion {
        spans.insert(0, Span::styled(" FUSION ", Style::default().fg(theme.bg0).bg(theme.action)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.bg1)), area);
}

fn render_centered(frame: &mut Frame, area: Rect, message: &str, color: Color) {
    if area.height == 0 {
        return;
    }
    let y = area.y + area.height / 2;
    frame.render_widget(
        Paragraph::new(Span::styled(
            message.to_string(),
            Style::default().fg(color).add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center),
        Rect::new(area.x, y, area.width, 1),
    );
}
