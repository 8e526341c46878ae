use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::text::truncate_str;
use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let mode = if app.is_viewer_open() { " VIEWER " } else { " GRID " };

        let status_text = match &app.status_message {
            Some(message) => format!(" {}", message),
            None => {
                let layout = match app.engine.metrics() {
                    Some(metrics) if metrics.compact => format!("{} column · compact", metrics.column_count),
                    Some(metrics) => format!("{} columns", metrics.column_count),
                    None => "unmeasured".to_string(),
                };
                let link = app
                    .link_url()
                    .map(|url| url.to_string())
                    .or_else(|| app.link_key().map(|key| format!("#{}", key)));
                match link {
                    Some(link) => format!(" {} items · {} · {}", app.engine.items().len(), layout, link),
                    None => format!(" {} items · {}", app.engine.items().len(), layout),
                }
            }
        };

        let help_hint = " q:quit hjkl:move ⏎:open t:theme ";
        let room = (area.width as usize)
            .saturating_sub(mode.width() + help_hint.width());
        let status_text = truncate_str(&status_text, room);
        let padding = room.saturating_sub(status_text.width());

        let line = Line::from(vec![
            Span::styled(
                mode,
                Style::default()
                    .fg(theme.bg0)
                    .bg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(status_text, Style::default().fg(theme.fg0).bg(theme.bg2)),
            Span::styled(" ".repeat(padding), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::input::Action;
    use crate::link::QueryParamLink;
    use mosaic_core::{AppConfig, Item};
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_shows_mode_and_link() {
        let link = QueryParamLink::parse("https://s.example/", "item").unwrap();
        let items = vec![Item::image("alpha", 300.0, "a.png")];
        let mut app = App::new(items, Arc::new(AppConfig::default()), Some(link), None);
        app.mount(Rect::new(0, 0, 130, 41));
        app.handle_action(Action::Open);

        let mut terminal = Terminal::new(TestBackend::new(130, 1)).unwrap();
        terminal
            .draw(|frame| StatusBarWidget::render(frame, frame.area(), &app))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("VIEWER"));
        assert!(text.contains("item=alpha"));
    }
}
