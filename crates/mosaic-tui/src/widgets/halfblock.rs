use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Draw an image with upper-half-block characters, two pixels per cell,
/// scaled to fit and centred in `area`
pub fn render_halfblocks(frame: &mut Frame, area: Rect, img: &DynamicImage, filter: FilterType) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let target_width = area.width as u32;
    let target_height = (area.height as u32) * 2;

    let (img_width, img_height) = img.dimensions();
    if img_width == 0 || img_height == 0 {
        return;
    }
    let scale_w = target_width as f32 / img_width as f32;
    let scale_h = target_height as f32 / img_height as f32;
    let scale = scale_w.min(scale_h);

    let new_width = ((img_width as f32 * scale) as u32).clamp(1, target_width);
    let new_height = ((img_height as f32 * scale) as u32).clamp(1, target_height);

    let rgba = img.resize_exact(new_width, new_height, filter).to_rgba8();

    let x_offset = target_width.saturating_sub(new_width) / 2;
    let rows = new_height.div_ceil(2);
    let y_offset = (area.height as u32).saturating_sub(rows) / 2;

    for row in 0..rows {
        let y = row * 2;
        let mut spans: Vec<Span> = Vec::with_capacity(new_width as usize + 1);
        if x_offset > 0 {
            spans.push(Span::raw(" ".repeat(x_offset as usize)));
        }

        for x in 0..new_width {
            let top = rgba.get_pixel(x, y);
            let bottom = if y + 1 < new_height {
                rgba.get_pixel(x, y + 1)
            } else {
                top
            };
            spans.push(Span::styled(
                "▀",
                Style::default()
                    .fg(Color::Rgb(top[0], top[1], top[2]))
                    .bg(Color::Rgb(bottom[0], bottom[1], bottom[2])),
            ));
        }

        let line_area = Rect {
            x: area.x,
            y: area.y + (y_offset + row) as u16,
            width: area.width,
            height: 1,
        };
        if line_area.y < area.bottom() {
            frame.render_widget(Paragraph::new(Line::from(spans)), line_area);
        }
    }
}
