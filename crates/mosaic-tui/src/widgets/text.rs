use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Wrap text respecting unicode character widths (CJK = 2 columns)
pub fn wrap_text_unicode(text: &str, max_width: usize) -> Vec<String> {
    let mut result = Vec::new();
    if max_width == 0 {
        return result;
    }

    for paragraph in text.lines() {
        if paragraph.is_empty() {
            result.push(String::new());
            continue;
        }

        let mut current_line = String::new();
        let mut current_width = 0;

        for ch in paragraph.chars() {
            let ch_width = ch.width().unwrap_or(1);
            if current_width + ch_width > max_width && !current_line.is_empty() {
                result.push(std::mem::take(&mut current_line));
                current_width = 0;
            }
            current_line.push(ch);
            current_width += ch_width;
        }

        if !current_line.is_empty() {
            result.push(current_line);
        }
    }

    result
}

/// Truncate to `max_width` display columns, ending with an ellipsis when cut
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(1);
        if width + w + 1 > max_width {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push('…');
    out
}
