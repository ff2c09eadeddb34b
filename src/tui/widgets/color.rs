use ratatui::style::Color;

/// Parse a theme color string.
///
/// Accepts named terminal colors (`green`, `lightgreen`, `darkgray`, ...),
/// `#RRGGBB`, `#RGB` and `rgb(r, g, b)`. Anything else renders as white.
pub fn parse_color(color_str: &str) -> Color {
    let s = color_str.trim().to_lowercase();
    match s.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        // ratatui has no separate light gray
        "gray" | "grey" | "lightgray" | "lightgrey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        _ => s
            .strip_prefix('#')
            .and_then(parse_hex_color)
            .or_else(|| s.strip_prefix("rgb(").and_then(parse_rgb_color))
            .unwrap_or(Color::White),
    }
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range).and_then(|h| u8::from_str_radix(h, 16).ok())
    };
    match hex.len() {
        6 => Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        3 => {
            // #RGB expands each nibble: #0F8 -> #00FF88
            let expand = |n: u8| (n << 4) | n;
            Some(Color::Rgb(
                expand(channel(0..1)?),
                expand(channel(1..2)?),
                expand(channel(2..3)?),
            ))
        }
        _ => None,
    }
}

/// `r, g, b)` with the `rgb(` prefix already removed
fn parse_rgb_color(rest: &str) -> Option<Color> {
    let parts: Vec<u8> = rest
        .strip_suffix(')')?
        .split(',')
        .map(|p| p.trim().parse::<u8>().ok())
        .collect::<Option<Vec<_>>>()?;
    match parts.as_slice() {
        [r, g, b] => Some(Color::Rgb(*r, *g, *b)),
        _ => None,
    }
}

/// Inverse of [`parse_color`] for the colors it produces
pub fn format_color_for_display(color: &Color) -> String {
    match color {
        Color::Black => "black".to_string(),
        Color::Red => "red".to_string(),
        Color::Green => "green".to_string(),
        Color::Yellow => "yellow".to_string(),
        Color::Blue => "blue".to_string(),
        Color::Magenta => "magenta".to_string(),
        Color::Cyan => "cyan".to_string(),
        Color::White => "white".to_string(),
        Color::Gray => "gray".to_string(),
        Color::DarkGray => "darkgray".to_string(),
        Color::LightRed => "lightred".to_string(),
        Color::LightGreen => "lightgreen".to_string(),
        Color::LightYellow => "lightyellow".to_string(),
        Color::LightBlue => "lightblue".to_string(),
        Color::LightMagenta => "lightmagenta".to_string(),
        Color::LightCyan => "lightcyan".to_string(),
        Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
        Color::Indexed(i) => format!("indexed({})", i),
        Color::Reset => "reset".to_string(),
    }
}

/// WCAG relative luminance of an RGB color, 0.0 (dark) to 1.0 (light)
fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    let linear = |c: u8| {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

/// Black or white, whichever reads better on `background`.
/// Named colors use how terminals usually draw them; gray counts as light.
pub fn get_contrast_text_color(background: Color) -> Color {
    let dark = match background {
        Color::Rgb(r, g, b) => relative_luminance(r, g, b) < 0.5,
        other => matches!(other, Color::Black | Color::Blue | Color::Magenta | Color::Red),
    };
    if dark { Color::White } else { Color::Black }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_hex_and_rgb() {
        assert_eq!(parse_color(" LightGreen "), Color::LightGreen);
        assert_eq!(parse_color("#2e7d32"), Color::Rgb(0x2E, 0x7D, 0x32));
        assert_eq!(parse_color("#0f8"), Color::Rgb(0x00, 0xFF, 0x88));
        assert_eq!(parse_color("rgb(46, 125, 50)"), Color::Rgb(46, 125, 50));
        assert_eq!(parse_color("rgb(1,2)"), Color::White);
        assert_eq!(parse_color("chlorophyll"), Color::White);
    }

    #[test]
    fn formatting_round_trips_through_parse() {
        for name in ["green", "darkgray", "lightcyan", "#2E7D32"] {
            assert_eq!(format_color_for_display(&parse_color(name)), name);
        }
    }

    #[test]
    fn contrast_picks_readable_text() {
        assert_eq!(get_contrast_text_color(Color::Green), Color::Black);
        assert_eq!(get_contrast_text_color(Color::Blue), Color::White);
        assert_eq!(get_contrast_text_color(Color::Rgb(20, 60, 20)), Color::White);
        assert_eq!(get_contrast_text_color(Color::Rgb(230, 250, 230)), Color::Black);
    }
}
