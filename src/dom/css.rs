//! Lightweight CSS value handling.
//!
//! Reads the few declarations the layout needs out of inline `style=""`
//! attributes and formats the values written back.

/// Box dimensions found in an inline style
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxSize {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// Parse an inline `style="..."` attribute value for width/height.
pub fn parse_box_size(style: &str) -> BoxSize {
    let mut size = BoxSize::default();
    for decl in style.split(';') {
        let Some((prop, val)) = decl.split_once(':') else {
            continue;
        };
        match prop.trim().to_ascii_lowercase().as_str() {
            "width" => size.width = parse_px(val),
            "height" => size.height = parse_px(val),
            _ => {}
        }
    }
    size
}

/// Parse a pixel length (`120px` or a plain number). Other units are rejected.
pub fn parse_px(val: &str) -> Option<f64> {
    let v = val.trim().to_ascii_lowercase();
    let num = v.strip_suffix("px").unwrap_or(&v).trim();
    num.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse a data attribute number, tolerating a trailing `%` or `px`.
pub fn parse_number(val: &str) -> Option<f64> {
    let v = val.trim();
    let num = v
        .strip_suffix('%')
        .or_else(|| v.strip_suffix("px"))
        .unwrap_or(v)
        .trim();
    num.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Quote a string for a CSS `content:` value.
pub fn css_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\A "),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_inline_box() {
        let size = parse_box_size("position: relative; width: 1200px; HEIGHT:800px");
        assert_eq!(size.width, Some(1200.0));
        assert_eq!(size.height, Some(800.0));
    }

    #[test]
    fn relative_units_are_ignored() {
        let size = parse_box_size("width: 100%; height: 90vh");
        assert_eq!(size, BoxSize::default());
    }

    #[test]
    fn data_numbers() {
        assert_eq!(parse_number("42.5"), Some(42.5));
        assert_eq!(parse_number(" 30% "), Some(30.0));
        assert_eq!(parse_number("180px"), Some(180.0));
        assert_eq!(parse_number("wide"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn quoting() {
        assert_eq!(css_string("12°C · Rainy"), "\"12°C · Rainy\"");
        assert_eq!(css_string("a\"b"), "\"a\\\"b\"");
    }
}
