//! CSS color strings as used by the selector model, converted to egui colors for painting.

use egui::Color32;

use crate::error::{LassoError, Result};

const NAMED: &[(&str, Color32)] = &[
    ("black", Color32::BLACK),
    ("white", Color32::WHITE),
    ("red", Color32::from_rgb(255, 0, 0)),
    ("green", Color32::from_rgb(0, 128, 0)),
    ("lime", Color32::from_rgb(0, 255, 0)),
    ("blue", Color32::from_rgb(0, 0, 255)),
    ("yellow", Color32::from_rgb(255, 255, 0)),
    ("orange", Color32::from_rgb(255, 165, 0)),
    ("purple", Color32::from_rgb(128, 0, 128)),
    ("magenta", Color32::from_rgb(255, 0, 255)),
    ("cyan", Color32::from_rgb(0, 255, 255)),
    ("gray", Color32::from_rgb(128, 128, 128)),
    ("grey", Color32::from_rgb(128, 128, 128)),
    ("steelblue", Color32::from_rgb(70, 130, 180)),
    ("tomato", Color32::from_rgb(255, 99, 71)),
];

/// Stroke of last resort when neither the curve nor the config has a usable color.
pub const DEFAULT_STROKE: Color32 = Color32::from_rgb(70, 130, 180);

/// Parse `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)` or a basic color name.
pub fn parse_css_color(s: &str) -> Result<Color32> {
    let s = s.trim();
    let invalid = || LassoError::InvalidColor(s.to_string());

    if let Some(hex) = s.strip_prefix('#') {
        let nibble = |c: u8| (c as char).to_digit(16).map(|d| d as u8);
        let byte = |i: usize| -> Option<u8> {
            let hi = nibble(hex.as_bytes()[i])?;
            let lo = nibble(hex.as_bytes()[i + 1])?;
            Some(hi * 16 + lo)
        };
        return match hex.len() {
            3 => {
                let mut c = [0u8; 3];
                for (i, b) in hex.bytes().enumerate() {
                    let d = nibble(b).ok_or_else(invalid)?;
                    c[i] = d * 17;
                }
                Ok(Color32::from_rgb(c[0], c[1], c[2]))
            }
            6 => Ok(Color32::from_rgb(
                byte(0).ok_or_else(invalid)?,
                byte(2).ok_or_else(invalid)?,
                byte(4).ok_or_else(invalid)?,
            )),
            8 => Ok(Color32::from_rgba_unmultiplied(
                byte(0).ok_or_else(invalid)?,
                byte(2).ok_or_else(invalid)?,
                byte(4).ok_or_else(invalid)?,
                byte(6).ok_or_else(invalid)?,
            )),
            _ => Err(invalid()),
        };
    }

    if let Some(body) = s.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
        let parts: Vec<&str> = body.split(',').map(|p| p.trim()).collect();
        if parts.len() != 3 {
            return Err(invalid());
        }
        let mut c = [0u8; 3];
        for (i, p) in parts.iter().enumerate() {
            c[i] = p.parse::<u8>().map_err(|_| invalid())?;
        }
        return Ok(Color32::from_rgb(c[0], c[1], c[2]));
    }

    let lower = s.to_ascii_lowercase();
    NAMED
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, c)| *c)
        .ok_or_else(invalid)
}

/// `#rrggbb` form of an opaque color, `#rrggbbaa` otherwise.
pub fn to_hex(c: Color32) -> String {
    let [r, g, b, a] = c.to_srgba_unmultiplied();
    if a == 255 {
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(parse_css_color("#ff0000").unwrap(), Color32::from_rgb(255, 0, 0));
        assert_eq!(parse_css_color("#0f0").unwrap(), Color32::from_rgb(0, 255, 0));
        let c = parse_css_color("#00000080").unwrap();
        assert_eq!(c.to_srgba_unmultiplied()[3], 0x80);
    }

    #[test]
    fn parses_rgb_and_names() {
        assert_eq!(parse_css_color("rgb(1, 2, 3)").unwrap(), Color32::from_rgb(1, 2, 3));
        assert_eq!(parse_css_color("Orange").unwrap(), Color32::from_rgb(255, 165, 0));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_css_color("").is_err());
        assert!(parse_css_color("#12").is_err());
        assert!(parse_css_color("#gg0000").is_err());
        assert!(parse_css_color("rgb(300, 0, 0)").is_err());
        assert!(parse_css_color("not-a-color").is_err());
    }

    #[test]
    fn hex_roundtrip_of_opaque_color() {
        assert_eq!(to_hex(Color32::from_rgb(70, 130, 180)), "#4682b4");
    }
}
