use std::fmt;

/// Color in the globe's packed style encoding.
///
/// Renders as eight lowercase hex digits in alpha, blue, green, red order
/// (`aabbggrr`), which is the byte order the globe's styling format expects.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PackedColor {
    pub alpha: u8,
    pub blue: u8,
    pub green: u8,
    pub red: u8,
}

impl PackedColor {
    pub const WHITE: PackedColor = PackedColor::new(0xff, 0xff, 0xff, 0xff);

    pub const fn new(alpha: u8, blue: u8, green: u8, red: u8) -> Self {
        Self {
            alpha,
            blue,
            green,
            red,
        }
    }

    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PackedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}{:02x}{:02x}{:02x}",
            self.alpha, self.blue, self.green, self.red
        )
    }
}

/// Converts a CSS-style hex color plus an opacity into a [`PackedColor`].
///
/// `hex` may be 3 or 6 hex digits, with or without a leading `#`; 3-digit
/// colors expand by doubling each digit. Anything else (including `None`)
/// falls back to red. The alpha byte is `floor(255 * alpha)` with `alpha`
/// clamped to `[0, 1]`.
pub fn to_packed_color(hex: Option<&str>, alpha: f64) -> PackedColor {
    let alpha = (255.0 * alpha.clamp(0.0, 1.0)).floor() as u8;
    let (red, green, blue) = hex.and_then(parse_rgb).unwrap_or((0xff, 0x00, 0x00));
    PackedColor::new(alpha, blue, green, red)
}

fn parse_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match hex.len() {
        6 => hex.to_string(),
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        _ => return None,
    };
    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineStyle {
    pub color: PackedColor,
    pub width: f64,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: PackedColor::WHITE,
            width: 1.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PolyStyle {
    pub color: PackedColor,
}

impl Default for PolyStyle {
    fn default() -> Self {
        Self {
            color: PackedColor::WHITE,
        }
    }
}

/// Icon anchor point, in pixels from the bottom-left corner of the image.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HotSpot {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IconStyle {
    pub href: Option<String>,
    pub scale: f64,
    pub hotspot: Option<HotSpot>,
}

impl Default for IconStyle {
    fn default() -> Self {
        Self {
            href: None,
            scale: 1.0,
            hotspot: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    pub line: LineStyle,
    pub poly: PolyStyle,
    pub icon: IconStyle,
}

#[cfg(test)]
mod tests {
    use super::{PackedColor, to_packed_color};
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_color_is_opaque_red() {
        assert_eq!(to_packed_color(None, 1.0).to_hex(), "ff0000ff");
    }

    #[test]
    fn short_hex_expands_and_alpha_floors() {
        let c = to_packed_color(Some("#f00"), 0.5);
        assert_eq!(c, PackedColor::new(0x7f, 0x00, 0x00, 0xff));
        assert_eq!(c.to_hex(), "7f0000ff");
    }

    #[test]
    fn channels_are_reversed() {
        assert_eq!(to_packed_color(Some("336699"), 1.0).to_hex(), "ff996633");
        assert_eq!(to_packed_color(Some("#aBc"), 1.0).to_hex(), "ffccbbaa");
    }

    #[test]
    fn alpha_is_zero_padded() {
        assert_eq!(to_packed_color(Some("000000"), 0.03).to_hex(), "07000000");
        assert_eq!(to_packed_color(Some("000000"), 0.0).to_hex(), "00000000");
    }

    #[test]
    fn invalid_input_falls_back_to_red() {
        for bad in ["", "#", "12345", "#1234567", "zzzzzz", "#ff00"] {
            assert_eq!(to_packed_color(Some(bad), 1.0).to_hex(), "ff0000ff", "{bad}");
        }
    }

    #[test]
    fn alpha_out_of_range_is_clamped() {
        assert_eq!(to_packed_color(Some("fff"), 3.0).alpha, 0xff);
        assert_eq!(to_packed_color(Some("fff"), -1.0).alpha, 0x00);
    }
}
