// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// An RGB color.
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    /// Creates a new color.
    #[inline]
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Color { red, green, blue }
    }

    /// Creates a black color.
    #[inline]
    pub fn black() -> Self {
        Color::new(0, 0, 0)
    }

    /// Returns the color components as floats in 0..1.
    #[inline]
    pub fn rgb_f64(&self) -> (f64, f64, f64) {
        (
            self.red as f64 / 255.0,
            self.green as f64 / 255.0,
            self.blue as f64 / 255.0,
        )
    }
}

impl Default for Color {
    #[inline]
    fn default() -> Self {
        Color::black()
    }
}

/// Parses a color string.
///
/// Supports `#rgb`, `#rrggbb` and `rgb(...)` with integer
/// or percentage components. Everything else is handed to the
/// named-color table.
pub fn parse_color(text: &str) -> Option<Color> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(hex) = text.strip_prefix('#') {
        return parse_hex(hex);
    }

    if let Some(args) = text.strip_prefix("rgb(").and_then(|t| t.strip_suffix(')')) {
        return parse_rgb_func(args);
    }

    // Named colors are a data table, not a parser.
    let c = text.parse::<svgtypes::Color>().ok()?;
    Some(Color::new(c.red, c.green, c.blue))
}

fn parse_hex(hex: &str) -> Option<Color> {
    let hex = hex.trim();
    match hex.len() {
        3 => {
            let mut it = hex.chars();
            let r = it.next()?.to_digit(16)? as u8;
            let g = it.next()?.to_digit(16)? as u8;
            let b = it.next()?.to_digit(16)? as u8;
            Some(Color::new(r * 17, g * 17, b * 17))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::new(r, g, b))
        }
        _ => None,
    }
}

fn parse_rgb_func(args: &str) -> Option<Color> {
    let mut components = [0u8; 3];
    let mut count = 0;
    for item in args.split(',') {
        if count == 3 {
            return None;
        }

        let item = item.trim();
        let n = if let Some(p) = item.strip_suffix('%') {
            p.trim().parse::<f64>().ok()? / 100.0 * 255.0
        } else {
            item.parse::<f64>().ok()?
        };

        components[count] = n.round().max(0.0).min(255.0) as u8;
        count += 1;
    }

    if count == 3 {
        Some(Color::new(components[0], components[1], components[2]))
    } else {
        None
    }
}
