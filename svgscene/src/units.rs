// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! `<length>` and number list parsing.
//!
//! All lengths resolve into CSS pixels at 96 dpi.

/// Parses a `<number><unit>?` string into pixels.
///
/// `em`/`rem` units are multiples of `font_size`,
/// percentages are relative to `reference`.
/// An unknown unit or an unparseable number resolves to `default`.
pub fn parse_length(text: &str, default: f64, font_size: f64, reference: f64) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return default;
    }

    let split = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+' || c == 'e' || c == 'E'))
        .unwrap_or(text.len());

    // `1e2em`-like values will split inside the exponent. Back off until
    // the numeric part actually parses.
    let mut split = split;
    let n = loop {
        match text[..split].parse::<f64>() {
            Ok(n) => break n,
            Err(_) => {
                if split == 0 {
                    return default;
                }
                split -= 1;
            }
        }
    };

    let n = match text[split..].trim() {
        "" | "px" => n,
        "pt" => n * 96.0 / 72.0,
        "pc" => n * 16.0,
        "mm" => n * 96.0 / 25.4,
        "cm" => n * 96.0 / 2.54,
        "in" => n * 96.0,
        "em" | "rem" => n * font_size,
        "%" => n / 100.0 * reference,
        _ => return default,
    };

    if n.is_finite() {
        n
    } else {
        default
    }
}

/// Parses a plain number, falling back to `default`.
pub fn parse_number(text: &str, default: f64) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => default,
    }
}

/// Parses a whitespace/comma separated number list.
///
/// Unparseable items terminate the list.
pub fn parse_list(text: &str) -> Vec<f64> {
    let mut list = Vec::new();
    for item in text.split(|c: char| c == ',' || c.is_ascii_whitespace()) {
        if item.is_empty() {
            continue;
        }

        match item.parse::<f64>() {
            Ok(n) if n.is_finite() => list.push(n),
            _ => break,
        }
    }

    list
}

/// Parses a number list with an expected item count.
///
/// A count mismatch yields the empty list.
pub fn parse_list_exact(text: &str, count: usize) -> Vec<f64> {
    let list = parse_list(text);
    if list.len() == count {
        list
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units() {
        assert_eq!(parse_length("10", 0.0, 16.0, 100.0), 10.0);
        assert_eq!(parse_length("10px", 0.0, 16.0, 100.0), 10.0);
        assert_eq!(parse_length("72pt", 0.0, 16.0, 100.0), 96.0);
        assert_eq!(parse_length("1pc", 0.0, 16.0, 100.0), 16.0);
        assert_eq!(parse_length("1in", 0.0, 16.0, 100.0), 96.0);
        assert_eq!(parse_length("25.4mm", 0.0, 16.0, 100.0), 96.0);
        assert_eq!(parse_length("2.54cm", 0.0, 16.0, 100.0), 96.0);
        assert_eq!(parse_length("2em", 0.0, 16.0, 100.0), 32.0);
        assert_eq!(parse_length("2rem", 0.0, 16.0, 100.0), 32.0);
        assert_eq!(parse_length("50%", 0.0, 16.0, 100.0), 50.0);
    }

    #[test]
    fn fallbacks() {
        assert_eq!(parse_length("10parsecs", 7.0, 16.0, 100.0), 7.0);
        assert_eq!(parse_length("", 7.0, 16.0, 100.0), 7.0);
        assert_eq!(parse_length("abc", 7.0, 16.0, 100.0), 7.0);
    }

    #[test]
    fn exponents() {
        assert_eq!(parse_length("1e2", 0.0, 16.0, 100.0), 100.0);
        assert_eq!(parse_length("1e1em", 0.0, 16.0, 100.0), 160.0);
    }

    #[test]
    fn lists() {
        assert_eq!(parse_list("1 2,3\t4"), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(parse_list("1,,2"), vec![1.0, 2.0]);
        assert!(parse_list_exact("1 2 3", 4).is_empty());
        assert_eq!(parse_list_exact("0 0 100 50", 4), vec![0.0, 0.0, 100.0, 50.0]);
    }
}
