// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A minimal CSS rule engine.
//!
//! Supports only `*`, type, `.class` and `#id` selectors,
//! which is enough for the `<style>` blocks found in generated SVG.

/// A single `property: value` declaration.
#[derive(Clone, PartialEq, Debug)]
pub struct Declaration {
    /// Property name, lowercased.
    pub property: String,
    /// Raw property value.
    pub value: String,
}

#[derive(Clone, PartialEq, Debug)]
enum Selector {
    Universal,
    Type(String),
    Class(String),
    Id(String),
}

impl Selector {
    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        if text == "*" {
            Some(Selector::Universal)
        } else if let Some(name) = text.strip_prefix('.') {
            Some(Selector::Class(name.to_string()))
        } else if let Some(name) = text.strip_prefix('#') {
            Some(Selector::Id(name.to_string()))
        } else if text.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            Some(Selector::Type(text.to_ascii_lowercase()))
        } else {
            // Combinators, attribute selectors and pseudo-classes
            // are not supported.
            None
        }
    }

    fn specificity(&self) -> u32 {
        match self {
            Selector::Universal => 0,
            Selector::Type(_) => 1,
            Selector::Class(_) => 10,
            Selector::Id(_) => 100,
        }
    }

    fn matches(&self, tag: &str, id: &str, classes: &str) -> bool {
        match self {
            Selector::Universal => true,
            Selector::Type(name) => tag.eq_ignore_ascii_case(name),
            Selector::Class(name) => classes.split_ascii_whitespace().any(|c| c == name),
            Selector::Id(name) => !id.is_empty() && id == name,
        }
    }
}

#[derive(Clone, Debug)]
struct Rule {
    selector: Selector,
    specificity: u32,
    declarations: Vec<Declaration>,
}

/// A parsed list of style rules.
#[derive(Clone, Default, Debug)]
pub struct Stylesheet {
    rules: Vec<Rule>,
}

impl Stylesheet {
    /// Creates an empty stylesheet.
    #[inline]
    pub fn new() -> Self {
        Stylesheet::default()
    }

    /// Returns `true` when no rules were parsed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Parses a `<style>` block content, appending its rules.
    pub fn parse(&mut self, text: &str) {
        let text = strip_comments(text);

        for block in text.split('}') {
            let (selectors, declarations) = match block.split_once('{') {
                Some(v) => v,
                None => continue,
            };

            let declarations = parse_declarations(declarations);
            if declarations.is_empty() {
                continue;
            }

            for selector in selectors.split(',') {
                if let Some(selector) = Selector::parse(selector) {
                    self.rules.push(Rule {
                        specificity: selector.specificity(),
                        selector,
                        declarations: declarations.clone(),
                    });
                } else {
                    log::warn!("Unsupported CSS selector: '{}'.", selector.trim());
                }
            }
        }
    }

    /// Collects declarations from all rules matching an element.
    ///
    /// The list is sorted stably by ascending specificity, so overlaying
    /// the declarations in order makes the most specific rule win,
    /// with source order breaking ties.
    pub fn matching(&self, tag: &str, id: &str, classes: &str) -> Vec<&Declaration> {
        let mut matched: Vec<&Rule> = self
            .rules
            .iter()
            .filter(|r| r.selector.matches(tag, id, classes))
            .collect();

        matched.sort_by_key(|r| r.specificity);

        matched
            .iter()
            .flat_map(|r| r.declarations.iter())
            .collect()
    }
}

fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start..].find("*/") {
            Some(end) => rest = &rest[start + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

/// Splits `a: b; c: d` into declarations.
pub(crate) fn parse_declarations(text: &str) -> Vec<Declaration> {
    let mut list = Vec::new();
    for item in text.split(';') {
        if let Some((property, value)) = item.split_once(':') {
            let property = property.trim().to_ascii_lowercase();
            let value = value.trim().to_string();
            if !property.is_empty() && !value.is_empty() {
                list.push(Declaration { property, value });
            }
        }
    }
    list
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_rules() {
        let mut sheet = Stylesheet::new();
        sheet.parse("rect { fill: red } .thick { stroke-width: 4 }");

        let decls = sheet.matching("rect", "", "thick");
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].property, "fill");
        assert_eq!(decls[1].property, "stroke-width");
    }

    #[test]
    fn specificity_ordering() {
        let mut sheet = Stylesheet::new();
        sheet.parse("#a { fill: blue } rect { fill: red } * { fill: green } .b { fill: yellow }");

        let decls = sheet.matching("rect", "a", "b");
        let values: Vec<_> = decls.iter().map(|d| d.value.as_str()).collect();
        // Ascending specificity: * < type < class < id.
        assert_eq!(values, vec!["green", "red", "yellow", "blue"]);
    }

    #[test]
    fn source_order_breaks_ties() {
        let mut sheet = Stylesheet::new();
        sheet.parse(".a { fill: red } .a { fill: blue }");

        let decls = sheet.matching("rect", "", "a");
        assert_eq!(decls.last().unwrap().value, "blue");
    }

    #[test]
    fn comments_are_stripped() {
        let mut sheet = Stylesheet::new();
        sheet.parse("/* a */ rect { /* fill: red; */ stroke: blue }");

        let decls = sheet.matching("rect", "", "");
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].property, "stroke");
    }

    #[test]
    fn class_list_matching() {
        let mut sheet = Stylesheet::new();
        sheet.parse(".b { fill: red }");

        assert_eq!(sheet.matching("rect", "", "a b c").len(), 1);
        assert_eq!(sheet.matching("rect", "", "ab").len(), 0);
    }

    #[test]
    fn type_match_is_case_insensitive() {
        let mut sheet = Stylesheet::new();
        sheet.parse("RECT { fill: red }");
        assert_eq!(sheet.matching("rect", "", "").len(), 1);
    }
}
