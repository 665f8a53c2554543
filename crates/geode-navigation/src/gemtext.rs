//! Line-oriented gemtext parsing
//!
//! Each source line maps to exactly one [`Line`], so callers can render
//! documents line by line. Lines between ``` toggles are preformatted and
//! never interpreted.

/// One line of a gemtext document, borrowing from the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Text(&'a str),
    /// `=> target [label]`
    Link {
        target: &'a str,
        label: Option<&'a str>,
    },
    /// `#`, `##` or `###`
    Heading { level: u8, text: &'a str },
    /// `* item`
    ListItem(&'a str),
    /// `> quoted`
    Quote(&'a str),
    /// A ``` line; `alt` is the text after the backticks
    Toggle { alt: &'a str },
    /// Verbatim line inside a preformatted block
    Preformatted(&'a str),
}

pub fn parse_gemtext(source: &str) -> Vec<Line<'_>> {
    let mut preformatted = false;

    source
        .lines()
        .map(|raw| {
            if let Some(alt) = raw.strip_prefix("```") {
                preformatted = !preformatted;
                return Line::Toggle { alt: alt.trim() };
            }
            if preformatted {
                return Line::Preformatted(raw);
            }
            parse_line(raw)
        })
        .collect()
}

fn parse_line(raw: &str) -> Line<'_> {
    if let Some(rest) = raw.strip_prefix("=>") {
        return parse_link(rest);
    }
    if let Some(text) = raw.strip_prefix("###") {
        return Line::Heading {
            level: 3,
            text: text.trim(),
        };
    }
    if let Some(text) = raw.strip_prefix("##") {
        return Line::Heading {
            level: 2,
            text: text.trim(),
        };
    }
    if let Some(text) = raw.strip_prefix('#') {
        return Line::Heading {
            level: 1,
            text: text.trim(),
        };
    }
    if let Some(item) = raw.strip_prefix("* ") {
        return Line::ListItem(item.trim());
    }
    if let Some(quoted) = raw.strip_prefix('>') {
        return Line::Quote(quoted.trim());
    }
    Line::Text(raw)
}

fn parse_link(rest: &str) -> Line<'_> {
    let rest = rest.trim();
    match rest.split_once(char::is_whitespace) {
        Some((target, label)) => {
            let label = label.trim();
            Line::Link {
                target,
                label: (!label.is_empty()).then_some(label),
            }
        }
        None => Line::Link {
            target: rest,
            label: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links() {
        let lines = parse_gemtext("=> /about About us\n=>gemini://bare.test/\n=>   \t spaced   label  ");
        assert_eq!(
            lines,
            vec![
                Line::Link {
                    target: "/about",
                    label: Some("About us")
                },
                Line::Link {
                    target: "gemini://bare.test/",
                    label: None
                },
                Line::Link {
                    target: "spaced",
                    label: Some("label")
                },
            ]
        );
    }

    #[test]
    fn test_empty_link() {
        assert_eq!(
            parse_gemtext("=>"),
            vec![Line::Link {
                target: "",
                label: None
            }]
        );
    }

    #[test]
    fn test_headings_lists_quotes() {
        let lines = parse_gemtext("# One\n## Two\n### Three\n* item\n> quote\nplain");
        assert_eq!(
            lines,
            vec![
                Line::Heading { level: 1, text: "One" },
                Line::Heading { level: 2, text: "Two" },
                Line::Heading { level: 3, text: "Three" },
                Line::ListItem("item"),
                Line::Quote("quote"),
                Line::Text("plain"),
            ]
        );
    }

    #[test]
    fn test_preformatted_block_is_verbatim() {
        let lines = parse_gemtext("```ascii art\n=> not/a/link\n# not a heading\n```\n=> real");
        assert_eq!(
            lines,
            vec![
                Line::Toggle { alt: "ascii art" },
                Line::Preformatted("=> not/a/link"),
                Line::Preformatted("# not a heading"),
                Line::Toggle { alt: "" },
                Line::Link {
                    target: "real",
                    label: None
                },
            ]
        );
    }

    #[test]
    fn test_one_line_per_source_line() {
        let source = "a\n\n```\nb\n";
        assert_eq!(parse_gemtext(source).len(), source.lines().count());
    }
}
