//! Gemtext to terminal text
//!
//! Links are printed as `=> [n] (kind) label` where `n` is the ordinal
//! used by `gtl`, `link` and `bmal`. Link colour reflects the flags on the
//! page: bookmarked links are yellow, visited ones magenta, the rest cyan.
//! Bodies of any other type are printed as they are.

use geode_core::{is_gemini_link, parse_gemtext, Line, Link, Page};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const ITALIC: &str = "\x1b[3m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";

pub fn render_page(page: &Page, color: bool) -> String {
    let paint = |code: &str, text: &str| -> String {
        if color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    };

    let mut out = Vec::new();
    out.push(paint(DIM, &format!("[{}]", page.url)));
    if !page.is_gemtext() {
        out.push(page.content.clone());
        return out.join("\n");
    }

    let mut links = page.links.iter();
    for line in parse_gemtext(&page.content) {
        let rendered = match line {
            Line::Text(text) => text.to_string(),
            Line::Heading { level, text } => {
                let code = match level {
                    1 => format!("{BOLD}{GREEN}"),
                    2 => GREEN.to_string(),
                    _ => BLUE.to_string(),
                };
                paint(&code, &format!("{} {text}", "#".repeat(level as usize)))
            }
            Line::ListItem(item) => format!("  * {item}"),
            Line::Quote(quoted) => paint(ITALIC, &format!("> {quoted}")),
            // Toggle lines only delimit the block
            Line::Toggle { .. } => continue,
            Line::Preformatted(raw) => raw.to_string(),
            Line::Link { target, .. } if target.is_empty() => "=>".to_string(),
            Line::Link { target, label } => match links.next() {
                Some(link) => paint(link_color(link), &link_line(link)),
                // Unreachable while links come from the same content
                None => format!("=> {}", label.unwrap_or(target)),
            },
        };
        out.push(rendered);
    }

    out.join("\n")
}

fn link_line(link: &Link) -> String {
    let kind = if is_gemini_link(&link.target) {
        "gemini"
    } else {
        "unsupported"
    };
    let label = link.label.as_deref().unwrap_or(&link.target);
    format!("=> [{}] ({kind}) {label}", link.ordinal)
}

fn link_color(link: &Link) -> &'static str {
    if link.bookmarked {
        YELLOW
    } else if link.visited {
        MAGENTA
    } else {
        CYAN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn page(content: &str) -> Page {
        Page::new(Url::parse("gemini://example.test/").unwrap(), content)
    }

    #[test]
    fn test_plain_render() {
        let page = page(
            "# Title\nSome text\n=> /about About us\n=> https://web.test/ Web\n* item\n> quote\n",
        );
        let text = render_page(&page, false);

        assert_eq!(
            text,
            "[gemini://example.test/]\n\
             # Title\n\
             Some text\n\
             => [0] (gemini) About us\n\
             => [1] (unsupported) Web\n  \
             * item\n\
             > quote"
        );
    }

    #[test]
    fn test_preformatted_is_verbatim() {
        let page = page("```ascii art\n=> not a link\n# not a heading\n```\n=> /real\n");
        let text = render_page(&page, false);

        assert!(text.contains("\n=> not a link\n"));
        assert!(text.contains("\n# not a heading\n"));
        assert!(text.ends_with("=> [0] (gemini) /real"));
        assert!(!text.contains("```"));
    }

    #[test]
    fn test_link_colors_follow_flags() {
        let mut page = page("=> /a A\n=> /b B\n=> /c C\n");
        page.mark_links(
            |u| u.ends_with("/b") || u.ends_with("/c"),
            |u| u.ends_with("/c"),
        );
        let text = render_page(&page, true);

        assert!(text.contains(&format!("{CYAN}=> [0] (gemini) A{RESET}")));
        assert!(text.contains(&format!("{MAGENTA}=> [1] (gemini) B{RESET}")));
        assert!(text.contains(&format!("{YELLOW}=> [2] (gemini) C{RESET}")));
    }

    #[test]
    fn test_plain_text_is_verbatim() {
        let url = Url::parse("gemini://example.test/notes.txt").unwrap();
        let page = Page::with_mime(url, "# not a heading\n=> /not-a-link\n", "text/plain");
        let text = render_page(&page, true);

        assert_eq!(
            text,
            format!(
                "{DIM}[gemini://example.test/notes.txt]{RESET}\n\
                 # not a heading\n=> /not-a-link\n"
            )
        );
    }

    #[test]
    fn test_no_escape_codes_without_color() {
        let text = render_page(&page("# H\n=> /a\n"), false);
        assert!(!text.contains('\x1b'));
    }
}
