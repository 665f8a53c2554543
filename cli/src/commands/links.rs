//! Inspecting the current page

use geode_core::{Browser, Link};

use super::{current_page, parse_index, CommandResult, CommandSpec, Output};

pub const LINK: CommandSpec = CommandSpec {
    names: &["link", "l"],
    usage: "link <n>",
    summary: "Show the resolved URL of link n",
    min_args: 1,
    max_args: 1,
    run: link,
};

pub const LINKS: CommandSpec = CommandSpec {
    names: &["links", "ls"],
    usage: "links",
    summary: "List the links of the current page",
    min_args: 0,
    max_args: 0,
    run: links,
};

pub const CURRENT: CommandSpec = CommandSpec {
    names: &["lc"],
    usage: "lc",
    summary: "Show the current URL",
    min_args: 0,
    max_args: 0,
    run: current,
};

pub const REPRINT: CommandSpec = CommandSpec {
    names: &["reprint", "rp"],
    usage: "reprint",
    summary: "Print the current page again",
    min_args: 0,
    max_args: 0,
    run: reprint,
};

fn link(browser: &mut Browser, args: &[&str]) -> CommandResult {
    let url = browser.link_url(parse_index(args[0])?)?;
    Ok(Output::Text(url.to_string()))
}

fn links(browser: &mut Browser, _args: &[&str]) -> CommandResult {
    let page = current_page(browser)?;
    if page.links.is_empty() {
        return Ok(Output::Text("(no links)".to_string()));
    }

    let lines: Vec<String> = page
        .links
        .iter()
        .map(|link| {
            let target = link
                .resolve(&page.url)
                .map(String::from)
                .unwrap_or_else(|| link.target.clone());
            format!("[{}] {}{}", link.ordinal, target, markers(link))
        })
        .collect();
    Ok(Output::Text(lines.join("\n")))
}

fn current(browser: &mut Browser, _args: &[&str]) -> CommandResult {
    Ok(Output::Text(current_page(browser)?.url.to_string()))
}

fn reprint(browser: &mut Browser, _args: &[&str]) -> CommandResult {
    current_page(browser)?;
    Ok(Output::Page)
}

fn markers(link: &Link) -> &'static str {
    match (link.bookmarked, link.visited) {
        (true, true) => " (bookmarked, visited)",
        (true, false) => " (bookmarked)",
        (false, true) => " (visited)",
        (false, false) => "",
    }
}
