//! Bookmark commands

use geode_core::Browser;

use super::{numbered, parse_index, CommandResult, CommandSpec, Output};

pub const LIST: CommandSpec = CommandSpec {
    names: &["bml"],
    usage: "bml",
    summary: "List bookmarks",
    min_args: 0,
    max_args: 0,
    run: list,
};

pub const GOTO: CommandSpec = CommandSpec {
    names: &["bmgt", "bmg"],
    usage: "bmgt <n>",
    summary: "Open bookmark n",
    min_args: 1,
    max_args: 1,
    run: goto,
};

pub const ADD_CURRENT: CommandSpec = CommandSpec {
    names: &["bmac"],
    usage: "bmac",
    summary: "Bookmark the current page",
    min_args: 0,
    max_args: 0,
    run: add_current,
};

pub const ADD_LINK: CommandSpec = CommandSpec {
    names: &["bmal"],
    usage: "bmal <n>",
    summary: "Bookmark link n of the current page",
    min_args: 1,
    max_args: 1,
    run: add_link,
};

pub const REMOVE: CommandSpec = CommandSpec {
    names: &["bmrm"],
    usage: "bmrm <n>",
    summary: "Remove bookmark n",
    min_args: 1,
    max_args: 1,
    run: remove,
};

pub const REMOVE_CURRENT: CommandSpec = CommandSpec {
    names: &["bmrmc"],
    usage: "bmrmc",
    summary: "Remove the bookmark for the current page",
    min_args: 0,
    max_args: 0,
    run: remove_current,
};

pub const CLEAR: CommandSpec = CommandSpec {
    names: &["bmcla"],
    usage: "bmcla",
    summary: "Remove all bookmarks",
    min_args: 0,
    max_args: 0,
    run: clear,
};

pub const SWAP: CommandSpec = CommandSpec {
    names: &["bmsw"],
    usage: "bmsw <a> <b>",
    summary: "Swap bookmarks a and b",
    min_args: 2,
    max_args: 2,
    run: swap,
};

fn list(browser: &mut Browser, _args: &[&str]) -> CommandResult {
    let bookmarks = &browser.data().bookmarks;
    Ok(Output::Text(numbered(bookmarks.iter().map(String::as_str))))
}

fn goto(browser: &mut Browser, args: &[&str]) -> CommandResult {
    browser.goto_bookmark(parse_index(args[0])?)?;
    Ok(Output::Page)
}

fn add_current(browser: &mut Browser, _args: &[&str]) -> CommandResult {
    let message = if browser.bookmark_current()? {
        "Bookmarked"
    } else {
        "Already bookmarked"
    };
    Ok(Output::Text(message.to_string()))
}

fn add_link(browser: &mut Browser, args: &[&str]) -> CommandResult {
    let message = if browser.bookmark_link(parse_index(args[0])?)? {
        "Bookmarked"
    } else {
        "Already bookmarked"
    };
    Ok(Output::Text(message.to_string()))
}

fn remove(browser: &mut Browser, args: &[&str]) -> CommandResult {
    let removed = browser.remove_bookmark(parse_index(args[0])?)?;
    Ok(Output::Text(format!("Removed {removed}")))
}

fn remove_current(browser: &mut Browser, _args: &[&str]) -> CommandResult {
    let message = if browser.remove_current_bookmark()? {
        "Removed bookmark"
    } else {
        "Current page is not bookmarked"
    };
    Ok(Output::Text(message.to_string()))
}

fn clear(browser: &mut Browser, _args: &[&str]) -> CommandResult {
    let removed = browser.clear_bookmarks();
    Ok(Output::Text(format!("Cleared {removed} bookmark(s)")))
}

fn swap(browser: &mut Browser, args: &[&str]) -> CommandResult {
    let a = parse_index(args[0])?;
    let b = parse_index(args[1])?;
    browser.swap_bookmarks(a, b)?;
    Ok(Output::Text(format!("Swapped {a} and {b}")))
}
