//! Moving between pages

use geode_core::Browser;

use super::{parse_index, CommandResult, CommandSpec, Output};

pub const GOTO: CommandSpec = CommandSpec {
    names: &["goto", "gt"],
    usage: "goto <url>",
    summary: "Open a URL",
    min_args: 1,
    max_args: 1,
    run: goto,
};

pub const BACK: CommandSpec = CommandSpec {
    names: &["back", "b"],
    usage: "back",
    summary: "Go back one page",
    min_args: 0,
    max_args: 0,
    run: back,
};

pub const FORWARD: CommandSpec = CommandSpec {
    names: &["forward", "fd", "f"],
    usage: "forward",
    summary: "Go forward one page",
    min_args: 0,
    max_args: 0,
    run: forward,
};

pub const FOLLOW: CommandSpec = CommandSpec {
    names: &["gtl", "g"],
    usage: "gtl <n>",
    summary: "Follow link n of the current page",
    min_args: 1,
    max_args: 1,
    run: follow,
};

pub const REFRESH: CommandSpec = CommandSpec {
    names: &["rfsh"],
    usage: "rfsh",
    summary: "Refetch the current page, bypassing the cache",
    min_args: 0,
    max_args: 0,
    run: refresh,
};

fn goto(browser: &mut Browser, args: &[&str]) -> CommandResult {
    browser.navigate(args[0])?;
    Ok(Output::Page)
}

fn back(browser: &mut Browser, _args: &[&str]) -> CommandResult {
    browser.go_back()?;
    Ok(Output::Page)
}

fn forward(browser: &mut Browser, _args: &[&str]) -> CommandResult {
    browser.go_forward()?;
    Ok(Output::Page)
}

fn follow(browser: &mut Browser, args: &[&str]) -> CommandResult {
    browser.follow_link(parse_index(args[0])?)?;
    Ok(Output::Page)
}

fn refresh(browser: &mut Browser, _args: &[&str]) -> CommandResult {
    browser.refresh()?;
    Ok(Output::Page)
}
