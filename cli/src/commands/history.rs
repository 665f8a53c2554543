//! History commands

use geode_core::Browser;

use super::{numbered, parse_index, CommandResult, CommandSpec, Output};

pub const HISTORY: CommandSpec = CommandSpec {
    names: &["history", "hs"],
    usage: "history",
    summary: "List visited URLs",
    min_args: 0,
    max_args: 0,
    run: list,
};

pub const HISTORY_GOTO: CommandSpec = CommandSpec {
    names: &["hsgt", "hsg"],
    usage: "hsgt <n>",
    summary: "Open history entry n",
    min_args: 1,
    max_args: 1,
    run: goto,
};

pub const HISTORY_REMOVE: CommandSpec = CommandSpec {
    names: &["hsrm"],
    usage: "hsrm <n>",
    summary: "Remove history entry n",
    min_args: 1,
    max_args: 1,
    run: remove,
};

pub const HISTORY_CLEAR: CommandSpec = CommandSpec {
    names: &["hscla"],
    usage: "hscla",
    summary: "Clear the history",
    min_args: 0,
    max_args: 0,
    run: clear,
};

fn list(browser: &mut Browser, _args: &[&str]) -> CommandResult {
    let history = &browser.data().history;
    Ok(Output::Text(numbered(history.iter().map(String::as_str))))
}

fn goto(browser: &mut Browser, args: &[&str]) -> CommandResult {
    browser.goto_history(parse_index(args[0])?)?;
    Ok(Output::Page)
}

fn remove(browser: &mut Browser, args: &[&str]) -> CommandResult {
    let removed = browser.remove_history(parse_index(args[0])?)?;
    Ok(Output::Text(format!("Removed {removed}")))
}

fn clear(browser: &mut Browser, _args: &[&str]) -> CommandResult {
    let removed = browser.clear_history();
    Ok(Output::Text(format!("Cleared {removed} history entries")))
}
