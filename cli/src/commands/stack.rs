//! Navigation stack editing

use geode_core::Browser;

use super::{parse_index, CommandResult, CommandSpec, Output};

pub const STACK: CommandSpec = CommandSpec {
    names: &["stack", "st"],
    usage: "stack",
    summary: "List the navigation stack",
    min_args: 0,
    max_args: 0,
    run: list,
};

pub const STACK_GOTO: CommandSpec = CommandSpec {
    names: &["stgt", "stg"],
    usage: "stgt <n>",
    summary: "Jump to stack entry n",
    min_args: 1,
    max_args: 1,
    run: jump,
};

pub const STACK_CLOSE: CommandSpec = CommandSpec {
    names: &["stcl"],
    usage: "stcl",
    summary: "Drop every page after the current one",
    min_args: 0,
    max_args: 0,
    run: close,
};

pub const STACK_COMPRESS: CommandSpec = CommandSpec {
    names: &["stcmp"],
    usage: "stcmp",
    summary: "Drop every page before the current one",
    min_args: 0,
    max_args: 0,
    run: compress,
};

pub const STACK_EMPTY: CommandSpec = CommandSpec {
    names: &["stem"],
    usage: "stem",
    summary: "Empty the navigation stack",
    min_args: 0,
    max_args: 0,
    run: empty,
};

fn list(browser: &mut Browser, _args: &[&str]) -> CommandResult {
    let nav = browser.navigation();
    if nav.is_empty() {
        return Ok(Output::Text("(empty)".to_string()));
    }

    let lines: Vec<String> = nav
        .pages()
        .iter()
        .enumerate()
        .map(|(i, page)| {
            let marker = if i == nav.position() { "->" } else { "  " };
            format!("{marker} [{i}] {}", page.url)
        })
        .collect();
    Ok(Output::Text(lines.join("\n")))
}

fn jump(browser: &mut Browser, args: &[&str]) -> CommandResult {
    browser.jump_to(parse_index(args[0])?)?;
    Ok(Output::Page)
}

fn close(browser: &mut Browser, _args: &[&str]) -> CommandResult {
    let removed = browser.close_below();
    Ok(Output::Text(format!("Closed {removed} page(s)")))
}

fn compress(browser: &mut Browser, _args: &[&str]) -> CommandResult {
    let removed = browser.compress_above();
    Ok(Output::Text(format!("Removed {removed} earlier page(s)")))
}

fn empty(browser: &mut Browser, _args: &[&str]) -> CommandResult {
    let removed = browser.empty_stack();
    Ok(Output::Text(format!("Emptied stack ({removed} page(s))")))
}
