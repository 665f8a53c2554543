//! Trust overrides, paging, help and exit

use std::io::{self, Write};
use std::process::{Command, Stdio};

use geode_core::Browser;

use super::{current_page, help_text, CommandResult, CommandSpec, Output, ShellError};
use crate::render::render_page;

const PAGER: &str = "less";

pub const TRUST: CommandSpec = CommandSpec {
    names: &["trust"],
    usage: "trust <host>",
    summary: "Forget the pinned certificate of a host",
    min_args: 1,
    max_args: 1,
    run: trust,
};

pub const LESS: CommandSpec = CommandSpec {
    names: &["less"],
    usage: "less",
    summary: "Open the current page in less",
    min_args: 0,
    max_args: 0,
    run: less,
};

pub const HELP: CommandSpec = CommandSpec {
    names: &["help"],
    usage: "help [cmd]",
    summary: "List commands, or describe one",
    min_args: 0,
    max_args: 1,
    run: help,
};

pub const EXIT: CommandSpec = CommandSpec {
    names: &["exit", "quit"],
    usage: "exit",
    summary: "Save the session and leave",
    min_args: 0,
    max_args: 0,
    run: exit,
};

fn trust(browser: &mut Browser, args: &[&str]) -> CommandResult {
    let host = args[0];
    let Some(pinned) = browser.pinned_fingerprint(host)? else {
        return Ok(Output::Text(format!("No certificate pinned for {host}")));
    };

    browser.forget_host(host)?;
    Ok(Output::Text(format!(
        "Forgot certificate {pinned} for {host}; it will be pinned again on next visit"
    )))
}

fn less(browser: &mut Browser, _args: &[&str]) -> CommandResult {
    let rendered = render_page(current_page(browser)?, true);
    page_through(PAGER, &["-R"], &rendered).map_err(ShellError::Pager)?;
    Ok(Output::Silent)
}

fn help(_browser: &mut Browser, args: &[&str]) -> CommandResult {
    Ok(Output::Text(help_text(args.first().copied())?))
}

fn exit(_browser: &mut Browser, _args: &[&str]) -> CommandResult {
    Ok(Output::Exit)
}

/// Feed `text` to `program` on the terminal and wait for it to quit
fn page_through(program: &str, args: &[&str], text: &str) -> io::Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        match stdin.write_all(text.as_bytes()) {
            // Quitting the pager early closes the pipe
            Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e),
            _ => {}
        }
    }

    let status = child.wait()?;
    if !status.success() {
        return Err(io::Error::other(format!("{program} exited with {status}")));
    }
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_page_through_runs_program() {
        assert!(page_through("true", &[], "# page\n").is_ok());
        assert!(page_through("false", &[], "# page\n").is_err());
        assert!(page_through("geode-no-such-pager", &[], "").is_err());
    }
}
