//! Shell commands
//!
//! Every command is a [`CommandSpec`] in one static table: its names,
//! usage line, accepted argument count and handler. `help` is generated
//! from the same table.

pub mod bookmarks;
pub mod history;
pub mod links;
pub mod misc;
pub mod navigation;
pub mod stack;

use geode_core::{Browser, CoreError, NavigationError, Page};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Unknown command: {0} (try `help`)")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("Not a number: {0}")]
    NotANumber(String),

    #[error("Pager failed: {0}")]
    Pager(std::io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<NavigationError> for ShellError {
    fn from(err: NavigationError) -> Self {
        ShellError::Core(err.into())
    }
}

/// What the shell should show after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Render the current page
    Page,
    Text(String),
    Silent,
    Exit,
}

pub type CommandResult = Result<Output, ShellError>;

pub struct CommandSpec {
    /// Primary name first, then aliases
    pub names: &'static [&'static str],
    pub usage: &'static str,
    pub summary: &'static str,
    pub min_args: usize,
    pub max_args: usize,
    pub run: fn(&mut Browser, &[&str]) -> CommandResult,
}

impl CommandSpec {
    pub fn name(&self) -> &'static str {
        self.names[0]
    }

    pub fn matches(&self, word: &str) -> bool {
        self.names.iter().any(|n| *n == word)
    }

    fn validate(&self, args: &[&str]) -> Result<(), ShellError> {
        if args.len() < self.min_args || args.len() > self.max_args {
            return Err(ShellError::Usage(self.usage));
        }
        Ok(())
    }

    fn describe(&self) -> String {
        let aliases = &self.names[1..];
        if aliases.is_empty() {
            format!("{:<18} {}", self.usage, self.summary)
        } else {
            format!(
                "{:<18} {} (aliases: {})",
                self.usage,
                self.summary,
                aliases.join(", ")
            )
        }
    }
}

pub static COMMANDS: &[CommandSpec] = &[
    navigation::GOTO,
    navigation::BACK,
    navigation::FORWARD,
    navigation::FOLLOW,
    navigation::REFRESH,
    links::LINK,
    links::LINKS,
    links::CURRENT,
    links::REPRINT,
    stack::STACK,
    stack::STACK_GOTO,
    stack::STACK_CLOSE,
    stack::STACK_COMPRESS,
    stack::STACK_EMPTY,
    history::HISTORY,
    history::HISTORY_GOTO,
    history::HISTORY_REMOVE,
    history::HISTORY_CLEAR,
    bookmarks::LIST,
    bookmarks::GOTO,
    bookmarks::ADD_CURRENT,
    bookmarks::ADD_LINK,
    bookmarks::REMOVE,
    bookmarks::REMOVE_CURRENT,
    bookmarks::CLEAR,
    bookmarks::SWAP,
    misc::TRUST,
    misc::LESS,
    misc::HELP,
    misc::EXIT,
];

pub fn find(word: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.matches(word))
}

/// Parse and run one input line
pub fn dispatch(browser: &mut Browser, line: &str) -> CommandResult {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((word, args)) = tokens.split_first() else {
        return Ok(Output::Silent);
    };

    let spec = find(word).ok_or_else(|| ShellError::UnknownCommand(word.to_string()))?;
    if args == ["help"] {
        return Ok(Output::Text(spec.describe()));
    }

    spec.validate(args)?;
    tracing::debug!(command = spec.name(), ?args, "Dispatching");
    (spec.run)(browser, args)
}

/// Full command listing, or one command's usage
pub fn help_text(topic: Option<&str>) -> Result<String, ShellError> {
    match topic {
        Some(word) => find(word)
            .map(CommandSpec::describe)
            .ok_or_else(|| ShellError::UnknownCommand(word.to_string())),
        None => Ok(COMMANDS
            .iter()
            .map(CommandSpec::describe)
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

pub(crate) fn parse_index(arg: &str) -> Result<usize, ShellError> {
    arg.parse()
        .map_err(|_| ShellError::NotANumber(arg.to_string()))
}

pub(crate) fn current_page(browser: &Browser) -> Result<&Page, ShellError> {
    browser
        .current_page()
        .ok_or_else(|| NavigationError::EmptyStack.into())
}

/// `[i] item` lines, or a placeholder for an empty list
pub(crate) fn numbered<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    let lines: Vec<String> = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| format!("[{i}] {item}"))
        .collect();
    if lines.is_empty() {
        "(empty)".to_string()
    } else {
        lines.join("\n")
    }
}
