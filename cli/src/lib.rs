//! Geode - command-line Gemini client
//!
//! `geode <url>` prints one page. `geode -i` starts the interactive shell,
//! which keeps bookmarks, history and (with `--load-last`) the navigation
//! stack across runs.

pub mod commands;
pub mod render;
pub mod shell;
mod signals;
pub mod state;

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use geode_core::{resolve_input, Browser, Config};

use shell::{Shell, Step};
use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "geode", version, about = "A Gemini protocol client")]
pub struct Cli {
    /// URL to open; the gemini:// prefix may be left out
    pub url: Option<String>,

    /// Start the interactive shell
    #[arg(short, long)]
    pub interactive: bool,

    /// Restore the navigation stack from the last session
    #[arg(long, requires = "interactive")]
    pub load_last: bool,

    /// Directory holding the session file
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Root of the document cache
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Trust-on-first-use fingerprint file
    #[arg(long, value_name = "FILE")]
    pub known_hosts: Option<PathBuf>,

    /// Always fetch from the network
    #[arg(long)]
    pub no_cache: bool,

    #[arg(long, value_name = "N")]
    pub max_redirects: Option<usize>,

    /// Disable ANSI colours
    #[arg(long)]
    pub no_color: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn", value_name = "FILTER")]
    pub log: String,
}

impl Cli {
    pub fn config(&self) -> Config {
        let mut config = Config::default();
        if let Some(dir) = &self.data_dir {
            config.set_data_dir(dir);
        }
        if let Some(dir) = &self.cache_dir {
            config.cache_dir = dir.clone();
        }
        if let Some(path) = &self.known_hosts {
            config.known_hosts_path = path.clone();
        }
        if let Some(max) = self.max_redirects {
            config.max_redirects = max;
        }
        config.use_cache = !self.no_cache;
        config
    }

    fn color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    geode_core::init_logging(&cli.log);

    let config = cli.config();
    tracing::debug!(?config, "Starting");

    if cli.interactive {
        interactive(&cli, config)
    } else {
        one_shot(&cli, config)
    }
}

/// Fetch and print one page. Only the cache and the trust store change.
fn one_shot(cli: &Cli, config: Config) -> anyhow::Result<()> {
    let Some(input) = cli.url.as_deref() else {
        bail!("a URL is required unless --interactive is given");
    };
    let url = resolve_input(input)?;

    let mut browser = Browser::new(config).context("initializing browser")?;
    // Bookmarks and history only colour the links here
    if let Err(e) = browser.restore(false) {
        tracing::warn!(error = %e, "Ignoring unreadable session file");
    }

    let page = browser.fetch(&url)?;
    println!("{}", render::render_page(&page, cli.color()));
    Ok(())
}

fn interactive(cli: &Cli, config: Config) -> anyhow::Result<()> {
    let mut browser = Browser::new(config).context("initializing browser")?;
    if let Err(e) = browser.restore(cli.load_last) {
        tracing::warn!(error = %e, "Starting with an empty session");
        eprintln!("warning: could not load session: {e}");
    }

    let state = AppState::new(browser);
    signals::spawn_save_on_signal(state.session().clone())
        .context("installing signal handler")?;

    let shell = Shell::new(state, cli.color());
    if let Some(input) = cli.url.as_deref() {
        match resolve_input(input) {
            Ok(url) => print_step(shell.open(&url)),
            Err(e) => eprintln!("error: {e}"),
        }
    }

    tracing::info!("Geode shell started");
    let stdin = std::io::stdin();
    shell.run(stdin.lock(), &mut std::io::stdout())
}

fn print_step(step: Step) {
    if let Step::Continue(Some(text)) = step {
        println!("{text}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "geode",
            "-i",
            "--load-last",
            "--data-dir",
            "/tmp/geode-data",
            "--cache-dir",
            "/tmp/geode-cache",
            "--known-hosts",
            "/tmp/hosts",
            "--no-cache",
            "--max-redirects",
            "2",
            "example.test",
        ]);
        assert!(cli.interactive && cli.load_last);
        assert_eq!(cli.url.as_deref(), Some("example.test"));

        let config = cli.config();
        assert_eq!(
            config.state_path,
            PathBuf::from("/tmp/geode-data/browser_state.json")
        );
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/geode-cache"));
        assert_eq!(config.known_hosts_path, PathBuf::from("/tmp/hosts"));
        assert_eq!(config.max_redirects, 2);
        assert!(!config.use_cache);
    }

    #[test]
    fn test_load_last_requires_interactive() {
        assert!(Cli::try_parse_from(["geode", "--load-last", "example.test"]).is_err());
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["geode", "example.test"]);
        assert!(!cli.interactive);
        assert_eq!(cli.log, "warn");
        let config = cli.config();
        assert_eq!(config.max_redirects, 5);
        assert!(config.use_cache);
    }
}
