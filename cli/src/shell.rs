//! Interactive command loop

use std::io::{BufRead, Write};

use url::Url;

use crate::commands::{self, Output};
use crate::render::render_page;
use crate::state::AppState;

pub const PROMPT: &str = "> ";

/// Result of one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Continue(Option<String>),
    Exit,
}

pub struct Shell {
    state: AppState,
    color: bool,
}

impl Shell {
    pub fn new(state: AppState, color: bool) -> Self {
        Self { state, color }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run one command line. Errors are reported as text and leave the
    /// browser as it was.
    pub fn execute(&self, line: &str) -> Step {
        let result = self.state.with_browser(|browser| {
            commands::dispatch(browser, line).map(|output| match output {
                Output::Page => Step::Continue(
                    browser
                        .current_page()
                        .map(|page| render_page(page, self.color)),
                ),
                Output::Text(text) => Step::Continue(Some(text)),
                Output::Silent => Step::Continue(None),
                Output::Exit => Step::Exit,
            })
        });

        match result {
            Ok(step) => step,
            Err(e) => {
                tracing::debug!(line, error = %e, "Command failed");
                Step::Continue(Some(format!("error: {e}")))
            }
        }
    }

    /// Open the start URL, unless it is already the current page
    pub fn open(&self, url: &Url) -> Step {
        let already_open = self
            .state
            .with_browser(|browser| browser.current_url() == Some(url));
        if already_open {
            tracing::debug!(%url, "Start URL already current");
            return self.execute("reprint");
        }
        self.execute(&format!("goto {url}"))
    }

    /// Read commands until `exit` or end of input, then save the session
    pub fn run<R: BufRead, W: Write>(&self, input: R, output: &mut W) -> anyhow::Result<()> {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        for line in input.lines() {
            match self.execute(&line?) {
                Step::Continue(Some(text)) => writeln!(output, "{text}")?,
                Step::Continue(None) => {}
                Step::Exit => break,
            }
            write!(output, "{PROMPT}")?;
            output.flush()?;
        }

        self.state.save()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geode_core::{Browser, Config, KnownHosts};
    use geode_protocol::testing::ScriptedTransport;
    use std::io::Cursor;
    use std::sync::Arc;
    use tempfile::TempDir;

    const HOME: &str = "# Home\n=> /about About\n=> gemini://other.test/ Elsewhere\n";

    fn shell(dir: &TempDir, transport: &ScriptedTransport) -> Shell {
        let mut config = Config::in_dir(dir.path());
        config.use_cache = false;
        let browser = Browser::with_transport(config, Arc::new(transport.clone()));
        Shell::new(AppState::new(browser), false)
    }

    fn text(step: Step) -> String {
        match step {
            Step::Continue(Some(text)) => text,
            other => panic!("expected text, got {other:?}"),
        }
    }

    fn site() -> ScriptedTransport {
        let transport = ScriptedTransport::new();
        transport.success("gemini://example.test/", HOME);
        transport.success("gemini://example.test/about", "# About\n");
        transport
    }

    #[test]
    fn test_goto_renders_page() {
        let dir = TempDir::new().unwrap();
        let shell = shell(&dir, &site());

        let page = text(shell.execute("gt example.test"));
        assert!(page.starts_with("[gemini://example.test/]"));
        assert!(page.contains("=> [0] (gemini) About"));
    }

    #[test]
    fn test_follow_back_forward() {
        let dir = TempDir::new().unwrap();
        let shell = shell(&dir, &site());

        shell.execute("goto example.test/");
        assert!(text(shell.execute("g 0")).contains("# About"));
        assert_eq!(text(shell.execute("lc")), "gemini://example.test/about");
        assert!(text(shell.execute("b")).contains("# Home"));
        assert!(text(shell.execute("f")).contains("# About"));

        let stack = text(shell.execute("st"));
        assert_eq!(
            stack,
            "   [0] gemini://example.test/\n-> [1] gemini://example.test/about"
        );
    }

    #[test]
    fn test_errors_leave_state_alone() {
        let dir = TempDir::new().unwrap();
        let shell = shell(&dir, &site());

        assert!(text(shell.execute("back")).starts_with("error: "));
        shell.execute("goto example.test/");
        assert!(text(shell.execute("goto missing.test/")).starts_with("error: "));
        assert!(text(shell.execute("gtl 9")).starts_with("error: "));
        assert!(text(shell.execute("gtl nine")).starts_with("error: Not a number"));
        assert!(text(shell.execute("frobnicate")).starts_with("error: Unknown command"));
        assert_eq!(text(shell.execute("bmsw 1")), "error: usage: bmsw <a> <b>");

        assert_eq!(text(shell.execute("lc")), "gemini://example.test/");
    }

    #[test]
    fn test_links_show_flags() {
        let dir = TempDir::new().unwrap();
        let shell = shell(&dir, &site());

        shell.execute("goto example.test/");
        shell.execute("bmal 1");
        shell.execute("gtl 0");
        shell.execute("back");

        assert_eq!(
            text(shell.execute("ls")),
            "[0] gemini://example.test/about (visited)\n\
             [1] gemini://other.test/ (bookmarked)"
        );
        assert_eq!(text(shell.execute("l 1")), "gemini://other.test/");
    }

    #[test]
    fn test_bookmark_and_history_commands() {
        let dir = TempDir::new().unwrap();
        let shell = shell(&dir, &site());

        shell.execute("goto example.test/");
        assert_eq!(text(shell.execute("bmac")), "Bookmarked");
        assert_eq!(text(shell.execute("bmac")), "Already bookmarked");
        shell.execute("bmal 0");
        assert_eq!(
            text(shell.execute("bml")),
            "[0] gemini://example.test/\n[1] gemini://example.test/about"
        );

        shell.execute("bmsw 0 1");
        assert_eq!(
            text(shell.execute("bml")),
            "[0] gemini://example.test/about\n[1] gemini://example.test/"
        );
        assert_eq!(text(shell.execute("bmrmc")), "Removed bookmark");
        assert!(text(shell.execute("bmgt 0")).contains("# About"));

        assert_eq!(
            text(shell.execute("hs")),
            "[0] gemini://example.test/\n[1] gemini://example.test/about"
        );
        assert_eq!(
            text(shell.execute("hsrm 0")),
            "Removed gemini://example.test/"
        );
        assert_eq!(text(shell.execute("hscla")), "Cleared 1 history entries");
        assert_eq!(text(shell.execute("hs")), "(empty)");
        assert_eq!(text(shell.execute("bmcla")), "Cleared 1 bookmark(s)");
    }

    #[test]
    fn test_stack_editing() {
        let dir = TempDir::new().unwrap();
        let shell = shell(&dir, &site());

        shell.execute("goto example.test/");
        shell.execute("gtl 0");
        shell.execute("stgt 0");
        assert_eq!(text(shell.execute("stcl")), "Closed 1 page(s)");
        assert_eq!(text(shell.execute("stem")), "Emptied stack (1 page(s))");
        assert_eq!(text(shell.execute("stack")), "(empty)");
        assert!(text(shell.execute("rp")).starts_with("error: "));
    }

    #[test]
    fn test_help_for_command() {
        let dir = TempDir::new().unwrap();
        let shell = shell(&dir, &site());

        assert!(text(shell.execute("bmsw help")).starts_with("bmsw <a> <b>"));
        assert!(text(shell.execute("help")).contains("goto <url>"));
        assert_eq!(shell.execute("   "), Step::Continue(None));
        assert_eq!(shell.execute("quit"), Step::Exit);
    }

    #[test]
    fn test_trust_shows_forgotten_fingerprint() {
        let dir = TempDir::new().unwrap();
        let known_hosts = KnownHosts::new(Config::in_dir(dir.path()).known_hosts_path);
        known_hosts.verify("example.test", b"cert").unwrap();
        let pinned = known_hosts.fingerprint_of("example.test").unwrap().unwrap();
        let shell = shell(&dir, &site());

        let output = text(shell.execute("trust example.test"));
        assert!(output.starts_with(&format!("Forgot certificate {pinned} for example.test")));
        assert_eq!(
            text(shell.execute("trust example.test")),
            "No certificate pinned for example.test"
        );
        assert_eq!(known_hosts.fingerprint_of("example.test").unwrap(), None);
    }

    #[test]
    fn test_less_needs_a_page() {
        let dir = TempDir::new().unwrap();
        let shell = shell(&dir, &site());

        let output = text(shell.execute("less"));
        assert!(output.starts_with("error: "));
        assert!(output.contains(&geode_core::NavigationError::EmptyStack.to_string()));
        assert_eq!(text(shell.execute("less now")), "error: usage: less");
    }

    #[test]
    fn test_open_skips_current_url() {
        let dir = TempDir::new().unwrap();
        let transport = site();
        let shell = shell(&dir, &transport);

        let url = Url::parse("gemini://example.test/").unwrap();
        shell.open(&url);
        assert!(text(shell.open(&url)).contains("# Home"));
        assert_eq!(transport.connections().len(), 1);
    }

    #[test]
    fn test_run_saves_on_exit() {
        let dir = TempDir::new().unwrap();
        let shell = shell(&dir, &site());

        let input = Cursor::new("goto example.test/\nbmac\nexit\nlc\n");
        let mut output = Vec::new();
        shell.run(input, &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with(PROMPT));
        assert!(output.contains("Bookmarked"));
        assert!(!output.contains("\ngemini://example.test/\n"));

        let saved = shell.state().session().load().unwrap().unwrap();
        assert_eq!(saved.data.bookmarks, vec!["gemini://example.test/"]);
    }

    #[test]
    fn test_run_saves_on_eof() {
        let dir = TempDir::new().unwrap();
        let shell = shell(&dir, &site());

        let mut output = Vec::new();
        shell
            .run(Cursor::new("goto example.test/\n"), &mut output)
            .unwrap();

        let saved = shell.state().session().load().unwrap().unwrap();
        assert_eq!(saved.data.history, vec!["gemini://example.test/"]);
        assert_eq!(
            saved.navigation.unwrap().current_url,
            "gemini://example.test/"
        );
    }
}
