use reqwest::Url;
use std::io::Write;
use std::process::{Command, Stdio};
use thiserror::Error;
use webbrowser::Browser;

const SHARE_INTENT_URL: &str = "https://twitter.com/intent/tweet";

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("{0} is not available here")]
    Unavailable(&'static str),
    #[error("share helper failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("{program} exited with {status}")]
    Failed {
        program: &'static str,
        status: std::process::ExitStatus,
    },
    #[error("could not build share link: {0}")]
    Link(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareOutcome {
    /// Handed off to the platform share page
    Shared,
    Copied,
    /// Nothing worked; the text is shown in the app instead
    Displayed(String),
}

/// One way of getting the summary out of the app
pub trait ShareChannel {
    fn name(&self) -> &'static str;
    fn send(&self, text: &str) -> Result<(), ShareError>;
}

/// Opens the share page in the default browser
pub struct BrowserIntent;

impl ShareChannel for BrowserIntent {
    fn name(&self) -> &'static str {
        "browser"
    }

    fn send(&self, text: &str) -> Result<(), ShareError> {
        if !Browser::is_available() {
            return Err(ShareError::Unavailable("browser"));
        }
        let url = Url::parse_with_params(SHARE_INTENT_URL, &[("text", text)])
            .map_err(|e| ShareError::Link(e.to_string()))?;
        webbrowser::open(url.as_str())?;
        Ok(())
    }
}

/// Pipes the text into a clipboard helper program
pub struct ClipboardCommand {
    program: &'static str,
    args: &'static [&'static str],
}

impl ClipboardCommand {
    pub const fn new(program: &'static str, args: &'static [&'static str]) -> Self {
        Self { program, args }
    }

    /// Helpers for Wayland, X11 and macOS, tried in that order
    pub fn platform_defaults() -> Vec<Self> {
        vec![
            Self::new("wl-copy", &[]),
            Self::new("xclip", &["-selection", "clipboard"]),
            Self::new("pbcopy", &[]),
        ]
    }
}

impl ShareChannel for ClipboardCommand {
    fn name(&self) -> &'static str {
        self.program
    }

    fn send(&self, text: &str) -> Result<(), ShareError> {
        let mut child = Command::new(self.program)
            .args(self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Ok(()),
        };
        // stdin is closed by now, so the helper exits and can be reaped
        let status = child.wait()?;
        written?;
        if status.success() {
            Ok(())
        } else {
            Err(ShareError::Failed {
                program: self.program,
                status,
            })
        }
    }
}

/// Share first, then clipboard, then show the text
pub struct ShareCascade {
    share: Vec<Box<dyn ShareChannel>>,
    clipboard: Vec<Box<dyn ShareChannel>>,
}

impl Default for ShareCascade {
    fn default() -> Self {
        Self::new(
            vec![Box::new(BrowserIntent) as Box<dyn ShareChannel>],
            ClipboardCommand::platform_defaults()
                .into_iter()
                .map(|c| Box::new(c) as Box<dyn ShareChannel>)
                .collect(),
        )
    }
}

impl ShareCascade {
    pub fn new(share: Vec<Box<dyn ShareChannel>>, clipboard: Vec<Box<dyn ShareChannel>>) -> Self {
        Self { share, clipboard }
    }

    pub fn share(&self, text: &str) -> ShareOutcome {
        if first_success(&self.share, text) {
            return ShareOutcome::Shared;
        }
        if first_success(&self.clipboard, text) {
            return ShareOutcome::Copied;
        }
        ShareOutcome::Displayed(text.to_string())
    }
}

fn first_success(channels: &[Box<dyn ShareChannel>], text: &str) -> bool {
    channels.iter().any(|channel| match channel.send(text) {
        Ok(()) => true,
        Err(e) => {
            log::info!("share via {} failed: {e}", channel.name());
            false
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Fake {
        name: &'static str,
        works: bool,
        seen: Rc<RefCell<Vec<String>>>,
    }

    impl ShareChannel for Fake {
        fn name(&self) -> &'static str {
            self.name
        }

        fn send(&self, text: &str) -> Result<(), ShareError> {
            self.seen.borrow_mut().push(format!("{}:{text}", self.name));
            if self.works {
                Ok(())
            } else {
                Err(ShareError::Unavailable(self.name))
            }
        }
    }

    fn fake(name: &'static str, works: bool, seen: &Rc<RefCell<Vec<String>>>) -> Box<dyn ShareChannel> {
        Box::new(Fake {
            name,
            works,
            seen: Rc::clone(seen),
        })
    }

    #[test]
    fn test_share_succeeds_first() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let cascade = ShareCascade::new(
            vec![fake("share", true, &seen)],
            vec![fake("clip", true, &seen)],
        );
        assert_eq!(cascade.share("hi"), ShareOutcome::Shared);
        assert_eq!(*seen.borrow(), vec!["share:hi".to_string()]);
    }

    #[test]
    fn test_falls_back_to_clipboard() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let cascade = ShareCascade::new(
            vec![fake("share", false, &seen)],
            vec![fake("wl", false, &seen), fake("x11", true, &seen)],
        );
        assert_eq!(cascade.share("hi"), ShareOutcome::Copied);
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn test_falls_back_to_display() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let cascade = ShareCascade::new(vec![fake("share", false, &seen)], vec![]);
        assert_eq!(
            cascade.share("62 wpm"),
            ShareOutcome::Displayed("62 wpm".into())
        );
    }

    #[test]
    fn test_missing_clipboard_program_is_an_error() {
        let cmd = ClipboardCommand::new("phrasedash-no-such-helper", &[]);
        assert!(cmd.send("text").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_helper_that_stops_reading_reports_broken_pipe() {
        // `true` exits without reading, so a write larger than the pipe buffer fails
        let cmd = ClipboardCommand::new("true", &[]);
        let text = "x".repeat(1 << 20);
        let err = cmd.send(&text).unwrap_err();
        assert!(
            matches!(&err, ShareError::Io(e) if e.kind() == std::io::ErrorKind::BrokenPipe),
            "unexpected error: {err}"
        );
    }
}
