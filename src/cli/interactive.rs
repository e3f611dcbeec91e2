//! Interactive session - the terminal stand-in for the single-screen app.
//!
//! Reads commands from stdin, runs them against an [`AppState`] and renders
//! the resulting state after each one.

use std::io::{self, Write};
use std::path::PathBuf;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use crate::acquire::{CameraPicker, ImageSource, LibraryPicker};
use crate::analysis::Analyzer;
use crate::session::{self, AppState};

/// Commands understood by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Ask which source to use, then pick
    Pick,
    /// Take a picture
    Camera,
    /// Choose an existing photo, asking for the path if not given
    Library(Option<PathBuf>),
    /// Describe the selected image
    Analyze,
    /// Show the current image and result
    Status,
    Help,
    Quit,
}

/// Parse a line of input into a SessionCommand.
///
/// # Returns
/// - `Ok(None)` for empty input
/// - `Ok(Some(command))` for a known command or a bare path
/// - `Err(message)` for an unknown slash command
pub fn parse_input(input: &str) -> Result<Option<SessionCommand>, String> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Ok(None);
    }

    if !trimmed.starts_with('/') {
        // Anything else is taken as a photo path.
        return Ok(Some(SessionCommand::Library(Some(PathBuf::from(trimmed)))));
    }

    let (name, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (trimmed, ""),
    };

    let command = match name.to_lowercase().as_str() {
        "/pick" => SessionCommand::Pick,
        "/camera" => SessionCommand::Camera,
        "/library" if rest.is_empty() => SessionCommand::Library(None),
        "/library" => SessionCommand::Library(Some(PathBuf::from(rest))),
        "/analyze" | "/analyse" => SessionCommand::Analyze,
        "/status" => SessionCommand::Status,
        "/help" => SessionCommand::Help,
        "/quit" | "/exit" => SessionCommand::Quit,
        _ => {
            return Err(format!(
                "Unknown command: {}\nAvailable commands: /pick, /camera, /library [path], /analyze, /status, /help, /quit",
                name
            ))
        }
    };

    Ok(Some(command))
}

/// Parse the answer to "Take Picture or Choose from Camera Roll?".
///
/// Anything unrecognised backs out of the chooser.
pub fn parse_source_choice(input: &str) -> Option<ImageSource> {
    match input.trim().to_lowercase().as_str() {
        "1" | "camera" | "take" | "take picture" => Some(ImageSource::Camera),
        "2" | "library" | "roll" | "camera roll" | "choose" => Some(ImageSource::Library),
        _ => None,
    }
}

/// State that lives for the whole session.
pub struct Session {
    analyzer: Analyzer,
    camera: CameraPicker,
    state: AppState,
}

impl Session {
    pub fn new(analyzer: Analyzer, camera: CameraPicker) -> Self {
        Self {
            analyzer,
            camera,
            state: AppState::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Read and run commands until `/quit` or end of input.
    pub async fn run(mut self) -> io::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        print_status("snapsight - type /help for commands, or paste a photo path.");
        if !self.analyzer.has_api_key() {
            print_status("Note: GROQ_API_KEY is not set, /analyze will fail until it is.");
        }

        loop {
            print_prompt();
            let Some(line) = lines.next_line().await? else {
                break;
            };

            let command = match parse_input(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(message) => {
                    print_status(&message);
                    continue;
                }
            };

            if command == SessionCommand::Quit {
                break;
            }

            self.handle(command, &mut lines).await?;
        }

        Ok(())
    }

    /// Run one command. Follow-up answers (source, path) are read from `lines`.
    pub async fn handle<R: AsyncBufRead + Unpin>(
        &mut self,
        command: SessionCommand,
        lines: &mut Lines<R>,
    ) -> io::Result<()> {
        match command {
            SessionCommand::Pick => {
                print_status(&format!(
                    "Choose Image Source: [1] {}  [2] {}",
                    ImageSource::Camera.label(),
                    ImageSource::Library.label()
                ));
                print_prompt();
                let answer = lines.next_line().await?.unwrap_or_default();
                match parse_source_choice(&answer) {
                    Some(ImageSource::Camera) => self.pick_from_camera().await,
                    Some(ImageSource::Library) => {
                        let path = ask_path(lines).await?;
                        self.pick_from_library(path).await;
                    }
                    None => print_status("Cancelled."),
                }
            }
            SessionCommand::Camera => self.pick_from_camera().await,
            SessionCommand::Library(Some(path)) => self.pick_from_library(path).await,
            SessionCommand::Library(None) => {
                let path = ask_path(lines).await?;
                self.pick_from_library(path).await;
            }
            SessionCommand::Analyze => {
                print_status("Analyzing image...");
                let state = std::mem::take(&mut self.state);
                self.state = session::analyze(state, &self.analyzer).await;
                if self.state.notice().is_none() {
                    print_status(self.state.result());
                }
            }
            SessionCommand::Status => render_status(&self.state),
            SessionCommand::Help => print_help(),
            SessionCommand::Quit => {}
        }

        self.show_notice();
        Ok(())
    }

    async fn pick_from_camera(&mut self) {
        print_status("Capturing...");
        let state = std::mem::take(&mut self.state);
        self.state = session::pick(state, &self.camera).await;
        self.report_selection();
    }

    async fn pick_from_library(&mut self, path: PathBuf) {
        let state = std::mem::take(&mut self.state);
        self.state = session::pick(state, &LibraryPicker::new(path)).await;
        self.report_selection();
    }

    fn report_selection(&self) {
        if self.state.notice().is_none() {
            if let Some(image) = self.state.image() {
                print_status(&format!("Selected: {}", image));
            }
        }
    }

    /// Print the pending notice once and clear it.
    fn show_notice(&mut self) {
        if let Some(notice) = self.state.notice() {
            print_status(&format!("{}: {}", notice.title, notice.message));
            let state = std::mem::take(&mut self.state);
            self.state = state.dismiss_notice();
        }
    }
}

async fn ask_path<R: AsyncBufRead + Unpin>(lines: &mut Lines<R>) -> io::Result<PathBuf> {
    print_status("Path to photo (empty to cancel):");
    print_prompt();
    let answer = lines.next_line().await?.unwrap_or_default();
    Ok(PathBuf::from(answer.trim()))
}

fn render_status(state: &AppState) {
    match state.image() {
        Some(image) => print_status(&format!("Image:  {}", image)),
        None => print_status("Image:  (none selected)"),
    }
    if state.result().is_empty() {
        print_status("Result: (none)");
    } else {
        print_status(&format!("Result: {}", state.result()));
    }
}

fn print_help() {
    print_status(
        "Commands:
  /pick            Choose between camera and library
  /camera          Take a picture
  /library [path]  Choose an existing photo
  <path>           Same as /library <path>
  /analyze         Describe the selected photo
  /status          Show the selected photo and last result
  /quit            Exit",
    );
}

/// Shows `> ` to indicate ready for input.
fn print_prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

fn print_status(message: &str) {
    println!("{}", message);
}
