//! External scraper process runner.
//!
//! The scraper is an opaque Python script. It is started without a shell,
//! its stdout and stderr are drained line by line while it runs, and every
//! line can be forwarded to a caller as a [`RunEvent`] for live display.

use crate::error::ScraperError;
use async_trait::async_trait;
use regex::Regex;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::LazyLock;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc::UnboundedSender;

/// Progress lines printed by the scraper: `progress: 3/10` or `final: 10/10`.
static PROGRESS_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(progress|final):\s*([0-9]+)\s*/\s*([0-9]+)\s*$")
        .expect("Invalid PROGRESS_LINE_REGEX")
});

/// Hides the console window the child would otherwise open on Windows.
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// A request to run a script with an interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    /// Interpreter executable.
    pub program: PathBuf,
    /// Script passed as the first argument.
    pub script: PathBuf,
    /// Arguments after the script.
    pub args: Vec<String>,
    /// Working directory for the child.
    pub cwd: Option<PathBuf>,
}

impl RunRequest {
    /// Creates a request with no arguments and the current working directory.
    pub fn new(program: impl Into<PathBuf>, script: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            script: script.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Appends an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Sets the working directory.
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }
}

/// Output of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    /// Exit code, or -1 when the process was terminated by a signal.
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl RunResult {
    /// Returns true if the process exited with code 0.
    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// Best available explanation of a failure: stderr, else stdout.
    pub fn failure_detail(&self) -> String {
        [&self.stderr, &self.stdout]
            .into_iter()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .unwrap_or("Unknown error")
            .to_string()
    }
}

/// Incremental events emitted while a process runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// The process was spawned.
    Start,
    /// One line of standard output.
    Stdout(String),
    /// One line of standard error.
    Stderr(String),
    /// The process could not be started or waited on.
    Error(String),
    /// The process exited with this code.
    Done(i32),
}

/// Progress reported by the scraper while it downloads volume covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeProgress {
    pub current: u32,
    pub total: u32,
    /// Set on the scraper's last progress line.
    pub finished: bool,
}

/// Parses a scraper progress line.
pub fn parse_progress_line(line: &str) -> Option<ScrapeProgress> {
    let caps = PROGRESS_LINE_REGEX.captures(line)?;
    Some(ScrapeProgress {
        current: caps[2].parse().ok()?,
        total: caps[3].parse().ok()?,
        finished: &caps[1] == "final",
    })
}

/// Runs external processes.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Runs the request to completion.
    ///
    /// A non-zero exit is not an error here; it is reported in
    /// [`RunResult::code`]. Only a failure to start or wait on the process
    /// returns `Err`.
    async fn run(
        &self,
        request: &RunRequest,
        events: Option<UnboundedSender<RunEvent>>,
    ) -> Result<RunResult, ScraperError>;
}

/// [`ProcessRunner`] backed by `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonRunner;

impl PythonRunner {
    pub fn new() -> Self {
        Self
    }

    fn command(request: &RunRequest) -> Command {
        let mut command = Command::new(&request.program);
        command
            .arg(&request.script)
            .args(&request.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(cwd) = &request.cwd {
            command.current_dir(cwd);
        }

        #[cfg(windows)]
        command.creation_flags(CREATE_NO_WINDOW);

        command
    }
}

#[async_trait]
impl ProcessRunner for PythonRunner {
    async fn run(
        &self,
        request: &RunRequest,
        events: Option<UnboundedSender<RunEvent>>,
    ) -> Result<RunResult, ScraperError> {
        let emit = |event: RunEvent| {
            if let Some(tx) = &events {
                // Receiver gone means nobody is watching; keep running
                let _ = tx.send(event);
            }
        };

        let mut child = match Self::command(request).spawn() {
            Ok(child) => child,
            Err(e) => {
                emit(RunEvent::Error(e.to_string()));
                return Err(ScraperError::Spawn(e));
            }
        };
        emit(RunEvent::Start);

        // Both pipes are drained together so a full stderr can't block stdout
        let (stdout, stderr) = futures::future::join(
            drain_lines(child.stdout.take(), RunEvent::Stdout, events.as_ref()),
            drain_lines(child.stderr.take(), RunEvent::Stderr, events.as_ref()),
        )
        .await;

        let status = match child.wait().await {
            Ok(status) => status,
            Err(e) => {
                emit(RunEvent::Error(e.to_string()));
                return Err(ScraperError::Spawn(e));
            }
        };

        let code = status.code().unwrap_or(-1);
        emit(RunEvent::Done(code));

        Ok(RunResult {
            code,
            stdout,
            stderr,
        })
    }
}

/// Reads a pipe to the end, forwarding each line as an event.
async fn drain_lines<R>(
    pipe: Option<R>,
    wrap: fn(String) -> RunEvent,
    events: Option<&UnboundedSender<RunEvent>>,
) -> String
where
    R: AsyncRead + Unpin,
{
    let Some(pipe) = pipe else {
        return String::new();
    };

    let mut reader = BufReader::new(pipe);
    let mut output = String::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                let text = String::from_utf8_lossy(&buf);
                output.push_str(&text);
                if let Some(tx) = events {
                    let line = text.trim_end_matches(['\r', '\n']).to_string();
                    let _ = tx.send(wrap(line));
                }
            }
        }
    }

    output
}
