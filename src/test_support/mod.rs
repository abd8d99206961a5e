//! Test utilities for lifecycle tests.
//!
//! [`RecordingRunner`] stands in for [`SystemRunner`](crate::util::process::SystemRunner)
//! so tests can drive `npm`/`npx` invocations without spawning anything.
//! [`StaticServer`] plays a distribution mirror for download tests, and
//! [`capture_logs`] records tracing output for assertions on notices.
//!
//! # Example
//!
//! ```rust,ignore
//! let runner = RecordingRunner::new().fail("tailwindcss -i", 1, "CssSyntaxError");
//! let mut cmd = ToolchainCommand::new(request, paths).with_runner(runner.clone());
//! assert!(cmd.build().is_err());
//! assert_eq!(runner.command_lines().len(), 1);
//! ```

use std::collections::HashMap;
use std::ffi::OsString;
use std::io::{self, BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::{bail, Result};
use tracing_subscriber::fmt::MakeWriter;

use crate::util::process::{CommandRunner, ProcessBuilder, ProcessOutput};

/// A command the runner was asked to execute.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub path_env: Option<OsString>,
    /// Run attached (watch) rather than captured
    pub attached: bool,
}

impl RecordedCall {
    /// Program and arguments joined by spaces.
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

#[derive(Debug, Clone)]
enum Scripted {
    Output(ProcessOutput),
    SpawnError(String),
}

#[derive(Debug, Default)]
struct RunnerState {
    calls: Vec<RecordedCall>,
    scripts: Vec<(String, Scripted)>,
}

/// Mock command runner that records every invocation.
///
/// Responses are scripted by substring of the command line; the first
/// matching script wins. Unscripted commands succeed with empty output.
/// Clones share state, so a test can keep one handle and give another to
/// the code under test.
#[derive(Debug, Clone, Default)]
pub struct RecordingRunner {
    state: Arc<Mutex<RunnerState>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to commands containing `pattern` with `output`.
    pub fn on(self, pattern: &str, output: ProcessOutput) -> Self {
        self.script(pattern, Scripted::Output(output))
    }

    /// Make commands containing `pattern` exit with `code` and `stderr`.
    pub fn fail(self, pattern: &str, code: i32, stderr: &str) -> Self {
        self.on(
            pattern,
            ProcessOutput {
                code: Some(code),
                stdout: String::new(),
                stderr: stderr.to_string(),
            },
        )
    }

    /// Make commands containing `pattern` fail to start.
    pub fn spawn_error(self, pattern: &str, message: &str) -> Self {
        self.script(pattern, Scripted::SpawnError(message.to_string()))
    }

    fn script(self, pattern: &str, response: Scripted) -> Self {
        self.state
            .lock()
            .unwrap()
            .scripts
            .push((pattern.to_string(), response));
        self
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Recorded command lines, in order.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(RecordedCall::command_line).collect()
    }

    fn record(&self, cmd: &ProcessBuilder, attached: bool) -> Result<ProcessOutput> {
        let call = RecordedCall {
            program: cmd.get_program().to_path_buf(),
            args: cmd.get_args().to_vec(),
            cwd: cmd.get_cwd().map(PathBuf::from),
            path_env: cmd.get_env("PATH").map(OsString::from),
            attached,
        };
        let line = call.command_line();

        let mut state = self.state.lock().unwrap();
        state.calls.push(call);

        let response = state
            .scripts
            .iter()
            .find(|(pattern, _)| line.contains(pattern.as_str()))
            .map(|(_, response)| response.clone());

        match response {
            Some(Scripted::Output(output)) => Ok(output),
            Some(Scripted::SpawnError(message)) => bail!("failed to spawn `{}`: {}", line, message),
            None => Ok(ProcessOutput {
                code: Some(0),
                stdout: String::new(),
                stderr: String::new(),
            }),
        }
    }
}

impl CommandRunner for RecordingRunner {
    fn output(&self, cmd: &ProcessBuilder) -> Result<ProcessOutput> {
        self.record(cmd, false)
    }

    fn attached(&self, cmd: &ProcessBuilder) -> Result<Option<i32>> {
        self.record(cmd, true).map(|output| output.code)
    }
}

/// Minimal HTTP server answering GET requests from a fixed route table.
///
/// Unknown paths get a 404. The accept loop runs on a detached thread for
/// the rest of the test process.
pub struct StaticServer {
    base_url: String,
    hits: Arc<AtomicUsize>,
}

impl StaticServer {
    /// Start serving `routes` (path to body) on a loopback port.
    ///
    /// Returns `None` when the environment forbids binding loopback.
    pub fn start(routes: Vec<(String, Vec<u8>)>) -> Option<Self> {
        let listener = match TcpListener::bind("127.0.0.1:0") {
            Ok(listener) => listener,
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => return None,
            Err(e) => panic!("failed to bind loopback: {e}"),
        };
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let routes: Arc<HashMap<String, Vec<u8>>> = Arc::new(routes.into_iter().collect());
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&hits);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                counter.fetch_add(1, Ordering::SeqCst);
                let _ = respond(stream, &routes);
            }
        });

        Some(StaticServer { base_url, hits })
    }

    /// `http://127.0.0.1:<port>`, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Number of connections accepted so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

fn respond(stream: TcpStream, routes: &HashMap<String, Vec<u8>>) -> io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;

    // Drain headers so the client sees a clean close
    let mut header = String::new();
    while reader.read_line(&mut header)? > 2 {
        header.clear();
    }

    let path = request_line.split_whitespace().nth(1).unwrap_or("/");
    let (status, body): (&str, &[u8]) = match routes.get(path) {
        Some(body) => ("200 OK", body),
        None => ("404 Not Found", b"not found"),
    };

    let mut stream = stream;
    write!(
        stream,
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    )?;
    stream.write_all(body)?;
    stream.flush()
}

/// In-memory log sink for asserting on emitted tracing events.
#[derive(Debug, Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a subscriber that records events, returning its result and
/// the captured log text.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let sink = LogCapture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(sink.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    (result, sink.contents())
}
