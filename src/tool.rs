//! External tool invocation: scoped temp files and captured execution.

use crate::error::{Error, Result};
use crate::model::Document;
use std::io::{Read, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// How often a running child is polled against the deadline.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Captured output of one tool invocation.
///
/// A nonzero exit is data for the caller to inspect, never an error.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Captured standard output, lossily decoded.
    pub stdout: String,
    /// Captured standard error, lossily decoded.
    pub stderr: String,
    /// Exit code; `None` when the child was terminated by a signal.
    pub status: Option<i32>,
}

impl ToolOutput {
    /// Whether the tool exited with status zero.
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// A document materialized to a scoped temporary file.
///
/// The file is removed when this value drops, on every exit path.
#[derive(Debug)]
pub struct MaterializedDocument {
    file: tempfile::NamedTempFile,
}

impl MaterializedDocument {
    /// Path of the temporary file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Runs external tools against materialized documents.
#[derive(Debug, Clone)]
pub struct ToolRunner {
    timeout: Duration,
}

impl ToolRunner {
    /// Create a runner with the given per-invocation timeout.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Whether the given program is available by probing `-v`.
    ///
    /// Probe failures count as unavailable so callers can use this for
    /// prerequisite reporting.
    pub fn available(program: &str) -> bool {
        Command::new(program)
            .arg("-v")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok()
    }

    /// Copy a document's bytes into a scoped temporary file.
    pub fn materialize(&self, document: &Document) -> Result<MaterializedDocument> {
        let mut file = tempfile::Builder::new()
            .prefix("preflight-")
            .suffix(".pdf")
            .tempfile()?;
        file.write_all(&document.content)?;
        file.flush()?;
        Ok(MaterializedDocument { file })
    }

    /// Run a tool and capture its output.
    ///
    /// Never errors on a nonzero exit; the caller inspects the captured
    /// text. Errors on spawn failure or when the configured timeout
    /// expires, in which case the child is killed and reaped.
    pub fn run(&self, program: &str, args: &[&str]) -> Result<ToolOutput> {
        log::debug!("running {program} {args:?}");
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::ToolTimeout {
                    tool: program.to_string(),
                    seconds: self.timeout.as_secs(),
                });
            }
            thread::sleep(POLL_INTERVAL);
        };

        Ok(ToolOutput {
            stdout: String::from_utf8_lossy(&stdout.join().unwrap_or_default()).into_owned(),
            stderr: String::from_utf8_lossy(&stderr.join().unwrap_or_default()).into_owned(),
            status: status.code(),
        })
    }
}

impl Default for ToolRunner {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

/// Collect a child stream on a background thread so neither pipe can
/// fill up and stall the child.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buffer);
        }
        buffer
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_materialize_roundtrip_and_cleanup() {
        let runner = ToolRunner::default();
        let document = Document::pdf("d1", "book.pdf", b"%PDF-1.7\ncontent".to_vec());
        let path: PathBuf;
        {
            let materialized = runner.materialize(&document).unwrap();
            path = materialized.path().to_path_buf();
            assert_eq!(std::fs::read(&path).unwrap(), document.content);
            assert_eq!(path.extension().and_then(|e| e.to_str()), Some("pdf"));
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_spawn_failure_is_an_error() {
        let runner = ToolRunner::default();
        assert!(matches!(
            runner.run("definitely-not-a-real-tool", &[]),
            Err(Error::Io(_))
        ));
    }
}
