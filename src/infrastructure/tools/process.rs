//! Child process supervision
//!
//! External tools are run with stdin closed, stdout discarded and stderr
//! captured for the error message. A run that outlives its timeout is
//! killed and reported as [`CommandError::TimedOut`].

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::domain::ports::CommandError;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Lines of stderr kept for error messages.
const STDERR_TAIL_LINES: usize = 20;

pub fn run_with_timeout(mut command: Command, timeout: Duration) -> Result<(), CommandError> {
    let program = command.get_program().to_string_lossy().into_owned();
    tracing::debug!(
        program = %program,
        args = ?command.get_args().collect::<Vec<_>>(),
        timeout_secs = timeout.as_secs(),
        "running external tool"
    );

    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| CommandError::Spawn {
            program: program.clone(),
            message: e.to_string(),
        })?;

    // Drained on its own thread so a chatty tool never blocks on a full pipe.
    let stderr_reader = child.stderr.take().map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = String::new();
            let _ = pipe.read_to_string(&mut buf);
            buf
        })
    });
    let collect_stderr = |reader: Option<thread::JoinHandle<String>>| {
        reader
            .and_then(|handle| handle.join().ok())
            .map(|s| tail(&s, STDERR_TAIL_LINES))
            .unwrap_or_default()
    };

    let started = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if started.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait();
            // Grandchildren may still hold the pipe; the reader is left detached.
            drop(stderr_reader);
            return Err(CommandError::TimedOut {
                program,
                after: timeout,
            });
        }
        thread::sleep(POLL_INTERVAL);
    };

    let stderr = collect_stderr(stderr_reader);
    if status.success() {
        return Ok(());
    }

    let code = match status.code() {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    };
    Err(CommandError::Failed {
        program,
        code,
        stderr,
    })
}

/// Whether `program --version` can be started and succeeds.
pub fn tool_available(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn tail(text: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = text.trim_end().lines().collect();
    let start = lines.len().saturating_sub(max_lines);
    lines[start..].join("\n")
}
