//! Running external programs with a deadline and bounded output

use std::io::{Read, Write};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

use super::error::ProcessError;

/// Upper bound on captured standard output. Sixel encodings of large images
/// run to tens of megabytes.
pub const MAX_OUTPUT: usize = 64 * 1024 * 1024;

const MAX_STDERR: usize = 64 * 1024;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// What a successful run produced.
#[derive(Debug, Clone, Default)]
pub struct Output {
    pub stdout: Vec<u8>,
    pub stderr: String,
}

/// Run a command to completion, optionally feeding it input, and give up
/// (killing it) if it takes longer than the timeout.
pub fn run(command: &mut Command, input: Option<&[u8]>, timeout: Duration) -> Result<Output, ProcessError> {
    let program = command
        .get_program()
        .to_string_lossy()
        .to_string();

    debug!(?command, "Running external process");

    command
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command
        .spawn()
        .map_err(|error| match error.kind() {
            std::io::ErrorKind::NotFound => ProcessError::Missing(program.clone()),
            _ => ProcessError::Io(program.clone(), error.to_string()),
        })?;

    // feed stdin and drain stdout/stderr on their own threads, so that a
    // child blocked writing to a full pipe can't deadlock against us.
    let writer = match (child.stdin.take(), input) {
        (Some(mut stdin), Some(input)) => {
            let input = input.to_vec();
            Some(thread::spawn(move || {
                let _ = stdin.write_all(&input);
            }))
        }
        _ => None,
    };

    let stdout = child
        .stdout
        .take()
        .map(|pipe| thread::spawn(move || drain(pipe, MAX_OUTPUT)));
    let stderr = child
        .stderr
        .take()
        .map(|pipe| thread::spawn(move || drain(pipe, MAX_STDERR)));

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    debug!("{} timed out", program);
                    return Err(ProcessError::Timeout(program, timeout.as_secs()));
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(error) => {
                let _ = child.kill();
                return Err(ProcessError::Io(program, error.to_string()));
            }
        }
    };

    if let Some(writer) = writer {
        let _ = writer.join();
    }

    let (stdout, overflowed) = match stdout.map(|handle| handle.join()) {
        Some(Ok(result)) => result,
        _ => (Vec::new(), false),
    };
    let stderr = match stderr.map(|handle| handle.join()) {
        Some(Ok((bytes, _))) => String::from_utf8_lossy(&bytes).to_string(),
        _ => String::new(),
    };

    if !status.success() {
        return Err(ProcessError::Failed {
            program,
            status: status.code(),
            stderr,
        });
    }
    if overflowed {
        return Err(ProcessError::Overflow(program, MAX_OUTPUT));
    }

    debug!("{} wrote {} bytes", program, stdout.len());
    Ok(Output { stdout, stderr })
}

// Read everything from the pipe, keeping at most limit bytes. Reading
// continues past the limit so that the child can finish.
fn drain(mut pipe: impl Read, limit: usize) -> (Vec<u8>, bool) {
    let mut kept = Vec::new();
    let mut overflowed = false;
    let mut buffer = [0u8; 64 * 1024];

    loop {
        match pipe.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => {
                if kept.len() + n <= limit {
                    kept.extend_from_slice(&buffer[..n]);
                } else {
                    overflowed = true;
                }
            }
            Err(error) if error.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(_) => break,
        }
    }

    (kept, overflowed)
}

#[cfg(test)]
mod check {
    use super::*;

    #[test]
    fn missing_program() {
        let mut command = Command::new("markshow-no-such-program");
        let result = run(&mut command, None, Duration::from_secs(5));
        assert_eq!(
            result.unwrap_err(),
            ProcessError::Missing("markshow-no-such-program".to_string())
        );
    }

    #[cfg(unix)]
    #[test]
    fn captures_output_and_input() {
        let mut command = Command::new("cat");
        let output = run(&mut command, Some(b"hello"), Duration::from_secs(5)).unwrap();
        assert_eq!(output.stdout, b"hello");
    }

    #[cfg(unix)]
    #[test]
    fn failure_status_reported() {
        let mut command = Command::new("sh");
        command
            .arg("-c")
            .arg("echo broken >&2; exit 3");
        match run(&mut command, None, Duration::from_secs(5)) {
            Err(ProcessError::Failed { status, stderr, .. }) => {
                assert_eq!(status, Some(3));
                assert!(stderr.contains("broken"));
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn timeout_kills_child() {
        let mut command = Command::new("sleep");
        command.arg("10");

        let started = Instant::now();
        let result = run(&mut command, None, Duration::from_millis(200));

        assert!(matches!(result, Err(ProcessError::Timeout(_, _))));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn drain_respects_limit() {
        let (kept, overflowed) = drain(&b"0123456789"[..], 4);
        assert!(overflowed);
        assert!(kept.len() <= 4);

        let (kept, overflowed) = drain(&b"0123"[..], 4);
        assert!(!overflowed);
        assert_eq!(kept, b"0123");
    }
}
