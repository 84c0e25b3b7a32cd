//! Command execution utilities

use crate::error::{HostfetchError, Result};
use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Execute a command and return its stdout, killing it if it outlives `timeout`
pub fn run_command_timeout(program: &str, args: &[&str], timeout: Duration) -> Result<String> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()?;

    // Drain stdout on its own thread so a chatty child never blocks on a full pipe
    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| HostfetchError::Detection(format!("no stdout for '{}'", program)))?;
    let reader = thread::spawn(move || {
        let mut buffer = Vec::new();
        stdout.read_to_end(&mut buffer).map(|_| buffer)
    });

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(HostfetchError::Detection(format!(
                "Command '{}' timed out after {:?}",
                program, timeout
            )));
        }
        thread::sleep(POLL_INTERVAL);
    };

    let output = reader
        .join()
        .map_err(|_| HostfetchError::Detection(format!("reading output of '{}' failed", program)))??;

    if status.success() {
        Ok(String::from_utf8_lossy(&output).trim().to_string())
    } else {
        Err(HostfetchError::Detection(format!(
            "Command '{}' failed with exit code: {:?}",
            program,
            status.code()
        )))
    }
}

/// Locate an executable in PATH, like `which`
pub fn which(program: &str) -> Option<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(program))
        .find(|candidate| {
            candidate
                .metadata()
                .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
                .unwrap_or(false)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_trimmed_stdout() {
        let output = run_command_timeout("sh", &["-c", "echo '  hello  '"], Duration::from_secs(5)).unwrap();
        assert_eq!(output, "hello");
    }

    #[test]
    fn non_zero_exit_is_an_error() {
        let err = run_command_timeout("sh", &["-c", "exit 3"], Duration::from_secs(5)).unwrap_err();
        assert!(err.to_string().contains("exit code"));
    }

    #[test]
    fn slow_command_is_killed() {
        let started = Instant::now();
        let err = run_command_timeout("sleep", &["5"], Duration::from_millis(100)).unwrap_err();
        assert!(err.to_string().contains("timed out"));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn which_finds_sh() {
        assert!(which("sh").is_some());
        assert!(which("definitely-not-a-real-binary-hostfetch").is_none());
    }
}
