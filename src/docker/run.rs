use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use super::types::CommandOutput;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Run a command to completion, killing it once `timeout` passes.
///
/// Output is captured in full. Errors only when the process cannot be
/// spawned; a timeout or non-zero exit is reported through [`CommandOutput`].
pub fn run_bounded(program: &str, args: &[String], timeout: Duration) -> Result<CommandOutput> {
    tracing::debug!(program, ?args, "running");

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to invoke `{program}`"))?;

    let stdout = child.stdout.take().context("stdout was not piped")?;
    let stderr = child.stderr.take().context("stderr was not piped")?;
    let stdout_handle = std::thread::spawn(move || read_all(stdout));
    let stderr_handle = std::thread::spawn(move || read_all(stderr));

    let start = Instant::now();
    let mut timed_out = false;

    let exit_status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break Some(status),
            Ok(None) => {}
            Err(_) => break None,
        }

        if start.elapsed() > timeout {
            timed_out = true;
            let _ = child.kill();
            let _ = child.wait();
            break None;
        }

        std::thread::sleep(POLL_INTERVAL);
    };

    let stdout = stdout_handle.join().unwrap_or_default();
    let stderr = stderr_handle.join().unwrap_or_default();
    let exit_code = exit_status.and_then(|s| s.code());

    tracing::debug!(program, ?exit_code, timed_out, elapsed = ?start.elapsed(), "finished");

    Ok(CommandOutput {
        success: exit_code == Some(0),
        exit_code,
        stdout,
        stderr,
        timed_out,
    })
}

/// Spawn a command and leave it running with stdio discarded.
///
/// On Unix the child gets its own process group so a Ctrl-C aimed at the
/// launcher does not reach it.
pub fn spawn_detached(program: &str, args: &[String], cwd: Option<&Path>) -> Result<()> {
    tracing::debug!(program, ?args, ?cwd, "spawning detached");

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    let child = cmd
        .spawn()
        .with_context(|| format!("failed to spawn `{program}`"))?;
    tracing::debug!(pid = child.id(), "detached child started");
    Ok(())
}

fn read_all(mut source: impl Read) -> String {
    let mut buf = Vec::new();
    let _ = source.read_to_end(&mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout_and_exit_code() {
        let args = ["-c".to_string(), "echo hello; exit 3".to_string()];
        let out = run_bounded("sh", &args, Duration::from_secs(5)).unwrap();
        assert_eq!(out.stdout.trim(), "hello");
        assert_eq!(out.exit_code, Some(3));
        assert!(!out.success);
        assert!(!out.timed_out);
    }

    #[test]
    fn kills_commands_that_outlive_the_timeout() {
        let start = Instant::now();
        let out = run_bounded("sleep", &["5".to_string()], Duration::from_millis(200)).unwrap();
        assert!(out.timed_out);
        assert!(!out.success);
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn missing_program_is_an_error() {
        let err = run_bounded("launchbox-no-such-tool", &[], Duration::from_secs(1)).unwrap_err();
        assert!(err.to_string().contains("launchbox-no-such-tool"));
    }

    #[test]
    fn spawn_detached_does_not_wait() {
        let start = Instant::now();
        spawn_detached("sleep", &["2".to_string()], None).unwrap();
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
