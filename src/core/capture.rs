//! Run an external program and collect what it prints on stdout.
//!
//! The child is spawned with `kill_on_drop`, so it is killed and reaped on
//! every exit path: normal completion, timeout, or the caller's future being
//! dropped. Our own stdout is never redirected.

use crate::utils::error::{AocError, Result};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    pub lines: Vec<String>,
    pub stderr: String,
    pub success: bool,
}

pub async fn capture_stdout(
    program: &str,
    args: &[String],
    timeout: Duration,
) -> Result<CapturedOutput> {
    let command_line = describe(program, args);
    tracing::debug!("Capturing stdout of `{}`", command_line);

    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| AocError::CaptureError {
            command: command_line.clone(),
            message: format!("failed to start: {}", e),
        })?;

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(output) => output.map_err(|e| AocError::CaptureError {
            command: command_line.clone(),
            message: format!("failed to collect output: {}", e),
        })?,
        Err(_) => {
            return Err(AocError::CaptureError {
                command: command_line,
                message: format!("timed out after {:?}", timeout),
            })
        }
    };

    let lines: Vec<String> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect();

    tracing::debug!(
        "`{}` exited with {} and printed {} line(s)",
        command_line,
        output.status,
        lines.len()
    );

    Ok(CapturedOutput {
        lines,
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        success: output.status.success(),
    })
}

pub fn describe(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}
