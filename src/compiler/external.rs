//! External compiler invocation.
//!
//! The dispatch logic only sees [`ExternalRunner`], so staleness and error
//! handling can be exercised with a fake runner in tests.

use std::io;
use std::process::Command;

/// Captured result of an external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ExternalOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_owned()
    }
}

/// Runs a single shell-interpreted command line and waits for it.
pub trait ExternalRunner: Send + Sync {
    fn run(&self, command: &str) -> io::Result<ExternalOutput>;
}

/// Runs commands through the platform shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl ExternalRunner for ShellRunner {
    fn run(&self, command: &str) -> io::Result<ExternalOutput> {
        #[cfg(unix)]
        let output = Command::new("sh").arg("-c").arg(command).output()?;
        #[cfg(windows)]
        let output = Command::new("cmd").arg("/C").arg(command).output()?;

        Ok(ExternalOutput {
            exit_code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
