use std::{
    ffi::OsStr,
    io,
    process::{Command, Stdio},
};

use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to spawn {program}: {source}")]
    Spawn { program: String, source: io::Error },
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
}

/// Runs an external program to completion and returns its stdout.
///
/// Non-zero exit codes are errors. There is no timeout: a hanging tool stalls
/// only the caller waiting on it.
pub trait ProcessRunner: Send + Sync {
    fn run(
        &self,
        program: &str,
        args: &[&OsStr],
        env: &[(&str, &OsStr)],
    ) -> Result<String, ProcessError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn run(
        &self,
        program: &str,
        args: &[&OsStr],
        env: &[(&str, &OsStr)],
    ) -> Result<String, ProcessError> {
        debug!("running {program} {args:?}");

        let output = Command::new(program)
            .args(args)
            .envs(env.iter().copied())
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ProcessError::Spawn {
                program: program.to_owned(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProcessError::Failed {
                program: program.to_owned(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(all(test, unix))]
#[path = "process_tests.rs"]
mod tests;
