use std::{
    path::Path,
    process::{Command as StdCommand, Stdio},
};

use crate::executor::CollaboratorError;

/// Run `program` to completion and return its stdout. Blocks with no timeout.
pub fn run(program: &Path, args: &[String]) -> Result<String, CollaboratorError> {
    let tool = program.display().to_string();
    log::debug!("Executing {} {}", tool, args.join(" "));

    let output = StdCommand::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| CollaboratorError::Spawn {
            tool: tool.clone(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        let exit_code = output.status.code().unwrap_or(-1);
        log::debug!("{} failed with exit code {}: {}", tool, exit_code, stderr);
        return Err(CollaboratorError::Exit {
            tool,
            code: exit_code,
            stderr: last_line(&stderr),
        });
    }

    if !stderr.trim().is_empty() {
        log::debug!("{} stderr: {}", tool, stderr.trim());
    }

    Ok(stdout)
}

fn last_line(text: &str) -> String {
    text.lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default()
        .to_string()
}
