//! Helper methods for executing the external tools the bootstrap shells
//! out to.
use crate::error::{BootstrapError, BootstrapResult};
use std::process::Command;

/// Build a system [Command] from the argument vector produced by one of
/// the command builders. The first element is the binary.
pub fn to_system_command(args: &[String]) -> Command {
    let mut cmd = Command::new(&args[0]);
    cmd.args(&args[1..]);
    cmd
}

/// Execute the given system [Command] in a blocking manner. Optionally
/// return the command's stdout if it is non-empty and execution was
/// successful.
pub fn exec_cmd(command: &mut Command) -> BootstrapResult<Option<String>> {
    let output = command.output().map_err(|e| {
        BootstrapError::cmd_error(command, None, format!("Could not execute: {e:?}"))
    })?;

    let exit_status = output.status;
    if !exit_status.success() {
        let mut combined = String::from_utf8_lossy(&output.stdout).to_string();
        if !combined.is_empty() {
            combined.push('\n');
        }
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        return Err(BootstrapError::cmd_error(
            command,
            exit_status.code(),
            combined,
        ));
    }

    let stdout = String::from_utf8(output.stdout).map_err(|e| {
        BootstrapError::cmd_error(
            command,
            exit_status.code(),
            format!("Could not get stdout: {e:?}"),
        )
    })?;

    Ok(Some(stdout).filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn exec_cmd_returns_stdout() {
        let mut cmd = Command::new("echo");
        cmd.arg("hello");
        assert_eq!(exec_cmd(&mut cmd).unwrap(), Some("hello\n".to_string()));
    }

    #[test]
    fn exec_cmd_returns_none_without_output() {
        assert_eq!(exec_cmd(&mut Command::new("true")).unwrap(), None);
    }

    #[test]
    fn exec_cmd_fails_on_nonzero_exit() {
        assert_matches!(
            exec_cmd(&mut Command::new("false")),
            Err(BootstrapError::CommandError(Some(1), _))
        );
    }

    #[test]
    fn to_system_command_splits_binary_and_args() {
        let args = vec!["echo".to_string(), "a".to_string(), "b".to_string()];
        let cmd = to_system_command(&args);
        assert_eq!(cmd.get_program(), "echo");
        assert_eq!(cmd.get_args().count(), 2);
    }
}
