use std::{
    error::Error,
    fmt::{self, Display},
    io,
    path::Path,
    process::Command,
    time::Duration,
};

pub type BootstrapResult<T> = Result<T, BootstrapError>;

/// Enumerates the possible errors that the bootstrap may encounter
#[derive(Debug)]
pub enum BootstrapError {
    IoError(String, io::Error),
    CommandError(Option<i32>, String),
    DependencyNotReady(String, u64),
    RegistrationError(String, String),
    EnrollmentError(String, String),
    AssemblyError(String),
    ParsingError(serde_json::Error),
    ValidationFailed(String),
    UnexpectedError(String),
    StepSkipped,
}

impl BootstrapError {
    pub(crate) fn dir_error(dir: &Path, e: io::Error) -> Self {
        BootstrapError::IoError(format!("Directory error: {dir:?}"), e)
    }
    pub fn file_error(file: &Path, e: io::Error) -> Self {
        BootstrapError::IoError(format!("File error: {file:?}"), e)
    }
    pub(crate) fn cmd_error(cmd: &Command, exit_code: Option<i32>, output: impl Display) -> Self {
        BootstrapError::CommandError(
            exit_code,
            format!("Failed to execute system command: {cmd:?}, Output: {output}"),
        )
    }
    pub(crate) fn dependency_not_ready(label: impl Display, elapsed: Duration) -> Self {
        BootstrapError::DependencyNotReady(label.to_string(), elapsed.as_secs())
    }
    pub(crate) fn registration_error(identity: impl Display, error: impl Display) -> Self {
        BootstrapError::RegistrationError(identity.to_string(), error.to_string())
    }
    pub(crate) fn enrollment_error(identity: impl Display, error: impl Display) -> Self {
        BootstrapError::EnrollmentError(identity.to_string(), error.to_string())
    }
    pub(crate) fn assembly_error(message: impl Display) -> Self {
        BootstrapError::AssemblyError(message.to_string())
    }
    pub(crate) fn parsing_error(e: serde_json::Error) -> Self {
        BootstrapError::ParsingError(e)
    }
    pub fn validation_failed(message: impl Display) -> Self {
        BootstrapError::ValidationFailed(message.to_string())
    }
}

impl fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootstrapError::IoError(msg, e) => {
                write!(f, "IO error: {msg}\nError: {e}")
            }
            BootstrapError::CommandError(code, msg) => {
                write!(f, "Command error: {msg}\nCode: {code:?}")
            }
            BootstrapError::DependencyNotReady(label, secs) => {
                write!(f, "{label} didn't come up within {secs} seconds")
            }
            BootstrapError::RegistrationError(identity, msg) => {
                write!(f, "Failed to register {identity}: {msg}")
            }
            BootstrapError::EnrollmentError(identity, msg) => {
                write!(f, "Failed to enroll {identity}: {msg}")
            }
            BootstrapError::AssemblyError(msg) => {
                write!(f, "MSP assembly error: {msg}")
            }
            BootstrapError::ParsingError(e) => {
                write!(f, "Parsing error: {e}")
            }
            BootstrapError::ValidationFailed(msg) => {
                write!(f, "Validation failed: {msg}")
            }
            BootstrapError::UnexpectedError(msg) => {
                write!(f, "Unexpected error: {msg}")
            }
            BootstrapError::StepSkipped => {
                write!(f, "Bootstrap step skipped.")
            }
        }
    }
}

impl Error for BootstrapError {}

pub trait GracefulExpect<T> {
    /// Print a human-readable error message, instead of a debug dump.
    fn expect_graceful(self, context: &str) -> T;
}

impl<T> GracefulExpect<T> for BootstrapResult<T> {
    fn expect_graceful(self, context: &str) -> T {
        match self {
            Ok(inner) => inner,
            Err(e) => {
                println!("\x1b[1;31mFatal error\x1B[0m: {context}\n{e}");
                std::process::exit(1)
            }
        }
    }
}
