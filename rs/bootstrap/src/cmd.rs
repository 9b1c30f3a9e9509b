use crate::org_bootstrap::StepType;
use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser)]
#[command(version = "1.0")]
pub struct BootstrapToolArgs {
    /// Path of the JSON file describing the organization to bootstrap.
    #[arg(long)]
    pub config_file: PathBuf,

    /// Path of the CA client binary used for registrations and
    /// enrollments.
    #[arg(long, default_value = crate::DEFAULT_CA_CLIENT_BINARY)]
    pub ca_client_binary: PathBuf,

    /// Path of the binary generating the genesis block.
    #[arg(long, default_value = crate::DEFAULT_GENESIS_BINARY)]
    pub genesis_binary: PathBuf,

    /// Seconds to wait for the CA before giving up on a step.
    #[arg(long, default_value_t = crate::DEFAULT_WAIT_TIMEOUT_SECS)]
    pub wait_timeout_secs: u64,

    /// Step to resume execution from, passing over the earlier steps.
    #[arg(long = "resume", value_parser = parse_step_type)]
    pub next_step: Option<StepType>,
}

fn parse_step_type(step: &str) -> Result<StepType, strum::ParseError> {
    StepType::from_str(step)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_only_the_config_is_given() {
        let args =
            BootstrapToolArgs::parse_from(["msp-bootstrap", "--config-file", "/tmp/org1.json"]);
        assert_eq!(args.config_file, PathBuf::from("/tmp/org1.json"));
        assert_eq!(
            args.ca_client_binary,
            PathBuf::from(crate::DEFAULT_CA_CLIENT_BINARY)
        );
        assert_eq!(args.wait_timeout_secs, crate::DEFAULT_WAIT_TIMEOUT_SECS);
        assert_eq!(args.next_step, None);
    }

    #[test]
    fn resume_takes_a_step_name() {
        let args = BootstrapToolArgs::parse_from([
            "msp-bootstrap",
            "--config-file",
            "/tmp/org1.json",
            "--resume",
            "CompleteAdminMsp",
        ]);
        assert_eq!(args.next_step, Some(StepType::CompleteAdminMsp));
    }

    #[test]
    fn resume_rejects_unknown_step_names() {
        assert!(BootstrapToolArgs::try_parse_from([
            "msp-bootstrap",
            "--config-file",
            "/tmp/org1.json",
            "--resume",
            "FlyToTheMoon",
        ])
        .is_err());
    }
}
