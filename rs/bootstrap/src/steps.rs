use crate::{
    ca_client_helper::CaClient,
    command_helper::{exec_cmd, to_system_command},
    config::MspIdentity,
    error::{BootstrapError, BootstrapResult},
    genesis_helper::ConfigTxGen,
    msp::{complete_msp_setup, msp_dir, promote_signcerts_to_admincerts, IdentityState},
    readiness::{wait_for_ready, ReadinessEvidence},
};
use slog::{info, Logger};
use std::time::Duration;

/// The bootstrap of an organization is composed of several steps. Each
/// step derives both its execution and its description from the same
/// input state, so that changing what a step does ideally also changes
/// how it describes itself. The description alone has to stay usable for
/// executing a step by hand.
pub trait Step {
    fn descr(&self) -> String;
    fn exec(&self) -> BootstrapResult<()>;
}

impl<T: Step + 'static> From<T> for Box<dyn Step> {
    fn from(step: T) -> Self {
        Box::new(step)
    }
}

/// Enrolls the CA bootstrap admin, the registrar identity all later
/// registrations are issued as. Only gated on the CA's TCP port; the
/// enrollment materializes in the CA client's default MSP home.
pub struct EnrollBootstrapAdminStep {
    pub logger: Logger,
    pub identity: String,
    pub label: String,
    pub evidence: ReadinessEvidence,
    pub wait_timeout: Duration,
    pub enroll_cmd: CaClient,
}

impl Step for EnrollBootstrapAdminStep {
    fn descr(&self) -> String {
        format!(
            "Wait for {} and execute:\n{}",
            self.label,
            self.enroll_cmd.join(" ")
        )
    }

    fn exec(&self) -> BootstrapResult<()> {
        wait_for_ready(&self.logger, &self.label, &self.evidence, self.wait_timeout)?;
        info!(self.logger, "Enrolling {} with the CA", self.identity);
        exec_cmd(&mut to_system_command(&self.enroll_cmd))
            .map_err(|e| BootstrapError::enrollment_error(&self.identity, e))?;
        Ok(())
    }
}

/// Registers the organization's identities with the CA, in order: every
/// node, then the admin, then (peer organizations) the user. Registration
/// leaves no local artifact and is never retried; a CA rejection fails
/// the run. A successful call is the only point that claims
/// [IdentityState::Registered] for an identity.
pub struct RegisterIdentitiesStep {
    pub logger: Logger,
    /// Identity names with their register commands, in issue order.
    pub registrations: Vec<(String, CaClient)>,
}

impl Step for RegisterIdentitiesStep {
    fn descr(&self) -> String {
        let cmds = self
            .registrations
            .iter()
            .map(|(_, cmd)| cmd.join(" "))
            .collect::<Vec<_>>()
            .join("\n");
        format!("Execute:\n{}", cmds)
    }

    fn exec(&self) -> BootstrapResult<()> {
        for (name, cmd) in &self.registrations {
            info!(self.logger, "Registering {} with the CA", name);
            exec_cmd(&mut to_system_command(cmd))
                .map_err(|e| BootstrapError::registration_error(name, e))?;
            info!(
                self.logger,
                "Identity {}: {:?}",
                name,
                IdentityState::Registered
            );
        }
        Ok(())
    }
}

/// Enrolls an identity into the MSP tree under its home directory and
/// promotes its signer certificates to admincerts. A no-op if the MSP
/// tree already exists: no wait, no CA call, no filesystem write.
pub struct EnrollIdentityStep {
    pub logger: Logger,
    pub identity: MspIdentity,
    pub label: String,
    pub evidence: ReadinessEvidence,
    pub wait_timeout: Duration,
    pub enroll_cmd: CaClient,
}

impl Step for EnrollIdentityStep {
    fn descr(&self) -> String {
        format!(
            "Unless {:?} exists, wait for {} and execute:\n{}",
            msp_dir(&self.identity.home),
            self.label,
            self.enroll_cmd.join(" ")
        )
    }

    fn exec(&self) -> BootstrapResult<()> {
        let msp = msp_dir(&self.identity.home);
        if msp.exists() {
            info!(
                self.logger,
                "MSP of {} already materialized at {:?}, nothing to do", self.identity.name, msp
            );
            return Ok(());
        }
        wait_for_ready(&self.logger, &self.label, &self.evidence, self.wait_timeout)?;
        info!(self.logger, "Enrolling {}", self.identity.name);
        exec_cmd(&mut to_system_command(&self.enroll_cmd))
            .map_err(|e| BootstrapError::enrollment_error(&self.identity.name, e))?;
        promote_signcerts_to_admincerts(&msp)
            .map_err(|e| BootstrapError::enrollment_error(&self.identity.name, e))
    }
}

/// Finishes the MSP layout of the organization admin.
pub struct CompleteAdminMspStep {
    pub logger: Logger,
    pub identity: MspIdentity,
}

impl Step for CompleteAdminMspStep {
    fn descr(&self) -> String {
        format!(
            "Complete the MSP layout under {:?}.",
            msp_dir(&self.identity.home)
        )
    }

    fn exec(&self) -> BootstrapResult<()> {
        info!(self.logger, "Completing the MSP of {}", self.identity.name);
        complete_msp_setup(&msp_dir(&self.identity.home))
    }
}

/// Generates the system channel genesis block.
pub struct GenerateGenesisStep {
    pub logger: Logger,
    pub genesis_cmd: ConfigTxGen,
}

impl Step for GenerateGenesisStep {
    fn descr(&self) -> String {
        format!(
            "Generate the genesis block by executing:\n{}",
            self.genesis_cmd.join(" ")
        )
    }

    fn exec(&self) -> BootstrapResult<()> {
        if let Some(output) = exec_cmd(&mut to_system_command(&self.genesis_cmd))? {
            info!(self.logger, "{}", output);
        }
        Ok(())
    }
}
