//! Bootstraps the identities of one organization of a permissioned
//! ledger network. The tool waits for the organization's CA to come up,
//! registers the organization's identities with it, enrolls the admin
//! (and, for peer organizations, the user) into MSP directory trees,
//! completes the admin MSP layout, and, for orderer organizations,
//! generates the genesis block of the system channel.
//!
//! All work happens in [steps](crate::steps::Step) driven by
//! [OrgBootstrap](crate::org_bootstrap::OrgBootstrap); re-running the
//! tool against partially bootstrapped state is safe for the enrollment
//! and MSP steps, but not for registration.

use crate::ca_client_helper::CaClientHelper;
use crate::config::{MspIdentity, OrgKind, Organization};
use crate::genesis_helper::GenesisHelper;
use crate::msp::{msp_dir, probe_identity_state};
use crate::readiness::ReadinessEvidence;
use crate::steps::{
    CompleteAdminMspStep, EnrollBootstrapAdminStep, EnrollIdentityStep, GenerateGenesisStep,
    RegisterIdentitiesStep,
};
use slog::{info, Logger};
use std::path::PathBuf;
use std::time::Duration;

pub mod ca_client_helper;
pub mod cmd;
pub mod command_helper;
pub mod config;
pub mod error;
pub mod file_sync_helper;
pub mod genesis_helper;
pub mod msp;
pub mod org_bootstrap;
pub mod readiness;
pub mod steps;
pub mod util;

pub use crate::error::{BootstrapError, BootstrapResult, GracefulExpect};
pub use crate::steps::Step;

/// Config file the CA client reads on every call. The CA provisioning
/// writes it before this tool runs.
pub const DEFAULT_CA_CLIENT_CONFIG_PATH: &str =
    "/etc/hyperledger/fabric/fabric-ca-client-config.yaml";
/// Line the CA server prints once it accepts requests.
pub const DEFAULT_READY_MARKER: &str = "Listening on";
pub const DEFAULT_GENESIS_PROFILE: &str = "OrgsOrdererGenesis";
pub const DEFAULT_CA_CLIENT_BINARY: &str = "fabric-ca-client";
pub const DEFAULT_GENESIS_BINARY: &str = "configtxgen";
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 90;
pub(crate) const WAIT_POLL_INTERVAL_SECS: u64 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapArgs {
    pub ca_client_binary: PathBuf,
    pub genesis_binary: PathBuf,
    pub wait_timeout: Duration,
}

/// Holds the validated organization config together with the command
/// builders, and constructs the concrete bootstrap steps from them.
pub struct Bootstrap {
    pub logger: Logger,
    pub org: Organization,
    wait_timeout: Duration,
    ca_client: CaClientHelper,
    genesis: GenesisHelper,
}

impl Bootstrap {
    pub fn new(logger: Logger, org: Organization, args: BootstrapArgs) -> BootstrapResult<Self> {
        org.validate()?;
        let ca_client = CaClientHelper::new(args.ca_client_binary, &org.ca);
        let genesis = GenesisHelper::new(args.genesis_binary);
        Ok(Self {
            logger,
            org,
            wait_timeout: args.wait_timeout,
            ca_client,
            genesis,
        })
    }

    fn ca_label(&self) -> String {
        self.org.ca.name.clone()
    }

    /// Log where each local identity stands, so that a re-run against
    /// partially bootstrapped state is explainable from the output.
    pub fn report_identity_states(&self) {
        let admin = &self.org.users.admin;
        info!(
            self.logger,
            "Identity {}: {:?}",
            admin.name,
            probe_identity_state(&admin.home)
        );
        if let Some(user) = &self.org.users.user {
            info!(
                self.logger,
                "Identity {}: {:?}",
                user.name,
                probe_identity_state(&user.home)
            );
        }
    }

    /// The bootstrap admin enrolls into the CA client's default MSP
    /// home, so the command carries no MSP flag. Gated on the CA's TCP
    /// port only; the CA cert file does not exist yet at this point.
    pub fn enroll_bootstrap_admin_step(&self) -> BootstrapResult<EnrollBootstrapAdminStep> {
        let admin = &self.org.users.bootstrap_admin;
        let url = self.ca_client.enrollment_url(&admin.name, &admin.secret)?;
        Ok(EnrollBootstrapAdminStep {
            logger: self.logger.clone(),
            identity: admin.name.clone(),
            label: self.ca_label(),
            evidence: ReadinessEvidence::ca_port(&self.org.ca),
            wait_timeout: self.wait_timeout,
            enroll_cmd: self.ca_client.get_enroll_command(&url, None),
        })
    }

    /// Registration order: every node first, then the admin, then (for
    /// peer organizations) the user.
    pub fn register_identities_step(&self) -> RegisterIdentitiesStep {
        let mut registrations = Vec::new();
        for node in &self.org.nodes {
            registrations.push((
                node.name.clone(),
                self.ca_client
                    .get_register_node_command(&node.name, &node.secret, self.org.kind),
            ));
        }
        let admin = &self.org.users.admin;
        registrations.push((
            admin.name.clone(),
            self.ca_client
                .get_register_admin_command(&admin.name, &admin.secret, self.org.kind),
        ));
        if self.org.kind == OrgKind::Peer {
            if let Some(user) = &self.org.users.user {
                registrations.push((
                    user.name.clone(),
                    self.ca_client
                        .get_register_user_command(&user.name, &user.secret),
                ));
            }
        }
        RegisterIdentitiesStep {
            logger: self.logger.clone(),
            registrations,
        }
    }

    pub fn enroll_admin_step(&self) -> BootstrapResult<EnrollIdentityStep> {
        self.enroll_identity_step(&self.org.users.admin)
    }

    pub fn enroll_user_step(&self) -> BootstrapResult<EnrollIdentityStep> {
        match &self.org.users.user {
            Some(user) => self.enroll_identity_step(user),
            None => Err(BootstrapError::UnexpectedError(format!(
                "Peer organization {} has no user identity",
                self.org.name
            ))),
        }
    }

    /// Local enrollments wait for the CA's readiness marker in its log
    /// and for its cert file, not just for the port.
    fn enroll_identity_step(&self, identity: &MspIdentity) -> BootstrapResult<EnrollIdentityStep> {
        let url = self
            .ca_client
            .enrollment_url(&identity.name, &identity.secret)?;
        let msp = msp_dir(&identity.home);
        Ok(EnrollIdentityStep {
            logger: self.logger.clone(),
            identity: identity.clone(),
            label: self.ca_label(),
            evidence: ReadinessEvidence::ca_log(&self.org.ca),
            wait_timeout: self.wait_timeout,
            enroll_cmd: self.ca_client.get_enroll_command(&url, Some(msp.as_path())),
        })
    }

    pub fn complete_admin_msp_step(&self) -> CompleteAdminMspStep {
        CompleteAdminMspStep {
            logger: self.logger.clone(),
            identity: self.org.users.admin.clone(),
        }
    }

    pub fn generate_genesis_step(&self) -> BootstrapResult<GenerateGenesisStep> {
        let genesis = self.org.genesis.as_ref().ok_or_else(|| {
            BootstrapError::UnexpectedError(format!(
                "Orderer organization {} has no genesis section",
                self.org.name
            ))
        })?;
        Ok(GenerateGenesisStep {
            logger: self.logger.clone(),
            genesis_cmd: self.genesis.get_generate_command(genesis),
        })
    }
}
