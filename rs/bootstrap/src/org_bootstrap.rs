use crate::{
    config::OrgKind,
    error::{BootstrapError, BootstrapResult},
    steps::Step,
    Bootstrap,
};
use serde::{Deserialize, Serialize};
use slog::{debug, info, warn, Logger};
use std::iter::Peekable;
use strum::{EnumMessage, IntoEnumIterator};
use strum_macros::{EnumIter, EnumString};

#[derive(
    Debug, Copy, Clone, PartialEq, EnumIter, EnumString, Serialize, Deserialize, EnumMessage,
)]
pub enum StepType {
    /// Before anything can be registered, the CA bootstrap admin has to be
    /// enrolled: it is the registrar identity all later registrations are
    /// issued as. The CA only needs to accept TCP connections for this, so
    /// this step blocks on the CA port and then enrolls the bootstrap
    /// admin into the CA client's default MSP home.
    EnrollBootstrapAdmin,
    /// Tells the CA which identities exist in this organization: every
    /// node in configuration order, then the organization admin, then (for
    /// peer organizations) the user. Nodes are registered but never
    /// enrolled here; they enroll themselves when their containers start.
    /// A CA rejection, including one caused by re-running this step, fails
    /// the bootstrap.
    RegisterIdentities,
    /// Materializes the admin MSP tree under the admin's home directory
    /// and promotes the signer certificates to admincerts. If the MSP tree
    /// already exists the step does nothing at all.
    EnrollAdmin,
    /// Mirrors cacerts into tlscacerts and removes intermediatecerts,
    /// giving the admin MSP the layout the ledger components expect. Safe
    /// to repeat.
    CompleteAdminMsp,
    /// Peer organizations also enroll their ordinary user identity, with
    /// the same MSP layout as the admin. Orderer organizations skip this
    /// step.
    EnrollUser,
    /// Orderer organizations finish by generating the genesis block of the
    /// system channel. Peer organizations skip this step.
    GenerateGenesis,
}

/// Drives the bootstrap of one organization through all [StepType]s in
/// order.
pub struct OrgBootstrap {
    step_iterator: Peekable<StepTypeIter>,
    /// If present, execution starts from this step, passing over the
    /// earlier ones.
    pub next_step: Option<StepType>,
    bootstrap: Bootstrap,
    logger: Logger,
}

impl OrgBootstrap {
    pub fn new(logger: Logger, bootstrap: Bootstrap, next_step: Option<StepType>) -> Self {
        Self {
            step_iterator: StepType::iter().peekable(),
            next_step,
            bootstrap,
            logger,
        }
    }

    /// Map a step type onto the concrete step for this organization.
    /// Steps that do not apply to the organization's kind return
    /// [BootstrapError::StepSkipped].
    pub fn get_step_impl(&self, step_type: StepType) -> BootstrapResult<Box<dyn Step>> {
        match step_type {
            StepType::EnrollBootstrapAdmin => {
                Ok(self.bootstrap.enroll_bootstrap_admin_step()?.into())
            }

            StepType::RegisterIdentities => Ok(self.bootstrap.register_identities_step().into()),

            StepType::EnrollAdmin => Ok(self.bootstrap.enroll_admin_step()?.into()),

            StepType::CompleteAdminMsp => Ok(self.bootstrap.complete_admin_msp_step().into()),

            StepType::EnrollUser => {
                if self.bootstrap.org.kind == OrgKind::Peer {
                    Ok(self.bootstrap.enroll_user_step()?.into())
                } else {
                    Err(BootstrapError::StepSkipped)
                }
            }

            StepType::GenerateGenesis => {
                if self.bootstrap.org.kind == OrgKind::Orderer {
                    Ok(self.bootstrap.generate_genesis_step()?.into())
                } else {
                    Err(BootstrapError::StepSkipped)
                }
            }
        }
    }

    /// Execute all steps in order, starting from [Self::next_step] if one
    /// was given. Non-applicable steps are logged and passed over; any
    /// other error aborts the run.
    pub fn execute_steps(&mut self) -> BootstrapResult<()> {
        self.bootstrap.report_identity_states();

        if let Some(resume) = self.next_step {
            info!(self.logger, "Resuming execution from {:?}", resume);
            while let Some(step_type) = self.step_iterator.peek() {
                if *step_type == resume {
                    break;
                }
                self.step_iterator.next();
            }
        }

        while let Some(step_type) = self.step_iterator.next() {
            match self.get_step_impl(step_type) {
                Ok(step) => {
                    if let Some(doc) = step_type.get_documentation() {
                        debug!(self.logger, "{}", doc);
                    }
                    info!(self.logger, "{:?}: {}", step_type, step.descr());
                    step.exec()?;
                }
                Err(BootstrapError::StepSkipped) => {
                    warn!(
                        self.logger,
                        "Skipping {:?}: not applicable to a {:?} organization",
                        step_type,
                        self.bootstrap.org.kind
                    );
                }
                Err(e) => return Err(e),
            }
        }

        info!(self.logger, "Bootstrap of {} done", self.bootstrap.org.name);
        Ok(())
    }
}
