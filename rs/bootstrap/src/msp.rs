//! Layout of an MSP (Membership Service Provider) directory tree and the
//! operations completing it after enrollment.
use crate::error::{BootstrapError, BootstrapResult};
use crate::file_sync_helper::{copy_dir, remove_dir};
use std::path::{Path, PathBuf};

pub const MSP_DIR: &str = "msp";
pub const SIGNCERTS_DIR: &str = "signcerts";
pub const ADMINCERTS_DIR: &str = "admincerts";
pub const CACERTS_DIR: &str = "cacerts";
pub const TLSCACERTS_DIR: &str = "tlscacerts";
pub const INTERMEDIATECERTS_DIR: &str = "intermediatecerts";
pub const KEYSTORE_DIR: &str = "keystore";

/// The MSP tree of an identity lives directly under its home directory.
pub fn msp_dir(home: &Path) -> PathBuf {
    home.join(MSP_DIR)
}

/// Progress of a single identity as far as it can be derived from its
/// on-disk MSP tree. Registration leaves no local artifact, so
/// [IdentityState::Registered] is only ever claimed by a successful
/// register call within the same run, never by this probe.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum IdentityState {
    NotStarted,
    Registered,
    Enrolled,
    MspComplete,
}

pub fn probe_identity_state(home: &Path) -> IdentityState {
    let msp = msp_dir(home);
    if !msp.exists() {
        return IdentityState::NotStarted;
    }
    if msp.join(TLSCACERTS_DIR).exists() && !msp.join(INTERMEDIATECERTS_DIR).exists() {
        return IdentityState::MspComplete;
    }
    IdentityState::Enrolled
}

/// Copy the freshly enrolled signer certificates to `admincerts`. An
/// `admincerts` directory that already exists at this point means the
/// tree is in an unexpected state and is never overwritten.
pub fn promote_signcerts_to_admincerts(msp: &Path) -> BootstrapResult<()> {
    let admincerts = msp.join(ADMINCERTS_DIR);
    if admincerts.exists() {
        return Err(BootstrapError::UnexpectedError(format!(
            "admincerts already present at {}",
            admincerts.display()
        )));
    }
    copy_dir(&msp.join(SIGNCERTS_DIR), &admincerts)
}

/// Finish the MSP layout of an enrolled identity: mirror `cacerts` into
/// `tlscacerts` and drop `intermediatecerts`. Running this twice leaves
/// the tree unchanged.
pub fn complete_msp_setup(msp: &Path) -> BootstrapResult<()> {
    let cacerts = msp.join(CACERTS_DIR);
    if !cacerts.exists() {
        return Err(BootstrapError::assembly_error(format!(
            "no cacerts under {}, the enrollment did not complete",
            msp.display()
        )));
    }
    let tlscacerts = msp.join(TLSCACERTS_DIR);
    if !tlscacerts.exists() {
        copy_dir(&cacerts, &tlscacerts)?;
    }
    remove_dir(&msp.join(INTERMEDIATECERTS_DIR))
}
