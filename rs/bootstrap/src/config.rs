//! The organization description the tool bootstraps from. Loaded once
//! from a JSON file and treated as an immutable value afterwards.
use crate::error::{BootstrapError, BootstrapResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// The orderer refuses to launch if the genesis block is given this name.
const RESERVED_GENESIS_BLOCK_NAME: &str = "orderer.genesis.block";

/// Kind of the organization. Decides the `--id.type` of its node
/// identities, the attributes of its admin, and which bootstrap steps
/// apply.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrgKind {
    Peer,
    Orderer,
}

impl OrgKind {
    pub fn id_type(&self) -> &'static str {
        match self {
            OrgKind::Peer => "peer",
            OrgKind::Orderer => "orderer",
        }
    }
}

/// Where the organization's certificate authority serves and which local
/// artifacts give evidence of its readiness.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CaDescriptor {
    /// Name the CA goes by in progress output and wait labels.
    pub name: String,
    pub host: String,
    pub port: u16,
    /// Log file of the CA, polled for `ready_marker`.
    pub logfile: PathBuf,
    /// Certificate file the CA writes on startup, polled for existence.
    pub certfile: PathBuf,
    #[serde(default = "default_ready_marker")]
    pub ready_marker: String,
    /// Config file passed to every CA client call via `-c`.
    #[serde(default = "default_client_config")]
    pub client_config: PathBuf,
}

/// A registration-only identity: a node, or the CA bootstrap admin whose
/// enrollment materializes in the client's default MSP home.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Identity {
    pub name: String,
    pub secret: String,
}

/// An identity whose MSP tree is materialized under `home` on this host.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MspIdentity {
    pub name: String,
    pub secret: String,
    pub home: PathBuf,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OrgUsers {
    pub bootstrap_admin: Identity,
    pub admin: MspIdentity,
    /// Ordinary user of a peer organization. Orderer organizations have
    /// none.
    #[serde(default)]
    pub user: Option<MspIdentity>,
}

/// Parameters of the system channel genesis block an orderer organization
/// generates.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GenesisSpec {
    #[serde(default = "default_genesis_profile")]
    pub profile: String,
    pub channel_id: String,
    pub output_block: PathBuf,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Organization {
    pub name: String,
    pub kind: OrgKind,
    pub ca: CaDescriptor,
    pub users: OrgUsers,
    /// Node identities in registration order.
    pub nodes: Vec<Identity>,
    #[serde(default)]
    pub genesis: Option<GenesisSpec>,
}

impl Organization {
    pub fn read_from_file(path: &Path) -> BootstrapResult<Organization> {
        let content = fs::read_to_string(path).map_err(|e| BootstrapError::file_error(path, e))?;
        serde_json::from_str(&content).map_err(BootstrapError::parsing_error)
    }

    /// Check the cross-field rules the serde derive cannot express.
    pub fn validate(&self) -> BootstrapResult<()> {
        match self.kind {
            OrgKind::Peer => {
                if self.users.user.is_none() {
                    return Err(BootstrapError::validation_failed(format!(
                        "peer organization {} has no user identity",
                        self.name
                    )));
                }
            }
            OrgKind::Orderer => {
                let Some(genesis) = &self.genesis else {
                    return Err(BootstrapError::validation_failed(format!(
                        "orderer organization {} has no genesis section",
                        self.name
                    )));
                };
                if genesis.output_block.file_name()
                    == Some(RESERVED_GENESIS_BLOCK_NAME.as_ref())
                {
                    return Err(BootstrapError::validation_failed(format!(
                        "genesis output block must not be named {RESERVED_GENESIS_BLOCK_NAME}"
                    )));
                }
            }
        }
        Ok(())
    }
}

fn default_ready_marker() -> String {
    crate::DEFAULT_READY_MARKER.to_string()
}

fn default_client_config() -> PathBuf {
    PathBuf::from(crate::DEFAULT_CA_CLIENT_CONFIG_PATH)
}

fn default_genesis_profile() -> String {
    crate::DEFAULT_GENESIS_PROFILE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    fn peer_org_json() -> &'static str {
        r#"{
            "name": "org1",
            "kind": "peer",
            "ca": {
                "name": "rca-org1",
                "host": "rca-org1",
                "port": 7054,
                "logfile": "/data/logs/rca-org1.log",
                "certfile": "/data/orgs/org1/ca-cert.pem"
            },
            "users": {
                "bootstrap_admin": { "name": "rca-org1-admin", "secret": "rca-org1-adminpw" },
                "admin": { "name": "admin-org1", "secret": "admin-org1pw", "home": "/data/orgs/org1/admin" },
                "user": { "name": "user-org1", "secret": "user-org1pw", "home": "/data/orgs/org1/user" }
            },
            "nodes": [
                { "name": "peer0-org1", "secret": "peer0pw" },
                { "name": "peer1-org1", "secret": "peer1pw" }
            ]
        }"#
    }

    #[test]
    fn peer_org_deserializes_with_defaults() {
        let org: Organization = serde_json::from_str(peer_org_json()).unwrap();
        assert_eq!(org.kind, OrgKind::Peer);
        assert_eq!(org.ca.name, "rca-org1");
        assert_eq!(org.ca.ready_marker, crate::DEFAULT_READY_MARKER);
        assert_eq!(
            org.ca.client_config,
            PathBuf::from(crate::DEFAULT_CA_CLIENT_CONFIG_PATH)
        );
        assert_eq!(org.nodes.len(), 2);
        assert_eq!(org.genesis, None);
        org.validate().unwrap();
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let json = peer_org_json().replacen("\"name\"", "\"nam\"", 1);
        assert!(serde_json::from_str::<Organization>(&json).is_err());
    }

    #[test]
    fn peer_org_without_user_fails_validation() {
        let mut org: Organization = serde_json::from_str(peer_org_json()).unwrap();
        org.users.user = None;
        assert_matches!(org.validate(), Err(BootstrapError::ValidationFailed(_)));
    }

    #[test]
    fn orderer_org_requires_genesis_section() {
        let mut org: Organization = serde_json::from_str(peer_org_json()).unwrap();
        org.kind = OrgKind::Orderer;
        assert_matches!(org.validate(), Err(BootstrapError::ValidationFailed(_)));

        org.genesis = Some(GenesisSpec {
            profile: crate::DEFAULT_GENESIS_PROFILE.to_string(),
            channel_id: "systemchannel".to_string(),
            output_block: PathBuf::from("/data/genesis/genesis.block"),
        });
        org.validate().unwrap();
    }

    #[test]
    fn reserved_genesis_block_name_is_rejected() {
        let mut org: Organization = serde_json::from_str(peer_org_json()).unwrap();
        org.kind = OrgKind::Orderer;
        org.genesis = Some(GenesisSpec {
            profile: crate::DEFAULT_GENESIS_PROFILE.to_string(),
            channel_id: "systemchannel".to_string(),
            output_block: PathBuf::from("/data/genesis/orderer.genesis.block"),
        });
        assert_matches!(org.validate(), Err(BootstrapError::ValidationFailed(_)));
    }

    #[test]
    fn genesis_profile_defaults_when_omitted() {
        let genesis: GenesisSpec = serde_json::from_str(
            r#"{ "channel_id": "systemchannel", "output_block": "/data/genesis.block" }"#,
        )
        .unwrap();
        assert_eq!(genesis.profile, crate::DEFAULT_GENESIS_PROFILE);
    }

    #[test]
    fn read_from_file_reports_missing_config() {
        let result = Organization::read_from_file(Path::new("/nonexistent/org.json"));
        assert_matches!(result, Err(BootstrapError::IoError(_, _)));
    }
}
