use crate::config::GenesisSpec;
use std::path::PathBuf;

pub type ConfigTxGen = Vec<String>;

/// Struct simplifying the creation of `configtxgen` commands.
#[derive(Debug, Clone)]
pub struct GenesisHelper {
    pub binary: PathBuf,
}

impl GenesisHelper {
    pub fn new(binary: PathBuf) -> Self {
        Self { binary }
    }

    /// Return a configtxgen command generating the system channel genesis
    /// block described by `genesis`.
    pub fn get_generate_command(&self, genesis: &GenesisSpec) -> ConfigTxGen {
        let mut configtxgen = vec![self.binary.display().to_string()];
        configtxgen.push("-profile".to_string());
        configtxgen.push(genesis.profile.clone());
        configtxgen.push("-channelID".to_string());
        configtxgen.push(genesis.channel_id.clone());
        configtxgen.push("-outputBlock".to_string());
        configtxgen.push(genesis.output_block.display().to_string());
        configtxgen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn generate_command_names_profile_channel_and_block() {
        let helper = GenesisHelper::new(PathBuf::from("configtxgen"));
        let genesis = GenesisSpec {
            profile: crate::DEFAULT_GENESIS_PROFILE.to_string(),
            channel_id: "systemchannel".to_string(),
            output_block: PathBuf::from("/data/genesis/genesis.block"),
        };
        assert_eq!(
            helper.get_generate_command(&genesis),
            vec![
                "configtxgen".to_string(),
                "-profile".to_string(),
                "OrgsOrdererGenesis".to_string(),
                "-channelID".to_string(),
                "systemchannel".to_string(),
                "-outputBlock".to_string(),
                "/data/genesis/genesis.block".to_string(),
            ]
        );
    }
}
