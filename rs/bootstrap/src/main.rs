//! The main function of msp-bootstrap processes command line arguments
//! and drives the bootstrap of the configured organization.
use clap::Parser;
use msp_bootstrap::{
    cmd::BootstrapToolArgs, config::Organization, org_bootstrap::OrgBootstrap, util,
    Bootstrap, BootstrapArgs, GracefulExpect,
};
use std::time::Duration;

// Here is an example config file for a peer organization:
//
// {
//     "name": "org1",
//     "kind": "peer",
//     "ca": {
//         "name": "rca-org1",
//         "host": "rca-org1",
//         "port": 7054,
//         "logfile": "/data/logs/rca-org1.log",
//         "certfile": "/data/orgs/org1/ca-cert.pem"
//     },
//     "users": {
//         "bootstrap_admin": { "name": "rca-org1-admin", "secret": "rca-org1-adminpw" },
//         "admin": { "name": "admin-org1", "secret": "admin-org1pw", "home": "/data/orgs/org1/admin" },
//         "user": { "name": "user-org1", "secret": "user-org1pw", "home": "/data/orgs/org1/user" }
//     },
//     "nodes": [
//         { "name": "peer0-org1", "secret": "peer0pw" },
//         { "name": "peer1-org1", "secret": "peer1pw" }
//     ]
// }
//
// An orderer organization drops "user", registers orderers under
// "nodes", and adds:
//
//     "genesis": {
//         "channel_id": "systemchannel",
//         "output_block": "/data/genesis/genesis.block"
//     }

fn main() {
    let logger = util::make_logger();
    let args = BootstrapToolArgs::parse();

    let org = Organization::read_from_file(&args.config_file)
        .expect_graceful("Could not read the organization config");

    let bootstrap = Bootstrap::new(
        logger.clone(),
        org,
        BootstrapArgs {
            ca_client_binary: args.ca_client_binary,
            genesis_binary: args.genesis_binary,
            wait_timeout: Duration::from_secs(args.wait_timeout_secs),
        },
    )
    .expect_graceful("Invalid organization config");

    OrgBootstrap::new(logger, bootstrap, args.next_step)
        .execute_steps()
        .expect_graceful("Bootstrap failed");
}
