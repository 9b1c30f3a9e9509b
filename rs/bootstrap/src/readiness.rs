//! Polling until the CA of an organization is ready to serve requests.
//!
//! Two readiness styles exist and both are kept: local enrollments wait
//! until the CA's log carries the ready marker and its certificate files
//! are on disk, while the bootstrap admin enrollment only needs the CA's
//! TCP port to accept connections.
use crate::config::CaDescriptor;
use crate::error::{BootstrapError, BootstrapResult};
use crate::util::sleep_secs;
use crate::WAIT_POLL_INTERVAL_SECS;
use slog::{debug, info, Logger};
use std::fs;
use std::net::{TcpStream, ToSocketAddrs};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// What to poll to decide that a CA is serving.
#[derive(Debug, Clone)]
pub enum ReadinessEvidence {
    /// The CA's log contains `marker` and all `cert_files` exist.
    LogMarker {
        logfile: PathBuf,
        marker: String,
        cert_files: Vec<PathBuf>,
    },
    /// A TCP connection to `host:port` succeeds.
    Port { host: String, port: u16 },
}

impl ReadinessEvidence {
    /// Evidence gating local enrollments against the given CA.
    pub fn ca_log(ca: &CaDescriptor) -> Self {
        ReadinessEvidence::LogMarker {
            logfile: ca.logfile.clone(),
            marker: ca.ready_marker.clone(),
            cert_files: vec![ca.certfile.clone()],
        }
    }

    /// Evidence gating the bootstrap admin enrollment against the given
    /// CA.
    pub fn ca_port(ca: &CaDescriptor) -> Self {
        ReadinessEvidence::Port {
            host: ca.host.clone(),
            port: ca.port,
        }
    }

    fn is_ready(&self) -> bool {
        match self {
            ReadinessEvidence::LogMarker {
                logfile,
                marker,
                cert_files,
            } => {
                // A log that cannot be read yet only means the CA has not
                // started writing it.
                let marker_found = fs::read_to_string(logfile)
                    .map(|content| content.contains(marker))
                    .unwrap_or(false);
                marker_found && cert_files.iter().all(|file| file.exists())
            }
            ReadinessEvidence::Port { host, port } => (host.as_str(), *port)
                .to_socket_addrs()
                .ok()
                .and_then(|mut addrs| addrs.next())
                .map(|addr| {
                    TcpStream::connect_timeout(
                        &addr,
                        Duration::from_secs(WAIT_POLL_INTERVAL_SECS),
                    )
                    .is_ok()
                })
                .unwrap_or(false),
        }
    }
}

/// Poll the given evidence until it signals readiness or `timeout`
/// elapses. Fails with [BootstrapError::DependencyNotReady] within one
/// polling interval of the timeout, never earlier and never later.
pub fn wait_for_ready(
    logger: &Logger,
    label: &str,
    evidence: &ReadinessEvidence,
    timeout: Duration,
) -> BootstrapResult<()> {
    let started = Instant::now();
    loop {
        if evidence.is_ready() {
            info!(logger, "{} is ready", label);
            return Ok(());
        }
        if started.elapsed() >= timeout {
            return Err(BootstrapError::dependency_not_ready(
                label,
                started.elapsed(),
            ));
        }
        debug!(logger, "Waiting for {}...", label);
        sleep_secs(WAIT_POLL_INTERVAL_SECS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::make_logger;
    use assert_matches::assert_matches;
    use std::fs;
    use std::net::TcpListener;
    use tempfile::TempDir;

    fn tmpdir(prefix: &str) -> TempDir {
        tempfile::Builder::new()
            .prefix(prefix)
            .tempdir()
            .expect("Could not create a temp dir")
    }

    #[test]
    fn wait_fails_after_the_configured_timeout() {
        let tmp = tmpdir("readiness");
        let evidence = ReadinessEvidence::LogMarker {
            logfile: tmp.path().join("absent.log"),
            marker: "Listening on".to_string(),
            cert_files: vec![],
        };

        let started = Instant::now();
        let result = wait_for_ready(
            &make_logger(),
            "test CA",
            &evidence,
            Duration::from_secs(1),
        );
        let elapsed = started.elapsed();

        assert_matches!(result, Err(BootstrapError::DependencyNotReady(label, _)) if label == "test CA");
        assert!(elapsed >= Duration::from_secs(1));
        assert!(elapsed < Duration::from_secs(3));
    }

    #[test]
    fn wait_returns_once_marker_and_cert_are_present() {
        let tmp = tmpdir("readiness");
        let logfile = tmp.path().join("ca.log");
        let certfile = tmp.path().join("ca-cert.pem");
        fs::write(&logfile, "serving...\nListening on https://0.0.0.0:7054\n").unwrap();
        fs::write(&certfile, "cert").unwrap();

        let evidence = ReadinessEvidence::LogMarker {
            logfile,
            marker: "Listening on".to_string(),
            cert_files: vec![certfile],
        };
        wait_for_ready(
            &make_logger(),
            "test CA",
            &evidence,
            Duration::from_secs(1),
        )
        .unwrap();
    }

    #[test]
    fn marker_alone_is_not_enough_without_cert_files() {
        let tmp = tmpdir("readiness");
        let logfile = tmp.path().join("ca.log");
        fs::write(&logfile, "Listening on https://0.0.0.0:7054\n").unwrap();

        let evidence = ReadinessEvidence::LogMarker {
            logfile,
            marker: "Listening on".to_string(),
            cert_files: vec![tmp.path().join("missing-cert.pem")],
        };
        assert_matches!(
            wait_for_ready(
                &make_logger(),
                "test CA",
                &evidence,
                Duration::from_secs(0),
            ),
            Err(BootstrapError::DependencyNotReady(_, _))
        );
    }

    #[test]
    fn port_wait_succeeds_against_a_bound_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let evidence = ReadinessEvidence::Port {
            host: "127.0.0.1".to_string(),
            port,
        };
        wait_for_ready(
            &make_logger(),
            "test CA",
            &evidence,
            Duration::from_secs(1),
        )
        .unwrap();
    }
}
