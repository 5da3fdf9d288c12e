//! Spawns the node binary, waits for it to report ready and tears it down again.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};

use itertools::Itertools;
use sealkit_rpc::RpcClient;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    config::{NodeConfig, WarmupConfig},
    error::SupervisorError,
    readiness::{LogSubscription, OutputStream, ReadinessDetector, ReadinessFailure, ReadySignal},
};

/// Lifecycle of a supervised process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    /// Spawned, sentinel not seen yet.
    Starting,
    Ready,
    Stopped,
}

/// A running node together with the subscription reading its output.
///
/// The child is spawned with kill-on-drop, so losing the handle still terminates the process.
#[derive(Debug)]
pub struct NodeProcess {
    child: Child,
    binary: PathBuf,
    args: Vec<String>,
    subscription: LogSubscription,
    state: ProcessState,
}

impl NodeProcess {
    /// Spawns `binary` and attaches a readiness detector to its stdout and stderr without
    /// waiting for it.
    pub fn spawn(
        binary: &Path,
        args: Vec<String>,
        detector: &ReadinessDetector,
    ) -> Result<(Self, ReadySignal), SupervisorError> {
        info!(binary = %binary.display(), args = %args.iter().join(" "), "spawning node");

        let mut child = Command::new(binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| match source.kind() {
                ErrorKind::NotFound => {
                    SupervisorError::MissingBinary { binary: binary.to_path_buf(), args: args.clone() }
                }
                _ => SupervisorError::Spawn { binary: binary.to_path_buf(), args: args.clone(), source },
            })?;

        let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
            (Some(stdout), Some(stderr)) => (stdout, stderr),
            _ => {
                return Err(SupervisorError::Spawn {
                    binary: binary.to_path_buf(),
                    args,
                    source: std::io::Error::other("node output was not captured"),
                });
            }
        };

        let streams: Vec<(&'static str, OutputStream)> =
            vec![("stdout", Box::new(stdout)), ("stderr", Box::new(stderr))];
        let (subscription, signal) = detector.attach(streams);

        let process = Self {
            child,
            binary: binary.to_path_buf(),
            args,
            subscription,
            state: ProcessState::Starting,
        };
        Ok((process, signal))
    }

    /// Spawns `binary` and waits up to `timeout` for the sentinel.
    ///
    /// On failure the process is stopped before the error is returned, and the error carries
    /// everything the node printed.
    pub async fn start(
        binary: &Path,
        args: Vec<String>,
        detector: &ReadinessDetector,
        timeout: Duration,
    ) -> Result<Self, SupervisorError> {
        let (mut process, signal) = Self::spawn(binary, args, detector)?;

        match signal.wait(timeout).await {
            Ok(()) => {
                process.state = ProcessState::Ready;
                info!(pid = ?process.id(), "node ready");
                Ok(process)
            }
            Err(failure) => {
                process.stop().await;
                let binary = process.binary.clone();
                let args = process.args.clone();
                Err(match failure {
                    ReadinessFailure::TimedOut { logs } => {
                        SupervisorError::ReadinessTimeout { binary, args, timeout, logs }
                    }
                    ReadinessFailure::Closed { logs } => {
                        SupervisorError::ExitedBeforeReady { binary, args, logs }
                    }
                })
            }
        }
    }

    /// Kills the process and reaps it. Safe to call again, and on a process that already
    /// exited by itself.
    pub async fn stop(&mut self) {
        if self.state == ProcessState::Stopped {
            return;
        }
        self.state = ProcessState::Stopped;

        if let Err(e) = self.child.start_kill() {
            debug!(error = %e, "node already exited");
        }
        match self.child.wait().await {
            Ok(status) => info!(%status, "node stopped"),
            Err(e) => warn!(error = %e, "failed to reap node process"),
        }
        self.subscription.close();
    }

    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Output buffered so far. Empty once ready unless verbose logging is on.
    pub fn logs(&self) -> String {
        self.subscription.logs()
    }

    /// Polls `eth_chainId` at `url` until it answers, so lazily built runtime state exists
    /// before the first timed step.
    pub async fn warmup(&self, url: Url, config: WarmupConfig) -> Result<(), SupervisorError> {
        let client = RpcClient::http(url).map_err(|e| SupervisorError::Endpoint {
            binary: self.binary.clone(),
            args: self.args.clone(),
            message: e.to_string(),
        })?;
        let attempts = config.max_attempts.max(1);

        let mut attempt = 1;
        loop {
            match client.eth().chain_id().await {
                Ok(chain_id) => {
                    debug!(chain_id, attempt, "warmup call succeeded");
                    return Ok(());
                }
                Err(source) if attempt >= attempts => {
                    return Err(SupervisorError::Warmup {
                        binary: self.binary.clone(),
                        args: self.args.clone(),
                        attempts,
                        source,
                    });
                }
                Err(e) => {
                    debug!(attempt, error = %e, "warmup call failed, retrying");
                    attempt += 1;
                    tokio::time::sleep(config.delay).await;
                }
            }
        }
    }
}

/// Starts a node as described by `config` and, if enabled, warms it up before returning.
pub async fn launch(config: &NodeConfig) -> Result<NodeProcess, SupervisorError> {
    let detector = ReadinessDetector::new(config.sentinel.clone(), config.display_log);
    let mut process =
        NodeProcess::start(&config.binary, config.args(), &detector, config.readiness_timeout())
            .await?;

    if config.warmup.enabled {
        let result = match config.rpc_url() {
            Ok(url) => process.warmup(url, config.warmup).await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            process.stop().await;
            return Err(e);
        }
    }

    Ok(process)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::READY_SENTINEL;

    fn sh(script: &str) -> (PathBuf, Vec<String>) {
        (PathBuf::from("/bin/sh"), vec!["-c".to_string(), script.to_string()])
    }

    fn detector() -> ReadinessDetector {
        ReadinessDetector::new(READY_SENTINEL, false)
    }

    #[tokio::test]
    async fn missing_binary_is_distinguished() {
        let err = NodeProcess::start(
            Path::new("/definitely/not/here/amax-eva"),
            vec!["--tmp".into()],
            &detector(),
            Duration::from_secs(1),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, SupervisorError::MissingBinary { .. }));
        assert_eq!(err.exit_code(), 1);
        assert!(err.diagnostics().contains("Args: --tmp"));
    }

    #[tokio::test]
    async fn timeout_reports_every_line() {
        let (binary, args) = sh("echo first; echo second >&2; echo third; exec sleep 30");
        let err = NodeProcess::start(&binary, args, &detector(), Duration::from_millis(500))
            .await
            .unwrap_err();

        let SupervisorError::ReadinessTimeout { logs, .. } = &err else {
            panic!("expected a readiness timeout, got {err:?}");
        };
        for line in ["first", "second", "third"] {
            assert!(logs.contains(line), "missing {line} in {logs:?}");
        }
    }

    #[tokio::test]
    async fn exiting_early_fails_fast() {
        let (binary, args) = sh("echo boom; exit 3");
        let err = NodeProcess::start(&binary, args, &detector(), Duration::from_secs(30))
            .await
            .unwrap_err();

        assert!(matches!(err, SupervisorError::ExitedBeforeReady { .. }));
        assert!(err.logs().unwrap_or_default().contains("boom"));
    }

    #[tokio::test]
    async fn ready_process_stops_idempotently() {
        let (binary, args) = sh("echo 'booting'; echo 'Manual Seal Ready' >&2; exec sleep 30");
        let mut process = NodeProcess::start(&binary, args, &detector(), Duration::from_secs(10))
            .await
            .unwrap();

        assert_eq!(process.state(), ProcessState::Ready);
        assert!(process.id().is_some());

        process.stop().await;
        assert_eq!(process.state(), ProcessState::Stopped);
        assert!(process.id().is_none());
        process.stop().await;
        assert_eq!(process.state(), ProcessState::Stopped);
    }

    #[tokio::test]
    async fn stop_tolerates_self_exited_child() {
        let (binary, args) = sh("echo 'Manual Seal Ready'; exit 0");
        let mut process = NodeProcess::start(&binary, args, &detector(), Duration::from_secs(10))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        process.stop().await;
        process.stop().await;
        assert_eq!(process.state(), ProcessState::Stopped);
    }

    #[tokio::test]
    async fn launch_passes_the_fixed_flag_set() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let binary = dir.path().join("amax-eva");
        std::fs::write(&binary, "#!/bin/sh\necho \"args: $*\"\necho 'Manual Seal Ready'\nexec sleep 30\n")
            .unwrap();
        std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o755)).unwrap();

        let config = NodeConfig {
            binary,
            display_log: true,
            warmup: WarmupConfig { enabled: false, ..WarmupConfig::default() },
            ..NodeConfig::default()
        };
        let mut process = launch(&config).await.unwrap();

        let logs = process.logs();
        assert!(logs.contains("--sealing=Manual"), "{logs}");
        assert!(logs.contains("--rpc-port=19932"), "{logs}");
        process.stop().await;
    }

    #[tokio::test]
    async fn warmup_gives_up_after_bounded_attempts() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let url = Url::parse(&format!("http://127.0.0.1:{port}")).unwrap();
        let config = WarmupConfig { enabled: true, max_attempts: 2, delay: Duration::from_millis(10) };

        let (binary, args) = sh("echo 'Manual Seal Ready'; exec sleep 30");
        let mut process = NodeProcess::start(&binary, args, &detector(), Duration::from_secs(10))
            .await
            .unwrap();

        let err = process.warmup(url, config).await.unwrap_err();
        process.stop().await;

        assert!(err.diagnostics().contains("Binary: /bin/sh\nArgs: -c "));
        let SupervisorError::Warmup { attempts, source, .. } = err else {
            panic!("expected a warmup failure");
        };
        assert_eq!(attempts, 2);
        assert!(source.is_transport());
    }
}
