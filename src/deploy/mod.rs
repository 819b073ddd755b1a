//! Drives `helm` to install or upgrade the Kubescape operator.
//!
//! The deploy sequence is four commands issued strictly one after the
//! other: `version`, `repo add`, `repo update`, `upgrade --install`.
//! Only the last command decides success; earlier failures are logged and
//! the sequence carries on, matching how the extension has always behaved.

mod credentials;

pub use credentials::{is_valid_identifier, DeploymentCredentials, Identifier, IdentifierError};

use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::host::{command_string, HostBridge};

pub const HELM: &str = "helm";
pub const KUBECTL: &str = "kubectl";
pub const RELEASE_NAME: &str = "kubescape";
pub const NAMESPACE: &str = "kubescape";
pub const REPO_NAME: &str = "kubescape";
pub const REPO_URL: &str = "https://kubescape.github.io/helm-charts/";
pub const SERVER_HOST: &str = "api.armosec.io";
/// Context name used when kubectl cannot tell us the current one
pub const FALLBACK_CONTEXT: &str = "docker-desktop";

/// Which operator chart gets installed, and the values it expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ChartRevision {
    /// `kubescape-cloud-operator`, account id only
    CloudOperator,
    /// `kubescape-operator`, account id plus access key and backend server
    #[default]
    Operator,
}

impl ChartRevision {
    pub fn chart(&self) -> &'static str {
        match self {
            ChartRevision::CloudOperator => "kubescape/kubescape-cloud-operator",
            ChartRevision::Operator => "kubescape/kubescape-operator",
        }
    }

    pub fn requires_access_key(&self) -> bool {
        matches!(self, ChartRevision::Operator)
    }

    pub fn server(&self) -> Option<&'static str> {
        match self {
            ChartRevision::CloudOperator => None,
            ChartRevision::Operator => Some(SERVER_HOST),
        }
    }
}

/// One `helm` invocation of the deploy sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelmCommand {
    pub label: &'static str,
    pub args: Vec<String>,
}

impl HelmCommand {
    fn new(label: &'static str, args: &[&str]) -> Self {
        Self {
            label,
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn display(&self) -> String {
        command_string(HELM, &self.args)
    }
}

/// Outcome of one deploy attempt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentResult {
    pub combined_output: String,
    pub failed: bool,
    pub error_text: Option<String>,
}

/// Progress of the sequence, reported as each command starts and ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployProgress {
    Started(usize),
    Finished { step: usize, ok: bool },
}

pub struct Deployer {
    host: Arc<dyn HostBridge>,
    revision: ChartRevision,
}

impl Deployer {
    pub fn new(host: Arc<dyn HostBridge>, revision: ChartRevision) -> Self {
        Self { host, revision }
    }

    pub fn revision(&self) -> ChartRevision {
        self.revision
    }

    /// Whether the release is already installed.
    ///
    /// True only when `helm list -q` prints exactly the release name and one
    /// newline. Anything else, including a failed query, counts as absent.
    pub fn is_deployed(&self) -> bool {
        let args: Vec<String> = ["list", "-q", "-n", NAMESPACE]
            .iter()
            .map(|a| a.to_string())
            .collect();

        match self.host.exec(HELM, &args) {
            Ok(out) => {
                debug!("helm list returned {:?}", out.stdout);
                out.stdout == format!("{RELEASE_NAME}\n")
            }
            Err(e) => {
                warn!("Could not query installed releases: {e}");
                false
            }
        }
    }

    /// Name of the kubectl context the chart will report as its cluster
    pub fn current_context(&self) -> String {
        let args = vec!["config".to_string(), "current-context".to_string()];
        match self.host.exec(KUBECTL, &args) {
            Ok(out) if out.succeeded() && !out.stdout.trim().is_empty() => {
                out.stdout.trim().to_string()
            }
            Ok(out) => {
                warn!("kubectl current-context failed: {}", out.stderr.trim());
                FALLBACK_CONTEXT.to_string()
            }
            Err(e) => {
                warn!("kubectl unavailable: {e}");
                FALLBACK_CONTEXT.to_string()
            }
        }
    }

    /// The four commands of the deploy sequence, in execution order
    pub fn commands(&self, creds: &DeploymentCredentials, cluster_context: &str) -> Vec<HelmCommand> {
        let mut install = HelmCommand::new(
            "Install Kubescape",
            &[
                "upgrade",
                "--install",
                RELEASE_NAME,
                self.revision.chart(),
                "-n",
                NAMESPACE,
                "--create-namespace",
                "--set",
            ],
        );
        install.args.push(format!("account={}", creds.account_id.as_str()));
        if let Some(key) = &creds.access_key {
            install.args.push("--set".to_string());
            install.args.push(format!("accessKey={}", key.as_str()));
        }
        install.args.push("--set".to_string());
        install.args.push(format!("clusterName={cluster_context}"));
        if let Some(server) = self.revision.server() {
            install.args.push("--set".to_string());
            install.args.push(format!("server={server}"));
        }

        vec![
            HelmCommand::new("Check helm version", &["version"]),
            HelmCommand::new("Add Kubescape repository", &["repo", "add", REPO_NAME, REPO_URL]),
            HelmCommand::new("Update repositories", &["repo", "update"]),
            install,
        ]
    }

    pub fn deploy(&self, creds: &DeploymentCredentials, cluster_context: &str) -> DeploymentResult {
        self.deploy_with_progress(creds, cluster_context, |_| {})
    }

    /// Run the deploy sequence, calling `progress` around each command
    pub fn deploy_with_progress(
        &self,
        creds: &DeploymentCredentials,
        cluster_context: &str,
        mut progress: impl FnMut(DeployProgress),
    ) -> DeploymentResult {
        let commands = self.commands(creds, cluster_context);
        let last = commands.len() - 1;
        let mut result = DeploymentResult::default();

        info!(
            "Deploying {} ({}) to context {}",
            RELEASE_NAME,
            self.revision.chart(),
            cluster_context
        );

        for (step, cmd) in commands.iter().enumerate() {
            progress(DeployProgress::Started(step));

            let output = match self.host.exec(HELM, &cmd.args) {
                Ok(output) => output,
                Err(e) => {
                    // Nothing ran, so there is no output to carry on with
                    warn!("{} could not run: {e}", cmd.label);
                    progress(DeployProgress::Finished { step, ok: false });
                    result.failed = true;
                    result.error_text = Some(e.to_string());
                    return result;
                }
            };

            result.combined_output.push_str(&output.stdout);

            let ok = output.stderr.is_empty();
            if !ok {
                if step == last {
                    result.failed = true;
                    result.error_text = Some(output.stderr.clone());
                } else {
                    warn!("{} reported: {}", cmd.label, output.stderr.trim_end());
                }
            }
            progress(DeployProgress::Finished { step, ok });
        }

        if result.failed {
            warn!("Deployment failed");
        } else {
            info!("Deployment finished");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::recording::RecordingHost;
    use crate::host::ExecOutput;
    use pretty_assertions::assert_eq;

    const ACCOUNT: &str = "11111111-1111-1111-1111-111111111111";
    const KEY: &str = "22222222-2222-2222-2222-222222222222";

    fn strings(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn creds(key: Option<&str>) -> DeploymentCredentials {
        DeploymentCredentials::new(
            Identifier::parse(ACCOUNT, "Account ID").unwrap(),
            key.map(|k| Identifier::parse(k, "Access key").unwrap()),
        )
    }

    fn deployer(host: &Arc<RecordingHost>, revision: ChartRevision) -> Deployer {
        let bridge: Arc<dyn HostBridge> = host.clone();
        Deployer::new(bridge, revision)
    }

    #[test]
    fn deploy_issues_four_calls_in_order() {
        let host = Arc::new(RecordingHost::new());
        let result = deployer(&host, ChartRevision::CloudOperator).deploy(&creds(None), "docker-desktop");

        assert!(!result.failed);
        let calls = host.calls();
        assert_eq!(calls.len(), 4);
        assert!(calls.iter().all(|(program, _)| program == "helm"));
        assert_eq!(calls[0].1, strings(&["version"]));
        assert_eq!(
            calls[1].1,
            strings(&["repo", "add", "kubescape", "https://kubescape.github.io/helm-charts/"])
        );
        assert_eq!(calls[2].1, strings(&["repo", "update"]));
        assert_eq!(
            calls[3].1,
            strings(&[
                "upgrade",
                "--install",
                "kubescape",
                "kubescape/kubescape-cloud-operator",
                "-n",
                "kubescape",
                "--create-namespace",
                "--set",
                "account=11111111-1111-1111-1111-111111111111",
                "--set",
                "clusterName=docker-desktop",
            ])
        );
    }

    #[test]
    fn operator_revision_passes_access_key_and_server() {
        let host = Arc::new(RecordingHost::new());
        deployer(&host, ChartRevision::Operator).deploy(&creds(Some(KEY)), "kind-dev");

        let calls = host.calls();
        assert_eq!(
            calls[3].1,
            strings(&[
                "upgrade",
                "--install",
                "kubescape",
                "kubescape/kubescape-operator",
                "-n",
                "kubescape",
                "--create-namespace",
                "--set",
                "account=11111111-1111-1111-1111-111111111111",
                "--set",
                "accessKey=22222222-2222-2222-2222-222222222222",
                "--set",
                "clusterName=kind-dev",
                "--set",
                "server=api.armosec.io",
            ])
        );
    }

    #[test]
    fn install_display_keeps_access_key_out() {
        let host = Arc::new(RecordingHost::new());
        let commands = deployer(&host, ChartRevision::Operator).commands(&creds(Some(KEY)), "kind-dev");

        let shown = commands[3].display();
        assert!(!shown.contains(KEY), "{shown}");
        assert!(shown.contains("'accessKey=<redacted>'"));
        assert!(shown.contains(&format!("account={ACCOUNT}")));
    }

    #[test]
    fn install_error_fails_but_keeps_earlier_output() {
        let host = Arc::new(
            RecordingHost::new()
                .respond(ExecOutput::success("v3.14.0\n"))
                .respond(ExecOutput::success("added\n"))
                .respond(ExecOutput::success("updated\n"))
                .respond(ExecOutput::failure("Error: cluster unreachable\n", 1)),
        );
        let result = deployer(&host, ChartRevision::CloudOperator).deploy(&creds(None), "ctx");

        assert!(result.failed);
        assert_eq!(result.error_text.as_deref(), Some("Error: cluster unreachable\n"));
        assert_eq!(result.combined_output, "v3.14.0\nadded\nupdated\n");
    }

    #[test]
    fn intermediate_failures_do_not_abort() {
        let host = Arc::new(
            RecordingHost::new()
                .respond(ExecOutput::success("v3\n"))
                .respond(ExecOutput::failure("Error: repository name already exists\n", 1))
                .respond(ExecOutput::success("updated\n"))
                .respond(ExecOutput::success("STATUS: deployed\n")),
        );
        let result = deployer(&host, ChartRevision::CloudOperator).deploy(&creds(None), "ctx");

        assert_eq!(host.calls().len(), 4);
        assert!(!result.failed);
        assert_eq!(result.error_text, None);
        assert_eq!(result.combined_output, "v3\nupdated\nSTATUS: deployed\n");
    }

    #[test]
    fn spawn_failure_stops_the_sequence() {
        let host = Arc::new(RecordingHost::new().fail_spawn("helm"));
        let result = deployer(&host, ChartRevision::CloudOperator).deploy(&creds(None), "ctx");

        assert_eq!(host.calls().len(), 1);
        assert!(result.failed);
        assert!(result.error_text.unwrap().contains("failed to run helm"));
    }

    #[test]
    fn progress_brackets_each_command() {
        let host = Arc::new(RecordingHost::new());
        let mut seen = Vec::new();
        deployer(&host, ChartRevision::CloudOperator).deploy_with_progress(
            &creds(None),
            "ctx",
            |p| seen.push(p),
        );

        assert_eq!(seen.len(), 8);
        assert_eq!(seen[0], DeployProgress::Started(0));
        assert_eq!(seen[7], DeployProgress::Finished { step: 3, ok: true });
    }

    #[test]
    fn is_deployed_requires_exact_output() {
        for (stdout, expected) in [
            ("kubescape\n", true),
            ("kubescape", false),
            ("kubescape\nkubescape\n", false),
            ("", false),
            (" kubescape\n", false),
            ("kubescape\r\n", false),
        ] {
            let host = Arc::new(RecordingHost::new().respond(ExecOutput::success(stdout)));
            assert_eq!(
                deployer(&host, ChartRevision::Operator).is_deployed(),
                expected,
                "stdout {stdout:?}"
            );
            assert_eq!(host.calls()[0].1, strings(&["list", "-q", "-n", "kubescape"]));
        }
    }

    #[test]
    fn is_deployed_false_when_helm_missing() {
        let host = Arc::new(RecordingHost::new().fail_spawn("helm"));
        assert!(!deployer(&host, ChartRevision::Operator).is_deployed());
    }

    #[test]
    fn current_context_falls_back() {
        let host = Arc::new(RecordingHost::new().respond(ExecOutput::success("kind-dev\n")));
        assert_eq!(deployer(&host, ChartRevision::Operator).current_context(), "kind-dev");

        let host = Arc::new(
            RecordingHost::new().respond(ExecOutput::failure("error: current-context is not set\n", 1)),
        );
        assert_eq!(
            deployer(&host, ChartRevision::Operator).current_context(),
            FALLBACK_CONTEXT
        );
    }
}
