use std::sync::Arc;

use kubescape_wizard::deploy::{ChartRevision, DeploymentCredentials, Deployer};
use kubescape_wizard::host::{DryrunHost, HostBridge};
use kubescape_wizard::wizard::{default_steps, Sequencer, StepId};
use pretty_assertions::assert_eq;

const ACCOUNT: &str = "0f1e2d3c-4b5a-6978-8796-a5b4c3d2e1f0";
const ACCESS_KEY: &str = "11111111-2222-3333-4444-555555555555";

#[test]
fn dryrun_install_flips_detection() {
    let host: Arc<dyn HostBridge> = Arc::new(DryrunHost::new());
    let deployer = Deployer::new(host, ChartRevision::Operator);
    assert!(!deployer.is_deployed());

    let creds = DeploymentCredentials::from_input(ACCOUNT, ACCESS_KEY, true).unwrap();
    let context = deployer.current_context();
    assert_eq!(context, "docker-desktop");

    let result = deployer.deploy(&creds, &context);
    assert!(!result.failed, "{:?}", result.error_text);
    assert!(result.combined_output.contains("STATUS: deployed"));
    assert!(deployer.is_deployed());
}

#[test]
fn sequencer_walks_to_monitor_after_deploy() {
    let mut seq = Sequencer::new(default_steps(), false);
    assert_eq!(seq.active_id(), Some(StepId::SelectProvider));

    seq.skip().unwrap();
    seq.skip().unwrap();
    assert_eq!(seq.active_id(), Some(StepId::Deploy));
    assert!(seq.skip().is_err());
    assert!(seq.advance().is_err());

    seq.set_deployed(true);
    seq.advance().unwrap();
    assert!(seq.is_complete());
    assert!(!seq.retreat());
}

#[test]
fn already_deployed_cluster_opens_on_monitor() {
    let seq = Sequencer::new(default_steps(), true);
    assert!(seq.is_complete());
    assert_eq!(seq.active_id(), None);
}
