mod config;
mod error;
mod sequencer;
mod steps;
pub mod ui;
mod widgets;

pub use config::{DeployConfig, GeneralConfig, LinksConfig, ProviderConfig, WizardConfig};
pub use error::{Result, WizardError};
pub use sequencer::{SequenceError, Sequencer};
pub use steps::{default_steps, Step, StepId, StepResult};
pub use widgets::StatusBarState;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::deploy::{DeployProgress, Deployer, DeploymentCredentials, DeploymentResult};
use crate::host::HostBridge;
use crate::ui::Theme;
use crate::vim::{InputBuffer, ModeAction, VimMode};

/// Length of the canonical UUID text form
const IDENTIFIER_LEN: usize = 36;

#[derive(Debug)]
pub enum ExecutionMessage {
    TaskStarted(usize),
    TaskFinished { idx: usize, ok: bool },
    DeployComplete(DeploymentResult),
}

/// Actions the event loop performs on behalf of the app
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardAction {
    /// Run the deploy sequence with the credentials in the form
    Deploy,
}

/// Which deploy form field has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployField {
    AccountId,
    AccessKey,
}

/// Message displayed to the user
pub struct Message {
    pub text: String,
    pub is_error: bool,
}

/// Status of one helm command in the deploy task list
#[derive(Debug, Clone)]
pub struct TaskStatus {
    pub name: String,
    pub command: String,
    pub status: TaskState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    Success,
    Failed,
}

pub struct WizardApp {
    pub config: WizardConfig,
    pub theme: Theme,
    host: Arc<dyn HostBridge>,
    deployer: Arc<Deployer>,

    pub vim_mode: VimMode,
    pub command_buffer: InputBuffer,

    pub sequencer: Sequencer,
    /// Deployment was found at startup, so the wizard never ran
    pub started_deployed: bool,

    // Provider step
    pub providers: Vec<ProviderConfig>,
    pub provider_selected: usize,
    pub chosen_provider: Option<String>,

    // Deploy step form
    pub account_id: InputBuffer,
    pub access_key: InputBuffer,
    pub deploy_field: DeployField,
    /// Both fields hold well-formed identifiers
    pub submit_available: bool,
    pub cluster_context: Option<String>,

    // Deploy execution
    pub tasks: Vec<TaskStatus>,
    pub is_executing: bool,
    pub deploy_output: String,
    /// Install error exactly as helm reported it, kept until the next attempt
    pub deploy_error: Option<String>,
    pub deploy_failed: bool,

    pub message: Option<Message>,
    pub show_help: bool,
    pub confirm_quit: bool,
    pub should_exit: bool,
    pub status_bar: StatusBarState,
    spinner_frame: usize,
}

impl WizardApp {
    pub fn new(config: WizardConfig, host: Arc<dyn HostBridge>) -> Self {
        let deployer = Arc::new(Deployer::new(host.clone(), config.deploy.revision));

        let already_deployed = deployer.is_deployed();
        if already_deployed {
            info!("Kubescape release found, opening monitor view");
        }

        let providers = config.provider_list();
        let mut app = Self {
            theme: Theme::default(),
            host,
            deployer,
            vim_mode: VimMode::Normal,
            command_buffer: InputBuffer::new(),
            sequencer: Sequencer::new(default_steps(), already_deployed),
            started_deployed: already_deployed,
            providers,
            provider_selected: 0,
            chosen_provider: None,
            account_id: InputBuffer::new().with_limit(IDENTIFIER_LEN),
            access_key: InputBuffer::masked().with_limit(IDENTIFIER_LEN),
            deploy_field: DeployField::AccountId,
            submit_available: false,
            cluster_context: None,
            tasks: Vec::new(),
            is_executing: false,
            deploy_output: String::new(),
            deploy_error: None,
            deploy_failed: false,
            message: None,
            show_help: false,
            confirm_quit: false,
            should_exit: false,
            status_bar: StatusBarState::default(),
            spinner_frame: 0,
            config,
        };
        app.on_step_entered();
        app
    }

    pub fn is_dryrun(&self) -> bool {
        self.config.general.dryrun
    }

    pub fn current_step_id(&self) -> Option<StepId> {
        self.sequencer.active_id()
    }

    pub fn requires_access_key(&self) -> bool {
        self.deployer.revision().requires_access_key()
    }

    /// Sidebar status of the step at `idx`
    pub fn step_result(&self, idx: usize) -> StepResult {
        let active = self.sequencer.active_index();
        if self.sequencer.is_skipped(idx) {
            StepResult::Skipped
        } else if idx < active {
            StepResult::Completed
        } else if idx == active && self.current_step_id() == Some(StepId::Deploy) {
            if self.deploy_failed {
                StepResult::Failed
            } else if self.sequencer.is_deployed() {
                StepResult::Completed
            } else {
                StepResult::Pending
            }
        } else {
            StepResult::Pending
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<WizardAction> {
        if self.message.is_some() && !self.is_executing {
            self.message = None;
        }

        if self.confirm_quit {
            self.handle_confirm_key(key);
            self.update_status_bar();
            return None;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                self.show_help = false;
            }
            self.update_status_bar();
            return None;
        }

        // Nothing may interrupt a running deployment
        if self.is_executing {
            return None;
        }

        let result = match self.vim_mode {
            VimMode::Normal => self.handle_normal_mode(key),
            VimMode::Insert => self.handle_insert_mode(key),
            VimMode::Command => self.handle_command_mode(key),
        };

        self.update_status_bar();
        result
    }

    fn handle_normal_mode(&mut self, key: KeyEvent) -> Option<WizardAction> {
        match key.code {
            KeyCode::Char(':') => {
                self.vim_mode = self.vim_mode.transition(ModeAction::EnterCommand);
                self.command_buffer.clear();
            }
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => self.navigate_down(),
            KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => self.navigate_up(),
            KeyCode::Char('i') | KeyCode::Char('a') => {
                if self.current_step_id() == Some(StepId::Deploy) {
                    self.vim_mode = self.vim_mode.transition(ModeAction::EnterInsert);
                }
            }
            KeyCode::Char('l') | KeyCode::Right => self.go_next(),
            KeyCode::Char('h') | KeyCode::Left => self.go_back(),
            KeyCode::Enter => return self.handle_enter(),
            KeyCode::Char('?') | KeyCode::F(1) => self.show_help = true,
            KeyCode::Char('q') => self.confirm_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.confirm_quit = true;
            }
            _ => {}
        }
        None
    }

    fn handle_insert_mode(&mut self, key: KeyEvent) -> Option<WizardAction> {
        match key.code {
            KeyCode::Esc => {
                self.vim_mode = self.vim_mode.transition(ModeAction::Escape);
            }
            KeyCode::Enter => {
                if self.deploy_field == DeployField::AccountId && self.requires_access_key() {
                    self.deploy_field = DeployField::AccessKey;
                } else {
                    self.vim_mode = VimMode::Normal;
                    return self.request_deploy();
                }
            }
            KeyCode::Tab | KeyCode::Down => self.navigate_down(),
            KeyCode::BackTab | KeyCode::Up => self.navigate_up(),
            KeyCode::Backspace => {
                if self.focused_field().delete_back() {
                    self.on_credentials_changed();
                }
            }
            KeyCode::Delete => {
                if self.focused_field().delete_forward() {
                    self.on_credentials_changed();
                }
            }
            KeyCode::Left => self.focused_field().move_left(),
            KeyCode::Right => self.focused_field().move_right(),
            KeyCode::Home => self.focused_field().move_start(),
            KeyCode::End => self.focused_field().move_end(),
            KeyCode::Char(c) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    match c {
                        'u' => {
                            self.focused_field().clear();
                            self.on_credentials_changed();
                        }
                        'a' => self.focused_field().move_start(),
                        'e' => self.focused_field().move_end(),
                        _ => {}
                    }
                } else {
                    self.focused_field().insert(c);
                    self.on_credentials_changed();
                }
            }
            _ => {}
        }
        None
    }

    fn handle_command_mode(&mut self, key: KeyEvent) -> Option<WizardAction> {
        match key.code {
            KeyCode::Esc => {
                self.vim_mode = self.vim_mode.transition(ModeAction::Escape);
                self.command_buffer.clear();
            }
            KeyCode::Enter => {
                let cmd = self.command_buffer.content();
                self.vim_mode = self.vim_mode.transition(ModeAction::Execute);
                self.command_buffer.clear();
                return self.execute_command(&cmd);
            }
            KeyCode::Backspace => {
                if self.command_buffer.is_empty() {
                    self.vim_mode = self.vim_mode.transition(ModeAction::Escape);
                } else {
                    self.command_buffer.delete_back();
                }
            }
            KeyCode::Char(c) => self.command_buffer.insert(c),
            _ => {}
        }
        None
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.confirm_quit = false;
                self.should_exit = true;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm_quit = false;
            }
            _ => {}
        }
    }

    fn execute_command(&mut self, cmd: &str) -> Option<WizardAction> {
        let cmd = cmd.trim().to_lowercase();
        let name = cmd.split_whitespace().next().unwrap_or("");

        match name {
            "next" | "n" => self.go_next(),
            "back" | "b" => self.go_back(),
            "skip" | "s" => self.skip_step(),
            "reset" => self.reset(),
            "deploy" | "d" => {
                if self.current_step_id() == Some(StepId::Deploy) {
                    return self.request_deploy();
                }
                self.set_error("Deploy is only available on the Deploy step".to_string());
            }
            "open" | "o" => self.open_step_link(),
            "help" | "h" => self.show_help = true,
            "quit" | "q" => self.confirm_quit = true,
            "q!" => self.should_exit = true,
            "" => {}
            _ => self.set_error(format!("Unknown command: {name}")),
        }
        None
    }

    fn handle_enter(&mut self) -> Option<WizardAction> {
        match self.current_step_id() {
            Some(StepId::SelectProvider) => {
                if let Some(provider) = self.providers.get(self.provider_selected) {
                    let name = provider.name.clone();
                    info!("Provider selected: {}", name);
                    self.set_info(format!("Provider selected: {name}"));
                    self.chosen_provider = Some(name);
                    self.go_next();
                }
            }
            Some(StepId::SignUp) => self.open_step_link(),
            Some(StepId::Deploy) => {
                if self.submit_available {
                    return self.request_deploy();
                }
                self.vim_mode = self.vim_mode.transition(ModeAction::EnterInsert);
            }
            None => self.open_step_link(),
        }
        None
    }

    fn navigate_down(&mut self) {
        match self.current_step_id() {
            Some(StepId::SelectProvider) => {
                if self.provider_selected + 1 < self.providers.len() {
                    self.provider_selected += 1;
                }
            }
            Some(StepId::Deploy) if self.requires_access_key() => {
                self.deploy_field = DeployField::AccessKey;
            }
            _ => {}
        }
    }

    fn navigate_up(&mut self) {
        match self.current_step_id() {
            Some(StepId::SelectProvider) => {
                self.provider_selected = self.provider_selected.saturating_sub(1);
            }
            Some(StepId::Deploy) => self.deploy_field = DeployField::AccountId,
            _ => {}
        }
    }

    fn focused_field(&mut self) -> &mut InputBuffer {
        match self.deploy_field {
            DeployField::AccountId => &mut self.account_id,
            DeployField::AccessKey => &mut self.access_key,
        }
    }

    /// Move forward if the active step allows it
    pub fn go_next(&mut self) {
        match self.sequencer.advance() {
            Ok(()) => self.on_step_entered(),
            Err(e) => self.set_error(e.to_string()),
        }
    }

    pub fn go_back(&mut self) {
        if !self.sequencer.back_available() {
            return;
        }
        if self.sequencer.retreat() {
            self.on_step_entered();
        }
    }

    pub fn skip_step(&mut self) {
        match self.sequencer.active_step() {
            Some(step) if !step.optional => {
                self.set_error("This step is required".to_string());
            }
            None => {}
            Some(_) => match self.sequencer.skip() {
                Ok(()) => self.on_step_entered(),
                Err(e) => self.set_error(e.to_string()),
            },
        }
    }

    pub fn reset(&mut self) {
        if self.started_deployed {
            self.set_error("Kubescape is already deployed".to_string());
            return;
        }
        self.sequencer.reset();
        self.chosen_provider = None;
        self.provider_selected = 0;
        self.tasks.clear();
        self.deploy_output.clear();
        self.deploy_error = None;
        self.deploy_failed = false;
        self.on_step_entered();
    }

    fn on_step_entered(&mut self) {
        self.vim_mode = VimMode::Normal;
        if self.current_step_id() == Some(StepId::Deploy) {
            self.deploy_field = DeployField::AccountId;
            if self.cluster_context.is_none() {
                let context = match &self.config.deploy.cluster_name {
                    Some(name) => name.clone(),
                    None => self.deployer.current_context(),
                };
                info!("Using cluster context {}", context);
                self.cluster_context = Some(context);
            }
            self.on_credentials_changed();
        }
        self.update_status_bar();
    }

    fn on_credentials_changed(&mut self) {
        let key = if self.requires_access_key() {
            self.access_key.content()
        } else {
            String::new()
        };
        self.submit_available = DeploymentCredentials::from_input(
            &self.account_id.content(),
            &key,
            self.requires_access_key(),
        )
        .is_ok();
    }

    fn request_deploy(&mut self) -> Option<WizardAction> {
        match self.credentials() {
            Ok(_) => Some(WizardAction::Deploy),
            Err(e) => {
                self.set_error(e.to_string());
                None
            }
        }
    }

    fn credentials(&self) -> std::result::Result<DeploymentCredentials, crate::deploy::IdentifierError> {
        let key = if self.requires_access_key() {
            self.access_key.content()
        } else {
            String::new()
        };
        DeploymentCredentials::from_input(&self.account_id.content(), &key, self.requires_access_key())
    }

    fn open_step_link(&mut self) {
        let url = match self.current_step_id() {
            Some(StepId::SignUp) => self.config.links.sign_up.clone(),
            None => self.config.links.dashboard.clone(),
            _ => return,
        };
        match self.host.open_url(&url) {
            Ok(()) => self.set_info(format!("Opened {url}")),
            Err(e) => {
                warn!("{e}");
                self.set_error(e.to_string());
            }
        }
    }

    /// Start the deploy sequence in the background.
    /// Returns a receiver for progress, or None when the form is invalid or a
    /// deployment is already running.
    pub fn start_deploy_execution(&mut self) -> Option<mpsc::UnboundedReceiver<ExecutionMessage>> {
        if self.is_executing || self.current_step_id() != Some(StepId::Deploy) {
            return None;
        }

        let creds = match self.credentials() {
            Ok(creds) => creds,
            Err(e) => {
                self.set_error(e.to_string());
                return None;
            }
        };
        let context = self
            .cluster_context
            .clone()
            .unwrap_or_else(|| crate::deploy::FALLBACK_CONTEXT.to_string());

        self.tasks = self
            .deployer
            .commands(&creds, &context)
            .into_iter()
            .map(|cmd| TaskStatus {
                name: cmd.label.to_string(),
                command: cmd.display(),
                status: TaskState::Pending,
            })
            .collect();
        self.deploy_output.clear();
        self.deploy_error = None;
        self.deploy_failed = false;
        self.is_executing = true;
        self.update_status_bar();

        let deployer = self.deployer.clone();
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let progress_tx = tx.clone();
            let result = tokio::task::spawn_blocking(move || {
                deployer.deploy_with_progress(&creds, &context, |progress| {
                    let msg = match progress {
                        DeployProgress::Started(idx) => ExecutionMessage::TaskStarted(idx),
                        DeployProgress::Finished { step, ok } => {
                            ExecutionMessage::TaskFinished { idx: step, ok }
                        }
                    };
                    let _ = progress_tx.send(msg);
                })
            })
            .await;

            let result = result.unwrap_or_else(|e| DeploymentResult {
                combined_output: String::new(),
                failed: true,
                error_text: Some(format!("Deployment task panicked: {e}")),
            });
            let _ = tx.send(ExecutionMessage::DeployComplete(result));
        });

        Some(rx)
    }

    /// Handle a message from the background deploy task
    pub fn handle_execution_message(&mut self, msg: ExecutionMessage) {
        match msg {
            ExecutionMessage::TaskStarted(idx) => {
                if let Some(task) = self.tasks.get_mut(idx) {
                    task.status = TaskState::Running;
                }
            }
            ExecutionMessage::TaskFinished { idx, ok } => {
                if let Some(task) = self.tasks.get_mut(idx) {
                    task.status = if ok { TaskState::Success } else { TaskState::Failed };
                }
            }
            ExecutionMessage::DeployComplete(result) => {
                self.is_executing = false;
                self.deploy_output = result.combined_output;
                self.deploy_failed = result.failed;

                if result.failed {
                    let text = result
                        .error_text
                        .unwrap_or_else(|| "Deployment failed".to_string());
                    self.set_error(text.lines().next().unwrap_or_default().to_string());
                    self.deploy_error = Some(text);
                } else {
                    self.set_info("Kubescape deployed! Press l to continue.".to_string());
                }
                self.sequencer.set_deployed(!result.failed);
                self.update_status_bar();
            }
        }
    }

    pub fn set_error(&mut self, text: String) {
        self.message = Some(Message {
            text,
            is_error: true,
        });
    }

    pub fn set_info(&mut self, text: String) {
        self.message = Some(Message {
            text,
            is_error: false,
        });
    }

    pub fn tick(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % 4;
        self.update_status_bar();
    }

    pub fn spinner_char(&self) -> char {
        const SPINNER: [char; 4] = ['|', '/', '-', '\\'];
        SPINNER[self.spinner_frame]
    }

    pub fn update_status_bar(&mut self) {
        self.status_bar = if self.is_executing {
            StatusBarState::executing()
        } else if self.vim_mode == VimMode::Command {
            StatusBarState::command_mode()
        } else {
            match self.current_step_id() {
                Some(StepId::SelectProvider) => StatusBarState::provider_step(),
                Some(StepId::SignUp) => StatusBarState::sign_up_step(),
                Some(StepId::Deploy) if self.sequencer.is_deployed() => {
                    StatusBarState::deploy_succeeded()
                }
                Some(StepId::Deploy) if self.vim_mode == VimMode::Insert => {
                    StatusBarState::deploy_form_insert()
                }
                Some(StepId::Deploy) => StatusBarState::deploy_form_normal(),
                None => StatusBarState::monitor(),
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deploy::ChartRevision;
    use crate::host::recording::RecordingHost;
    use crate::host::{DryrunHost, ExecOutput};

    const ACCOUNT: &str = "ABCDEF01-2345-6789-ABCD-EF0123456789";
    const KEY: &str = "22222222-2222-2222-2222-222222222222";
    const INSTALL_ERROR: &str = "Error: INSTALLATION FAILED: Kubernetes cluster unreachable:\n\
        Get \"https://127.0.0.1:6443/version\": dial tcp 127.0.0.1:6443: connect: connection refused\n";

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut WizardApp, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn command(app: &mut WizardApp, cmd: &str) -> Option<WizardAction> {
        app.handle_key(key(KeyCode::Char(':')));
        type_text(app, cmd);
        app.handle_key(key(KeyCode::Enter))
    }

    fn dryrun_app(revision: ChartRevision) -> WizardApp {
        let mut config = WizardConfig::default();
        config.general.dryrun = true;
        config.deploy.revision = revision;
        WizardApp::new(config, Arc::new(DryrunHost::new()))
    }

    async fn drain(app: &mut WizardApp, mut rx: mpsc::UnboundedReceiver<ExecutionMessage>) {
        while let Some(msg) = rx.recv().await {
            app.handle_execution_message(msg);
        }
    }

    #[test]
    fn starts_in_monitor_view_when_already_deployed() {
        let host = RecordingHost::new().respond(ExecOutput::success("kubescape\n"));
        let mut app = WizardApp::new(WizardConfig::default(), Arc::new(host));

        assert!(app.sequencer.is_complete());
        assert_eq!(app.status_bar, StatusBarState::monitor());

        command(&mut app, "reset");
        assert!(app.sequencer.is_complete());
        assert!(app.message.as_ref().unwrap().is_error);
    }

    #[test]
    fn provider_selection_advances() {
        let mut app = dryrun_app(ChartRevision::Operator);
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.chosen_provider.as_deref(), Some("ARMO Platform"));
        assert_eq!(app.current_step_id(), Some(StepId::SignUp));
    }

    #[test]
    fn skipping_deploy_is_refused() {
        let mut app = dryrun_app(ChartRevision::Operator);
        command(&mut app, "skip");
        command(&mut app, "skip");
        assert_eq!(app.current_step_id(), Some(StepId::Deploy));

        command(&mut app, "skip");
        assert_eq!(app.current_step_id(), Some(StepId::Deploy));
        assert_eq!(app.message.as_ref().unwrap().text, "This step is required");

        app.handle_key(key(KeyCode::Char('l')));
        assert_eq!(app.current_step_id(), Some(StepId::Deploy));
    }

    #[test]
    fn invalid_account_blocks_submission() {
        let mut app = dryrun_app(ChartRevision::CloudOperator);
        command(&mut app, "skip");
        command(&mut app, "skip");

        app.handle_key(key(KeyCode::Char('i')));
        type_text(&mut app, "not-a-uuid");
        assert!(!app.submit_available);
        assert_eq!(app.handle_key(key(KeyCode::Enter)), None);
        assert!(app.message.as_ref().unwrap().is_error);
    }

    #[test]
    fn sign_up_opens_link() {
        let host = Arc::new(RecordingHost::new());
        let bridge: Arc<dyn HostBridge> = host.clone();
        let mut app = WizardApp::new(WizardConfig::default(), bridge);
        command(&mut app, "skip");
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(
            host.opened.lock().unwrap().clone(),
            vec!["https://cloud.armosec.io/account/sign-up".to_string()]
        );
    }

    #[tokio::test]
    async fn full_flow_reaches_monitor() {
        let mut app = dryrun_app(ChartRevision::Operator);
        command(&mut app, "skip");
        command(&mut app, "skip");
        assert_eq!(app.cluster_context.as_deref(), Some("docker-desktop"));

        app.handle_key(key(KeyCode::Char('i')));
        type_text(&mut app, ACCOUNT);
        app.handle_key(key(KeyCode::Enter));
        type_text(&mut app, KEY);
        assert!(app.submit_available);
        assert_eq!(app.handle_key(key(KeyCode::Enter)), Some(WizardAction::Deploy));

        let rx = app.start_deploy_execution().unwrap();
        assert!(app.is_executing);
        assert!(app.start_deploy_execution().is_none());
        drain(&mut app, rx).await;

        assert!(!app.is_executing);
        assert!(!app.deploy_failed);
        assert!(app.tasks.iter().all(|t| t.status == TaskState::Success));
        assert!(app.tasks[3].command.contains("account=abcdef01-2345-6789-abcd-ef0123456789"));
        assert!(app.deploy_output.contains("STATUS: deployed"));
        assert_eq!(app.step_result(2), StepResult::Completed);

        app.handle_key(key(KeyCode::Char('l')));
        assert!(app.sequencer.is_complete());
    }

    #[tokio::test]
    async fn failed_install_stays_on_deploy_step() {
        let host = RecordingHost::new()
            .respond(ExecOutput::success(""))
            .respond(ExecOutput::success("kind-dev\n"))
            .respond(ExecOutput::success("v3\n"))
            .respond(ExecOutput::success("added\n"))
            .respond(ExecOutput::success("updated\n"))
            .respond(ExecOutput::failure(INSTALL_ERROR, 1));
        let mut config = WizardConfig::default();
        config.deploy.revision = ChartRevision::CloudOperator;
        let mut app = WizardApp::new(config, Arc::new(host));
        command(&mut app, "skip");
        command(&mut app, "skip");
        assert_eq!(app.cluster_context.as_deref(), Some("kind-dev"));

        app.handle_key(key(KeyCode::Char('i')));
        type_text(&mut app, ACCOUNT);
        assert_eq!(app.handle_key(key(KeyCode::Enter)), Some(WizardAction::Deploy));

        let rx = app.start_deploy_execution().unwrap();
        drain(&mut app, rx).await;

        assert!(app.deploy_failed);
        assert_eq!(app.deploy_output, "v3\nadded\nupdated\n");
        assert_eq!(
            app.message.as_ref().unwrap().text,
            "Error: INSTALLATION FAILED: Kubernetes cluster unreachable:"
        );
        assert_eq!(app.step_result(2), StepResult::Failed);
        assert!(!app.sequencer.next_available());

        // The transient message goes away, the full helm error does not
        app.handle_key(key(KeyCode::Char('j')));
        assert!(app.message.is_none());
        assert_eq!(app.deploy_error.as_deref(), Some(INSTALL_ERROR));
    }
}
