/// Key hints shown in the status bar, chosen by the active step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBarState {
    pub left_hint: String,
    pub right_hint: String,
}

impl StatusBarState {
    fn new(left: &str, right: &str) -> Self {
        Self {
            left_hint: left.to_string(),
            right_hint: right.to_string(),
        }
    }

    pub fn provider_step() -> Self {
        Self::new("j/k: navigate  Enter: select", "l: next  :skip")
    }

    pub fn sign_up_step() -> Self {
        Self::new("Enter: open sign-up page", "h: back  l: next  :skip")
    }

    pub fn deploy_form_normal() -> Self {
        Self::new("j/k: fields  i: edit", "Enter: deploy  h: back")
    }

    pub fn deploy_form_insert() -> Self {
        Self::new("Type to enter text", "Esc: normal  Tab: next field")
    }

    pub fn deploy_succeeded() -> Self {
        Self::new("Kubescape deployed", "l: continue")
    }

    pub fn monitor() -> Self {
        Self::new("Kubescape is running", "Enter: open dashboard  :quit")
    }

    pub fn command_mode() -> Self {
        Self::new("", "Enter: run  Esc: cancel")
    }

    pub fn executing() -> Self {
        Self::new("Deploying, please wait...", "")
    }
}
