/// Unique identifier for each wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepId {
    SelectProvider,
    SignUp,
    Deploy,
}

impl StepId {
    pub fn short_name(&self) -> &'static str {
        match self {
            StepId::SelectProvider => "Provider",
            StepId::SignUp => "Sign up",
            StepId::Deploy => "Deploy",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            StepId::SelectProvider => "Select a Provider",
            StepId::SignUp => "Sign Up",
            StepId::Deploy => "Deploy Kubescape",
        }
    }
}

/// A step of the wizard; the sequence is fixed at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub id: StepId,
    pub optional: bool,
}

impl Step {
    pub const fn required(id: StepId) -> Self {
        Self { id, optional: false }
    }

    pub const fn optional(id: StepId) -> Self {
        Self { id, optional: true }
    }
}

/// Provider selection and sign-up can be skipped; deploy cannot
pub fn default_steps() -> Vec<Step> {
    vec![
        Step::optional(StepId::SelectProvider),
        Step::optional(StepId::SignUp),
        Step::required(StepId::Deploy),
    ]
}

/// How a step was left, shown in the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepResult {
    #[default]
    Pending,
    Completed,
    Skipped,
    Failed,
}
