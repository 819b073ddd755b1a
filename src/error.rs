use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("Wizard error: {0}")]
    Wizard(#[from] crate::wizard::WizardError),
}

pub type Result<T> = std::result::Result<T, AppError>;
