pub mod deploy;
pub mod error;
pub mod event;
pub mod host;
pub mod ui;
pub mod vim;
pub mod wizard;
