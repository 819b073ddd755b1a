//! Bridge to the machine the wizard runs on.
//!
//! Everything that leaves the process goes through [`HostBridge`]: running
//! `helm`/`kubectl` and opening links in a browser. One instance is built
//! at startup and handed to each component that needs it.

mod dryrun;
mod live;
#[cfg(test)]
pub(crate) mod recording;

pub use dryrun::DryrunHost;
pub use live::LiveHost;

use std::borrow::Cow;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open {url}: {reason}")]
    OpenUrl { url: String, reason: String },
}

pub type Result<T> = std::result::Result<T, HostError>;

/// Captured result of one external command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, `None` when killed by a signal
    pub code: Option<i32>,
}

impl ExecOutput {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            code: Some(0),
        }
    }

    pub fn failure(stderr: impl Into<String>, code: i32) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            code: Some(code),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.code == Some(0)
    }
}

/// Host capabilities consumed by the wizard
pub trait HostBridge: Send + Sync {
    /// Run `program` with `args` to completion and capture its streams
    fn exec(&self, program: &str, args: &[String]) -> Result<ExecOutput>;

    /// Open `url` in the user's browser
    fn open_url(&self, url: &str) -> Result<()>;
}

/// `--set` keys whose values never appear in rendered command lines
const SECRET_VALUES: &[&str] = &["accessKey"];

fn redact(arg: &str) -> Cow<'_, str> {
    match arg.split_once('=') {
        Some((key, _)) if SECRET_VALUES.contains(&key) => Cow::Owned(format!("{key}=<redacted>")),
        _ => Cow::Borrowed(arg),
    }
}

/// Render a command line for logs and task lists, with secret values redacted
pub fn command_string(program: &str, args: &[String]) -> String {
    std::iter::once(program.to_string())
        .chain(
            args.iter()
                .map(|arg| shell_escape::escape(redact(arg)).to_string()),
        )
        .collect::<Vec<_>>()
        .join(" ")
}

/// Create the appropriate bridge based on dryrun mode
pub fn create_host(dryrun: bool) -> Arc<dyn HostBridge> {
    if dryrun {
        Arc::new(DryrunHost::new())
    } else {
        Arc::new(LiveHost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_string_quotes_only_when_needed() {
        let args = vec![
            "--set".to_string(),
            "clusterName=my cluster".to_string(),
            "-n".to_string(),
        ];
        assert_eq!(
            command_string("helm", &args),
            "helm --set 'clusterName=my cluster' -n"
        );
    }

    #[test]
    fn command_string_hides_access_key() {
        let args = vec![
            "--set".to_string(),
            "accessKey=deadbeef-2222-3333-4444-555555555555".to_string(),
            "--set".to_string(),
            "account=11111111-1111-1111-1111-111111111111".to_string(),
        ];
        let rendered = command_string("helm", &args);
        assert!(!rendered.contains("deadbeef"));
        assert_eq!(
            rendered,
            "helm --set 'accessKey=<redacted>' --set account=11111111-1111-1111-1111-111111111111"
        );
    }

    #[test]
    fn exit_code_decides_success() {
        assert!(ExecOutput::success("ok").succeeded());
        assert!(!ExecOutput::failure("boom", 1).succeeded());
        assert!(!ExecOutput::default().succeeded());
    }
}
