use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

use super::{command_string, ExecOutput, HostBridge, HostError, Result};

/// Program and arguments that hand `url` to the desktop's browser.
/// The url is passed as a single argument and never goes through a shell.
fn url_opener<'a>(os: &str, url: &'a str) -> (&'static str, Vec<&'a str>) {
    match os {
        "macos" => ("open", vec![url]),
        "windows" => ("rundll32", vec!["url.dll,FileProtocolHandler", url]),
        _ => ("xdg-open", vec![url]),
    }
}

/// Bridge that runs real processes on this machine
pub struct LiveHost;

impl HostBridge for LiveHost {
    fn exec(&self, program: &str, args: &[String]) -> Result<ExecOutput> {
        debug!("Running: {}", command_string(program, args));

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| HostError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let result = ExecOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            code: output.status.code(),
        };

        if !result.succeeded() {
            warn!("{} exited with {:?}", program, result.code);
        }

        Ok(result)
    }

    fn open_url(&self, url: &str) -> Result<()> {
        info!("Opening {}", url);

        let (opener, args) = url_opener(std::env::consts::OS, url);

        let status = Command::new(opener)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| HostError::OpenUrl {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(HostError::OpenUrl {
                url: url.to_string(),
                reason: format!("{opener} exited with code {:?}", status.code()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_url_skips_cmd() {
        let url = "https://cloud.armosec.io/account/sign-up?a=1&b=2";
        let (program, args) = url_opener("windows", url);
        assert_eq!(program, "rundll32");
        assert_eq!(args, vec!["url.dll,FileProtocolHandler", url]);
    }

    #[test]
    fn unix_url_goes_to_desktop_opener() {
        assert_eq!(url_opener("linux", "https://x").0, "xdg-open");
        assert_eq!(url_opener("macos", "https://x").0, "open");
    }
}
