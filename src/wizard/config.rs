use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use super::error::Result;
use crate::deploy::ChartRevision;

const CONFIG_DIR: &str = "kubescape-wizard";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    pub general: GeneralConfig,
    pub deploy: DeployConfig,
    pub links: LinksConfig,
    /// Providers offered on the first step
    pub providers: Vec<ProviderConfig>,
}

impl WizardConfig {
    /// `$XDG_CONFIG_HOME/kubescape-wizard/config.toml` or platform equivalent
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: WizardConfig = toml::from_str(&content)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Configured providers, or the ARMO platform when none are listed
    pub fn provider_list(&self) -> Vec<ProviderConfig> {
        if self.providers.is_empty() {
            vec![ProviderConfig::default()]
        } else {
            self.providers.clone()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub title: String,
    /// Simulate helm and kubectl instead of running them
    pub dryrun: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            title: "Kubescape".to_string(),
            dryrun: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    pub revision: ChartRevision,
    /// Cluster name passed to the chart; kubectl's current context when unset
    pub cluster_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    pub sign_up: String,
    pub dashboard: String,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            sign_up: "https://cloud.armosec.io/account/sign-up".to_string(),
            dashboard: "https://cloud.armosec.io".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: "ARMO Platform".to_string(),
            description: "Hosted dashboard for Kubescape scan results".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = WizardConfig::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.deploy.revision, ChartRevision::Operator);
        assert_eq!(config.provider_list().len(), 1);
        assert!(!config.general.dryrun);
    }

    #[test]
    fn reads_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[general]
dryrun = true

[deploy]
revision = "cloud-operator"
cluster_name = "prod-eu"

[[providers]]
name = "Self-hosted"
"#
        )
        .unwrap();

        let config = WizardConfig::load_from(file.path()).unwrap();
        assert!(config.general.dryrun);
        assert_eq!(config.general.title, "Kubescape");
        assert_eq!(config.deploy.revision, ChartRevision::CloudOperator);
        assert_eq!(config.deploy.cluster_name.as_deref(), Some("prod-eu"));
        assert_eq!(config.provider_list()[0].name, "Self-hosted");
        assert_eq!(config.links.dashboard, "https://cloud.armosec.io");
    }

    #[test]
    fn rejects_unknown_revision() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[deploy]\nrevision = \"legacy\"").unwrap();
        assert!(WizardConfig::load_from(file.path()).is_err());
    }
}
