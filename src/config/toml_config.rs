use crate::utils::error::{ControllerError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env placeholder is a valid regex"));

/// Optional configuration file, e.g.
///
/// ```toml
/// [fleet]
/// endpoint = "http://127.0.0.1:49153"
/// timeout_seconds = 30
///
/// [groups]
/// base_path = "./units"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub fleet: Option<FleetSection>,
    pub groups: Option<GroupsSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FleetSection {
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupsSection {
    pub base_path: Option<PathBuf>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| ControllerError::ConfigError {
            message: format!(
                "cannot read config file {}: {}",
                path.as_ref().display(),
                e
            ),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ControllerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${FLEET_ENDPOINT})，未定義的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn fleet_endpoint(&self) -> Option<&str> {
        self.fleet.as_ref()?.endpoint.as_deref()
    }

    pub fn timeout_secs(&self) -> Option<u64> {
        self.fleet.as_ref()?.timeout_seconds
    }

    pub fn groups_dir(&self) -> Option<&Path> {
        self.groups.as_ref()?.base_path.as_deref()
    }
}
