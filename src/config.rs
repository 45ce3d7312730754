//! 应用配置

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// didact.json 配置结构
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// 挂载点的 id
    #[serde(default = "default_root_id")]
    pub root_id: String,
    /// 标记文件，相对配置文件所在目录
    #[serde(default)]
    pub markup: Option<PathBuf>,
    /// 脚本文件，相对配置文件所在目录
    #[serde(default)]
    pub script: Option<PathBuf>,
    #[serde(default)]
    pub pretty: bool,
    #[serde(default)]
    pub script_memory_limit: Option<usize>,
}

fn default_root_id() -> String { "root".to_string() }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            root_id: default_root_id(),
            markup: None,
            script: None,
            pretty: false,
            script_memory_limit: None,
        }
    }
}

impl AppConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// 读取配置文件，相对路径按配置文件所在目录解析
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_json(&text)?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.markup = config.markup.map(|p| base.join(p));
        config.script = config.script.map(|p| base.join(p));
        Ok(config)
    }

    /// 读取配置里引用的文件
    pub fn read_source(path: &Path) -> Result<String, ConfigError> {
        std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config.root_id, "root");
        assert!(config.markup.is_none());
        assert!(config.script.is_none());
        assert!(!config.pretty);
    }

    #[test]
    fn test_camel_case_fields() {
        let config = AppConfig::from_json(
            r#"{ "rootId": "app", "script": "main.js", "pretty": true, "scriptMemoryLimit": 1048576 }"#,
        )
        .unwrap();
        assert_eq!(config.root_id, "app");
        assert_eq!(config.script, Some(PathBuf::from("main.js")));
        assert!(config.pretty);
        assert_eq!(config.script_memory_limit, Some(1048576));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(AppConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }
}
