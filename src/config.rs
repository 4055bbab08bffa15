//! 客户端配置
//!
//! 优先级：命令行 > 环境变量 > 配置文件 > 默认值。
//! API Key 不会出现在配置中，只保存在内存里。

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;
use crate::models::{Provider, Tone, WordCount};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8001";
pub const BACKEND_URL_ENV: &str = "SEO_WRITER_BACKEND_URL";
/// 兼容原前端部署使用的变量名
pub const LEGACY_BACKEND_URL_ENV: &str = "REACT_APP_BACKEND_URL";

const APP_DIR: &str = "seo-writer";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend_url: String,
    /// 请求超时（秒），默认不设置
    pub request_timeout_secs: Option<u64>,
    pub defaults: FormDefaults,
}

/// 生成表单的初始值
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormDefaults {
    pub provider: Provider,
    pub tone: Tone,
    pub word_count: u32,
    pub include_faq: bool,
    pub include_schema: bool,
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            provider: Provider::OpenAi,
            tone: Tone::Informative,
            word_count: WordCount::default().value(),
            include_faq: true,
            include_schema: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout_secs: None,
            defaults: FormDefaults::default(),
        }
    }
}

/// 配置目录：`~/.config/seo-writer`
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

pub fn default_config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

pub fn default_log_path() -> PathBuf {
    config_dir().join("seo-writer.log")
}

impl Config {
    /// 加载配置。
    ///
    /// `path` 为 `None` 时读取默认位置，文件不存在则使用默认值；
    /// 显式指定的文件必须存在。
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = default_config_path();
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    log::debug!("[Config] {} not found, using defaults", path.display());
                    Self::default()
                }
            }
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_env(&mut self) {
        for var in [BACKEND_URL_ENV, LEGACY_BACKEND_URL_ENV] {
            if let Ok(value) = std::env::var(var) {
                if !value.trim().is_empty() {
                    log::debug!("[Config] backend URL taken from {var}");
                    self.backend_url = value.trim().to_string();
                    return;
                }
            }
        }
    }

    /// 命令行覆盖后端地址
    pub fn with_backend_url(mut self, url: Option<String>) -> Result<Self, ConfigError> {
        if let Some(url) = url {
            self.backend_url = url;
            self.validate()?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api_base()?;
        WordCount::try_from(self.defaults.word_count).map_err(|_| ConfigError::InvalidValue {
            field: "defaults.word_count",
            value: self.defaults.word_count.to_string(),
        })?;
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    /// `{backend_url}/api/`，末尾带斜杠以便 `Url::join`
    pub fn api_base(&self) -> Result<Url, ConfigError> {
        let trimmed = self.backend_url.trim().trim_end_matches('/');
        let base = Url::parse(&format!("{trimmed}/")).map_err(|source| ConfigError::BackendUrl {
            url: self.backend_url.clone(),
            source,
        })?;
        base.join("api/").map_err(|source| ConfigError::BackendUrl {
            url: self.backend_url.clone(),
            source,
        })
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn default_word_count(&self) -> WordCount {
        WordCount::try_from(self.defaults.word_count).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        std::env::remove_var(BACKEND_URL_ENV);
        std::env::remove_var(LEGACY_BACKEND_URL_ENV);
    }

    #[test]
    fn api_base_appends_api_segment() {
        let mut config = Config::default();
        assert_eq!(config.api_base().unwrap().as_str(), "http://localhost:8001/api/");

        config.backend_url = "https://seo.example.com/prefix/".into();
        assert_eq!(
            config.api_base().unwrap().as_str(),
            "https://seo.example.com/prefix/api/"
        );
    }

    #[test]
    fn rejects_unparseable_backend_url() {
        let config = Config {
            backend_url: "not a url".into(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::BackendUrl { .. })));
    }

    #[test]
    #[serial]
    fn file_values_are_read_and_env_overrides_them() {
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
backend_url = "http://file.example:9000"
request_timeout_secs = 30

[defaults]
provider = "groq"
tone = "casual"
word_count = 2000
include_faq = false
"#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.backend_url, "http://file.example:9000");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.defaults.provider, Provider::Groq);
        assert_eq!(config.defaults.tone, Tone::Casual);
        assert_eq!(config.default_word_count(), WordCount::W2000);
        assert!(!config.defaults.include_faq);
        assert!(config.defaults.include_schema);

        std::env::set_var(BACKEND_URL_ENV, "http://env.example");
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.backend_url, "http://env.example");
        clear_env();
    }

    #[test]
    #[serial]
    fn legacy_env_name_is_honoured() {
        clear_env();
        std::env::set_var(LEGACY_BACKEND_URL_ENV, "http://legacy.example");
        let mut config = Config::default();
        config.apply_env();
        assert_eq!(config.backend_url, "http://legacy.example");
        clear_env();
    }

    #[test]
    fn unsupported_default_word_count_is_rejected() {
        let mut config = Config::default();
        config.defaults.word_count = 750;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "defaults.word_count", .. })
        ));
    }

    #[test]
    fn cli_override_is_validated() {
        let config = Config::default()
            .with_backend_url(Some("http://cli.example:8080".into()))
            .unwrap();
        assert_eq!(config.api_base().unwrap().as_str(), "http://cli.example:8080/api/");
        assert!(Config::default().with_backend_url(Some("::".into())).is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
