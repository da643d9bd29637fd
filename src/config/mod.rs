use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::annotation::DEFAULT_MARKER;
use crate::core::error::{RewriteError, RewriteResult};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// 注释标记，匹配行首字面量
    pub marker: String,
    /// 输入结束时仍有未闭合的 CREATE TABLE 块视为错误
    pub strict: bool,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    /// 为空时输出到标准错误
    pub dir: String,
    pub file: String,
    pub max_file_size: u64,
    pub max_files: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            strict: false,
            log: LogConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            dir: String::new(),
            file: "without-rowid".to_string(),
            max_file_size: 10 * 1024 * 1024, // 10MB
            max_files: 5,
        }
    }
}

impl LogConfig {
    pub fn logs_to_file(&self) -> bool {
        !self.dir.trim().is_empty()
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> RewriteResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| RewriteError::io(path, e))?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> RewriteResult<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| RewriteError::io(path, e))?;
        Ok(())
    }

    pub fn validate(&self) -> RewriteResult<()> {
        if self.marker.trim().is_empty() {
            return Err(RewriteError::Config("注释标记不能为空".to_string()));
        }
        if self.log.logs_to_file() && self.log.file.trim().is_empty() {
            return Err(RewriteError::Config("日志文件名不能为空".to_string()));
        }
        Ok(())
    }
}
