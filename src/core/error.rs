//! 统一错误处理
//!
//! 所有可失败的操作都返回 `RewriteResult<T>`，错误类型为 `RewriteError`。
//! 二进制入口在最外层用 `anyhow` 附加上下文后输出完整错误链。

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// 结果类型别名
pub type RewriteResult<T> = Result<T, RewriteError>;

/// 错误类型
#[derive(Error, Debug)]
pub enum RewriteError {
    /// 输入文件不存在/不可读，或输出流写入失败
    #[error("IO错误 ({}): {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("配置错误: {0}")]
    Config(String),

    /// 仅在严格模式下产生
    #[error("CREATE TABLE 块未闭合: 表 {table} (起始于第 {line} 行)")]
    UnterminatedBlock { table: String, line: usize },
}

impl RewriteError {
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        RewriteError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// 标准输出写入失败
    pub fn stdout(source: io::Error) -> Self {
        Self::io("<stdout>", source)
    }

    pub fn is_io(&self) -> bool {
        matches!(self, RewriteError::Io { .. })
    }
}

impl From<toml::de::Error> for RewriteError {
    fn from(e: toml::de::Error) -> Self {
        RewriteError::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for RewriteError {
    fn from(e: toml::ser::Error) -> Self {
        RewriteError::Config(e.to_string())
    }
}

impl From<flexi_logger::FlexiLoggerError> for RewriteError {
    fn from(e: flexi_logger::FlexiLoggerError) -> Self {
        RewriteError::Config(format!("日志初始化失败: {}", e))
    }
}
