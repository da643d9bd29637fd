// 日志工具模块
//
// 封装 flexi_logger 的初始化和关闭操作。标准输出承载改写结果，日志只写标准错误或文件

use crate::config::LogConfig;
use crate::core::error::RewriteResult;
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming};
use std::sync::Mutex;

/// 全局日志句柄，用于程序退出时 flush
static LOGGER_HANDLE: Mutex<Option<LoggerHandle>> = Mutex::new(None);

/// 初始化日志系统
///
/// `config.dir` 为空时日志写入标准错误，否则按大小轮转写入文件
///
/// # Examples
/// ```
/// use without_rowid::config::LogConfig;
/// use without_rowid::utils::logging;
///
/// let config = LogConfig::default();
/// logging::init(&config).expect("日志初始化失败");
/// logging::shutdown();
/// ```
pub fn init(config: &LogConfig) -> RewriteResult<()> {
    let logger = Logger::try_with_str(&config.level)?;

    let handle = if config.logs_to_file() {
        logger
            .log_to_file(
                FileSpec::default()
                    .basename(&config.file)
                    .directory(&config.dir),
            )
            .rotate(
                Criterion::Size(config.max_file_size),
                Naming::Numbers,
                Cleanup::KeepLogFiles(config.max_files),
            )
            .append()
            .start()?
    } else {
        logger.log_to_stderr().start()?
    };

    match LOGGER_HANDLE.lock() {
        Ok(mut guard) => *guard = Some(handle),
        Err(poisoned) => *poisoned.into_inner() = Some(handle),
    }

    log::debug!("日志系统初始化完成: level={}", config.level);
    Ok(())
}

/// 刷新并关闭日志系统
///
/// 在程序退出前调用；未初始化时什么也不做
pub fn shutdown() {
    let handle = LOGGER_HANDLE.lock().ok().and_then(|mut guard| guard.take());
    if let Some(handle) = handle {
        handle.flush();
    }
}
