//! 日志初始化模块.
//!
//! 双输出:
//! - console: 彩色, 输出到 stderr, 默认 warn, 不与探测结果混在一起
//! - file: 无色, 默认 info, 可通过 -v/-vv 或 LANYIN_LOG 环境变量调整
//!
//! 库 crate 通过 `log` 门面记录日志, 由 tracing-subscriber 统一接收.
//! 日志文件输出到 {directory}/{prefix}.{date}.log

use std::path::Path;
use std::sync::OnceLock;

use anyhow::Context;
use chrono::{Datelike, Local, Timelike};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{self, FormatEvent, FormatFields, format::Writer},
    layer::{Layer, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// 文件日志级别覆盖的环境变量
pub const LOG_ENV: &str = "LANYIN_LOG";

static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// 日志配置, 可从 JSON 文件加载
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 控制台日志级别 (未使用 -v 时)
    pub console_level: String,
    /// 是否输出日志文件
    pub file_output: bool,
    /// 日志目录
    pub directory: String,
    /// 日志文件前缀
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            console_level: "warn".to_string(),
            file_output: true,
            directory: "logs".to_string(),
            file_prefix: "lanyin-probe".to_string(),
        }
    }
}

impl LoggingConfig {
    /// 从 JSON 文件加载, 缺省字段取默认值
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("读取日志配置失败: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("解析日志配置失败: {}", path.display()))
    }

    /// 按 -v 次数确定的控制台级别
    fn console_filter(&self, verbosity: u8) -> String {
        match verbosity {
            0 => self.console_level.clone(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    }
}

/// 按 -v 次数确定的文件日志级别
fn file_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// 初始化日志系统
///
/// - `verbosity`: 0=默认, 1=debug, 2+=trace (由 -v/-vv 控制)
pub fn init(config: &LoggingConfig, verbosity: u8) -> anyhow::Result<()> {
    let console_layer = fmt::Layer::default()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .event_format(ConsoleFormatter)
        .with_filter(EnvFilter::new(config.console_filter(verbosity)));

    let file_layer = if config.file_output {
        std::fs::create_dir_all(&config.directory)
            .with_context(|| format!("创建日志目录失败: {}", config.directory))?;
        let file_appender = tracing_appender::rolling::RollingFileAppender::builder()
            .rotation(tracing_appender::rolling::Rotation::DAILY)
            .filename_prefix(&config.file_prefix)
            .filename_suffix("log")
            .build(&config.directory)
            .context("创建日志文件失败")?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        LOG_GUARD.set(guard).ok();

        // LANYIN_LOG 环境变量优先于 -v
        let file_filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(file_level(verbosity)));
        Some(
            fmt::Layer::default()
                .with_writer(non_blocking)
                .with_ansi(false)
                .event_format(FileFormatter)
                .with_filter(file_filter),
        )
    } else {
        None
    };

    Registry::default()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("日志系统已初始化")?;
    Ok(())
}

/// 时间戳前缀: `[月-日 时:分:秒.毫秒]`
fn write_timestamp(writer: &mut Writer<'_>) -> std::fmt::Result {
    let now = Local::now();
    write!(
        writer,
        "[{:02}-{:02} {:02}:{:02}:{:02}.{:03}]",
        now.month(),
        now.day(),
        now.hour(),
        now.minute(),
        now.second(),
        now.timestamp_subsec_millis(),
    )
}

/// Console 格式: 彩色级别, 带 target
struct ConsoleFormatter;

impl<S, N> FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let color = match *meta.level() {
            tracing::Level::ERROR => "\x1b[31m",
            tracing::Level::WARN => "\x1b[33m",
            tracing::Level::INFO => "\x1b[32m",
            _ => "\x1b[34m",
        };
        write_timestamp(&mut writer)?;
        write!(writer, " {color}{:5}\x1b[0m {} > ", meta.level(), meta.target())?;
        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// File 格式: 无色, 无 target, 时间戳 + 级别 + 消息
struct FileFormatter;

impl<S, N> FormatEvent<S, N> for FileFormatter
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        write_timestamp(&mut writer)?;
        write!(writer, " {:5} > ", event.metadata().level())?;
        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_日志级别随verbose提升() {
        let config = LoggingConfig::default();
        assert_eq!(config.console_filter(0), "warn");
        assert_eq!(config.console_filter(1), "debug");
        assert_eq!(config.console_filter(3), "trace");
        assert_eq!(file_level(0), "info");
        assert_eq!(file_level(2), "trace");
    }

    #[test]
    fn test_从json加载配置() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logging.json");
        std::fs::write(&path, r#"{ "console_level": "info", "file_output": false }"#).unwrap();

        let config = LoggingConfig::load(&path).unwrap();
        assert_eq!(config.console_level, "info");
        assert!(!config.file_output);
        // 未给出的字段取默认值
        assert_eq!(config.file_prefix, "lanyin-probe");
    }

    #[test]
    fn test_配置文件错误() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(LoggingConfig::load(&path).is_err());
        assert!(LoggingConfig::load(&dir.path().join("missing.json")).is_err());
    }
}
