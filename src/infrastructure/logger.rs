//! 日志基础设施

use std::io;

use anyhow::Result;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::core::config::LoggingConfig;

pub struct Logger;

impl Logger {
    /// 初始化 tracing subscriber
    ///
    /// 控制台日志写到 stderr，避免和终端界面的输出混在一起。
    /// 设置了 `log_dir` 时额外按天滚动写入文件，返回的 guard 需要保持到进程结束。
    pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
        let filter =
            EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;

        let console_layer = config
            .console_output
            .then(|| fmt::layer().with_writer(io::stderr).with_target(false).boxed());

        let (file_layer, guard) = match &config.log_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                let appender = rolling::daily(dir, &config.file_prefix);
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let layer = fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_thread_names(true)
                    .boxed();
                (Some(layer), Some(guard))
            }
            None => (None, None),
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(console_layer)
            .with(file_layer)
            .try_init()?;

        Ok(guard)
    }
}
