//! 核心模块：错误与配置

pub mod config;
pub mod error;
