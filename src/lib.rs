//! # textflow - 并发批量文本处理
//!
//! 对成批文本文件执行正则替换、提取、合并、拆分，并提供单文件模式查找与统计。
//!
//! ## 依赖关系
//! ```text
//! lib.rs
//!   ├── cli/       (命令行参数定义)
//!   ├── commands/  (命令执行逻辑)
//!   │     ├── batch/     (批处理引擎)
//!   │     ├── analysis/  (文本统计)
//!   │     └── pattern/   (正则封装)
//!   ├── fileio/    (文件读写)
//!   ├── utils/     (输出与进度条)
//!   └── error.rs   (错误处理)
//! ```

pub mod analysis;
pub mod batch;
pub mod cli;
pub mod commands;
pub mod error;
pub mod fileio;
pub mod pattern;
pub mod utils;

pub use error::{Result, TextflowError};
