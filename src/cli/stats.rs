//! # stats 子命令 CLI 定义
//!
//! 文本描述性统计。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/stats.rs`

use clap::Args;
use std::path::PathBuf;

/// stats 子命令参数
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Text file to analyze
    pub file: PathBuf,

    /// Report occurrence statistics for this regular expression
    #[arg(short = 'e', long)]
    pub pattern: Option<String>,

    /// Scan for common patterns (emails, phone numbers, URLs, ...)
    #[arg(long, default_value_t = false)]
    pub common: bool,

    /// Number of top words to show
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Export the full word frequency table as CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,
}
