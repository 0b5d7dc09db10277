//! # match 子命令 CLI 定义
//!
//! 对单个文件执行模式查找、替换预览或分割。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/matching.rs`

use clap::Args;
use std::path::PathBuf;

/// match 子命令参数
#[derive(Args, Debug)]
pub struct MatchArgs {
    /// Text file to search
    pub file: PathBuf,

    /// Regular expression
    #[arg(short = 'e', long)]
    pub pattern: String,

    /// Print the text with matches replaced instead of listing matches
    #[arg(short, long, conflicts_with = "split")]
    pub replace: Option<String>,

    /// Only replace the first match (with --replace)
    #[arg(long, default_value_t = false, requires = "replace")]
    pub first: bool,

    /// Print the segments of the text split by the pattern
    #[arg(long, default_value_t = false, conflicts_with = "full")]
    pub split: bool,

    /// Check whether each line matches the pattern in full
    #[arg(long, default_value_t = false, conflicts_with = "replace")]
    pub full: bool,

    /// Show at most this many matches
    #[arg(long, default_value_t = 50)]
    pub limit: usize,
}
