//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `batch/`, `pattern/`, `analysis/`, `utils/`
//! - 子模块: batch, matching, stats

pub mod batch;
pub mod matching;
pub mod stats;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands, quiet: bool) -> Result<()> {
    match cmd {
        Commands::Replace(args) => batch::execute_replace(args, quiet),
        Commands::Extract(args) => batch::execute_extract(args, quiet),
        Commands::Merge(args) => batch::execute_merge(args, quiet),
        Commands::Split(args) => batch::execute_split(args, quiet),
        Commands::Match(args) => matching::execute(args),
        Commands::Stats(args) => stats::execute(args),
    }
}
