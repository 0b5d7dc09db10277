//! # 批处理子命令 CLI 定义
//!
//! `replace`, `extract`, `merge`, `split` 四个子命令的参数。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/batch.rs`

use clap::Args;
use std::path::PathBuf;

/// 输入文件参数（多个子命令共用）
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Input files or directories
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Glob pattern(s) applied to directory inputs (comma separated)
    #[arg(short, long, default_value = "*.txt")]
    pub glob: String,

    /// Recurse into subdirectories
    #[arg(short = 'R', long, default_value_t = false)]
    pub recursive: bool,
}

/// replace 子命令参数
#[derive(Args, Debug)]
pub struct ReplaceArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output directory for `<name>_processed.txt` files
    #[arg(short, long)]
    pub output: PathBuf,

    /// Regular expression to search for
    #[arg(short = 'e', long)]
    pub pattern: String,

    /// Replacement text (supports $1 / ${name} backreferences)
    #[arg(short, long, default_value = "")]
    pub replacement: String,

    /// Create the output directory if it does not exist
    #[arg(long, default_value_t = false)]
    pub create_output: bool,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0, env = "TEXTFLOW_JOBS")]
    pub jobs: usize,
}

/// extract 子命令参数
#[derive(Args, Debug)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output directory for `<name>_extracted.txt` files
    #[arg(short, long)]
    pub output: PathBuf,

    /// Regular expression whose matches are extracted
    #[arg(short = 'e', long)]
    pub pattern: String,

    /// Create the output directory if it does not exist
    #[arg(long, default_value_t = false)]
    pub create_output: bool,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0, env = "TEXTFLOW_JOBS")]
    pub jobs: usize,
}

/// merge 子命令参数
#[derive(Args, Debug)]
pub struct MergeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Merged output file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Insert a separator block naming each file after the first
    #[arg(short, long, default_value_t = false)]
    pub separators: bool,
}

/// split 子命令参数
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// File to split
    pub input: PathBuf,

    /// Output directory for `<name>_part<N>.txt` files
    #[arg(short, long)]
    pub output: PathBuf,

    /// Maximum number of lines per part
    #[arg(short = 'n', long, default_value_t = 1000)]
    pub lines: usize,

    /// Create the output directory if it does not exist
    #[arg(long, default_value_t = false)]
    pub create_output: bool,
}
