//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `replace`: 批量正则替换
//! - `extract`: 批量提取匹配
//! - `merge`: 合并多个文件
//! - `split`: 按行数拆分文件
//! - `match`: 单文件模式查找
//! - `stats`: 文本统计
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: batch, matching, stats

pub mod batch;
pub mod matching;
pub mod stats;

use clap::{Parser, Subcommand};

/// textflow - 并发批量文本处理工具
#[derive(Parser)]
#[command(name = "textflow")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "A concurrent batch text-transformation toolkit", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Hide progress bars
    #[arg(short, long, global = true, default_value_t = false)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Find and replace a regular expression in every input file
    Replace(batch::ReplaceArgs),

    /// Extract every match of a regular expression, one per line
    Extract(batch::ExtractArgs),

    /// Merge input files into a single file, in order
    Merge(batch::MergeArgs),

    /// Split a file into numbered parts of N lines
    Split(batch::SplitArgs),

    /// List, replace or split matches of a pattern in one file
    Match(matching::MatchArgs),

    /// Show descriptive statistics for a text file
    Stats(stats::StatsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_replace() {
        let cli = Cli::try_parse_from([
            "textflow", "replace", "a.txt", "docs", "-o", "out", "-e", "foo", "-r", "bar", "-j",
            "3",
        ])
        .unwrap();

        match cli.command {
            Commands::Replace(args) => {
                assert_eq!(args.input.inputs.len(), 2);
                assert_eq!(args.input.glob, "*.txt");
                assert_eq!(args.pattern, "foo");
                assert_eq!(args.replacement, "bar");
                assert_eq!(args.jobs, 3);
            }
            _ => panic!("expected replace"),
        }
    }

    #[test]
    fn test_parse_split_and_globals() {
        let cli =
            Cli::try_parse_from(["textflow", "split", "big.log", "-o", "parts", "-n", "50", "-q"])
                .unwrap();
        assert!(cli.quiet);
        match cli.command {
            Commands::Split(args) => assert_eq!(args.lines, 50),
            _ => panic!("expected split"),
        }
    }

    #[test]
    fn test_match_flags_conflict() {
        assert!(Cli::try_parse_from([
            "textflow", "match", "a.txt", "-e", "x", "--replace", "y", "--split"
        ])
        .is_err());
        assert!(Cli::try_parse_from(["textflow", "match", "a.txt", "-e", "x", "--first"]).is_err());
    }
}
