//! # textflow 可执行入口
//!
//! ## 子命令
//! - `replace` - 批量正则替换
//! - `extract` - 批量提取匹配
//! - `merge`   - 合并多个文件
//! - `split`   - 按行数拆分文件
//! - `match`   - 单文件模式查找
//! - `stats`   - 文本统计
//!
//! ## 依赖关系
//! - 使用 `textflow` 库中的 `cli/`, `commands/`, `utils/`

use clap::Parser;
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use textflow::cli::Cli;
use textflow::{commands, utils};

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto).ok();

    if let Err(e) = commands::run(cli.command, cli.quiet) {
        let message = if cli.verbose { e.detailed() } else { e.to_string() };
        utils::output::print_error(&message);
        std::process::exit(1);
    }
}
