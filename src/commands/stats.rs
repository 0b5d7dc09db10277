//! # stats 命令实现
//!
//! 输出文本的行长度统计、词频、字符分布，以及可选的模式统计。
//!
//! ## 依赖关系
//! - 使用 `cli/stats.rs` 定义的参数
//! - 使用 `analysis/`
//! - 使用 `tabled` 输出表格, `csv` 导出词频

use crate::analysis::{self, FrequencyEntry, LineStatistics};
use crate::cli::stats::StatsArgs;
use crate::error::{Result, TextflowError};
use crate::fileio;
use crate::utils::output;

use std::path::Path;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct FrequencyRow {
    #[tabled(rename = "Rank")]
    rank: usize,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Count")]
    count: usize,
    #[tabled(rename = "Share")]
    share: String,
}

fn frequency_table(entries: &[FrequencyEntry], top: usize) -> Table {
    let total: usize = entries.iter().map(|e| e.count).sum();
    let rows: Vec<FrequencyRow> = entries
        .iter()
        .take(top)
        .enumerate()
        .map(|(i, e)| FrequencyRow {
            rank: i + 1,
            value: printable(&e.value),
            count: e.count,
            share: format!("{:.1}%", e.count as f64 * 100.0 / total.max(1) as f64),
        })
        .collect();
    Table::new(&rows)
}

/// 空白字符在表格里不可见，转成转义形式
fn printable(value: &str) -> String {
    match value {
        " " => "' '".to_string(),
        "\n" => "\\n".to_string(),
        "\r" => "\\r".to_string(),
        "\t" => "\\t".to_string(),
        _ => value.to_string(),
    }
}

/// 执行 stats 命令
pub fn execute(args: StatsArgs) -> Result<()> {
    let text = fileio::read_to_string(&args.file)?;

    output::print_header(&format!("Statistics for {}", args.file.display()));
    print!("{}", LineStatistics::from_text(&text));

    let words = analysis::word_frequency(&text);
    println!();
    output::print_info(&format!(
        "Words: {} total, {} unique",
        words.iter().map(|e| e.count).sum::<usize>(),
        words.len()
    ));
    if !words.is_empty() {
        println!("{}", frequency_table(&words, args.top));
    }

    let chars = analysis::character_distribution(&text);
    if !chars.is_empty() {
        println!();
        output::print_info("Character distribution:");
        println!("{}", frequency_table(&chars, args.top));
    }

    if let Some(pattern) = &args.pattern {
        output::print_separator();
        output::print_info(&format!("Pattern '{}':", pattern));
        print!("{}", analysis::analyze_pattern(&text, pattern)?);
    }

    if args.common {
        output::print_separator();
        for (name, stats) in analysis::analyze_common_patterns(&text)? {
            if stats.total_occurrences == 0 {
                continue;
            }
            output::print_info(&format!("{}:", name));
            print!("{}", stats);
            println!();
        }
    }

    if let Some(csv_path) = &args.csv {
        export_frequencies(&words, csv_path)?;
        output::print_output("word frequency", &csv_path.display().to_string());
    }

    Ok(())
}

/// 导出频次表为 CSV（列：value, count）
pub fn export_frequencies(entries: &[FrequencyEntry], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;
    for entry in entries {
        wtr.serialize(entry)?;
    }
    wtr.flush().map_err(|e| TextflowError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;
    Ok(())
}
