//! # match 命令实现
//!
//! 对单个文件执行模式查找、替换预览或按模式分割。
//!
//! ## 依赖关系
//! - 使用 `cli/matching.rs` 定义的参数
//! - 使用 `pattern/`, `fileio/`
//! - 使用 `tabled` 输出匹配表格

use crate::cli::matching::MatchArgs;
use crate::error::Result;
use crate::fileio;
use crate::pattern::{Match, Pattern};
use crate::utils::output;

use tabled::{Table, Tabled};

/// 匹配表格中单个字段的最大显示长度
const MAX_CELL_CHARS: usize = 60;

#[derive(Tabled)]
struct MatchRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Start")]
    start: usize,
    #[tabled(rename = "End")]
    end: usize,
    #[tabled(rename = "Match")]
    text: String,
    #[tabled(rename = "Groups")]
    groups: String,
}

impl MatchRow {
    fn new(index: usize, m: &Match) -> Self {
        Self {
            index,
            start: m.start,
            end: m.end,
            text: truncate(&m.text),
            groups: if m.groups.is_empty() {
                "-".to_string()
            } else {
                truncate(&m.groups.join(" | "))
            },
        }
    }
}

/// 执行 match 命令
pub fn execute(args: MatchArgs) -> Result<()> {
    let pattern = Pattern::compile(&args.pattern)?;
    let text = fileio::read_to_string(&args.file)?;

    if let Some(replacement) = &args.replace {
        let replaced = if args.first {
            pattern.replace_first(&text, replacement)
        } else {
            pattern.replace_all(&text, replacement)
        };
        print!("{}", replaced);
        return Ok(());
    }

    if args.full {
        return print_full_matches(&text, &pattern.anchored()?);
    }

    if args.split {
        for (i, segment) in pattern.split(&text).iter().enumerate() {
            println!("[{}] {}", i + 1, segment);
        }
        return Ok(());
    }

    output::print_header(&format!(
        "Matches of '{}' in {}",
        pattern.as_str(),
        args.file.display()
    ));

    let matches = pattern.find_all(&text);
    if matches.is_empty() {
        output::print_warning("No matches found");
        return Ok(());
    }

    let rows: Vec<MatchRow> = matches
        .iter()
        .take(args.limit)
        .enumerate()
        .map(|(i, m)| MatchRow::new(i + 1, m))
        .collect();

    let table = Table::new(&rows);
    println!("{}", table);

    if matches.len() > args.limit {
        output::print_info(&format!(
            "Showing {} of {} matches (use --limit to show more)",
            args.limit,
            matches.len()
        ));
    }
    output::print_done(&format!("{} match(es) found", matches.len()));

    Ok(())
}

/// 逐行检查整行匹配
fn print_full_matches(text: &str, anchored: &Pattern) -> Result<()> {
    let mut matched = 0;
    let mut total = 0;
    for (i, line) in text.lines().enumerate() {
        total += 1;
        if anchored.is_match(line) {
            matched += 1;
            println!("{:>6}: {}", i + 1, line);
        }
    }
    output::print_done(&format!("{}/{} line(s) match in full", matched, total));
    Ok(())
}

fn truncate(s: &str) -> String {
    let escaped = s.replace('\n', "\\n").replace('\r', "\\r");
    if escaped.chars().count() > MAX_CELL_CHARS {
        let head: String = escaped.chars().take(MAX_CELL_CHARS - 3).collect();
        format!("{}...", head)
    } else {
        escaped
    }
}
