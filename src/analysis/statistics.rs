//! # 文本统计
//!
//! 对单个文本缓冲区做一次线性扫描，得到描述性统计。
//!
//! ## 功能
//! - 模式出现统计（总数、去重数、示例、频次排行）
//! - 行长度统计与分布
//! - 词频、字符分布
//! - 常见模式扫描（邮箱、电话、URL 等）
//!
//! ## 依赖关系
//! - 被 `commands/stats.rs` 调用
//! - 使用 `pattern/` 编译模式

use crate::error::Result;
use crate::pattern::Pattern;

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// 示例与排行的最大条目数
pub const TOP_LIMIT: usize = 10;

/// 行长度分布的桶数（0-9, 10-19, ..., 90+）
pub const LENGTH_BUCKETS: usize = 10;

/// 内置常见模式
pub const COMMON_PATTERNS: &[(&str, &str)] = &[
    (
        "Email addresses",
        r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
    ),
    ("Phone numbers", r"\b\d{3}[-.]?\d{3}[-.]?\d{4}\b"),
    ("URLs", r"https?://\S+|www\.\S+"),
    ("Numeric values", r"\b\d+\b"),
    ("Capitalized words", r"\b[A-Z][a-z]+\b"),
    ("Hashtags", r"#\w+"),
];

/// 频次表条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyEntry {
    pub value: String,
    pub count: usize,
}

/// 按出现顺序计数，排序时相同频次保持首次出现顺序
#[derive(Debug, Default)]
struct OrderedCounter {
    index: HashMap<String, usize>,
    entries: Vec<FrequencyEntry>,
}

impl OrderedCounter {
    fn add(&mut self, value: &str) {
        match self.index.get(value) {
            Some(&i) => self.entries[i].count += 1,
            None => {
                self.index.insert(value.to_string(), self.entries.len());
                self.entries.push(FrequencyEntry {
                    value: value.to_string(),
                    count: 1,
                });
            }
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    /// 频次降序（稳定排序）
    fn ranked(mut self, limit: Option<usize>) -> Vec<FrequencyEntry> {
        self.entries.sort_by(|a, b| b.count.cmp(&a.count));
        if let Some(limit) = limit {
            self.entries.truncate(limit);
        }
        self.entries
    }
}

/// 模式出现统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternStatistics {
    pub total_occurrences: usize,
    pub unique_occurrences: usize,
    /// 去重后的示例（首次出现顺序，最多 10 个）
    pub examples: Vec<String>,
    /// 频次最高的匹配（最多 10 个）
    pub top_frequencies: Vec<FrequencyEntry>,
}

impl PatternStatistics {
    /// 统计已编译模式在文本中的出现情况
    pub fn from_pattern(text: &str, pattern: &Pattern) -> Self {
        let mut counter = OrderedCounter::default();
        let mut total = 0;

        for m in pattern.find_texts(text) {
            total += 1;
            counter.add(m);
        }

        let unique = counter.len();
        let examples = counter
            .entries
            .iter()
            .take(TOP_LIMIT)
            .map(|e| e.value.clone())
            .collect();

        Self {
            total_occurrences: total,
            unique_occurrences: unique,
            examples,
            top_frequencies: counter.ranked(Some(TOP_LIMIT)),
        }
    }
}

impl fmt::Display for PatternStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total occurrences: {}", self.total_occurrences)?;
        writeln!(f, "Unique occurrences: {}", self.unique_occurrences)?;

        if !self.examples.is_empty() {
            let shown: Vec<&str> = self.examples.iter().take(5).map(String::as_str).collect();
            writeln!(f, "Examples: {}", shown.join(", "))?;
        }

        if !self.top_frequencies.is_empty() {
            writeln!(f, "\nMost frequent:")?;
            for entry in &self.top_frequencies {
                writeln!(f, "{}: {} occurrences", entry.value, entry.count)?;
            }
        }
        Ok(())
    }
}

/// 统计模式出现情况
pub fn analyze_pattern(text: &str, pattern: &str) -> Result<PatternStatistics> {
    let pattern = Pattern::compile(pattern)?;
    Ok(PatternStatistics::from_pattern(text, &pattern))
}

/// 对所有内置常见模式做统计，按内置顺序返回
pub fn analyze_common_patterns(text: &str) -> Result<Vec<(&'static str, PatternStatistics)>> {
    COMMON_PATTERNS
        .iter()
        .map(|(name, pattern)| Ok((*name, analyze_pattern(text, pattern)?)))
        .collect()
}

/// 行长度统计
#[derive(Debug, Clone, PartialEq)]
pub struct LineStatistics {
    pub line_count: usize,
    pub average_length: f64,
    pub min_length: usize,
    pub max_length: usize,
    pub distribution: [usize; LENGTH_BUCKETS],
}

impl LineStatistics {
    /// 按 `\n` 分行统计，末尾的空行不计入
    pub fn from_text(text: &str) -> Self {
        let mut lines: Vec<&str> = text.split('\n').collect();
        while lines.len() > 1 && lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }

        let mut distribution = [0; LENGTH_BUCKETS];
        let mut total = 0;
        let mut min_length = usize::MAX;
        let mut max_length = 0;

        for line in &lines {
            let length = line.trim_end_matches('\r').chars().count();
            total += length;
            min_length = min_length.min(length);
            max_length = max_length.max(length);
            distribution[(length / 10).min(LENGTH_BUCKETS - 1)] += 1;
        }

        Self {
            line_count: lines.len(),
            average_length: total as f64 / lines.len() as f64,
            min_length,
            max_length,
            distribution,
        }
    }
}

impl fmt::Display for LineStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Lines: {}", self.line_count)?;
        writeln!(f, "Average Length: {:.2} characters", self.average_length)?;
        writeln!(f, "Minimum Length: {} characters", self.min_length)?;
        writeln!(f, "Maximum Length: {} characters", self.max_length)?;
        writeln!(f, "\nLength Distribution:")?;
        for (i, count) in self.distribution.iter().enumerate().take(LENGTH_BUCKETS - 1) {
            writeln!(f, "{}-{} chars: {} lines", i * 10, i * 10 + 9, count)?;
        }
        writeln!(f, "90+ chars: {} lines", self.distribution[LENGTH_BUCKETS - 1])
    }
}

/// 词频统计：按空白分词，只保留字母数字并转为小写
pub fn word_frequency(text: &str) -> Vec<FrequencyEntry> {
    let mut counter = OrderedCounter::default();
    for word in text.split_whitespace() {
        let cleaned: String = word
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        if !cleaned.is_empty() {
            counter.add(&cleaned);
        }
    }
    counter.ranked(None)
}

/// 字符分布统计
pub fn character_distribution(text: &str) -> Vec<FrequencyEntry> {
    let mut counter = OrderedCounter::default();
    let mut buf = [0u8; 4];
    for c in text.chars() {
        counter.add(c.encode_utf8(&mut buf));
    }
    counter.ranked(None)
}
