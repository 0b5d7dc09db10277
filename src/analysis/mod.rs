//! # 文本分析模块
//!
//! 提供模式出现统计、行长度统计、词频与字符分布。
//!
//! ## 依赖关系
//! - 被 `commands/stats.rs` 使用
//! - 使用 `pattern/`
//! - 子模块: statistics

pub mod statistics;

pub use statistics::{
    analyze_common_patterns, analyze_pattern, character_distribution, word_frequency,
    FrequencyEntry, LineStatistics, PatternStatistics, COMMON_PATTERNS,
};
