//! # 模式匹配器
//!
//! 编译模式并对文本执行查找、替换、分割。
//!
//! ## 语义
//! - 查找：从左到右、不重叠、最左优先
//! - 替换：支持 `$1` / `${name}` 反向引用，`$$` 表示字面量 `$`
//! - 分割：丢弃末尾的空片段，只含分隔符的文本得到空列表
//! - 匹配位置：半开区间，按字符（而非字节）计数
//! - 未参与匹配的捕获组记为空字符串
//!
//! ## 依赖关系
//! - 被 `batch/operations.rs`, `analysis/statistics.rs` 调用
//! - 使用 `regex` crate

use crate::error::{Result, TextflowError};

use regex::Regex;
use std::fmt;

/// 单个匹配结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// 起始位置（字符索引，包含）
    pub start: usize,
    /// 结束位置（字符索引，不包含）
    pub end: usize,
    /// 匹配文本
    pub text: String,
    /// 捕获组文本（第 1 组起）
    pub groups: Vec<String>,
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Match[{}-{}]: {}", self.start, self.end, self.text)
    }
}

/// 已编译的模式
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// 编译模式，语法错误返回 `InvalidPattern`
    pub fn compile(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| TextflowError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// 原始模式字符串
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// 文本中是否存在匹配
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// 查找所有匹配
    pub fn find_all(&self, text: &str) -> Vec<Match> {
        let mut matches = Vec::new();

        // 增量换算字节偏移到字符偏移
        let mut last_byte = 0;
        let mut last_char = 0;
        let mut to_char = |byte: usize| {
            last_char += text[last_byte..byte].chars().count();
            last_byte = byte;
            last_char
        };

        for caps in self.regex.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let start = to_char(whole.start());
            let end = to_char(whole.end());
            let groups = (1..caps.len())
                .map(|i| caps.get(i).map(|g| g.as_str().to_string()).unwrap_or_default())
                .collect();

            matches.push(Match {
                start,
                end,
                text: whole.as_str().to_string(),
                groups,
            });
        }

        matches
    }

    /// 只返回匹配文本，不收集位置和捕获组
    pub fn find_texts<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.regex.find_iter(text).map(|m| m.as_str())
    }

    /// 替换所有匹配
    pub fn replace_all(&self, text: &str, replacement: &str) -> String {
        self.regex.replace_all(text, replacement).into_owned()
    }

    /// 替换第一个匹配
    pub fn replace_first(&self, text: &str, replacement: &str) -> String {
        self.regex.replace(text, replacement).into_owned()
    }

    /// 锚定首尾后的模式，用于整段匹配
    pub fn anchored(&self) -> Result<Pattern> {
        Pattern::compile(&format!(r"\A(?:{})\z", self.source))
    }

    /// 按模式分割文本
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return vec![String::new()];
        }

        let mut parts = Vec::new();
        let mut last = 0;
        for m in self.regex.find_iter(text) {
            // 开头的零宽匹配不产生空片段
            if m.end() == 0 {
                continue;
            }
            parts.push(text[last..m.start()].to_string());
            last = m.end();
        }
        parts.push(text[last..].to_string());

        // 全部由分隔符组成时结果为空
        while parts.last().is_some_and(|p| p.is_empty()) {
            parts.pop();
        }
        parts
    }
}

/// 校验模式语法
pub fn validate(pattern: &str) -> bool {
    Regex::new(pattern).is_ok()
}

/// 获取模式的错误描述，合法时返回 `None`
pub fn pattern_error(pattern: &str) -> Option<String> {
    Regex::new(pattern).err().map(|e| e.to_string())
}

/// 查找所有匹配
pub fn find_all(text: &str, pattern: &str) -> Result<Vec<Match>> {
    Ok(Pattern::compile(pattern)?.find_all(text))
}

/// 替换所有匹配
pub fn replace_all(text: &str, pattern: &str, replacement: &str) -> Result<String> {
    Ok(Pattern::compile(pattern)?.replace_all(text, replacement))
}

/// 替换第一个匹配
pub fn replace_first(text: &str, pattern: &str, replacement: &str) -> Result<String> {
    Ok(Pattern::compile(pattern)?.replace_first(text, replacement))
}

/// 按模式分割文本
pub fn split(text: &str, pattern: &str) -> Result<Vec<String>> {
    Ok(Pattern::compile(pattern)?.split(text))
}

/// 整段文本是否完全匹配模式
pub fn is_full_match(text: &str, pattern: &str) -> Result<bool> {
    // 先单独编译以便报告原始模式的语法错误
    let anchored = Pattern::compile(pattern)?.anchored()?;
    Ok(anchored.is_match(text))
}
