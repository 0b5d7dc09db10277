//! # 模式匹配模块
//!
//! 对 `regex` 引擎的薄封装，提供校验、查找、替换、分割等操作。
//!
//! ## 依赖关系
//! - 被 `batch/operations.rs`, `analysis/`, `commands/` 使用
//! - 子模块: matcher

pub mod matcher;

pub use matcher::{
    find_all, is_full_match, pattern_error, replace_all, replace_first, split, validate, Match,
    Pattern,
};
