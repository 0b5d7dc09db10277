//! # 进度条工具
//!
//! 封装 `indicatif` 提供统一的进度条样式，并把批处理进度快照映射到进度条上。
//!
//! ## 依赖关系
//! - 被 `commands/batch.rs` 使用
//! - 使用 `indicatif` crate

use crate::batch::ProgressSnapshot;

use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}";

/// 创建标准进度条
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message(message.to_string());
    pb
}

/// 创建不显示的进度条（`--quiet`）
pub fn create_hidden_bar() -> ProgressBar {
    ProgressBar::hidden()
}

/// 用进度快照更新进度条
pub fn apply_snapshot(pb: &ProgressBar, snapshot: &ProgressSnapshot) {
    pb.set_length(snapshot.total as u64);
    pb.set_position(snapshot.completed as u64);
    if snapshot.errors > 0 {
        pb.set_message(format!("{} ({} errors)", snapshot.message, snapshot.errors));
    } else {
        pb.set_message(snapshot.message.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_snapshot() {
        let pb = create_hidden_bar();
        apply_snapshot(
            &pb,
            &ProgressSnapshot {
                completed: 3,
                total: 5,
                errors: 1,
                message: "c.txt".to_string(),
            },
        );
        assert_eq!(pb.position(), 3);
        assert_eq!(pb.length(), Some(5));
        assert_eq!(pb.message(), "c.txt (1 errors)");
    }
}
