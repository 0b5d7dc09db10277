//! # 统一错误处理模块
//!
//! 定义 textflow 的所有错误类型，使用 `thiserror` 派生。
//!
//! 错误分两类：
//! - 配置错误：作业级别，在派发任何文件之前立即返回
//! - 单文件错误：计入批处理结果，不中断其他文件
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// textflow 统一错误类型
#[derive(Error, Debug)]
pub enum TextflowError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误（单文件）
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("File name has no extension: {path}")]
    MissingExtension { path: String },

    #[error("Output file {output} is already written by {owner}")]
    OutputConflict { output: String, owner: String },

    #[error("Worker panicked while processing {path}: {reason}")]
    WorkerPanic { path: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 输出位置错误（配置）
    // ─────────────────────────────────────────────────────────────
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("Not a directory: {path}")]
    NotADirectory { path: String },

    #[error("Output location is not writable: {path}")]
    OutputNotWritable {
        path: String,
        #[source]
        source: Option<std::io::Error>,
    },

    // ─────────────────────────────────────────────────────────────
    // 模式错误（配置）
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid pattern '{pattern}'\nReason: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("A pattern is required for {operation}")]
    EmptyPattern { operation: String },

    // ─────────────────────────────────────────────────────────────
    // 参数错误（配置）
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

impl TextflowError {
    /// 是否为作业级配置错误（派发前即失败）
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            TextflowError::DirectoryNotFound { .. }
                | TextflowError::NotADirectory { .. }
                | TextflowError::OutputNotWritable { .. }
                | TextflowError::InvalidPattern { .. }
                | TextflowError::EmptyPattern { .. }
                | TextflowError::InvalidArgument(_)
                | TextflowError::ThreadPool(_)
        )
    }

    /// 带底层原因的完整错误描述（用于进度消息和失败列表）
    pub fn detailed(&self) -> String {
        let mut msg = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            msg.push_str(&format!(" ({})", err));
            source = std::error::Error::source(err);
        }
        msg
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, TextflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_classification() {
        let err = TextflowError::InvalidPattern {
            pattern: "[".to_string(),
            reason: "unclosed character class".to_string(),
        };
        assert!(err.is_configuration());

        let err = TextflowError::MissingExtension {
            path: "README".to_string(),
        };
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_error_messages() {
        let err = TextflowError::EmptyPattern {
            operation: "Regex Extract".to_string(),
        };
        assert_eq!(err.to_string(), "A pattern is required for Regex Extract");

        let err = TextflowError::FileReadError {
            path: "a.txt".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "Failed to read file: a.txt");
        assert_eq!(err.detailed(), "Failed to read file: a.txt (gone)");
    }
}
