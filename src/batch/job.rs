//! # 批处理作业与结果
//!
//! 定义作业描述（操作类型、输入、输出位置、参数）、
//! 单文件任务、单元结果以及汇总结果。
//!
//! ## 依赖关系
//! - 被 `batch/coordinator.rs`, `batch/operations.rs` 使用
//! - 被 `commands/batch.rs` 用于构建作业

use std::fmt;
use std::path::{Path, PathBuf};

/// 操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    FindReplace,
    Extract,
    Merge,
    Split,
}

impl OperationKind {
    /// 结果中显示的操作名称
    pub fn label(&self) -> &'static str {
        match self {
            OperationKind::FindReplace => "Regex Find and Replace",
            OperationKind::Extract => "Regex Extract",
            OperationKind::Merge => "File Merge",
            OperationKind::Split => "File Split",
        }
    }

    /// 是否需要模式
    pub fn requires_pattern(&self) -> bool {
        matches!(self, OperationKind::FindReplace | OperationKind::Extract)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 操作参数
#[derive(Debug, Clone, Default)]
pub struct OperationParams {
    /// 模式（FindReplace / Extract）
    pub pattern: Option<String>,
    /// 替换文本（FindReplace），缺省为空字符串
    pub replacement: Option<String>,
    /// 每个分片的行数（Split）
    pub lines_per_chunk: Option<usize>,
    /// 合并时是否插入分隔块（Merge）
    pub add_separators: bool,
}

/// 批处理作业
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub kind: OperationKind,
    /// 输入文件（按提交顺序）
    pub inputs: Vec<PathBuf>,
    /// 输出目录；Merge 为单个输出文件
    pub output: PathBuf,
    pub params: OperationParams,
}

impl BatchJob {
    /// 批量查找替换
    pub fn find_replace(
        inputs: Vec<PathBuf>,
        output_dir: impl Into<PathBuf>,
        pattern: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            kind: OperationKind::FindReplace,
            inputs,
            output: output_dir.into(),
            params: OperationParams {
                pattern: Some(pattern.into()),
                replacement: Some(replacement.into()),
                ..Default::default()
            },
        }
    }

    /// 批量提取匹配内容
    pub fn extract(
        inputs: Vec<PathBuf>,
        output_dir: impl Into<PathBuf>,
        pattern: impl Into<String>,
    ) -> Self {
        Self {
            kind: OperationKind::Extract,
            inputs,
            output: output_dir.into(),
            params: OperationParams {
                pattern: Some(pattern.into()),
                ..Default::default()
            },
        }
    }

    /// 合并为单个文件
    pub fn merge(inputs: Vec<PathBuf>, output_file: impl Into<PathBuf>, add_separators: bool) -> Self {
        Self {
            kind: OperationKind::Merge,
            inputs,
            output: output_file.into(),
            params: OperationParams {
                add_separators,
                ..Default::default()
            },
        }
    }

    /// 按行数拆分单个文件
    pub fn split(
        input: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        lines_per_chunk: usize,
    ) -> Self {
        Self {
            kind: OperationKind::Split,
            inputs: vec![input.into()],
            output: output_dir.into(),
            params: OperationParams {
                lines_per_chunk: Some(lines_per_chunk),
                ..Default::default()
            },
        }
    }

    /// 为每个输入生成一个任务
    pub fn tasks(&self) -> Vec<FileTask> {
        self.inputs
            .iter()
            .enumerate()
            .map(|(index, path)| FileTask {
                index,
                path: path.clone(),
            })
            .collect()
    }
}

/// 单文件任务
#[derive(Debug, Clone)]
pub struct FileTask {
    /// 在输入列表中的位置
    pub index: usize,
    pub path: PathBuf,
}

impl FileTask {
    /// 用于消息显示的文件名
    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }
}

/// 路径的文件名部分（无文件名时退回完整路径）
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// 单个工作单元的结果
#[derive(Debug, Clone)]
pub enum UnitOutcome {
    /// 处理成功，附带写出的文件
    Succeeded(Vec<PathBuf>),
    /// 处理失败 (文件路径, 错误信息)
    Failed(String, String),
}

/// 批处理汇总结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    /// 已尝试处理的文件数（成功与失败都计入）
    pub processed: usize,
    /// 失败数量
    pub errors: usize,
    /// 文件总数
    pub total: usize,
    /// 操作名称
    pub operation: String,
    /// 写出的文件
    pub outputs: Vec<PathBuf>,
    /// 失败详情
    pub failures: Vec<(String, String)>,
}

impl BatchResult {
    /// 创建空结果
    pub fn new(operation: &str, total: usize) -> Self {
        Self {
            processed: 0,
            errors: 0,
            total,
            operation: operation.to_string(),
            outputs: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// 合并单元结果
    pub fn merge(&mut self, outcome: UnitOutcome) {
        self.processed += 1;
        match outcome {
            UnitOutcome::Succeeded(outputs) => self.outputs.extend(outputs),
            UnitOutcome::Failed(path, err) => {
                self.errors += 1;
                self.failures.push((path, err));
            }
        }
    }

    /// 成功数量
    pub fn success_count(&self) -> usize {
        self.processed - self.errors
    }
}

impl fmt::Display for BatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} completed: {}/{} files processed, {} errors",
            self.operation, self.processed, self.total, self.errors
        )
    }
}
