//! # 批量处理模块
//!
//! 并发批量文本变换引擎。
//!
//! ## 功能
//! - 收集输入文件（文件/目录、glob）
//! - 每个文件一个工作单元，在有界线程池上并行执行
//! - 单文件失败隔离，汇总为一个结果
//! - 进度快照实时投递
//!
//! ## 依赖关系
//! - 被 `commands/batch.rs` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `fileio/`, `pattern/`

pub mod collector;
pub mod coordinator;
pub mod job;
pub mod operations;
pub mod pool;
pub mod progress;

pub use collector::{collect_inputs, FileCollector};
pub use coordinator::BatchCoordinator;
pub use job::{
    display_name, BatchJob, BatchResult, FileTask, OperationKind, OperationParams, UnitOutcome,
};
pub use pool::WorkerPool;
pub use progress::{ChannelObserver, ProgressObserver, ProgressReporter, ProgressSnapshot};
