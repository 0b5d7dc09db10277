//! # 工作线程池
//!
//! 固定大小的 rayon 线程池，每个作业创建一次，作业结束时随所有权一同释放。
//!
//! ## 功能
//! - 最多 N 个单元并发执行
//! - 单元内的 panic 被捕获并转换为错误信息，不影响其他单元
//! - 按任务顺序返回每个单元的结果
//!
//! ## 依赖关系
//! - 被 `batch/coordinator.rs` 使用
//! - 使用 `rayon` 进行并行计算

use crate::error::{Result, TextflowError};

use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// 在隔离环境中执行闭包，panic 转换为错误信息
pub fn isolate<R, F>(f: F) -> std::result::Result<R, String>
where
    F: FnOnce() -> R,
{
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(panic_message)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// 解析并行度（0 = 自动）
pub fn resolve_workers(workers: usize) -> usize {
    if workers == 0 {
        num_cpus::get()
    } else {
        workers
    }
}

/// 工作线程池
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    size: usize,
}

impl WorkerPool {
    /// 创建线程池（0 = CPU 核数）
    pub fn new(workers: usize) -> Result<Self> {
        let size = resolve_workers(workers);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(size)
            .thread_name(|i| format!("textflow-worker-{}", i))
            .build()
            .map_err(|e| TextflowError::ThreadPool(e.to_string()))?;
        Ok(Self { pool, size })
    }

    /// 线程数
    pub fn size(&self) -> usize {
        self.size
    }

    /// 为每个任务派发一个单元并等待全部完成
    ///
    /// 返回值与 `tasks` 一一对应；单元 panic 时对应位置为 `Err(panic 信息)`。
    pub fn execute<T, R, F>(&self, tasks: &[T], unit: F) -> Vec<std::result::Result<R, String>>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        self.pool.install(|| {
            tasks
                .par_iter()
                .map(|task| isolate(|| unit(task)))
                .collect()
        })
    }
}
