//! # 进度报告器
//!
//! 在线程间共享的完成数 / 错误数计数器，每完成一个工作单元就向观察者投递一次快照。
//!
//! 计数更新与快照投递在同一个临界区内完成，
//! 因此观察者看到的 `completed` 序列单调不减。
//! 观察者若需在特定线程上处理快照（如 UI 线程），使用 [`ChannelObserver`]
//! 把快照放入通道，由宿主线程自行取出。
//!
//! ## 依赖关系
//! - 被 `batch/coordinator.rs`, `batch/operations.rs` 使用
//! - 被 `commands/batch.rs` 用于驱动进度条

use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, MutexGuard};

/// 进度快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// 已完成（成功或失败）的单元数
    pub completed: usize,
    /// 单元总数
    pub total: usize,
    /// 失败单元数
    pub errors: usize,
    /// 最近一次事件的描述
    pub message: String,
}

impl ProgressSnapshot {
    pub fn is_finished(&self) -> bool {
        self.completed >= self.total
    }
}

impl fmt::Display for ProgressSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed {}/{} files. {}",
            self.completed, self.total, self.message
        )
    }
}

/// 进度观察者
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, snapshot: &ProgressSnapshot);
}

impl<F> ProgressObserver for F
where
    F: Fn(&ProgressSnapshot) + Send + Sync,
{
    fn on_progress(&self, snapshot: &ProgressSnapshot) {
        self(snapshot)
    }
}

/// 基于通道的观察者：工作线程只负责发送，不等待处理
pub struct ChannelObserver {
    sender: Mutex<Sender<ProgressSnapshot>>,
}

impl ChannelObserver {
    /// 创建观察者及其接收端
    pub fn channel() -> (Self, Receiver<ProgressSnapshot>) {
        let (tx, rx) = mpsc::channel();
        (
            Self {
                sender: Mutex::new(tx),
            },
            rx,
        )
    }
}

impl ProgressObserver for ChannelObserver {
    fn on_progress(&self, snapshot: &ProgressSnapshot) {
        let sender = self.sender.lock().unwrap_or_else(|e| e.into_inner());
        // 接收端已关闭时丢弃快照
        let _ = sender.send(snapshot.clone());
    }
}

/// 单元结束状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitStatus {
    Succeeded,
    Failed,
}

#[derive(Debug, Default)]
struct Counters {
    completed: usize,
    errors: usize,
}

/// 进度报告器
pub struct ProgressReporter<'a> {
    total: usize,
    counters: Mutex<Counters>,
    observer: Option<&'a dyn ProgressObserver>,
}

impl<'a> ProgressReporter<'a> {
    /// 创建报告器，`total` 在作业开始时固定
    pub fn new(total: usize, observer: Option<&'a dyn ProgressObserver>) -> Self {
        Self {
            total,
            counters: Mutex::new(Counters::default()),
            observer,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Counters> {
        // 观察者 panic 不应使后续计数失效
        self.counters.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn deliver(&self, counters: &Counters, message: String) {
        if let Some(observer) = self.observer {
            observer.on_progress(&ProgressSnapshot {
                completed: counters.completed,
                total: self.total,
                errors: counters.errors,
                message,
            });
        }
    }

    /// 记录一个单元结束并投递快照
    pub fn observe(&self, status: UnitStatus, message: String) {
        let mut counters = self.lock();
        counters.completed += 1;
        if status == UnitStatus::Failed {
            counters.errors += 1;
        }
        self.deliver(&counters, message);
    }

    /// 投递一条不改变计数的消息
    pub fn note(&self, message: String) {
        let counters = self.lock();
        self.deliver(&counters, message);
    }

    /// 当前计数快照
    pub fn snapshot(&self) -> ProgressSnapshot {
        let counters = self.lock();
        ProgressSnapshot {
            completed: counters.completed,
            total: self.total,
            errors: counters.errors,
            message: String::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }
}
