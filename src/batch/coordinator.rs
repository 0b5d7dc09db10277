//! # 批处理协调器
//!
//! 校验作业、派发工作单元、等待全部完成并汇总结果。
//!
//! ## 功能
//! - 配置错误（模式、参数、输出位置）在派发前立即返回
//! - FindReplace / Extract 按文件并行；Split 为单个单元
//! - Merge 按提交顺序顺序执行
//! - 单个文件失败（包括 panic）只计入错误数，不影响其他文件
//!
//! ## 依赖关系
//! - 被 `commands/batch.rs` 调用
//! - 使用 `batch/pool.rs` 执行单元
//! - 使用 `batch/progress.rs` 报告进度

use crate::batch::job::{BatchJob, BatchResult, FileTask, OperationKind, UnitOutcome};
use crate::batch::operations::{Extract, FileOperation, FindReplace, Merger, Split};
use crate::batch::pool::{self, WorkerPool};
use crate::batch::progress::{ProgressObserver, ProgressReporter, UnitStatus};
use crate::error::{Result, TextflowError};

use log::{debug, warn};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// 批处理协调器
pub struct BatchCoordinator {
    /// 并行作业数（0 = 自动）
    workers: usize,
}

impl Default for BatchCoordinator {
    fn default() -> Self {
        Self::new(0)
    }
}

impl BatchCoordinator {
    /// 创建新的协调器
    pub fn new(workers: usize) -> Self {
        Self {
            workers: pool::resolve_workers(workers),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// 执行作业并阻塞直到所有文件处理完毕
    ///
    /// `Err` 只表示配置错误，此时没有任何文件被读写，也没有投递任何进度。
    pub fn run(
        &self,
        job: &BatchJob,
        observer: Option<&dyn ProgressObserver>,
    ) -> Result<BatchResult> {
        let label = job.kind.label();

        // 先校验参数，再处理空输入
        match job.kind {
            OperationKind::FindReplace => {
                let op = FindReplace::from_job(job)?;
                self.run_operation(job, &op, observer)
            }
            OperationKind::Extract => {
                let op = Extract::from_job(job)?;
                self.run_operation(job, &op, observer)
            }
            OperationKind::Split => {
                let op = Split::from_job(job)?;
                self.run_operation(job, &op, observer)
            }
            OperationKind::Merge => {
                if job.inputs.is_empty() {
                    return Ok(BatchResult::new(label, 0));
                }
                self.run_merge(job, observer)
            }
        }
    }

    /// 并行执行单文件操作
    fn run_operation<O: FileOperation>(
        &self,
        job: &BatchJob,
        op: &O,
        observer: Option<&dyn ProgressObserver>,
    ) -> Result<BatchResult> {
        let label = op.kind().label();
        if job.inputs.is_empty() {
            return Ok(BatchResult::new(label, 0));
        }
        ensure_output_dir(&job.output)?;

        let tasks = job.tasks();
        let conflicts = output_conflicts(op, &tasks);
        let reporter = ProgressReporter::new(tasks.len(), observer);
        let workers = self.workers.min(tasks.len());
        let pool = WorkerPool::new(workers)?;

        debug!(
            "{}: dispatching {} unit(s) on {} worker(s)",
            label,
            tasks.len(),
            pool.size()
        );

        let joined = pool.execute(&tasks, |task| match conflicts.get(&task.index) {
            Some(reason) => report_outcome(label, task, Err(reason.clone()), &reporter),
            None => run_unit(op, task, &reporter),
        });
        drop(pool);

        let mut result = BatchResult::new(label, tasks.len());
        for (task, outcome) in tasks.iter().zip(joined) {
            match outcome {
                Ok(outcome) => result.merge(outcome),
                Err(reason) => result.merge(lost_result(label, task, reason)),
            }
        }

        debug!("{}", result);
        Ok(result)
    }

    /// 顺序合并
    fn run_merge(
        &self,
        job: &BatchJob,
        observer: Option<&dyn ProgressObserver>,
    ) -> Result<BatchResult> {
        let label = OperationKind::Merge.label();
        let mut merger = Merger::create(&job.output, job.params.add_separators)?;

        let tasks = job.tasks();
        let reporter = ProgressReporter::new(tasks.len(), observer);
        let mut result = BatchResult::new(label, tasks.len());

        debug!("{}: merging {} file(s) into {}", label, tasks.len(), job.output.display());

        for task in &tasks {
            let outcome = match pool::isolate(|| merger.append(task)) {
                Ok(Ok(())) => Ok(Vec::new()),
                Ok(Err(e)) => Err(e.detailed()),
                Err(panic) => Err(panic_error(task, panic).to_string()),
            };

            // 与并行路径一致：报告阶段的 panic 也只计为该文件失败
            let unit = pool::isolate(|| report_outcome(label, task, outcome, &reporter))
                .unwrap_or_else(|reason| lost_result(label, task, reason));
            result.merge(unit);
        }

        if merger.merged() > 0 {
            result.outputs.push(job.output.clone());
        }

        debug!("{}", result);
        Ok(result)
    }
}

/// 执行单个单元并报告进度
fn run_unit<O: FileOperation>(op: &O, task: &FileTask, reporter: &ProgressReporter<'_>) -> UnitOutcome {
    let outcome = match pool::isolate(|| op.process(task, reporter)) {
        Ok(Ok(outputs)) => Ok(outputs),
        Ok(Err(e)) => Err(e.detailed()),
        Err(panic) => Err(panic_error(task, panic).to_string()),
    };
    report_outcome(op.kind().label(), task, outcome, reporter)
}

/// 记录单元结束并转换为结果
fn report_outcome(
    label: &str,
    task: &FileTask,
    outcome: std::result::Result<Vec<PathBuf>, String>,
    reporter: &ProgressReporter<'_>,
) -> UnitOutcome {
    match outcome {
        Ok(outputs) => {
            reporter.observe(UnitStatus::Succeeded, task.file_name());
            UnitOutcome::Succeeded(outputs)
        }
        Err(reason) => {
            warn!("{}: {}: {}", label, task.path.display(), reason);
            reporter.observe(
                UnitStatus::Failed,
                format!("Error processing {}: {}", task.file_name(), reason),
            );
            UnitOutcome::Failed(task.path.display().to_string(), reason)
        }
    }
}

/// 单元已结束但结果在等待阶段丢失
fn lost_result(label: &str, task: &FileTask, reason: String) -> UnitOutcome {
    warn!("{}: lost result for {}: {}", label, task.path.display(), reason);
    UnitOutcome::Failed(
        task.path.display().to_string(),
        format!("Worker failed while awaiting result: {}", reason),
    )
}

/// 输出路径与前面的输入重复的任务（按任务序号），后出现的输入记为失败
fn output_conflicts<O: FileOperation>(op: &O, tasks: &[FileTask]) -> HashMap<usize, String> {
    let mut claimed: HashMap<PathBuf, &FileTask> = HashMap::new();
    let mut conflicts = HashMap::new();

    for task in tasks {
        let Some(output) = op.planned_output(task) else {
            continue;
        };
        match claimed.get(&output) {
            Some(owner) => {
                let err = TextflowError::OutputConflict {
                    output: output.display().to_string(),
                    owner: owner.path.display().to_string(),
                };
                conflicts.insert(task.index, err.to_string());
            }
            None => {
                claimed.insert(output, task);
            }
        }
    }

    conflicts
}

fn panic_error(task: &FileTask, reason: String) -> TextflowError {
    TextflowError::WorkerPanic {
        path: task.path.display().to_string(),
        reason,
    }
}

/// 输出目录必须存在、是目录且可写（以实际创建文件为准）
fn ensure_output_dir(dir: &Path) -> Result<()> {
    let metadata = fs::metadata(dir).map_err(|_| TextflowError::DirectoryNotFound {
        path: dir.display().to_string(),
    })?;

    if !metadata.is_dir() {
        return Err(TextflowError::NotADirectory {
            path: dir.display().to_string(),
        });
    }

    if metadata.permissions().readonly() {
        return Err(TextflowError::OutputNotWritable {
            path: dir.display().to_string(),
            source: None,
        });
    }

    // 权限位不反映属主与 ACL，实际创建一个匿名临时文件确认可写
    tempfile::tempfile_in(dir).map_err(|e| TextflowError::OutputNotWritable {
        path: dir.display().to_string(),
        source: Some(e),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::progress::{ChannelObserver, ProgressSnapshot};
    use std::sync::Mutex;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_find_replace_example() {
        let dir = tempdir().unwrap();
        let out = tempdir().unwrap();
        let a = write(dir.path(), "a.txt", "foo bar foo");

        let job = BatchJob::find_replace(vec![a], out.path(), "foo", "baz");
        let result = BatchCoordinator::new(2).run(&job, None).unwrap();

        assert_eq!((result.processed, result.errors, result.total), (1, 0, 1));
        assert_eq!(
            fs::read_to_string(out.path().join("a_processed.txt")).unwrap(),
            "baz bar baz\n"
        );
    }

    #[test]
    fn test_all_files_succeed() {
        let dir = tempdir().unwrap();
        let out = tempdir().unwrap();
        let inputs: Vec<PathBuf> = (0..8)
            .map(|i| write(dir.path(), &format!("f{}.txt", i), "x1 y2 z3"))
            .collect();

        let job = BatchJob::extract(inputs, out.path(), r"\d");
        let result = BatchCoordinator::new(3).run(&job, None).unwrap();

        assert_eq!(result.processed, 8);
        assert_eq!(result.errors, 0);
        assert_eq!(result.outputs.len(), 8);
        assert_eq!(
            fs::read_to_string(out.path().join("f5_extracted.txt")).unwrap(),
            "1\n2\n3\n"
        );
    }

    #[test]
    fn test_partial_failures_are_counted() {
        let dir = tempdir().unwrap();
        let out = tempdir().unwrap();
        let inputs = vec![
            write(dir.path(), "ok1.txt", "foo"),
            dir.path().join("missing.txt"),
            write(dir.path(), "NOEXT", "foo"),
            write(dir.path(), "ok2.txt", "foo"),
        ];

        let seen = Mutex::new(Vec::new());
        let observer = |s: &ProgressSnapshot| seen.lock().unwrap().push(s.clone());

        let job = BatchJob::find_replace(inputs, out.path(), "foo", "bar");
        let result = BatchCoordinator::new(4).run(&job, Some(&observer)).unwrap();

        assert_eq!(result.processed, 4);
        assert_eq!(result.errors, 2);
        assert_eq!(result.success_count(), 2);
        assert_eq!(result.failures.len(), 2);
        assert!(out.path().join("ok2_processed.txt").exists());

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), 4);
        assert_eq!(seen.last().unwrap().completed, 4);
        assert_eq!(seen.last().unwrap().errors, 2);
        assert!(seen
            .iter()
            .any(|s| s.message.starts_with("Error processing missing.txt")));
    }

    #[test]
    fn test_idempotent_replace() {
        let dir = tempdir().unwrap();
        let out1 = tempdir().unwrap();
        let out2 = tempdir().unwrap();
        let a = write(dir.path(), "a.txt", "color colour\ncolour");

        let coordinator = BatchCoordinator::new(1);
        let job = BatchJob::find_replace(vec![a], out1.path(), "colour", "color");
        coordinator.run(&job, None).unwrap();
        let first = out1.path().join("a_processed.txt");

        let job = BatchJob::find_replace(vec![first.clone()], out2.path(), "colour", "color");
        coordinator.run(&job, None).unwrap();
        let second = out2.path().join("a_processed_processed.txt");

        assert_eq!(
            fs::read_to_string(&first).unwrap(),
            fs::read_to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_invalid_pattern_fails_before_dispatch() {
        let dir = tempdir().unwrap();
        let out = tempdir().unwrap();
        let a = write(dir.path(), "a.txt", "text");

        let (observer, rx) = ChannelObserver::channel();
        let job = BatchJob::extract(vec![a], out.path(), "[");
        let err = BatchCoordinator::new(2).run(&job, Some(&observer)).unwrap_err();
        drop(observer);

        assert!(matches!(err, TextflowError::InvalidPattern { .. }));
        assert!(err.is_configuration());
        assert_eq!(rx.iter().count(), 0);
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_output_dir_is_configuration_error() {
        let dir = tempdir().unwrap();
        let a = write(dir.path(), "a.txt", "text");

        let job = BatchJob::find_replace(vec![a], dir.path().join("nope"), "t", "T");
        let err = BatchCoordinator::new(2).run(&job, None).unwrap_err();
        assert!(matches!(err, TextflowError::DirectoryNotFound { .. }));
    }

    #[test]
    fn test_empty_input_list() {
        let out = tempdir().unwrap();
        let coordinator = BatchCoordinator::default();

        let job = BatchJob::find_replace(vec![], out.path(), "a", "b");
        let result = coordinator.run(&job, None).unwrap();
        assert_eq!((result.processed, result.errors, result.total), (0, 0, 0));

        let job = BatchJob::merge(vec![], out.path().join("m.txt"), true);
        let result = coordinator.run(&job, None).unwrap();
        assert_eq!(result.total, 0);
        assert!(!out.path().join("m.txt").exists());
    }

    #[test]
    fn test_split_round_trip() {
        let dir = tempdir().unwrap();
        let out = tempdir().unwrap();
        let lines: Vec<String> = (1..=23).map(|i| format!("row {}", i)).collect();
        let input = write(dir.path(), "data.csv", &lines.join("\r\n"));

        let (observer, rx) = ChannelObserver::channel();
        let job = BatchJob::split(input, out.path(), 5);
        let result = BatchCoordinator::new(4).run(&job, Some(&observer)).unwrap();
        drop(observer);

        assert_eq!((result.processed, result.errors, result.total), (1, 0, 1));
        assert_eq!(result.outputs.len(), 5);

        let mut rejoined = Vec::new();
        for part in 1..=5 {
            let path = out.path().join(format!("data_part{}.txt", part));
            let content = fs::read_to_string(path).unwrap();
            rejoined.extend(content.lines().map(str::to_string));
        }
        assert_eq!(rejoined, lines);

        let snapshots: Vec<ProgressSnapshot> = rx.iter().collect();
        assert_eq!(snapshots.len(), 6);
        assert_eq!(snapshots[0].message, "Created part file 1");
        assert_eq!(snapshots[5].completed, 1);
    }

    #[test]
    fn test_merge_order_and_separators() {
        let dir = tempdir().unwrap();
        let a = write(dir.path(), "A.txt", "a1\na2");
        let b = write(dir.path(), "B.txt", "b1");
        let c = write(dir.path(), "C.txt", "c1\n");
        let out = dir.path().join("merged.out");

        let job = BatchJob::merge(vec![a, b, c], &out, true);
        let result = BatchCoordinator::new(4).run(&job, None).unwrap();
        assert_eq!((result.processed, result.errors), (3, 0));

        let merged = fs::read_to_string(&out).unwrap();
        let expected = format!(
            "a1\na2\n{}b1\n{}c1\n",
            Merger::separator("B.txt"),
            Merger::separator("C.txt")
        );
        assert_eq!(merged, expected);
        assert_eq!(merged.matches("FILE: ").count(), 2);
    }

    #[test]
    fn test_merge_unwritable_output_is_configuration_error() {
        let dir = tempdir().unwrap();
        let a = write(dir.path(), "a.txt", "a");
        let job = BatchJob::merge(vec![a], dir.path().join("no/such/dir.txt"), false);

        let err = BatchCoordinator::new(1).run(&job, None).unwrap_err();
        assert!(matches!(err, TextflowError::OutputNotWritable { .. }));
    }

    #[test]
    fn test_panicking_observer_is_counted() {
        let dir = tempdir().unwrap();
        let out = tempdir().unwrap();
        let inputs = vec![
            write(dir.path(), "a.txt", "x"),
            write(dir.path(), "b.txt", "x"),
        ];

        let observer = |s: &ProgressSnapshot| {
            if s.message == "a.txt" {
                panic!("observer failure");
            }
        };

        let job = BatchJob::extract(inputs, out.path(), "x");
        let result = BatchCoordinator::new(1).run(&job, Some(&observer)).unwrap();

        assert_eq!(result.processed, 2);
        assert_eq!(result.errors, 1);
        assert!(result.failures[0].1.contains("observer failure"));
    }

    #[test]
    fn test_merge_panicking_observer_is_counted() {
        let dir = tempdir().unwrap();
        let a = write(dir.path(), "a.txt", "alpha");
        let b = write(dir.path(), "b.txt", "beta");
        let out = dir.path().join("merged.out");

        let observer = |s: &ProgressSnapshot| {
            if s.message == "a.txt" {
                panic!("observer failure");
            }
        };

        let job = BatchJob::merge(vec![a, b], &out, false);
        let result = BatchCoordinator::new(1).run(&job, Some(&observer)).unwrap();

        assert_eq!((result.processed, result.errors, result.total), (2, 1, 2));
        assert!(result.failures[0].0.ends_with("a.txt"));
        assert!(result.failures[0].1.contains("observer failure"));
        assert_eq!(fs::read_to_string(&out).unwrap(), "alpha\nbeta\n");
    }

    #[test]
    fn test_same_file_name_in_two_directories() {
        let dir = tempdir().unwrap();
        let out = tempdir().unwrap();
        fs::create_dir(dir.path().join("d1")).unwrap();
        fs::create_dir(dir.path().join("d2")).unwrap();
        let first = write(&dir.path().join("d1"), "x.txt", "first");
        let second = write(&dir.path().join("d2"), "x.txt", "second");

        let seen = Mutex::new(Vec::new());
        let observer = |s: &ProgressSnapshot| seen.lock().unwrap().push(s.clone());

        let job = BatchJob::find_replace(vec![first.clone(), second.clone()], out.path(), "z", "y");
        let result = BatchCoordinator::new(2).run(&job, Some(&observer)).unwrap();

        assert_eq!((result.processed, result.errors), (2, 1));
        assert_eq!(result.outputs, vec![out.path().join("x_processed.txt")]);
        assert_eq!(result.failures[0].0, second.display().to_string());
        assert!(result.failures[0].1.contains(&first.display().to_string()));
        assert_eq!(
            fs::read_to_string(out.path().join("x_processed.txt")).unwrap(),
            "first\n"
        );

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen.iter().map(|s| s.errors).max(), Some(1));
    }

    #[test]
    fn test_extract_output_conflict() {
        let dir = tempdir().unwrap();
        let out = tempdir().unwrap();
        let a = write(dir.path(), "log.txt", "1");
        let b = write(dir.path(), "log.csv", "2");

        let job = BatchJob::extract(vec![a, b], out.path(), r"\d");
        let result = BatchCoordinator::new(2).run(&job, None).unwrap();

        assert_eq!((result.processed, result.errors), (2, 1));
        assert_eq!(
            fs::read_to_string(out.path().join("log_extracted.txt")).unwrap(),
            "1\n"
        );
    }

    #[test]
    fn test_output_dir_check_leaves_no_files() {
        let out = tempdir().unwrap();
        ensure_output_dir(out.path()).unwrap();
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_readonly_output_dir_is_configuration_error() {
        let dir = tempdir().unwrap();
        let a = write(dir.path(), "a.txt", "text");
        let out = dir.path().join("locked");
        fs::create_dir(&out).unwrap();

        let mut perms = fs::metadata(&out).unwrap().permissions();
        perms.set_readonly(true);
        fs::set_permissions(&out, perms.clone()).unwrap();

        let job = BatchJob::find_replace(vec![a], &out, "t", "T");
        let err = BatchCoordinator::new(1).run(&job, None).unwrap_err();

        perms.set_readonly(false);
        fs::set_permissions(&out, perms).unwrap();

        assert!(matches!(err, TextflowError::OutputNotWritable { .. }));
        assert!(err.is_configuration());
    }
}
