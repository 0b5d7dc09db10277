//! # 批处理命令实现
//!
//! `replace`, `extract`, `merge`, `split` 四个子命令。
//!
//! ## 功能
//! - 收集输入文件并构建作业
//! - 在后台线程运行协调器，主线程从通道取出进度快照驱动进度条
//! - 打印汇总结果与失败详情
//!
//! ## 依赖关系
//! - 使用 `cli/batch.rs` 定义的参数
//! - 使用 `batch/` 执行作业
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::batch::{
    collect_inputs, display_name, BatchCoordinator, BatchJob, BatchResult, ChannelObserver,
    ProgressObserver,
};
use crate::cli::batch::{ExtractArgs, InputArgs, MergeArgs, ReplaceArgs, SplitArgs};
use crate::error::{Result, TextflowError};
use crate::utils::{output, progress};

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

/// 失败列表最多显示的条数
const MAX_FAILURES_SHOWN: usize = 10;

/// 输出文件超过此数量时只打印计数
const MAX_OUTPUTS_SHOWN: usize = 20;

/// 执行 replace 命令
pub fn execute_replace(args: ReplaceArgs, quiet: bool) -> Result<()> {
    output::print_header("Regex Find and Replace");

    let Some(files) = gather(&args.input)? else {
        return Ok(());
    };
    prepare_output_dir(&args.output, args.create_output)?;

    let job = BatchJob::find_replace(files, &args.output, &args.pattern, &args.replacement);
    let result = run_with_progress(&job, args.jobs, quiet)?;
    report(&result, &args.output);
    Ok(())
}

/// 执行 extract 命令
pub fn execute_extract(args: ExtractArgs, quiet: bool) -> Result<()> {
    output::print_header("Regex Extract");

    let Some(files) = gather(&args.input)? else {
        return Ok(());
    };
    prepare_output_dir(&args.output, args.create_output)?;

    let job = BatchJob::extract(files, &args.output, &args.pattern);
    let result = run_with_progress(&job, args.jobs, quiet)?;
    report(&result, &args.output);
    Ok(())
}

/// 执行 merge 命令
pub fn execute_merge(args: MergeArgs, quiet: bool) -> Result<()> {
    output::print_header("File Merge");

    let Some(files) = gather(&args.input)? else {
        return Ok(());
    };

    // 输出文件本身不能作为输入
    let files: Vec<PathBuf> = files
        .into_iter()
        .filter(|f| !same_file(f, &args.output))
        .collect();

    let job = BatchJob::merge(files, &args.output, args.separators);
    let result = run_with_progress(&job, 1, quiet)?;
    report(&result, &args.output);
    Ok(())
}

/// 执行 split 命令
pub fn execute_split(args: SplitArgs, quiet: bool) -> Result<()> {
    output::print_header("File Split");

    if !args.input.is_file() {
        return Err(TextflowError::FileNotFound {
            path: args.input.display().to_string(),
        });
    }
    prepare_output_dir(&args.output, args.create_output)?;

    output::print_info(&format!(
        "Splitting '{}' into parts of {} lines",
        args.input.display(),
        args.lines
    ));

    let job = BatchJob::split(&args.input, &args.output, args.lines);
    let result = run_with_progress(&job, 1, quiet)?;
    report(&result, &args.output);
    Ok(())
}

/// 收集输入文件，没有匹配文件时打印警告并返回 `None`
fn gather(input: &InputArgs) -> Result<Option<Vec<PathBuf>>> {
    let files = collect_inputs(&input.inputs, &input.glob, input.recursive)?;

    if files.is_empty() {
        output::print_warning(&format!("No files matched '{}'", input.glob));
        return Ok(None);
    }

    output::print_info(&format!("Found {} input file(s)", files.len()));
    Ok(Some(files))
}

fn prepare_output_dir(dir: &Path, create: bool) -> Result<()> {
    if create {
        fs::create_dir_all(dir).map_err(|e| TextflowError::FileWriteError {
            path: dir.display().to_string(),
            source: e,
        })?;
    }
    Ok(())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// 在后台线程运行作业，主线程消费进度快照
fn run_with_progress(job: &BatchJob, jobs: usize, quiet: bool) -> Result<BatchResult> {
    let coordinator = BatchCoordinator::new(jobs);
    let pb = if quiet {
        progress::create_hidden_bar()
    } else {
        progress::create_progress_bar(job.inputs.len() as u64, job.kind.label())
    };

    let (observer, rx) = ChannelObserver::channel();
    let coordinator = &coordinator;

    let joined = thread::scope(|s| {
        let handle = s.spawn(move || {
            let observer: &dyn ProgressObserver = &observer;
            coordinator.run(job, Some(observer))
        });

        let mut last_errors = 0;
        for snapshot in rx.iter() {
            progress::apply_snapshot(&pb, &snapshot);
            if snapshot.errors > last_errors {
                last_errors = snapshot.errors;
                pb.suspend(|| output::print_warning(&snapshot.message));
            }
        }

        handle.join()
    });

    pb.finish_and_clear();

    joined.map_err(|_| TextflowError::Other("Batch coordinator panicked".to_string()))?
}

/// 打印汇总结果
fn report(result: &BatchResult, target: &Path) {
    output::print_separator();

    if result.errors == 0 {
        output::print_success(&result.to_string());
    } else {
        output::print_warning(&result.to_string());
    }

    if result.outputs.len() <= MAX_OUTPUTS_SHOWN {
        for path in &result.outputs {
            output::print_output(&result.operation, &display_name(path));
        }
    }

    if !result.failures.is_empty() {
        output::print_warning("Failed files:");
        for (path, err) in result.failures.iter().take(MAX_FAILURES_SHOWN) {
            output::print_error(&format!("  {}: {}", path, err));
        }
        if result.failures.len() > MAX_FAILURES_SHOWN {
            output::print_warning(&format!(
                "  ... and {} more",
                result.failures.len() - MAX_FAILURES_SHOWN
            ));
        }
    }

    output::print_done(&format!(
        "{} file(s) succeeded, {} output(s) written to '{}'",
        result.success_count(),
        result.outputs.len(),
        target.display()
    ));
}
