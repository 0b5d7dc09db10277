//! # 批处理操作
//!
//! 四种无状态的单文件变换策略：
//! - `FindReplace`: 逐行替换，输出 `<base>_processed.txt`
//! - `Extract`: 提取所有匹配，每行一个，输出 `<base>_extracted.txt`
//! - `Split`: 按行数拆分，输出 `<base>_part<N>.txt`
//! - `Merge`: 按提交顺序顺序追加到同一个输出文件
//!
//! ## 依赖关系
//! - 被 `batch/coordinator.rs` 调用
//! - 使用 `fileio/` 读写文件
//! - 使用 `pattern/` 编译和执行模式

use crate::batch::job::{display_name, BatchJob, FileTask, OperationKind};
use crate::batch::progress::ProgressReporter;
use crate::error::{Result, TextflowError};
use crate::fileio::{self, TextWriter};
use crate::pattern::Pattern;

use std::path::{Path, PathBuf};

pub const PROCESSED_SUFFIX: &str = "_processed.txt";
pub const EXTRACTED_SUFFIX: &str = "_extracted.txt";

/// 合并分隔线宽度
const SEPARATOR_WIDTH: usize = 50;

/// 单文件操作
pub trait FileOperation: Sync {
    fn kind(&self) -> OperationKind;

    /// 处理一个文件，返回写出的文件列表
    fn process(&self, task: &FileTask, reporter: &ProgressReporter<'_>) -> Result<Vec<PathBuf>>;

    /// 派发前可确定的输出路径，用于检测多个输入写同一个文件
    fn planned_output(&self, _task: &FileTask) -> Option<PathBuf> {
        None
    }
}

/// 取文件名最后一个 `.` 之前的部分
pub fn base_name(path: &Path) -> Result<String> {
    let name = display_name(path);
    match name.rfind('.') {
        Some(idx) => Ok(name[..idx].to_string()),
        None => Err(TextflowError::MissingExtension {
            path: path.display().to_string(),
        }),
    }
}

/// 编译作业所需的模式
fn required_pattern(job: &BatchJob) -> Result<Pattern> {
    match job.params.pattern.as_deref() {
        Some(p) if !p.is_empty() => Pattern::compile(p),
        _ => Err(TextflowError::EmptyPattern {
            operation: job.kind.label().to_string(),
        }),
    }
}

// ─────────────────────────────────────────────────────────────
// 查找替换
// ─────────────────────────────────────────────────────────────

pub struct FindReplace {
    pattern: Pattern,
    replacement: String,
    output_dir: PathBuf,
}

impl FindReplace {
    pub fn from_job(job: &BatchJob) -> Result<Self> {
        Ok(Self {
            pattern: required_pattern(job)?,
            replacement: job.params.replacement.clone().unwrap_or_default(),
            output_dir: job.output.clone(),
        })
    }

    fn output_path(&self, input: &Path) -> Result<PathBuf> {
        let base = base_name(input)?;
        Ok(self.output_dir.join(format!("{}{}", base, PROCESSED_SUFFIX)))
    }
}

impl FileOperation for FindReplace {
    fn kind(&self) -> OperationKind {
        OperationKind::FindReplace
    }

    fn process(&self, task: &FileTask, _reporter: &ProgressReporter<'_>) -> Result<Vec<PathBuf>> {
        let output = self.output_path(&task.path)?;

        fileio::process_by_line(&task.path, &output, |line| {
            self.pattern.replace_all(line, &self.replacement)
        })?;

        Ok(vec![output])
    }

    fn planned_output(&self, task: &FileTask) -> Option<PathBuf> {
        self.output_path(&task.path).ok()
    }
}

// ─────────────────────────────────────────────────────────────
// 提取
// ─────────────────────────────────────────────────────────────

pub struct Extract {
    pattern: Pattern,
    output_dir: PathBuf,
}

impl Extract {
    pub fn from_job(job: &BatchJob) -> Result<Self> {
        Ok(Self {
            pattern: required_pattern(job)?,
            output_dir: job.output.clone(),
        })
    }

    fn output_path(&self, input: &Path) -> Result<PathBuf> {
        let base = base_name(input)?;
        Ok(self.output_dir.join(format!("{}{}", base, EXTRACTED_SUFFIX)))
    }
}

impl FileOperation for Extract {
    fn kind(&self) -> OperationKind {
        OperationKind::Extract
    }

    fn process(&self, task: &FileTask, _reporter: &ProgressReporter<'_>) -> Result<Vec<PathBuf>> {
        let output = self.output_path(&task.path)?;

        let content = fileio::read_to_string(&task.path)?;
        fileio::write_lines(&output, self.pattern.find_texts(&content))?;

        Ok(vec![output])
    }

    fn planned_output(&self, task: &FileTask) -> Option<PathBuf> {
        self.output_path(&task.path).ok()
    }
}

// ─────────────────────────────────────────────────────────────
// 拆分
// ─────────────────────────────────────────────────────────────

pub struct Split {
    lines_per_chunk: usize,
    output_dir: PathBuf,
}

impl Split {
    pub fn from_job(job: &BatchJob) -> Result<Self> {
        let lines_per_chunk = match job.params.lines_per_chunk {
            Some(n) if n > 0 => n,
            _ => {
                return Err(TextflowError::InvalidArgument(
                    "lines per chunk must be at least 1".to_string(),
                ))
            }
        };
        if job.inputs.len() > 1 {
            return Err(TextflowError::InvalidArgument(format!(
                "split takes exactly one input file, got {}",
                job.inputs.len()
            )));
        }
        Ok(Self {
            lines_per_chunk,
            output_dir: job.output.clone(),
        })
    }

    /// 第 `part` 个分片的路径（从 1 开始）
    pub fn part_path(&self, base: &str, part: usize) -> PathBuf {
        self.output_dir.join(format!("{}_part{}.txt", base, part))
    }

    fn flush_part(
        &self,
        base: &str,
        buffer: &mut Vec<String>,
        outputs: &mut Vec<PathBuf>,
        reporter: &ProgressReporter<'_>,
    ) -> Result<()> {
        let part = outputs.len() + 1;
        let path = self.part_path(base, part);
        fileio::write_lines(&path, buffer.iter())?;
        buffer.clear();
        outputs.push(path);
        reporter.note(format!("Created part file {}", part));
        Ok(())
    }
}

impl FileOperation for Split {
    fn kind(&self) -> OperationKind {
        OperationKind::Split
    }

    fn process(&self, task: &FileTask, reporter: &ProgressReporter<'_>) -> Result<Vec<PathBuf>> {
        let base = base_name(&task.path)?;
        let mut buffer = Vec::with_capacity(self.lines_per_chunk.min(4096));
        let mut outputs = Vec::new();

        for line in fileio::open_lines(&task.path)? {
            let line = line.map_err(|e| TextflowError::FileReadError {
                path: task.path.display().to_string(),
                source: e,
            })?;
            buffer.push(line);
            if buffer.len() >= self.lines_per_chunk {
                self.flush_part(&base, &mut buffer, &mut outputs, reporter)?;
            }
        }

        if !buffer.is_empty() {
            self.flush_part(&base, &mut buffer, &mut outputs, reporter)?;
        }

        Ok(outputs)
    }
}

// ─────────────────────────────────────────────────────────────
// 合并
// ─────────────────────────────────────────────────────────────

/// 顺序合并器，独占唯一的输出流
pub struct Merger {
    writer: TextWriter,
    add_separators: bool,
    merged: usize,
}

impl Merger {
    /// 创建输出文件；失败属于作业级错误
    pub fn create(output: &Path, add_separators: bool) -> Result<Self> {
        let writer = TextWriter::create(output).map_err(|e| match e {
            TextflowError::FileWriteError { path, source } => TextflowError::OutputNotWritable {
                path,
                source: Some(source),
            },
            other => other,
        })?;
        Ok(Self {
            writer,
            add_separators,
            merged: 0,
        })
    }

    /// 分隔块：空行、分隔线、文件名、分隔线、空行
    pub fn separator(file_name: &str) -> String {
        let rule = "=".repeat(SEPARATOR_WIDTH);
        format!("\n\n{}\nFILE: {}\n{}\n\n", rule, file_name, rule)
    }

    /// 追加一个输入文件
    ///
    /// 先完整读取输入，读取失败时不写入任何内容（包括分隔块）。
    pub fn append(&mut self, task: &FileTask) -> Result<()> {
        let lines = fileio::read_lines(&task.path)?;

        if self.add_separators && self.merged > 0 {
            self.writer.write_str(&Self::separator(&task.file_name()))?;
        }
        for line in &lines {
            self.writer.write_line(line)?;
        }
        self.writer.flush()?;

        self.merged += 1;
        Ok(())
    }

    /// 已成功合并的文件数
    pub fn merged(&self) -> usize {
        self.merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn task(path: PathBuf) -> FileTask {
        FileTask { index: 0, path }
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name(Path::new("dir/a.txt")).unwrap(), "a");
        assert_eq!(base_name(Path::new("archive.tar.gz")).unwrap(), "archive.tar");
        assert!(matches!(
            base_name(Path::new("README")),
            Err(TextflowError::MissingExtension { .. })
        ));
    }

    #[test]
    fn test_required_pattern() {
        let job = BatchJob::extract(vec![], "out", "");
        assert!(matches!(
            Extract::from_job(&job),
            Err(TextflowError::EmptyPattern { .. })
        ));

        let job = BatchJob::find_replace(vec![], "out", "[", "x");
        assert!(matches!(
            FindReplace::from_job(&job),
            Err(TextflowError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_find_replace_unit() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("a.txt");
        fs::write(&input, "foo bar foo\nno match\r\nfoo").unwrap();

        let job = BatchJob::find_replace(vec![input.clone()], dir.path(), "foo", "baz");
        let op = FindReplace::from_job(&job).unwrap();
        let reporter = ProgressReporter::new(1, None);

        let outputs = op.process(&task(input), &reporter).unwrap();
        assert_eq!(outputs, vec![dir.path().join("a_processed.txt")]);
        assert_eq!(
            fs::read_to_string(&outputs[0]).unwrap(),
            "baz bar baz\nno match\nbaz\n"
        );
    }

    #[test]
    fn test_extract_unit() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("calls.log");
        fs::write(&input, "call 123-456-7890 now\nor 555-000-1111\n").unwrap();

        let job = BatchJob::extract(vec![input.clone()], dir.path(), r"\d{3}-\d{3}-\d{4}");
        let op = Extract::from_job(&job).unwrap();
        let outputs = op.process(&task(input), &ProgressReporter::new(1, None)).unwrap();

        assert_eq!(outputs, vec![dir.path().join("calls_extracted.txt")]);
        assert_eq!(
            fs::read_to_string(&outputs[0]).unwrap(),
            "123-456-7890\n555-000-1111\n"
        );
    }

    #[test]
    fn test_split_unit_counts_parts() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("big.txt");
        let content: String = (1..=7).map(|i| format!("line {}\n", i)).collect();
        fs::write(&input, content).unwrap();

        let job = BatchJob::split(input.clone(), dir.path(), 3);
        let op = Split::from_job(&job).unwrap();
        let outputs = op.process(&task(input), &ProgressReporter::new(1, None)).unwrap();

        assert_eq!(outputs.len(), 3);
        assert_eq!(outputs[2], dir.path().join("big_part3.txt"));
        assert_eq!(fs::read_to_string(&outputs[2]).unwrap(), "line 7\n");
    }

    #[test]
    fn test_split_empty_input_has_no_parts() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("empty.txt");
        fs::write(&input, "").unwrap();

        let job = BatchJob::split(input.clone(), dir.path(), 10);
        let op = Split::from_job(&job).unwrap();
        let outputs = op.process(&task(input), &ProgressReporter::new(1, None)).unwrap();
        assert!(outputs.is_empty());
    }

    #[test]
    fn test_split_rejects_bad_parameters() {
        let job = BatchJob::split("a.txt", "out", 0);
        assert!(matches!(
            Split::from_job(&job),
            Err(TextflowError::InvalidArgument(_))
        ));

        let mut job = BatchJob::split("a.txt", "out", 5);
        job.inputs.push(PathBuf::from("b.txt"));
        assert!(Split::from_job(&job).is_err());
    }

    #[test]
    fn test_merger_separators() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, "alpha").unwrap();
        fs::write(&b, "beta\n").unwrap();
        let out = dir.path().join("merged.txt");

        let mut merger = Merger::create(&out, true).unwrap();
        merger.append(&task(a)).unwrap();
        assert!(merger.append(&task(dir.path().join("missing.txt"))).is_err());
        merger.append(&task(b)).unwrap();
        assert_eq!(merger.merged(), 2);
        drop(merger);

        let expected = format!("alpha\n{}beta\n", Merger::separator("b.txt"));
        assert_eq!(fs::read_to_string(&out).unwrap(), expected);
    }
}
