//! # 文件读写适配层
//!
//! 统一的 UTF-8 文本读写，支持整文件读写和流式按行处理。
//! 写出时行结束符统一为 `\n`。
//!
//! ## 依赖关系
//! - 被 `batch/operations.rs`, `commands/` 使用
//! - 子模块: lines

pub mod lines;

pub use lines::LineReader;

use crate::error::{Result, TextflowError};

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

fn read_error(path: &Path, source: std::io::Error) -> TextflowError {
    TextflowError::FileReadError {
        path: path.display().to_string(),
        source,
    }
}

fn write_error(path: &Path, source: std::io::Error) -> TextflowError {
    TextflowError::FileWriteError {
        path: path.display().to_string(),
        source,
    }
}

/// 读取整个文件
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| read_error(path, e))
}

/// 打开文件并返回行迭代器
pub fn open_lines(path: &Path) -> Result<LineReader<BufReader<File>>> {
    let file = File::open(path).map_err(|e| read_error(path, e))?;
    Ok(LineReader::new(BufReader::new(file)))
}

/// 读取所有行
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    open_lines(path)?
        .map(|line| line.map_err(|e| read_error(path, e)))
        .collect()
}

/// 写入整个文件（覆盖）
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| write_error(path, e))
}

/// 追加文本到文件末尾（文件不存在时创建）
pub fn append_text(path: &Path, content: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| write_error(path, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| write_error(path, e))
}

/// 按行写入文件（覆盖）
pub fn write_lines<I, S>(path: &Path, lines: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut writer = TextWriter::create(path)?;
    for line in lines {
        writer.write_line(line.as_ref())?;
    }
    writer.finish()
}

/// 流式逐行处理：读一行、变换、立即写出
///
/// 返回处理的行数。
pub fn process_by_line<F>(input: &Path, output: &Path, mut transform: F) -> Result<usize>
where
    F: FnMut(&str) -> String,
{
    let reader = open_lines(input)?;
    let mut writer = TextWriter::create(output)?;
    let mut count = 0;

    for line in reader {
        let line = line.map_err(|e| read_error(input, e))?;
        writer.write_line(&transform(&line))?;
        count += 1;
    }

    writer.finish()?;
    Ok(count)
}

/// 带缓冲的文本写出器
pub struct TextWriter {
    path: String,
    inner: BufWriter<File>,
}

impl TextWriter {
    /// 创建（或截断）输出文件
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|e| write_error(path, e))?;
        Ok(Self {
            path: path.display().to_string(),
            inner: BufWriter::new(file),
        })
    }

    fn error(&self, source: std::io::Error) -> TextflowError {
        TextflowError::FileWriteError {
            path: self.path.clone(),
            source,
        }
    }

    /// 写入一行并追加 `\n`
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        self.inner
            .write_all(line.as_bytes())
            .and_then(|_| self.inner.write_all(b"\n"))
            .map_err(|e| self.error(e))
    }

    /// 原样写入文本
    pub fn write_str(&mut self, text: &str) -> Result<()> {
        self.inner
            .write_all(text.as_bytes())
            .map_err(|e| self.error(e))
    }

    /// 刷新缓冲
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush().map_err(|e| self.error(e))
    }

    /// 刷新缓冲并关闭
    pub fn finish(mut self) -> Result<()> {
        self.inner.flush().map_err(|e| self.error(e))
    }
}
