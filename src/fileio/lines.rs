//! # 行读取器
//!
//! 按行读取 UTF-8 文本，识别 `\n`、`\r\n` 和单独的 `\r` 三种行结束符。
//! 返回的行不含行结束符；末尾的行结束符不会产生额外的空行。
//!
//! ## 依赖关系
//! - 被 `fileio/mod.rs` 使用

use std::io::{self, BufRead};

/// 行迭代器
pub struct LineReader<R> {
    reader: R,
    /// 上一行以 `\r` 结束，下一个 `\n` 属于同一个行结束符
    skip_lf: bool,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            skip_lf: false,
        }
    }

    /// 读取下一行，到达文件末尾返回 `None`
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut buf: Vec<u8> = Vec::new();
        let mut consumed_any = false;

        loop {
            let (used, done) = {
                let available = match self.reader.fill_buf() {
                    Ok(bytes) => bytes,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                };

                if available.is_empty() {
                    if !consumed_any {
                        return Ok(None);
                    }
                    break;
                }

                if self.skip_lf {
                    self.skip_lf = false;
                    if available[0] == b'\n' {
                        (1, false)
                    } else {
                        (0, false)
                    }
                } else {
                    match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                        Some(i) => {
                            buf.extend_from_slice(&available[..i]);
                            self.skip_lf = available[i] == b'\r';
                            consumed_any = true;
                            (i + 1, true)
                        }
                        None => {
                            buf.extend_from_slice(available);
                            consumed_any = true;
                            (available.len(), false)
                        }
                    }
                }
            };

            self.reader.consume(used);
            if done {
                break;
            }
        }

        String::from_utf8(buf)
            .map(Some)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}
