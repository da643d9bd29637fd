//! SQL 改写
//!
//! 逐行扫描 SQL 文本，识别 `CREATE TABLE` 块的起止。若块对应的表被标记，
//! 将闭合行末尾的 `);` 改写为 `) WITHOUT ROWID;`。其余行原样输出。

pub mod state;

pub use state::{BlockState, OpenBlock, RewriteSummary};

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::annotation::AnnotationSet;
use crate::core::error::{RewriteError, RewriteResult};

pub const CREATE_TABLE_PREFIX: &str = "CREATE TABLE";
pub const BLOCK_TERMINATOR: &str = ");";
pub const WITHOUT_ROWID_TERMINATOR: &str = ") WITHOUT ROWID;";

static TABLE_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^CREATE TABLE `([^`]+)`").expect("table name pattern is valid"));

/// 从 `CREATE TABLE` 行中提取反引号内的表名
pub fn extract_table_name(line: &str) -> Option<&str> {
    TABLE_NAME_PATTERN
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// 逐行驱动的改写状态机
///
/// 注释集合只借用不复制，改写过程中不可变。
#[derive(Debug)]
pub struct SqlRewriter<'a> {
    annotations: &'a AnnotationSet,
    state: BlockState,
    summary: RewriteSummary,
}

impl<'a> SqlRewriter<'a> {
    pub fn new(annotations: &'a AnnotationSet) -> Self {
        Self {
            annotations,
            state: BlockState::Outside,
            summary: RewriteSummary::default(),
        }
    }

    pub fn state(&self) -> &BlockState {
        &self.state
    }

    /// 处理一行（含行终止符），返回应输出的内容
    ///
    /// 被改写的闭合行不保留原有的行终止符。
    pub fn feed_line<'l>(&mut self, line: &'l str) -> Cow<'l, str> {
        self.summary.lines += 1;
        let line_no = self.summary.lines;

        let opens_block = line.starts_with(CREATE_TABLE_PREFIX);
        if opens_block {
            if let BlockState::Inside { table, opened_at } = &self.state {
                log::warn!(
                    "第 {} 行开始的 CREATE TABLE 块 ({}) 未闭合，在第 {} 行被新块取代",
                    opened_at,
                    table.as_deref().unwrap_or("<unnamed>"),
                    line_no
                );
            }
            let table = extract_table_name(line).map(str::to_string);
            log::debug!("第 {} 行进入块: {:?}", line_no, table);
            self.state = BlockState::open(table, line_no);
            self.summary.blocks_opened += 1;
        }

        if !self.state.is_inside() {
            return Cow::Borrowed(line);
        }

        let trimmed = line.trim();
        // 已改写过的闭合行：改写时丢弃了行终止符，后一行可能已拼接在其后
        let already_rewritten = trimmed.starts_with(WITHOUT_ROWID_TERMINATOR)
            || (opens_block && trimmed.contains(WITHOUT_ROWID_TERMINATOR));
        if already_rewritten {
            self.close(line_no);
            return Cow::Borrowed(line);
        }
        if !trimmed.ends_with(BLOCK_TERMINATOR) {
            return Cow::Borrowed(line);
        }

        let flagged = self
            .state
            .table()
            .is_some_and(|table| self.annotations.contains(table));
        self.close(line_no);

        if !flagged {
            return Cow::Borrowed(line);
        }

        self.summary.rewritten += 1;
        let head = &trimmed[..trimmed.len() - BLOCK_TERMINATOR.len()];
        Cow::Owned(format!("{}{}", head, WITHOUT_ROWID_TERMINATOR))
    }

    fn close(&mut self, line_no: usize) {
        if let BlockState::Inside { table, .. } = std::mem::take(&mut self.state) {
            log::debug!("第 {} 行闭合块: {:?}", line_no, table);
            self.summary.blocks_closed += 1;
        }
    }

    /// 结束扫描，记录未闭合的块
    pub fn finish(mut self) -> RewriteSummary {
        if let BlockState::Inside { table, opened_at } = std::mem::take(&mut self.state) {
            log::warn!(
                "输入结束时 CREATE TABLE 块 ({}) 仍未闭合，起始于第 {} 行",
                table.as_deref().unwrap_or("<unnamed>"),
                opened_at
            );
            self.summary.unterminated = Some(OpenBlock {
                table,
                line: opened_at,
            });
        }
        self.summary
    }

    /// 改写整个输入流并写出
    pub fn rewrite<R: BufRead, W: Write>(
        self,
        reader: R,
        writer: &mut W,
    ) -> RewriteResult<RewriteSummary> {
        self.rewrite_source(reader, writer, Path::new("<input>"))
    }

    fn rewrite_source<R: BufRead, W: Write>(
        mut self,
        mut reader: R,
        writer: &mut W,
        source: &Path,
    ) -> RewriteResult<RewriteSummary> {
        let mut buf = String::new();
        loop {
            buf.clear();
            let n = reader
                .read_line(&mut buf)
                .map_err(|e| RewriteError::io(source, e))?;
            if n == 0 {
                break;
            }
            let out = self.feed_line(&buf);
            writer
                .write_all(out.as_bytes())
                .map_err(RewriteError::stdout)?;
        }
        writer.flush().map_err(RewriteError::stdout)?;

        let summary = self.finish();
        log::info!("{} 改写完成: {}", source.display(), summary);
        Ok(summary)
    }
}

impl RewriteSummary {
    /// 严格模式下检查是否存在未闭合的块
    pub fn ensure_terminated(&self) -> RewriteResult<()> {
        match &self.unterminated {
            Some(block) => Err(RewriteError::UnterminatedBlock {
                table: block
                    .table
                    .clone()
                    .unwrap_or_else(|| "<unnamed>".to_string()),
                line: block.line,
            }),
            None => Ok(()),
        }
    }
}

/// 打开 SQL 文件，改写后写入 `writer`
pub fn rewrite_file<P: AsRef<Path>, W: Write>(
    path: P,
    annotations: &AnnotationSet,
    writer: &mut W,
) -> RewriteResult<RewriteSummary> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| RewriteError::io(path, e))?;
    SqlRewriter::new(annotations).rewrite_source(BufReader::new(file), writer, path)
}

/// 对内存中的文本做改写，主要用于测试和嵌入调用
pub fn rewrite_str(input: &str, annotations: &AnnotationSet) -> (String, RewriteSummary) {
    let mut rewriter = SqlRewriter::new(annotations);
    let mut output = String::with_capacity(input.len());
    for line in input.split_inclusive('\n') {
        output.push_str(&rewriter.feed_line(line));
    }
    (output, rewriter.finish())
}
