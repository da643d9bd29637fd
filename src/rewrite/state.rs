//! CREATE TABLE 块状态

use std::fmt;

/// 逐行扫描时的块状态
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BlockState {
    /// 不在任何 CREATE TABLE 块内
    #[default]
    Outside,
    /// 在块内；`table` 为反引号内的表名，起始行不符合模式时为 `None`
    Inside {
        table: Option<String>,
        opened_at: usize,
    },
}

impl BlockState {
    pub fn open(table: Option<String>, opened_at: usize) -> Self {
        BlockState::Inside { table, opened_at }
    }

    pub fn is_inside(&self) -> bool {
        matches!(self, BlockState::Inside { .. })
    }

    pub fn table(&self) -> Option<&str> {
        match self {
            BlockState::Inside { table, .. } => table.as_deref(),
            BlockState::Outside => None,
        }
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockState::Outside => write!(f, "Outside"),
            BlockState::Inside { table, opened_at } => write!(
                f,
                "Inside({} @ {})",
                table.as_deref().unwrap_or("<unnamed>"),
                opened_at
            ),
        }
    }
}

/// 输入结束时仍未闭合的块
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenBlock {
    pub table: Option<String>,
    pub line: usize,
}

/// 一次改写的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteSummary {
    pub lines: usize,
    pub blocks_opened: usize,
    pub blocks_closed: usize,
    pub rewritten: usize,
    pub unterminated: Option<OpenBlock>,
}

impl fmt::Display for RewriteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lines={} opened={} closed={} rewritten={}",
            self.lines, self.blocks_opened, self.blocks_closed, self.rewritten
        )?;
        if let Some(block) = &self.unterminated {
            write!(
                f,
                " unterminated={}@{}",
                block.table.as_deref().unwrap_or("<unnamed>"),
                block.line
            )?;
        }
        Ok(())
    }
}
