//! 注释读取
//!
//! 逐行扫描注释文件，收集形如 `// WITHOUT-ROWID: <table>` 的标记所引用的表名。
//! 匹配锚定在行首，标记后必须有空白和一个非空白记号。

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::error::{RewriteError, RewriteResult};

/// 默认注释标记
pub const DEFAULT_MARKER: &str = "// WITHOUT-ROWID:";

static DEFAULT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    AnnotationReader::build_pattern(DEFAULT_MARKER).expect("default marker pattern is valid")
});

/// 被标记为 WITHOUT ROWID 的表名序列
///
/// 保持文件中出现的顺序，不去重。读取完成后不再修改。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationSet {
    names: Vec<String>,
}

impl AnnotationSet {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// 区分大小写的精确匹配
    pub fn contains(&self, table: &str) -> bool {
        self.names.iter().any(|name| name == table)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl fmt::Display for AnnotationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.names)
    }
}

impl<S: Into<String>> FromIterator<S> for AnnotationSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// 注释读取器
#[derive(Debug, Clone)]
pub struct AnnotationReader {
    pattern: Regex,
}

impl Default for AnnotationReader {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationReader {
    pub fn new() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.clone(),
        }
    }

    /// 使用自定义标记，标记按字面量匹配
    pub fn with_marker(marker: &str) -> RewriteResult<Self> {
        let marker = marker.trim();
        if marker.is_empty() {
            return Err(RewriteError::Config("注释标记不能为空".to_string()));
        }
        Ok(Self {
            pattern: Self::build_pattern(marker)?,
        })
    }

    fn build_pattern(marker: &str) -> RewriteResult<Regex> {
        let source = format!(r"^{}[ \t]+(\S+)", regex::escape(marker));
        Regex::new(&source).map_err(|e| RewriteError::Config(format!("无效的注释标记: {}", e)))
    }

    /// 从单行中提取表名
    pub fn match_line<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    pub fn read_from<R: BufRead>(&self, reader: R) -> std::io::Result<AnnotationSet> {
        let mut names = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if let Some(table) = self.match_line(&line) {
                log::debug!("发现 WITHOUT ROWID 标记: {}", table);
                names.push(table.to_string());
            }
        }
        Ok(AnnotationSet { names })
    }

    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> RewriteResult<AnnotationSet> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| RewriteError::io(path, e))?;
        let set = self
            .read_from(BufReader::new(file))
            .map_err(|e| RewriteError::io(path, e))?;
        log::info!("从 {} 读取到 {} 个标记表", path.display(), set.len());
        Ok(set)
    }
}

/// 使用默认标记读取注释文件
pub fn read_annotations<P: AsRef<Path>>(path: P) -> RewriteResult<AnnotationSet> {
    AnnotationReader::new().read_file(path)
}
