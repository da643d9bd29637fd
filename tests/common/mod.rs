//! 集成测试共享工具模块
//!
//! 在临时目录中写入注释文件和 SQL 文件，测试结束后自动清理

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// 一组测试输入文件
pub struct Fixture {
    dir: TempDir,
    pub schema: PathBuf,
    pub sql: PathBuf,
}

impl Fixture {
    pub fn new(schema: &str, sql: &str) -> anyhow::Result<Self> {
        let dir = TempDir::new()?;
        let schema_path = dir.path().join("schema.ts");
        let sql_path = dir.path().join("0000_init.sql");
        fs::write(&schema_path, schema)?;
        fs::write(&sql_path, sql)?;
        Ok(Self {
            dir,
            schema: schema_path,
            sql: sql_path,
        })
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, name: &str, content: &str) -> anyhow::Result<PathBuf> {
        let path = self.dir.path().join(name);
        fs::write(&path, content)?;
        Ok(path)
    }
}

/// 运行编译好的命令行程序
pub fn run_cli<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    Command::new(env!("CARGO_BIN_EXE_without-rowid"))
        .args(args)
        .output()
        .expect("failed to spawn without-rowid")
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("stdout is UTF-8")
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// drizzle 风格的 schema 片段
pub const SCHEMA_TS: &str = "\
import { sqliteTable, text, integer } from 'drizzle-orm/sqlite-core';

// WITHOUT-ROWID: kv_store
export const kv_store = sqliteTable('kv_store', {
\tkind: text('kind').notNull(),
\tdata: text('data').notNull(),
});

export const pass_backoff = sqliteTable('pass_backoff', {
\tid: integer('id').primaryKey(),
});

// WITHOUT-ROWID: youtube_video
export const youtube_video = sqliteTable('youtube_video', {
\tid: text('id').primaryKey(),
});
";

/// 对应的 drizzle-kit 生成 SQL
pub const INIT_SQL: &str = "\
CREATE TABLE `kv_store` (
\t`kind` text NOT NULL,
\t`data` text NOT NULL,
\tPRIMARY KEY(`kind`, `data`)
);
--> statement-breakpoint
CREATE TABLE `pass_backoff` (
\t`id` integer PRIMARY KEY NOT NULL
);
--> statement-breakpoint
CREATE TABLE `youtube_video` (`id` text PRIMARY KEY NOT NULL);
--> statement-breakpoint
CREATE INDEX `kv_store_kind` ON `kv_store` (`kind`);
";
