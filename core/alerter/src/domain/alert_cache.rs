//! 既出アラートの集合（挿入順を保つ）とファイル表現
//!
//! 1 行 1 エントリ。エントリ内の改行は `\` `n` の 2 文字に置き換えて保存する。
//! 照合はファイルに書く形（エスケープ後）で行う。元の文字列に `\n` の 2 文字や
//! 末尾の `\r` が含まれていても、読み戻した行と一致する。

use std::collections::HashSet;

/// 改行を `\n`（2 文字）へ
pub fn escape_entry(entry: &str) -> String {
    entry.replace('\n', "\\n")
}

/// `\n`（2 文字）を改行へ
#[cfg_attr(not(test), allow(dead_code))] // テストで使用
pub fn unescape_entry(line: &str) -> String {
    line.replace("\\n", "\n")
}

/// 既出アラートのキャッシュ
///
/// 集合として振る舞い、同じ文字列は二度入らない。削除・更新はしない。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertCache {
    /// ファイルの行（エスケープ済み）
    lines: Vec<String>,
    index: HashSet<String>,
}

impl AlertCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// キャッシュファイルの内容から復元する。`\n` でだけ区切り、空行は無視。
    pub fn parse(contents: &str) -> Self {
        let mut cache = Self::new();
        for line in contents.split('\n').filter(|line| !line.is_empty()) {
            cache.insert_line(line.to_string());
        }
        cache
    }

    /// ファイルへ書く内容（1 行 1 エントリ、末尾改行あり）
    pub fn render(&self) -> String {
        self.lines.iter().map(|line| format!("{}\n", line)).collect()
    }

    pub fn contains(&self, alert: &str) -> bool {
        self.index.contains(&escape_entry(alert))
    }

    /// ファイルの行（エスケープ済み）
    #[cfg_attr(not(test), allow(dead_code))] // テストで使用
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// 和集合をとり、実際に増えた件数を返す
    pub fn merge<I, S>(&mut self, alerts: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let before = self.lines.len();
        for alert in alerts {
            self.insert_line(escape_entry(alert.as_ref()));
        }
        self.lines.len() - before
    }

    fn insert_line(&mut self, line: String) {
        if self.index.insert(line.clone()) {
            self.lines.push(line);
        }
    }
}
