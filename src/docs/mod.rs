//! 数据集文档索引页
//!
//! 索引页是一个 reStructuredText 页面：标题、指向 `DataSet` 基类的 `autoclass` 指令、
//! 一句"包含 N 个不同数据集"的说明，以及列出各数据集子页面的 `toctree`。
//! 这里负责解析这样的页面、检查说明与目录是否一致，并按注册表生成页面。

mod error;

#[cfg(test)]
mod tests;

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::data::DataSetKind;
pub use error::DocError;

/// 生成页面时 autoclass 指向的基类
pub const BASE_CLASS: &str = "optbench.data.DataSet";

const NUMBER_WORDS: [&str; 21] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
    "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen", "nineteen",
    "twenty",
];

static COUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bincludes\s+([a-z]+|\d+)\s+different\s+data\s*sets\b").unwrap()
});
static AUTOCLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\.\.\s+autoclass::\s+(\S+)").unwrap());
static TOCTREE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\.\.\s+toctree::").unwrap());

/// 解析后的索引页
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPage {
    pub title: String,
    pub base_class: Option<String>,
    /// 正文声明的数据集数量
    pub stated_count: Option<usize>,
    /// toctree 条目，保持原样（如 `datasets/mnist`）
    pub entries: Vec<String>,
}

impl IndexPage {
    /// 条目的最后一段路径，即数据集名
    pub fn entry_names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|e| e.rsplit('/').next().unwrap_or(e.as_str()))
            .collect()
    }

    /// 声明的数量必须等于目录条目数
    pub fn check_consistency(&self) -> Result<(), DocError> {
        let stated = self.stated_count.ok_or(DocError::MissingCount)?;
        let listed = self.entries.len();
        if stated != listed {
            return Err(DocError::CountMismatch { stated, listed });
        }
        Ok(())
    }

    /// 每个条目都必须是已注册的数据集
    pub fn check_against_registry(&self) -> Result<(), DocError> {
        match self
            .entry_names()
            .into_iter()
            .find(|name| name.parse::<DataSetKind>().is_err())
        {
            Some(name) => Err(DocError::UnknownEntry(name.to_string())),
            None => Ok(()),
        }
    }

    /// 已注册、但页面没有列出的数据集
    pub fn missing_from_registry(&self) -> Vec<&'static str> {
        let listed = self.entry_names();
        DataSetKind::ALL
            .iter()
            .map(|kind| kind.name())
            .filter(|name| !listed.contains(name))
            .collect()
    }
}

/// 解析索引页文本
pub fn parse_index_page(text: &str) -> Result<IndexPage, DocError> {
    let lines = text.lines().map(str::trim_end).collect::<Vec<_>>();

    let title = lines
        .windows(2)
        .find(|w| !w[0].trim().is_empty() && !is_adornment(w[0]) && is_adornment(w[1]))
        .map(|w| w[0].trim().to_string())
        .unwrap_or_default();

    let base_class = lines
        .iter()
        .find_map(|line| AUTOCLASS_RE.captures(line.trim_start()))
        .map(|caps| caps[1].to_string());

    // 说明句可能跨行，合并后再匹配
    let stated_count = COUNT_RE
        .captures(&lines.join(" "))
        .and_then(|caps| parse_number(&caps[1]));

    let start = lines
        .iter()
        .position(|line| TOCTREE_RE.is_match(line.trim_start()))
        .ok_or(DocError::MissingToctree)?;
    let mut entries = Vec::new();
    for line in &lines[start + 1..] {
        if line.trim().is_empty() {
            continue;
        }
        if !line.starts_with([' ', '\t']) {
            break;
        }
        let item = line.trim();
        if item.starts_with(':') {
            continue;
        }
        entries.push(item.to_string());
    }

    debug!(title = %title, entries = entries.len(), ?stated_count, "已解析文档索引页");
    Ok(IndexPage {
        title,
        base_class,
        stated_count,
        entries,
    })
}

/// 标题下划线 / 上划线：由同一个标点字符重复构成
fn is_adornment(line: &str) -> bool {
    let line = line.trim();
    let mut chars = line.chars();
    match chars.next() {
        Some(first) if first.is_ascii_punctuation() => line.len() >= 2 && chars.all(|c| c == first),
        _ => false,
    }
}

/// 英文数字词（zero..twenty）或阿拉伯数字
pub fn parse_number(word: &str) -> Option<usize> {
    let word = word.trim().to_ascii_lowercase();
    word.parse()
        .ok()
        .or_else(|| NUMBER_WORDS.iter().position(|w| *w == word))
}

/// 0..=20 写成英文单词，更大的数写成数字
pub fn number_word(n: usize) -> String {
    NUMBER_WORDS
        .get(n)
        .map(|w| w.to_string())
        .unwrap_or_else(|| n.to_string())
}

/// 为给定的数据集生成索引页
pub fn render_index_page(kinds: &[DataSetKind]) -> String {
    let title = "Data Sets";
    let rule = "=".repeat(title.len());
    let mut page = format!("{rule}\n{title}\n{rule}\n\n");
    page.push_str(&format!(
        "Currently optbench includes {} different data sets. Each data set inherits \
         from the same base class with the following signature.\n\n",
        number_word(kinds.len())
    ));
    page.push_str(&format!(".. autoclass:: {BASE_CLASS}\n    :members:\n\n"));
    page.push_str(".. toctree::\n  :maxdepth: 1\n  :caption: Data Sets\n\n");
    for kind in kinds {
        page.push_str(&format!("  datasets/{}\n", kind.name()));
    }
    page
}
