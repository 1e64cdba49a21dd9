//! Keyword Set Module
//!
//! 大文字・小文字を区別しないキーワード集合と、その照合処理を提供するモジュール。

use crate::api::MatchMode;
use crate::error::SheetScoutError;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Keyword {
    /// 入力されたままの表記（トリム済み）
    original: String,
    /// 照合用の小文字表記
    folded: String,
}

/// キーワード集合
///
/// 各キーワードは前後の空白を除去して保持します。空のキーワードは捨てられ、
/// 大文字・小文字だけが異なる重複は最初の表記を残して1つにまとめられます。
///
/// # 使用例
///
/// ```rust
/// use sheetscout::{KeywordSet, MatchMode};
///
/// let keywords = KeywordSet::parse("Product :; brand :, PRODUCT :");
/// assert_eq!(keywords.len(), 2);
/// assert_eq!(keywords.matching("Product : Widget", MatchMode::Substring), vec!["Product :"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    entries: Vec<Keyword>,
}

impl KeywordSet {
    /// キーワードの列から集合を生成
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for keyword in keywords {
            set.insert(keyword.as_ref());
        }
        set
    }

    /// `,`または`;`で区切られた文字列から集合を生成
    ///
    /// 空文字列からは空の集合が得られます。
    pub fn parse(text: &str) -> Self {
        Self::new(text.split([',', ';']))
    }

    /// キーワードを追加（空または重複の場合は無視）
    pub fn insert(&mut self, keyword: &str) -> bool {
        let original = keyword.trim();
        if original.is_empty() {
            return false;
        }
        let folded = original.to_lowercase();
        if self.entries.iter().any(|k| k.folded == folded) {
            return false;
        }
        self.entries.push(Keyword {
            original: original.to_string(),
            folded,
        });
        true
    }

    /// キーワード数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 集合が空かどうか
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// キーワード（入力表記）のイテレーター
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|k| k.original.as_str())
    }

    /// 区切り文字で連結した文字列（設定の保存用）
    pub fn join(&self, separator: &str) -> String {
        self.iter().collect::<Vec<_>>().join(separator)
    }

    /// 空の集合を拒否する
    ///
    /// # エラー
    ///
    /// * `SheetScoutError::InvalidInput`: 集合が空の場合
    pub fn require_non_empty(&self) -> Result<(), SheetScoutError> {
        if self.is_empty() {
            return Err(SheetScoutError::InvalidInput(
                "keyword set is empty".to_string(),
            ));
        }
        Ok(())
    }

    /// セル文字列に一致するキーワード（入力表記）をすべて返す
    ///
    /// セル文字列はトリムしてから照合します。
    pub fn matching(&self, text: &str, mode: MatchMode) -> Vec<&str> {
        let folded = text.trim().to_lowercase();
        if folded.is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|k| match mode {
                MatchMode::Substring => folded.contains(&k.folded),
                MatchMode::ExactToken => folded == k.folded,
            })
            .map(|k| k.original.as_str())
            .collect()
    }

    /// いずれかのキーワードが部分文字列として含まれるか
    pub fn contains_any(&self, text: &str) -> bool {
        let folded = text.trim().to_lowercase();
        self.entries.iter().any(|k| folded.contains(&k.folded))
    }

    /// すべてのキーワードが部分文字列として含まれるか（空の集合では常に`true`）
    pub fn contains_all(&self, text: &str) -> bool {
        let folded = text.to_lowercase();
        self.entries.iter().all(|k| folded.contains(&k.folded))
    }
}

impl<S: AsRef<str>> FromIterator<S> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
