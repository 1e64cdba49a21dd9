//! Discovery Module
//!
//! フォルダー内の検索対象ファイルを列挙するモジュール。

use std::fs;
use std::path::{Path, PathBuf};

use crate::api::FileKind;
use crate::error::SheetScoutError;

/// Officeのロックファイルの接頭辞
const LOCK_FILE_PREFIX: &str = "~$";

/// フォルダー直下のサポート対象ファイルを列挙する
///
/// サブフォルダーは走査しません。Officeのロックファイル（`~$`で始まる名前）と、
/// 読み取れないエントリーは除外されます。結果はパス順にソートされます。
///
/// # エラー
///
/// * `SheetScoutError::InvalidInput`: フォルダーが存在しない場合
/// * `SheetScoutError::FileAccess`: フォルダーを読み込めない場合
pub fn list_files(folder: &Path) -> Result<Vec<PathBuf>, SheetScoutError> {
    if !folder.is_dir() {
        return Err(SheetScoutError::InvalidInput(format!(
            "folder not found: {}",
            folder.display()
        )));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(folder)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("Skipping unreadable entry in {}: {}", folder.display(), e);
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() || FileKind::from_path(&path).is_none() {
            continue;
        }
        let is_lock_file = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(LOCK_FILE_PREFIX));
        if is_lock_file {
            tracing::debug!("Skipping lock file {}", path.display());
            continue;
        }
        files.push(path);
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.xlsx", "a.CSV", "notes.txt", "~$b.xlsx", "image.png", "old.xls"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.xlsx")).unwrap();

        let names: Vec<String> = list_files(dir.path())
            .unwrap()
            .iter()
            .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.CSV", "b.xlsx", "notes.txt", "old.xls"]);
    }

    #[test]
    fn test_missing_folder() {
        assert!(matches!(
            list_files(Path::new("/nonexistent/folder")),
            Err(SheetScoutError::InvalidInput(_))
        ));
    }
}
