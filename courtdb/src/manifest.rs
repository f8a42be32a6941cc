//! Manifest loading.
//!
//! A manifest lists source store paths, one per line. Blank lines are
//! ignored and `#` starts a comment, either whole-line or trailing.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Read an ordered list of source store paths from a manifest file.
pub fn read_manifest(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        return Err(Error::ManifestNotFound(path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(path)?;
    Ok(parse_manifest(&contents))
}

/// Parse manifest text. Order is preserved.
pub fn parse_manifest(contents: &str) -> Vec<PathBuf> {
    contents
        .lines()
        .filter_map(|line| {
            let entry = line.split('#').next().unwrap_or("").trim();
            if entry.is_empty() {
                None
            } else {
                Some(PathBuf::from(entry))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_skips_blanks_and_comments() {
        let text = "\n# header\ndbs/a.db\n\n   \n  # indented comment\ndbs/b.db\n";
        assert_eq!(
            parse_manifest(text),
            vec![PathBuf::from("dbs/a.db"), PathBuf::from("dbs/b.db")]
        );
    }

    #[test]
    fn test_parse_strips_trailing_comment() {
        let text = "dbs/a.db   # first run\ndbs/b.db#second\n";
        assert_eq!(
            parse_manifest(text),
            vec![PathBuf::from("dbs/a.db"), PathBuf::from("dbs/b.db")]
        );
    }

    #[test]
    fn test_parse_preserves_order() {
        let text = "c.db\na.db\nb.db\n";
        let paths: Vec<_> = parse_manifest(text)
            .into_iter()
            .map(|p| p.display().to_string())
            .collect();
        assert_eq!(paths, ["c.db", "a.db", "b.db"]);
    }

    #[test]
    fn test_parse_comment_only_is_empty() {
        assert!(parse_manifest("# nothing here\n\n#still nothing").is_empty());
    }

    #[test]
    fn test_read_missing_manifest() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("db_list.txt");

        let result = read_manifest(&missing);
        assert!(matches!(result, Err(Error::ManifestNotFound(p)) if p == missing));
    }

    #[test]
    fn test_read_manifest_from_file() {
        let tmp = TempDir::new().unwrap();
        let list = tmp.path().join("db_list.txt");
        std::fs::write(&list, "one.db\n# two.db\nthree.db # keep\n").unwrap();

        let paths = read_manifest(&list).unwrap();
        assert_eq!(paths, vec![PathBuf::from("one.db"), PathBuf::from("three.db")]);
    }
}
