//! Grouping of files into directories by the parent part of their filename.
use std::path::Path;

use indexmap::IndexMap;

use crate::model::{DirectoryNode, FileNode};

/// Key used for files without a parent component.
pub const ROOT_DIRECTORY: &str = ".";

/// Everything before the last path separator, or `"."` when there is none.
pub fn directory_key(filename: &str) -> String {
    match Path::new(filename).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_string_lossy().into_owned(),
        _ => ROOT_DIRECTORY.to_string(),
    }
}

/// Partition files by directory. Directories appear in first-seen order and
/// files keep their input order within a directory.
pub fn group_by_directory(files: Vec<FileNode>) -> Vec<DirectoryNode> {
    let mut groups: IndexMap<String, Vec<FileNode>> = IndexMap::new();
    for file in files {
        groups
            .entry(directory_key(&file.filename))
            .or_default()
            .push(file);
    }

    groups
        .into_iter()
        .map(|(name, files)| DirectoryNode { name, files })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Ratio;

    fn file(filename: &str) -> FileNode {
        FileNode {
            filename: filename.to_string(),
            line_ratio: Ratio::default(),
            function_ratio: Ratio::default(),
            lines: Vec::new(),
            functions: Vec::new(),
        }
    }

    #[test]
    fn test_directory_key() {
        assert_eq!(directory_key("a/b.c"), "a");
        assert_eq!(directory_key("/usr/include/stdio.h"), "/usr/include");
        assert_eq!(directory_key("e.c"), ".");
        assert_eq!(directory_key(""), ".");
    }

    #[test]
    fn test_group_by_directory() {
        let groups = group_by_directory(vec![file("a/b.c"), file("e.c"), file("a/d.c")]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "a");
        let names: Vec<_> = groups[0].files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["a/b.c", "a/d.c"]);
        assert_eq!(groups[1].name, ".");
        assert_eq!(groups[1].files[0].filename, "e.c");
    }

    #[test]
    fn test_group_empty() {
        assert!(group_by_directory(Vec::new()).is_empty());
    }
}
