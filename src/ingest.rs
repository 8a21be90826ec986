use std::path::Path;

use crate::error::Result;
use crate::model::ReportNode;
use crate::tree;

/// Read an llvm-cov export from disk and convert it.
/// Returns the report tree, named `report_name` or after the file.
pub fn ingest(file_path: &Path, report_name: Option<&str>) -> Result<ReportNode> {
    let content = std::fs::read(file_path)?;

    // Generate report name if not provided
    let name = match report_name {
        Some(n) => n.to_string(),
        None => default_report_name(file_path),
    };

    log::info!("converting {} as report '{}'", file_path.display(), name);
    tree::convert(&content, &name)
}

/// The file name of `file_path`, or "unnamed" when it has none.
pub fn default_report_name(file_path: &Path) -> String {
    file_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unnamed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_report_name() {
        assert_eq!(default_report_name(Path::new("out/coverage.json")), "coverage.json");
        assert_eq!(default_report_name(Path::new("/")), "unnamed");
    }

    #[test]
    fn test_ingest_missing_file() {
        let result = ingest(Path::new("/nonexistent/coverage.json"), None);
        assert!(matches!(result, Err(crate::error::LlvmCovError::Io(_))));
    }
}
