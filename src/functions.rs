//! Attribution of function regions to already-expanded file lines.
use crate::export::FunctionEntry;
use crate::model::{FunctionNode, LineRecord};

/// A file's identity and its expanded lines, as seen by the mapper.
#[derive(Debug, Clone, Copy)]
pub struct FileLines<'a> {
    pub filename: &'a str,
    pub lines: &'a [LineRecord],
}

/// Build the function nodes owned by each file.
///
/// The returned vector is parallel to `files`. For every region only the
/// first line record falling inside `[start_line, end_line]` is attached.
/// A function touching several files collects lines from all of them and is
/// then placed, identical, under each of those files.
pub fn map_functions(
    functions: &[FunctionEntry],
    files: &[FileLines<'_>],
) -> Vec<Vec<FunctionNode>> {
    let mut per_file: Vec<Vec<FunctionNode>> = vec![Vec::new(); files.len()];

    for func in functions {
        let mut lines = Vec::new();
        let mut owners: Vec<usize> = Vec::new();

        for filename in &func.filenames {
            let Some(idx) = files.iter().position(|f| f.filename == filename.as_str()) else {
                log::warn!(
                    "function {} references {filename}, which has no file entry",
                    func.name
                );
                continue;
            };

            if !owners.contains(&idx) {
                owners.push(idx);
            }

            for region in &func.regions {
                if let Some(line) = files[idx]
                    .lines
                    .iter()
                    .find(|l| region.contains(l.line_number))
                {
                    lines.push(*line);
                }
            }
        }

        if owners.is_empty() {
            continue;
        }

        let node = FunctionNode {
            name: func.name.clone(),
            lines,
        };
        for idx in owners {
            per_file[idx].push(node.clone());
        }
    }

    per_file
}
