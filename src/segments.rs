//! Expansion of llvm-cov segments into per-line hit counts.
//!
//! A segment says "from here on, this count applies until the next segment".
//! Lines between two segment lines inherit the count of the last segment
//! before the gap; lines sharing segments take the largest count, unless one
//! of those segments has no count at all, in which case the line is left out.
use indexmap::IndexMap;

use crate::error::{LlvmCovError, Result};
use crate::export::Segment;
use crate::model::LineRecord;

/// Expand one file's segments into line records, in ascending line order.
pub fn expand_lines(filename: &str, segments: &[Segment]) -> Result<Vec<LineRecord>> {
    match segments {
        [] => Ok(Vec::new()),
        [only] => Ok(if only.has_count {
            vec![LineRecord::new(only.line, only.count)]
        } else {
            Vec::new()
        }),
        _ => expand_grouped(filename, segments),
    }
}

fn expand_grouped(filename: &str, segments: &[Segment]) -> Result<Vec<LineRecord>> {
    let groups = group_by_line(filename, segments)?;
    let mut lines = Vec::new();

    let mut iter = groups.iter();
    let Some((&first_line, first_segs)) = iter.next() else {
        return Ok(lines);
    };
    push_line(&mut lines, first_line, first_segs);

    let (mut prev_line, mut prev_segs) = (first_line, first_segs);
    for (&line, segs) in iter {
        if line - prev_line > 1 {
            // Carry the trailing count across the gap.
            if let Some(last) = prev_segs.last().filter(|s| s.has_count) {
                lines.extend((prev_line + 1..line).map(|l| LineRecord::new(l, last.count)));
            }
        }
        push_line(&mut lines, line, segs);
        prev_line = line;
        prev_segs = segs;
    }

    log::debug!("{filename}: {} segments -> {} lines", segments.len(), lines.len());
    Ok(lines)
}

/// Group segments by line, keeping first-seen order. A line number lower
/// than the one before it makes the whole sequence invalid.
fn group_by_line<'a>(
    filename: &str,
    segments: &'a [Segment],
) -> Result<IndexMap<u32, Vec<&'a Segment>>> {
    let mut groups: IndexMap<u32, Vec<&Segment>> = IndexMap::new();
    let mut previous: Option<u32> = None;

    for seg in segments {
        if let Some(prev) = previous.filter(|&p| seg.line < p) {
            return Err(LlvmCovError::MalformedSegmentOrder {
                filename: filename.to_string(),
                previous: prev,
                current: seg.line,
            });
        }
        previous = Some(seg.line);
        groups.entry(seg.line).or_default().push(seg);
    }

    Ok(groups)
}

fn push_line(lines: &mut Vec<LineRecord>, line: u32, segs: &[&Segment]) {
    if let Some(hits) = line_count(segs) {
        lines.push(LineRecord::new(line, hits));
    }
}

/// Largest count on the line, or `None` as soon as one segment has no count.
fn line_count(segs: &[&Segment]) -> Option<u64> {
    let mut max_hits = 0;
    for seg in segs {
        if !seg.has_count {
            return None;
        }
        if seg.count > max_hits {
            max_hits = seg.count;
        }
    }
    Some(max_hits)
}
