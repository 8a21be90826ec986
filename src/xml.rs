//! Intermediate XML form of a converted report.
//!
//! Structure:
//!
//! ```text
//!   <report name="llvm-cov" report-name="...">
//!     <data name="data">
//!       <directory name="src">
//!         <file filename="src/a.c" line-covered="3" line-total="4"
//!               func-covered="1" func-total="1">
//!           <line number="1" hits="5"/>
//!           ...
//!           <function name="main">
//!             <line number="1" hits="5"/>
//!           </function>
//!         </file>
//!       </directory>
//!     </data>
//!   </report>
//! ```
//!
//! Lines directly under `<file>` are the expanded lines; lines under
//! `<function>` are the ones attributed to that function.
use std::collections::HashMap;
use std::io::Cursor;
use std::str;

use quick_xml::events::{BytesDecl, BytesStart, Event};
use quick_xml::reader::Reader;
use quick_xml::Writer;

use crate::adapter::REPORT_ELEMENT_NAME;
use crate::error::{LlvmCovError, Result};
use crate::model::*;

macro_rules! uint {
    ($val: expr) => {
        format!("{}", $val).as_str()
    };
}

/// Every element the document may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Report,
    Data,
    Directory,
    File,
    Function,
    Line,
}

impl Tag {
    pub fn from_name(name: &[u8]) -> Result<Tag> {
        match name {
            b"report" => Ok(Tag::Report),
            b"data" => Ok(Tag::Data),
            b"directory" => Ok(Tag::Directory),
            b"file" => Ok(Tag::File),
            b"function" => Ok(Tag::Function),
            b"line" => Ok(Tag::Line),
            other => Err(LlvmCovError::UnsupportedFormat(format!(
                "unknown element <{}>",
                String::from_utf8_lossy(other)
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tag::Report => ElementKind::Report.tag(),
            Tag::Data => ElementKind::Data.tag(),
            Tag::Directory => ElementKind::Directory.tag(),
            Tag::File => ElementKind::File.tag(),
            Tag::Function => ElementKind::Function.tag(),
            Tag::Line => "line",
        }
    }
}

// ── Writing ────────────────────────────────────────────────────────────────

/// Render the report as an indented XML document.
pub fn write_report(report: &ReportNode) -> Result<String> {
    let mut data = Vec::new();
    let mut writer = Writer::new_with_indent(Cursor::new(&mut data), b' ', 2);

    write_document(&mut writer, report)
        .map_err(|e| LlvmCovError::Other(format!("XML write error: {e}")))?;

    String::from_utf8(data).map_err(|e| LlvmCovError::Other(e.to_string()))
}

fn write_document<W: std::io::Write>(
    writer: &mut Writer<W>,
    report: &ReportNode,
) -> quick_xml::Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer
        .create_element(Tag::Report.name())
        .with_attributes([
            ("name", REPORT_ELEMENT_NAME),
            ("report-name", report.name.as_str()),
        ])
        .write_inner_content(|w| {
            for data in &report.data {
                write_data(w, data)?;
            }
            Ok::<(), quick_xml::Error>(())
        })?;
    Ok(())
}

fn write_data<W: std::io::Write>(writer: &mut Writer<W>, data: &DataNode) -> quick_xml::Result<()> {
    writer
        .create_element(Tag::Data.name())
        .with_attribute(("name", data.name.as_str()))
        .write_inner_content(|w| {
            for dir in &data.directories {
                w.create_element(Tag::Directory.name())
                    .with_attribute(("name", dir.name.as_str()))
                    .write_inner_content(|w| {
                        for file in &dir.files {
                            write_file(w, file)?;
                        }
                        Ok::<(), quick_xml::Error>(())
                    })?;
            }
            Ok::<(), quick_xml::Error>(())
        })?;
    Ok(())
}

fn write_file<W: std::io::Write>(writer: &mut Writer<W>, file: &FileNode) -> quick_xml::Result<()> {
    writer
        .create_element(Tag::File.name())
        .with_attributes([
            ("filename", file.filename.as_str()),
            ("line-covered", uint!(file.line_ratio.covered)),
            ("line-total", uint!(file.line_ratio.total)),
            ("func-covered", uint!(file.function_ratio.covered)),
            ("func-total", uint!(file.function_ratio.total)),
        ])
        .write_inner_content(|w| {
            write_lines(w, &file.lines)?;
            for func in &file.functions {
                w.create_element(Tag::Function.name())
                    .with_attribute(("name", func.name.as_str()))
                    .write_inner_content(|w| write_lines(w, &func.lines))?;
            }
            Ok::<(), quick_xml::Error>(())
        })?;
    Ok(())
}

fn write_lines<W: std::io::Write>(
    writer: &mut Writer<W>,
    lines: &[LineRecord],
) -> quick_xml::Result<()> {
    for line in lines {
        writer
            .create_element(Tag::Line.name())
            .with_attributes([
                ("number", uint!(line.line_number)),
                ("hits", uint!(line.hit_count)),
            ])
            .write_empty()?;
    }
    Ok(())
}

// ── Reading ────────────────────────────────────────────────────────────────

/// A node under construction. It is attached to its parent once its end tag
/// has been read.
enum Frame {
    Report(ReportNode),
    Data(DataNode),
    Directory(DirectoryNode),
    File(FileNode),
    Function(FunctionNode),
    Line(LineRecord),
}

impl Frame {
    fn tag(&self) -> Tag {
        match self {
            Frame::Report(_) => Tag::Report,
            Frame::Data(_) => Tag::Data,
            Frame::Directory(_) => Tag::Directory,
            Frame::File(_) => Tag::File,
            Frame::Function(_) => Tag::Function,
            Frame::Line(_) => Tag::Line,
        }
    }
}

/// Parse a document produced by [`write_report`] back into a report tree.
/// Nothing is returned unless the whole document is well formed.
pub fn read_report(input: &[u8]) -> Result<ReportNode> {
    let mut reader = Reader::from_reader(input);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut report: Option<ReportNode> = None;

    loop {
        let event = reader.read_event_into(&mut buf);
        match event {
            Err(e) => {
                return Err(LlvmCovError::Xml {
                    source: e,
                    position: reader.buffer_position(),
                })
            }
            Ok(Event::Eof) => break,
            Ok(Event::Start(ref e)) => {
                let frame = open_frame(e)?;
                stack.push(frame);
            }
            Ok(Event::Empty(ref e)) => {
                let frame = open_frame(e)?;
                close_frame(frame, &mut stack, &mut report)?;
            }
            Ok(Event::End(_)) => {
                let frame = stack.pop().ok_or_else(|| {
                    LlvmCovError::UnsupportedFormat("unbalanced end element".to_string())
                })?;
                close_frame(frame, &mut stack, &mut report)?;
            }
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(LlvmCovError::UnsupportedFormat(format!(
            "unclosed <{}> element",
            open.tag().name()
        )));
    }
    report.ok_or_else(|| LlvmCovError::UnsupportedFormat("missing <report> element".to_string()))
}

fn open_frame(e: &BytesStart) -> Result<Frame> {
    let tag = Tag::from_name(e.name().as_ref())?;
    let attrs = attr_map(e);

    let frame = match tag {
        Tag::Report => Frame::Report(ReportNode {
            name: attrs
                .get("report-name")
                .or_else(|| attrs.get("name"))
                .cloned()
                .ok_or_else(|| missing_attr(tag, "report-name"))?,
            data: Vec::new(),
        }),
        Tag::Data => Frame::Data(DataNode {
            name: required(&attrs, tag, "name")?,
            directories: Vec::new(),
        }),
        Tag::Directory => Frame::Directory(DirectoryNode {
            name: required(&attrs, tag, "name")?,
            files: Vec::new(),
        }),
        Tag::File => Frame::File(FileNode {
            filename: required(&attrs, tag, "filename")?,
            line_ratio: ratio_attrs(&attrs, "line-covered", "line-total")?,
            function_ratio: ratio_attrs(&attrs, "func-covered", "func-total")?,
            lines: Vec::new(),
            functions: Vec::new(),
        }),
        Tag::Function => Frame::Function(FunctionNode {
            name: required(&attrs, tag, "name")?,
            lines: Vec::new(),
        }),
        Tag::Line => Frame::Line(LineRecord {
            line_number: number(&attrs, tag, "number")?,
            hit_count: number(&attrs, tag, "hits")?,
        }),
    };
    Ok(frame)
}

/// Attach a finished frame to the frame below it.
fn close_frame(frame: Frame, stack: &mut [Frame], report: &mut Option<ReportNode>) -> Result<()> {
    let child_tag = frame.tag();
    match (stack.last_mut(), frame) {
        (None, Frame::Report(node)) => {
            if report.is_some() {
                return Err(LlvmCovError::UnsupportedFormat(
                    "more than one <report> element".to_string(),
                ));
            }
            *report = Some(node);
        }
        (Some(Frame::Report(parent)), Frame::Data(node)) => parent.data.push(node),
        (Some(Frame::Data(parent)), Frame::Directory(node)) => parent.directories.push(node),
        (Some(Frame::Directory(parent)), Frame::File(node)) => parent.files.push(node),
        (Some(Frame::File(parent)), Frame::Function(node)) => parent.functions.push(node),
        (Some(Frame::File(parent)), Frame::Line(line)) => parent.lines.push(line),
        (Some(Frame::Function(parent)), Frame::Line(line)) => parent.lines.push(line),
        (parent, _) => {
            let place = parent
                .map(|p| format!("inside <{}>", p.tag().name()))
                .unwrap_or_else(|| "at top level".to_string());
            return Err(LlvmCovError::UnsupportedFormat(format!(
                "<{}> is not allowed {place}",
                child_tag.name()
            )));
        }
    }
    Ok(())
}

fn missing_attr(tag: Tag, attr: &str) -> LlvmCovError {
    LlvmCovError::MissingField(format!("<{}> attribute '{attr}'", tag.name()))
}

fn required(attrs: &HashMap<String, String>, tag: Tag, attr: &str) -> Result<String> {
    attrs.get(attr).cloned().ok_or_else(|| missing_attr(tag, attr))
}

fn number<T: str::FromStr>(attrs: &HashMap<String, String>, tag: Tag, attr: &str) -> Result<T> {
    attrs
        .get(attr)
        .and_then(|v| v.parse::<T>().ok())
        .ok_or_else(|| missing_attr(tag, attr))
}

/// Covered defaults to 0 and total defaults to covered.
fn ratio_attrs(attrs: &HashMap<String, String>, covered: &str, total: &str) -> Result<Ratio> {
    let parse = |key: &str, value: &String| {
        value
            .parse::<u64>()
            .map_err(|_| missing_attr(Tag::File, key))
    };
    let covered_value = match attrs.get(covered) {
        Some(v) => parse(covered, v)?,
        None => 0,
    };
    let total_value = match attrs.get(total) {
        Some(v) => parse(total, v)?,
        None => covered_value,
    };
    Ok(Ratio::new(covered_value, total_value))
}

/// Extract attributes from an XML element into a HashMap.
fn attr_map(e: &BytesStart) -> HashMap<String, String> {
    e.attributes()
        .filter_map(|a| {
            let attr = a.ok()?;
            let key = str::from_utf8(attr.key.local_name().into_inner())
                .ok()?
                .to_string();
            let value = attr.unescape_value().ok()?.to_string();
            Some((key, value))
        })
        .collect()
}
