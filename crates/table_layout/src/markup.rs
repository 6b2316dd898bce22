//! Thin adapter between an HTML document and the in-memory [`Page`].
//!
//! Only `<table>`, `<tr>`, `<td>` and `<th>` are interpreted. Cell content is
//! captured as the raw inner markup of the cell and written back verbatim.
//! Tables nested inside a cell stay part of that cell's content.

use std::ops::Range;

use quick_xml::{events::Event, Reader};
use shared::domain::{Cell, CellKind, Row, Table, TableId};
use thiserror::Error;
use tracing::debug;

use crate::page::Page;

#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("malformed markup near byte {position}: {source}")]
    Parse {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },
    #[error("<table> opened at byte {position} is never closed")]
    UnclosedTable { position: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Table,
    Row,
    Cell(CellKind),
}

fn classify(name: &[u8]) -> Option<Tag> {
    if name.eq_ignore_ascii_case(b"table") {
        Some(Tag::Table)
    } else if name.eq_ignore_ascii_case(b"tr") {
        Some(Tag::Row)
    } else if name.eq_ignore_ascii_case(b"td") {
        Some(Tag::Cell(CellKind::Data))
    } else if name.eq_ignore_ascii_case(b"th") {
        Some(Tag::Cell(CellKind::Header))
    } else {
        None
    }
}

#[derive(Debug, Clone)]
struct TableSlot {
    body: Range<usize>,
    original: Table,
}

/// A parsed document whose tables can be transposed and written back.
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    source: String,
    slots: Vec<TableSlot>,
    page: Page,
}

impl HtmlDocument {
    pub fn parse(source: impl Into<String>) -> Result<Self, MarkupError> {
        let source = source.into();
        let tables = scan_tables(&source)?;
        debug!(tables = tables.len(), "parsed document tables");

        let page = Page::new(tables.iter().map(|(table, _)| table.clone()).collect());
        let slots = tables
            .into_iter()
            .map(|(original, body)| TableSlot { body, original })
            .collect();
        Ok(Self {
            source,
            slots,
            page,
        })
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    /// Rebuilds the document. Tables whose rows did not change keep their
    /// original bytes; changed tables get their rows rewritten directly under
    /// `<table>`.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.source.len());
        let mut cursor = 0;
        for (slot, table) in self.slots.iter().zip(&self.page.tables) {
            if table.rows == slot.original.rows {
                continue;
            }
            out.push_str(&self.source[cursor..slot.body.start]);
            out.push_str(&render_rows(&table.rows));
            cursor = slot.body.end;
        }
        out.push_str(&self.source[cursor..]);
        out
    }
}

pub fn render_rows(rows: &[Row]) -> String {
    let mut out = String::from("\n");
    for row in rows {
        out.push_str("<tr>");
        for cell in &row.cells {
            let tag = match cell.kind {
                CellKind::Header => "th",
                CellKind::Data => "td",
            };
            out.push_str(&format!("<{tag}>{}</{tag}>", cell.content));
        }
        out.push_str("</tr>\n");
    }
    out
}

struct OpenCell {
    kind: CellKind,
    content_start: usize,
}

struct OpenTable {
    id: Option<TableId>,
    opened_at: usize,
    body_start: usize,
    rows: Vec<Row>,
    row: Option<Vec<Cell>>,
    cell: Option<OpenCell>,
    nested: usize,
}

impl OpenTable {
    fn close_cell(&mut self, source: &str, content_end: usize) {
        if let Some(cell) = self.cell.take() {
            let content = source[cell.content_start..content_end].to_string();
            self.row.get_or_insert_with(Vec::new).push(Cell {
                kind: cell.kind,
                content,
            });
        }
    }

    fn close_row(&mut self, source: &str, content_end: usize) {
        self.close_cell(source, content_end);
        if let Some(cells) = self.row.take() {
            self.rows.push(Row::new(cells));
        }
    }
}

/// Start offset of the tag that ends at `tag_end`.
fn tag_start(source: &str, tag_end: usize) -> usize {
    source[..tag_end].rfind('<').unwrap_or(tag_end)
}

fn table_id(start: &quick_xml::events::BytesStart<'_>) -> Option<TableId> {
    start
        .html_attributes()
        .filter_map(Result::ok)
        .find(|attr| attr.key.as_ref().eq_ignore_ascii_case(b"id"))
        .map(|attr| {
            let id = attr
                .unescape_value()
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
            TableId(id)
        })
}

fn scan_tables(source: &str) -> Result<Vec<(Table, Range<usize>)>, MarkupError> {
    let mut reader = Reader::from_str(source);
    reader.check_end_names(false);

    let mut found = Vec::new();
    let mut open: Option<OpenTable> = None;

    loop {
        let event = reader.read_event().map_err(|source| MarkupError::Parse {
            position: reader.buffer_position(),
            source,
        })?;
        let after = reader.buffer_position();

        match event {
            Event::Start(start) => {
                let tag = classify(start.name().as_ref());
                let Some(table) = open.as_mut() else {
                    if tag == Some(Tag::Table) {
                        open = Some(OpenTable {
                            id: table_id(&start),
                            opened_at: tag_start(source, after),
                            body_start: after,
                            rows: Vec::new(),
                            row: None,
                            cell: None,
                            nested: 0,
                        });
                    }
                    continue;
                };
                match tag {
                    Some(Tag::Table) => table.nested += 1,
                    _ if table.nested > 0 => {}
                    Some(Tag::Row) => {
                        table.close_row(source, tag_start(source, after));
                        table.row = Some(Vec::new());
                    }
                    Some(Tag::Cell(kind)) => {
                        table.close_cell(source, tag_start(source, after));
                        table.cell = Some(OpenCell {
                            kind,
                            content_start: after,
                        });
                    }
                    None => {}
                }
            }
            Event::Empty(empty) => {
                if let (Some(table), Some(Tag::Cell(kind))) =
                    (open.as_mut(), classify(empty.name().as_ref()))
                {
                    if table.nested == 0 {
                        table.close_cell(source, tag_start(source, after));
                        table.row.get_or_insert_with(Vec::new).push(Cell {
                            kind,
                            content: String::new(),
                        });
                    }
                }
            }
            Event::End(end) => {
                let tag = classify(end.name().as_ref());
                let Some(table) = open.as_mut() else {
                    continue;
                };
                let end_start = tag_start(source, after);
                match tag {
                    Some(Tag::Table) if table.nested > 0 => table.nested -= 1,
                    Some(Tag::Table) => {
                        table.close_row(source, end_start);
                        if let Some(table) = open.take() {
                            found.push((
                                Table::new(table.id, table.rows),
                                table.body_start..end_start,
                            ));
                        }
                    }
                    _ if table.nested > 0 => {}
                    Some(Tag::Row) => table.close_row(source, end_start),
                    Some(Tag::Cell(_)) => table.close_cell(source, end_start),
                    None => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(table) = open {
        return Err(MarkupError::UnclosedTable {
            position: table.opened_at,
        });
    }
    Ok(found)
}

#[cfg(test)]
#[path = "tests/markup_tests.rs"]
mod tests;
