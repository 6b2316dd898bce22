use shared::domain::{Cell, Row, Table};
use tracing::debug;

/// Swaps rows and columns of `table` in place.
///
/// The cell at `(i, j)` of the result carries the content of the source cell
/// at `(j, i)`. Kinds are re-derived from position: column 0 of the result is
/// rendered as headers and every other cell as data, whatever the source kind
/// was. Applying this twice therefore does not give back the original
/// classification.
///
/// Ragged input is handled best-effort: a source row that is too short to
/// reach column `c` contributes nothing to destination row `c`, so the later
/// cells of that row shift left instead of leaving a blank.
pub fn transpose(table: &mut Table) {
    let rows = std::mem::take(&mut table.rows);
    let (source_rows, source_cols) = (rows.len(), rows.iter().map(Row::len).max().unwrap_or(0));
    let ragged = rows.iter().any(|row| row.len() != source_cols);

    table.rows = transpose_rows(rows);

    debug!(
        table_id = table.id.as_ref().map(|id| id.as_str()),
        source_rows,
        source_cols,
        ragged,
        "transposed table"
    );
}

/// Non-mutating variant of [`transpose`].
pub fn transposed(table: &Table) -> Table {
    let mut copy = table.clone();
    transpose(&mut copy);
    copy
}

fn transpose_rows(rows: Vec<Row>) -> Vec<Row> {
    let mut columns: Vec<Vec<String>> = Vec::new();
    for row in rows {
        for (col, cell) in row.cells.into_iter().enumerate() {
            if columns.len() <= col {
                columns.resize_with(col + 1, Vec::new);
            }
            columns[col].push(cell.content);
        }
    }

    columns
        .into_iter()
        .map(|contents| {
            Row::new(
                contents
                    .into_iter()
                    .enumerate()
                    .map(|(col, content)| {
                        if col == 0 {
                            Cell::header(content)
                        } else {
                            Cell::data(content)
                        }
                    })
                    .collect(),
            )
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/transpose_tests.rs"]
mod tests;
