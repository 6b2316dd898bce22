use super::*;
use shared::domain::CellKind;

fn contents(table: &Table) -> Vec<Vec<&str>> {
    table
        .rows
        .iter()
        .map(|row| row.cells.iter().map(|c| c.content.as_str()).collect())
        .collect()
}

fn sample() -> Table {
    Table::from_grid(&[
        vec!["request", "owner", "species"],
        vec!["r1", "alice", "mouse"],
        vec!["r2", "bob", "rat"],
        vec!["r3", "carol", "mouse"],
    ])
}

#[test]
fn rectangular_table_swaps_dimensions_and_contents() {
    let original = sample();
    let (rows, cols) = original.dimensions();
    let result = transposed(&original);

    assert_eq!(result.dimensions(), (cols, rows));
    for i in 0..cols {
        for j in 0..rows {
            assert_eq!(
                result.cell(i, j).map(|c| &c.content),
                original.cell(j, i).map(|c| &c.content),
                "cell ({i}, {j})"
            );
        }
    }
}

#[test]
fn first_column_is_headers_everything_else_data() {
    let result = transposed(&sample());
    for row in &result.rows {
        for (col, cell) in row.cells.iter().enumerate() {
            let expected = if col == 0 { CellKind::Header } else { CellKind::Data };
            assert_eq!(cell.kind, expected);
        }
    }
}

#[test]
fn source_kind_is_ignored() {
    let mut table = Table::new(
        None,
        vec![
            Row::new(vec![Cell::data("a"), Cell::header("b")]),
            Row::new(vec![Cell::header("c"), Cell::data("d")]),
        ],
    );
    transpose(&mut table);
    assert_eq!(
        table.rows,
        vec![
            Row::new(vec![Cell::header("a"), Cell::data("c")]),
            Row::new(vec![Cell::header("b"), Cell::data("d")]),
        ]
    );
}

#[test]
fn double_transpose_loses_header_row_classification() {
    let original = sample();
    let twice = transposed(&transposed(&original));

    assert_eq!(contents(&twice), contents(&original));
    // "owner" started as a header in row 0 and comes back as data.
    assert_eq!(original.cell(0, 1).map(|c| c.kind), Some(CellKind::Header));
    assert_eq!(twice.cell(0, 1).map(|c| c.kind), Some(CellKind::Data));
    // "r1" started as data in column 0 and comes back as a header.
    assert_eq!(original.cell(1, 0).map(|c| c.kind), Some(CellKind::Data));
    assert_eq!(twice.cell(1, 0).map(|c| c.kind), Some(CellKind::Header));
    assert_ne!(twice, original);
}

#[test]
fn empty_table_is_a_no_op() {
    let mut table = Table::default().with_id("vertical_empty");
    transpose(&mut table);
    assert_eq!(table, Table::default().with_id("vertical_empty"));
}

#[test]
fn ragged_rows_skip_missing_cells() {
    let mut table = Table::from_grid(&[vec!["a", "b", "c"], vec!["1"], vec!["x", "y"]]);
    transpose(&mut table);

    assert_eq!(
        contents(&table),
        vec![vec!["a", "1", "x"], vec!["b", "y"], vec!["c"]]
    );
    assert!(table.rows.iter().all(|row| row.cells[0].is_header()));
    assert_eq!(table.cell(1, 1).map(|c| c.kind), Some(CellKind::Data));
}

#[test]
fn rows_without_cells_contribute_nothing() {
    let mut table = Table::new(
        None,
        vec![Row::default(), Row::new(vec![Cell::data("only")])],
    );
    transpose(&mut table);
    assert_eq!(table.rows, vec![Row::new(vec![Cell::header("only")])]);
}

#[test]
fn identifier_survives_transposition() {
    let mut table = sample().with_id("vertical_requests");
    transpose(&mut table);
    assert_eq!(table.id.as_ref().map(|id| id.as_str()), Some("vertical_requests"));
}
