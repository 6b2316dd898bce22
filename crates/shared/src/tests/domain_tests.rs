use crate::domain::{Cell, CellKind, SelectControl, SelectError, SelectionOption, Table};

fn microscopes() -> Vec<SelectionOption> {
    vec![
        SelectionOption::new("m1", "Microscope 1"),
        SelectionOption::new("m2", "Microscope 2"),
    ]
}

#[test]
fn from_grid_marks_first_row_as_headers() {
    let table = Table::from_grid(&[vec!["a", "b"], vec!["1", "2"]]);
    assert_eq!(table.cell(0, 1), Some(&Cell::header("b")));
    assert_eq!(table.cell(1, 0).map(|c| c.kind), Some(CellKind::Data));
    assert_eq!(table.dimensions(), (2, 2));
    assert!(table.is_rectangular());
}

#[test]
fn ragged_table_reports_widest_row() {
    let table = Table::from_grid(&[vec!["a", "b", "c"], vec!["1"]]);
    assert_eq!(table.dimensions(), (2, 3));
    assert!(!table.is_rectangular());
}

#[test]
fn replacing_options_selects_the_first() {
    let mut control = SelectControl::new("select_microscope");
    control.replace_options(microscopes());
    assert_eq!(control.selected_value(), Some("m1"));

    control.clear_options();
    assert!(control.options().is_empty());
    assert_eq!(control.selected_value(), None);
}

#[test]
fn with_options_honours_known_default_only() {
    let control = SelectControl::with_options("c", microscopes(), Some("m2"));
    assert_eq!(control.selected_value(), Some("m2"));

    let control = SelectControl::with_options("c", microscopes(), Some("m9"));
    assert_eq!(control.selected_value(), Some("m1"));
}

#[test]
fn select_rejects_unknown_and_disabled() {
    let mut control = SelectControl::with_options("c", microscopes(), None);
    assert!(matches!(
        control.select("nope"),
        Err(SelectError::UnknownValue { .. })
    ));

    control.set_disabled(true);
    assert!(matches!(control.select("m2"), Err(SelectError::Disabled { .. })));

    control.set_disabled(false);
    control.select("m2").expect("select");
    assert_eq!(control.selected_value(), Some("m2"));
}
