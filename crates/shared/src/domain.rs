use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! name_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

name_newtype!(TableId);
name_newtype!(ControlId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    Header,
    Data,
}

/// One table cell. `content` is opaque renderable markup and is never
/// interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub kind: CellKind,
    pub content: String,
}

impl Cell {
    pub fn header(content: impl Into<String>) -> Self {
        Self {
            kind: CellKind::Header,
            content: content.into(),
        }
    }

    pub fn data(content: impl Into<String>) -> Self {
        Self {
            kind: CellKind::Data,
            content: content.into(),
        }
    }

    pub fn is_header(&self) -> bool {
        self.kind == CellKind::Header
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: Option<TableId>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(id: Option<TableId>, rows: Vec<Row>) -> Self {
        Self { id, rows }
    }

    /// Builds an anonymous table from plain strings, marking the first row as
    /// headers. Handy for fixtures.
    pub fn from_grid<S: AsRef<str>>(grid: &[Vec<S>]) -> Self {
        let rows = grid
            .iter()
            .enumerate()
            .map(|(row_index, row)| {
                Row::new(
                    row.iter()
                        .map(|content| {
                            if row_index == 0 {
                                Cell::header(content.as_ref())
                            } else {
                                Cell::data(content.as_ref())
                            }
                        })
                        .collect(),
                )
            })
            .collect();
        Self { id: None, rows }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(TableId(id.into()));
        self
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.cells.get(col))
    }

    /// `(rows, widest row)`.
    pub fn dimensions(&self) -> (usize, usize) {
        let width = self.rows.iter().map(Row::len).max().unwrap_or(0);
        (self.rows.len(), width)
    }

    pub fn is_rectangular(&self) -> bool {
        let Some(first) = self.rows.first() else {
            return true;
        };
        self.rows.iter().all(|row| row.len() == first.len())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(Row::is_empty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionOption {
    pub value: String,
    pub label: String,
}

impl SelectionOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

impl From<(String, String)> for SelectionOption {
    fn from((value, label): (String, String)) -> Self {
        Self { value, label }
    }
}

impl From<SelectionOption> for (String, String) {
    fn from(option: SelectionOption) -> Self {
        (option.value, option.label)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectError {
    #[error("control '{control}' is disabled")]
    Disabled { control: ControlId },
    #[error("'{value}' is not an option of control '{control}'")]
    UnknownValue { control: ControlId, value: String },
}

/// In-memory stand-in for a `<select>` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectControl {
    pub id: ControlId,
    options: Vec<SelectionOption>,
    selected: Option<String>,
    disabled: bool,
}

impl SelectControl {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: ControlId(id.into()),
            options: Vec::new(),
            selected: None,
            disabled: false,
        }
    }

    /// Creates a control with its options already in place; the first option
    /// is selected unless `default` names another one.
    pub fn with_options(
        id: impl Into<String>,
        options: Vec<SelectionOption>,
        default: Option<&str>,
    ) -> Self {
        let mut control = Self::new(id);
        control.replace_options(options);
        if let Some(value) = default {
            if control.has_option(value) {
                control.selected = Some(value.to_string());
            }
        }
        control
    }

    pub fn options(&self) -> &[SelectionOption] {
        &self.options
    }

    pub fn selected_value(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|option| option.value == value)
    }

    pub fn clear_options(&mut self) {
        self.options.clear();
        self.selected = None;
    }

    pub fn replace_options(&mut self, options: Vec<SelectionOption>) {
        self.selected = options.first().map(|option| option.value.clone());
        self.options = options;
    }

    pub fn select(&mut self, value: &str) -> Result<(), SelectError> {
        if self.disabled {
            return Err(SelectError::Disabled {
                control: self.id.clone(),
            });
        }
        if !self.has_option(value) {
            return Err(SelectError::UnknownValue {
                control: self.id.clone(),
                value: value.to_string(),
            });
        }
        self.selected = Some(value.to_string());
        Ok(())
    }
}
