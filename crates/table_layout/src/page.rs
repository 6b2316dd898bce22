//! Which tables get transposed, and when.
//!
//! A [`LayoutDispatcher`] maps a [`Trigger`] to one or more [`Selection`]s.
//! Every rule registered for a trigger is evaluated against the page and the
//! matches are merged, so a table picked by several rules is still transposed
//! only once per event.

use std::collections::BTreeSet;

use shared::domain::{ControlId, Table, TableId};
use tracing::{debug, info};

use crate::{config::LayoutConfig, transpose::transpose};

/// The tables of one rendered page, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub tables: Vec<Table>,
    ready_fired: bool,
}

impl Page {
    pub fn new(tables: Vec<Table>) -> Self {
        Self {
            tables,
            ready_fired: false,
        }
    }

    pub fn table(&self, id: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|table| table.id.as_ref().is_some_and(|t| t.as_str() == id))
    }

    /// Transposes every table picked by any of `selections`, each at most
    /// once. Returns the indices of the tables that were transposed.
    pub fn apply(&mut self, selections: &[Selection]) -> Vec<usize> {
        let picked: BTreeSet<usize> = self
            .tables
            .iter()
            .enumerate()
            .filter(|(_, table)| selections.iter().any(|s| s.matches(table)))
            .map(|(index, _)| index)
            .collect();

        for &index in &picked {
            transpose(&mut self.tables[index]);
        }
        picked.into_iter().collect()
    }

    /// Scoped mode: transposes the table with this id only.
    pub fn swap_table(&mut self, id: &str) -> bool {
        !self.apply(&[Selection::ById(TableId::from(id))]).is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    ById(TableId),
    IdPrefix(String),
    All,
}

impl Selection {
    pub fn matches(&self, table: &Table) -> bool {
        match self {
            Selection::All => true,
            Selection::ById(id) => table.id.as_ref() == Some(id),
            Selection::IdPrefix(prefix) => table
                .id
                .as_ref()
                .is_some_and(|id| id.as_str().starts_with(prefix.as_str())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// The page finished loading. Fires at most once per page.
    Ready,
    Click(ControlId),
}

impl Trigger {
    pub fn click(control: impl Into<String>) -> Self {
        Trigger::Click(ControlId(control.into()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct LayoutDispatcher {
    rules: Vec<(Trigger, Selection)>,
}

impl LayoutDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, trigger: Trigger, selection: Selection) -> Self {
        self.rules.push((trigger, selection));
        self
    }

    pub fn from_config(config: &LayoutConfig) -> Self {
        let mut dispatcher = Self::new();
        if !config.swapper_control.is_empty() {
            dispatcher = dispatcher.on(
                Trigger::click(config.swapper_control.as_str()),
                Selection::All,
            );
        }
        if !config.vertical_prefix.is_empty() {
            dispatcher = dispatcher.on(
                Trigger::Ready,
                Selection::IdPrefix(config.vertical_prefix.clone()),
            );
        }
        if config.transpose_all_on_ready {
            dispatcher = dispatcher.on(Trigger::Ready, Selection::All);
        }
        for swap in &config.scoped {
            dispatcher = dispatcher.on(
                Trigger::click(swap.control.as_str()),
                Selection::ById(TableId(swap.table.clone())),
            );
        }
        dispatcher
    }

    pub fn selections_for(&self, trigger: &Trigger) -> Vec<Selection> {
        self.rules
            .iter()
            .filter(|(t, _)| t == trigger)
            .map(|(_, selection)| selection.clone())
            .collect()
    }

    /// Runs every rule bound to `trigger`. Returns the indices of the tables
    /// that were transposed.
    pub fn dispatch(&self, page: &mut Page, trigger: &Trigger) -> Vec<usize> {
        if *trigger == Trigger::Ready {
            if page.ready_fired {
                debug!("page-ready already handled; ignoring");
                return Vec::new();
            }
            page.ready_fired = true;
        }

        let selections = self.selections_for(trigger);
        if selections.is_empty() {
            debug!(?trigger, "no layout rule bound to trigger");
            return Vec::new();
        }

        let transposed = page.apply(&selections);
        info!(?trigger, tables = transposed.len(), "applied layout toggle");
        transposed
    }
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;
