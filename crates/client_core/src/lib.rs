//! Client side of dependent selection: a child select control whose options
//! are looked up from the parent's current value.

pub mod lookup;
pub mod selector;

pub use lookup::{HttpLookup, LookupConfig, LookupError, LookupSource};
pub use selector::{DependentSelector, SelectorEvent, SyncPhase};
