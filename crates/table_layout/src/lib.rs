//! Row-major / column-major layout toggling for rendered tables.

pub mod config;
pub mod markup;
pub mod page;
pub mod transpose;

pub use config::{load_layout_config, LayoutConfig, ScopedSwap};
pub use markup::{HtmlDocument, MarkupError};
pub use page::{LayoutDispatcher, Page, Selection, Trigger};
pub use transpose::{transpose, transposed};
