pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod parser;
pub mod render;
pub mod repl;
pub mod schema;
pub mod store;
pub mod ui;

pub use cli::{Cli, Commands};
pub use error::IngestError;
pub use ui::{LogUi, Phase, SilentUi, Ui, UiApp};
