// Library surface for headless/integration tests and reuse.
// main.rs only owns the CLI and the terminal.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod game;
pub mod logging;
pub mod marker;
pub mod runtime;
pub mod session;
pub mod status;
pub mod ui;

pub use error::{Error, Result};
