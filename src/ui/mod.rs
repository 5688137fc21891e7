//! Terminal report viewer built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into four layers:
//!
//! - **[`app`]** — application state, keyboard event loop, pane focus
//! - **[`outline`]** — which report lines are visible given the collapsed modules
//! - **[`panes`]** — stateless render functions for each visible pane (report,
//!   diagnostics, status bar)
//! - **[`theme`]** — centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with a
//! [`Report`] and call [`App::run`] to start the event loop.
//!
//! [`Report`]: crate::render::Report
//! [`App::run`]: app::App::run

pub mod app;
pub mod outline;
pub mod panes;
pub mod theme;

pub use app::App;
