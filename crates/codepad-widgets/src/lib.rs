//! Terminal panes for the **codepad** playground.
//!
//! Each stateful widget implements [`codepad_runtime::Component`] and reports
//! user intent as messages; none of them touch the session directly.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`code_editor`] | Multi-line source editor with line numbers and auto-indent |
//! | [`input_slots`] | Stack of single-line stdin fields |
//! | [`language_tabs`] | Language picker |
//! | [`output_console`] | Scrollable output, coloured by success or error |
//! | [`status_bar`] | Stateless three-section status line |
//! | [`focus`] | [`FocusRing`](focus::FocusRing) for cycling pane focus |

pub mod code_editor;
pub mod focus;
pub mod input_slots;
pub mod language_tabs;
pub mod output_console;
pub mod status_bar;

pub use code_editor::CodeEditor;
pub use focus::FocusRing;
pub use input_slots::InputSlots;
pub use language_tabs::LanguageTabs;
pub use output_console::OutputConsole;
pub use status_bar::StatusBar;
