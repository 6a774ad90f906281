// ABOUTME: Command console content for the debugger front-end.
// ABOUTME: Executes commands off the frame thread and buffers their output.

pub mod console;

pub use console::{BackendError, CommandBackend, Console, OfflineBackend, Scrollback};
