// ABOUTME: Shared configuration for debug-panes.
// ABOUTME: Defines layout metrics, console and preview settings.

pub mod config;

pub use config::{
    Config, ConfigError, ConsoleSettings, LayoutMetrics, LayoutSettings, PreviewSettings,
};
