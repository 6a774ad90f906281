// ABOUTME: Command console buffer for the console content panel.
// ABOUTME: Runs commands on the tokio blocking pool and collects their output.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use dp_core::ConsoleSettings;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("not connected to a debugger")]
    NotConnected,

    #[error("command failed: {0}")]
    Failed(String),
}

/// Debugger side of the console. Called off the frame thread.
pub trait CommandBackend: Send + Sync + 'static {
    fn execute(&self, command: &str) -> Result<String, BackendError>;
}

/// Backend used when no debugger is attached
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineBackend;

impl CommandBackend for OfflineBackend {
    fn execute(&self, _command: &str) -> Result<String, BackendError> {
        Err(BackendError::NotConnected)
    }
}

/// Bounded list of console output lines, oldest first
#[derive(Debug)]
pub struct Scrollback {
    lines: VecDeque<String>,
    limit: usize,
}

impl Scrollback {
    pub fn new(limit: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        if self.lines.len() == self.limit {
            self.lines.pop_front();
        }
        self.lines.push_back(line.into());
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Console state shared between the frame loop and running commands. Only
/// the scrollback and the running flag cross threads.
pub struct Console {
    settings: ConsoleSettings,
    backend: Arc<dyn CommandBackend>,
    scrollback: Arc<Mutex<Scrollback>>,
    running: Arc<AtomicBool>,
    last_command: String,
    runtime: Handle,
}

impl Console {
    pub fn new(
        settings: ConsoleSettings,
        backend: Arc<dyn CommandBackend>,
        runtime: Handle,
    ) -> Self {
        let scrollback = Scrollback::new(settings.history_limit);
        Self {
            settings,
            backend,
            scrollback: Arc::new(Mutex::new(scrollback)),
            running: Arc::new(AtomicBool::new(false)),
            last_command: String::new(),
            runtime,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn prompt(&self) -> String {
        if self.is_running() {
            "running".to_string()
        } else {
            format!("{}>", self.settings.prompt)
        }
    }

    /// Copy of the current output, oldest line first
    pub fn lines(&self) -> Vec<String> {
        let scrollback = self.scrollback.lock().unwrap_or_else(PoisonError::into_inner);
        scrollback.lines().map(str::to_string).collect()
    }

    /// Echo `input` and run it in the background. Empty input repeats the
    /// previous command. Returns `None` when nothing was started, either
    /// because a command is still running or there is nothing to repeat.
    pub fn submit(&mut self, input: &str) -> Option<JoinHandle<()>> {
        if self.is_running() {
            tracing::warn!("console busy, ignoring command");
            return None;
        }

        let input = input.trim();
        if !input.is_empty() {
            self.last_command = input.to_string();
        }
        let command = self.last_command.clone();
        push_line(&self.scrollback, format!("{} {}", self.prompt(), command));
        if command.is_empty() {
            return None;
        }

        self.running.store(true, Ordering::SeqCst);
        let backend = Arc::clone(&self.backend);
        let scrollback = Arc::clone(&self.scrollback);
        let running = RunningGuard(Arc::clone(&self.running));
        tracing::debug!(%command, "submitting console command");

        Some(self.runtime.spawn_blocking(move || {
            let _running = running;
            match backend.execute(&command) {
                Ok(output) => {
                    for line in output.lines() {
                        push_line(&scrollback, line);
                    }
                }
                Err(e) => {
                    tracing::debug!(%command, error = %e, "console command failed");
                    push_line(&scrollback, format!("error: {e}"));
                }
            }
        }))
    }
}

/// Clears the running flag when the command finishes, including by panic
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

fn push_line(scrollback: &Mutex<Scrollback>, line: impl Into<String>) {
    scrollback
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(line);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    struct Echo;

    impl CommandBackend for Echo {
        fn execute(&self, command: &str) -> Result<String, BackendError> {
            Ok(format!("ran {command}\ndone"))
        }
    }

    /// Blocks until the test lets it finish
    struct Gate(Mutex<mpsc::Receiver<()>>);

    impl CommandBackend for Gate {
        fn execute(&self, _command: &str) -> Result<String, BackendError> {
            let _ = self.0.lock().unwrap().recv();
            Ok(String::new())
        }
    }

    fn console(backend: Arc<dyn CommandBackend>, history_limit: usize) -> Console {
        let settings = ConsoleSettings {
            history_limit,
            ..Default::default()
        };
        Console::new(settings, backend, Handle::current())
    }

    #[tokio::test]
    async fn command_output_lands_in_scrollback() {
        let mut console = console(Arc::new(Echo), 100);
        console.submit("break main").unwrap().await.unwrap();

        assert_eq!(console.lines(), vec!["dbg> break main", "ran break main", "done"]);
        assert!(!console.is_running());
    }

    #[tokio::test]
    async fn empty_input_repeats_last_command() {
        let mut console = console(Arc::new(Echo), 100);
        console.submit("next").unwrap().await.unwrap();
        console.submit("   ").unwrap().await.unwrap();

        let lines = console.lines();
        assert_eq!(lines[3], "dbg> next");
        assert_eq!(lines[4], "ran next");
    }

    #[tokio::test]
    async fn empty_input_with_no_history_only_echoes() {
        let mut console = console(Arc::new(Echo), 100);
        assert!(console.submit("").is_none());
        assert_eq!(console.lines(), vec!["dbg> "]);
    }

    #[tokio::test]
    async fn backend_errors_are_printed() {
        let mut console = console(Arc::new(OfflineBackend), 100);
        console.submit("continue").unwrap().await.unwrap();
        assert_eq!(console.lines()[1], "error: not connected to a debugger");
    }

    #[tokio::test]
    async fn busy_console_rejects_commands() {
        let (tx, rx) = mpsc::channel();
        let mut console = console(Arc::new(Gate(Mutex::new(rx))), 100);

        let handle = console.submit("continue").unwrap();
        assert!(console.is_running());
        assert_eq!(console.prompt(), "running");
        assert!(console.submit("next").is_none());

        tx.send(()).unwrap();
        handle.await.unwrap();
        assert!(!console.is_running());
        assert_eq!(console.prompt(), "dbg>");
    }

    struct Crash;

    impl CommandBackend for Crash {
        fn execute(&self, command: &str) -> Result<String, BackendError> {
            if command == "crash" {
                panic!("backend crashed");
            }
            Ok("fine".to_string())
        }
    }

    #[tokio::test]
    async fn panicking_backend_frees_the_console() {
        let mut console = console(Arc::new(Crash), 100);
        let result = console.submit("crash").unwrap().await;
        assert!(result.unwrap_err().is_panic());
        assert!(!console.is_running());
        assert_eq!(console.prompt(), "dbg>");

        console.submit("next").unwrap().await.unwrap();
        assert_eq!(console.lines(), vec!["dbg> crash", "dbg> next", "fine"]);
    }

    #[tokio::test]
    async fn scrollback_is_bounded() {
        let mut console = console(Arc::new(Echo), 4);
        console.submit("a").unwrap().await.unwrap();
        console.submit("b").unwrap().await.unwrap();

        assert_eq!(console.lines(), vec!["done", "dbg> b", "ran b", "done"]);
    }

    #[test]
    fn scrollback_drops_oldest() {
        let mut scrollback = Scrollback::new(2);
        scrollback.push("one");
        scrollback.push("two");
        scrollback.push("three");
        assert_eq!(scrollback.lines().collect::<Vec<_>>(), vec!["two", "three"]);
        assert_eq!(scrollback.len(), 2);
    }
}
