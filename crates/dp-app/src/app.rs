// ABOUTME: Previewer state: layout session, text surface and panel content.
// ABOUTME: Runs frames and turns line commands into header actions and drags.

use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use dp_console::{Console, OfflineBackend};
use dp_core::Config;
use dp_layout::{FrameLayout, HeaderAction, LayoutSession, PanelKind, PanelName, SplitAxis};
use tokio::runtime::Handle;

use crate::commands::{Command, HELP};
use crate::panels::Panels;
use crate::text_surface::{Pointer, TextSurface};

pub struct App {
    session: LayoutSession,
    surface: TextSurface,
    panels: Panels,
    last_frame: FrameLayout,
}

impl App {
    pub fn new(config: &Config, description: &str, runtime: Handle) -> Result<Self> {
        let session = LayoutSession::from_description(description, config.layout.metrics)
            .with_context(|| format!("invalid layout description {description:?}"))?;
        let console = Console::new(config.console.clone(), Arc::new(OfflineBackend), runtime);
        let mut app = Self {
            session,
            surface: TextSurface::new(&config.preview),
            panels: Panels::new(console),
            last_frame: FrameLayout::default(),
        };
        // Resolves automatic split sizes so describe reports real numbers
        app.frame();
        Ok(app)
    }

    pub fn session(&self) -> &LayoutSession {
        &self.session
    }

    fn frame(&mut self) {
        self.surface.begin_frame();
        self.last_frame = self.session.frame(&mut self.surface, &mut self.panels);
    }

    /// Queue `action` on the leaf's header and run the frame that reports it
    fn header_action(&mut self, name: PanelName, action: HeaderAction) {
        self.surface.queue_action(name, action);
        self.frame();
        // Lay out the edited tree
        self.frame();
    }

    /// Press on the split's gutter, move by `delta` along its axis, release
    fn drag(&mut self, name: PanelName, delta: i32) -> Result<()> {
        let id = self
            .session
            .find(name)
            .with_context(|| format!("no panel named {name}"))?;
        let Some(PanelKind::Split { axis, .. }) = self.session.tree().kind(id) else {
            anyhow::bail!("panel {name} is not a split");
        };
        let grab = self
            .last_frame
            .gutter(name)
            .with_context(|| format!("split {name} was not laid out"))?;
        let (x, y) = (grab.x + grab.w / 2, grab.y + grab.h / 2);
        let (dx, dy) = match axis {
            SplitAxis::Horizontal => (0, delta),
            SplitAxis::Vertical => (delta, 0),
        };

        let press = Pointer {
            x,
            y,
            pressed: true,
            down: true,
            ..Default::default()
        };
        let moved = Pointer {
            x: x + dx,
            y: y + dy,
            down: true,
            dx,
            dy,
            ..Default::default()
        };
        let release = Pointer {
            x: x + dx,
            y: y + dy,
            ..Default::default()
        };
        for pointer in [press, moved, release] {
            self.surface.set_pointer(pointer);
            self.frame();
        }
        self.surface.set_pointer(Pointer::default());
        self.frame();
        Ok(())
    }

    fn require(&self, name: PanelName) -> Result<()> {
        match self.last_frame.leaf(name) {
            Some(_) => Ok(()),
            None => anyhow::bail!("no leaf panel named {name}"),
        }
    }

    /// Returns `false` once the user asked to quit
    pub fn execute(&mut self, command: Command, out: &mut impl Write) -> Result<bool> {
        match command {
            Command::Show => {
                self.frame();
                write!(out, "{}", self.surface.render())?;
            }
            Command::Split(axis, name) => {
                self.require(name)?;
                self.header_action(name, HeaderAction::Split(axis));
                writeln!(out, "{}", self.session.describe()?)?;
            }
            Command::Close(name) => {
                self.require(name)?;
                self.header_action(name, HeaderAction::Close);
                writeln!(out, "{}", self.session.describe()?)?;
            }
            Command::Mode(name, mode) => {
                self.require(name)?;
                self.header_action(name, HeaderAction::SelectMode(mode));
                writeln!(out, "{}", self.session.describe()?)?;
            }
            Command::Drag(name, delta) => {
                self.drag(name, delta)?;
                writeln!(out, "{}", self.session.describe()?)?;
            }
            Command::Describe => writeln!(out, "{}", self.session.describe()?)?,
            Command::Dump => {
                let snapshot = self.session.tree().snapshot();
                writeln!(out, "{}", serde_json::to_string_pretty(&snapshot)?)?;
            }
            Command::Run(line) => {
                // Output shows up in the console panel on a later frame
                if self.panels.console.submit(&line).is_none() {
                    writeln!(out, "{}", self.panels.console.prompt())?;
                }
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    /// Read commands until end of input or `quit`
    pub fn run(&mut self, input: impl BufRead, mut out: impl Write) -> Result<()> {
        write!(out, "{}", self.surface.render())?;
        for line in input.lines() {
            let line = line?;
            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    writeln!(out, "error: {e:#}")?;
                    continue;
                }
            };
            match self.execute(command, &mut out) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    tracing::debug!(error = %e, "command failed");
                    writeln!(out, "error: {e:#}")?;
                }
            }
            out.flush()?;
        }
        Ok(())
    }
}
