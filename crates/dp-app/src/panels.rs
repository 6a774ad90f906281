// ABOUTME: Content drawn inside leaf panels of the text preview.
// ABOUTME: The console shows its scrollback; other views are placeholders without a target.

use dp_console::Console;
use dp_layout::{ContentMode, ContentProvider, Surface};

use crate::text_surface::TextSurface;

pub struct Panels {
    pub console: Console,
}

impl Panels {
    pub fn new(console: Console) -> Self {
        Self { console }
    }

    fn render_console(&self, surface: &mut TextSurface) {
        let rows = (surface.available().h / surface.cell_height()).max(1) as usize;
        let lines = self.console.lines();
        // Keep the newest output visible, prompt on the last row
        let skip = (lines.len() + 1).saturating_sub(rows);
        for line in lines.iter().skip(skip) {
            surface.write_line(line);
        }
        surface.write_line(&self.console.prompt());
    }
}

impl ContentProvider<TextSurface> for Panels {
    fn render(&mut self, mode: ContentMode, surface: &mut TextSurface) {
        match mode {
            ContentMode::Console => self.render_console(surface),
            ContentMode::Listing
            | ContentMode::Disassembly
            | ContentMode::Goroutines
            | ContentMode::Stacktrace
            | ContentMode::Locals
            | ContentMode::Globals
            | ContentMode::Breakpoints
            | ContentMode::Threads
            | ContentMode::Registers
            | ContentMode::Sources
            | ContentMode::Functions
            | ContentMode::Types => {
                surface.write_line(&format!("{}: no target", mode.label()));
            }
        }
    }
}
