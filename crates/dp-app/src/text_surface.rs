// ABOUTME: Character-grid rendering surface for previewing layouts.
// ABOUTME: Maps layout units onto cells and replays scripted pointer input.

use std::collections::HashMap;

use dp_core::PreviewSettings;
use dp_layout::{Axis, ContentMode, DragGesture, HeaderAction, PanelName, Rect, Surface};

/// Scripted primary pointer, in layout units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pointer {
    pub x: i32,
    pub y: i32,
    /// Button went down this frame
    pub pressed: bool,
    /// Button is held
    pub down: bool,
    pub dx: i32,
    pub dy: i32,
}

struct Canvas {
    columns: usize,
    rows: usize,
    cells: Vec<char>,
}

impl Canvas {
    fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            cells: vec![' '; columns * rows],
        }
    }

    fn clear(&mut self) {
        self.cells.fill(' ');
    }

    fn put(&mut self, col: i32, row: i32, c: char) {
        let (Ok(col), Ok(row)) = (usize::try_from(col), usize::try_from(row)) else {
            return;
        };
        if col < self.columns && row < self.rows {
            self.cells[row * self.columns + col] = c;
        }
    }

    fn text(&mut self, col: i32, row: i32, max: i32, text: &str) {
        for (i, c) in text.chars().take(usize::try_from(max).unwrap_or(0)).enumerate() {
            self.put(col + i as i32, row, c);
        }
    }

    fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.cells
            .chunks(self.columns.max(1))
            .map(|row| row.iter().collect::<String>().trim_end().to_string())
    }
}

pub struct TextSurface {
    canvas: Canvas,
    cell_width: i32,
    cell_height: i32,
    stack: Vec<Rect>,
    pointer: Pointer,
    header_actions: HashMap<PanelName, HeaderAction>,
}

impl TextSurface {
    pub fn new(settings: &PreviewSettings) -> Self {
        let mut surface = Self {
            canvas: Canvas::new(usize::from(settings.columns), usize::from(settings.rows)),
            cell_width: settings.cell_width.max(1),
            cell_height: settings.cell_height.max(1),
            stack: Vec::new(),
            pointer: Pointer::default(),
            header_actions: HashMap::new(),
        };
        surface.begin_frame();
        surface
    }

    /// Whole drawable area in layout units
    pub fn bounds(&self) -> Rect {
        Rect::new(
            0,
            0,
            self.canvas.columns as i32 * self.cell_width,
            self.canvas.rows as i32 * self.cell_height,
        )
    }

    pub fn cell_height(&self) -> i32 {
        self.cell_height
    }

    /// Clear the grid and make the whole area available again
    pub fn begin_frame(&mut self) {
        self.canvas.clear();
        self.stack = vec![self.bounds()];
    }

    pub fn set_pointer(&mut self, pointer: Pointer) {
        self.pointer = pointer;
    }

    /// Action the header of `name` reports on the next frame
    pub fn queue_action(&mut self, name: PanelName, action: HeaderAction) {
        self.header_actions.insert(name, action);
    }

    /// Draw one line of text in the next row of the current region
    pub fn write_line(&mut self, text: &str) {
        let band = self.reserve(self.cell_height, Axis::Y);
        if band.h < self.cell_height {
            return;
        }
        let (col, row) = self.cell(band.x, band.y);
        self.canvas.text(col, row, band.w / self.cell_width, text);
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in self.canvas.lines() {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    fn cell(&self, x: i32, y: i32) -> (i32, i32) {
        (x / self.cell_width, y / self.cell_height)
    }

    fn draw_box(&mut self, rect: Rect) {
        let (c0, r0) = self.cell(rect.x, rect.y);
        let (c1, r1) = self.cell(rect.x + rect.w, rect.y + rect.h);
        if c1 - c0 < 2 || r1 - r0 < 2 {
            return;
        }
        for col in c0..c1 {
            self.canvas.put(col, r0, '-');
            self.canvas.put(col, r1 - 1, '-');
        }
        for row in r0..r1 {
            self.canvas.put(c0, row, '|');
            self.canvas.put(c1 - 1, row, '|');
        }
        for (col, row) in [(c0, r0), (c1 - 1, r0), (c0, r1 - 1), (c1 - 1, r1 - 1)] {
            self.canvas.put(col, row, '+');
        }
    }
}

impl Surface for TextSurface {
    fn available(&self) -> Rect {
        self.stack.last().copied().unwrap_or_default()
    }

    fn reserve(&mut self, extent: i32, axis: Axis) -> Rect {
        let Some(free) = self.stack.last_mut() else {
            return Rect::default();
        };
        let (band, rest) = free.take_front(extent, axis);
        *free = rest;
        band
    }

    fn drag(&mut self, rect: Rect) -> DragGesture {
        let p = self.pointer;
        DragGesture {
            started: p.pressed && rect.contains(p.x, p.y),
            active: p.down,
            delta_x: p.dx,
            delta_y: p.dy,
        }
    }

    fn child(
        &mut self,
        _name: PanelName,
        rect: Rect,
        border: bool,
        body: &mut dyn FnMut(&mut Self),
    ) {
        let inner = if border {
            self.draw_box(rect);
            Rect::new(
                rect.x + self.cell_width,
                rect.y + self.cell_height,
                (rect.w - 2 * self.cell_width).max(0),
                (rect.h - 2 * self.cell_height).max(0),
            )
        } else {
            rect
        };
        self.stack.push(inner);
        body(self);
        self.stack.pop();
    }

    fn header(
        &mut self,
        rect: Rect,
        name: PanelName,
        mode: Option<ContentMode>,
    ) -> Option<HeaderAction> {
        let label = mode.map_or("-", ContentMode::label);
        let (col, row) = self.cell(rect.x, rect.y);
        let width = rect.w / self.cell_width;
        self.canvas
            .text(col, row, width, &format!("{name} [{label}] split:_| close:x"));
        self.header_actions.remove(&name)
    }
}
