// ABOUTME: Fixed catalog of content kinds a leaf panel can show.
// ABOUTME: Maps each kind to its description byte and picker label.

use serde::{Deserialize, Serialize};

/// What a leaf panel displays. Order matches the mode picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentMode {
    Console,
    Listing,
    Disassembly,
    Goroutines,
    Stacktrace,
    Locals,
    Globals,
    Breakpoints,
    Threads,
    Registers,
    Sources,
    Functions,
    Types,
}

impl ContentMode {
    pub const ALL: [ContentMode; 13] = [
        ContentMode::Console,
        ContentMode::Listing,
        ContentMode::Disassembly,
        ContentMode::Goroutines,
        ContentMode::Stacktrace,
        ContentMode::Locals,
        ContentMode::Globals,
        ContentMode::Breakpoints,
        ContentMode::Threads,
        ContentMode::Registers,
        ContentMode::Sources,
        ContentMode::Functions,
        ContentMode::Types,
    ];

    /// Position in the picker catalog
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<ContentMode> {
        Self::ALL.get(index).copied()
    }

    /// Byte used for this mode in a layout description
    pub fn code(self) -> u8 {
        match self {
            ContentMode::Console => b'C',
            ContentMode::Listing => b'L',
            ContentMode::Disassembly => b'D',
            ContentMode::Goroutines => b'G',
            ContentMode::Stacktrace => b'S',
            ContentMode::Locals => b'l',
            ContentMode::Globals => b'g',
            ContentMode::Breakpoints => b'B',
            ContentMode::Threads => b'T',
            ContentMode::Registers => b'r',
            ContentMode::Sources => b's',
            ContentMode::Functions => b'f',
            ContentMode::Types => b't',
        }
    }

    pub fn from_code(code: u8) -> Option<ContentMode> {
        Self::ALL.iter().copied().find(|mode| mode.code() == code)
    }

    pub fn label(self) -> &'static str {
        match self {
            ContentMode::Console => "Command",
            ContentMode::Listing => "Listing",
            ContentMode::Disassembly => "Disassembly",
            ContentMode::Goroutines => "Goroutines",
            ContentMode::Stacktrace => "Stacktrace",
            ContentMode::Locals => "Locals",
            ContentMode::Globals => "Globals",
            ContentMode::Breakpoints => "Breakpoints",
            ContentMode::Threads => "Threads",
            ContentMode::Registers => "Registers",
            ContentMode::Sources => "Sources",
            ContentMode::Functions => "Functions",
            ContentMode::Types => "Types",
        }
    }
}

impl std::fmt::Display for ContentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
