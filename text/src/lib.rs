pub mod commands;
pub mod compositor;
pub mod cursor;

#[cfg(test)]
mod tests;

pub use commands::{CaretAlignment, Clipboard, TextCommand, TextLayout};
pub use compositor::TextCompositor;
pub use cursor::{Slice, TextCursor};
