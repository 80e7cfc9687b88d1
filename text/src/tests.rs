use crate::commands::{CaretAlignment, Clipboard, TextCommand, TextLayout};
use crate::cursor::{Slice, TextCursor};
use crate::compositor::TextCompositor;
use support::Vec2;

/// A degenerate single-line layout: codepoint `i` sits at canvas x = i,
/// y = 0. Enough to exercise cursor navigation without a real shaper.
struct FlatLayout {
    len: u32,
}

impl TextLayout for FlatLayout {
    fn extent(&self) -> Vec2 {
        Vec2::new(self.len as f32, 1.0)
    }

    fn hit(&self, pos: Vec2) -> (i64, CaretAlignment) {
        let cp = (pos.x.round() as i64).clamp(0, self.len as i64);
        (cp, CaretAlignment::Left)
    }

    fn line_count(&self) -> u32 {
        1
    }

    fn line_of(&self, _codepoint: u32) -> u32 {
        0
    }

    fn line_range(&self, _line: u32) -> Slice {
        Slice::new(0, self.len)
    }

    fn caret_position(&self, codepoint: u32, _alignment: CaretAlignment) -> Vec2 {
        Vec2::new(codepoint as f32, 0.0)
    }
}

#[derive(Default)]
struct TestClipboard {
    contents: Vec<u8>,
}

impl Clipboard for TestClipboard {
    fn get(&mut self) -> Vec<u8> {
        self.contents.clone()
    }

    fn set(&mut self, bytes: &[u8]) {
        self.contents = bytes.to_vec();
    }
}

fn codepoints(s: &str) -> Vec<u32> {
    s.chars().map(|c| c as u32).collect()
}

fn string_of(doc: &[u32]) -> String {
    doc.iter().filter_map(|&cp| char::from_u32(cp)).collect()
}

fn insert_into(doc: &mut Vec<u32>, pos: u32, data: &[u32]) {
    doc.splice(pos as usize..pos as usize, data.iter().copied());
}

fn erase_from(doc: &mut Vec<u32>, slice: Slice) {
    doc.splice(slice.offset as usize..slice.end() as usize, std::iter::empty());
}

#[test]
fn as_slice_clamps_and_orders_reversed_selection() {
    let cursor = TextCursor::new(5, 2);
    let slice = cursor.as_slice(10);
    assert_eq!(slice, Slice::new(2, 4));
}

#[test]
fn as_slice_clamps_beyond_document_length() {
    let cursor = TextCursor::new(-3, 50);
    let slice = cursor.as_slice(10);
    assert_eq!(slice, Slice::new(0, 10));
}

#[test]
fn input_text_selects_inserted_range() {
    let mut doc: Vec<u32> = Vec::new();
    let mut compositor = TextCompositor::new(64, 16);

    let snapshot = doc.clone();
    let input = codepoints("HELLO, MOTO");
    compositor.input_text(
        &snapshot,
        &input,
        |pos, data| insert_into(&mut doc, pos, data),
        |slice| erase_from(&mut doc, slice),
    );

    assert_eq!(string_of(&doc), "HELLO, MOTO");
    assert_eq!(compositor.cursor.as_slice(doc.len() as u32), Slice::new(0, 11));
    assert_eq!(compositor.current_record(), 1);
    assert_eq!(compositor.latest_record(), 1);
}

#[test]
fn select_line_with_no_separators_selects_whole_buffer() {
    let mut doc: Vec<u32> = Vec::new();
    let mut compositor = TextCompositor::new(64, 16);

    let snapshot = doc.clone();
    let input = codepoints("HELLO, MOTO");
    compositor.input_text(
        &snapshot,
        &input,
        |pos, data| insert_into(&mut doc, pos, data),
        |slice| erase_from(&mut doc, slice),
    );

    compositor.select_line(&doc);
    assert_eq!(compositor.cursor.as_slice(doc.len() as u32), Slice::new(0, 11));
}

#[test]
fn undo_then_redo_round_trips_an_insert() {
    let mut doc: Vec<u32> = Vec::new();
    let mut compositor = TextCompositor::new(64, 16);

    let snapshot = doc.clone();
    let input = codepoints("abc");
    compositor.input_text(
        &snapshot,
        &input,
        |pos, data| insert_into(&mut doc, pos, data),
        |slice| erase_from(&mut doc, slice),
    );
    assert_eq!(string_of(&doc), "abc");

    compositor.undo(
        |pos, data| insert_into(&mut doc, pos, data),
        |slice| erase_from(&mut doc, slice),
    );
    assert_eq!(string_of(&doc), "");
    assert_eq!(compositor.current_record(), 0);

    compositor.redo(
        |pos, data| insert_into(&mut doc, pos, data),
        |slice| erase_from(&mut doc, slice),
    );
    assert_eq!(string_of(&doc), "abc");
    assert_eq!(compositor.current_record(), 1);
}

#[test]
fn undo_past_the_start_of_history_is_a_no_op() {
    let mut doc: Vec<u32> = codepoints("x");
    let mut compositor = TextCompositor::new(64, 16);

    compositor.undo(
        |pos, data| insert_into(&mut doc, pos, data),
        |slice| erase_from(&mut doc, slice),
    );
    assert_eq!(string_of(&doc), "x");
    assert_eq!(compositor.current_record(), 0);
}

#[test]
fn back_space_on_collapsed_cursor_erases_preceding_codepoint() {
    let mut doc = codepoints("abc");
    let mut compositor = TextCompositor::new(64, 16);
    compositor.cursor = TextCursor::new(2, 2);

    let snapshot = doc.clone();
    compositor.back_space(
        &snapshot,
        |pos, data| insert_into(&mut doc, pos, data),
        |slice| erase_from(&mut doc, slice),
    );

    assert_eq!(string_of(&doc), "ac");
    assert_eq!(compositor.cursor, TextCursor::new(1, 1));
}

#[test]
fn delete_selection_is_a_no_op_on_an_empty_selection() {
    let mut doc = codepoints("abc");
    let mut compositor = TextCompositor::new(64, 16);
    compositor.cursor = TextCursor::new(1, 1);

    let snapshot = doc.clone();
    compositor.delete_selection(&snapshot, |slice| erase_from(&mut doc, slice));

    assert_eq!(string_of(&doc), "abc");
    assert_eq!(compositor.current_record(), 0);
}

#[test]
fn left_collapses_a_selection_to_its_start() {
    let mut compositor = TextCompositor::new(64, 16);
    compositor.cursor = TextCursor::new(2, 6);
    compositor.left();
    assert_eq!(compositor.cursor, TextCursor::new(2, 2));
}

#[test]
fn right_collapses_a_selection_to_its_end() {
    let mut compositor = TextCompositor::new(64, 16);
    compositor.cursor = TextCursor::new(2, 6);
    compositor.right();
    assert_eq!(compositor.cursor, TextCursor::new(6, 6));
}

#[test]
fn word_start_and_end_scan_across_whitespace() {
    let doc = codepoints("foo bar baz");
    let mut compositor = TextCompositor::new(64, 16);
    compositor.cursor = TextCursor::new(5, 5);

    compositor.word_start(&doc);
    assert_eq!(compositor.cursor, TextCursor::new(4, 4));

    compositor.cursor = TextCursor::new(5, 5);
    compositor.word_end(&doc);
    assert_eq!(compositor.cursor, TextCursor::new(7, 7));
}

#[test]
fn cut_then_paste_round_trips_through_the_clipboard() {
    let mut doc = codepoints("hello world");
    let mut compositor = TextCompositor::new(64, 16);
    let mut clipboard = TestClipboard::default();
    compositor.cursor = TextCursor::new(0, 4);

    let snapshot = doc.clone();
    compositor.cut(
        &snapshot,
        &mut clipboard,
        |pos, data| insert_into(&mut doc, pos, data),
        |slice| erase_from(&mut doc, slice),
    );
    assert_eq!(string_of(&doc), " world");

    let snapshot = doc.clone();
    compositor.cursor = TextCursor::new(6, 6);
    compositor.paste(
        &snapshot,
        &mut clipboard,
        |pos, data| insert_into(&mut doc, pos, data),
        |slice| erase_from(&mut doc, slice),
    );
    assert_eq!(string_of(&doc), " worldhello");
}

#[test]
fn command_input_text_drives_real_insertion_through_the_dispatcher() {
    let mut doc: Vec<u32> = Vec::new();
    let mut compositor = TextCompositor::new(64, 16);
    let layout = FlatLayout { len: 0 };
    let mut clipboard = TestClipboard::default();

    let snapshot = doc.clone();
    compositor.command(
        &snapshot,
        TextCommand::InputText(codepoints("hi")),
        &layout,
        &mut clipboard,
        |pos, data| insert_into(&mut doc, pos, data),
        |slice| erase_from(&mut doc, slice),
        1,
        Vec2::new(0.0, 0.0),
    );

    assert_eq!(string_of(&doc), "hi");
    assert_eq!(compositor.cursor, TextCursor::new(0, 1));
}

#[test]
fn up_and_down_preserve_horizontal_position_on_a_flat_layout() {
    let doc = codepoints("abcdefgh");
    let layout = FlatLayout { len: doc.len() as u32 };
    let mut compositor = TextCompositor::new(64, 16);
    compositor.cursor = TextCursor::new(3, 3);

    compositor.up(&layout, 1);
    assert_eq!(compositor.cursor, TextCursor::new(3, 3));

    compositor.down(&layout, 1);
    assert_eq!(compositor.cursor, TextCursor::new(3, 3));
}
