// A simple stack-based text compositor.
//
// The compositor never owns or mutates the document text itself — every
// edit goes through the caller-supplied `insert`/`erase` callbacks, so the
// same logic works whether the buffer lives in a `Vec<char>`, a rope, or a
// widget-specific gap buffer. This mirrors the teacher crate's convention
// of keeping GPU/device mutation behind callback seams (see
// `thundr`'s `GpuTaskQueue`) rather than reaching into caller state.

use crate::cursor::{Slice, TextCursor};
use crate::commands::{CaretAlignment, Clipboard, TextCommand, TextLayout};
use support::Vec2;

const DEFAULT_WORD_SYMBOLS: [u32; 2] = [' ' as u32, '\t' as u32];
const DEFAULT_LINE_SYMBOLS: [u32; 2] = ['\n' as u32, 0x2029];

/// One entry in the undo/redo ring. `ring_pos` indexes into the
/// compositor's codepoint ring, where the inserted (for an insert record)
/// or erased (for an erase record) text is held so it can be replayed.
#[derive(Debug, Copy, Clone)]
struct EditRecord {
    doc_pos: u32,
    ring_pos: u32,
    num: u32,
    is_insert: bool,
}

impl Default for EditRecord {
    fn default() -> Self {
        Self {
            doc_pos: 0,
            ring_pos: 0,
            num: 0,
            is_insert: false,
        }
    }
}

pub struct TextCompositor {
    pub cursor: TextCursor,

    /// Power-of-two codepoint ring backing every record's stored text.
    buffer: Vec<u32>,
    buffer_mask: u32,
    buffer_head: u32,

    /// Power-of-two ring of edit records.
    records: Vec<EditRecord>,
    records_mask: u32,

    /// Monotonic counts of records created/applied. `current_record` is the
    /// index of the last-applied record (0 = no records applied yet);
    /// `latest_record` bounds how far `Redo` may walk forward.
    current_record: u32,
    latest_record: u32,

    word_symbols: Vec<u32>,
    line_symbols: Vec<u32>,
}

impl TextCompositor {
    /// `num_buffer_codepoints` and `num_records` must both be a strictly
    /// positive power of two; this is an init-time contract violation, not
    /// a recoverable error (spec.md §7, BufferOverflow: "enforced ...
    /// violation aborts at init").
    pub fn new(num_buffer_codepoints: u32, num_records: u32) -> Self {
        assert!(num_buffer_codepoints > 0, "text ring buffer must be non-empty");
        assert!(num_records > 0, "text record ring must be non-empty");
        assert!(
            num_buffer_codepoints.is_power_of_two(),
            "text ring buffer size must be a power of two"
        );
        assert!(
            num_records.is_power_of_two(),
            "text record ring size must be a power of two"
        );

        Self {
            cursor: TextCursor::default(),
            buffer: vec![0; num_buffer_codepoints as usize],
            buffer_mask: num_buffer_codepoints - 1,
            buffer_head: 0,
            records: vec![EditRecord::default(); num_records as usize],
            records_mask: num_records - 1,
            current_record: 0,
            latest_record: 0,
            word_symbols: DEFAULT_WORD_SYMBOLS.to_vec(),
            line_symbols: DEFAULT_LINE_SYMBOLS.to_vec(),
        }
    }

    pub fn set_word_symbols(&mut self, symbols: Vec<u32>) {
        self.word_symbols = symbols;
    }

    pub fn set_line_symbols(&mut self, symbols: Vec<u32>) {
        self.line_symbols = symbols;
    }

    pub fn current_record(&self) -> u32 {
        self.current_record
    }

    pub fn latest_record(&self) -> u32 {
        self.latest_record
    }

    fn ring_write(&mut self, start: u32, data: &[u32]) {
        for (i, &cp) in data.iter().enumerate() {
            let pos = (start.wrapping_add(i as u32)) & self.buffer_mask;
            self.buffer[pos as usize] = cp;
        }
    }

    fn ring_read(&self, start: u32, num: u32) -> Vec<u32> {
        (0..num)
            .map(|i| self.buffer[((start.wrapping_add(i)) & self.buffer_mask) as usize])
            .collect()
    }

    fn record_at(&self, idx: u32) -> EditRecord {
        self.records[((idx - 1) & self.records_mask) as usize]
    }

    /// Advances `current`, writes `segment` into the ring (potentially
    /// evicting the oldest record), and invalidates any redo-able tail.
    fn append_record(&mut self, is_insert: bool, doc_pos: u32, segment: &[u32]) {
        let ring_pos = self.buffer_head;
        self.ring_write(ring_pos, segment);
        self.buffer_head = (self.buffer_head.wrapping_add(segment.len() as u32)) & self.buffer_mask;

        self.current_record += 1;
        let slot = ((self.current_record - 1) & self.records_mask) as usize;
        self.records[slot] = EditRecord {
            doc_pos,
            ring_pos,
            num: segment.len() as u32,
            is_insert,
        };
        self.latest_record = self.current_record;
    }

    pub fn undo(&mut self, mut insert: impl FnMut(u32, &[u32]), mut erase: impl FnMut(Slice)) {
        if self.current_record == 0 {
            return;
        }
        let rec = self.record_at(self.current_record);
        if rec.is_insert {
            erase(Slice::new(rec.doc_pos, rec.num));
        } else {
            let data = self.ring_read(rec.ring_pos, rec.num);
            insert(rec.doc_pos, &data);
        }
        self.current_record -= 1;
    }

    pub fn redo(&mut self, mut insert: impl FnMut(u32, &[u32]), mut erase: impl FnMut(Slice)) {
        if self.current_record >= self.latest_record {
            return;
        }
        self.current_record += 1;
        let rec = self.record_at(self.current_record);
        if rec.is_insert {
            let data = self.ring_read(rec.ring_pos, rec.num);
            insert(rec.doc_pos, &data);
        } else {
            erase(Slice::new(rec.doc_pos, rec.num));
        }
    }

    /// Erases the current selection, recording it so it can be restored by
    /// `undo`. No-op if the selection is empty (spec.md §7: "an editing
    /// command against an empty document is a no-op").
    pub fn delete_selection(&mut self, text: &[u32], mut erase: impl FnMut(Slice)) {
        if self.cursor.is_empty() {
            return;
        }
        let slice = self.cursor.as_slice(text.len() as u32);
        if slice.span == 0 {
            return;
        }
        let erased = text[slice.offset as usize..slice.end() as usize].to_vec();
        self.append_record(false, slice.offset, &erased);
        erase(slice);
        self.cursor = TextCursor::new(slice.offset as i64, slice.offset as i64);
    }

    pub fn back_space(
        &mut self,
        text: &[u32],
        insert: impl FnMut(u32, &[u32]),
        mut erase: impl FnMut(Slice),
    ) {
        let _ = &insert;
        if !self.cursor.is_empty() {
            self.delete_selection(text, erase);
            return;
        }
        let pos = self.cursor.first.clamp(0, text.len() as i64) as u32;
        if pos == 0 {
            return;
        }
        let erased = [text[(pos - 1) as usize]];
        self.append_record(false, pos - 1, &erased);
        erase(Slice::new(pos - 1, 1));
        self.cursor = TextCursor::new((pos - 1) as i64, (pos - 1) as i64);
    }

    pub fn delete(
        &mut self,
        text: &[u32],
        insert: impl FnMut(u32, &[u32]),
        mut erase: impl FnMut(Slice),
    ) {
        let _ = &insert;
        if !self.cursor.is_empty() {
            self.delete_selection(text, erase);
            return;
        }
        let pos = self.cursor.first.clamp(0, text.len() as i64) as u32;
        if pos >= text.len() as u32 {
            return;
        }
        let erased = [text[pos as usize]];
        self.append_record(false, pos, &erased);
        erase(Slice::new(pos, 1));
        self.cursor = TextCursor::new(pos as i64, pos as i64);
    }

    /// IME text input: replaces the current selection (if any) with `input`
    /// and selects the freshly-inserted text, matching the way IME preedit
    /// commits are expected to land (spec.md §8 scenario 2).
    pub fn input_text(
        &mut self,
        text: &[u32],
        input: &[u32],
        mut insert: impl FnMut(u32, &[u32]),
        mut erase: impl FnMut(Slice),
    ) {
        let len = text.len() as u32;
        let slice = self.cursor.as_slice(len);
        let pos = if !self.cursor.is_empty() && slice.span > 0 {
            let erased = text[slice.offset as usize..slice.end() as usize].to_vec();
            self.append_record(false, slice.offset, &erased);
            erase(slice);
            slice.offset
        } else {
            self.cursor.first.clamp(0, len as i64) as u32
        };

        if !input.is_empty() {
            self.append_record(true, pos, input);
            insert(pos, input);
        }

        self.cursor = TextCursor::from_slice(Slice::new(pos, input.len() as u32));
    }

    fn scan_back(text: &[u32], from: usize, symbols: &[u32]) -> usize {
        let mut i = from.min(text.len());
        while i > 0 && !symbols.contains(&text[i - 1]) {
            i -= 1;
        }
        i
    }

    fn scan_fwd(text: &[u32], from: usize, symbols: &[u32]) -> usize {
        let mut i = from.min(text.len());
        while i < text.len() && !symbols.contains(&text[i]) {
            i += 1;
        }
        i
    }

    pub fn select_codepoint(&mut self) {
        self.cursor = TextCursor::new(self.cursor.last, self.cursor.last);
    }

    pub fn select_word(&mut self, text: &[u32]) {
        let anchor = self.cursor.last.clamp(0, text.len() as i64) as usize;
        let start = Self::scan_back(text, anchor, &self.word_symbols);
        let end = Self::scan_fwd(text, anchor, &self.word_symbols);
        let last = end.saturating_sub(1).max(start);
        self.cursor = TextCursor::new(start as i64, last as i64);
    }

    pub fn select_line(&mut self, text: &[u32]) {
        let anchor = self.cursor.last.clamp(0, text.len() as i64) as usize;
        let start = Self::scan_back(text, anchor, &self.line_symbols);
        let end = Self::scan_fwd(text, anchor, &self.line_symbols);
        let last = end.saturating_sub(1).max(start);
        self.cursor = TextCursor::new(start as i64, last as i64);
    }

    pub fn select_all(&mut self, text: &[u32]) {
        if text.is_empty() {
            self.cursor = TextCursor::new(0, 0);
            return;
        }
        self.cursor = TextCursor::new(0, (text.len() - 1) as i64);
    }

    pub fn unselect(&mut self) {
        self.cursor = self.cursor.to_end();
    }

    pub fn escape(&mut self) {
        self.cursor = self.cursor.escape();
    }

    pub fn left(&mut self) {
        self.cursor = if !self.cursor.is_empty() {
            self.cursor.to_begin()
        } else {
            self.cursor.translated(-1)
        };
    }

    pub fn right(&mut self) {
        self.cursor = if !self.cursor.is_empty() {
            self.cursor.to_end()
        } else {
            self.cursor.translated(1)
        };
    }

    pub fn select_left(&mut self) {
        self.cursor = self.cursor.selected(-1);
    }

    pub fn select_right(&mut self) {
        self.cursor = self.cursor.selected(1);
    }

    pub fn word_start(&mut self, text: &[u32]) {
        let from = self.cursor.last.clamp(0, text.len() as i64) as usize;
        let start = Self::scan_back(text, from, &self.word_symbols);
        self.cursor = TextCursor::new(start as i64, start as i64);
    }

    pub fn word_end(&mut self, text: &[u32]) {
        let from = self.cursor.last.clamp(0, text.len() as i64) as usize;
        let end = Self::scan_fwd(text, from, &self.word_symbols);
        self.cursor = TextCursor::new(end as i64, end as i64);
    }

    pub fn select_word_start(&mut self, text: &[u32]) {
        let from = self.cursor.last.clamp(0, text.len() as i64) as usize;
        let start = Self::scan_back(text, from, &self.word_symbols);
        self.cursor = TextCursor::new(self.cursor.first, start as i64);
    }

    pub fn select_word_end(&mut self, text: &[u32]) {
        let from = self.cursor.last.clamp(0, text.len() as i64) as usize;
        let end = Self::scan_fwd(text, from, &self.word_symbols);
        self.cursor = TextCursor::new(self.cursor.first, end as i64);
    }

    pub fn line_start(&mut self, text: &[u32]) {
        let from = self.cursor.last.clamp(0, text.len() as i64) as usize;
        let start = Self::scan_back(text, from, &self.line_symbols);
        self.cursor = TextCursor::new(start as i64, start as i64);
    }

    pub fn line_end(&mut self, text: &[u32]) {
        let from = self.cursor.last.clamp(0, text.len() as i64) as usize;
        let end = Self::scan_fwd(text, from, &self.line_symbols);
        self.cursor = TextCursor::new(end as i64, end as i64);
    }

    pub fn select_line_start(&mut self, text: &[u32]) {
        let from = self.cursor.last.clamp(0, text.len() as i64) as usize;
        let start = Self::scan_back(text, from, &self.line_symbols);
        self.cursor = TextCursor::new(self.cursor.first, start as i64);
    }

    pub fn select_line_end(&mut self, text: &[u32]) {
        let from = self.cursor.last.clamp(0, text.len() as i64) as usize;
        let end = Self::scan_fwd(text, from, &self.line_symbols);
        self.cursor = TextCursor::new(self.cursor.first, end as i64);
    }

    fn vertical_target(&self, layout: &dyn TextLayout, lines: i64) -> i64 {
        let cp = self.cursor.last.max(0) as u32;
        let cur_line = layout.line_of(cp) as i64;
        let last_line = layout.line_count().saturating_sub(1) as i64;
        let target_line = (cur_line + lines).clamp(0, last_line) as u32;
        let x = layout.caret_position(cp, CaretAlignment::Left).x;
        let target_line_start = layout.line_range(target_line).offset;
        let y = layout
            .caret_position(target_line_start, CaretAlignment::Left)
            .y;
        let (hit_cp, _) = layout.hit(Vec2::new(x, y));
        hit_cp
    }

    pub fn up(&mut self, layout: &dyn TextLayout, lines: u32) {
        let cp = self.vertical_target(layout, -(lines as i64));
        self.cursor = TextCursor::new(cp, cp);
    }

    pub fn down(&mut self, layout: &dyn TextLayout, lines: u32) {
        let cp = self.vertical_target(layout, lines as i64);
        self.cursor = TextCursor::new(cp, cp);
    }

    pub fn select_up(&mut self, layout: &dyn TextLayout, lines: u32) {
        let cp = self.vertical_target(layout, -(lines as i64));
        self.cursor = TextCursor::new(self.cursor.first, cp);
    }

    pub fn select_down(&mut self, layout: &dyn TextLayout, lines: u32) {
        let cp = self.vertical_target(layout, lines as i64);
        self.cursor = TextCursor::new(self.cursor.first, cp);
    }

    pub fn goto_line(&mut self, layout: &dyn TextLayout, line: u32) {
        let x = layout
            .caret_position(self.cursor.last.max(0) as u32, CaretAlignment::Left)
            .x;
        let clamped = line.min(layout.line_count().saturating_sub(1));
        let line_start = layout.line_range(clamped).offset;
        let y = layout.caret_position(line_start, CaretAlignment::Left).y;
        let (cp, _) = layout.hit(Vec2::new(x, y));
        self.cursor = TextCursor::new(cp, cp);
    }

    pub fn hit_codepoint(&mut self, layout: &dyn TextLayout, pos: Vec2) {
        let (cp, _) = layout.hit(pos);
        self.cursor = TextCursor::new(cp, cp);
    }

    pub fn hit_word(&mut self, text: &[u32], layout: &dyn TextLayout, pos: Vec2) {
        let (cp, _) = layout.hit(pos);
        let anchor = cp.clamp(0, text.len() as i64) as usize;
        let start = Self::scan_back(text, anchor, &self.word_symbols);
        let end = Self::scan_fwd(text, anchor, &self.word_symbols);
        let last = end.saturating_sub(1).max(start);
        self.cursor = TextCursor::new(start as i64, last as i64);
    }

    pub fn hit_line(&mut self, text: &[u32], layout: &dyn TextLayout, pos: Vec2) {
        let (cp, _) = layout.hit(pos);
        let anchor = cp.clamp(0, text.len() as i64) as usize;
        let start = Self::scan_back(text, anchor, &self.line_symbols);
        let end = Self::scan_fwd(text, anchor, &self.line_symbols);
        let last = end.saturating_sub(1).max(start);
        self.cursor = TextCursor::new(start as i64, last as i64);
    }

    pub fn hit_all(&mut self, text: &[u32], _layout: &dyn TextLayout, _pos: Vec2) {
        self.select_all(text);
    }

    /// Extends `cursor.last` to the hit codepoint, leaving `first` pinned.
    /// Source behavior for `Drag` outside an active selection is
    /// underspecified; this is the adopted convention (spec.md §9).
    pub fn drag(&mut self, layout: &dyn TextLayout, pos: Vec2) {
        let (cp, _) = layout.hit(pos);
        self.cursor = TextCursor::new(self.cursor.first, cp);
    }

    pub fn copy(&mut self, text: &[u32], clipboard: &mut dyn Clipboard) {
        let slice = self.cursor.as_slice(text.len() as u32);
        let s: String = text[slice.offset as usize..slice.end() as usize]
            .iter()
            .filter_map(|&cp| char::from_u32(cp))
            .collect();
        clipboard.set(s.as_bytes());
    }

    pub fn cut(
        &mut self,
        text: &[u32],
        clipboard: &mut dyn Clipboard,
        insert: impl FnMut(u32, &[u32]),
        erase: impl FnMut(Slice),
    ) {
        let _ = &insert;
        self.copy(text, clipboard);
        self.delete_selection(text, erase);
    }

    pub fn paste(
        &mut self,
        text: &[u32],
        clipboard: &mut dyn Clipboard,
        insert: impl FnMut(u32, &[u32]),
        erase: impl FnMut(Slice),
    ) {
        let bytes = clipboard.get();
        let s = String::from_utf8_lossy(&bytes);
        let codepoints: Vec<u32> = s.chars().map(|c| c as u32).collect();
        self.input_text(text, &codepoints, insert, erase);
    }

    /// Dispatches a single command. `layout` is required by the navigation
    /// commands that need line geometry (`Up`/`Down`/`PageUp`/`PageDown`/
    /// the `Hit*`/`Drag` family); pass a degenerate single-line layout for
    /// plain-text fields that never wrap.
    #[allow(clippy::too_many_arguments)]
    pub fn command(
        &mut self,
        text: &[u32],
        cmd: TextCommand,
        layout: &dyn TextLayout,
        clipboard: &mut dyn Clipboard,
        mut insert: impl FnMut(u32, &[u32]),
        mut erase: impl FnMut(Slice),
        lines_per_page: u32,
        pos: Vec2,
    ) {
        match cmd {
            TextCommand::None => {}
            TextCommand::Escape => self.escape(),
            TextCommand::BackSpace => self.back_space(text, &mut insert, &mut erase),
            TextCommand::Delete => self.delete(text, &mut insert, &mut erase),
            TextCommand::Left => self.left(),
            TextCommand::Right => self.right(),
            TextCommand::Up => self.up(layout, 1),
            TextCommand::Down => self.down(layout, 1),
            TextCommand::WordStart => self.word_start(text),
            TextCommand::WordEnd => self.word_end(text),
            TextCommand::LineStart => self.line_start(text),
            TextCommand::LineEnd => self.line_end(text),
            TextCommand::PageUp => self.up(layout, lines_per_page),
            TextCommand::PageDown => self.down(layout, lines_per_page),
            TextCommand::SelectLeft => self.select_left(),
            TextCommand::SelectRight => self.select_right(),
            TextCommand::SelectUp => self.select_up(layout, 1),
            TextCommand::SelectDown => self.select_down(layout, 1),
            TextCommand::SelectWordStart => self.select_word_start(text),
            TextCommand::SelectWordEnd => self.select_word_end(text),
            TextCommand::SelectLineStart => self.select_line_start(text),
            TextCommand::SelectLineEnd => self.select_line_end(text),
            TextCommand::SelectPageUp => self.select_up(layout, lines_per_page),
            TextCommand::SelectPageDown => self.select_down(layout, lines_per_page),
            TextCommand::SelectCodepoint => self.select_codepoint(),
            TextCommand::SelectWord => self.select_word(text),
            TextCommand::SelectLine => self.select_line(text),
            TextCommand::SelectAll => self.select_all(text),
            TextCommand::Cut => self.cut(text, clipboard, &mut insert, &mut erase),
            TextCommand::Copy => self.copy(text, clipboard),
            TextCommand::Paste => self.paste(text, clipboard, &mut insert, &mut erase),
            TextCommand::Undo => self.undo(&mut insert, &mut erase),
            TextCommand::Redo => self.redo(&mut insert, &mut erase),
            TextCommand::HitCodepoint => self.hit_codepoint(layout, pos),
            TextCommand::HitWord => self.hit_word(text, layout, pos),
            TextCommand::HitLine => self.hit_line(text, layout, pos),
            TextCommand::HitAll => self.hit_all(text, layout, pos),
            TextCommand::Drag => self.drag(layout, pos),
            TextCommand::InputText(codepoints) => self.input_text(text, &codepoints, &mut insert, &mut erase),
            TextCommand::NewLine => self.input_text(text, &['\n' as u32], &mut insert, &mut erase),
            TextCommand::Tab => self.input_text(text, &['\t' as u32], &mut insert, &mut erase),
            TextCommand::Submit => {}
            TextCommand::Unselect => self.unselect(),
        }
    }
}
