// Numeric text parsing for scalar-drag-box-style inputs (spec.md §7
// `InputParseFailure`), grounded on `ScalarDragBox::scalar_parse`
// (`ashura/engine/views/scalar_box.cc`): unparseable or out-of-range text
// is rejected silently, leaving the existing value untouched, rather than
// surfacing an error to the caller.

use std::str::FromStr;

/// Parses `text` as a value of `T` within `[min, max]`. Returns `None` on
/// empty input, a parse failure, or an out-of-range value — the caller
/// should simply keep whatever scalar it already had, exactly as
/// `scalar_parse` leaves `scalar` untouched on any of these.
pub fn parse_scalar<T>(text: &str, min: T, max: T) -> Option<T>
where
    T: FromStr + PartialOrd,
{
    if text.is_empty() {
        return None;
    }
    let value: T = text.trim().parse().ok()?;
    if value < min || value > max {
        return None;
    }
    Some(value)
}
