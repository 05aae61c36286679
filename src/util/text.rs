use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string in terminal columns, Unicode-aware (CJK and
/// emoji are 2 columns, combining marks 0).
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Strip ASCII control characters and C1 controls from a string.
///
/// Forum and group names come from an imported file and end up in raw
/// terminal output; embedded escape sequences must not survive. Tabs and
/// newlines are stripped too, names are single-line.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if s.chars().all(|c| !c.is_control()) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(s.chars().filter(|c| !c.is_control()).collect())
}

/// Ellipsis used when a name is truncated to fit the terminal.
const ELLIPSIS: &str = "…";
const ELLIPSIS_WIDTH: usize = 1;

/// Truncate a string to fit within `max_width` terminal columns, appending an
/// ellipsis when text was cut. Width-aware: a CJK character that would
/// straddle the boundary is dropped entirely.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if max_width == 0 {
        return Cow::Borrowed("");
    }
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let target = max_width.saturating_sub(ELLIPSIS_WIDTH);
    let mut width = 0;
    let mut byte_end = 0;
    for (idx, c) in s.char_indices() {
        let char_width = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + char_width > target {
            break;
        }
        width += char_width;
        byte_end = idx + c.len_utf8();
    }
    Cow::Owned(format!("{}{}", &s[..byte_end], ELLIPSIS))
}
