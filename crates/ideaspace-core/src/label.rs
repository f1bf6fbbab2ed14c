//! Display truncation for idea labels.
//!
//! Labels are arbitrary sentences; views show a bounded prefix. Truncation
//! counts terminal display columns and never splits a grapheme cluster.

use std::borrow::Cow;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Column budget used by the viewer for node captions.
pub const DEFAULT_LABEL_WIDTH: usize = 36;

const ELLIPSIS: &str = "…";

/// Fit `label` into `max_width` display columns, appending `…` when cut.
#[must_use]
pub fn display_label(label: &str, max_width: usize) -> Cow<'_, str> {
    if label.width() <= max_width {
        return Cow::Borrowed(label);
    }
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    let budget = max_width - ELLIPSIS.width();
    let mut used = 0;
    let mut out = String::with_capacity(max_width + ELLIPSIS.len());
    for grapheme in label.graphemes(true) {
        let w = grapheme.width();
        if used + w > budget {
            break;
        }
        used += w;
        out.push_str(grapheme);
    }
    out.truncate(out.trim_end().len());
    out.push_str(ELLIPSIS);
    Cow::Owned(out)
}
