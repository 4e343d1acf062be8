// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Utility functions for emoji-dump.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Force a string to exactly `width` display columns.
///
/// Short strings are padded with spaces. Long ones are cut and end in
/// `...`, so the progress line does not jump around as names change.
///
/// # Examples
///
/// ```
/// use emoji_dump::utils::fit_to_width;
///
/// assert_eq!(fit_to_width("parrot", 8), "parrot  ");
/// assert_eq!(fit_to_width("party_parrot", 8), "party...");
/// ```
pub fn fit_to_width(s: &str, width: usize) -> String {
    let current = UnicodeWidthStr::width(s);
    if current <= width {
        return format!("{}{}", s, " ".repeat(width - current));
    }

    let budget = width.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(ch);
        used += w;
    }
    // A wide char that didn't fit leaves a gap; pad it so columns stay put.
    out.push_str(&" ".repeat(budget - used));
    out.push_str(&"...".chars().take(width).collect::<String>());
    out
}
