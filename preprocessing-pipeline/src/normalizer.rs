//! Lossy text normalization applied before tokenization.
//!
//! Lowercases, drops every character outside `a-z` and whitespace (accented
//! letters included, so `"café"` becomes `"caf"`), then collapses runs of three or
//! more identical characters down to two (`"sooo"` becomes `"soo"`, while
//! `"good"` is left alone).

/// Longest run of one character kept by [`normalize`].
const MAX_REPEAT: usize = 2;

pub fn normalize(raw: &str) -> String {
    let filtered = raw
        .to_lowercase()
        .chars()
        .filter(|ch| ch.is_ascii_lowercase() || ch.is_whitespace())
        .collect::<String>();

    collapse_repeats(&filtered)
}

fn collapse_repeats(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous: Option<char> = None;
    let mut run = 0usize;

    for ch in text.chars() {
        if previous == Some(ch) {
            run = run.saturating_add(1);
        } else {
            previous = Some(ch);
            run = 1;
        }
        if run <= MAX_REPEAT {
            out.push(ch);
        }
    }

    out
}
