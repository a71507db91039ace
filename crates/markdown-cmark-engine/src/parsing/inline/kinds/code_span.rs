use std::collections::HashMap;

/// Backtick code spans.
///
/// A span opens with a run of backticks and closes at the next run of the
/// same length. Nothing inside is parsed further.
pub struct CodeSpan;

impl CodeSpan {
    /// The backtick character that delimits code spans.
    pub const TICK: u8 = b'`';

    /// Length of the backtick run at the start of `s`.
    pub fn run_length(s: &str) -> usize {
        s.bytes().take_while(|&b| b == Self::TICK).count()
    }

    /// Finds the closing run for an opener of `ticks` backticks in `s` (the
    /// text after the opener). Returns `(content end, span end)`.
    pub fn find_closing(s: &str, ticks: usize) -> Option<(usize, usize)> {
        let mut i = 0;
        while let Some(found) = s[i..].find('`') {
            let start = i + found;
            let run = Self::run_length(&s[start..]);
            i = start + run;
            if run == ticks {
                return Some((start, i));
            }
        }
        None
    }

    /// Normalizes span content: line endings become spaces and one
    /// surrounding space is stripped when both ends have one and the content
    /// is not all spaces.
    pub fn content(raw: &str) -> String {
        let content = raw.replace('\n', " ");
        let bytes = content.as_bytes();
        if bytes.len() >= 2
            && bytes[0] == b' '
            && bytes[bytes.len() - 1] == b' '
            && bytes.iter().any(|&b| b != b' ')
        {
            return content[1..content.len() - 1].to_string();
        }
        content
    }
}

/// Start offsets of the last backtick run of each length in a subject.
///
/// Built lazily, the first time an opener finds no closer. After that an
/// opener only searches when a run of its length starts further right, so
/// a line of unmatched openers is not rescanned once per opener.
#[derive(Debug, Default)]
pub struct BacktickRuns {
    last_start: Option<HashMap<usize, usize>>,
}

impl BacktickRuns {
    /// Records every maximal backtick run in `subject`. Does nothing once
    /// the index exists.
    pub fn index(&mut self, subject: &str) {
        if self.last_start.is_some() {
            return;
        }
        let mut last_start = HashMap::new();
        let mut i = 0;
        while let Some(found) = subject[i..].find('`') {
            let start = i + found;
            let run = CodeSpan::run_length(&subject[start..]);
            last_start.insert(run, start);
            i = start + run;
        }
        self.last_start = Some(last_start);
    }

    /// True when the index shows no run of exactly `ticks` backticks starts
    /// at or after `from`. Always false before indexing.
    pub fn rules_out(&self, ticks: usize, from: usize) -> bool {
        self.last_start
            .as_ref()
            .is_some_and(|runs| runs.get(&ticks).is_none_or(|&start| start < from))
    }
}
