use crate::error::SessionError;
use crate::options::Options;
use crate::tree::Tree;

use super::blocks::BlockBuilder;

/// Lifecycle of a [`Parser`] session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, nothing fed yet.
    Open,
    Feeding,
    /// `finish` has returned the tree; the session accepts nothing more.
    Finished,
}

/// A streaming parse session.
///
/// Text is fed in arbitrary chunks; complete lines are handed to the block
/// builder as soon as their line ending arrives. `finish` closes all open
/// blocks, runs inline parsing and hands over the document.
///
/// A session has a single writer. Independent sessions share nothing and
/// may run on different threads.
pub struct Parser {
    state: SessionState,
    builder: Option<BlockBuilder>,
    /// Text of an incomplete line.
    pending: String,
    /// The last chunk ended in `\r`; a leading `\n` in the next one belongs
    /// to the same line ending.
    pending_cr: bool,
    options: Options,
}

impl Parser {
    pub fn new(options: Options) -> Self {
        log::debug!("parser session created with options {:#x}", options.bits());
        Self {
            state: SessionState::Open,
            builder: Some(BlockBuilder::new(options)),
            pending: String::new(),
            pending_cr: false,
            options,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn options(&self) -> Options {
        self.options
    }

    /// Feeds a chunk of text. Lines may span several chunks; `\n`, `\r\n`
    /// and `\r` all end a line.
    pub fn feed(&mut self, chunk: &str) -> Result<(), SessionError> {
        self.ensure_open("feed")?;
        self.state = SessionState::Feeding;

        let mut rest = chunk;
        if std::mem::take(&mut self.pending_cr) {
            rest = rest.strip_prefix('\n').unwrap_or(rest);
        }
        while let Some(i) = rest.find(['\r', '\n']) {
            self.pending.push_str(&rest[..i]);
            self.flush_line();
            let mut next = i + 1;
            if rest.as_bytes()[i] == b'\r' {
                match rest.as_bytes().get(next) {
                    Some(b'\n') => next += 1,
                    None => self.pending_cr = true,
                    Some(_) => {}
                }
            }
            rest = &rest[next..];
        }
        self.pending.push_str(rest);
        Ok(())
    }

    /// Feeds one line. A line without a trailing line ending is terminated,
    /// so `feed_line("")` adds a blank line. A trailing `\r` ends the line
    /// on its own: a `\n` opening the next call starts a new line.
    pub fn feed_line(&mut self, line: &str) -> Result<(), SessionError> {
        self.feed(line)?;
        if !line.ends_with(['\n', '\r']) {
            self.flush_line();
        }
        self.pending_cr = false;
        Ok(())
    }

    /// Completes the document. Text after the last line ending counts as a
    /// final line.
    pub fn finish(&mut self) -> Result<Tree, SessionError> {
        self.ensure_open("finish")?;
        if !self.pending.is_empty() {
            self.flush_line();
        }
        self.state = SessionState::Finished;
        let builder = self.builder.take().ok_or(SessionError::Finished)?;
        let lines = builder.line_number();
        let tree = builder.finish();
        log::debug!("parser session finished after {lines} lines");
        Ok(tree)
    }

    fn ensure_open(&self, operation: &str) -> Result<(), SessionError> {
        if self.state == SessionState::Finished {
            log::debug!("rejected {operation} on a finished parser session");
            return Err(SessionError::Finished);
        }
        Ok(())
    }

    fn flush_line(&mut self) {
        if let Some(builder) = self.builder.as_mut() {
            builder.push(&self.pending);
        }
        self.pending.clear();
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(Options::DEFAULT)
    }
}

/// Splits `source` at `\n`, `\r\n` and `\r`. A final line ending does not
/// start another line.
pub fn lines(source: &str) -> impl Iterator<Item = &str> {
    let mut rest = source;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let (line, next) = match rest.find(['\r', '\n']) {
            Some(i) if rest[i..].starts_with("\r\n") => (&rest[..i], &rest[i + 2..]),
            Some(i) => (&rest[..i], &rest[i + 1..]),
            None => (rest, ""),
        };
        rest = next;
        Some(line)
    })
}

/// Parses a complete document in one go.
pub fn parse_document(source: &str, options: Options) -> Tree {
    let mut builder = BlockBuilder::new(options);
    for line in lines(source) {
        builder.push(line);
    }
    builder.finish()
}
