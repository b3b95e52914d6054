//! Line reader with a single slot of pushback.
//!
//! The aggregator only learns that a period has ended by reading the first
//! line of the next one. That line is handed back with [`PushbackReader::push_back`]
//! and delivered again by the following [`PushbackReader::next_line`].

use std::io::BufRead;
use thiserror::Error;

/// Errors produced by the reader.
#[derive(Error, Debug)]
pub enum ReaderError {
    /// The caller broke the pushback contract. Always a bug in the caller.
    #[error("protocol error: {0}")]
    Protocol(&'static str),

    /// The underlying source failed.
    #[error("I/O error reading input: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ReaderError> for sn_common::Error {
    fn from(err: ReaderError) -> Self {
        match err {
            ReaderError::Protocol(msg) => sn_common::Error::Protocol(msg.to_string()),
            ReaderError::Io(e) => sn_common::Error::Io(e),
        }
    }
}

/// State of the lookahead slot.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Cursor {
    /// Nothing delivered yet, or the source is exhausted.
    Empty,
    /// `line` was the last line returned and may be pushed back once.
    Delivered(String),
    /// `line` was pushed back and is the next line to return.
    Rewound(String),
}

/// Forward-only source of non-empty lines with one line of lookahead.
pub struct PushbackReader<R> {
    source: R,
    cursor: Cursor,
    buf: Vec<u8>,
    lines_read: u64,
    exhausted: bool,
}

impl<R: BufRead> PushbackReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            cursor: Cursor::Empty,
            buf: Vec::new(),
            lines_read: 0,
            exhausted: false,
        }
    }

    /// Return the next non-empty line, or `None` at end of input.
    ///
    /// Blank lines (including whitespace-only ones) are skipped. Invalid UTF-8
    /// is replaced rather than reported so a corrupt line reaches the parser
    /// and is skipped there.
    pub fn next_line(&mut self) -> Result<Option<String>, ReaderError> {
        if let Cursor::Rewound(line) = std::mem::replace(&mut self.cursor, Cursor::Empty) {
            self.cursor = Cursor::Delivered(line.clone());
            return Ok(Some(line));
        }

        while !self.exhausted {
            self.buf.clear();
            if self.source.read_until(b'\n', &mut self.buf)? == 0 {
                self.exhausted = true;
                break;
            }
            let raw = String::from_utf8_lossy(&self.buf);
            let line = raw.trim_end_matches(['\n', '\r']);
            if line.trim().is_empty() {
                continue;
            }
            let line = line.to_string();
            self.lines_read += 1;
            self.cursor = Cursor::Delivered(line.clone());
            return Ok(Some(line));
        }

        Ok(None)
    }

    /// Re-deliver the most recently returned line on the next `next_line`.
    ///
    /// Fails if the last line was already pushed back or no line has been
    /// delivered since the last pushback.
    pub fn push_back(&mut self) -> Result<(), ReaderError> {
        match std::mem::replace(&mut self.cursor, Cursor::Empty) {
            Cursor::Delivered(line) => {
                self.cursor = Cursor::Rewound(line);
                Ok(())
            }
            Cursor::Rewound(line) => {
                self.cursor = Cursor::Rewound(line);
                Err(ReaderError::Protocol("cannot push back twice"))
            }
            Cursor::Empty => Err(ReaderError::Protocol("no line to push back")),
        }
    }

    /// True when no further line is available.
    ///
    /// Reads ahead by one line and pushes it back, so a following `next_line`
    /// still sees it.
    pub fn at_end(&mut self) -> Result<bool, ReaderError> {
        if matches!(self.cursor, Cursor::Rewound(_)) {
            return Ok(false);
        }
        match self.next_line()? {
            Some(_) => {
                self.push_back()?;
                Ok(false)
            }
            None => Ok(true),
        }
    }

    /// Number of distinct non-empty lines pulled from the source.
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }
}
