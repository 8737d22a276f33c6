//! assembling and splitting command lines
//!
use heapless::Vec;

/// longest command line accepted
pub const LINE_SIZE: usize = 64;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LineError {
    TooLong,
    NotUtf8,
}

/// Collects serial bytes until a line terminator
pub struct LineBuffer {
    buf: Vec<u8, LINE_SIZE>,
    overflow: bool,
}

impl LineBuffer {
    pub const fn new() -> LineBuffer {
        LineBuffer {
            buf: Vec::new(),
            overflow: false,
        }
    }

    /// returns true when `byte` ends a non-empty line, the line stays
    /// available through `line` until `clear`
    pub fn push(&mut self, byte: u8) -> bool {
        match byte {
            b'\r' | b'\n' => !self.buf.is_empty() || self.overflow,
            _ => {
                if self.buf.push(byte).is_err() {
                    self.overflow = true;
                }
                false
            }
        }
    }

    pub fn line(&self) -> Result<&str, LineError> {
        if self.overflow {
            return Err(LineError::TooLong);
        }
        core::str::from_utf8(&self.buf).map_err(|_| LineError::NotUtf8)
    }

    pub fn clear(&mut self) {
        self.buf.clear();
        self.overflow = false;
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        LineBuffer::new()
    }
}

//==========================================================

/// Tokens of a line, separated by spaces and '='. A token starting with a
/// single quote runs to the closing quote, delimiters included.
pub struct Tokens<'a> {
    rest: &'a str,
}

pub fn tokens(line: &str) -> Tokens<'_> {
    Tokens { rest: line }
}

fn is_delimiter(c: char) -> bool {
    c == ' ' || c == '=' || c == '\t'
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let rest = self.rest.trim_start_matches(is_delimiter);
        if rest.is_empty() {
            self.rest = rest;
            return None;
        }
        if let Some(quoted) = rest.strip_prefix('\'') {
            // an unterminated quote runs to the end of the line
            let end = quoted.find('\'').unwrap_or_else(|| quoted.len());
            self.rest = quoted.get(end + 1..).unwrap_or("");
            Some(&quoted[..end])
        } else {
            let end = rest.find(is_delimiter).unwrap_or_else(|| rest.len());
            self.rest = &rest[end..];
            Some(&rest[..end])
        }
    }
}

/// command keyword and optional value of a line, `None` for a blank line
pub fn split_command(line: &str) -> Option<(&str, Option<&str>)> {
    let mut tokens = tokens(line);
    let command = tokens.next()?;
    Some((command, tokens.next()))
}
