//! Byte cursor shared by the rule scanner and the selector scanner.
//!
//! Every structural character in CSS (`{`, `}`, `;`, `,`, quotes, comment
//! delimiters) is ASCII, so scanning bytes never splits a UTF-8 sequence:
//! continuation bytes are always `>= 0x80` and never match a delimiter.

/// How a quoted string ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StringEnd {
    /// The closing quote was found and consumed.
    Closed,
    /// A raw newline or the end of input came first. The cursor stops in
    /// front of the newline, so line-oriented recovery still sees it.
    Unterminated,
}

pub(crate) struct Cursor<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    pub(crate) fn text(&self) -> &'a str {
        self.text
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn set_pos(&mut self, pos: usize) {
        self.pos = pos.min(self.bytes.len());
    }

    pub(crate) fn len(&self) -> usize {
        self.bytes.len()
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    pub(crate) fn peek(&self) -> u8 {
        self.peek_at(0)
    }

    pub(crate) fn peek_at(&self, offset: usize) -> u8 {
        self.bytes.get(self.pos + offset).copied().unwrap_or(0)
    }

    pub(crate) fn bump(&mut self) {
        if self.pos < self.bytes.len() {
            self.pos += 1;
        }
    }

    pub(crate) fn starts_with(&self, prefix: &[u8]) -> bool {
        self.bytes[self.pos..].starts_with(prefix)
    }

    pub(crate) fn at_comment(&self) -> bool {
        self.peek() == b'/' && self.peek_at(1) == b'*'
    }

    /// Skips a `/* ... */` comment at the cursor.
    ///
    /// Returns `false` if the comment is never closed, leaving the cursor at
    /// the end of input.
    pub(crate) fn skip_comment(&mut self) -> bool {
        self.pos += 2;
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos] == b'*' && self.peek_at(1) == b'/' {
                self.pos += 2;
                return true;
            }
            self.pos += 1;
        }
        false
    }

    /// Skips a quoted string whose opening quote is at the cursor.
    ///
    /// A backslash escapes the following byte, including a newline.
    pub(crate) fn skip_string(&mut self) -> StringEnd {
        let quote = self.bytes[self.pos];
        self.pos += 1;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b if b == quote => {
                    self.pos += 1;
                    return StringEnd::Closed;
                }
                b'\n' | b'\r' | b'\x0c' => return StringEnd::Unterminated,
                b'\\' => {
                    self.pos = (self.pos + 2).min(self.bytes.len());
                }
                _ => self.pos += 1,
            }
        }
        StringEnd::Unterminated
    }

    /// Skips a backslash escape whose `\` is at the cursor.
    ///
    /// The escaped character is consumed with the backslash, so an escaped
    /// quote, comma, or brace is never taken as structure. Before a newline
    /// or the end of input the backslash escapes nothing and is consumed
    /// alone.
    pub(crate) fn skip_escape(&mut self) {
        self.bump();
        match self.text[self.pos..].chars().next() {
            None | Some('\n' | '\r' | '\x0c') => {}
            Some(ch) => self.pos += ch.len_utf8(),
        }
    }

    /// Skips whitespace and comments.
    ///
    /// Returns the start offset of a comment that was never closed, if one
    /// was hit.
    pub(crate) fn skip_trivia(&mut self) -> Option<usize> {
        loop {
            while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if !self.at_comment() {
                return None;
            }
            let start = self.pos;
            if !self.skip_comment() {
                return Some(start);
            }
        }
    }
}
