// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::str::FromStr;

/// Extension methods for ASCII-subset only operations.
pub(crate) trait ByteExt {
    /// Checks if a byte is a numeric sign.
    fn is_sign(&self) -> bool;

    /// Checks if a byte is a digit.
    ///
    /// `[0-9]`
    fn is_digit(&self) -> bool;

    /// Checks if a byte is a space.
    ///
    /// `[ \r\n\t]`
    fn is_space(&self) -> bool;

    /// Checks if a byte can start a number.
    fn is_number_start(&self) -> bool;
}

impl ByteExt for u8 {
    #[inline]
    fn is_sign(&self) -> bool {
        matches!(*self, b'+' | b'-')
    }

    #[inline]
    fn is_digit(&self) -> bool {
        matches!(*self, b'0'..=b'9')
    }

    #[inline]
    fn is_space(&self) -> bool {
        matches!(*self, b' ' | b'\t' | b'\n' | b'\r')
    }

    #[inline]
    fn is_number_start(&self) -> bool {
        self.is_digit() || self.is_sign() || *self == b'.'
    }
}

/// A streaming text parsing interface.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Stream<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> From<&'a str> for Stream<'a> {
    #[inline]
    fn from(text: &'a str) -> Self {
        Stream { text, pos: 0 }
    }
}

impl<'a> Stream<'a> {
    /// Returns the current position in bytes.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Checks if the stream is reached the end.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Returns a byte from a current stream position.
    #[inline]
    pub fn curr_byte(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    /// Returns a char from a current stream position.
    ///
    /// Unlike `curr_byte`, respects multibyte sequences.
    #[inline]
    pub fn curr_char(&self) -> Option<char> {
        self.text.get(self.pos..).and_then(|s| s.chars().next())
    }

    #[inline]
    pub fn is_curr_byte_eq(&self, c: u8) -> bool {
        self.curr_byte() == Some(c)
    }

    #[inline]
    pub fn advance(&mut self, n: usize) {
        debug_assert!(self.pos + n <= self.text.len());
        self.pos += n;
    }

    pub fn skip_spaces(&mut self) {
        while self.curr_byte().map_or(false, |c| c.is_space()) {
            self.advance(1);
        }
    }

    /// Skips spaces and a single optional comma.
    pub fn skip_separator(&mut self) {
        self.skip_spaces();
        if self.is_curr_byte_eq(b',') {
            self.advance(1);
        }
        self.skip_spaces();
    }

    fn skip_digits(&mut self) {
        while self.curr_byte().map_or(false, |c| c.is_digit()) {
            self.advance(1);
        }
    }

    /// Parses a number.
    ///
    /// Leading spaces are skipped. On failure the position is left at the
    /// first non-space byte, so it can be reported.
    ///
    /// A sign or a second decimal point terminates the number,
    /// so `10-5` and `.5.5` are both two numbers.
    pub fn parse_number(&mut self) -> Option<f64> {
        self.skip_spaces();
        let start = self.pos;

        if self.curr_byte().map_or(false, |c| c.is_sign()) {
            self.advance(1);
        }

        let int_start = self.pos;
        self.skip_digits();
        let mut has_digits = self.pos > int_start;

        if self.is_curr_byte_eq(b'.') {
            self.advance(1);
            let frac_start = self.pos;
            self.skip_digits();
            has_digits |= self.pos > frac_start;
        }

        if !has_digits {
            self.pos = start;
            return None;
        }

        if let Some(b'e' | b'E') = self.curr_byte() {
            let exp_start = self.pos;
            self.advance(1);
            if self.curr_byte().map_or(false, |c| c.is_sign()) {
                self.advance(1);
            }

            if self.curr_byte().map_or(false, |c| c.is_digit()) {
                self.skip_digits();
            } else {
                // Not an exponent, like in `5em`.
                self.pos = exp_start;
            }
        }

        match f64::from_str(&self.text[start..self.pos]) {
            Ok(n) if n.is_finite() => Some(n),
            _ => {
                self.pos = start;
                None
            }
        }
    }

    /// Parses a number followed by an optional list separator.
    pub fn parse_list_number(&mut self) -> Option<f64> {
        let n = self.parse_number()?;
        self.skip_separator();
        Some(n)
    }
}
