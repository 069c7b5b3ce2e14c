use crate::{Error, ErrorCode};

/// A positioned byte source over a borrowed, immutable view.
///
/// Every read either consumes exactly the requested bytes or fails without
/// advancing the cursor.
#[derive(Debug, Clone)]
pub struct Source<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Source<'a> {
    /// Create a source positioned at the start of `data`.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// The current cursor position.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Bytes remaining past the cursor.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Seek to an absolute position.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::InvalidUsage`] if `pos` lies past the end of the
    /// underlying view.
    pub fn reset(&mut self, pos: usize) -> Result<(), Error> {
        if pos > self.data.len() {
            return Err(Error::new(ErrorCode::InvalidUsage, self.pos));
        }
        self.pos = pos;
        Ok(())
    }

    /// Consume one byte.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::BufferUnderflow`] if no bytes remain.
    pub fn read_byte(&mut self) -> Result<u8, Error> {
        let b = *self
            .data
            .get(self.pos)
            .ok_or_else(|| Error::new(ErrorCode::BufferUnderflow, self.pos))?;
        self.pos += 1;
        Ok(b)
    }

    /// Consume `n` bytes, returning them as a subslice of the backing view.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::BufferUnderflow`] if fewer than `n` bytes remain;
    /// the cursor does not advance.
    pub fn read_slice(&mut self, n: usize) -> Result<&'a [u8], Error> {
        let end = self
            .pos
            .checked_add(n)
            .ok_or_else(|| Error::new(ErrorCode::BufferUnderflow, self.pos))?;
        if end > self.data.len() {
            return Err(Error::new(ErrorCode::BufferUnderflow, self.pos));
        }
        let s = &self.data[self.pos..end];
        self.pos = end;
        Ok(s)
    }

    /// Fill `out` entirely, or fail without advancing.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::BufferUnderflow`] if fewer than `out.len()` bytes
    /// remain.
    pub fn read_exact(&mut self, out: &mut [u8]) -> Result<(), Error> {
        let s = self.read_slice(out.len())?;
        out.copy_from_slice(s);
        Ok(())
    }

    /// Run `f`, restoring the cursor to its entry position if it fails.
    ///
    /// This is the rollback scope used by probing decoders (optionals, union
    /// headers) and by the [`decode`](crate::decode) façade.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `f`.
    pub fn scoped<R, F>(&mut self, f: F) -> Result<R, Error>
    where
        F: FnOnce(&mut Self) -> Result<R, Error>,
    {
        let mark = self.pos;
        match f(self) {
            Ok(v) => Ok(v),
            Err(e) => {
                self.pos = mark;
                Err(e)
            }
        }
    }
}

impl<'a> From<&'a [u8]> for Source<'a> {
    fn from(data: &'a [u8]) -> Self {
        Self::new(data)
    }
}
