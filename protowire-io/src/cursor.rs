use core::fmt;

use crate::util::copy_slice;
use crate::Write;

/// The error returned when a [`Cursor`] cannot accept any more bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WriteZero;

impl fmt::Display for WriteZero {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("failed to write whole buffer")
	}
}

#[cfg(feature = "std")]
impl std::error::Error for WriteZero {}

/// A writer over a fixed region of memory.
///
/// Writing past the end of the region copies whatever still fits and then fails
/// with [`WriteZero`]. This makes it a convenient bounded sink, for example to
/// observe how callers deal with a sink that runs out of room.
#[derive(Debug)]
pub struct Cursor<T> {
	buf: T,
	pos: usize,
}

impl<T> Cursor<T> {
	/// Create a new [`Cursor`] from `buf`.
	pub const fn new(buf: T) -> Self {
		Self { buf, pos: 0 }
	}

	/// Get a reference to the buffer.
	pub fn get(&self) -> &T {
		&self.buf
	}

	/// Destruct the [`Cursor`] and get back the buffer.
	pub fn into_inner(self) -> T {
		self.buf
	}

	/// Get the cursor position inside the buffer.
	pub fn pos(&self) -> usize {
		self.pos
	}
}

impl<T: AsRef<[u8]>> Cursor<T> {
	/// Get the part of the buffer that has been written to.
	pub fn filled(&self) -> &[u8] {
		&self.buf.as_ref()[..self.pos]
	}
}

impl<T: AsMut<[u8]>> Write for Cursor<T> {
	type Error = WriteZero;

	fn write(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
		let dst = &mut self.buf.as_mut()[self.pos..];
		let n = copy_slice(buf, dst);
		self.pos += n;

		if n == buf.len() {
			Ok(())
		} else {
			Err(WriteZero)
		}
	}

	fn flush(&mut self) -> Result<(), Self::Error> {
		Ok(())
	}
}
