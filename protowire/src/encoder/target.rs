//! The place an [`Encoder`](super::Encoder) writes its bytes to.

use alloc::boxed::Box;
use alloc::vec;

use log::trace;

use crate::io::Write;
use crate::statistics::Statistics;

/// Why the active window could not be made available again.
#[derive(Debug)]
pub(crate) enum Exhausted<E> {
	/// The target is a flat buffer and it is full.
	Full,
	/// The sink failed.
	Io(E),
}

/// Either a flat buffer owned by the caller or a paging window in front of a
/// sink.
///
/// The encoder only ever talks to the target through the methods below, so
/// the boundary handling is written once for both variants.
#[derive(Debug)]
pub(crate) enum Target<'a, W> {
	Flat(&'a mut [u8]),
	Streamed(Streamed<W>),
}

#[derive(Debug)]
pub(crate) struct Streamed<W> {
	window: Box<[u8]>,
	writer: Option<W>,
	flushed: u64,
}

impl<'a, W> Target<'a, W> {
	pub fn flat(buf: &'a mut [u8]) -> Self {
		Self::Flat(buf)
	}

	pub fn streamed(writer: W, window_size: usize) -> Self {
		Self::Streamed(Streamed {
			window: vec![0u8; window_size].into_boxed_slice(),
			writer: Some(writer),
			flushed: 0,
		})
	}

	pub fn is_flat(&self) -> bool {
		matches!(self, Self::Flat(_))
	}

	/// The active window. Its length is the encoder's limit.
	#[inline]
	pub fn window(&self) -> &[u8] {
		match self {
			Self::Flat(buf) => &**buf,
			Self::Streamed(s) => &s.window[..],
		}
	}

	#[inline]
	pub fn window_mut(&mut self) -> &mut [u8] {
		match self {
			Self::Flat(buf) => &mut **buf,
			Self::Streamed(s) => &mut s.window[..],
		}
	}

	/// Number of bytes that have already left the window for the sink.
	pub fn flushed(&self) -> u64 {
		match self {
			Self::Flat(_) => 0,
			Self::Streamed(s) => s.flushed,
		}
	}

	pub fn writer(&self) -> Option<&W> {
		match self {
			Self::Flat(_) => None,
			Self::Streamed(s) => s.writer.as_ref(),
		}
	}

	pub fn writer_mut(&mut self) -> Option<&mut W> {
		match self {
			Self::Flat(_) => None,
			Self::Streamed(s) => s.writer.as_mut(),
		}
	}

	pub fn take_writer(&mut self) -> Option<W> {
		match self {
			Self::Flat(_) => None,
			Self::Streamed(s) => s.writer.take(),
		}
	}
}

impl<'a, W: Write> Target<'a, W> {
	/// Hand the first `filled` bytes of the window to the sink so the whole
	/// window can be reused.
	pub fn drain(
		&mut self,
		filled: usize,
		statistics: &mut Statistics,
	) -> Result<(), Exhausted<W::Error>> {
		let s = match self {
			Self::Flat(_) => return Err(Exhausted::Full),
			Self::Streamed(s) => s,
		};

		if filled == 0 {
			return Ok(());
		}

		trace!("flushing {filled} bytes from the window");
		let writer = s.writer.as_mut().ok_or(Exhausted::Full)?;
		writer.write(&s.window[..filled]).map_err(Exhausted::Io)?;

		s.flushed += filled as u64;
		statistics.add_total_bytes(filled);
		statistics.inc_ops();
		Ok(())
	}

	/// Write `bytes` to the sink bypassing the window.
	///
	/// The window must have been drained before this is called.
	pub fn write_direct(
		&mut self,
		bytes: &[u8],
		statistics: &mut Statistics,
	) -> Result<(), Exhausted<W::Error>> {
		let s = match self {
			Self::Flat(_) => return Err(Exhausted::Full),
			Self::Streamed(s) => s,
		};

		trace!("writing {} bytes directly to the sink", bytes.len());
		let writer = s.writer.as_mut().ok_or(Exhausted::Full)?;
		writer.write(bytes).map_err(Exhausted::Io)?;

		s.flushed += bytes.len() as u64;
		statistics.add_total_bytes(bytes.len());
		statistics.inc_ops();
		Ok(())
	}

	/// Flush the sink itself. Flat buffers have nothing to flush.
	pub fn flush(&mut self) -> Result<(), Exhausted<W::Error>> {
		match self {
			Self::Flat(_) => Ok(()),
			Self::Streamed(s) => match s.writer.as_mut() {
				Some(writer) => writer.flush().map_err(Exhausted::Io),
				None => Ok(()),
			},
		}
	}
}
