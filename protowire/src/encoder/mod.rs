//! Module containing the implementation for [`Encoder`].

use core::convert::Infallible;
use core::fmt;

use log::{debug, warn};

use crate::error::EncodeError;
use crate::io::{IntoWriter, Write};
use crate::primitive::{
	self, encode_zigzag32, encode_zigzag64, varint_len32, varint_len64,
	FIXED32_SIZE, FIXED64_SIZE,
};
use crate::statistics::Statistics;
use crate::wire::{make_tag, WireType, MAX_TAG_LEN};

mod builder;
mod config;
mod target;

pub use self::builder::{Builder, FlatTarget, StreamTarget};
pub use self::config::Config;

use self::target::{Exhausted, Target};

/// The largest length prefix the wire format allows.
pub const MAX_LENGTH: usize = i32::MAX as usize;

/// The sink type of encoders that write to a flat buffer.
///
/// This type has no values. It only exists so that flat encoders have a
/// [`Write`] type to name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoSink {}

impl Write for NoSink {
	type Error = Infallible;

	fn write(&mut self, _: &[u8]) -> Result<(), Self::Error> {
		match *self {}
	}

	fn flush(&mut self) -> Result<(), Self::Error> {
		match *self {}
	}
}

/// The first fatal failure of an encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
	SpaceExceeded,
	Io,
}

/// Encoder for the protocol buffer binary wire format.
///
/// An encoder writes either into a fixed-size flat buffer, failing with
/// [`EncodeError::SpaceExceeded`] once it is full, or into a paging window
/// that is handed to a sink every time it fills up.
///
/// The encoder knows nothing about messages or schemas. Callers issue tags and
/// values in order; nested messages go through [`Encoder::write_message()`].
///
/// # Example
///
/// ```
/// use protowire::{Encoder, WireType};
///
/// let mut buf = [0u8; 8];
/// let mut encoder = Encoder::flat(&mut buf);
///
/// encoder.write_tag(1, WireType::Varint).unwrap();
/// encoder.write_uint32(300).unwrap();
/// encoder.write_tag(2, WireType::LengthDelimited).unwrap();
/// encoder.write_string("abc").unwrap();
///
/// assert_eq!(
///     encoder.filled(),
///     &[0x08, 0xac, 0x02, 0x12, 0x03, b'a', b'b', b'c']
/// );
/// assert!(encoder.check_no_space_left().is_ok());
/// ```
pub struct Encoder<'a, W: Write = NoSink> {
	target: Target<'a, W>,
	pos: usize,
	limit: usize,
	failure: Option<Failure>,
	pub(crate) depth: usize,
	pub(crate) statistics: Statistics,
	config: Config,
}

impl<'a> Encoder<'a, NoSink> {
	/// Create a new encoder that writes into `buf`.
	///
	/// Running out of space in `buf` is an error, the buffer is never grown.
	#[inline]
	pub fn flat(buf: &'a mut [u8]) -> Self {
		Self::flat_with_config(buf, Config::default())
	}

	/// Create a new encoder that writes into `buf` using `config`.
	///
	/// The window size of `config` is ignored.
	#[inline]
	pub fn flat_with_config(buf: &'a mut [u8], config: Config) -> Self {
		Self::from_target(Target::flat(buf), config)
	}
}

impl Encoder<'static, NoSink> {
	/// Create a new builder.
	///
	/// # Example
	///
	/// ```
	/// use protowire::{encoder::Config, Encoder};
	///
	/// let encoder = Encoder::builder()
	///     .writer(std::io::sink())
	///     .config(Config::default().with_window_size(64))
	///     .build();
	///
	/// assert_eq!(encoder.config().window_size(), 64);
	/// ```
	#[inline]
	pub fn builder() -> Builder<()> {
		Builder::new()
	}
}

impl<W: Write> Encoder<'static, W> {
	/// Create a new encoder that writes to `writer` through a paging window of
	/// the default size.
	///
	/// # Example
	///
	/// ```
	/// use protowire::{encoder::Config, io::Std, Encoder};
	///
	/// let config = Config::default().with_leave_open(true);
	/// let mut encoder = Encoder::streamed_with_config(Std(Vec::new()), config);
	/// encoder.write_sint32(-1).unwrap();
	///
	/// let out = encoder.finish().unwrap().unwrap();
	/// assert_eq!(out.0, [0x01]);
	/// ```
	#[inline]
	pub fn streamed(writer: impl IntoWriter<W>) -> Self {
		Self::streamed_with_config(writer, Config::default())
	}

	/// Create a new encoder that writes to `writer` using `config`.
	#[inline]
	pub fn streamed_with_config(
		writer: impl IntoWriter<W>,
		config: Config,
	) -> Self {
		let target =
			Target::streamed(writer.into_writer(), config.window_size());
		Self::from_target(target, config)
	}
}

impl<'a, W: Write> Encoder<'a, W> {
	fn from_target(target: Target<'a, W>, config: Config) -> Self {
		let limit = target.window().len();
		Self {
			target,
			pos: 0,
			limit,
			failure: None,
			depth: 0,
			statistics: Statistics::new(),
			config,
		}
	}

	/// Get the config that was given to this [`Encoder`].
	#[inline]
	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Check whether collaborators should produce deterministic output.
	///
	/// See [`Config::deterministic()`].
	#[inline]
	#[must_use]
	pub fn deterministic(&self) -> bool {
		self.config.deterministic()
	}

	/// Get statistics on this encoder.
	#[inline]
	#[cfg(feature = "statistics")]
	pub fn statistics(&self) -> &Statistics {
		&self.statistics
	}

	/// Check whether this encoder writes to a flat buffer.
	#[inline]
	#[must_use]
	pub fn is_flat(&self) -> bool {
		self.target.is_flat()
	}

	/// Get the number of nested messages currently being written.
	#[inline]
	#[must_use]
	pub fn depth(&self) -> usize {
		self.depth
	}

	/// Get the total number of bytes produced so far, including bytes already
	/// handed to the sink.
	#[inline]
	#[must_use]
	pub fn position(&self) -> u64 {
		self.target.flushed() + self.pos as u64
	}

	/// Get the bytes written to the active window.
	///
	/// For flat encoders this is everything written so far. For encoders with
	/// a sink these are the bytes not yet handed to it.
	#[inline]
	#[must_use]
	pub fn filled(&self) -> &[u8] {
		&self.target.window()[..self.pos]
	}

	/// Get the space left in the flat buffer.
	pub fn space_left(&self) -> Result<usize, EncodeError<W::Error>> {
		if self.is_flat() {
			Ok(self.limit - self.pos)
		} else {
			Err(EncodeError::NotFlat)
		}
	}

	/// Verify that the flat buffer has been filled exactly.
	///
	/// This is meant for callers that size a buffer to fit one message exactly
	/// and want to catch a wrong size computation.
	pub fn check_no_space_left(
		&self,
	) -> Result<(), EncodeError<W::Error>> {
		match self.space_left()? {
			0 => Ok(()),
			n => Err(EncodeError::SpaceLeft(n)),
		}
	}

	/// Get a reference to the sink.
	///
	/// Returns [`None`] for flat encoders and after [`Encoder::finish()`].
	#[inline]
	pub fn get_ref(&self) -> Option<&W> {
		self.target.writer()
	}

	/// Get a mutable reference to the sink. Directly writing to the sink is not
	/// advised, bytes still in the window would end up after whatever is
	/// written.
	#[inline]
	pub fn get_mut(&mut self) -> Option<&mut W> {
		self.target.writer_mut()
	}
}

/// Boundary handling.
impl<'a, W: Write> Encoder<'a, W> {
	/// Fail if this encoder has latched a failure.
	#[inline]
	pub(crate) fn check(&self) -> Result<(), EncodeError<W::Error>> {
		match self.failure {
			None => Ok(()),
			Some(Failure::SpaceExceeded) => Err(EncodeError::SpaceExceeded),
			Some(Failure::Io) => Err(EncodeError::Poisoned),
		}
	}

	#[cold]
	fn fail(&mut self, e: Exhausted<W::Error>) -> EncodeError<W::Error> {
		match e {
			Exhausted::Full => {
				debug!(
					"flat buffer exhausted at {} of {} bytes",
					self.pos, self.limit
				);
				self.failure = Some(Failure::SpaceExceeded);
				EncodeError::SpaceExceeded
			},
			Exhausted::Io(e) => {
				debug!("sink failed, encoder is now unusable");
				self.failure = Some(Failure::Io);
				EncodeError::Io(e)
			},
		}
	}

	/// Empty the window into the sink.
	fn refresh(&mut self) -> Result<(), EncodeError<W::Error>> {
		match self.target.drain(self.pos, &mut self.statistics) {
			Ok(()) => {
				self.pos = 0;
				Ok(())
			},
			Err(e) => Err(self.fail(e)),
		}
	}

	/// Make room for `n` contiguous bytes. `n` must not exceed
	/// [`Config::MIN_WINDOW_SIZE`].
	#[inline]
	fn ensure(&mut self, n: usize) -> Result<(), EncodeError<W::Error>> {
		self.check()?;
		if self.limit - self.pos < n {
			self.refresh()?;
		}

		debug_assert!(
			self.limit - self.pos >= n,
			"window too small for a single value"
		);
		Ok(())
	}

	/// Write a value of exactly `len` bytes with `f`.
	#[inline]
	fn put<F>(&mut self, len: usize, f: F) -> Result<(), EncodeError<W::Error>>
	where
		F: FnOnce(&mut [u8], &mut usize),
	{
		self.ensure(len)?;

		let mut pos = self.pos;
		f(self.target.window_mut(), &mut pos);
		debug_assert_eq!(pos - self.pos, len, "value length mismatch");

		self.pos = pos;
		Ok(())
	}

	/// Write the bytes in the window to the sink and flush it.
	///
	/// This does nothing for flat encoders.
	pub fn flush(&mut self) -> Result<(), EncodeError<W::Error>> {
		self.check()?;
		if self.is_flat() {
			return Ok(());
		}

		self.refresh()?;
		match self.target.flush() {
			Ok(()) => Ok(()),
			Err(e) => Err(self.fail(e)),
		}
	}

	/// Flush the encoder and release the sink.
	///
	/// If the encoder was configured with [`Config::leave_open()`], the sink is
	/// handed back. Otherwise it is dropped, closing it, and [`None`] is
	/// returned. Flat encoders always return [`None`].
	pub fn finish(mut self) -> Result<Option<W>, EncodeError<W::Error>> {
		self.flush()?;

		let writer = self.target.take_writer();
		if self.config.leave_open() {
			Ok(writer)
		} else {
			drop(writer);
			Ok(None)
		}
	}

	/// Flush the encoder and hand back the sink, whatever
	/// [`Config::leave_open()`] says.
	pub fn into_inner(mut self) -> Result<Option<W>, EncodeError<W::Error>> {
		self.flush()?;
		Ok(self.target.take_writer())
	}
}

/// Raw writes.
impl<'a, W: Write> Encoder<'a, W> {
	/// Write `bytes` verbatim.
	///
	/// With a sink, payloads larger than the whole window skip the window and
	/// go to the sink directly.
	pub fn write_raw_bytes(
		&mut self,
		bytes: &[u8],
	) -> Result<(), EncodeError<W::Error>> {
		self.check()?;

		if self.limit - self.pos < bytes.len() {
			self.refresh()?;

			if bytes.len() > self.limit {
				return match self
					.target
					.write_direct(bytes, &mut self.statistics)
				{
					Ok(()) => Ok(()),
					Err(e) => Err(self.fail(e)),
				};
			}
		}

		let mut pos = self.pos;
		primitive::put(bytes, self.target.window_mut(), &mut pos);
		self.pos = pos;
		Ok(())
	}

	/// Write `value` as a varint.
	#[inline]
	pub fn write_raw_varint32(
		&mut self,
		value: u32,
	) -> Result<(), EncodeError<W::Error>> {
		self.put(varint_len32(value), |dst, pos| {
			primitive::encode_varint32(value, dst, pos);
		})
	}

	/// Write `value` as a varint.
	#[inline]
	pub fn write_raw_varint64(
		&mut self,
		value: u64,
	) -> Result<(), EncodeError<W::Error>> {
		self.put(varint_len64(value), |dst, pos| {
			primitive::encode_varint64(value, dst, pos);
		})
	}

	/// Write `value` as 4 little-endian bytes.
	#[inline]
	pub fn write_raw_little_endian32(
		&mut self,
		value: u32,
	) -> Result<(), EncodeError<W::Error>> {
		self.put(FIXED32_SIZE, |dst, pos| {
			primitive::encode_fixed32(value, dst, pos);
		})
	}

	/// Write `value` as 8 little-endian bytes.
	#[inline]
	pub fn write_raw_little_endian64(
		&mut self,
		value: u64,
	) -> Result<(), EncodeError<W::Error>> {
		self.put(FIXED64_SIZE, |dst, pos| {
			primitive::encode_fixed64(value, dst, pos);
		})
	}
}

/// Tags & lengths.
impl<'a, W: Write> Encoder<'a, W> {
	/// Write the tag for `field_number` and `wire_type`.
	///
	/// Neither argument is validated.
	#[inline]
	pub fn write_tag(
		&mut self,
		field_number: u32,
		wire_type: WireType,
	) -> Result<(), EncodeError<W::Error>> {
		self.write_raw_varint32(make_tag(field_number, wire_type))
	}

	/// Write an already composed tag.
	#[inline]
	pub fn write_encoded_tag(
		&mut self,
		tag: u32,
	) -> Result<(), EncodeError<W::Error>> {
		self.write_raw_varint32(tag)
	}

	/// Write the pre-encoded bytes of a tag.
	///
	/// Generated code that knows its tags ahead of time can skip the tag
	/// computation with this. Tags are 1 to 5 bytes long, anything else fails
	/// with [`EncodeError::TooLarge`] without writing anything.
	#[inline]
	pub fn write_raw_tag(
		&mut self,
		bytes: &[u8],
	) -> Result<(), EncodeError<W::Error>> {
		if !(1..=MAX_TAG_LEN).contains(&bytes.len()) {
			return Err(EncodeError::TooLarge);
		}

		self.put(bytes.len(), |dst, pos| primitive::put(bytes, dst, pos))
	}

	/// Write a 1-byte pre-encoded tag.
	#[inline]
	pub fn write_raw_tag1(
		&mut self,
		b1: u8,
	) -> Result<(), EncodeError<W::Error>> {
		self.write_raw_tag(&[b1])
	}

	/// Write a 2-byte pre-encoded tag.
	#[inline]
	pub fn write_raw_tag2(
		&mut self,
		b1: u8,
		b2: u8,
	) -> Result<(), EncodeError<W::Error>> {
		self.write_raw_tag(&[b1, b2])
	}

	/// Write a 3-byte pre-encoded tag.
	#[inline]
	pub fn write_raw_tag3(
		&mut self,
		b1: u8,
		b2: u8,
		b3: u8,
	) -> Result<(), EncodeError<W::Error>> {
		self.write_raw_tag(&[b1, b2, b3])
	}

	/// Write a 4-byte pre-encoded tag.
	#[inline]
	pub fn write_raw_tag4(
		&mut self,
		b1: u8,
		b2: u8,
		b3: u8,
		b4: u8,
	) -> Result<(), EncodeError<W::Error>> {
		self.write_raw_tag(&[b1, b2, b3, b4])
	}

	/// Write a 5-byte pre-encoded tag.
	#[inline]
	pub fn write_raw_tag5(
		&mut self,
		b1: u8,
		b2: u8,
		b3: u8,
		b4: u8,
		b5: u8,
	) -> Result<(), EncodeError<W::Error>> {
		self.write_raw_tag(&[b1, b2, b3, b4, b5])
	}

	/// Write a length prefix.
	///
	/// Lengths above [`MAX_LENGTH`] fail with [`EncodeError::TooLarge`]
	/// without writing anything.
	#[inline]
	pub fn write_length(
		&mut self,
		len: usize,
	) -> Result<(), EncodeError<W::Error>> {
		if len > MAX_LENGTH {
			return Err(EncodeError::TooLarge);
		}

		#[allow(clippy::cast_possible_truncation)]
		let len = len as u32;
		self.write_raw_varint32(len)
	}
}

/// Field values.
impl<'a, W: Write> Encoder<'a, W> {
	/// Write a `double` field value.
	#[inline]
	pub fn write_double(
		&mut self,
		value: f64,
	) -> Result<(), EncodeError<W::Error>> {
		self.write_raw_little_endian64(value.to_bits())
	}

	/// Write a `float` field value.
	#[inline]
	pub fn write_float(
		&mut self,
		value: f32,
	) -> Result<(), EncodeError<W::Error>> {
		self.write_raw_little_endian32(value.to_bits())
	}

	/// Write a `uint64` field value.
	#[inline]
	pub fn write_uint64(
		&mut self,
		value: u64,
	) -> Result<(), EncodeError<W::Error>> {
		self.write_raw_varint64(value)
	}

	/// Write an `int64` field value.
	#[inline]
	#[allow(clippy::cast_sign_loss)]
	pub fn write_int64(
		&mut self,
		value: i64,
	) -> Result<(), EncodeError<W::Error>> {
		self.write_raw_varint64(value as u64)
	}

	/// Write an `int32` field value.
	///
	/// Negative values are sign-extended to 64 bits and always take 10 bytes.
	#[inline]
	#[allow(clippy::cast_sign_loss)]
	pub fn write_int32(
		&mut self,
		value: i32,
	) -> Result<(), EncodeError<W::Error>> {
		if value >= 0 {
			self.write_raw_varint32(value as u32)
		} else {
			self.write_raw_varint64(i64::from(value) as u64)
		}
	}

	/// Write a `fixed64` field value.
	#[inline]
	pub fn write_fixed64(
		&mut self,
		value: u64,
	) -> Result<(), EncodeError<W::Error>> {
		self.write_raw_little_endian64(value)
	}

	/// Write a `fixed32` field value.
	#[inline]
	pub fn write_fixed32(
		&mut self,
		value: u32,
	) -> Result<(), EncodeError<W::Error>> {
		self.write_raw_little_endian32(value)
	}

	/// Write a `bool` field value.
	#[inline]
	pub fn write_bool(
		&mut self,
		value: bool,
	) -> Result<(), EncodeError<W::Error>> {
		self.put(1, |dst, pos| primitive::encode_bool(value, dst, pos))
	}

	/// Write a `string` field value, length prefix included.
	#[inline]
	pub fn write_string(
		&mut self,
		value: &str,
	) -> Result<(), EncodeError<W::Error>> {
		self.write_bytes(value)
	}

	/// Write a `bytes` field value, length prefix included.
	///
	/// The prefix is written only if the whole payload can follow it, flat
	/// encoders never end up with a dangling prefix.
	pub fn write_bytes(
		&mut self,
		value: impl AsRef<[u8]>,
	) -> Result<(), EncodeError<W::Error>> {
		let value = value.as_ref();
		let len = value.len();
		if len > MAX_LENGTH {
			return Err(EncodeError::TooLarge);
		}

		if self.is_flat() {
			self.check()?;
			if self.limit - self.pos < varint_len64(len as u64) + len {
				return Err(self.fail(Exhausted::Full));
			}
		}

		self.write_length(len)?;
		self.write_raw_bytes(value)
	}

	/// Write a `uint32` field value.
	#[inline]
	pub fn write_uint32(
		&mut self,
		value: u32,
	) -> Result<(), EncodeError<W::Error>> {
		self.write_raw_varint32(value)
	}

	/// Write an enum field value. Enums are encoded like `int32`.
	#[inline]
	pub fn write_enum(
		&mut self,
		value: i32,
	) -> Result<(), EncodeError<W::Error>> {
		self.write_int32(value)
	}

	/// Write an `sfixed32` field value.
	#[inline]
	#[allow(clippy::cast_sign_loss)]
	pub fn write_sfixed32(
		&mut self,
		value: i32,
	) -> Result<(), EncodeError<W::Error>> {
		self.write_raw_little_endian32(value as u32)
	}

	/// Write an `sfixed64` field value.
	#[inline]
	#[allow(clippy::cast_sign_loss)]
	pub fn write_sfixed64(
		&mut self,
		value: i64,
	) -> Result<(), EncodeError<W::Error>> {
		self.write_raw_little_endian64(value as u64)
	}

	/// Write an `sint32` field value using zigzag encoding.
	#[inline]
	pub fn write_sint32(
		&mut self,
		value: i32,
	) -> Result<(), EncodeError<W::Error>> {
		self.write_raw_varint32(encode_zigzag32(value))
	}

	/// Write an `sint64` field value using zigzag encoding.
	#[inline]
	pub fn write_sint64(
		&mut self,
		value: i64,
	) -> Result<(), EncodeError<W::Error>> {
		self.write_raw_varint64(encode_zigzag64(value))
	}
}

impl<'a, W: Write> Drop for Encoder<'a, W> {
	fn drop(&mut self) {
		if self.failure.is_some()
			|| self.pos == 0
			|| self.target.writer().is_none()
		{
			return;
		}

		if self.refresh().is_err() {
			warn!("encoder dropped and failed to flush its window");
		}
	}
}

impl<'a, W> fmt::Debug for Encoder<'a, W>
where
	W: Write + fmt::Debug,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Encoder")
			.field("writer", &self.target.writer())
			.field("pos", &self.pos)
			.field("limit", &self.limit)
			.field("flat", &self.is_flat())
			.field("config", &self.config)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests;
