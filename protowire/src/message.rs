//! Nested messages and groups.

use core::convert::Infallible;
use core::ops::{Deref, DerefMut};

use alloc::boxed::Box;

use log::trace;

use crate::encoder::Encoder;
use crate::error::EncodeError;
use crate::io::Write;
use crate::scratch::ScratchContext;
use crate::wire::WireType;

/// A value that knows how to write itself with an [`Encoder`].
///
/// This is the only thing the encoder needs from a message type. Generated or
/// hand-written messages implement it by adding up the sizes of their fields
/// (see [`size`](crate::size)) and by issuing the matching `write_*` calls.
///
/// # Contract
///
/// [`Message::write_to()`] must produce exactly [`Message::encoded_len()`]
/// bytes. The encoder trusts the declared length and does not check it. A
/// message that lies about its length produces a corrupt length prefix.
///
/// # Example
///
/// ```
/// use protowire::{size, Encoder, EncodeError, Message, WireType, WriteContext};
/// use protowire::io::Write;
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Message for Point {
///     fn encoded_len(&self) -> usize {
///         2 + size::compute_sint32_size(self.x) + size::compute_sint32_size(self.y)
///     }
///
///     fn write_to<W: Write>(
///         &self,
///         ctx: &mut WriteContext<'_, '_, W>,
///     ) -> Result<(), EncodeError<W::Error>> {
///         ctx.write_tag(1, WireType::Varint)?;
///         ctx.write_sint32(self.x)?;
///         ctx.write_tag(2, WireType::Varint)?;
///         ctx.write_sint32(self.y)
///     }
/// }
///
/// let point = Point { x: 1, y: -1 };
///
/// let mut buf = [0u8; 5];
/// let mut encoder = Encoder::flat(&mut buf);
/// encoder.write_message(&point).unwrap();
///
/// assert_eq!(encoder.filled(), &[4, 0x08, 2, 0x10, 1]);
/// ```
pub trait Message {
	/// Get the number of bytes [`Message::write_to()`] will produce.
	///
	/// This must not have side effects.
	fn encoded_len(&self) -> usize;

	/// Write the fields of the message.
	fn write_to<W: Write>(
		&self,
		ctx: &mut WriteContext<'_, '_, W>,
	) -> Result<(), EncodeError<W::Error>>;
}

impl<M: Message + ?Sized> Message for &M {
	fn encoded_len(&self) -> usize {
		(**self).encoded_len()
	}

	fn write_to<W: Write>(
		&self,
		ctx: &mut WriteContext<'_, '_, W>,
	) -> Result<(), EncodeError<W::Error>> {
		(**self).write_to(ctx)
	}
}

impl<M: Message + ?Sized> Message for Box<M> {
	fn encoded_len(&self) -> usize {
		(**self).encoded_len()
	}

	fn write_to<W: Write>(
		&self,
		ctx: &mut WriteContext<'_, '_, W>,
	) -> Result<(), EncodeError<W::Error>> {
		(**self).write_to(ctx)
	}
}

/// The encoder as seen by a nested message while it writes itself.
///
/// A context is entered for every nested message or group and left when it is
/// dropped, which happens on every way out of the write, errors included. All
/// writes go straight to the one encoder it borrows, so whatever the nested
/// write does to the window (including flushing it to the sink) is what the
/// parent sees afterwards.
pub struct WriteContext<'e, 'a, W: Write> {
	encoder: &'e mut Encoder<'a, W>,
	start: u64,
}

impl<'e, 'a, W: Write> WriteContext<'e, 'a, W> {
	fn enter(encoder: &'e mut Encoder<'a, W>) -> Self {
		encoder.depth += 1;
		encoder.statistics.inc_total_messages();

		let start = encoder.position();
		Self { encoder, start }
	}

	/// Get the number of bytes written since the context was entered.
	#[inline]
	#[must_use]
	pub fn written(&self) -> u64 {
		self.encoder.position() - self.start
	}
}

impl<'e, 'a, W: Write> Deref for WriteContext<'e, 'a, W> {
	type Target = Encoder<'a, W>;

	fn deref(&self) -> &Self::Target {
		self.encoder
	}
}

impl<'e, 'a, W: Write> DerefMut for WriteContext<'e, 'a, W> {
	fn deref_mut(&mut self) -> &mut Self::Target {
		self.encoder
	}
}

impl<'e, 'a, W: Write> Drop for WriteContext<'e, 'a, W> {
	fn drop(&mut self) {
		trace!(
			"left nested write at depth {} after {} bytes",
			self.encoder.depth,
			self.written()
		);
		self.encoder.depth -= 1;
	}
}

impl<'a, W: Write> Encoder<'a, W> {
	/// Write `msg` prefixed by its length.
	///
	/// The prefix is [`Message::encoded_len()`]; it is not checked against
	/// what the message actually writes.
	pub fn write_message<M>(
		&mut self,
		msg: &M,
	) -> Result<(), EncodeError<W::Error>>
	where
		M: Message + ?Sized,
	{
		self.write_length(msg.encoded_len())?;
		self.write_raw_message(msg)
	}

	/// Write `msg` without any framing.
	///
	/// This is for callers that delimit the message some other way, for
	/// example a top-level message that runs to the end of the output.
	pub fn write_raw_message<M>(
		&mut self,
		msg: &M,
	) -> Result<(), EncodeError<W::Error>>
	where
		M: Message + ?Sized,
	{
		let mut ctx = WriteContext::enter(self);
		ctx.check()?;
		msg.write_to(&mut ctx)
	}

	/// Write the payload of a group.
	///
	/// The start and end tags are not written; use
	/// [`Encoder::write_group_field()`] for the complete field.
	pub fn write_group<M>(
		&mut self,
		msg: &M,
	) -> Result<(), EncodeError<W::Error>>
	where
		M: Message + ?Sized,
	{
		self.write_raw_message(msg)
	}

	/// Write a complete group field: the start tag, the payload and the end
	/// tag, all with `field_number`.
	pub fn write_group_field<M>(
		&mut self,
		field_number: u32,
		msg: &M,
	) -> Result<(), EncodeError<W::Error>>
	where
		M: Message + ?Sized,
	{
		self.write_tag(field_number, WireType::StartGroup)?;
		self.write_group(msg)?;
		self.write_tag(field_number, WireType::EndGroup)
	}

	/// Write `msg` prefixed by its length, materializing it in scratch memory
	/// first.
	///
	/// [`Message::encoded_len()`] is only used to size the scratch space. The
	/// prefix is the number of bytes the message actually wrote, so a message
	/// that declares more than it writes still produces valid output. Writing
	/// more than declared fails with [`EncodeError::SpaceExceeded`] before
	/// anything reaches this encoder.
	pub fn write_message_buffered<M>(
		&mut self,
		msg: &M,
		scratch: &mut ScratchContext,
	) -> Result<(), EncodeError<W::Error>>
	where
		M: Message + ?Sized,
	{
		self.check()?;

		let mut buf = scratch.alloc_bytes(msg.encoded_len());
		let mut inner =
			Encoder::flat_with_config(&mut buf[..], self.config().clone());
		inner.depth = self.depth;
		inner
			.write_raw_message(msg)
			.map_err(EncodeError::<Infallible>::cast)?;

		#[allow(clippy::cast_possible_truncation)]
		let n = inner.position() as usize;
		let messages = inner.statistics.total_messages();
		drop(inner);

		self.statistics.add_total_messages(messages);

		self.write_length(n)?;
		self.write_raw_bytes(&buf[..n])
	}
}
