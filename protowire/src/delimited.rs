//! Whole-message helpers.
//!
//! These cover the common ways of getting a complete message out: into a new
//! vector, into a caller-provided slice, or length-prefixed onto a sink so that
//! several messages can follow each other on the same stream.

use core::cmp;
use core::convert::Infallible;

use alloc::vec;
use alloc::vec::Vec;

use log::trace;

use crate::encoder::{Config, Encoder};
use crate::error::EncodeError;
use crate::io::{AsyncWrite, Write};
use crate::message::Message;
use crate::scratch::ScratchContext;
use crate::size::compute_length_delimited_size;

/// Encode `msg` into a new vector.
///
/// The vector is sized with [`Message::encoded_len()`]. The message is written
/// without a length prefix.
///
/// # Example
///
/// ```
/// use protowire::{encode_to_vec, Message, EncodeError, WriteContext};
/// use protowire::io::Write;
///
/// struct Answer;
///
/// impl Message for Answer {
///     fn encoded_len(&self) -> usize { 2 }
///
///     fn write_to<W: Write>(
///         &self,
///         ctx: &mut WriteContext<'_, '_, W>,
///     ) -> Result<(), EncodeError<W::Error>> {
///         ctx.write_raw_tag1(0x08)?;
///         ctx.write_uint32(42)
///     }
/// }
///
/// assert_eq!(encode_to_vec(&Answer).unwrap(), [0x08, 42]);
/// ```
pub fn encode_to_vec<M>(msg: &M) -> Result<Vec<u8>, EncodeError<Infallible>>
where
	M: Message + ?Sized,
{
	let mut buf = vec![0u8; msg.encoded_len()];
	let n = encode_into_slice(msg, &mut buf)?;
	buf.truncate(n);
	Ok(buf)
}

/// Encode `msg` into the beginning of `dst` and return the number of bytes
/// written.
///
/// The message is written without a length prefix.
pub fn encode_into_slice<M>(
	msg: &M,
	dst: &mut [u8],
) -> Result<usize, EncodeError<Infallible>>
where
	M: Message + ?Sized,
{
	let mut encoder = Encoder::flat(dst);
	encoder.write_raw_message(msg)?;

	#[allow(clippy::cast_possible_truncation)]
	let n = encoder.position() as usize;
	Ok(n)
}

/// Write `msg` prefixed by its length to `writer` and flush it.
///
/// The message goes through a window no larger than the message itself, so
/// small messages reach the sink with one write.
pub fn write_delimited<W, M>(
	writer: &mut W,
	msg: &M,
) -> Result<(), EncodeError<W::Error>>
where
	W: Write + ?Sized,
	M: Message + ?Sized,
{
	let len = msg.encoded_len();
	let window_size = cmp::min(
		compute_length_delimited_size(len),
		Config::DEFAULT_WINDOW_SIZE,
	);

	let config = Config::default()
		.with_window_size(window_size)
		.with_leave_open(true);

	let mut encoder =
		Encoder::<&mut W>::streamed_with_config(writer, config);
	encoder.write_message(msg)?;
	encoder.finish()?;
	Ok(())
}

/// Write `msg` prefixed by its length to `writer` and flush it.
///
/// The message is first encoded completely into memory from `scratch`, then
/// handed to `writer` with a single write. If the message cannot be encoded,
/// nothing is written.
pub async fn write_delimited_async<W, M>(
	writer: &mut W,
	msg: &M,
	scratch: &mut ScratchContext<'_>,
) -> Result<(), EncodeError<W::Error>>
where
	W: AsyncWrite + ?Sized,
	M: Message + ?Sized,
{
	let len = msg.encoded_len();
	let mut buf = scratch.alloc_bytes(compute_length_delimited_size(len));

	let mut encoder = Encoder::flat(&mut buf[..]);
	encoder.write_message(msg).map_err(EncodeError::<Infallible>::cast)?;

	#[allow(clippy::cast_possible_truncation)]
	let n = encoder.position() as usize;
	drop(encoder);

	trace!("writing {n} byte delimited message");
	writer.write(&buf[..n]).await.map_err(EncodeError::Io)?;
	writer.flush().await.map_err(EncodeError::Io)?;
	Ok(())
}
