//! Error types for `protowire`.
use core::fmt::{self, Debug, Display};

/// The error type returned by [`Encoder`](crate::Encoder).
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EncodeError<Io> {
	/// The flat buffer the encoder writes to does not have room for the value.
	/// No byte of the value has been written.
	///
	/// # Safety
	///
	/// This error is **NOT** recoverable. Every later call on the same encoder
	/// fails with this error again.
	SpaceExceeded,
	/// [`check_no_space_left()`] found bytes left over at the end of the flat
	/// buffer. This usually means a collaborator computed a wrong encoded length.
	///
	/// [`check_no_space_left()`]: crate::Encoder::check_no_space_left
	SpaceLeft(usize),
	/// The operation only makes sense for encoders writing to a flat buffer.
	NotFlat,
	/// A length does not fit into the wire format.
	TooLarge,
	/// A previous write to the sink failed and the encoder cannot be used any
	/// further.
	Poisoned,
	/// The underlying sink returned an error while the buffered bytes were
	/// being written to it.
	///
	/// # Safety
	///
	/// This error is **NOT** recoverable. It is unknown how many bytes reached
	/// the sink, every later call on the same encoder fails with
	/// [`EncodeError::Poisoned`].
	Io(Io),
}

impl<Io: Display> Display for EncodeError<Io> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::SpaceExceeded => f.write_str("out of space"),
			Self::SpaceLeft(n) => {
				write!(f, "{n} bytes of space left unused")
			},
			Self::NotFlat => {
				f.write_str("encoder is not writing to a flat buffer")
			},
			Self::TooLarge => f.write_str("too large"),
			Self::Poisoned => {
				f.write_str("encoder failed previously and is unusable")
			},
			Self::Io(e) => Display::fmt(e, f),
		}
	}
}

#[cfg(feature = "std")]
impl<Io: Debug + Display> std::error::Error for EncodeError<Io> {}

impl EncodeError<core::convert::Infallible> {
	/// Convert an error of an encoder that cannot fail on IO into an error of
	/// any other encoder.
	pub fn cast<Io>(self) -> EncodeError<Io> {
		match self {
			Self::SpaceExceeded => EncodeError::SpaceExceeded,
			Self::SpaceLeft(n) => EncodeError::SpaceLeft(n),
			Self::NotFlat => EncodeError::NotFlat,
			Self::TooLarge => EncodeError::TooLarge,
			Self::Poisoned => EncodeError::Poisoned,
			Self::Io(e) => match e {},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use alloc::string::ToString;
	use core::convert::Infallible;

	#[test]
	fn test_display() {
		let e: EncodeError<Infallible> = EncodeError::SpaceLeft(3);
		assert_eq!(e.to_string(), "3 bytes of space left unused");

		let e: EncodeError<&str> = EncodeError::Io("broken pipe");
		assert_eq!(e.to_string(), "broken pipe");
	}

	#[test]
	fn test_cast() {
		let e: EncodeError<Infallible> = EncodeError::SpaceExceeded;
		assert_eq!(e.cast::<()>(), EncodeError::SpaceExceeded);
	}
}
