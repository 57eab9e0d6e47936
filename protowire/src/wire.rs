//! Wire types and tags.

use core::fmt;

/// Maximum number of bytes a 64-bit varint can occupy.
pub const MAX_VARINT_LEN: usize = 10;

/// Maximum number of bytes a 32-bit varint can occupy.
pub const MAX_VARINT32_LEN: usize = 5;

/// Maximum number of bytes an encoded tag can occupy.
pub const MAX_TAG_LEN: usize = MAX_VARINT32_LEN;

/// Number of bits the field number is shifted by inside a tag.
pub const TAG_TYPE_BITS: u32 = 3;

const TAG_TYPE_MASK: u32 = (1 << TAG_TYPE_BITS) - 1;

/// The 3-bit suffix of a tag that identifies the on-wire shape of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum WireType {
	/// Variable-length integer.
	Varint = 0,
	/// 8 little-endian bytes.
	Fixed64 = 1,
	/// Varint length followed by that many bytes.
	LengthDelimited = 2,
	/// Start of a group.
	StartGroup = 3,
	/// End of a group.
	EndGroup = 4,
	/// 4 little-endian bytes.
	Fixed32 = 5,
}

impl WireType {
	/// Get the numeric value of the wire type.
	#[inline]
	#[must_use]
	pub const fn get(self) -> u8 {
		self as u8
	}
}

/// The error returned when converting an invalid number to a [`WireType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvalidWireType(pub u8);

impl fmt::Display for InvalidWireType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "invalid wire type {}", self.0)
	}
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidWireType {}

impl TryFrom<u8> for WireType {
	type Error = InvalidWireType;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		match value {
			0 => Ok(Self::Varint),
			1 => Ok(Self::Fixed64),
			2 => Ok(Self::LengthDelimited),
			3 => Ok(Self::StartGroup),
			4 => Ok(Self::EndGroup),
			5 => Ok(Self::Fixed32),
			x => Err(InvalidWireType(x)),
		}
	}
}

/// Build the tag `(field_number << 3) | wire_type`.
///
/// The field number is not range checked. Bits shifted out of the top are lost.
#[inline]
#[must_use]
pub const fn make_tag(field_number: u32, wire_type: WireType) -> u32 {
	(field_number << TAG_TYPE_BITS) | wire_type as u32
}

/// Get the field number of `tag`.
#[inline]
#[must_use]
pub const fn tag_field_number(tag: u32) -> u32 {
	tag >> TAG_TYPE_BITS
}

/// Get the wire type of `tag`.
#[inline]
pub fn tag_wire_type(tag: u32) -> Result<WireType, InvalidWireType> {
	#[allow(clippy::cast_possible_truncation)]
	let wire_type = (tag & TAG_TYPE_MASK) as u8;
	WireType::try_from(wire_type)
}
