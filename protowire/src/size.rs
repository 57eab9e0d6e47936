//! Encoded sizes of field values.
//!
//! These mirror what the [`Encoder`] produces for the corresponding `write_*`
//! call and are what hand-written or generated [`Message::encoded_len`]
//! implementations are built from. None of them include the tag; add
//! [`compute_tag_size`] for that.
//!
//! [`Encoder`]: crate::Encoder
//! [`Message::encoded_len`]: crate::Message::encoded_len

use crate::primitive::{
	encode_zigzag32, encode_zigzag64, varint_len32, varint_len64,
	FIXED32_SIZE, FIXED64_SIZE,
};
use crate::wire::{make_tag, WireType};
use crate::Message;

/// Size of a `double` field.
#[inline]
#[must_use]
pub fn compute_double_size(_: f64) -> usize {
	FIXED64_SIZE
}

/// Size of a `float` field.
#[inline]
#[must_use]
pub fn compute_float_size(_: f32) -> usize {
	FIXED32_SIZE
}

/// Size of a `uint64` field.
#[inline]
#[must_use]
pub const fn compute_uint64_size(value: u64) -> usize {
	varint_len64(value)
}

/// Size of an `int64` field.
#[inline]
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub const fn compute_int64_size(value: i64) -> usize {
	varint_len64(value as u64)
}

/// Size of an `int32` field. Negative values are sign-extended and always take
/// 10 bytes.
#[inline]
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub const fn compute_int32_size(value: i32) -> usize {
	if value >= 0 {
		varint_len32(value as u32)
	} else {
		10
	}
}

/// Size of a `fixed64` field.
#[inline]
#[must_use]
pub const fn compute_fixed64_size(_: u64) -> usize {
	FIXED64_SIZE
}

/// Size of a `fixed32` field.
#[inline]
#[must_use]
pub const fn compute_fixed32_size(_: u32) -> usize {
	FIXED32_SIZE
}

/// Size of a `bool` field.
#[inline]
#[must_use]
pub const fn compute_bool_size(_: bool) -> usize {
	1
}

/// Size of a `string` field, including its length prefix.
#[inline]
#[must_use]
pub const fn compute_string_size(value: &str) -> usize {
	compute_length_delimited_size(value.len())
}

/// Size of a `bytes` field, including its length prefix.
#[inline]
#[must_use]
pub fn compute_bytes_size(value: impl AsRef<[u8]>) -> usize {
	compute_length_delimited_size(value.as_ref().len())
}

/// Size of a `uint32` field.
#[inline]
#[must_use]
pub const fn compute_uint32_size(value: u32) -> usize {
	varint_len32(value)
}

/// Size of an enum field. Enums are encoded like `int32`.
#[inline]
#[must_use]
pub const fn compute_enum_size(value: i32) -> usize {
	compute_int32_size(value)
}

/// Size of an `sfixed32` field.
#[inline]
#[must_use]
pub const fn compute_sfixed32_size(_: i32) -> usize {
	FIXED32_SIZE
}

/// Size of an `sfixed64` field.
#[inline]
#[must_use]
pub const fn compute_sfixed64_size(_: i64) -> usize {
	FIXED64_SIZE
}

/// Size of an `sint32` field.
#[inline]
#[must_use]
pub const fn compute_sint32_size(value: i32) -> usize {
	varint_len32(encode_zigzag32(value))
}

/// Size of an `sint64` field.
#[inline]
#[must_use]
pub const fn compute_sint64_size(value: i64) -> usize {
	varint_len64(encode_zigzag64(value))
}

/// Size of a length prefix.
#[inline]
#[must_use]
pub const fn compute_length_size(len: usize) -> usize {
	varint_len64(len as u64)
}

/// Size of a length prefix plus `len` bytes of payload.
#[inline]
#[must_use]
pub const fn compute_length_delimited_size(len: usize) -> usize {
	compute_length_size(len) + len
}

/// Size of a raw 32-bit varint.
#[inline]
#[must_use]
pub const fn compute_raw_varint32_size(value: u32) -> usize {
	varint_len32(value)
}

/// Size of a raw 64-bit varint.
#[inline]
#[must_use]
pub const fn compute_raw_varint64_size(value: u64) -> usize {
	varint_len64(value)
}

/// Size of the tag for `field_number`. The wire type never changes the size.
#[inline]
#[must_use]
pub const fn compute_tag_size(field_number: u32) -> usize {
	varint_len32(make_tag(field_number, WireType::Varint))
}

/// Size of a nested message field, including its length prefix.
#[inline]
#[must_use]
pub fn compute_message_size<M: Message + ?Sized>(msg: &M) -> usize {
	compute_length_delimited_size(msg.encoded_len())
}

/// Size of a group's payload. The start and end tags are not included.
#[inline]
#[must_use]
pub fn compute_group_size<M: Message + ?Sized>(msg: &M) -> usize {
	msg.encoded_len()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_int32_sign_extension() {
		assert_eq!(compute_int32_size(0), 1);
		assert_eq!(compute_int32_size(150), 2);
		assert_eq!(compute_int32_size(i32::MAX), 5);
		assert_eq!(compute_int32_size(-1), 10);
		assert_eq!(compute_enum_size(-5), 10);
		assert_eq!(compute_int64_size(-1), 10);
	}

	#[test]
	fn test_zigzag_sizes() {
		assert_eq!(compute_sint32_size(-1), 1);
		assert_eq!(compute_sint32_size(-64), 1);
		assert_eq!(compute_sint32_size(-65), 2);
		assert_eq!(compute_sint64_size(i64::MIN), 10);
	}

	#[test]
	fn test_length_delimited_sizes() {
		assert_eq!(compute_string_size("abc"), 4);
		assert_eq!(compute_string_size(""), 1);
		assert_eq!(compute_bytes_size([0u8; 200]), 202);
		assert_eq!(compute_string_size("héllo"), 7);
	}

	#[test]
	fn test_tag_sizes() {
		assert_eq!(compute_tag_size(1), 1);
		assert_eq!(compute_tag_size(15), 1);
		assert_eq!(compute_tag_size(16), 2);
		assert_eq!(compute_tag_size((1 << 29) - 1), 5);
	}

	#[test]
	fn test_fixed_sizes() {
		assert_eq!(compute_double_size(1.5), 8);
		assert_eq!(compute_float_size(1.5), 4);
		assert_eq!(compute_sfixed32_size(-1), 4);
		assert_eq!(compute_fixed64_size(0), 8);
		assert_eq!(compute_bool_size(true), 1);
	}
}
