//! Byte-level encoding of primitive values.
//!
//! Every function here writes into `dst` starting at `*pos` and advances `pos`
//! by exactly the number of bytes written. None of them check capacity; the
//! caller must make sure `dst[*pos..]` can hold the value, for example with
//! [`varint_len64`] or the fixed sizes below.

/// Size of a fixed 32-bit value on the wire.
pub const FIXED32_SIZE: usize = 4;

/// Size of a fixed 64-bit value on the wire.
pub const FIXED64_SIZE: usize = 8;

/// Number of bytes needed to encode `value` as a varint.
#[inline]
#[must_use]
pub const fn varint_len32(value: u32) -> usize {
	varint_len64(value as u64)
}

/// Number of bytes needed to encode `value` as a varint.
#[inline]
#[must_use]
pub const fn varint_len64(value: u64) -> usize {
	// 1 byte per started group of 7 bits, 0 still takes 1 byte
	let bits = 64 - (value | 1).leading_zeros() as usize;
	(bits + 6) / 7
}

/// Map a signed 32-bit integer to an unsigned one so that values of small
/// magnitude stay small.
#[inline]
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub const fn encode_zigzag32(n: i32) -> u32 {
	((n << 1) ^ (n >> 31)) as u32
}

/// Map a signed 64-bit integer to an unsigned one so that values of small
/// magnitude stay small.
#[inline]
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub const fn encode_zigzag64(n: i64) -> u64 {
	((n << 1) ^ (n >> 63)) as u64
}

/// Inverse of [`encode_zigzag32`].
#[inline]
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub const fn decode_zigzag32(n: u32) -> i32 {
	((n >> 1) as i32) ^ -((n & 1) as i32)
}

/// Inverse of [`encode_zigzag64`].
#[inline]
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub const fn decode_zigzag64(n: u64) -> i64 {
	((n >> 1) as i64) ^ -((n & 1) as i64)
}

/// Write `value` as a varint.
#[inline]
pub fn encode_varint32(value: u32, dst: &mut [u8], pos: &mut usize) {
	encode_varint64(u64::from(value), dst, pos);
}

/// Write `value` as a varint.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub fn encode_varint64(mut value: u64, dst: &mut [u8], pos: &mut usize) {
	let mut i = *pos;
	while value >= 0x80 {
		dst[i] = (value as u8) | 0x80;
		value >>= 7;
		i += 1;
	}
	dst[i] = value as u8;
	*pos = i + 1;
}

/// Write `value` as 4 little-endian bytes.
#[inline]
pub fn encode_fixed32(value: u32, dst: &mut [u8], pos: &mut usize) {
	put(&value.to_le_bytes(), dst, pos);
}

/// Write `value` as 8 little-endian bytes.
#[inline]
pub fn encode_fixed64(value: u64, dst: &mut [u8], pos: &mut usize) {
	put(&value.to_le_bytes(), dst, pos);
}

/// Write `value` as a single `0` or `1` byte.
#[inline]
pub fn encode_bool(value: bool, dst: &mut [u8], pos: &mut usize) {
	dst[*pos] = u8::from(value);
	*pos += 1;
}

/// Copy `bytes` verbatim.
#[inline]
pub fn put(bytes: &[u8], dst: &mut [u8], pos: &mut usize) {
	let end = *pos + bytes.len();
	dst[*pos..end].copy_from_slice(bytes);
	*pos = end;
}
