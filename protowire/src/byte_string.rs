use core::borrow::Borrow;
use core::fmt;
use core::ops::Deref;

use alloc::string::String;
use alloc::vec::Vec;

use bytes::Bytes;

/// An immutable byte string for `bytes` and `string` fields.
///
/// Clones share the same memory, so a value can be handed to the encoder and
/// kept around by its producer without copying. The encoder only ever reads
/// from it.
///
/// # Example
///
/// ```
/// use protowire::{ByteString, Encoder};
///
/// let payload = ByteString::from_static(b"abc");
///
/// let mut buf = [0u8; 4];
/// let mut encoder = Encoder::flat(&mut buf);
/// encoder.write_bytes(&payload).unwrap();
///
/// assert_eq!(encoder.filled(), &[3, b'a', b'b', b'c']);
/// ```
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ByteString(Bytes);

impl ByteString {
	/// Create an empty byte string.
	#[inline]
	#[must_use]
	pub const fn new() -> Self {
		Self(Bytes::new())
	}

	/// Create a byte string pointing to `bytes`. No copy is made.
	#[inline]
	#[must_use]
	pub const fn from_static(bytes: &'static [u8]) -> Self {
		Self(Bytes::from_static(bytes))
	}

	/// Create a byte string holding a copy of `bytes`.
	#[inline]
	#[must_use]
	pub fn copy_from_slice(bytes: &[u8]) -> Self {
		Self(Bytes::copy_from_slice(bytes))
	}

	/// Get the length of the byte string.
	#[inline]
	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Check whether the byte string is empty.
	#[inline]
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Get the bytes of the byte string.
	#[inline]
	#[must_use]
	pub fn as_slice(&self) -> &[u8] {
		&self.0
	}

	/// Get the underlying [`Bytes`].
	#[inline]
	#[must_use]
	pub fn into_inner(self) -> Bytes {
		self.0
	}
}

impl Deref for ByteString {
	type Target = [u8];

	#[inline]
	fn deref(&self) -> &Self::Target {
		self.as_slice()
	}
}

impl AsRef<[u8]> for ByteString {
	#[inline]
	fn as_ref(&self) -> &[u8] {
		self.as_slice()
	}
}

impl Borrow<[u8]> for ByteString {
	#[inline]
	fn borrow(&self) -> &[u8] {
		self.as_slice()
	}
}

impl From<Bytes> for ByteString {
	#[inline]
	fn from(value: Bytes) -> Self {
		Self(value)
	}
}

impl From<Vec<u8>> for ByteString {
	#[inline]
	fn from(value: Vec<u8>) -> Self {
		Self(Bytes::from(value))
	}
}

impl From<String> for ByteString {
	#[inline]
	fn from(value: String) -> Self {
		Self(Bytes::from(value))
	}
}

impl From<&'static str> for ByteString {
	#[inline]
	fn from(value: &'static str) -> Self {
		Self(Bytes::from_static(value.as_bytes()))
	}
}

impl fmt::Debug for ByteString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&self.0, f)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use alloc::vec;

	#[test]
	fn test_clones_share_memory() {
		let a = ByteString::from(vec![1, 2, 3]);
		let b = a.clone();

		assert_eq!(a, b);
		assert_eq!(a.as_slice().as_ptr(), b.as_slice().as_ptr());
	}

	#[test]
	fn test_from_string() {
		let s = ByteString::from(String::from("héllo"));
		assert_eq!(s.len(), 6);
		assert_eq!(&*s, "héllo".as_bytes());
	}

	#[test]
	fn test_empty() {
		assert!(ByteString::new().is_empty());
		assert!(ByteString::from_static(b"").is_empty());
		assert!(!ByteString::copy_from_slice(&[0]).is_empty());
	}
}
