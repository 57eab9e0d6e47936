use super::*;

use alloc::rc::Rc;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use crate::io::Cursor;
use crate::primitive::tests::decode_varint;

/// Sink that remembers every call made to it.
#[derive(Debug, Default)]
struct Recorder {
	out: Vec<u8>,
	writes: Vec<usize>,
	flushes: usize,
}

impl Write for Recorder {
	type Error = Infallible;

	fn write(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
		self.out.extend_from_slice(buf);
		self.writes.push(buf.len());
		Ok(())
	}

	fn flush(&mut self) -> Result<(), Self::Error> {
		self.flushes += 1;
		Ok(())
	}
}

/// Sink that shares its output and notices when it is dropped.
#[derive(Debug, Default)]
struct Shared {
	out: Rc<RefCell<Vec<u8>>>,
	closed: Rc<Cell<bool>>,
}

impl Write for Shared {
	type Error = Infallible;

	fn write(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
		self.out.borrow_mut().extend_from_slice(buf);
		Ok(())
	}

	fn flush(&mut self) -> Result<(), Self::Error> {
		Ok(())
	}
}

impl Drop for Shared {
	fn drop(&mut self) {
		self.closed.set(true);
	}
}

fn streamed(window_size: usize) -> Encoder<'static, Recorder> {
	Encoder::streamed_with_config(
		Recorder::default(),
		Config::default().with_window_size(window_size),
	)
}

fn finish(encoder: Encoder<'static, Recorder>) -> Recorder {
	encoder.into_inner().unwrap().unwrap()
}

fn write_sample<W: Write>(
	encoder: &mut Encoder<'_, W>,
) -> Result<(), EncodeError<W::Error>> {
	let payload: Vec<u8> = (0..100).collect();

	for i in 0..50i32 {
		let field = i.unsigned_abs() + 1;

		encoder.write_tag(field, WireType::Varint)?;
		encoder.write_uint64(u64::from(field) << (field % 64))?;
		encoder.write_tag(field, WireType::Fixed64)?;
		encoder.write_double(f64::from(i) * 0.5)?;
		encoder.write_tag(field, WireType::Varint)?;
		encoder.write_int32(-i)?;
		encoder.write_tag(field, WireType::Varint)?;
		encoder.write_sint64(-i64::from(i))?;
		encoder.write_tag(field, WireType::Fixed32)?;
		encoder.write_sfixed32(i)?;
		encoder.write_tag(field, WireType::LengthDelimited)?;
		encoder.write_bytes(&payload[..(field as usize * 7) % 100])?;
		encoder.write_tag(field, WireType::LengthDelimited)?;
		encoder.write_string("protowire")?;
		encoder.write_tag(field, WireType::Varint)?;
		encoder.write_bool(i % 2 == 0)?;
	}

	Ok(())
}

#[test]
fn test_field_examples() {
	let mut buf = [0u8; 3];
	let mut encoder = Encoder::flat(&mut buf);
	encoder.write_tag(1, WireType::Varint).unwrap();
	encoder.write_uint32(300).unwrap();
	assert_eq!(encoder.filled(), &[0x08, 0xac, 0x02]);
	assert_eq!(encoder.check_no_space_left(), Ok(()));

	let mut buf = [0u8; 5];
	let mut encoder = Encoder::flat(&mut buf);
	encoder.write_tag(2, WireType::LengthDelimited).unwrap();
	encoder.write_string("abc").unwrap();
	assert_eq!(encoder.filled(), &[0x12, 0x03, 0x61, 0x62, 0x63]);
	assert_eq!(encoder.check_no_space_left(), Ok(()));
}

#[test]
fn test_flat_exact_fit() {
	let mut buf = [0u8; 5];
	let mut encoder = Encoder::flat(&mut buf);

	encoder.write_raw_bytes(&[1, 2, 3, 4, 5]).unwrap();
	assert_eq!(encoder.space_left(), Ok(0));
	assert_eq!(encoder.check_no_space_left(), Ok(()));
	assert_eq!(encoder.position(), 5);
}

#[test]
fn test_flat_overflow() {
	let mut buf = [0u8; 5];
	let mut encoder = Encoder::flat(&mut buf);

	assert_eq!(
		encoder.write_raw_bytes(&[1, 2, 3, 4, 5, 6]),
		Err(EncodeError::SpaceExceeded)
	);
	assert_eq!(encoder.filled(), &[] as &[u8]);
	drop(encoder);

	assert_eq!(buf, [0; 5]);
}

#[test]
fn test_flat_overflow_does_not_split_values() {
	let mut buf = [0u8; 4];
	let mut encoder = Encoder::flat(&mut buf);

	encoder.write_uint32(300).unwrap();
	assert_eq!(
		encoder.write_fixed32(0xdead_beef),
		Err(EncodeError::SpaceExceeded)
	);
	assert_eq!(encoder.filled(), &[0xac, 0x02]);
	drop(encoder);

	assert_eq!(buf, [0xac, 0x02, 0, 0]);
}

#[test]
fn test_flat_failure_latches() {
	let mut buf = [0u8; 4];
	let mut encoder = Encoder::flat(&mut buf);

	encoder.write_raw_bytes(&[0; 8]).unwrap_err();

	assert_eq!(encoder.write_bool(true), Err(EncodeError::SpaceExceeded));
	assert_eq!(encoder.write_raw_bytes(&[]), Err(EncodeError::SpaceExceeded));
	assert_eq!(encoder.flush(), Err(EncodeError::SpaceExceeded));
	assert_eq!(encoder.filled(), &[] as &[u8]);
}

#[test]
fn test_flat_bytes_without_dangling_prefix() {
	let mut buf = [0u8; 3];
	let mut encoder = Encoder::flat(&mut buf);

	assert_eq!(encoder.write_bytes(b"abc"), Err(EncodeError::SpaceExceeded));
	assert_eq!(encoder.filled(), &[] as &[u8]);
}

#[test]
fn test_check_no_space_left() {
	let mut buf = [0u8; 4];
	let mut encoder = Encoder::flat(&mut buf);

	encoder.write_bool(false).unwrap();
	assert_eq!(encoder.check_no_space_left(), Err(EncodeError::SpaceLeft(3)));

	let encoder = streamed(16);
	assert_eq!(encoder.space_left(), Err(EncodeError::NotFlat));
	assert_eq!(encoder.check_no_space_left(), Err(EncodeError::NotFlat));
}

#[test]
fn test_window_size_is_not_observable() {
	let mut expected = vec![0u8; 16 * 1024];
	let mut encoder = Encoder::flat(&mut expected);
	write_sample(&mut encoder).unwrap();
	#[allow(clippy::cast_possible_truncation)]
	let len = encoder.position() as usize;
	drop(encoder);
	expected.truncate(len);

	for window_size in [16, 17, 31, 64, 100, 1000, Config::DEFAULT_WINDOW_SIZE] {
		let mut encoder = streamed(window_size);
		write_sample(&mut encoder).unwrap();
		assert_eq!(encoder.position(), len as u64);

		let out = finish(encoder);
		assert_eq!(out.out, expected, "window size {window_size}");
	}
}

#[test]
fn test_oversized_payload_goes_to_sink() {
	let payload: Vec<u8> = (0..40).collect();

	let mut encoder = streamed(16);
	encoder.write_uint32(300).unwrap();
	encoder.write_bool(true).unwrap();
	encoder.write_raw_bytes(&payload).unwrap();

	assert_eq!(encoder.position(), 43);
	assert_eq!(encoder.filled(), &[] as &[u8]);

	let out = finish(encoder);
	assert_eq!(out.writes, [3, 40]);
	assert_eq!(&out.out[..3], &[0xac, 0x02, 0x01]);
	assert_eq!(&out.out[3..], &payload[..]);
}

#[test]
fn test_payload_after_refresh() {
	let mut encoder = streamed(16);
	encoder.write_raw_bytes(&[1; 10]).unwrap();
	encoder.write_raw_bytes(&[2; 10]).unwrap();
	assert_eq!(encoder.filled(), &[2; 10]);

	let out = finish(encoder);
	assert_eq!(out.writes, [10, 10]);
	assert_eq!(out.flushes, 1);
}

#[test]
fn test_flush_is_idempotent() {
	let mut encoder = streamed(16);
	encoder.write_uint32(1).unwrap();
	encoder.flush().unwrap();
	encoder.flush().unwrap();

	let out = finish(encoder);
	assert_eq!(out.out, [1]);
	assert_eq!(out.writes, [1]);
	assert_eq!(out.flushes, 3);
}

#[test]
fn test_sink_failure_poisons() {
	let mut sink = Cursor::new([0u8; 4]);
	let mut encoder = Encoder::streamed_with_config(
		&mut sink,
		Config::default().with_window_size(16),
	);

	encoder.write_raw_bytes(&[7; 10]).unwrap();
	assert!(matches!(encoder.flush(), Err(EncodeError::Io(_))));

	assert_eq!(encoder.write_bool(true), Err(EncodeError::Poisoned));
	assert_eq!(encoder.flush(), Err(EncodeError::Poisoned));
	assert_eq!(encoder.finish().unwrap_err(), EncodeError::Poisoned);

	assert_eq!(sink.filled(), &[7; 4]);
}

#[test]
fn test_finish_closes_sink() {
	let sink = Shared::default();
	let out = Rc::clone(&sink.out);
	let closed = Rc::clone(&sink.closed);

	let mut encoder = Encoder::streamed(sink);
	encoder.write_sint32(-2).unwrap();

	assert!(encoder.finish().unwrap().is_none());
	assert!(closed.get());
	assert_eq!(*out.borrow(), [3]);
}

#[test]
fn test_finish_leave_open() {
	let config = Config::default().with_leave_open(true);
	let mut encoder = Encoder::streamed_with_config(Shared::default(), config);
	encoder.write_sint32(-2).unwrap();

	let sink = encoder.finish().unwrap().unwrap();
	assert!(!sink.closed.get());
	assert_eq!(*sink.out.borrow(), [3]);
}

#[test]
fn test_drop_flushes_window() {
	let mut sink = Recorder::default();

	{
		let mut encoder = Encoder::streamed(&mut sink);
		encoder.write_uint32(5).unwrap();
		assert!(sink_is_untouched(&encoder));
	}

	assert_eq!(sink.out, [5]);
}

fn sink_is_untouched(encoder: &Encoder<'_, &mut Recorder>) -> bool {
	encoder.get_ref().is_some_and(|sink| sink.out.is_empty())
}

#[test]
fn test_int32_negative_is_sign_extended() {
	let mut buf = [0u8; 10];
	let mut encoder = Encoder::flat(&mut buf);
	encoder.write_int32(-1).unwrap();
	assert_eq!(
		encoder.filled(),
		&[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01]
	);
	assert_eq!(encoder.check_no_space_left(), Ok(()));

	let mut buf = [0u8; 10];
	let mut encoder = Encoder::flat(&mut buf);
	encoder.write_enum(i32::MIN).unwrap();
	assert_eq!(
		decode_varint(encoder.filled()),
		Some((i64::from(i32::MIN) as u64, 10))
	);

	let mut buf = [0u8; 1];
	let mut encoder = Encoder::flat(&mut buf);
	encoder.write_int32(1).unwrap();
	assert_eq!(encoder.filled(), &[0x01]);
}

#[test]
fn test_zigzag_values() {
	let mut buf = [0u8; 16];
	let mut encoder = Encoder::flat(&mut buf);

	encoder.write_sint32(0).unwrap();
	encoder.write_sint32(-1).unwrap();
	encoder.write_sint32(1).unwrap();
	encoder.write_sint64(-64).unwrap();
	encoder.write_sint64(64).unwrap();
	assert_eq!(encoder.filled(), &[0x00, 0x01, 0x02, 0x7f, 0x80, 0x01]);
}

#[test]
fn test_fixed_width_values() {
	let mut buf = [0u8; 32];
	let mut encoder = Encoder::flat(&mut buf);

	encoder.write_fixed32(1).unwrap();
	encoder.write_sfixed64(-1).unwrap();
	encoder.write_float(1.5).unwrap();
	encoder.write_double(-2.25).unwrap();

	let mut expected = Vec::new();
	expected.extend_from_slice(&[1, 0, 0, 0]);
	expected.extend_from_slice(&[0xff; 8]);
	expected.extend_from_slice(&1.5f32.to_le_bytes());
	expected.extend_from_slice(&(-2.25f64).to_le_bytes());

	assert_eq!(encoder.filled(), &expected[..]);
}

#[test]
fn test_raw_tags_match_computed_tags() {
	let cases: [(u32, WireType); 5] = [
		(1, WireType::Varint),
		(16, WireType::LengthDelimited),
		(2048, WireType::Fixed32),
		(1 << 20, WireType::Fixed64),
		((1 << 29) - 1, WireType::EndGroup),
	];

	for (field_number, wire_type) in cases {
		let mut computed = [0u8; 5];
		let mut encoder = Encoder::flat(&mut computed);
		encoder.write_tag(field_number, wire_type).unwrap();
		let computed = encoder.filled().to_vec();
		drop(encoder);

		let mut raw = [0u8; 5];
		let mut encoder = Encoder::flat(&mut raw);
		let res = match computed[..] {
			[a] => encoder.write_raw_tag1(a),
			[a, b] => encoder.write_raw_tag2(a, b),
			[a, b, c] => encoder.write_raw_tag3(a, b, c),
			[a, b, c, d] => encoder.write_raw_tag4(a, b, c, d),
			[a, b, c, d, e] => encoder.write_raw_tag5(a, b, c, d, e),
			_ => unreachable!(),
		};
		res.unwrap();

		assert_eq!(encoder.filled(), &computed[..]);
	}
}

#[test]
fn test_encoded_tag() {
	let mut buf = [0u8; 2];
	let mut encoder = Encoder::flat(&mut buf);
	encoder.write_encoded_tag(make_tag(5, WireType::StartGroup)).unwrap();
	encoder.write_encoded_tag(make_tag(5, WireType::EndGroup)).unwrap();
	assert_eq!(encoder.filled(), &[43, 44]);
}

#[test]
fn test_raw_tag_bad_length() {
	let mut buf = [0u8; 32];
	let mut encoder = Encoder::flat(&mut buf);
	assert_eq!(encoder.write_raw_tag(&[0x80; 20]), Err(EncodeError::TooLarge));
	assert_eq!(encoder.write_raw_tag(&[]), Err(EncodeError::TooLarge));
	assert_eq!(encoder.filled(), &[] as &[u8]);

	encoder.write_raw_tag(&[0x80, 0x80, 0x80, 0x80, 0x01]).unwrap();
	assert_eq!(encoder.position(), 5);

	let mut encoder = streamed(16);
	encoder.write_uint32(300).unwrap();
	assert_eq!(encoder.write_raw_tag(&[0x80; 20]), Err(EncodeError::TooLarge));
	encoder.write_raw_tag1(0x08).unwrap();

	let out = finish(encoder);
	assert_eq!(out.out, [0xac, 0x02, 0x08]);
}

#[test]
fn test_lengths() {
	let mut buf = [0u8; 5];
	let mut encoder = Encoder::flat(&mut buf);

	assert_eq!(encoder.write_length(MAX_LENGTH + 1), Err(EncodeError::TooLarge));
	assert_eq!(encoder.filled(), &[] as &[u8]);

	encoder.write_length(MAX_LENGTH).unwrap();
	assert_eq!(encoder.filled(), &[0xff, 0xff, 0xff, 0xff, 0x07]);
}

#[test]
fn test_builder() {
	let mut buf = [0u8; 4];
	let encoder = Encoder::builder().flat(&mut buf).build();
	assert!(encoder.is_flat());
	assert!(encoder.get_ref().is_none());

	let encoder = Encoder::builder()
		.writer(Recorder::default())
		.config(Config::default().with_window_size(32).with_deterministic(true))
		.build();
	assert!(!encoder.is_flat());
	assert!(encoder.deterministic());
	assert_eq!(encoder.config().window_size(), 32);
	assert_eq!(encoder.depth(), 0);
}

#[test]
fn test_small_window_is_raised() {
	let mut encoder = streamed(1);
	assert_eq!(encoder.config().window_size(), Config::MIN_WINDOW_SIZE);

	encoder.write_uint64(u64::MAX).unwrap();
	encoder.write_uint64(u64::MAX).unwrap();

	let out = finish(encoder);
	assert_eq!(out.writes, [10, 10]);
}

#[test]
#[cfg(feature = "statistics")]
fn test_statistics() {
	let mut encoder = streamed(16);
	encoder.write_uint32(300).unwrap();
	encoder.write_bool(true).unwrap();
	encoder.write_raw_bytes(&[0; 40]).unwrap();
	encoder.write_bool(true).unwrap();
	encoder.flush().unwrap();

	let stats = encoder.statistics();
	assert_eq!(stats.total_bytes(), 44);
	assert_eq!(stats.io_ops(), 3);
	assert_eq!(stats.total_messages(), 0);
}
