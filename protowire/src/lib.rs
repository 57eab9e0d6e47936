#![doc = include_str!("../README.md")]
#![allow(
	unknown_lints,
	clippy::new_without_default,
	clippy::needless_doctest_main
)]
#![warn(
	clippy::all,
	clippy::style,
	clippy::cargo,
	clippy::perf,
	clippy::correctness,
	clippy::complexity,
	clippy::deprecated,
	clippy::missing_panics_doc,
	clippy::missing_safety_doc,
	clippy::cast_lossless,
	clippy::cast_possible_wrap,
	clippy::useless_conversion,
	clippy::wrong_self_convention,
	rustdoc::all,
	rustdoc::broken_intra_doc_links
)]
#![deny(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod byte_string;
mod delimited;
mod message;
mod scratch;
mod statistics;

pub mod encoder;
pub mod error;
pub mod primitive;
pub mod size;
pub mod wire;

#[cfg(feature = "statistics")]
pub use self::statistics::Statistics;

pub use self::byte_string::ByteString;
pub use self::delimited::{
	encode_into_slice, encode_to_vec, write_delimited, write_delimited_async,
};
pub use self::encoder::{Encoder, NoSink, MAX_LENGTH};
pub use self::error::EncodeError;
pub use self::message::{Message, WriteContext};
pub use self::scratch::{
	ScratchArena, ScratchBytes, ScratchChunk, ScratchContext,
};
pub use self::wire::{make_tag, WireType};

#[cfg(feature = "std")]
pub use self::scratch::ScratchGuard;

pub use protowire_io as io;
