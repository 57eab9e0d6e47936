//! Sync & async byte sinks for `protowire`.
//!
//! The encoder in `protowire` only ever needs two things from the place its
//! bytes end up: "take all of these bytes" and "make sure everything reaches
//! its destination". [`Write`] and [`AsyncWrite`] describe exactly that and
//! nothing more. Adapters for the IO traits of [`mod@std`], `tokio` and
//! `futures` live behind their respective features.
#![allow(
	unknown_lints,
	clippy::new_without_default,
	clippy::needless_doctest_main
)]
#![warn(
	clippy::all,
	clippy::style,
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

#[cfg(feature = "alloc")]
extern crate alloc;

mod cursor;
mod util;
mod write;

mod impls;

pub use self::cursor::{Cursor, WriteZero};
pub use self::impls::*;
pub use self::util::copy_slice;
pub use self::write::{AsyncWrite, IntoWriter, Write, Writer};

/// Common trait imports.
pub mod prelude {
	pub use super::{AsyncWrite, IntoWriter, Write, Writer};
}
