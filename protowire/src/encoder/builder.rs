use core::fmt;

use crate::io::{IntoWriter, Write};

use super::{Config, Encoder, NoSink};

/// Builder state for an [`Encoder`] writing to a flat buffer.
#[derive(Debug)]
pub struct FlatTarget<'a>(&'a mut [u8]);

/// Builder state for an [`Encoder`] writing to a sink.
#[derive(Debug)]
pub struct StreamTarget<W>(W);

/// A builder for [`Encoder`].
#[must_use = "builders don't do anything unless you `.build()` them"]
pub struct Builder<T> {
	target: T,
	config: Option<Config>,
}

impl Builder<()> {
	/// Create a new [`Builder`] with the default options.
	#[inline]
	pub fn new() -> Self {
		Builder { target: (), config: None }
	}

	/// Make the [`Encoder`] write into `buf`.
	#[inline]
	pub fn flat(self, buf: &mut [u8]) -> Builder<FlatTarget<'_>> {
		Builder { target: FlatTarget(buf), config: self.config }
	}

	/// Make the [`Encoder`] write to `writer`.
	#[inline]
	pub fn writer<W: Write>(
		self,
		writer: impl IntoWriter<W>,
	) -> Builder<StreamTarget<W>> {
		Builder {
			target: StreamTarget(writer.into_writer()),
			config: self.config,
		}
	}
}

impl Default for Builder<()> {
	#[inline]
	fn default() -> Self {
		Self::new()
	}
}

impl<T> Builder<T> {
	/// Sets the config of the [`Encoder`].
	#[inline]
	pub fn config(mut self, config: Config) -> Self {
		self.config = Some(config);
		self
	}
}

impl<'a> Builder<FlatTarget<'a>> {
	/// Build an [`Encoder`] writing into the flat buffer.
	#[inline]
	pub fn build(self) -> Encoder<'a, NoSink> {
		Encoder::flat_with_config(
			self.target.0,
			self.config.unwrap_or_default(),
		)
	}
}

impl<W: Write> Builder<StreamTarget<W>> {
	/// Build an [`Encoder`] writing to the sink.
	#[inline]
	pub fn build(self) -> Encoder<'static, W> {
		Encoder::streamed_with_config(
			self.target.0,
			self.config.unwrap_or_default(),
		)
	}
}

impl<T: fmt::Debug> fmt::Debug for Builder<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Builder")
			.field("target", &self.target)
			.field("config", &self.config)
			.finish()
	}
}
