use core::fmt;

/// Configuration for [`Encoder`].
///
/// [`Encoder`]: super::Encoder
#[derive(Clone)]
#[must_use = "`Config`s don't do anything on their own"]
pub struct Config {
	pub(crate) window_size: usize,
	pub(crate) flags: u8,
}

impl Config {
	/// Default size of the paging window of encoders writing to a sink.
	pub const DEFAULT_WINDOW_SIZE: usize = 4096;

	/// Smallest paging window an encoder will use. Any single primitive
	/// value always fits in a window of this size.
	pub const MIN_WINDOW_SIZE: usize = 16;

	const LEAVE_OPEN: u8 = 1 << 0;
	const DETERMINISTIC: u8 = 1 << 1;

	#[inline]
	const fn get_flag(&self, flag: u8) -> bool {
		self.flags & flag != 0
	}

	#[inline]
	fn set_flag(&mut self, flag: u8, value: bool) {
		if value {
			self.flags |= flag;
		} else {
			self.flags &= !flag;
		}
	}
}

impl Default for Config {
	#[inline]
	fn default() -> Self {
		Self { window_size: Self::DEFAULT_WINDOW_SIZE, flags: 0 }
	}
}

impl Config {
	/// Get the size of the paging window.
	#[inline]
	#[must_use]
	pub fn window_size(&self) -> usize {
		self.window_size
	}

	/// Set the size of the paging window.
	///
	/// Sizes smaller than [`Config::MIN_WINDOW_SIZE`] are raised to it. The
	/// window size never changes the bytes that reach the sink, only how they
	/// are chunked.
	#[inline]
	pub fn set_window_size(&mut self, window_size: usize) -> &mut Self {
		self.window_size =
			usize::max(window_size, Self::MIN_WINDOW_SIZE);
		self
	}

	/// Set the size of the paging window.
	#[inline]
	pub fn with_window_size(mut self, window_size: usize) -> Self {
		self.set_window_size(window_size);
		self
	}

	/// Check whether [`Encoder::finish()`] hands the sink back instead of
	/// dropping it.
	///
	/// [`Encoder::finish()`]: super::Encoder::finish
	#[inline]
	#[must_use]
	pub fn leave_open(&self) -> bool {
		self.get_flag(Self::LEAVE_OPEN)
	}

	/// Set whether [`Encoder::finish()`] hands the sink back instead of
	/// dropping it.
	///
	/// [`Encoder::finish()`]: super::Encoder::finish
	#[inline]
	pub fn set_leave_open(&mut self, yes: bool) -> &mut Self {
		self.set_flag(Self::LEAVE_OPEN, yes);
		self
	}

	/// Set whether [`Encoder::finish()`] hands the sink back instead of
	/// dropping it.
	///
	/// [`Encoder::finish()`]: super::Encoder::finish
	#[inline]
	pub fn with_leave_open(mut self, yes: bool) -> Self {
		self.set_leave_open(yes);
		self
	}

	/// Check whether collaborators are asked for deterministic output.
	///
	/// The encoder itself never reorders anything. Messages read this flag
	/// through [`Encoder::deterministic()`] and, for example, sort map entries
	/// before writing them. The output is only stable within one build.
	///
	/// [`Encoder::deterministic()`]: super::Encoder::deterministic
	#[inline]
	#[must_use]
	pub fn deterministic(&self) -> bool {
		self.get_flag(Self::DETERMINISTIC)
	}

	/// Set whether collaborators are asked for deterministic output.
	#[inline]
	pub fn set_deterministic(&mut self, yes: bool) -> &mut Self {
		self.set_flag(Self::DETERMINISTIC, yes);
		self
	}

	/// Set whether collaborators are asked for deterministic output.
	#[inline]
	pub fn with_deterministic(mut self, yes: bool) -> Self {
		self.set_deterministic(yes);
		self
	}
}

impl fmt::Debug for Config {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Config")
			.field("window_size", &self.window_size())
			.field("leave_open", &self.leave_open())
			.field("deterministic", &self.deterministic())
			.finish()
	}
}
