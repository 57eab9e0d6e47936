use core::fmt;
use core::hash::Hash;

trait Collector: Default + Clone + PartialEq + Eq + Hash {
	fn total_bytes(&self) -> u64;
	fn add_total_bytes(&mut self, n: u64);

	fn total_messages(&self) -> u64;
	fn inc_total_messages(&mut self);
	fn add_total_messages(&mut self, n: u64);

	fn io_ops(&self) -> u64;
	fn inc_ops(&mut self);
}

#[cfg(feature = "statistics")]
#[derive(Clone, Default, PartialEq, Eq, Hash)]
struct RealStatistics {
	total_bytes: u64,
	total_messages: u64,
	io_ops: u64,
}

#[cfg(feature = "statistics")]
impl Collector for RealStatistics {
	fn total_bytes(&self) -> u64 {
		self.total_bytes
	}

	fn add_total_bytes(&mut self, n: u64) {
		self.total_bytes = u64::saturating_add(self.total_bytes, n);
	}

	fn total_messages(&self) -> u64 {
		self.total_messages
	}

	fn inc_total_messages(&mut self) {
		self.total_messages += 1;
	}

	fn add_total_messages(&mut self, n: u64) {
		self.total_messages = u64::saturating_add(self.total_messages, n);
	}

	fn io_ops(&self) -> u64 {
		self.io_ops
	}

	fn inc_ops(&mut self) {
		self.io_ops += 1;
	}
}

#[cfg(not(feature = "statistics"))]
#[derive(Clone, Default, PartialEq, Eq, Hash)]
struct MockStatistics;

#[cfg(not(feature = "statistics"))]
impl Collector for MockStatistics {
	fn total_bytes(&self) -> u64 {
		0
	}

	fn add_total_bytes(&mut self, _: u64) {}

	fn total_messages(&self) -> u64 {
		0
	}

	fn inc_total_messages(&mut self) {}

	fn add_total_messages(&mut self, _: u64) {}

	fn io_ops(&self) -> u64 {
		0
	}

	fn inc_ops(&mut self) {}
}

#[cfg(feature = "statistics")]
use self::RealStatistics as StatisticsImpl;

#[cfg(not(feature = "statistics"))]
use self::MockStatistics as StatisticsImpl;

/// Encoder statistic information.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Statistics(StatisticsImpl);

impl Statistics {
	pub(crate) fn new() -> Self {
		Self(StatisticsImpl::default())
	}

	#[inline]
	pub(crate) fn add_total_bytes(&mut self, n: usize) {
		self.0.add_total_bytes(n as u64);
	}

	#[inline]
	pub(crate) fn inc_total_messages(&mut self) {
		self.0.inc_total_messages();
	}

	#[inline]
	pub(crate) fn add_total_messages(&mut self, n: u64) {
		self.0.add_total_messages(n);
	}

	#[inline]
	pub(crate) fn inc_ops(&mut self) {
		self.0.inc_ops();
	}

	/// Returns the number of bytes handed to the sink.
	///
	/// Encoders writing to a flat buffer never hand anything to a sink.
	#[inline]
	#[must_use]
	pub fn total_bytes(&self) -> u64 {
		self.0.total_bytes()
	}

	/// Returns the number of nested messages and groups written.
	#[inline]
	#[must_use]
	pub fn total_messages(&self) -> u64 {
		self.0.total_messages()
	}

	/// Returns the number of writes issued to the sink.
	#[inline]
	#[must_use]
	pub fn io_ops(&self) -> u64 {
		self.0.io_ops()
	}
}

impl fmt::Debug for Statistics {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Statistics")
			.field("total_bytes", &self.total_bytes())
			.field("total_messages", &self.total_messages())
			.field("io_ops", &self.io_ops())
			.finish()
	}
}
