//! Reusable scratch memory for encoding messages before their destination is
//! known.
//!
//! Encoding a message into a temporary buffer (for example to learn its real
//! length or to hand it to an async sink in one piece) needs short-lived
//! memory. By default that memory is freshly allocated every time. Hot encode
//! loops can instead install a [`ScratchArena`] in their [`ScratchContext`],
//! which hands out ranges of one growable region and so stops allocating once
//! it has grown large enough.
//!
//! Arenas are owned by the caller. With the `std` feature every thread also
//! has a spare arena that can be borrowed with [`ScratchArena::checkout()`].

use core::fmt;
use core::ops::{Deref, DerefMut, Range};
use core::sync::atomic::{AtomicUsize, Ordering};

use alloc::vec;
use alloc::vec::Vec;

static NEXT_ARENA_ID: AtomicUsize = AtomicUsize::new(0);

fn next_arena_id() -> usize {
	NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed)
}

/// A growable byte region that hands out ranges of itself.
///
/// Ranges are referred to by [`ScratchChunk`] handles. Growing the region or
/// resetting it invalidates all handles given out before. Accessing the range
/// of an invalidated handle returns [`None`] instead of memory that now
/// belongs to someone else. Handles are only valid for the arena that handed
/// them out.
pub struct ScratchArena {
	id: usize,
	buf: Vec<u8>,
	chunks: Vec<Range<usize>>,
	generation: u64,
}

/// Handle to a range of a [`ScratchArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScratchChunk {
	arena: usize,
	index: usize,
	generation: u64,
}

impl ScratchChunk {
	/// Get the generation of the arena this handle was created in.
	#[inline]
	#[must_use]
	pub fn generation(&self) -> u64 {
		self.generation
	}
}

impl ScratchArena {
	/// Create a new empty arena. No memory is allocated until the first chunk
	/// is requested.
	#[inline]
	#[must_use]
	pub fn new() -> Self {
		Self::from_buf(Vec::new())
	}

	/// Create a new arena whose region is `capacity` bytes large.
	#[must_use]
	pub fn with_capacity(capacity: usize) -> Self {
		Self::from_buf(vec![0; capacity])
	}

	fn from_buf(buf: Vec<u8>) -> Self {
		Self { id: next_arena_id(), buf, chunks: Vec::new(), generation: 0 }
	}

	/// Get the size of the region.
	#[inline]
	#[must_use]
	pub fn capacity(&self) -> usize {
		self.buf.len()
	}

	/// Get the number of chunks handed out since the last reset or growth.
	#[inline]
	#[must_use]
	pub fn chunk_count(&self) -> usize {
		self.chunks.len()
	}

	/// Get the current generation of the arena. The generation changes every
	/// time the arena is reset or grown.
	#[inline]
	#[must_use]
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Forget all chunks. Every existing handle becomes invalid, the region
	/// is kept.
	pub fn reset(&mut self) {
		self.chunks.clear();
		self.generation += 1;
	}

	/// Carve a zeroed range of `size` bytes out of the region.
	///
	/// If the region is too small it is replaced by one at least twice as
	/// large, which invalidates every handle given out before.
	pub fn alloc_bytes(&mut self, size: usize) -> ScratchChunk {
		let start = self.chunks.last().map_or(0, |r| r.end);

		let range = if self.buf.len() - start >= size {
			start..start + size
		} else {
			self.grow(size);
			0..size
		};

		self.buf[range.clone()].fill(0);
		self.chunks.push(range);

		ScratchChunk {
			arena: self.id,
			index: self.chunks.len() - 1,
			generation: self.generation,
		}
	}

	/// Get the range of `chunk`, or [`None`] if the handle has been
	/// invalidated or belongs to another arena.
	#[must_use]
	pub fn get(&self, chunk: ScratchChunk) -> Option<&[u8]> {
		let range = self.range(chunk)?;
		Some(&self.buf[range])
	}

	/// Get the range of `chunk` mutably, or [`None`] if the handle has been
	/// invalidated or belongs to another arena.
	#[must_use]
	pub fn get_mut(&mut self, chunk: ScratchChunk) -> Option<&mut [u8]> {
		let range = self.range(chunk)?;
		Some(&mut self.buf[range])
	}

	fn range(&self, chunk: ScratchChunk) -> Option<Range<usize>> {
		if chunk.arena != self.id || chunk.generation != self.generation {
			return None;
		}

		self.chunks.get(chunk.index).cloned()
	}

	fn grow(&mut self, min: usize) {
		let new_len = usize::max(min, self.buf.len().saturating_mul(2));
		self.buf = vec![0; new_len];
		self.chunks.clear();
		self.generation += 1;
	}

	/// Carve a range that lives as long as the borrow of the arena.
	fn alloc_slice(&mut self, size: usize) -> &mut [u8] {
		// the previous slice was borrowed from `self` and is gone by now
		self.reset();
		let chunk = self.alloc_bytes(size);
		let range = self.chunks[chunk.index].clone();
		&mut self.buf[range]
	}
}

impl Default for ScratchArena {
	#[inline]
	fn default() -> Self {
		Self::new()
	}
}

impl Clone for ScratchArena {
	/// Clone the region and its chunks. The clone is a separate arena, handles
	/// of `self` are not valid for it.
	fn clone(&self) -> Self {
		Self {
			id: next_arena_id(),
			buf: self.buf.clone(),
			chunks: self.chunks.clone(),
			generation: self.generation,
		}
	}
}

impl fmt::Debug for ScratchArena {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ScratchArena")
			.field("capacity", &self.capacity())
			.field("chunks", &self.chunk_count())
			.field("generation", &self.generation)
			.finish()
	}
}

/// Where scratch memory comes from.
///
/// A context without an arena allocates fresh memory for every request. A
/// context with an installed arena carves requests out of the arena instead.
#[derive(Default)]
pub struct ScratchContext<'a> {
	arena: Option<&'a mut ScratchArena>,
}

impl<'a> ScratchContext<'a> {
	/// Create a new context that allocates fresh memory for every request.
	#[inline]
	#[must_use]
	pub const fn new() -> Self {
		Self { arena: None }
	}

	/// Create a new context that carves requests out of `arena`.
	#[inline]
	#[must_use]
	pub fn with_arena(arena: &'a mut ScratchArena) -> Self {
		Self { arena: Some(arena) }
	}

	/// Carve future requests out of `arena`. Returns the previously installed
	/// arena, if any.
	pub fn install(
		&mut self,
		arena: &'a mut ScratchArena,
	) -> Option<&'a mut ScratchArena> {
		self.arena.replace(arena)
	}

	/// Go back to allocating fresh memory. Returns the previously installed
	/// arena, if any.
	pub fn uninstall(&mut self) -> Option<&'a mut ScratchArena> {
		self.arena.take()
	}

	/// Check whether an arena is installed.
	#[inline]
	#[must_use]
	pub fn has_arena(&self) -> bool {
		self.arena.is_some()
	}

	/// Get `size` zeroed bytes of scratch memory.
	///
	/// The memory is only valid until the next request, which the borrow of
	/// `self` enforces.
	pub fn alloc_bytes(&mut self, size: usize) -> ScratchBytes<'_> {
		match self.arena {
			Some(ref mut arena) => ScratchBytes::Arena(arena.alloc_slice(size)),
			None => ScratchBytes::Heap(vec![0; size]),
		}
	}
}

impl fmt::Debug for ScratchContext<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ScratchContext")
			.field("arena", &self.arena)
			.finish()
	}
}

/// Scratch memory returned by [`ScratchContext::alloc_bytes()`].
#[derive(Debug)]
pub enum ScratchBytes<'a> {
	/// Freshly allocated memory.
	Heap(Vec<u8>),
	/// A range of an installed arena.
	Arena(&'a mut [u8]),
}

impl Deref for ScratchBytes<'_> {
	type Target = [u8];

	fn deref(&self) -> &Self::Target {
		match self {
			Self::Heap(x) => x.as_slice(),
			Self::Arena(x) => &**x,
		}
	}
}

impl DerefMut for ScratchBytes<'_> {
	fn deref_mut(&mut self) -> &mut Self::Target {
		match self {
			Self::Heap(x) => x.as_mut_slice(),
			Self::Arena(x) => &mut **x,
		}
	}
}

#[cfg(feature = "std")]
mod thread {
	use core::cell::Cell;
	use core::fmt;
	use core::mem;
	use core::ops::{Deref, DerefMut};

	use super::ScratchArena;

	std::thread_local! {
		static SPARE: Cell<Option<ScratchArena>> = const { Cell::new(None) };
	}

	impl ScratchArena {
		/// Borrow the spare arena of the current thread.
		///
		/// The arena goes back to the thread when the guard is dropped, so
		/// memory grown during one checkout is reused by the next one. Nested
		/// checkouts get a new empty arena.
		///
		/// # Example
		///
		/// ```
		/// use protowire::{ScratchArena, ScratchContext};
		///
		/// let mut arena = ScratchArena::checkout();
		/// let mut scratch = ScratchContext::with_arena(&mut arena);
		///
		/// let bytes = scratch.alloc_bytes(16);
		/// assert_eq!(bytes.len(), 16);
		/// ```
		#[must_use]
		pub fn checkout() -> ScratchGuard {
			let arena = SPARE
				.try_with(Cell::take)
				.ok()
				.flatten()
				.unwrap_or_default();

			ScratchGuard { arena }
		}
	}

	/// A [`ScratchArena`] borrowed from the current thread.
	pub struct ScratchGuard {
		arena: ScratchArena,
	}

	impl Deref for ScratchGuard {
		type Target = ScratchArena;

		fn deref(&self) -> &Self::Target {
			&self.arena
		}
	}

	impl DerefMut for ScratchGuard {
		fn deref_mut(&mut self) -> &mut Self::Target {
			&mut self.arena
		}
	}

	impl Drop for ScratchGuard {
		fn drop(&mut self) {
			let mut arena = mem::take(&mut self.arena);
			arena.reset();

			// keep the larger of two arenas if a nested checkout returns first
			let _ = SPARE.try_with(|spare| {
				let other = spare.take().unwrap_or_default();
				if other.capacity() > arena.capacity() {
					spare.set(Some(other));
				} else {
					spare.set(Some(arena));
				}
			});
		}
	}

	impl fmt::Debug for ScratchGuard {
		fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
			f.debug_tuple("ScratchGuard").field(&self.arena).finish()
		}
	}
}

#[cfg(feature = "std")]
pub use self::thread::ScratchGuard;
