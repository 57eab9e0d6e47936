macro_rules! future {
	($($typ:tt)+) => {
		impl ::core::future::Future<Output = $($typ)+>
	}
}

/// This trait allows writing bytes to some place.
///
/// Types implementing this trait are called "writers". Unlike [`std::io::Write`],
/// [`Write::write`] has "write all" semantics: it either consumes the whole of
/// `buf` or fails. Implementations must not report success after a partial write.
///
/// [`std::io::Write`]: https://doc.rust-lang.org/std/io/trait.Write.html
pub trait Write {
	/// Error type for IO operations involving the writer.
	type Error;

	/// Write the entire `buf` to the writer.
	fn write(&mut self, buf: &[u8]) -> Result<(), Self::Error>;

	/// Flush the writer ensuring all bytes reach their destination.
	fn flush(&mut self) -> Result<(), Self::Error>;
}

/// This trait is the asynchronous version of [`Write`].
pub trait AsyncWrite {
	/// Error type for IO operations involving the writer.
	type Error;

	/// Asynchronously write the entire `buf` to the writer.
	fn write(&mut self, buf: &[u8]) -> future! { Result<(), Self::Error> };

	/// Asynchronously flush the writer.
	fn flush(&mut self) -> future! { Result<(), Self::Error> };
}

/// Access to the IO type wrapped by an adapter.
pub trait Writer {
	/// The wrapped type.
	type Inner;

	/// Get a reference to the wrapped type.
	fn get(&self) -> &Self::Inner;

	/// Get a mutable reference to the wrapped type.
	fn get_mut(&mut self) -> &mut Self::Inner;

	/// Destruct the adapter and get back the wrapped type.
	fn into_inner(self) -> Self::Inner;
}

/// Types that can be converted to writers.
pub trait IntoWriter<T> {
	/// Convert this type into a writer `T`.
	fn into_writer(self) -> T;
}

impl<T: Write> IntoWriter<T> for T {
	fn into_writer(self) -> T {
		self
	}
}

macro_rules! forward_impl_write {
	($typ:ty) => {
		type Error = <$typ>::Error;

		fn write(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
			(**self).write(buf)
		}

		fn flush(&mut self) -> Result<(), Self::Error> {
			(**self).flush()
		}
	};
}

macro_rules! forward_impl_async_write {
	($typ:ty) => {
		type Error = <$typ>::Error;

		async fn write(
			&mut self,
			buf: &[u8],
		) -> Result<(), Self::Error> {
			(**self).write(buf).await
		}

		async fn flush(&mut self) -> Result<(), Self::Error> {
			(**self).flush().await
		}
	};
}

impl<T: Write + ?Sized> Write for &mut T {
	forward_impl_write!(T);
}

impl<T: AsyncWrite + ?Sized> AsyncWrite for &mut T {
	forward_impl_async_write!(T);
}

#[cfg(feature = "alloc")]
impl<T: Write + ?Sized> Write for alloc::boxed::Box<T> {
	forward_impl_write!(T);
}

#[cfg(feature = "alloc")]
impl<T: AsyncWrite + ?Sized> AsyncWrite for alloc::boxed::Box<T> {
	forward_impl_async_write!(T);
}
