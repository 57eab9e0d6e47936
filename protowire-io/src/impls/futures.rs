use super::prelude::*;

newtype! {
	/// Wrapper IO type for [`futures::AsyncWrite`].
	///
	/// [`futures::AsyncWrite`]: ::futures::AsyncWrite
	Futures
}

impl_newtype_write! { Futures: ::futures::io::AsyncWrite + Unpin }

impl<T> AsyncWrite for Futures<T>
where
	T: ::futures::io::AsyncWrite + Unpin,
{
	type Error = ::futures::io::Error;

	async fn write(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
		::futures::io::AsyncWriteExt::write_all(&mut self.0, buf).await
	}

	async fn flush(&mut self) -> Result<(), Self::Error> {
		::futures::io::AsyncWriteExt::flush(&mut self.0).await
	}
}
