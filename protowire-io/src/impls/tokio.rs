use super::prelude::*;

newtype! {
	/// Wrapper IO type for [`tokio::io::AsyncWrite`].
	Tokio
}

impl_newtype_write! { Tokio: ::tokio::io::AsyncWrite + Unpin }

impl<T> AsyncWrite for Tokio<T>
where
	T: ::tokio::io::AsyncWrite + Unpin,
{
	type Error = ::tokio::io::Error;

	async fn write(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
		::tokio::io::AsyncWriteExt::write_all(&mut self.0, buf).await
	}

	async fn flush(&mut self) -> Result<(), Self::Error> {
		::tokio::io::AsyncWriteExt::flush(&mut self.0).await
	}
}
