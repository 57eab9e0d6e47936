use super::prelude::*;

newtype! {
	/// Wrapper IO type for [`std::io::Write`].
	Std
}

impl_newtype_write! { Std: ::std::io::Write }

impl<T> Write for Std<T>
where
	T: ::std::io::Write,
{
	type Error = ::std::io::Error;

	fn write(&mut self, mut buf: &[u8]) -> Result<(), Self::Error> {
		use ::std::io::ErrorKind as E;

		while !buf.is_empty() {
			match self.0.write(buf) {
				Ok(0) => return Err(E::WriteZero.into()),
				Ok(n) => buf = &buf[n..],
				Err(e) if e.kind() == E::Interrupted => continue,
				Err(e) => return Err(e),
			}
		}

		Ok(())
	}

	fn flush(&mut self) -> Result<(), Self::Error> {
		use ::std::io::ErrorKind as E;

		loop {
			match self.0.flush() {
				Ok(()) => break Ok(()),
				Err(e) if e.kind() == E::Interrupted => continue,
				Err(e) => break Err(e),
			}
		}
	}
}
