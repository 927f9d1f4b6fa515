use bytes::Bytes;

use crate::error::Result;

/// A blocking, byte-oriented link to the device.
///
/// `read` returns at most `max_len` bytes. It may return fewer when the
/// underlying timeout elapses; callers must treat a short read as data,
/// not as an error.
pub trait Transport {
    /// Write every byte of `bytes` to the device.
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Read up to `max_len` bytes from the device.
    fn read(&mut self, max_len: usize) -> Result<Bytes>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write(bytes)
    }

    fn read(&mut self, max_len: usize) -> Result<Bytes> {
        (**self).read(max_len)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write(bytes)
    }

    fn read(&mut self, max_len: usize) -> Result<Bytes> {
        (**self).read(max_len)
    }
}
