use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use bytes::{Bytes, BytesMut};
use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::traits::Transport;

/// Transport over any blocking `Read + Write` stream.
///
/// `read` follows serial-port semantics: it keeps pulling bytes until
/// `max_len` arrived, the stream hits EOF, or the stream's own read timeout
/// fires. Whatever arrived by then is returned.
pub struct StreamTransport<T> {
    inner: T,
}

impl<T: Read + Write> StreamTransport<T> {
    /// Wrap an already-configured stream.
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the transport and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl StreamTransport<File> {
    /// Open a device node (e.g. `/dev/ttyUSB0`) for reading and writing.
    ///
    /// Line settings and the read timeout belong to the device node and must
    /// be configured beforehand (`stty`, udev rules).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| TransportError::Open {
                path: path.to_path_buf(),
                source: e,
            })?;
        info!(?path, "opened device");
        Ok(Self::new(file))
    }
}

impl<T: Read + Write> Transport for StreamTransport<T> {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let mut offset = 0usize;
        while offset < bytes.len() {
            match self.inner.write(&bytes[offset..]) {
                Ok(0) => return Err(TransportError::Closed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }

        loop {
            match self.inner.flush() {
                Ok(()) => break,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }

        debug!(len = bytes.len(), "wrote bytes");
        Ok(())
    }

    fn read(&mut self, max_len: usize) -> Result<Bytes> {
        let mut buf = BytesMut::zeroed(max_len);
        let mut filled = 0usize;

        while filled < max_len {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    debug!(filled, max_len, "stream reached EOF");
                    break;
                }
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if matches!(err.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                    debug!(filled, max_len, "read timed out");
                    break;
                }
                Err(err) => return Err(TransportError::Io(err)),
            }
        }

        buf.truncate(filled);
        Ok(buf.freeze())
    }
}

impl<T> std::fmt::Debug for StreamTransport<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamTransport").finish_non_exhaustive()
    }
}
