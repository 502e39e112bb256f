//! Line-oriented connection I/O
//!
//! NNTP framing on the server side:
//! - Commands and single-line responses are CRLF-terminated (bare LF is
//!   accepted on input)
//! - Multi-line blocks end with a lone `.`; lines starting with `.` are
//!   stuffed with an extra `.` on output and un-stuffed on input

use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter,
};
use tokio::net::TcpStream;
use tracing::trace;

use crate::error::{NntpError, Result};

type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;
type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

const LINE_INITIAL_CAPACITY: usize = 256;

/// One client connection
pub struct Connection {
    reader: BufReader<BoxedReader>,
    writer: BufWriter<BoxedWriter>,
    max_line_length: usize,
}

impl Connection {
    /// Wrap a reader/writer pair
    pub fn new<R, W>(reader: R, writer: W, max_line_length: usize) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            reader: BufReader::new(Box::new(reader)),
            writer: BufWriter::new(Box::new(writer)),
            max_line_length,
        }
    }

    /// Wrap an accepted TCP stream
    pub fn from_tcp(stream: TcpStream, max_line_length: usize) -> Self {
        let (reader, writer) = stream.into_split();
        Self::new(reader, writer, max_line_length)
    }

    /// Read one line without its terminator
    ///
    /// Returns `None` at end of stream. A final line without a terminator is
    /// still returned.
    ///
    /// # Errors
    ///
    /// [`NntpError::LineTooLong`] when the line exceeds the configured limit.
    pub async fn read_line(&mut self) -> Result<Option<Vec<u8>>> {
        let mut line = Vec::with_capacity(LINE_INITIAL_CAPACITY);
        // Room for the limit plus CRLF
        let budget = self.max_line_length as u64 + 2;
        let n = (&mut self.reader)
            .take(budget)
            .read_until(b'\n', &mut line)
            .await?;
        if n == 0 {
            return Ok(None);
        }

        if line.ends_with(b"\n") {
            line.pop();
            if line.ends_with(b"\r") {
                line.pop();
            }
        } else if n as u64 >= budget {
            return Err(NntpError::LineTooLong(self.max_line_length));
        }

        if line.len() > self.max_line_length {
            return Err(NntpError::LineTooLong(self.max_line_length));
        }
        trace!("Received: {}", String::from_utf8_lossy(&line));
        Ok(Some(line))
    }

    /// Read a dot-terminated block, un-stuffing each line
    ///
    /// # Errors
    ///
    /// An I/O error of kind `UnexpectedEof` if the stream ends before the
    /// terminating `.`.
    pub async fn read_block(&mut self) -> Result<Vec<Vec<u8>>> {
        let mut lines = Vec::new();
        loop {
            let Some(mut line) = self.read_line().await? else {
                return Err(NntpError::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "connection closed inside a multi-line block",
                )));
            };
            if line == b"." {
                return Ok(lines);
            }
            if line.starts_with(b"..") {
                line.remove(0);
            }
            lines.push(line);
        }
    }

    /// Write a single-line response and flush
    pub async fn write_status(&mut self, line: &str) -> Result<()> {
        trace!("Sending: {}", line);
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\r\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Write a status line followed by a dot-stuffed, dot-terminated block, and flush
    pub async fn write_multiline<I>(&mut self, status: &str, lines: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        trace!("Sending: {}", status);
        self.writer.write_all(status.as_bytes()).await?;
        self.writer.write_all(b"\r\n").await?;
        for line in lines {
            let line = line.as_ref();
            if line.starts_with(b".") {
                self.writer.write_all(b".").await?;
            }
            self.writer.write_all(line).await?;
            self.writer.write_all(b"\r\n").await?;
        }
        self.writer.write_all(b".\r\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Flush buffered output
    pub async fn flush(&mut self) -> Result<()> {
        self.writer.flush().await?;
        Ok(())
    }
}
