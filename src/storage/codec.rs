//! Persisted article record and its binary encoding
//!
//! # Format
//!
//! All integers little-endian, every string and byte field length-prefixed
//! with a `u32`:
//!
//! ```text
//! [magic "NNAR":4][version:u8][number:i64][bytes:u64][lines:u64]
//! [id_len:u32][id]
//! [field_count:u32] { [name_len:u32][name] [value_count:u32] { [len:u32][value] } }
//! [body_len:u32][body]
//! ```
//!
//! Header values and the body are opaque bytes; only the Message-ID and
//! header names must be UTF-8.
//!
//! This is a storage compatibility boundary: records written by other formats
//! are rejected, not migrated.

use std::io::{self, Read, Write};

use crate::article::{Article, Headers};
use crate::error::{NntpError, Result};

const MAGIC: &[u8; 4] = b"NNAR";
const VERSION: u8 = 1;

/// Upper bound for any single length field, to avoid huge allocations on corrupt data
const MAX_FIELD_SIZE: usize = 64 * 1024 * 1024;

/// The unit stored under a Message-ID key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    /// Message-ID (the storage key)
    pub id: String,
    /// Article number assigned at posting time
    pub number: i64,
    /// Header fields
    pub headers: Headers,
    /// Raw body bytes
    pub body: Vec<u8>,
    /// Body size
    pub bytes: u64,
    /// Body line count
    pub lines: u64,
}

impl ArticleRecord {
    /// Capture an article for storage
    pub fn from_article(id: impl Into<String>, number: i64, article: &Article) -> Self {
        Self {
            id: id.into(),
            number,
            headers: article.headers.clone(),
            body: article.body.clone(),
            bytes: article.bytes as u64,
            lines: article.lines as u64,
        }
    }

    /// Rebuild the article, with a fresh body owned by the caller
    pub fn into_article(self) -> Article {
        Article {
            headers: self.headers,
            body: self.body,
            bytes: self.bytes as usize,
            lines: self.lines as usize,
            number: self.number,
        }
    }

    /// Write the record
    pub fn encode(&self, writer: &mut impl Write) -> io::Result<()> {
        writer.write_all(MAGIC)?;
        writer.write_all(&[VERSION])?;
        writer.write_all(&self.number.to_le_bytes())?;
        writer.write_all(&self.bytes.to_le_bytes())?;
        writer.write_all(&self.lines.to_le_bytes())?;
        write_bytes(writer, self.id.as_bytes())?;

        write_len(writer, self.headers.len())?;
        for (name, values) in self.headers.iter() {
            write_bytes(writer, name.as_bytes())?;
            write_len(writer, values.len())?;
            for value in values {
                write_bytes(writer, value)?;
            }
        }

        write_bytes(writer, &self.body)
    }

    /// Encode into a new buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.estimated_size());
        self.encode(&mut buf)
            .map_err(|e| NntpError::Codec(e.to_string()))?;
        Ok(buf)
    }

    /// Read a record
    pub fn decode(reader: &mut impl Read) -> Result<Self> {
        let mut magic = [0u8; 4];
        read_exact(reader, &mut magic)?;
        if &magic != MAGIC {
            return Err(NntpError::Codec("bad record magic".to_string()));
        }

        let mut version = [0u8; 1];
        read_exact(reader, &mut version)?;
        if version[0] != VERSION {
            return Err(NntpError::Codec(format!(
                "unsupported record version {}",
                version[0]
            )));
        }

        let number = i64::from_le_bytes(read_array(reader)?);
        let bytes = u64::from_le_bytes(read_array(reader)?);
        let lines = u64::from_le_bytes(read_array(reader)?);
        let id = read_string(reader)?;

        let field_count = read_len(reader)?;
        let mut headers = Headers::new();
        for _ in 0..field_count {
            let name = read_string(reader)?;
            let value_count = read_len(reader)?;
            for _ in 0..value_count {
                headers.append(name.clone(), read_bytes(reader)?);
            }
        }

        let body = read_bytes(reader)?;

        Ok(Self {
            id,
            number,
            headers,
            body,
            bytes,
            lines,
        })
    }

    /// Decode a complete buffer, rejecting trailing bytes
    pub fn from_bytes(mut data: &[u8]) -> Result<Self> {
        let record = Self::decode(&mut data)?;
        if !data.is_empty() {
            return Err(NntpError::Codec(format!(
                "{} trailing bytes after record",
                data.len()
            )));
        }
        Ok(record)
    }

    fn estimated_size(&self) -> usize {
        let headers: usize = self
            .headers
            .iter()
            .map(|(name, values)| {
                8 + name.len() + values.iter().map(|v| 4 + v.len()).sum::<usize>()
            })
            .sum();
        4 + 1 + 8 + 8 + 8 + 4 + self.id.len() + 4 + headers + 4 + self.body.len()
    }
}

fn write_len(writer: &mut impl Write, len: usize) -> io::Result<()> {
    let len = u32::try_from(len)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "field too large"))?;
    writer.write_all(&len.to_le_bytes())
}

fn write_bytes(writer: &mut impl Write, data: &[u8]) -> io::Result<()> {
    write_len(writer, data.len())?;
    writer.write_all(data)
}

fn read_exact(reader: &mut impl Read, buf: &mut [u8]) -> Result<()> {
    reader
        .read_exact(buf)
        .map_err(|e| NntpError::Codec(format!("truncated record: {}", e)))
}

fn read_array<const N: usize>(reader: &mut impl Read) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    read_exact(reader, &mut buf)?;
    Ok(buf)
}

fn read_len(reader: &mut impl Read) -> Result<usize> {
    let len = u32::from_le_bytes(read_array(reader)?) as usize;
    if len > MAX_FIELD_SIZE {
        return Err(NntpError::Codec(format!(
            "field length {} exceeds {} bytes",
            len, MAX_FIELD_SIZE
        )));
    }
    Ok(len)
}

fn read_bytes(reader: &mut impl Read) -> Result<Vec<u8>> {
    let len = read_len(reader)?;
    let mut buf = Vec::new();
    reader
        .take(len as u64)
        .read_to_end(&mut buf)
        .map_err(|e| NntpError::Codec(e.to_string()))?;
    if buf.len() != len {
        return Err(NntpError::Codec(format!(
            "expected {} bytes, got {}",
            len,
            buf.len()
        )));
    }
    Ok(buf)
}

fn read_string(reader: &mut impl Read) -> Result<String> {
    String::from_utf8(read_bytes(reader)?)
        .map_err(|e| NntpError::Codec(format!("invalid UTF-8 in record: {}", e)))
}
