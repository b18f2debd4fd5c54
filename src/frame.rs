// https://redis.io/docs/reference/protocol-spec

use std::fmt;

use bytes::Buf;
use bytes::Bytes;
use std::io::Cursor;
use std::string::FromUtf8Error;
use thiserror::Error as ThisError;

static CRLF: &[u8; 2] = b"\r\n";

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("not enough data is available to parse an entire frame")]
    Incomplete,
    #[error("invalid frame data type: {0}")]
    InvalidDataType(u8),
    /// Invalid message encoding.
    #[error("{0}")]
    Other(crate::Error),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    Simple(String),
    Error(String),
    Integer(i64),
    Bulk(Bytes),
    /// Null bulk string, `$-1\r\n`. Distinct from an empty bulk string.
    Null,
    /// Null array, `*-1\r\n`.
    NullArray,
    Array(Vec<Frame>),
}

impl Frame {
    /// Parses one frame out of the cursor, advancing it past the frame's
    /// bytes. Returns `Error::Incomplete` when the buffer ends mid-frame, so
    /// callers can wait for more data and retry from the same position.
    pub fn parse(src: &mut Cursor<&[u8]>) -> Result<Self, Error> {
        // The first byte in an RESP-serialized payload always identifies its type.
        // Subsequent bytes constitute the type's contents.
        let first_byte = get_byte(src)?;
        let data_type = DataType::try_from(first_byte)?;

        match data_type {
            DataType::SimpleString => {
                let bytes = get_line(src)?.to_vec();
                let string = String::from_utf8(bytes)?;
                Ok(Frame::Simple(string))
            }
            DataType::SimpleError => {
                let bytes = get_line(src)?.to_vec();
                let string = String::from_utf8(bytes)?;
                Ok(Frame::Error(string))
            }
            DataType::Integer => {
                let integer = get_integer(src)?;
                Ok(Frame::Integer(integer))
            }
            // $<length>\r\n<data>\r\n
            DataType::BulkString => {
                let length = get_integer(src)?;

                if length < 0 {
                    return Ok(Frame::Null);
                }

                let data = get_bulk_data(src, length as usize)?;
                Ok(Frame::Bulk(data))
            }
            // *<number-of-elements>\r\n<element-1>...<element-n>
            DataType::Array => {
                let length = get_integer(src)?;

                if length < 0 {
                    return Ok(Frame::NullArray);
                }

                let mut frames = Vec::with_capacity(length as usize);
                for _ in 0..length {
                    let frame = Self::parse(src)?;
                    frames.push(frame);
                }

                Ok(Frame::Array(frames))
            }
        }
    }

    /// Serializes the frame into its canonical wire representation.
    ///
    /// `Simple` and `Error` text must not contain CR or LF. That is a caller
    /// precondition; it is not validated here.
    pub fn serialize(&self) -> Vec<u8> {
        match self {
            Frame::Simple(s) => {
                let mut bytes = Vec::with_capacity(1 + s.len() + CRLF.len());
                bytes.push(u8::from(DataType::SimpleString));
                bytes.extend_from_slice(s.as_bytes());
                bytes.extend_from_slice(CRLF);
                bytes
            }
            Frame::Error(s) => {
                let mut bytes = Vec::with_capacity(1 + s.len() + CRLF.len());
                bytes.push(u8::from(DataType::SimpleError));
                bytes.extend_from_slice(s.as_bytes());
                bytes.extend_from_slice(CRLF);
                bytes
            }
            Frame::Integer(i) => {
                let mut bytes = Vec::with_capacity(1 + i.to_string().len() + CRLF.len());
                bytes.push(u8::from(DataType::Integer));
                bytes.extend_from_slice(i.to_string().as_bytes());
                bytes.extend_from_slice(CRLF);
                bytes
            }
            Frame::Bulk(bytes) => {
                let length_str = bytes.len().to_string();
                let mut result = Vec::with_capacity(
                    1 + length_str.len() + CRLF.len() + bytes.len() + CRLF.len(),
                );
                result.push(u8::from(DataType::BulkString));
                result.extend_from_slice(length_str.as_bytes());
                result.extend_from_slice(CRLF);
                result.extend_from_slice(bytes);
                result.extend_from_slice(CRLF);
                result
            }
            Frame::Null => b"$-1\r\n".to_vec(),
            Frame::NullArray => b"*-1\r\n".to_vec(),
            Frame::Array(arr) => {
                let length_str = arr.len().to_string();
                let mut bytes = Vec::with_capacity(1 + length_str.len() + CRLF.len());
                bytes.push(u8::from(DataType::Array));
                bytes.extend_from_slice(length_str.as_bytes());
                bytes.extend_from_slice(CRLF);
                for frame in arr {
                    bytes.extend(frame.serialize());
                }
                bytes
            }
        }
    }
}

impl From<Frame> for Vec<u8> {
    fn from(frame: Frame) -> Self {
        frame.serialize()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::Simple(s) => write!(f, "+{}", s),
            Frame::Error(s) => write!(f, "-{}", s),
            Frame::Integer(i) => write!(f, ":{}", i),
            Frame::Bulk(bytes) => write!(f, "${}", String::from_utf8_lossy(bytes)),
            Frame::Null => write!(f, "$-1"),
            Frame::NullArray => write!(f, "*-1"),
            Frame::Array(arr) => {
                write!(f, "*{}", arr.len())?;
                for frame in arr {
                    write!(f, " {}", frame)?;
                }
                Ok(())
            }
        }
    }
}

/// Reads bytes up to the next CRLF, consuming the terminator as well.
fn get_line<'a>(src: &mut Cursor<&'a [u8]>) -> Result<&'a [u8], Error> {
    let start = src.position() as usize;
    let end = src.get_ref().len();

    let line_end_position = src.get_ref()[start..end]
        .windows(2)
        .position(|window| window == CRLF)
        .ok_or(Error::Incomplete)
        .map(|index| start + index)?;

    src.set_position((line_end_position + CRLF.len()) as u64);

    Ok(&src.get_ref()[start..line_end_position])
}

/// Reads a CRLF-terminated line and parses it as a signed decimal integer.
/// Used both for the integer data type and for bulk/array length prefixes.
fn get_integer(src: &mut Cursor<&[u8]>) -> Result<i64, Error> {
    let line = get_line(src)?;
    let string = String::from_utf8(line.to_vec())?;

    string
        .parse::<i64>()
        .map_err(|_| format!("protocol error; invalid integer line {:?}", string).into())
}

/// Reads exactly `length` payload bytes plus the mandatory CRLF terminator.
/// A buffer ending before both are available is incomplete, not an error; a
/// payload not followed by CRLF is a framing violation.
fn get_bulk_data(src: &mut Cursor<&[u8]>, length: usize) -> Result<Bytes, Error> {
    let start = src.position() as usize;
    let end = start
        .checked_add(length)
        .and_then(|n| n.checked_add(CRLF.len()))
        .ok_or_else(|| Error::from("protocol error; bulk string length out of range"))?;

    if src.get_ref().len() < end {
        return Err(Error::Incomplete);
    }

    if &src.get_ref()[start + length..end] != CRLF {
        return Err("protocol error; bulk string missing CRLF terminator".into());
    }

    let data = Bytes::copy_from_slice(&src.get_ref()[start..start + length]);
    src.set_position(end as u64);

    Ok(data)
}

fn get_byte(src: &mut Cursor<&[u8]>) -> Result<u8, Error> {
    if !src.has_remaining() {
        return Err(Error::Incomplete);
    }
    Ok(src.get_u8())
}

#[derive(Debug)]
enum DataType {
    SimpleString, // '+'
    SimpleError,  // '-'
    Integer,      // ':'
    BulkString,   // '$'
    Array,        // '*'
}

impl TryFrom<u8> for DataType {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            b'+' => Ok(Self::SimpleString),
            b'-' => Ok(Self::SimpleError),
            b':' => Ok(Self::Integer),
            b'$' => Ok(Self::BulkString),
            b'*' => Ok(Self::Array),
            _ => Err(Error::InvalidDataType(byte)),
        }
    }
}

impl From<DataType> for u8 {
    fn from(value: DataType) -> Self {
        match value {
            DataType::SimpleString => b'+',
            DataType::SimpleError => b'-',
            DataType::Integer => b':',
            DataType::BulkString => b'$',
            DataType::Array => b'*',
        }
    }
}

impl From<FromUtf8Error> for Error {
    fn from(_src: FromUtf8Error) -> Error {
        "protocol error; invalid frame format".into()
    }
}

impl From<&str> for Error {
    fn from(src: &str) -> Error {
        src.to_string().into()
    }
}

impl From<String> for Error {
    fn from(src: String) -> Error {
        Error::Other(src.into())
    }
}
