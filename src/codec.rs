use bytes::{Buf, BytesMut};
use std::convert::TryInto;
use std::env;
use std::io::Cursor;
use tokio_util::codec::Decoder;

use crate::frame::{self, Frame};
use crate::Error;

/// Incremental frame decoder. A partially received frame leaves the buffer
/// untouched and yields `None`, so several pipelined requests can be decoded
/// back-to-back out of the same read buffer.
pub struct FrameCodec;

impl FrameCodec {
    fn max_frame_size() -> usize {
        env::var("MAX_FRAME_SIZE")
            .map(|s| s.parse().expect("MAX_FRAME_SIZE must be a number"))
            .unwrap_or(512 * 1024 * 1024)
    }
}

impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // Refuse to buffer arbitrarily large frames.
        if src.len() > FrameCodec::max_frame_size() {
            return Err("frame size exceeds limit".into());
        }

        let mut cursor = Cursor::new(&src[..]);
        let frame = match Frame::parse(&mut cursor) {
            Ok(frame) => frame,
            Err(frame::Error::Incomplete) => return Ok(None), // Not enough data to parse a frame.
            Err(err) => return Err(err.into()),
        };

        let position: usize = cursor
            .position()
            .try_into()
            .expect("Cursor position is too large");

        // Remove the parsed frame from the buffer.
        src.advance(position);

        Ok(Some(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn decode_consumes_only_one_frame() {
        let mut codec = FrameCodec;
        let mut buffer = BytesMut::from(&b"+OK\r\n:7\r\n"[..]);

        let frame = codec.decode(&mut buffer).unwrap();
        assert_eq!(frame, Some(Frame::Simple("OK".to_string())));

        let frame = codec.decode(&mut buffer).unwrap();
        assert_eq!(frame, Some(Frame::Integer(7)));

        assert!(buffer.is_empty());
    }

    #[test]
    fn decode_incomplete_frame_returns_none() {
        let mut codec = FrameCodec;
        let mut buffer = BytesMut::from(&b"*2\r\n$3\r\nGET\r\n$3\r\nfo"[..]);

        let frame = codec.decode(&mut buffer).unwrap();
        assert_eq!(frame, None);

        // The partial frame stays buffered until the rest arrives.
        buffer.extend_from_slice(b"o\r\n");
        let frame = codec.decode(&mut buffer).unwrap();
        assert_eq!(
            frame,
            Some(Frame::Array(vec![
                Frame::Bulk(Bytes::from("GET")),
                Frame::Bulk(Bytes::from("foo")),
            ]))
        );
    }

    #[test]
    fn decode_invalid_tag_is_an_error() {
        let mut codec = FrameCodec;
        let mut buffer = BytesMut::from(&b"#t\r\n"[..]);

        assert!(codec.decode(&mut buffer).is_err());
    }
}
