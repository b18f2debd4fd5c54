use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_util::codec::Decoder;
use uuid::Uuid;

use crate::codec::FrameCodec;
use crate::frame::Frame;

pub struct Connection {
    pub id: Uuid,
    stream: TcpStream,
    // Data is read from the socket into the read buffer. When a frame is parsed, the corresponding
    // data is removed from the buffer.
    buffer: BytesMut,
}

impl Connection {
    pub fn new(stream: TcpStream) -> Connection {
        Connection {
            id: Uuid::new_v4(),
            stream,
            // Allocate the buffer with 4kb of capacity.
            buffer: BytesMut::with_capacity(4096),
        }
    }

    /// Reads the next frame from the connection. Returns `None` when the peer
    /// closed the connection cleanly, i.e. on a frame boundary.
    pub async fn read_frame(&mut self) -> crate::Result<Option<Frame>> {
        let mut codec = FrameCodec;

        loop {
            if let Some(frame) = codec.decode(&mut self.buffer)? {
                return Ok(Some(frame));
            }

            if 0 == self.stream.read_buf(&mut self.buffer).await? {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                // The peer closed the socket while a frame was in flight.
                return Err("connection reset by peer".into());
            }
        }
    }

    pub async fn write_frame(&mut self, frame: &Frame) -> crate::Result<()> {
        let bytes = frame.serialize();
        self.stream.write_all(&bytes).await?;
        Ok(())
    }
}
