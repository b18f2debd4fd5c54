use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Get all field/value pairs of the hash stored at `hash`, as a flat array of
/// alternating fields and values. Returns a null array if the hash does not
/// exist. Pair order is store-defined and not stable across calls.
///
/// Ref: <https://redis.io/docs/latest/commands/hgetall/>
#[derive(Debug, PartialEq)]
pub struct HGetAll {
    pub hash: String,
}

impl Executable for HGetAll {
    fn exec(self, store: Store) -> Result<Frame, Error> {
        let pairs = match store.hgetall(&self.hash) {
            Some(pairs) => pairs,
            None => return Ok(Frame::NullArray),
        };

        let mut frames = Vec::with_capacity(pairs.len() * 2);
        for (field, value) in pairs {
            frames.push(Frame::Bulk(Bytes::from(field)));
            frames.push(Frame::Bulk(value));
        }

        Ok(Frame::Array(frames))
    }
}

impl TryFrom<&mut CommandParser> for HGetAll {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        parser.check_arity("hgetall", 1, 1)?;

        let hash = parser.next_string()?;
        Ok(Self { hash })
    }
}
