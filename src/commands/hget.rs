use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Get the value of `field` in the hash stored at `hash`. Returns `nil` if
/// the hash or the field does not exist.
///
/// Ref: <https://redis.io/docs/latest/commands/hget/>
#[derive(Debug, PartialEq)]
pub struct HGet {
    pub hash: String,
    pub field: String,
}

impl Executable for HGet {
    fn exec(self, store: Store) -> Result<Frame, Error> {
        match store.hget(&self.hash, &self.field) {
            Some(value) => Ok(Frame::Bulk(value)),
            None => Ok(Frame::Null),
        }
    }
}

impl TryFrom<&mut CommandParser> for HGet {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        parser.check_arity("hget", 2, 2)?;

        let hash = parser.next_string()?;
        let field = parser.next_string()?;

        Ok(Self { hash, field })
    }
}
