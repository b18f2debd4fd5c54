use crate::commands::executable::Executable;
use crate::commands::{CommandParser, CommandParserError};
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Remove each key from both the string and the hash namespace and return
/// the number of removals. A key present in both namespaces counts twice.
///
/// Ref: <https://redis.io/docs/latest/commands/del/>
#[derive(Debug, PartialEq)]
pub struct Del {
    pub keys: Vec<String>,
}

impl Executable for Del {
    fn exec(self, store: Store) -> Result<Frame, Error> {
        let count = store.del(&self.keys);

        Ok(Frame::Integer(count))
    }
}

impl TryFrom<&mut CommandParser> for Del {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        parser.check_arity("del", 1, usize::MAX)?;

        let mut keys = vec![];

        loop {
            match parser.next_string() {
                Ok(key) => keys.push(key),
                Err(CommandParserError::EndOfStream) => break,
                Err(err) => return Err(err.into()),
            }
        }

        Ok(Self { keys })
    }
}
