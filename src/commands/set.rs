use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Set `key` to hold `value`, overwriting any previous value.
///
/// Ref: <https://redis.io/docs/latest/commands/set/>
#[derive(Debug, PartialEq)]
pub struct Set {
    pub key: String,
    pub value: Bytes,
}

impl Executable for Set {
    fn exec(self, store: Store) -> Result<Frame, Error> {
        store.set(self.key, self.value);

        Ok(Frame::Simple("OK".to_string()))
    }
}

impl TryFrom<&mut CommandParser> for Set {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        parser.check_arity("set", 2, 2)?;

        let key = parser.next_string()?;
        let value = parser.next_bytes()?;

        Ok(Self { key, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;

    #[test]
    fn set_and_overwrite() {
        let store = Store::new();

        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("SET")),
            Frame::Bulk(Bytes::from("key1")),
            Frame::Bulk(Bytes::from("value1")),
        ]);
        let cmd = Command::try_from(frame).unwrap();

        assert_eq!(
            cmd,
            Command::Set(Set {
                key: String::from("key1"),
                value: Bytes::from("value1")
            })
        );

        let result = cmd.exec(store.clone()).unwrap();
        assert_eq!(result, Frame::Simple("OK".to_string()));
        assert_eq!(store.get("key1"), Some(Bytes::from("value1")));

        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("SET")),
            Frame::Bulk(Bytes::from("key1")),
            Frame::Bulk(Bytes::from("value2")),
        ]);
        let cmd = Command::try_from(frame).unwrap();

        let result = cmd.exec(store.clone()).unwrap();
        assert_eq!(result, Frame::Simple("OK".to_string()));
        assert_eq!(store.get("key1"), Some(Bytes::from("value2")));
    }

    #[test]
    fn missing_value_argument() {
        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("SET")),
            Frame::Bulk(Bytes::from("onlykey")),
        ]);

        let err = Command::try_from(frame).err().unwrap();

        assert_eq!(
            err.to_string(),
            "wrong number of arguments for 'set' command"
        );
    }
}
