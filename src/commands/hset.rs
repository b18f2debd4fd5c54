use bytes::Bytes;

use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Set `field` in the hash stored at `hash` to `value`. The hash is created
/// lazily if it does not exist.
///
/// Ref: <https://redis.io/docs/latest/commands/hset/>
#[derive(Debug, PartialEq)]
pub struct HSet {
    pub hash: String,
    pub field: String,
    pub value: Bytes,
}

impl Executable for HSet {
    fn exec(self, store: Store) -> Result<Frame, Error> {
        store.hset(self.hash, self.field, self.value);

        Ok(Frame::Simple("OK".to_string()))
    }
}

impl TryFrom<&mut CommandParser> for HSet {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        parser.check_arity("hset", 3, 3)?;

        let hash = parser.next_string()?;
        let field = parser.next_string()?;
        let value = parser.next_bytes()?;

        Ok(Self { hash, field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;

    #[test]
    fn creates_hash_lazily() {
        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("HSET")),
            Frame::Bulk(Bytes::from("users")),
            Frame::Bulk(Bytes::from("u1")),
            Frame::Bulk(Bytes::from("Ada")),
        ]);
        let cmd = Command::try_from(frame).unwrap();

        assert_eq!(
            cmd,
            Command::HSet(HSet {
                hash: String::from("users"),
                field: String::from("u1"),
                value: Bytes::from("Ada")
            })
        );

        let store = Store::new();
        let result = cmd.exec(store.clone()).unwrap();

        assert_eq!(result, Frame::Simple("OK".to_string()));
        assert_eq!(store.hget("users", "u1"), Some(Bytes::from("Ada")));
    }

    #[test]
    fn missing_value_argument() {
        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("HSET")),
            Frame::Bulk(Bytes::from("users")),
            Frame::Bulk(Bytes::from("u1")),
        ]);

        let err = Command::try_from(frame).err().unwrap();

        assert_eq!(
            err.to_string(),
            "wrong number of arguments for 'hset' command"
        );
    }
}
