use crate::commands::executable::Executable;
use crate::commands::CommandParser;
use crate::frame::Frame;
use crate::store::Store;
use crate::Error;

/// Get the value of `key`. If the key does not exist the special value `nil`
/// is returned.
///
/// Ref: <https://redis.io/docs/latest/commands/get/>
#[derive(Debug, PartialEq)]
pub struct Get {
    pub key: String,
}

impl Executable for Get {
    fn exec(self, store: Store) -> Result<Frame, Error> {
        match store.get(&self.key) {
            Some(value) => Ok(Frame::Bulk(value)),
            None => Ok(Frame::Null),
        }
    }
}

impl TryFrom<&mut CommandParser> for Get {
    type Error = Error;

    fn try_from(parser: &mut CommandParser) -> Result<Self, Self::Error> {
        parser.check_arity("get", 1, 1)?;

        let key = parser.next_string()?;
        Ok(Self { key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use bytes::Bytes;

    #[test]
    fn existing_key() {
        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("GET")),
            Frame::Bulk(Bytes::from("key1")),
        ]);
        let cmd = Command::try_from(frame).unwrap();

        assert_eq!(
            cmd,
            Command::Get(Get {
                key: String::from("key1")
            })
        );

        let store = Store::new();
        store.set(String::from("key1"), Bytes::from("1"));

        let result = cmd.exec(store).unwrap();

        assert_eq!(result, Frame::Bulk(Bytes::from("1")));
    }

    #[test]
    fn missing_key() {
        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from("GET")),
            Frame::Bulk(Bytes::from("key1")),
        ]);
        let cmd = Command::try_from(frame).unwrap();

        let result = cmd.exec(Store::new()).unwrap();

        assert_eq!(result, Frame::Null);
    }

    #[test]
    fn missing_key_argument() {
        let frame = Frame::Array(vec![Frame::Bulk(Bytes::from("GET"))]);

        let err = Command::try_from(frame).err().unwrap();

        assert_eq!(
            err.to_string(),
            "wrong number of arguments for 'get' command"
        );
    }
}
