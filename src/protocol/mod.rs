//! Protocol Module
//!
//! The memcached text protocol, client side.
//!
//! ## Requests
//! ```text
//! stats\r\n
//! get <key>\r\n
//! set <key> <flags> <exptime> <bytes>\r\n<data>\r\n
//! delete <key>\r\n
//! flush_all\r\n
//! ```
//!
//! ## Replies
//! - Status line: `STORED`, `NOT_STORED`, `DELETED`, `NOT_FOUND`, `OK`, ...
//! - Value block: `VALUE <key> <flags> <bytes>\r\n<data>\r\nEND\r\n`, or `END\r\n` on a miss
//! - Stats block: `STAT <name> <value>\r\n` lines closed by `END\r\n`
//! - Errors: `ERROR`, `CLIENT_ERROR <msg>`, `SERVER_ERROR <msg>`
//!
//! Every exchange is one full request followed by one full reply.

mod command;
mod response;
mod codec;

pub use command::{parse_expiration, Command, StorageArgs, MAX_KEY_LEN, MAX_VALUE_LEN};
pub use response::{StatsSnapshot, StatusReply, ValueBlock};
pub use codec::{
    encode_command, read_line, read_exact, read_stats, read_status, read_value,
    ReplyReader, END, STAT_PREFIX, VALUE_PREFIX,
};
