use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Invalid construction parameters for a structure (error rate, capacity, dimensions)
    #[error("ERR {0}")]
    Config(&'static str),

    /// Cuckoo filter kick chain exhausted without finding a free slot
    #[error("ERR filter is full")]
    CapacityExceeded,

    /// Value cannot be represented by any listpack encoding
    #[error("ERR value too large to encode ({0} bytes)")]
    Encoding(usize),

    #[error("ERR wrong number of arguments for '{0}' command")]
    WrongArity(&'static str),

    #[error("ERR value is not an integer or out of range")]
    NotInteger,

    #[error("ERR value is out of range, must be positive")]
    OutOfRange,

    #[error("ERR value is not a valid float")]
    NotFloat,

    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,

    #[error("ERR item exists")]
    KeyExists,

    #[error("ERR no such key")]
    NoSuchKey,

    #[error("ERR unknown command '{0}'")]
    UnknownCommand(String),

    #[error("ERR Invalid argument '{value}' for CONFIG '{name}': {reason}")]
    InvalidConfig {
        name: String,
        value: String,
        reason: &'static str,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
