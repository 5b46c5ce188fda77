use bytes::Bytes;

/// Command reply, a closed union of the shapes a handler can return
#[derive(Debug, Clone, PartialEq)]
pub enum RespValue {
    /// Bulk or status string
    String(Bytes),
    Integer(i64),
    Array(Vec<RespValue>),
    /// Error reply, message without the leading '-'
    Error(Bytes),
    /// Missing value
    Nil,
}

impl RespValue {
    pub const OK: RespValue = RespValue::String(Bytes::from_static(b"OK"));

    #[inline]
    pub fn ok() -> Self {
        Self::OK
    }

    #[inline]
    pub fn error(msg: &str) -> Self {
        Self::Error(Bytes::copy_from_slice(msg.as_bytes()))
    }

    #[inline]
    pub fn integer(n: i64) -> Self {
        Self::Integer(n)
    }

    #[inline]
    pub fn bulk(data: Bytes) -> Self {
        Self::String(data)
    }

    #[inline]
    pub fn bulk_string(s: &str) -> Self {
        Self::String(Bytes::copy_from_slice(s.as_bytes()))
    }

    /// Integer 1 or 0
    #[inline]
    pub fn boolean(b: bool) -> Self {
        Self::Integer(i64::from(b))
    }

    #[inline]
    pub fn array(items: Vec<RespValue>) -> Self {
        Self::Array(items)
    }

    /// Bulk string for `Some`, nil for `None`
    #[inline]
    pub fn optional(value: Option<Bytes>) -> Self {
        value.map_or(Self::Nil, Self::String)
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, RespValue::Error(_))
    }

    #[inline]
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            RespValue::String(b) => Some(b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            RespValue::Integer(n) => Some(*n),
            RespValue::String(b) => std::str::from_utf8(b).ok()?.parse().ok(),
            _ => None,
        }
    }
}

impl From<crate::error::Error> for RespValue {
    fn from(err: crate::error::Error) -> Self {
        RespValue::error(&err.to_string())
    }
}
