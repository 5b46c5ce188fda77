use bytes::Bytes;
use dashmap::mapref::entry::Entry;
use log::debug;

use crate::error::{Error, Result};
use crate::storage::quicklist::List;
use crate::storage::{DataType, Store};

/// Which end of the list an operation works on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum End {
    Head,
    Tail,
}

/// List operations for the Store
impl Store {
    // ==================== List operations ====================

    fn new_list(&self, key: &Bytes) -> List {
        debug!("creating list");
        List::new(key.clone(), self.config().list_max_listpack_size)
    }

    fn push(&self, key: &Bytes, values: &[Bytes], end: End) -> Result<usize> {
        let push_into = |list: &mut List| match end {
            End::Head => list.l_push(values),
            End::Tail => list.r_push(values),
        };

        match self.data_entry(key) {
            Entry::Occupied(mut e) => match e.get_mut().as_list_mut() {
                Some(list) => {
                    push_into(list);
                    Ok(list.len())
                }
                None => Err(Error::WrongType),
            },
            Entry::Vacant(e) => {
                let mut list = self.new_list(key);
                push_into(&mut list);
                let len = list.len();
                if len > 0 {
                    e.insert(DataType::List(Box::new(list)));
                }
                Ok(len)
            }
        }
    }

    /// Push elements to the left (head) of the list.
    /// LPUSH key a b c results in [a, b, c]: the first value becomes the head
    #[inline]
    pub fn lpush(&self, key: &Bytes, values: &[Bytes]) -> Result<usize> {
        self.push(key, values, End::Head)
    }

    /// Push elements to the right (tail) of the list
    #[inline]
    pub fn rpush(&self, key: &Bytes, values: &[Bytes]) -> Result<usize> {
        self.push(key, values, End::Tail)
    }

    /// Pop up to `count` elements; the key is removed once the list is empty
    fn pop(&self, key: &Bytes, count: usize, end: End) -> Result<Option<Vec<Bytes>>> {
        match self.data_entry(key) {
            Entry::Occupied(mut e) => {
                let (result, is_empty) = match e.get_mut().as_list_mut() {
                    Some(list) => {
                        let mut result = Vec::new();
                        for _ in 0..count {
                            let popped = match end {
                                End::Head => list.l_pop(),
                                End::Tail => list.r_pop(),
                            };
                            match popped {
                                Some(val) => result.push(val),
                                None => break,
                            }
                        }
                        (result, list.is_empty())
                    }
                    None => return Err(Error::WrongType),
                };

                if is_empty {
                    e.remove();
                }

                if result.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(result))
                }
            }
            Entry::Vacant(_) => Ok(None),
        }
    }

    /// Pop elements from the left (head) of the list
    #[inline]
    pub fn lpop(&self, key: &Bytes, count: usize) -> Result<Option<Vec<Bytes>>> {
        self.pop(key, count, End::Head)
    }

    /// Pop elements from the right (tail) of the list
    #[inline]
    pub fn rpop(&self, key: &Bytes, count: usize) -> Result<Option<Vec<Bytes>>> {
        self.pop(key, count, End::Tail)
    }

    /// Get list length, 0 for a missing key
    pub fn llen(&self, key: &[u8]) -> Result<usize> {
        match self.data_get(key) {
            Some(value) => value.as_list().map(List::len).ok_or(Error::WrongType),
            None => Ok(0),
        }
    }

    /// Elements between `start` and `stop` inclusive; negative indices count from the tail
    pub fn lrange(&self, key: &[u8], start: i64, stop: i64) -> Result<Vec<Bytes>> {
        match self.data_get(key) {
            Some(value) => value
                .as_list()
                .map(|list| list.range(start, stop))
                .ok_or(Error::WrongType),
            None => Ok(Vec::new()),
        }
    }

    /// Element at `index`; negative indices count from the tail
    pub fn lindex(&self, key: &[u8], index: i64) -> Result<Option<Bytes>> {
        match self.data_get(key) {
            Some(value) => value
                .as_list()
                .map(|list| list.index(index))
                .ok_or(Error::WrongType),
            None => Ok(None),
        }
    }
}
