use super::bloomfilter::BloomFilter;
use super::cms::CountMinSketch;
use super::cuckoofilter::CuckooFilter;
use super::quicklist::List;

/// A value stored under a key
#[derive(Debug)]
pub enum DataType {
    /// List - chain of listpack nodes
    List(Box<List>),
    BloomFilter(Box<BloomFilter>),
    CuckooFilter(Box<CuckooFilter>),
    CountMinSketch(Box<CountMinSketch>),
}

impl DataType {
    /// Name reported by TYPE
    #[inline]
    pub fn type_name(&self) -> &'static str {
        match self {
            DataType::List(_) => "list",
            DataType::BloomFilter(_) => "MBbloom--",
            DataType::CuckooFilter(_) => "MBbloomCF",
            DataType::CountMinSketch(_) => "CMSk-TYPE",
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&List> {
        match self {
            DataType::List(l) => Some(l),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list_mut(&mut self) -> Option<&mut List> {
        match self {
            DataType::List(l) => Some(l),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bloomfilter(&self) -> Option<&BloomFilter> {
        match self {
            DataType::BloomFilter(bf) => Some(bf),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bloomfilter_mut(&mut self) -> Option<&mut BloomFilter> {
        match self {
            DataType::BloomFilter(bf) => Some(bf),
            _ => None,
        }
    }

    #[inline]
    pub fn as_cuckoofilter(&self) -> Option<&CuckooFilter> {
        match self {
            DataType::CuckooFilter(cf) => Some(cf),
            _ => None,
        }
    }

    #[inline]
    pub fn as_cuckoofilter_mut(&mut self) -> Option<&mut CuckooFilter> {
        match self {
            DataType::CuckooFilter(cf) => Some(cf),
            _ => None,
        }
    }

    #[inline]
    pub fn as_cms(&self) -> Option<&CountMinSketch> {
        match self {
            DataType::CountMinSketch(cms) => Some(cms),
            _ => None,
        }
    }

    #[inline]
    pub fn as_cms_mut(&mut self) -> Option<&mut CountMinSketch> {
        match self {
            DataType::CountMinSketch(cms) => Some(cms),
            _ => None,
        }
    }
}
