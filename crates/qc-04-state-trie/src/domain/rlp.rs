use super::Hash;
use sha3::{Digest, Keccak256};
use thiserror::Error;

// =============================================================================
// RLP ENCODING HELPERS
// =============================================================================

/// RLP-encode a byte slice.
pub fn rlp_encode_bytes(data: &[u8]) -> Vec<u8> {
    if data.len() == 1 && data[0] < 0x80 {
        vec![data[0]]
    } else if data.len() < 56 {
        let mut result = vec![0x80 + data.len() as u8];
        result.extend_from_slice(data);
        result
    } else {
        let len_bytes = encode_length(data.len());
        let mut result = vec![0xb7 + len_bytes.len() as u8];
        result.extend_from_slice(&len_bytes);
        result.extend_from_slice(data);
        result
    }
}

/// RLP-encode multiple byte strings as a list.
pub fn rlp_encode_list_items<T: AsRef<[u8]>>(items: &[T]) -> Vec<u8> {
    let encoded_items: Vec<Vec<u8>> = items.iter().map(|i| rlp_encode_bytes(i.as_ref())).collect();
    let total_len: usize = encoded_items.iter().map(|e| e.len()).sum();

    let mut result = Vec::with_capacity(total_len + 9);
    if total_len < 56 {
        result.push(0xc0 + total_len as u8);
    } else {
        let len_bytes = encode_length(total_len);
        result.push(0xf7 + len_bytes.len() as u8);
        result.extend_from_slice(&len_bytes);
    }
    for encoded in encoded_items {
        result.extend(encoded);
    }
    result
}

/// Encode a length as minimal big-endian bytes.
fn encode_length(len: usize) -> Vec<u8> {
    let bytes = len.to_be_bytes();
    let start = bytes
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(bytes.len() - 1);
    bytes[start..].to_vec()
}

/// Compute Keccak256 hash.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

// =============================================================================
// RLP DECODING
// =============================================================================

/// Errors from decoding untrusted RLP input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RlpError {
    #[error("input ended unexpectedly")]
    UnexpectedEnd,

    #[error("expected a list")]
    ExpectedList,

    #[error("nested lists are not allowed in trie nodes")]
    NestedList,

    #[error("{0} trailing bytes after item")]
    TrailingBytes(usize),

    #[error("length prefix overflows")]
    LengthOverflow,
}

/// Item header: whether it is a list, payload offset and payload length.
struct Header {
    list: bool,
    offset: usize,
    len: usize,
}

fn decode_header(data: &[u8]) -> Result<Header, RlpError> {
    let prefix = *data.first().ok_or(RlpError::UnexpectedEnd)?;

    let header = match prefix {
        0x00..=0x7f => Header {
            list: false,
            offset: 0,
            len: 1,
        },
        0x80..=0xb7 => Header {
            list: false,
            offset: 1,
            len: (prefix - 0x80) as usize,
        },
        0xb8..=0xbf => {
            let len_of_len = (prefix - 0xb7) as usize;
            Header {
                list: false,
                offset: 1 + len_of_len,
                len: read_length(&data[1..], len_of_len)?,
            }
        }
        0xc0..=0xf7 => Header {
            list: true,
            offset: 1,
            len: (prefix - 0xc0) as usize,
        },
        0xf8..=0xff => {
            let len_of_len = (prefix - 0xf7) as usize;
            Header {
                list: true,
                offset: 1 + len_of_len,
                len: read_length(&data[1..], len_of_len)?,
            }
        }
    };

    let end = header
        .offset
        .checked_add(header.len)
        .ok_or(RlpError::LengthOverflow)?;
    if end > data.len() {
        return Err(RlpError::UnexpectedEnd);
    }
    Ok(header)
}

fn read_length(data: &[u8], len_of_len: usize) -> Result<usize, RlpError> {
    if len_of_len > std::mem::size_of::<usize>() {
        return Err(RlpError::LengthOverflow);
    }
    let bytes = data.get(..len_of_len).ok_or(RlpError::UnexpectedEnd)?;
    Ok(bytes.iter().fold(0usize, |acc, &b| (acc << 8) | b as usize))
}

/// Decode a flat RLP list of byte strings, returning each item's payload.
///
/// The list must span the whole input. Trie nodes never embed lists, so a
/// nested list is an error rather than a value.
pub fn rlp_decode_list(data: &[u8]) -> Result<Vec<&[u8]>, RlpError> {
    let header = decode_header(data)?;
    if !header.list {
        return Err(RlpError::ExpectedList);
    }
    let end = header.offset + header.len;
    if end != data.len() {
        return Err(RlpError::TrailingBytes(data.len() - end));
    }

    let mut items = Vec::new();
    let mut rest = &data[header.offset..end];
    while !rest.is_empty() {
        let item = decode_header(rest)?;
        if item.list {
            return Err(RlpError::NestedList);
        }
        let item_end = item.offset + item.len;
        items.push(&rest[item.offset..item_end]);
        rest = &rest[item_end..];
    }
    Ok(items)
}
