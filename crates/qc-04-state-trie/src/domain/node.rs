use super::rlp::{self, keccak256};
use super::{nibbles::Nibbles, Hash, TrieError, EMPTY_TRIE_ROOT};

// =============================================================================
// TRIE NODE: The four node types in MPT
// =============================================================================

/// Node types in the Patricia Merkle Trie.
///
/// Per Ethereum Yellow Paper Appendix D, there are four node types:
/// - Empty (null reference)
/// - Leaf (remaining path + value)
/// - Extension (shared prefix + single child)
/// - Branch (16 children + optional value)
///
/// Children are always referenced by hash; nodes are never inlined.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrieNode {
    /// Empty node (null reference, hash = EMPTY_TRIE_ROOT).
    Empty,

    /// Leaf node: stores remaining key path and the value.
    /// RLP: [hex_prefix_encode(path, true), value]
    Leaf {
        /// Remaining path from current position to this leaf.
        path: Nibbles,
        /// Stored value.
        value: Vec<u8>,
    },

    /// Extension node: shared prefix optimization.
    /// RLP: [hex_prefix_encode(path, false), child_hash]
    Extension {
        /// Shared prefix path. Never empty.
        path: Nibbles,
        /// Hash of child node.
        child: Hash,
    },

    /// Branch node: 16-way branch for each nibble value.
    /// RLP: \[child\[0\], ..., child\[15\], value\]
    Branch {
        /// 16 child node hashes (None = empty).
        children: Box<[Option<Hash>; 16]>,
        /// Optional value if a key terminates at this branch.
        value: Option<Vec<u8>>,
    },
}

/// Outcome of examining one node while walking towards a key.
#[derive(Debug, PartialEq, Eq)]
pub enum Step<'a> {
    /// The key terminates here with this value.
    Value(&'a [u8]),
    /// The node proves the key is not in the trie.
    Absent,
    /// Continue at the child with this hash.
    Descend(Hash),
}

impl TrieNode {
    /// RLP-encode this node for hashing.
    pub fn rlp_encode(&self) -> Vec<u8> {
        match self {
            TrieNode::Empty => vec![0x80], // RLP empty string

            TrieNode::Leaf { path, value } => {
                let encoded_path = path.encode_hex_prefix(true);
                rlp::rlp_encode_list_items(&[encoded_path.as_slice(), value.as_slice()])
            }

            TrieNode::Extension { path, child } => {
                let encoded_path = path.encode_hex_prefix(false);
                rlp::rlp_encode_list_items(&[encoded_path.as_slice(), child.as_slice()])
            }

            TrieNode::Branch { children, value } => {
                let mut items: Vec<&[u8]> = Vec::with_capacity(17);
                for child in children.iter() {
                    items.push(child.as_ref().map_or(&[][..], |hash| hash.as_slice()));
                }
                items.push(value.as_deref().unwrap_or(&[]));
                rlp::rlp_encode_list_items(&items)
            }
        }
    }

    /// Compute Keccak256 hash of RLP-encoded node.
    pub fn hash(&self) -> Hash {
        if matches!(self, TrieNode::Empty) {
            return EMPTY_TRIE_ROOT;
        }
        keccak256(&self.rlp_encode())
    }

    /// Decode a node from untrusted bytes.
    pub fn decode(data: &[u8]) -> Result<Self, TrieError> {
        if data == [0x80] {
            return Ok(TrieNode::Empty);
        }

        let items = rlp::rlp_decode_list(data)?;
        match items.len() {
            2 => {
                let (path, is_leaf) = Nibbles::decode_hex_prefix(items[0])?;
                if is_leaf {
                    Ok(TrieNode::Leaf {
                        path,
                        value: items[1].to_vec(),
                    })
                } else {
                    if path.is_empty() {
                        return Err(TrieError::MalformedNode(
                            "extension with empty path".to_string(),
                        ));
                    }
                    Ok(TrieNode::Extension {
                        path,
                        child: decode_hash(items[1])?,
                    })
                }
            }
            17 => {
                let mut children: Box<[Option<Hash>; 16]> = Box::new([None; 16]);
                for (slot, item) in children.iter_mut().zip(&items[..16]) {
                    if !item.is_empty() {
                        *slot = Some(decode_hash(item)?);
                    }
                }
                let value = (!items[16].is_empty()).then(|| items[16].to_vec());
                Ok(TrieNode::Branch { children, value })
            }
            n => Err(TrieError::MalformedNode(format!("unexpected item count {n}"))),
        }
    }

    /// Examine this node for `key`, starting at nibble `depth`.
    ///
    /// Advances `depth` past the nibbles consumed when descending.
    pub fn step(&self, key: &Nibbles, depth: &mut usize) -> Step<'_> {
        match self {
            TrieNode::Empty => Step::Absent,

            TrieNode::Leaf { path, value } => {
                if key.suffix(*depth) == path.0.as_slice() {
                    Step::Value(value)
                } else {
                    Step::Absent
                }
            }

            TrieNode::Extension { path, child } => {
                if !key.matches_at(*depth, path) {
                    return Step::Absent; // Path diverges
                }
                *depth += path.len();
                Step::Descend(*child)
            }

            TrieNode::Branch { children, value } => {
                if *depth >= key.len() {
                    return value.as_deref().map_or(Step::Absent, Step::Value);
                }
                match children[key.at(*depth) as usize] {
                    Some(child) => {
                        *depth += 1;
                        Step::Descend(child)
                    }
                    None => Step::Absent,
                }
            }
        }
    }
}

fn decode_hash(item: &[u8]) -> Result<Hash, TrieError> {
    item.try_into().map_err(|_| {
        TrieError::MalformedNode(format!("child reference of {} bytes", item.len()))
    })
}
