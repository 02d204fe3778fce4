//! # Trie Builder
//!
//! Builds a complete trie from a key/value snapshot and writes its nodes.
//! Full nodes use this to materialize the trie they serve proofs from.
//!
//! Entries are sorted first, so the same snapshot always yields the same
//! root regardless of insertion order.

use super::{node_key, Hash, Nibbles, TrieError, TrieNode, EMPTY_TRIE_ROOT};
use crate::ports::NodeWriter;
use std::collections::BTreeMap;

/// Build the trie holding `entries` under `prefix` and return its root.
///
/// A later entry with the same key replaces an earlier one.
pub fn build_trie<W, I>(writer: &W, prefix: &[u8], entries: I) -> Result<Hash, TrieError>
where
    W: NodeWriter + ?Sized,
    I: IntoIterator<Item = (Vec<u8>, Vec<u8>)>,
{
    let sorted: BTreeMap<Vec<u8>, Vec<u8>> = entries.into_iter().collect();
    if sorted.is_empty() {
        return Ok(EMPTY_TRIE_ROOT);
    }

    let paths: Vec<(Nibbles, &[u8])> = sorted
        .iter()
        .map(|(key, value)| (Nibbles::from_bytes(key), value.as_slice()))
        .collect();

    let mut batch = Vec::new();
    let root = build_node(&paths, 0, prefix, &mut batch);
    writer.batch_put(batch)?;
    Ok(root)
}

/// Encode the subtrie for `entries` (sorted, sharing the first `depth`
/// nibbles), queue its nodes and return its hash.
fn build_node(
    entries: &[(Nibbles, &[u8])],
    depth: usize,
    prefix: &[u8],
    batch: &mut Vec<(Vec<u8>, Vec<u8>)>,
) -> Hash {
    let node = match entries {
        [(path, value)] => TrieNode::Leaf {
            path: Nibbles(path.suffix(depth).to_vec()),
            value: value.to_vec(),
        },
        _ => {
            let shared = common_prefix(entries, depth);
            if shared > 0 {
                let (first, _) = &entries[0];
                let child = build_node(entries, depth + shared, prefix, batch);
                TrieNode::Extension {
                    path: Nibbles(first.suffix(depth)[..shared].to_vec()),
                    child,
                }
            } else {
                build_branch(entries, depth, prefix, batch)
            }
        }
    };

    let hash = node.hash();
    batch.push((node_key(prefix, &hash), node.rlp_encode()));
    hash
}

fn build_branch(
    entries: &[(Nibbles, &[u8])],
    depth: usize,
    prefix: &[u8],
    batch: &mut Vec<(Vec<u8>, Vec<u8>)>,
) -> TrieNode {
    let mut children: Box<[Option<Hash>; 16]> = Box::new([None; 16]);
    let mut value = None;

    // Sorted order puts a key ending here first, then each nibble's run.
    let mut rest = entries;
    if let Some(((path, terminal), tail)) = rest.split_first() {
        if path.len() == depth {
            value = Some(terminal.to_vec());
            rest = tail;
        }
    }

    while let Some((first, _)) = rest.first() {
        let nibble = first.at(depth);
        let run = rest
            .iter()
            .take_while(|(path, _)| path.at(depth) == nibble)
            .count();
        children[nibble as usize] = Some(build_node(&rest[..run], depth + 1, prefix, batch));
        rest = &rest[run..];
    }

    TrieNode::Branch { children, value }
}

/// Nibbles shared by every entry after `depth`. Sorted input means the
/// first and last entries bound the whole run.
fn common_prefix(entries: &[(Nibbles, &[u8])], depth: usize) -> usize {
    match (entries.first(), entries.last()) {
        (Some((first, _)), Some((last, _))) => first
            .suffix(depth)
            .iter()
            .zip(last.suffix(depth))
            .take_while(|(a, b)| a == b)
            .count(),
        _ => 0,
    }
}
