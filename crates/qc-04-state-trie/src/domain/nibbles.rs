use super::TrieError;

// =============================================================================
// NIBBLES: Half-byte path representation
// =============================================================================

/// Nibble path for trie traversal.
///
/// Keys are converted to nibbles (half-bytes, 0-15) for traversal through
/// the trie. A 5-byte key becomes 10 nibbles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nibbles(pub Vec<u8>);

impl Nibbles {
    /// Create nibbles from arbitrary key bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut nibbles = Vec::with_capacity(bytes.len() * 2);
        for byte in bytes {
            nibbles.push(byte >> 4);
            nibbles.push(byte & 0x0F);
        }
        Nibbles(nibbles)
    }

    /// Nibbles from `start` to the end.
    pub fn suffix(&self, start: usize) -> &[u8] {
        self.0.get(start..).unwrap_or(&[])
    }

    /// Whether the path starting at `offset` begins with `prefix`.
    pub fn matches_at(&self, offset: usize, prefix: &Nibbles) -> bool {
        self.suffix(offset).starts_with(&prefix.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get nibble at index.
    pub fn at(&self, index: usize) -> u8 {
        self.0[index]
    }

    /// Encode nibbles with hex-prefix for RLP encoding.
    ///
    /// Per Ethereum Yellow Paper:
    /// - First nibble encodes flags: 0=extension even, 1=extension odd, 2=leaf even, 3=leaf odd
    /// - If odd number of nibbles, first nibble is part of path
    pub fn encode_hex_prefix(&self, is_leaf: bool) -> Vec<u8> {
        let odd = self.len() % 2 == 1;
        let prefix = if is_leaf { 2 } else { 0 } + if odd { 1 } else { 0 };

        let mut result = Vec::with_capacity(self.len() / 2 + 1);

        let rest = if odd {
            result.push((prefix << 4) | self.0[0]);
            &self.0[1..]
        } else {
            result.push(prefix << 4);
            &self.0[..]
        };

        for chunk in rest.chunks(2) {
            result.push((chunk[0] << 4) | chunk.get(1).copied().unwrap_or(0));
        }

        result
    }

    /// Decode hex-prefix encoded bytes back to nibbles and the leaf flag.
    ///
    /// Rejects unknown flag values and a non-zero padding nibble, so that
    /// every path has exactly one accepted encoding.
    pub fn decode_hex_prefix(encoded: &[u8]) -> Result<(Self, bool), TrieError> {
        let first = *encoded
            .first()
            .ok_or_else(|| TrieError::MalformedNode("empty hex-prefix path".to_string()))?;

        let flags = first >> 4;
        if flags > 3 {
            return Err(TrieError::MalformedNode(format!(
                "invalid hex-prefix flags {flags}"
            )));
        }
        let is_leaf = flags >= 2;
        let odd = flags % 2 == 1;

        let mut nibbles = Vec::with_capacity(encoded.len() * 2);
        if odd {
            nibbles.push(first & 0x0F);
        } else if first & 0x0F != 0 {
            return Err(TrieError::MalformedNode(
                "non-zero hex-prefix padding".to_string(),
            ));
        }

        for &byte in &encoded[1..] {
            nibbles.push(byte >> 4);
            nibbles.push(byte & 0x0F);
        }

        Ok((Nibbles(nibbles), is_leaf))
    }
}
