/// Gap byte used in aligned rows.
pub const GAP: u8 = b'-';

/// One row of a pairwise alignment: residues interleaved with `-`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct GappedSeq {
    bytes: Vec<u8>,
}

impl GappedSeq {
    #[inline]
    pub(crate) fn from_bytes_unchecked(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn gap_count(&self) -> usize {
        self.bytes.iter().filter(|&&b| b == GAP).count()
    }

    /// Strip gap characters, leaving the residues in order.
    pub fn ungapped(&self) -> Vec<u8> {
        self.bytes.iter().copied().filter(|&b| b != GAP).collect()
    }
}

impl std::fmt::Display for GappedSeq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.bytes))
    }
}
