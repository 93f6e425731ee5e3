//! Chunking (§4.4): splits a sequence into overlapping windows of at most
//! `chunk_size` bytes with a fixed 2000bp overlap, so any single motif no
//! longer than the overlap is guaranteed to fall wholly inside at least
//! one chunk's core or overlap zone.

/// Overlap length in base pairs: the longest plausible non-B motif per
/// §4.4/§9's "Open question — chunk boundary motifs" design note.
pub const OVERLAP: usize = 2_000;

/// One window over a sequence: `[start, end)` 0-based half-open in
/// sequence-global coordinates, with `core_end` marking where the
/// authoritative (non-overlap) region ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub start: usize,
    pub end: usize,
    pub core_end: usize,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Splits `[0, total_len)` into overlapping chunks of at most `chunk_size`
/// bytes per §4.4's recurrence: `end_k = min(s_k + chunk_size, L)`,
/// `core_end_k = end_k - overlap` for all but the last chunk, and
/// `s_{k+1} = end_k - overlap`. A sequence shorter than `chunk_size`
/// yields exactly one chunk spanning the whole sequence.
pub fn make_chunks(total_len: usize, chunk_size: usize) -> Vec<Chunk> {
    if total_len == 0 {
        return Vec::new();
    }
    let chunk_size = chunk_size.max(OVERLAP + 1);
    let mut chunks = Vec::new();
    let mut start = 0usize;
    let mut index = 0usize;
    loop {
        let end = (start + chunk_size).min(total_len);
        let is_last = end == total_len;
        let core_end = if is_last { end } else { end - OVERLAP };
        chunks.push(Chunk {
            index,
            start,
            end,
            core_end,
        });
        if is_last {
            break;
        }
        start = end - OVERLAP;
        index += 1;
    }
    chunks
}
