//! Hand-rolled backtracking-style matchers for the pattern families that
//! cannot be expressed in `regex` at all: STR direct-repeat detection
//! (`(XXX)\1{n,}` in the source's notation) and inverted-repeat
//! (palindrome) detection for cruciform DNA. These are load-bearing, not
//! fallback plumbing kept for parity — `regex` has no backreferences and
//! no lookaround, so there is no DFA path for either family.

/// One tandem-repeat hit: `[start, end)` 0-based half-open, the repeat
/// unit length, and the copy number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RepeatHit {
    pub start: usize,
    pub end: usize,
    pub unit_len: usize,
    pub copies: usize,
}

/// Minimum copy number per unit length 1-9, following spec.md's explicit
/// mono/di/tri thresholds extended by the registry's general "unit 1-9bp,
/// total >= 10bp" rule for tetra..nona (§4.3.9 / DESIGN.md Open Question 9).
fn min_copies_for_unit(unit_len: usize) -> usize {
    match unit_len {
        1 => 8,
        2 => 7,
        3 => 5,
        4..=9 => 4,
        _ => usize::MAX,
    }
}

/// Sliding-window scan for tandem repeats of unit length 1-9. For each
/// start position and unit length, counts consecutive repeats of the unit
/// and emits a hit when the copy-number floor and the >=10bp total-length
/// floor (for unit lengths 4-9) are both met. Greedily extends past the
/// minimum to capture the full repeat run, then advances past it.
pub fn find_tandem_repeats(seq: &[u8]) -> Vec<RepeatHit> {
    let n = seq.len();
    let mut hits = Vec::new();
    let mut pos = 0;
    while pos < n {
        let mut best: Option<RepeatHit> = None;
        for unit_len in 1..=9usize.min(n.saturating_sub(pos)) {
            if pos + unit_len > n {
                continue;
            }
            let unit = &seq[pos..pos + unit_len];
            let mut copies = 1;
            let mut cursor = pos + unit_len;
            while cursor + unit_len <= n && &seq[cursor..cursor + unit_len] == unit {
                copies += 1;
                cursor += unit_len;
            }
            let total_len = copies * unit_len;
            let min_copies = min_copies_for_unit(unit_len);
            if copies >= min_copies && (unit_len <= 3 || total_len >= 10) {
                let candidate = RepeatHit {
                    start: pos,
                    end: cursor,
                    unit_len,
                    copies,
                };
                if best.map_or(true, |b| candidate.end - candidate.start > b.end - b.start) {
                    best = Some(candidate);
                }
            }
        }
        match best {
            Some(hit) => {
                let advance = hit.end - hit.start;
                hits.push(hit);
                pos += advance.max(1);
            }
            None => pos += 1,
        }
    }
    hits
}

fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'T' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        other => other,
    }
}

pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| complement(b)).collect()
}

/// One inverted-repeat (palindrome) hit: the full span `[start, end)`
/// covering `left_arm + loop + right_arm`, and the arm length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PalindromeHit {
    pub start: usize,
    pub end: usize,
    pub arm_len: usize,
    pub loop_len: usize,
}

/// Scans windows `left_arm . loop . right_arm` for arm lengths 6-20 and
/// loop lengths 0-10, emitting a hit wherever `right_arm ==
/// reverse_complement(left_arm)`. Prefers the longest arm at each start
/// position to avoid reporting every shorter sub-palindrome separately.
pub fn find_palindromes(seq: &[u8]) -> Vec<PalindromeHit> {
    let n = seq.len();
    let mut hits = Vec::new();
    let mut pos = 0;
    while pos < n {
        let mut best: Option<PalindromeHit> = None;
        for arm_len in (6..=20).rev() {
            if pos + arm_len > n {
                continue;
            }
            let left = &seq[pos..pos + arm_len];
            let rc = reverse_complement(left);
            for loop_len in 0..=10 {
                let right_start = pos + arm_len + loop_len;
                let right_end = right_start + arm_len;
                if right_end > n {
                    continue;
                }
                if &seq[right_start..right_end] == rc.as_slice() {
                    best = Some(PalindromeHit {
                        start: pos,
                        end: right_end,
                        arm_len,
                        loop_len,
                    });
                    break;
                }
            }
            if best.is_some() {
                break;
            }
        }
        match best {
            Some(hit) => {
                hits.push(hit);
                pos = hit.start + hit.arm_len.max(1);
            }
            None => pos += 1,
        }
    }
    hits
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_tandem_repeat_tri() {
        let seq = b"CGGCGGCGGCGGCGGCGG";
        let hits = find_tandem_repeats(seq);
        assert!(hits.iter().any(|h| h.unit_len == 3 && h.copies >= 5));
    }

    #[test]
    fn test_tandem_repeat_mono() {
        let seq = b"AAAAAAAAAA";
        let hits = find_tandem_repeats(seq);
        assert!(hits.iter().any(|h| h.unit_len == 1 && h.copies >= 8));
    }

    #[test]
    fn test_no_repeat_below_threshold() {
        let seq = b"ACGTACGT";
        let hits = find_tandem_repeats(seq);
        assert!(hits.iter().all(|h| !(h.unit_len == 4 && h.copies < 4)));
    }

    #[test]
    fn test_reverse_complement() {
        assert_eq!(reverse_complement(b"GGGCCC"), b"GGGCCC");
        assert_eq!(reverse_complement(b"AATT"), b"AATT");
        assert_eq!(reverse_complement(b"ACGT"), b"ACGT");
    }

    #[test]
    fn test_palindrome_detected() {
        let mut seq = b"AAACCCGGG".to_vec();
        let left = b"GATTACAGATTACA".to_vec();
        let rc = reverse_complement(&left);
        seq.extend_from_slice(&left);
        seq.extend_from_slice(b"NNN");
        seq.extend_from_slice(&rc);
        let hits = find_palindromes(&seq);
        assert!(hits.iter().any(|h| h.arm_len == left.len() && h.loop_len == 3));
    }
}
