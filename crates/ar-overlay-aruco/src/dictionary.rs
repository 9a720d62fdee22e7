//! The ArUco Original dictionary, generated from its row codification.
//!
//! Each marker carries 5x5 inner bits inside a one-cell black border. A row
//! encodes two id bits through one of four 5-bit words (white = 1):
//!
//! ```text
//! 00 -> 1 0 0 0 0
//! 01 -> 1 0 1 1 1
//! 10 -> 0 1 0 0 1
//! 11 -> 0 1 1 1 0
//! ```
//!
//! Row 0 holds the most significant id bits, so ids span `0..1024`.

/// Inner bits per marker side.
pub const MARKER_SIZE: usize = 5;

/// Number of ids in the Original dictionary.
pub const DICTIONARY_LEN: usize = 1024;

/// Row words of the Original codification, white = 1, leftmost column in
/// the most significant bit.
const ROW_WORDS: [u8; 4] = [0b10000, 0b10111, 0b01001, 0b01110];

/// A fixed marker dictionary.
///
/// Codes are one `u64` per id, inner bits in row-major order with
/// **black = 1** (bit index `row * marker_size + col`).
#[derive(Clone, Debug)]
pub struct Dictionary {
    name: &'static str,
    marker_size: usize,
    max_correction_bits: u8,
    codes: Vec<u64>,
}

impl Dictionary {
    /// Build the classic ArUco Original dictionary.
    pub fn aruco_original() -> Self {
        let codes = (0..DICTIONARY_LEN as u16).map(encode_original).collect();
        Self {
            name: "ARUCO_ORIGINAL",
            marker_size: MARKER_SIZE,
            max_correction_bits: 3,
            codes,
        }
    }

    /// Human-readable name (for logging).
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Marker side length in inner bits.
    #[inline]
    pub fn marker_size(&self) -> usize {
        self.marker_size
    }

    /// Total inner bits per marker.
    #[inline]
    pub fn bit_count(&self) -> usize {
        self.marker_size * self.marker_size
    }

    /// Maximum Hamming distance the dictionary can safely correct.
    #[inline]
    pub fn max_correction_bits(&self) -> u8 {
        self.max_correction_bits
    }

    /// Number of ids.
    #[inline]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Packed code for `id`, or `None` when out of range.
    #[inline]
    pub fn code(&self, id: u32) -> Option<u64> {
        self.codes.get(id as usize).copied()
    }

    /// All packed codes, indexed by id.
    #[inline]
    pub fn codes(&self) -> &[u64] {
        &self.codes
    }
}

/// Pack the Original-codification marker for `id` into a row-major u64,
/// black = 1.
fn encode_original(id: u16) -> u64 {
    let mut code = 0u64;
    for row in 0..MARKER_SIZE {
        let sym = ((id >> (2 * (MARKER_SIZE - 1 - row))) & 0b11) as usize;
        let word = ROW_WORDS[sym];
        for col in 0..MARKER_SIZE {
            let white = (word >> (MARKER_SIZE - 1 - col)) & 1 == 1;
            if !white {
                code |= 1u64 << (row * MARKER_SIZE + col);
            }
        }
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    fn black(code: u64, row: usize, col: usize) -> bool {
        (code >> (row * MARKER_SIZE + col)) & 1 == 1
    }

    #[test]
    fn dictionary_has_1024_distinct_codes() {
        let dict = Dictionary::aruco_original();
        assert_eq!(dict.len(), 1024);

        let mut codes = dict.codes().to_vec();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 1024);
    }

    #[test]
    fn id_zero_is_five_copies_of_word_00() {
        let dict = Dictionary::aruco_original();
        let code = dict.code(0).expect("id 0");
        // Word 10000: white only in column 0.
        for row in 0..MARKER_SIZE {
            assert!(!black(code, row, 0));
            for col in 1..MARKER_SIZE {
                assert!(black(code, row, col));
            }
        }
    }

    #[test]
    fn id_923_rows_follow_the_codification() {
        // 923 = 0b11_10_01_10_11 -> row symbols [3, 2, 1, 2, 3].
        let dict = Dictionary::aruco_original();
        let code = dict.code(923).expect("id 923");

        let expected_syms = [3usize, 2, 1, 2, 3];
        for (row, &sym) in expected_syms.iter().enumerate() {
            let word = [0b10000u8, 0b10111, 0b01001, 0b01110][sym];
            for col in 0..MARKER_SIZE {
                let white = (word >> (MARKER_SIZE - 1 - col)) & 1 == 1;
                assert_eq!(black(code, row, col), !white, "row {row} col {col}");
            }
        }
    }

    #[test]
    fn out_of_range_id_has_no_code() {
        let dict = Dictionary::aruco_original();
        assert!(dict.code(1024).is_none());
    }
}
