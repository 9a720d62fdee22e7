//! Dictionary matching under in-plane rotation.

use crate::Dictionary;

/// A dictionary match for an observed marker code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodeMatch {
    /// Marker id in the dictionary.
    pub id: u32,
    /// Rotation `0..=3` (quarter turns clockwise) such that
    /// `observed_code == rotate_code_cw(dict_code, rotation)`.
    pub rotation: u8,
    /// Hamming distance between observed and dictionary code (after rotation).
    pub hamming: u8,
}

/// Matcher for a fixed dictionary.
///
/// Brute-force search over all ids and rotations; for ~1000 ids this is
/// fast enough and keeps memory small.
#[derive(Clone, Debug)]
pub struct Matcher {
    dict: Dictionary,
    max_hamming: u8,
    rotated: Vec<[u64; 4]>,
}

impl Matcher {
    /// Build a matcher for the given dictionary and Hamming budget.
    ///
    /// The budget is clamped to the dictionary's own correction capacity.
    pub fn new(dict: Dictionary, max_hamming: u8) -> Self {
        let n = dict.marker_size();
        assert!(
            dict.bit_count() <= 64,
            "marker_size {n} implies {} bits > 64 (unsupported)",
            dict.bit_count()
        );

        let max_hamming = max_hamming.min(dict.max_correction_bits());

        let rotated = dict
            .codes()
            .iter()
            .map(|&base| {
                [
                    base,
                    rotate_code_cw(base, n, 1),
                    rotate_code_cw(base, n, 2),
                    rotate_code_cw(base, n, 3),
                ]
            })
            .collect();

        Self {
            dict,
            max_hamming,
            rotated,
        }
    }

    /// Dictionary used by this matcher.
    #[inline]
    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    /// Maximum Hamming distance allowed for matches.
    #[inline]
    pub fn max_hamming(&self) -> u8 {
        self.max_hamming
    }

    /// Find the best match within the Hamming budget.
    pub fn match_code(&self, observed: u64) -> Option<CodeMatch> {
        let mut best: Option<CodeMatch> = None;

        for (id, rots) in self.rotated.iter().enumerate() {
            for (rot, &cand) in rots.iter().enumerate() {
                let h = (observed ^ cand).count_ones() as u8;
                if h > self.max_hamming {
                    continue;
                }
                let m = CodeMatch {
                    id: id as u32,
                    rotation: rot as u8,
                    hamming: h,
                };
                match best {
                    None => best = Some(m),
                    Some(prev) => {
                        if m.hamming < prev.hamming {
                            best = Some(m);
                            if m.hamming == 0 {
                                return best;
                            }
                        }
                    }
                }
            }
        }

        best
    }
}

/// Rotate a row-major code (`idx = y * n + x`) by `rot` quarter turns
/// clockwise.
pub fn rotate_code_cw(code: u64, n: usize, rot: u8) -> u64 {
    let rot = rot & 3;
    if rot == 0 {
        return code;
    }

    #[inline]
    fn get(code: u64, idx: usize) -> u64 {
        (code >> idx) & 1
    }

    let mut out = 0u64;
    for y in 0..n {
        for x in 0..n {
            let (sx, sy) = match rot {
                1 => (y, n - 1 - x),
                2 => (n - 1 - x, n - 1 - y),
                _ => (n - 1 - y, x),
            };
            out |= get(code, sy * n + sx) << (y * n + x);
        }
    }
    out
}
