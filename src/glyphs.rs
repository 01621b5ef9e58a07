// Copyright (c) 2026 rezky_nightky

use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use rand::Rng;

use crate::error::GlyphError;

/// Inclusive code point range, optionally strided.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodeRange {
    pub lo: u32,
    pub hi: u32,
    pub stride: u32,
}

impl CodeRange {
    pub const fn new(lo: u32, hi: u32) -> Self {
        Self { lo, hi, stride: 1 }
    }

    pub const fn single(v: u32) -> Self {
        Self::new(v, v)
    }

    pub fn contains(&self, v: u32) -> bool {
        v >= self.lo && v <= self.hi && (v - self.lo) % self.stride.max(1) == 0
    }

    fn code_points(&self) -> impl Iterator<Item = u32> {
        (self.lo..=self.hi).step_by(self.stride.max(1) as usize)
    }
}

const STANDARD_INCLUDE: &[CodeRange] = &[
    // Greek capitals
    CodeRange::single(0x038C),
    CodeRange::new(0x038E, 0x03A1),
    // Latin
    CodeRange::new(0x0041, 0x005A),
    CodeRange::new(0x0061, 0x007A),
    // Digits
    CodeRange::new(0x0030, 0x0039),
    CodeRange::new(0x06F0, 0x06F9),
    CodeRange::new(0x07C0, 0x07C9),
    CodeRange::new(0x0966, 0x096F),
    CodeRange::new(0x09E6, 0x09EF),
    CodeRange::new(0x0A66, 0x0A6F),
    CodeRange::new(0x0AE6, 0x0AEF),
    CodeRange::new(0x0B66, 0x0B6F),
    CodeRange::new(0x0B72, 0x0B77),
    CodeRange::new(0x0C66, 0x0C6F),
    CodeRange::new(0x0C78, 0x0C7E),
    CodeRange::new(0x0CE6, 0x0CEF),
    // Runic letters; U+16EB..U+16ED are shared punctuation
    CodeRange::new(0x16A0, 0x16EA),
    CodeRange::new(0x16EE, 0x16F8),
];

// Runic numerals and letters most terminal fonts render as tofu.
const STANDARD_EXCLUDE: &[CodeRange] = &[CodeRange::new(0x16EE, 0x16F8)];

/// A deduplicated, non-empty pool of drawable glyphs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphSet {
    glyphs: Vec<char>,
}

impl GlyphSet {
    pub fn from_ranges(include: &[CodeRange], exclude: &[CodeRange]) -> Result<Self, GlyphError> {
        let mut seen = HashSet::new();
        let mut glyphs = Vec::new();
        for range in include {
            for v in range.code_points() {
                if exclude.iter().any(|r| r.contains(v)) {
                    continue;
                }
                if let Some(ch) = char::from_u32(v) {
                    if seen.insert(ch) {
                        glyphs.push(ch);
                    }
                }
            }
        }

        if glyphs.is_empty() {
            return Err(GlyphError::Empty);
        }
        Ok(Self { glyphs })
    }

    /// The process-wide default set, computed on first use.
    pub fn standard() -> &'static GlyphSet {
        static STANDARD: OnceLock<GlyphSet> = OnceLock::new();
        STANDARD.get_or_init(|| {
            Self::from_ranges(STANDARD_INCLUDE, STANDARD_EXCLUDE).unwrap_or_else(|_| Self {
                glyphs: vec!['0', '1'],
            })
        })
    }

    pub fn as_slice(&self) -> &[char] {
        &self.glyphs
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    #[cfg(test)]
    pub fn contains(&self, ch: char) -> bool {
        self.glyphs.contains(&ch)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> char {
        self.glyphs[rng.random_range(0..self.glyphs.len())]
    }

    pub fn sample_n<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<char> {
        (0..n).map(|_| self.sample(rng)).collect()
    }

    pub fn dump(&self, path: &Path) -> Result<(), GlyphError> {
        let text: String = self.as_slice().iter().collect();
        std::fs::write(path, text).map_err(|source| GlyphError::Dump {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn greek_capitals_skip_reserved_code_point() {
        let set =
            GlyphSet::from_ranges(&[CodeRange::new(0x0391, 0x03A9)], &[CodeRange::single(0x03A2)])
                .unwrap();

        assert_eq!(set.len(), 24);
        assert!(!set.contains('\u{03A2}'));
        assert!(set.contains('\u{0391}'));
        assert!(set.contains('\u{03A9}'));
        let distinct: HashSet<char> = set.as_slice().iter().copied().collect();
        assert_eq!(distinct.len(), set.len());
    }

    #[test]
    fn overlapping_ranges_are_deduplicated_in_first_seen_order() {
        let set = GlyphSet::from_ranges(
            &[CodeRange::new(0x30, 0x32), CodeRange::new(0x31, 0x33)],
            &[],
        )
        .unwrap();
        assert_eq!(set.as_slice(), &['0', '1', '2', '3']);
    }

    #[test]
    fn strided_exclusion_only_hits_its_stride() {
        let set = GlyphSet::from_ranges(
            &[CodeRange::new(0x41, 0x46)],
            &[CodeRange {
                lo: 0x41,
                hi: 0x46,
                stride: 2,
            }],
        )
        .unwrap();
        assert_eq!(set.as_slice(), &['B', 'D', 'F']);
    }

    #[test]
    fn fully_excluded_set_is_an_error() {
        let r = CodeRange::new(0x41, 0x5A);
        assert!(matches!(
            GlyphSet::from_ranges(&[r], &[r]),
            Err(GlyphError::Empty)
        ));
    }

    #[test]
    fn surrogates_are_skipped() {
        let set = GlyphSet::from_ranges(&[CodeRange::new(0xD7FF, 0xE000)], &[]).unwrap();
        assert_eq!(set.as_slice(), &['\u{D7FF}', '\u{E000}']);
    }

    #[test]
    fn standard_set_is_memoized_and_excludes_runic_numerals() {
        let a = GlyphSet::standard();
        let b = GlyphSet::standard();
        assert!(std::ptr::eq(a, b));
        assert!(a.contains('\u{16A0}'));
        assert!(!a.contains('\u{16EE}'));
        assert!(a.contains('Z'));
    }

    #[test]
    fn standard_set_skips_runic_punctuation() {
        let set = GlyphSet::standard();
        assert!(set.contains('\u{16EA}'));
        for v in 0x16EB..=0x16F8 {
            assert!(!set.contains(char::from_u32(v).unwrap()), "U+{v:04X}");
        }
    }

    #[test]
    fn standard_set_covers_native_decimal_digits() {
        let set = GlyphSet::standard();
        for zero in [0x30, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0C66, 0x0CE6] {
            for v in zero..zero + 10 {
                assert!(set.contains(char::from_u32(v).unwrap()), "U+{v:04X}");
            }
        }
        // Arabic-Indic, Tamil and superscript digits stay out.
        for v in [0x0660, 0x0BE6, 0x00B2] {
            assert!(!set.contains(char::from_u32(v).unwrap()), "U+{v:04X}");
        }
    }

    #[test]
    fn samples_come_from_the_set() {
        let set = GlyphSet::standard();
        let mut rng = StdRng::seed_from_u64(7);
        let picks = set.sample_n(&mut rng, 200);
        assert_eq!(picks.len(), 200);
        assert!(picks.iter().all(|&c| set.contains(c)));
        assert!(set.sample_n(&mut rng, 0).is_empty());
    }

    #[test]
    fn dump_round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glyphs.txt");
        let set = GlyphSet::standard();
        set.dump(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.chars().count(), set.len());
        assert!(text.chars().all(|c| set.contains(c)));
    }

    #[test]
    fn sampled_dump_is_a_subset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.txt");
        let mut rng = StdRng::seed_from_u64(11);
        let picks: String = GlyphSet::standard().sample_n(&mut rng, 64).into_iter().collect();
        std::fs::write(&path, picks).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.chars().all(|c| GlyphSet::standard().contains(c)));
    }

    #[test]
    fn dump_to_missing_directory_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("glyphs.txt");
        let err = GlyphSet::standard().dump(&path).unwrap_err();
        assert!(matches!(err, GlyphError::Dump { .. }));
        assert!(err.to_string().contains("glyphs.txt"));
    }
}
