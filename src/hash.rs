//! Deterministic string hashing for entry placement
//!
//! Entries get a stable pseudo-random radial offset from their name, so the
//! layout looks scattered but is identical every time the same data is drawn.
//! This is a layout input only: collisions are harmless.

/// 32-bit string hash: `hash = hash * 31 + unit` over UTF-16 code units,
/// wrapping on overflow. Matches the classic `String.hashCode`.
pub fn string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(unit as i32))
}

/// Inclusive `[min, max]` of a set of hashes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashRange {
    pub min: i32,
    pub max: i32,
}

impl HashRange {
    /// Range holding a single value
    pub fn single(hash: i32) -> Self {
        Self { min: hash, max: hash }
    }

    /// Widen the range to include `hash`
    pub fn include(self, hash: i32) -> Self {
        if hash < self.min {
            Self { min: hash, ..self }
        } else if hash > self.max {
            Self { max: hash, ..self }
        } else {
            self
        }
    }

    /// True when every hash in the set was equal
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}

/// Pairwise min/max reduction over the hashes of `names`.
///
/// Returns `None` for an empty iterator.
pub fn hash_range<'a, I>(names: I) -> Option<HashRange>
where
    I: IntoIterator<Item = &'a str>,
{
    names.into_iter().map(string_hash).fold(None, |range, hash| {
        Some(match range {
            None => HashRange::single(hash),
            Some(range) => range.include(hash),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_hashes() {
        assert_eq!(string_hash(""), 0);
        assert_eq!(string_hash("a"), 97);
        assert_eq!(string_hash("ab"), 97 * 31 + 98);
        assert_eq!(string_hash("hello"), 99_162_322);
        assert_eq!(string_hash("Hello"), 69_609_650);
    }

    #[test]
    fn test_hash_wraps_negative() {
        // Long enough to overflow 32 bits at least once
        let h = string_hash("polygenelubricants");
        assert_eq!(h, i32::MIN);
    }

    #[test]
    fn test_utf16_units() {
        // U+1F600 is a surrogate pair: two code units
        let expected = (0xD83Di32).wrapping_mul(31).wrapping_add(0xDE00);
        assert_eq!(string_hash("\u{1F600}"), expected);
    }

    #[test]
    fn test_hash_range_abc() {
        let range = hash_range(["a", "b", "c"]).unwrap();
        assert_eq!(range.min, string_hash("a"));
        assert_eq!(range.max, string_hash("c"));
    }

    #[test]
    fn test_hash_range_unordered() {
        let names = ["Rust", "Go", "Zig", "Elixir"];
        let range = hash_range(names).unwrap();
        let hashes: Vec<i32> = names.iter().map(|n| string_hash(n)).collect();
        assert_eq!(range.min, *hashes.iter().min().unwrap());
        assert_eq!(range.max, *hashes.iter().max().unwrap());
    }

    #[test]
    fn test_hash_range_edge_cases() {
        assert_eq!(hash_range(std::iter::empty::<&str>()), None);
        let single = hash_range(["solo"]).unwrap();
        assert!(single.is_degenerate());
        assert_eq!(single.min, string_hash("solo"));
    }

    proptest! {
        #[test]
        fn prop_hash_is_deterministic(s in ".*") {
            prop_assert_eq!(string_hash(&s), string_hash(&s.clone()));
        }

        #[test]
        fn prop_range_bounds_all(names in prop::collection::vec("[a-zA-Z ]{1,12}", 1..20)) {
            let range = hash_range(names.iter().map(String::as_str)).unwrap();
            for name in &names {
                let h = string_hash(name);
                prop_assert!(range.min <= h && h <= range.max);
            }
            prop_assert!(names.iter().any(|n| string_hash(n) == range.min));
            prop_assert!(names.iter().any(|n| string_hash(n) == range.max));
        }
    }
}
