//! Levenshtein edit distance and similarity ratio.
//!
//! Both operate on Unicode scalar values, so `"é"` and `"e"` are one substitution apart.

use std::mem;

/// Number of single-character insertions, deletions and substitutions turning `a` into `b`.
///
/// Uses two rows sized by the shorter string.
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return long.len();
    }

    let mut previous: Vec<usize> = (0..=short.len()).collect();
    let mut current = vec![0; short.len() + 1];

    for (i, lc) in long.iter().enumerate() {
        current[0] = i + 1;
        for (j, sc) in short.iter().enumerate() {
            let deletion = previous[j + 1] + 1;
            let insertion = current[j] + 1;
            let substitution = previous[j] + usize::from(lc != sc);
            current[j + 1] = deletion.min(insertion).min(substitution);
        }
        mem::swap(&mut previous, &mut current);
    }

    previous[short.len()]
}

/// Similarity in `[0, 1]`: `1 - distance / max_len`. Two empty strings are identical.
pub fn ratio(a: &str, b: &str) -> f32 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f32 / max_len as f32
}
