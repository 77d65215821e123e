//! Character-level cleanup of recognized text
//!
//! Recognition engines confuse a handful of glyphs on low-contrast overlay
//! text. Two heuristics run before pattern matching:
//!
//! 1. Vertical bars become lowercase "l" (a frequent confusion against
//!    medical unit abbreviations like "ml").
//! 2. A "0"/"O" glyph with an adjacent digit resolves to "0"; without one it
//!    is left as recognized.
//!
//! The 0/O rule is lossy: a genuine letter "O" next to a digit (serial
//! codes, accession numbers) is rewritten too. Adjacency is judged against a
//! snapshot of the bar-normalized text, so earlier substitutions in the same
//! pass never influence later ones.

/// Normalizes common recognition confusions in raw text
pub fn normalize(text: &str) -> String {
    let bars_fixed: String = text
        .chars()
        .map(|c| if c == '|' { 'l' } else { c })
        .collect();

    let snapshot: Vec<char> = bars_fixed.chars().collect();
    let mut out = String::with_capacity(bars_fixed.len());

    for (i, &c) in snapshot.iter().enumerate() {
        if c == '0' || c == 'O' {
            let before = i.checked_sub(1).and_then(|j| snapshot.get(j));
            let after = snapshot.get(i + 1);
            let digit_adjacent = before.is_some_and(|c| c.is_ascii_digit())
                || after.is_some_and(|c| c.is_ascii_digit());
            out.push(if digit_adjacent { '0' } else { c });
        } else {
            out.push(c);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bars_become_l() {
        assert_eq!(normalize("5 m|"), "5 ml");
        assert_eq!(normalize("||"), "ll");
    }

    #[test]
    fn test_o_with_adjacent_digit_becomes_zero() {
        assert_eq!(normalize("2O4"), "204");
        assert_eq!(normalize("O2"), "02");
        assert_eq!(normalize("2O"), "20");
    }

    #[test]
    fn test_o_without_adjacent_digit_kept() {
        assert_eq!(normalize("OK"), "OK");
        assert_eq!(normalize("LOBE"), "LOBE");
        assert_eq!(normalize("O"), "O");
    }

    #[test]
    fn test_adjacency_uses_snapshot() {
        // The first O sees a non-digit O on both sides in the snapshot and
        // survives; the second O sees the digit and converts.
        assert_eq!(normalize("OO1"), "O01");
    }

    #[test]
    fn test_zero_is_stable() {
        assert_eq!(normalize("105"), "105");
        assert_eq!(normalize("0"), "0");
    }

    #[test]
    fn test_text_boundaries() {
        assert_eq!(normalize("O1 fine 1O"), "01 fine 10");
    }

    #[test]
    fn test_clean_text_unchanged() {
        assert_eq!(normalize("BPD: 45mm HC:175mm"), "BPD: 45mm HC:175mm");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_multibyte_neighbors() {
        // × is in the recognition whitelist and must not break indexing
        assert_eq!(normalize("1O.2 × 4.5"), "10.2 × 4.5");
    }
}
