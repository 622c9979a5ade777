//! Picking the historical signature closest to an imported one.

pub mod fuzz;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'a> {
    pub signature: &'a str,
    /// Similarity from 0 to 100, see [`fuzz::weighted_ratio`].
    pub score: u8,
}

/// Score `query` against every candidate signature and return the best one.
///
/// Returns `None` if there are no candidates at all, which callers must not confuse with a poor
/// match. When several candidates share the top score the first one wins.
pub fn best_match<'a>(
    query: &str,
    signatures: impl IntoIterator<Item = &'a str>,
) -> Option<Match<'a>> {
    let mut best: Option<Match<'a>> = None;
    for signature in signatures {
        let score = fuzz::weighted_ratio(query, signature);
        if best.is_none_or(|best| score > best.score) {
            best = Some(Match { signature, score });
            if score == 100 {
                break;
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_candidates() {
        assert_eq!(best_match("Woolworths", []), None);
    }

    #[test]
    fn picks_most_similar() {
        let candidates = [
            "Rent January -1000 AUD",
            "Woolworths Woolworths 123 -50 AUD",
            "Coles Coles 77 -30 AUD",
        ];
        let found = best_match("Woolworths Woolworths 124 -52 AUD", candidates).unwrap();
        assert_eq!(found.signature, "Woolworths Woolworths 123 -50 AUD");
        assert_eq!(found.score, 94);
    }

    #[test]
    fn poor_match_is_still_reported() {
        let found = best_match("XYZ Unique Merchant 9999", ["Woolworths Woolworths 123"]).unwrap();
        assert_eq!(found.signature, "Woolworths Woolworths 123");
        assert!(found.score < 50);
    }

    #[test]
    fn ties_keep_the_first_candidate() {
        let candidates = ["Shop B -5 AUD", "Shop C -5 AUD"];
        let found = best_match("Shop A -5 AUD", candidates).unwrap();
        assert_eq!(found.signature, "Shop B -5 AUD");

        let reversed = ["Shop C -5 AUD", "Shop B -5 AUD"];
        let found = best_match("Shop A -5 AUD", reversed).unwrap();
        assert_eq!(found.signature, "Shop C -5 AUD");
    }
}
