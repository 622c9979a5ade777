//! Fuzzy string similarity, scored from 0 (nothing in common) to 100 (identical).
//!
//! The building block is [`ratio`]: twice the longest common subsequence over the combined
//! length. The other scorers apply it to substrings or reordered tokens, and
//! [`weighted_ratio`] picks the best of them depending on how different the lengths are.

use std::collections::BTreeSet;

const UNBASE_SCALE: f64 = 0.95;
const PARTIAL_SCALE: f64 = 0.9;
const LONG_PARTIAL_SCALE: f64 = 0.6;

/// Drop non-ASCII characters, turn everything but letters, digits and `_` into spaces,
/// lowercase and trim.
pub fn process(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect::<String>()
        .trim()
        .to_owned()
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    200.0 * lcs_len(a, b) as f64 / (a.len() + b.len()) as f64
}

// halves round to even
fn to_score(value: f64) -> u8 {
    value.round_ties_even().clamp(0.0, 100.0) as u8
}

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

pub fn ratio(a: &str, b: &str) -> u8 {
    to_score(ratio_chars(&chars(a), &chars(b)))
}

/// Best [`ratio`] of the shorter string against any substring of the longer one of equal length.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let (a, b) = (chars(a), chars(b));
    let (shorter, longer) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    if shorter.is_empty() {
        return 0;
    }

    let mut best = 0.0f64;
    for window in longer.windows(shorter.len()) {
        best = best.max(ratio_chars(shorter, window));
        if best >= 100.0 {
            break;
        }
    }
    to_score(best)
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

pub fn partial_token_sort_ratio(a: &str, b: &str) -> u8 {
    partial_ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Compare the shared tokens against each side's shared-plus-remaining tokens, so that extra
/// words on one side cost less than in [`token_sort_ratio`].
fn token_set(a: &str, b: &str, scorer: fn(&str, &str) -> u8) -> u8 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    let join = |tokens: Vec<&str>| tokens.join(" ");

    let shared = join(tokens_a.intersection(&tokens_b).copied().collect());
    let only_a = join(tokens_a.difference(&tokens_b).copied().collect());
    let only_b = join(tokens_b.difference(&tokens_a).copied().collect());

    let combined_a = format!("{shared} {only_a}").trim().to_owned();
    let combined_b = format!("{shared} {only_b}").trim().to_owned();

    [
        scorer(&shared, &combined_a),
        scorer(&shared, &combined_b),
        scorer(&combined_a, &combined_b),
    ]
    .into_iter()
    .max()
    .unwrap_or(0)
}

pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    token_set(a, b, ratio)
}

pub fn partial_token_set_ratio(a: &str, b: &str) -> u8 {
    token_set(a, b, partial_ratio)
}

/// Overall similarity of two free-text strings.
///
/// Both strings are [`process`]ed first. Strings of similar length are compared whole and by
/// tokens; when one is at least half again as long as the other, substring matches count too,
/// at a discount that grows once the length ratio passes 8.
pub fn weighted_ratio(a: &str, b: &str) -> u8 {
    let (a, b) = (process(a), process(b));
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let base = f64::from(ratio(&a, &b));
    let (len_a, len_b) = (a.chars().count() as f64, b.chars().count() as f64);
    let len_ratio = len_a.max(len_b) / len_a.min(len_b);

    let best = if len_ratio < 1.5 {
        let token_sort = f64::from(token_sort_ratio(&a, &b)) * UNBASE_SCALE;
        let token_set = f64::from(token_set_ratio(&a, &b)) * UNBASE_SCALE;
        base.max(token_sort).max(token_set)
    } else {
        let scale = if len_ratio > 8.0 {
            LONG_PARTIAL_SCALE
        } else {
            PARTIAL_SCALE
        };
        let partial = f64::from(partial_ratio(&a, &b)) * scale;
        let token_sort = f64::from(partial_token_sort_ratio(&a, &b)) * UNBASE_SCALE * scale;
        let token_set = f64::from(partial_token_set_ratio(&a, &b)) * UNBASE_SCALE * scale;
        base.max(partial).max(token_sort).max(token_set)
    };
    to_score(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_normalizes() {
        assert_eq!(process("  Woolworths-123 METRO! "), "woolworths 123 metro");
        assert_eq!(process("--"), "");
    }

    #[test]
    fn ratio_basics() {
        assert_eq!(ratio("woolworths", "woolworths"), 100);
        assert_eq!(ratio("abcd", "abce"), 75);
        assert_eq!(ratio("abc", "xyz"), 0);
        assert_eq!(ratio("", "abc"), 0);
        assert_eq!(ratio("", ""), 0);
        // 12.5
        assert_eq!(ratio("a", "abcdefghijklmno"), 12);
    }

    #[test]
    fn ratio_is_symmetric() {
        assert_eq!(ratio("amazon", "amzn"), ratio("amzn", "amazon"));
        assert_eq!(ratio("amazon", "amzn"), 80);
    }

    #[test]
    fn partial_ratio_finds_substring() {
        assert_eq!(partial_ratio("woolworths", "woolworths metro 123"), 100);
        assert_eq!(partial_ratio("woolworths metro 123", "woolworths"), 100);
        assert_eq!(partial_ratio("", "woolworths"), 0);
    }

    #[test]
    fn token_sort_ignores_order() {
        assert_eq!(token_sort_ratio("new york mets", "mets new york"), 100);
        assert!(ratio("new york mets", "mets new york") < 100);
    }

    #[test]
    fn token_set_ignores_duplicates_and_extras() {
        assert_eq!(token_set_ratio("coffee shop", "shop coffee shop"), 100);
        assert_eq!(token_set_ratio("coffee shop", "coffee shop sydney"), 100);
        assert!(token_sort_ratio("coffee shop", "coffee shop sydney") < 100);
        assert_eq!(token_set_ratio("coffee", "tea"), ratio("coffee", "tea"));
    }

    #[test]
    fn weighted_ratio_near_duplicates() {
        assert_eq!(
            weighted_ratio(
                "Woolworths Woolworths 123 -50 AUD",
                "Woolworths Woolworths 124 -52 AUD"
            ),
            94
        );
        assert_eq!(weighted_ratio("Spotify P1234", "SPOTIFY p1234"), 100);
        assert_eq!(weighted_ratio("Café Sydney", "Cafe Sydney"), 95);
    }

    #[test]
    fn weighted_ratio_uses_partial_for_different_lengths() {
        let score = weighted_ratio("Netflix", "Netflix.com Sydney AU -16.99 AUD");
        assert_eq!(score, 90);
    }

    #[test]
    fn weighted_ratio_shared_token_plateau() {
        // a single shared token makes the partial token set score perfect
        assert_eq!(partial_token_set_ratio("broker buy 10 aud", "woolworths 50 aud"), 100);
        assert_eq!(
            weighted_ratio("Broker Buy -10 AUD", "Woolworths Woolworths 123 -50 AUD"),
            86
        );
    }

    #[test]
    fn weighted_ratio_unrelated() {
        let score = weighted_ratio(
            "XYZ Unique Merchant 9999 -10.00 AUD",
            "Woolworths Woolworths 123 -50 AUD",
        );
        assert!(score < 50, "score was {score}");
    }

    #[test]
    fn weighted_ratio_empty() {
        assert_eq!(weighted_ratio("", "anything"), 0);
        assert_eq!(weighted_ratio("!!", "anything"), 0);
    }
}
