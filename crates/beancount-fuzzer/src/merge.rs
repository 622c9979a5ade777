//! Completing an imported transaction from a historical one.

use std::collections::BTreeSet;

use crate::model::{elided_amounts, tag_name};
use crate::{Posting, Transaction};

/// Complete `incomplete` with the legs and tags of `donor`.
///
/// Postings of `donor` on accounts that `incomplete` does not post to yet are appended in the
/// donor's order. If that is exactly one posting, its amount is dropped so the ledger balances it
/// against the known side; several postings keep their amounts since the split can't be inferred.
/// Tags are the union of both, without `blocked_tags`. Everything else comes from `incomplete`.
pub fn merge(
    incomplete: &Transaction,
    donor: &Transaction,
    blocked_tags: &BTreeSet<String>,
) -> Transaction {
    let mut added: Vec<Posting> = donor
        .postings()
        .iter()
        .filter(|posting| !incomplete.posts_to(&posting.account))
        .cloned()
        .collect();

    // leave the amount to the ledger, unless some other leg already does
    if added.len() == 1 && elided_amounts(incomplete.postings()) == 0 {
        for posting in &mut added {
            posting.amount = None;
        }
    }

    let tags: Vec<_> = incomplete
        .tags()
        .chain(donor.tags())
        .filter(|tag| !blocked_tags.contains(&tag_name(tag)))
        .cloned()
        .collect();

    let mut postings = incomplete.postings().to_vec();
    postings.extend(added);
    if elided_amounts(&postings) > 1 {
        tracing::warn!(
            "Not copying postings onto {} transaction on {}: it could not be balanced",
            incomplete.payee().or(incomplete.narration()).unwrap_or_default(),
            incomplete.date(),
        );
        return incomplete.clone().with_tags(tags);
    }

    incomplete.clone().with_postings(postings).with_tags(tags)
}
