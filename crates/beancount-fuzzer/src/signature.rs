use crate::Transaction;
use crate::model::format_amount;

/// Key a transaction for matching: payee, narration and the amount of its first posting, joined
/// by single spaces. Absent parts are skipped.
///
/// Different transactions may share a signature; it groups, it does not identify.
pub fn signature(transaction: &Transaction) -> String {
    let amount = transaction
        .postings()
        .first()
        .and_then(|posting| posting.amount.as_ref())
        .map(format_amount);

    [transaction.payee(), transaction.narration(), amount.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
}
