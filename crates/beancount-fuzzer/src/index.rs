//! Historical transactions grouped by signature.

use indexmap::IndexMap;

use crate::signature::signature;
use crate::model::Account;
use crate::{Directive, Transaction};

/// Transactions of the journal that post to the target account and at least one other, keyed
/// by [`signature`]. Within a group, transactions are kept in the order they were seen, so the
/// last one is the most recent. Signatures iterate in order of first appearance.
#[derive(Debug, Default)]
pub struct HistoryIndex<'a> {
    groups: IndexMap<String, Vec<&'a Transaction>>,
}

impl<'a> HistoryIndex<'a> {
    pub fn build(
        history: impl IntoIterator<Item = &'a Directive>,
        target_account: &Account,
    ) -> Self {
        let mut groups: IndexMap<String, Vec<&'a Transaction>> = IndexMap::new();

        for txn in history.into_iter().filter_map(Directive::as_transaction) {
            // a single leg teaches nothing about the other side
            if txn.postings().len() == 1 || !txn.posts_to(target_account) {
                continue;
            }
            groups.entry(signature(txn)).or_default().push(txn);
        }

        tracing::info!("Indexed {} signatures for {target_account}", groups.len());
        HistoryIndex { groups }
    }

    pub fn signatures(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// The last transaction seen with `signature`.
    pub fn most_recent(&self, signature: &str) -> Option<&'a Transaction> {
        self.groups.get(signature)?.last().copied()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::parse_directives;

    const HISTORY: &str = r#"
2025-01-01 open Assets:Bank

2025-01-02 * "Woolworths" "Woolworths 123"
    Assets:Bank  -50 AUD
    Expenses:Groceries

2025-01-03 * "Opening" "Only one leg"
    Assets:Bank  100 AUD

2025-01-04 * "Broker" "Other account"
    Assets:Broker  -10 AUD
    Expenses:Fees

2025-01-05 balance Assets:Bank  50 AUD

2025-01-06 * "Woolworths" "Woolworths 123" #shopping
    Assets:Bank  -50 AUD
    Expenses:Food

2025-01-07 * "Rent" "January"
    Assets:Bank  -1000 AUD
    Expenses:Rent
"#;

    fn account(name: &str) -> Account {
        name.parse().unwrap()
    }

    #[test]
    fn groups_by_signature_in_order() {
        let history = parse_directives(HISTORY).unwrap();
        let index = HistoryIndex::build(&history, &account("Assets:Bank"));

        assert_eq!(index.len(), 2);
        assert_eq!(
            index.signatures().collect::<Vec<_>>(),
            ["Woolworths Woolworths 123 -50 AUD", "Rent January -1000 AUD"]
        );
    }

    #[test]
    fn most_recent_is_last_seen() {
        let history = parse_directives(HISTORY).unwrap();
        let index = HistoryIndex::build(&history, &account("Assets:Bank"));

        let recent = index.most_recent("Woolworths Woolworths 123 -50 AUD").unwrap();
        assert_eq!(recent.date().to_string(), "2025-01-06");
        assert_eq!(recent.postings()[1].account.to_string(), "Expenses:Food");
        assert!(index.most_recent("Unknown").is_none());
    }

    #[test]
    fn skips_single_legs_and_other_accounts() {
        let history = parse_directives(HISTORY).unwrap();
        let index = HistoryIndex::build(&history, &account("Assets:Bank"));
        assert!(index.most_recent("Opening Only one leg 100 AUD").is_none());
        assert!(index.most_recent("Broker Other account -10 AUD").is_none());

        let broker = HistoryIndex::build(&history, &account("Assets:Broker"));
        assert_eq!(
            broker.signatures().collect::<Vec<_>>(),
            ["Broker Other account -10 AUD"]
        );
    }

    #[test]
    fn empty_history_gives_empty_index() {
        let index = HistoryIndex::build(&[], &account("Assets:Bank"));
        assert!(index.is_empty());
        assert_eq!(index.signatures().count(), 0);
    }
}
