//! The directives flowing through the fuzzer.
//!
//! Everything is kept as parsed by `beancount_parser`, so dates, costs, prices and metadata pass
//! through untouched and render back with the parser's [`Display`]. [`Directive`] only sorts the
//! entries into the kinds the fuzzer cares about.

use std::collections::BTreeSet;
use std::fmt::{self, Display};

use anyhow::ensure;
use beancount_parser::DirectiveContent;

use crate::{Decimal, Result};

pub type Date = beancount_parser::Date;
pub type Account = beancount_parser::Account;
pub type Tag = beancount_parser::Tag;
pub type Amount = beancount_parser::Amount<Decimal>;
pub type Posting = beancount_parser::Posting<Decimal>;
pub type ParsedDirective = beancount_parser::Directive<Decimal>;

/// `value currency`, the way an amount is written on a posting.
pub fn format_amount(amount: &Amount) -> String {
    format!("{} {}", amount.value, amount.currency)
}

/// The name of a tag, without the leading `#`.
pub fn tag_name(tag: &Tag) -> String {
    tag.to_string().trim_start_matches('#').to_owned()
}

/// How many of `postings` leave their amount to be inferred.
pub fn elided_amounts(postings: &[Posting]) -> usize {
    postings
        .iter()
        .filter(|posting| posting.amount.is_none())
        .count()
}

fn check_postings(postings: &[Posting]) -> Result<()> {
    ensure!(!postings.is_empty(), "transaction has no postings");
    let elided = elided_amounts(postings);
    ensure!(elided <= 1, "{elided} postings without an amount");
    Ok(())
}

/// A transaction directive with at least one posting and at most one amount to infer.
///
/// The `with_*` methods return modified copies; date, flag, metadata and everything else not
/// touched stay as they were parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    directive: ParsedDirective,
}

impl Transaction {
    fn content(&self) -> &beancount_parser::Transaction<Decimal> {
        match &self.directive.content {
            DirectiveContent::Transaction(txn) => txn,
            _ => unreachable!("Transaction always wraps a transaction directive"),
        }
    }

    fn content_mut(&mut self) -> &mut beancount_parser::Transaction<Decimal> {
        match &mut self.directive.content {
            DirectiveContent::Transaction(txn) => txn,
            _ => unreachable!("Transaction always wraps a transaction directive"),
        }
    }

    pub fn date(&self) -> Date {
        self.directive.date
    }

    pub fn flag(&self) -> Option<char> {
        self.content().flag
    }

    pub fn payee(&self) -> Option<&str> {
        self.content().payee.as_deref()
    }

    pub fn narration(&self) -> Option<&str> {
        self.content().narration.as_deref()
    }

    pub fn postings(&self) -> &[Posting] {
        &self.content().postings
    }

    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.content().tags.iter()
    }

    pub fn tag_names(&self) -> BTreeSet<String> {
        self.tags().map(tag_name).collect()
    }

    pub fn posts_to(&self, account: &Account) -> bool {
        self.postings()
            .iter()
            .any(|posting| &posting.account == account)
    }

    pub fn directive(&self) -> &ParsedDirective {
        &self.directive
    }

    /// Replace the postings. Callers keep at most one of them without an amount.
    pub fn with_postings(mut self, postings: Vec<Posting>) -> Self {
        debug_assert!(check_postings(&postings).is_ok());
        self.content_mut().postings = postings;
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.content_mut().tags = tags.into_iter().collect();
        self
    }

    /// Fill in the amount left to the ledger as the negated sum of the other postings.
    ///
    /// Only done when all other postings are plain amounts in one currency, without cost or
    /// price. Otherwise the amount stays absent.
    pub fn with_inferred_amount(mut self) -> Self {
        if let Some((index, amount)) = inferred_amount(self.postings()) {
            self.content_mut().postings[index].amount = Some(amount);
        }
        self
    }
}

fn inferred_amount(postings: &[Posting]) -> Option<(usize, Amount)> {
    let elided = postings.iter().position(|posting| posting.amount.is_none())?;

    let mut total: Option<Amount> = None;
    for (index, posting) in postings.iter().enumerate() {
        if index == elided {
            continue;
        }
        if posting.cost.is_some() || posting.price.is_some() {
            return None;
        }
        let amount = posting.amount.as_ref()?;
        total = match total {
            None => Some(amount.clone()),
            Some(mut sum) if sum.currency == amount.currency => {
                sum.value += amount.value;
                Some(sum)
            }
            Some(_) => return None,
        };
    }

    let mut amount = total?;
    amount.value = -amount.value;
    Some((elided, amount))
}

impl Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.directive, f)
    }
}

/// The kinds of directive the fuzzer tells apart. Only transactions are ever changed.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Transaction(Transaction),
    Balance(ParsedDirective),
    Other(ParsedDirective),
}

impl Directive {
    pub fn parsed(&self) -> &ParsedDirective {
        match self {
            Directive::Transaction(txn) => txn.directive(),
            Directive::Balance(directive) | Directive::Other(directive) => directive,
        }
    }

    pub fn date(&self) -> Date {
        self.parsed().date
    }

    pub fn as_transaction(&self) -> Option<&Transaction> {
        match self {
            Directive::Transaction(txn) => Some(txn),
            _ => None,
        }
    }
}

impl From<ParsedDirective> for Directive {
    /// Transactions that can't be completed soundly, without postings or with several amounts
    /// to infer, are kept as [`Directive::Other`].
    fn from(directive: ParsedDirective) -> Self {
        let checked = match &directive.content {
            DirectiveContent::Transaction(txn) => check_postings(&txn.postings),
            DirectiveContent::Balance(_) => return Directive::Balance(directive),
            _ => return Directive::Other(directive),
        };

        match checked {
            Ok(()) => Directive::Transaction(Transaction { directive }),
            Err(error) => {
                tracing::warn!("Keeping transaction on {} as-is: {error}", directive.date);
                Directive::Other(directive)
            }
        }
    }
}

impl From<Transaction> for Directive {
    fn from(txn: Transaction) -> Self {
        Directive::Transaction(txn)
    }
}

impl Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self.parsed(), f)
    }
}
