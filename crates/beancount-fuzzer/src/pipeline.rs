//! Running a batch of imported directives through the fuzzer.

use std::collections::BTreeSet;

use crate::index::HistoryIndex;
use crate::matcher::{self, Match};
use crate::merge::merge;
use crate::model::Account;
use crate::signature::signature;
use crate::{Directive, Transaction};

pub const DEFAULT_THRESHOLD: u8 = 86;

#[derive(Debug, Clone)]
pub struct FuzzerConfig {
    /// Matches must score strictly above this to be used.
    pub threshold: u8,
    /// Tags never copied onto, or kept on, a completed transaction.
    pub blocked_tags: BTreeSet<String>,
}

impl Default for FuzzerConfig {
    fn default() -> Self {
        FuzzerConfig {
            threshold: DEFAULT_THRESHOLD,
            blocked_tags: BTreeSet::new(),
        }
    }
}

/// The historical signature an imported transaction was compared to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub signature: String,
    pub score: u8,
}

impl From<Match<'_>> for Candidate {
    fn from(found: Match<'_>) -> Self {
        Candidate {
            signature: found.signature.to_owned(),
            score: found.score,
        }
    }
}

#[derive(Debug)]
pub enum CompletionItem {
    /// Emitted as it came in. `best` is the closest candidate, if it was a transaction and the
    /// journal had any.
    Unchanged {
        directive: Directive,
        best: Option<Candidate>,
    },
    /// Completed from the most recent journal transaction with the matched signature.
    Completed {
        directive: Directive,
        matched: Candidate,
    },
}

impl CompletionItem {
    pub fn directive(&self) -> &Directive {
        match self {
            CompletionItem::Unchanged { directive, .. }
            | CompletionItem::Completed { directive, .. } => directive,
        }
    }

    pub fn into_directive(self) -> Directive {
        match self {
            CompletionItem::Unchanged { directive, .. }
            | CompletionItem::Completed { directive, .. } => directive,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, CompletionItem::Completed { .. })
    }
}

#[derive(Debug)]
pub enum Completion {
    /// The batch contained no transactions.
    NothingToImport,
    /// One item per imported directive, in input order.
    Completed(Vec<CompletionItem>),
}

impl Completion {
    /// The directives to emit, in input order.
    pub fn into_directives(self) -> Vec<Directive> {
        match self {
            Completion::NothingToImport => Vec::new(),
            Completion::Completed(items) => {
                items.into_iter().map(CompletionItem::into_directive).collect()
            }
        }
    }
}

/// The account every imported transaction is assumed to share: the first posting's account of
/// the first transaction in the batch.
pub fn target_account(importing: &[Directive]) -> Option<&Account> {
    importing
        .iter()
        .find_map(Directive::as_transaction)
        .and_then(|txn| txn.postings().first())
        .map(|posting| &posting.account)
}

#[derive(Debug, Default)]
pub struct Fuzzer {
    config: FuzzerConfig,
}

impl Fuzzer {
    pub fn new(config: FuzzerConfig) -> Self {
        Fuzzer { config }
    }

    /// Complete every imported transaction that closely matches one of the journal's.
    ///
    /// `history` is only considered as far as it posts to the [`target_account`] of `importing`.
    pub fn complete(&self, history: &[Directive], importing: Vec<Directive>) -> Completion {
        let Some(target) = target_account(&importing).cloned() else {
            tracing::info!("Nothing to import");
            return Completion::NothingToImport;
        };
        let index = HistoryIndex::build(history, &target);

        let items: Vec<_> = importing
            .into_iter()
            .map(|directive| self.complete_one(&index, directive))
            .collect();

        let completed = items.iter().filter(|item| item.is_completed()).count();
        tracing::info!("Completed {completed} of {} imported directives", items.len());
        Completion::Completed(items)
    }

    fn complete_one(&self, index: &HistoryIndex<'_>, directive: Directive) -> CompletionItem {
        let txn = match directive {
            Directive::Transaction(txn) => txn,
            other => {
                return CompletionItem::Unchanged {
                    directive: other,
                    best: None,
                };
            }
        };

        let query = signature(&txn);
        let Some(found) = matcher::best_match(&query, index.signatures()) else {
            tracing::debug!("No candidates for '{query}'");
            return unchanged(txn, None);
        };
        if found.score <= self.config.threshold {
            tracing::debug!(
                "Best match for '{query}' is '{}' at {}, not above {}",
                found.signature,
                found.score,
                self.config.threshold
            );
            return unchanged(txn, Some(found.into()));
        }

        let Some(donor) = index.most_recent(found.signature) else {
            return unchanged(txn, Some(found.into()));
        };
        tracing::debug!("Completing '{query}' from '{}' ({})", found.signature, found.score);
        CompletionItem::Completed {
            directive: Directive::Transaction(merge(&txn, donor, &self.config.blocked_tags)),
            matched: found.into(),
        }
    }
}

fn unchanged(txn: Transaction, best: Option<Candidate>) -> CompletionItem {
    CompletionItem::Unchanged {
        directive: Directive::Transaction(txn),
        best,
    }
}
