//! Reading beancount files into [`Directive`]s.

use std::path::Path;

use anyhow::{Context, anyhow};
use beancount_parser::Entry;

use crate::{Decimal, Directive, Result, sorting};

/// Read the journal used as history, following includes.
///
/// See [`prepare_history`] for what happens to the directives read.
pub fn read_history(path: impl AsRef<Path>) -> Result<Vec<Directive>> {
    let path = path.as_ref();
    let mut directives = Vec::new();
    for entry in beancount_parser::read_files_iter::<Decimal>(std::iter::once(path.to_owned())) {
        let entry = entry.with_context(|| format!("Failed to read journal: {}", path.display()))?;
        if let Entry::Directive(directive) = entry {
            directives.push(Directive::from(directive));
        }
    }

    let directives = prepare_history(directives);
    tracing::debug!("Read {} directives from {}", directives.len(), path.display());
    Ok(directives)
}

/// Make parsed journal directives ready to learn from, the way the ledger itself loads them.
///
/// A posting left for the ledger to balance gets its inferred amount, and directives are sorted
/// by date so that the last of several similar transactions is also the most recent one.
pub fn prepare_history(directives: Vec<Directive>) -> Vec<Directive> {
    let mut directives: Vec<_> = directives
        .into_iter()
        .map(|directive| match directive {
            Directive::Transaction(txn) => Directive::Transaction(txn.with_inferred_amount()),
            other => other,
        })
        .collect();
    sorting::sort_directives(&mut directives);
    directives
}

/// Read a single file of imported entries, in file order.
pub fn read_importing(path: impl AsRef<Path>) -> Result<Vec<Directive>> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read import file: {}", path.display()))?;
    parse_directives(&source).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Parse beancount source, keeping directives in the order they appear.
pub fn parse_directives(source: &str) -> Result<Vec<Directive>> {
    let mut directives = Vec::new();
    for entry in beancount_parser::parse_iter::<Decimal>(source) {
        let entry = entry.map_err(|error| anyhow!("{error}"))?;
        if let Entry::Directive(directive) = entry {
            directives.push(Directive::from(directive));
        }
    }
    Ok(directives)
}
