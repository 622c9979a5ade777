//! Complete partially imported beancount transactions from a journal of categorized history.
//!
//! Each imported transaction only knows the leg on the account it was exported from. The fuzzer
//! keys the journal's transactions by a [`signature`](signature::signature), finds the historical
//! signature most similar to the imported one and copies the missing legs and tags over.

pub mod index;
pub mod ledger;
pub mod matcher;
pub mod merge;
pub mod model;
pub mod pipeline;
pub mod signature;
mod sorting;

pub type Decimal = rust_decimal::Decimal;

pub use anyhow::Result;
pub use model::{Account, Amount, Date, Directive, Posting, Transaction};
pub use pipeline::{Completion, CompletionItem, Fuzzer, FuzzerConfig};
