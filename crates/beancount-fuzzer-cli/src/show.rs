use anstyle::{AnsiColor, Color, Style};
use anyhow::Result;
use beancount_fuzzer::{Completion, CompletionItem, Directive};

const NOTHING_TO_IMPORT: &str = "Nothing to import.";

fn ledger_text(directive: &Directive) -> String {
    directive.to_string().replace('\t', "    ")
}

/// Print every emitted directive as ledger text.
pub fn print_completion(completion: Completion) -> Result<()> {
    let Completion::Completed(items) = completion else {
        println!("{NOTHING_TO_IMPORT}");
        return Ok(());
    };

    for item in &items {
        println!("{}", ledger_text(item.directive()));
        println!();
    }

    Ok(())
}

/// Show for each imported transaction whether and from what it was completed.
pub fn show_explain(completion: Completion) -> Result<()> {
    let Completion::Completed(items) = completion else {
        println!("{NOTHING_TO_IMPORT}");
        return Ok(());
    };

    let completed_style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green)));
    let unchanged_style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow)));
    let reset = Style::new();

    let mut completed_count = 0;
    let mut unchanged_count = 0;

    for item in &items {
        match item {
            CompletionItem::Completed { directive, matched } => {
                println!(
                    "{completed_style}━━━ Completed from \"{}\" (score {}) ━━━{reset}",
                    matched.signature, matched.score
                );
                println!("{}", ledger_text(directive));
                println!();
                completed_count += 1;
            }
            CompletionItem::Unchanged { directive, best } => {
                if directive.as_transaction().is_none() {
                    continue;
                }

                match best {
                    Some(best) => println!(
                        "{unchanged_style}━━━ Unchanged, closest \"{}\" (score {}) ━━━{reset}",
                        best.signature, best.score
                    ),
                    None => println!("{unchanged_style}━━━ Unchanged, no candidates ━━━{reset}"),
                }
                println!("{}", ledger_text(directive));
                println!();
                unchanged_count += 1;
            }
        }
    }

    // Summary
    println!("{}━━━ Summary ━━━{}", Style::new().bold(), reset);
    println!("  {completed_style}{completed_count}{reset} transaction(s) completed");
    if unchanged_count > 0 {
        println!("  {unchanged_style}{unchanged_count}{reset} transaction(s) left unchanged");
    }

    Ok(())
}
