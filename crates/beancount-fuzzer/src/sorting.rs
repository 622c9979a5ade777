use crate::Directive;

/// Order directives the way the ledger does: by date, with balance assertions at the start of
/// their day. The sort is stable, so same-day transactions keep their file order.
pub fn sort_directives(directives: &mut [Directive]) {
    directives.sort_by_key(|directive| (directive.date(), directive_order(directive)));
}

fn directive_order(directive: &Directive) -> u8 {
    match directive {
        Directive::Balance(_) => 0,
        Directive::Transaction(_) | Directive::Other(_) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::parse_directives;

    #[test]
    fn sorts_by_date_then_kind() {
        let mut directives = parse_directives(
            r#"
2025-01-02 * "Second"
    Assets:Bank  -2.00 AUD

2025-01-02 balance Assets:Bank  10.00 AUD

2025-01-01 * "First"
    Assets:Bank  -1.00 AUD

2025-01-02 * "Third"
    Assets:Bank  -3.00 AUD
"#,
        )
        .unwrap();
        sort_directives(&mut directives);

        let rendered: Vec<String> = directives
            .iter()
            .map(|directive| directive.to_string().lines().next().unwrap().to_owned())
            .collect();
        assert_eq!(
            rendered,
            [
                r#"2025-01-01 * "First""#,
                "2025-01-02 balance Assets:Bank 10.00 AUD",
                r#"2025-01-02 * "Second""#,
                r#"2025-01-02 * "Third""#,
            ]
        );
    }
}
