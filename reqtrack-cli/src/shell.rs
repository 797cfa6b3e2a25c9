use anyhow::Result;

/// Splits a shell line into arguments
///
/// Whitespace separates arguments. Single and double quotes group text,
/// and a backslash escapes the next character outside single quotes.
pub fn split_command_line(line: &str) -> Result<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_arg = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some('\''), '\'') => quote = None,
            (Some('"'), '"') => quote = None,
            (Some('"'), '\\') | (None, '\\') => match chars.next() {
                Some(escaped) => {
                    current.push(escaped);
                    in_arg = true;
                }
                None => anyhow::bail!("Trailing backslash in: {}", line),
            },
            (Some(_), c) => current.push(c),
            (None, '\'') | (None, '"') => {
                quote = Some(c);
                in_arg = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_arg = true;
            }
        }
    }

    if let Some(q) = quote {
        anyhow::bail!("Unterminated {} quote in: {}", q, line);
    }
    if in_arg {
        args.push(current);
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_words() {
        assert_eq!(
            split_command_line("  req list 1  --priority high ").unwrap(),
            vec!["req", "list", "1", "--priority", "high"]
        );
    }

    #[test]
    fn test_quotes_group_words() {
        assert_eq!(
            split_command_line(r#"comment add 1 "Looks good, ship it" --req 'REQ-001'"#).unwrap(),
            vec!["comment", "add", "1", "Looks good, ship it", "--req", "REQ-001"]
        );
    }

    #[test]
    fn test_empty_quotes_make_empty_argument() {
        assert_eq!(
            split_command_line(r#"project edit 1 --description """#).unwrap(),
            vec!["project", "edit", "1", "--description", ""]
        );
    }

    #[test]
    fn test_escapes() {
        assert_eq!(
            split_command_line(r#"say "a \"quoted\" word" it\'s 'back\slash'"#).unwrap(),
            vec!["say", "a \"quoted\" word", "it's", "back\\slash"]
        );
    }

    #[test]
    fn test_blank_line() {
        assert!(split_command_line("   ").unwrap().is_empty());
    }

    #[test]
    fn test_unterminated_quote() {
        assert!(split_command_line("comment add 1 \"oops").is_err());
        assert!(split_command_line("trailing \\").is_err());
    }
}
