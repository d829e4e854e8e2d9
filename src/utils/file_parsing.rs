/// Splits a comma separated line, keeping commas inside single or double
/// quotes. Tokens keep their quotes; callers strip them where needed.
pub fn split_csv_preserving_quotes(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => {
                quote = None;
                current.push(c);
            }
            (None, '\'' | '"') => {
                quote = Some(c);
                current.push(c);
            }
            (None, ',') => tokens.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    tokens.push(current.trim().to_string());
    tokens
}

pub fn strip_surrounding_quotes(s: &str) -> &str {
    let s = s.trim();
    for q in ['\'', '"'] {
        if let Some(inner) = s.strip_prefix(q).and_then(|r| r.strip_suffix(q)) {
            return inner;
        }
    }
    s
}
