//! Line tokenizer for textual IR

/// A token of one IR line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Keyword, type, literal, metadata or attribute reference
    Word(String),
    /// `%name`, name stored without the sigil or quotes
    Local(String),
    /// `@name`
    Global(String),
    /// `"text"`, contents without quotes
    Str(String),
    Punct(char),
}

impl Token {
    pub fn is_punct(&self, c: char) -> bool {
        matches!(self, Token::Punct(p) if *p == c)
    }

    pub fn is_word(&self, word: &str) -> bool {
        matches!(self, Token::Word(w) if w == word)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Word(w) => write!(f, "{}", w),
            Token::Local(name) => write!(f, "%{}", name),
            Token::Global(name) => write!(f, "@{}", name),
            Token::Str(s) => write!(f, "\"{}\"", s),
            Token::Punct(c) => write!(f, "{}", c),
        }
    }
}

/// Drop a trailing `;` comment, ignoring semicolons inside quotes
pub fn strip_comment(line: &str) -> &str {
    let mut in_quote = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_quote = !in_quote,
            ';' if !in_quote => return &line[..i],
            _ => {}
        }
    }
    line
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '-' | '+' | '$' | '!' | '#')
}

pub fn tokenize(line: &str) -> Vec<Token> {
    let chars: Vec<char> = line.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        match c {
            '%' | '@' => {
                let (name, next) = read_name(&chars, i + 1);
                tokens.push(if c == '%' {
                    Token::Local(name)
                } else {
                    Token::Global(name)
                });
                i = next;
            }
            '"' => {
                let (text, next) = read_quoted(&chars, i);
                tokens.push(Token::Str(text));
                i = next;
            }
            c if is_word_char(c) => {
                let start = i;
                while i < chars.len() && is_word_char(chars[i]) {
                    i += 1;
                }
                tokens.push(Token::Word(chars[start..i].iter().collect()));
            }
            _ => {
                tokens.push(Token::Punct(c));
                i += 1;
            }
        }
    }

    tokens
}

/// Read a name after a sigil, either bare or quoted
fn read_name(chars: &[char], start: usize) -> (String, usize) {
    if chars.get(start) == Some(&'"') {
        return read_quoted(chars, start);
    }

    let mut end = start;
    while end < chars.len() && is_word_char(chars[end]) {
        end += 1;
    }
    (chars[start..end].iter().collect(), end)
}

/// Read a quoted string starting at the opening quote. An unterminated
/// string runs to the end of the line.
fn read_quoted(chars: &[char], start: usize) -> (String, usize) {
    let mut end = start + 1;
    while end < chars.len() && chars[end] != '"' {
        end += 1;
    }
    let text = chars[start + 1..end].iter().collect();
    (text, (end + 1).min(chars.len()))
}

/// Net count of open `[` over `]` in a token list
pub fn bracket_balance(tokens: &[Token]) -> i32 {
    tokens.iter().fold(0, |depth, tok| match tok {
        Token::Punct('[') => depth + 1,
        Token::Punct(']') => depth - 1,
        _ => depth,
    })
}

/// Split on commas that are not nested inside any bracket pair
pub fn split_top_level(tokens: &[Token]) -> Vec<&[Token]> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;

    for (i, tok) in tokens.iter().enumerate() {
        match tok {
            Token::Punct('(' | '[' | '<' | '{') => depth += 1,
            Token::Punct(')' | ']' | '>' | '}') => depth -= 1,
            Token::Punct(',') if depth == 0 => {
                parts.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&tokens[start..]);

    parts
}

/// Render tokens back to compact text
pub fn join(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("br label %x ; loop"), "br label %x ");
        assert_eq!(strip_comment("@s = constant [2 x i8] c\";\\00\""), "@s = constant [2 x i8] c\";\\00\"");
        assert_eq!(strip_comment("; only comment"), "");
    }

    #[test]
    fn test_tokenize_compare() {
        let tokens = tokenize("%cmp = icmp slt i32 %i.0, -1");
        assert_eq!(
            tokens,
            vec![
                Token::Local("cmp".to_string()),
                Token::Punct('='),
                Token::Word("icmp".to_string()),
                Token::Word("slt".to_string()),
                Token::Word("i32".to_string()),
                Token::Local("i.0".to_string()),
                Token::Punct(','),
                Token::Word("-1".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokenize_quoted_names() {
        let tokens = tokenize("br label %\"loop exit\"");
        assert_eq!(tokens[2], Token::Local("loop exit".to_string()));

        let tokens = tokenize("\"weird label\":");
        assert_eq!(
            tokens,
            vec![Token::Str("weird label".to_string()), Token::Punct(':')]
        );
    }

    #[test]
    fn test_split_top_level_respects_nesting() {
        let tokens = tokenize("i1 icmp (i32 1, i32 2), label %a, label %b");
        let parts = split_top_level(&tokens);
        assert_eq!(parts.len(), 3);
        assert_eq!(join(parts[1]), "label %a");
    }

    #[test]
    fn test_bracket_balance() {
        assert_eq!(bracket_balance(&tokenize("switch i32 %x, label %d [")), 1);
        assert_eq!(bracket_balance(&tokenize("%a = alloca [4 x i32]")), 0);
        assert_eq!(bracket_balance(&tokenize("]")), -1);
    }
}
