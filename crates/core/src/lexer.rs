//! Line tokenizer for metric descriptions and output templates.
//!
//! Tokens are runs of one character class: whitespace, operator symbols,
//! or "word" characters (everything else). The statement terminator `;` is
//! always a token of its own. There is no awareness of string literals or
//! escapes; metric bodies never need them.

/// The class a token's characters belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Space,
    Operator,
    Terminator,
    Word,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// Byte offset of the token's first character in the tokenized line.
    pub offset: usize,
    pub class: TokenClass,
}

impl Token {
    pub fn is(&self, text: &str) -> bool {
        self.text == text
    }

    pub fn is_terminator(&self) -> bool {
        self.class == TokenClass::Terminator
    }
}

/// Operators that make a statement an assignment to its first token.
pub const ASSIGNMENT_OPS: &[&str] = &["=", "+=", "-=", "/=", "*=", "&=", "|=", "^="];

pub fn is_operator_char(c: char) -> bool {
    matches!(
        c,
        '-' | '+'
            | ','
            | '='
            | '('
            | ')'
            | '?'
            | ':'
            | '*'
            | '/'
            | '~'
            | '!'
            | '^'
            | '|'
            | '&'
            | '['
            | ']'
            | '{'
            | '}'
            | '%'
            | '<'
            | '>'
    )
}

/// Words that may make up the type part of a C declaration.
pub fn is_type_qualifier(word: &str) -> bool {
    matches!(
        word,
        "float"
            | "double"
            | "long"
            | "unsigned"
            | "signed"
            | "const"
            | "volatile"
            | "int"
            | "short"
            | "char"
            | "register"
            | "void"
            | "union"
            | "struct"
            | "*"
            | "**"
            | "***"
            | "****"
    )
}

fn classify(c: char) -> TokenClass {
    if c.is_whitespace() {
        TokenClass::Space
    } else if is_operator_char(c) {
        TokenClass::Operator
    } else if c == ';' {
        TokenClass::Terminator
    } else {
        TokenClass::Word
    }
}

/// Split `line` into tokens. Concatenating the token texts reproduces the
/// line exactly.
pub fn tokenize(line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = line.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        let class = classify(c);
        let mut end = start + c.len_utf8();

        if class != TokenClass::Terminator {
            while let Some(&(pos, next)) = chars.peek() {
                if classify(next) != class {
                    break;
                }
                end = pos + next.len_utf8();
                chars.next();
            }
        }

        tokens.push(Token {
            text: line[start..end].to_owned(),
            offset: start,
            class,
        });
    }

    tokens
}

/// Like [`tokenize`], but drops whitespace tokens. Offsets still refer to
/// the unfiltered line.
pub fn tokenize_significant(line: &str) -> Vec<Token> {
    tokenize(line)
        .into_iter()
        .filter(|t| t.class != TokenClass::Space)
        .collect()
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
