//! Lexer for state modules using logos
//!
//! Covers the value-producing subset of JavaScript/TypeScript. Anything else
//! still lexes (as `Punct`) so function bodies can be skipped wholesale.

use logos::Logos;
use std::ops::Range;

/// Token types for state module syntax
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")] // Skip whitespace
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum Token<'src> {
    // Keywords
    #[token("const")]
    Const,
    #[token("let")]
    Let,
    #[token("var")]
    Var,
    #[token("export")]
    Export,
    #[token("default")]
    Default,
    #[token("import")]
    Import,
    #[token("function")]
    Function,
    #[token("class")]
    Class,
    #[token("new")]
    New,
    #[token("null")]
    Null,
    #[token("true")]
    True,
    #[token("false")]
    False,

    // Identifiers (contextual keywords such as `as`, `type`, `from` included)
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*", |lex| lex.slice())]
    Ident(&'src str),

    // Literals (raw, including quotes)
    #[regex(r#""([^"\\\n]|\\(.|\n))*""#, |lex| lex.slice())]
    #[regex(r"'([^'\\\n]|\\(.|\n))*'", |lex| lex.slice())]
    String(&'src str),

    #[regex(r"`([^`\\]|\\(.|\n))*`", |lex| lex.slice())]
    Template(&'src str),

    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9_]+)?n?", |lex| lex.slice())]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?", |lex| lex.slice())]
    #[regex(r"0[xX][0-9a-fA-F_]+n?", |lex| lex.slice())]
    #[regex(r"0[oO][0-7_]+n?", |lex| lex.slice())]
    #[regex(r"0[bB][01_]+n?", |lex| lex.slice())]
    Number(&'src str),

    #[regex(r"/([^/\\\n\[*]|\\.|\[([^\]\\\n]|\\.)*\])([^/\\\n\[]|\\.|\[([^\]\\\n]|\\.)*\])*/[a-z]*", |lex| lex.slice())]
    Regex(&'src str),

    // Punctuation
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semi,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("=")]
    Eq,
    #[token("=>")]
    Arrow,
    #[token("-")]
    Minus,
    #[token("+")]
    Plus,

    // Operators the evaluator never interprets
    #[regex(r"[*%&|^!~<>?@#/]", |lex| lex.slice())]
    Punct(&'src str),
}

impl<'src> Token<'src> {
    /// Human-readable token description for error messages
    pub fn describe(&self) -> String {
        match self {
            Token::Const => "keyword 'const'".to_string(),
            Token::Let => "keyword 'let'".to_string(),
            Token::Var => "keyword 'var'".to_string(),
            Token::Export => "keyword 'export'".to_string(),
            Token::Default => "keyword 'default'".to_string(),
            Token::Import => "keyword 'import'".to_string(),
            Token::Function => "keyword 'function'".to_string(),
            Token::Class => "keyword 'class'".to_string(),
            Token::New => "keyword 'new'".to_string(),
            Token::Null => "'null'".to_string(),
            Token::True => "'true'".to_string(),
            Token::False => "'false'".to_string(),
            Token::Ident(s) => format!("identifier '{}'", s),
            Token::String(s) => format!("string {}", s),
            Token::Template(s) => format!("template {}", s),
            Token::Number(n) => format!("number {}", n),
            Token::Regex(r) => format!("regular expression {}", r),
            Token::LBrace => "'{'".to_string(),
            Token::RBrace => "'}'".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::LBracket => "'['".to_string(),
            Token::RBracket => "']'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Colon => "':'".to_string(),
            Token::Semi => "';'".to_string(),
            Token::Dot => "'.'".to_string(),
            Token::Ellipsis => "'...'".to_string(),
            Token::Eq => "'='".to_string(),
            Token::Arrow => "'=>'".to_string(),
            Token::Minus => "'-'".to_string(),
            Token::Plus => "'+'".to_string(),
            Token::Punct(p) => format!("'{}'", p),
        }
    }

    /// Source text of tokens usable as a property name (`{ default: 1 }`)
    pub fn property_name(&self) -> Option<&'src str> {
        match self {
            Token::Ident(s) => Some(s),
            Token::Const => Some("const"),
            Token::Let => Some("let"),
            Token::Var => Some("var"),
            Token::Export => Some("export"),
            Token::Default => Some("default"),
            Token::Import => Some("import"),
            Token::Function => Some("function"),
            Token::Class => Some("class"),
            Token::New => Some("new"),
            Token::Null => Some("null"),
            Token::True => Some("true"),
            Token::False => Some("false"),
            _ => None,
        }
    }
}

/// A token with its byte span
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken<'src> {
    pub token: Token<'src>,
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub span: Range<usize>,
}

/// Lex source code into tokens with spans
pub fn lex(source: &str) -> impl Iterator<Item = Result<SpannedToken<'_>, LexError>> + '_ {
    Token::lexer(source)
        .spanned()
        .map(|(result, span)| match result {
            Ok(token) => Ok(SpannedToken { token, span }),
            Err(_) => Err(LexError { span }),
        })
}

/// Decode the escapes of a string or template literal body (quotes already removed).
pub fn unescape(body: &str) -> Result<String, String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    // Pending high surrogate from a `\uD8xx` escape
    let mut high_surrogate: Option<u32> = None;

    while let Some(c) = chars.next() {
        if c != '\\' {
            flush_surrogate(&mut out, &mut high_surrogate);
            out.push(c);
            continue;
        }

        let Some(escape) = chars.next() else {
            return Err("unterminated escape sequence".to_string());
        };

        let code = match escape {
            'u' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    let hex: String = chars.by_ref().take_while(|c| *c != '}').collect();
                    parse_hex(&hex)?
                } else {
                    let hex: String = chars.by_ref().take(4).collect();
                    if hex.len() != 4 {
                        return Err(format!("invalid unicode escape \\u{}", hex));
                    }
                    parse_hex(&hex)?
                }
            }
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                if hex.len() != 2 {
                    return Err(format!("invalid hex escape \\x{}", hex));
                }
                parse_hex(&hex)?
            }
            other => {
                flush_surrogate(&mut out, &mut high_surrogate);
                match other {
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    't' => out.push('\t'),
                    'b' => out.push('\u{8}'),
                    'f' => out.push('\u{c}'),
                    'v' => out.push('\u{b}'),
                    '0' => out.push('\0'),
                    // Line continuation
                    '\n' => {}
                    '\r' => {
                        if chars.peek() == Some(&'\n') {
                            chars.next();
                        }
                    }
                    c => out.push(c),
                }
                continue;
            }
        };

        match (high_surrogate.take(), code) {
            (Some(high), 0xDC00..=0xDFFF) => {
                let combined = 0x10000 + ((high - 0xD800) << 10) + (code - 0xDC00);
                out.push(char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            (pending, 0xD800..=0xDBFF) => {
                if pending.is_some() {
                    out.push(char::REPLACEMENT_CHARACTER);
                }
                high_surrogate = Some(code);
            }
            (pending, code) => {
                if pending.is_some() {
                    out.push(char::REPLACEMENT_CHARACTER);
                }
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
        }
    }

    flush_surrogate(&mut out, &mut high_surrogate);
    Ok(out)
}

fn flush_surrogate(out: &mut String, pending: &mut Option<u32>) {
    if pending.take().is_some() {
        out.push(char::REPLACEMENT_CHARACTER);
    }
}

fn parse_hex(hex: &str) -> Result<u32, String> {
    u32::from_str_radix(hex, 16).map_err(|_| format!("invalid hex digits '{}'", hex))
}
