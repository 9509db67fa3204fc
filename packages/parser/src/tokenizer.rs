use crate::error::{ParseError, ParseResult, TokenSpan};
use crate::preprocessor::Conditions;
use logos::Logos;
use std::fmt;

/// Token types for C# declaration syntax.
///
/// Only the keywords that shape declarations get their own variant. Contextual
/// keywords (`get`, `set`, `init`, `where`, `record`, `global`, ...) stay
/// identifiers and are recognised by the parser where they matter.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f\x{FEFF}]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum Token<'src> {
    // Structural keywords
    #[token("using")]
    Using,

    #[token("namespace")]
    Namespace,

    #[token("interface")]
    Interface,

    #[token("class")]
    Class,

    #[token("struct")]
    Struct,

    #[token("enum")]
    Enum,

    #[token("delegate")]
    Delegate,

    #[token("event")]
    Event,

    #[token("operator")]
    Operator,

    #[token("implicit")]
    Implicit,

    #[token("explicit")]
    Explicit,

    #[token("this")]
    This,

    #[token("new")]
    New,

    // Declaration modifiers
    #[token("public", |lex| lex.slice())]
    #[token("private", |lex| lex.slice())]
    #[token("protected", |lex| lex.slice())]
    #[token("internal", |lex| lex.slice())]
    #[token("static", |lex| lex.slice())]
    #[token("abstract", |lex| lex.slice())]
    #[token("virtual", |lex| lex.slice())]
    #[token("override", |lex| lex.slice())]
    #[token("sealed", |lex| lex.slice())]
    #[token("readonly", |lex| lex.slice())]
    #[token("unsafe", |lex| lex.slice())]
    #[token("extern", |lex| lex.slice())]
    #[token("volatile", |lex| lex.slice())]
    #[token("const", |lex| lex.slice())]
    Modifier(&'src str),

    // Parameter modifiers (`ref` also prefixes ref return types)
    #[token("ref", |lex| lex.slice())]
    #[token("out", |lex| lex.slice())]
    #[token("in", |lex| lex.slice())]
    #[token("params", |lex| lex.slice())]
    ParamModifier(&'src str),

    // Identifiers, including verbatim `@class` style names and non-ASCII letters
    #[regex(r"@?[\p{L}\p{Nl}_][\p{L}\p{Nl}\p{Mn}\p{Mc}\p{Nd}\p{Pc}\p{Cf}]*", |lex| lex.slice())]
    Ident(&'src str),

    // Preprocessor line; consumed by `tokenize` and never handed to the parser
    #[regex(r"#[^\n]*", |lex| lex.slice())]
    Directive(&'src str),

    // Literals
    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| lex.slice())]
    #[regex(r#"@"([^"]|"")*""#, |lex| lex.slice())]
    #[regex(r#"\$"([^"\\\n]|\\.)*""#, |lex| lex.slice())]
    #[regex(r#"\$@"([^"]|"")*""#, |lex| lex.slice())]
    #[regex(r#"@\$"([^"]|"")*""#, |lex| lex.slice())]
    #[regex(r#"\$*"""([^"]|"[^"]|""[^"])*""""#, |lex| lex.slice())]
    String(&'src str),

    #[regex(r"'([^'\\\n]|\\.)*'", |lex| lex.slice())]
    Char(&'src str),

    #[regex(r"[0-9][0-9a-zA-Z_]*(\.[0-9][0-9a-zA-Z_]*)?", |lex| lex.slice())]
    #[regex(r"\.[0-9][0-9a-zA-Z_]*", |lex| lex.slice())]
    Number(&'src str),

    // Symbols
    #[token("=>")]
    FatArrow,

    #[token("::")]
    DoubleColon,

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

    #[token("<")]
    LAngle,

    #[token(">")]
    RAngle,

    #[token(":")]
    Colon,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token("=")]
    Equals,

    #[token("?")]
    Question,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("!")]
    Bang,

    #[token("~")]
    Tilde,

    #[token("^")]
    Caret,

    #[token("&")]
    Ampersand,

    #[token("|")]
    Pipe,
}

impl<'src> fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Using => write!(f, "keyword 'using'"),
            Token::Namespace => write!(f, "keyword 'namespace'"),
            Token::Interface => write!(f, "keyword 'interface'"),
            Token::Class => write!(f, "keyword 'class'"),
            Token::Struct => write!(f, "keyword 'struct'"),
            Token::Enum => write!(f, "keyword 'enum'"),
            Token::Delegate => write!(f, "keyword 'delegate'"),
            Token::Event => write!(f, "keyword 'event'"),
            Token::Operator => write!(f, "keyword 'operator'"),
            Token::Implicit => write!(f, "keyword 'implicit'"),
            Token::Explicit => write!(f, "keyword 'explicit'"),
            Token::This => write!(f, "keyword 'this'"),
            Token::New => write!(f, "keyword 'new'"),
            Token::Modifier(m) => write!(f, "modifier '{}'", m),
            Token::ParamModifier(m) => write!(f, "modifier '{}'", m),
            Token::Ident(s) => write!(f, "identifier '{}'", s),
            Token::Directive(s) => write!(f, "directive '{}'", s.trim_end()),
            Token::String(s) => write!(f, "string {}", s),
            Token::Char(c) => write!(f, "char {}", c),
            Token::Number(n) => write!(f, "number {}", n),
            Token::FatArrow => write!(f, "'=>'"),
            Token::DoubleColon => write!(f, "'::'"),
            Token::LBrace => write!(f, "'{{'"),
            Token::RBrace => write!(f, "'}}'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::LBracket => write!(f, "'['"),
            Token::RBracket => write!(f, "']'"),
            Token::LAngle => write!(f, "'<'"),
            Token::RAngle => write!(f, "'>'"),
            Token::Colon => write!(f, "':'"),
            Token::Semicolon => write!(f, "';'"),
            Token::Comma => write!(f, "','"),
            Token::Dot => write!(f, "'.'"),
            Token::Equals => write!(f, "'='"),
            Token::Question => write!(f, "'?'"),
            Token::Plus => write!(f, "'+'"),
            Token::Minus => write!(f, "'-'"),
            Token::Star => write!(f, "'*'"),
            Token::Slash => write!(f, "'/'"),
            Token::Percent => write!(f, "'%'"),
            Token::Bang => write!(f, "'!'"),
            Token::Tilde => write!(f, "'~'"),
            Token::Caret => write!(f, "'^'"),
            Token::Ampersand => write!(f, "'&'"),
            Token::Pipe => write!(f, "'|'"),
        }
    }
}

/// A token paired with its byte range in the source.
pub type Spanned<'src> = (Token<'src>, std::ops::Range<usize>);

/// Tokenize a source string.
///
/// Preprocessor directives are evaluated here: text inside a disabled
/// `#if`/`#elif`/`#else` branch never reaches the parser, and no
/// conditional symbols are defined unless the file `#define`s them. The
/// first character the lexer cannot classify aborts tokenization.
pub fn tokenize(source: &str) -> ParseResult<Vec<Spanned<'_>>> {
    let mut tokens = Vec::new();
    let mut conditions = Conditions::default();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(Token::Directive(text)) => {
                conditions.apply(text, TokenSpan::new(span.start, span.end))?;
                if !conditions.is_active() {
                    let skipped = conditions.skip_disabled(lexer.remainder(), span.end)?;
                    lexer.bump(skipped);
                }
            }
            Ok(token) => tokens.push((token, span)),
            Err(_) => {
                return Err(ParseError::lex_error(
                    TokenSpan::new(span.start, span.end),
                    format!("Unexpected character {:?}", &source[span.clone()]),
                ));
            }
        }
    }

    conditions.finish(source.len())?;
    Ok(tokens)
}
