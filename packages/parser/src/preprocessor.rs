//! Conditional compilation for C# preprocessor directives.
//!
//! Only `#if`, `#elif`, `#else`, `#endif`, `#define` and `#undef` affect
//! which text is tokenized. Every other directive (`#region`, `#pragma`,
//! `#nullable`, ...) is ignored.

use crate::error::{ParseError, ParseResult, TokenSpan};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy)]
struct Frame {
    /// Whether the text around the `#if` block is active
    parent_active: bool,
    /// Whether an earlier branch of this block was selected
    taken: bool,
    seen_else: bool,
    active: bool,
    opened_at: TokenSpan,
}

/// Stack of open `#if` blocks plus the symbols defined so far.
#[derive(Debug, Default)]
pub(crate) struct Conditions {
    frames: Vec<Frame>,
    defined: HashSet<String>,
}

impl Conditions {
    pub(crate) fn is_active(&self) -> bool {
        self.frames.last().map_or(true, |frame| frame.active)
    }

    /// Apply one directive line starting at `#`.
    pub(crate) fn apply(&mut self, directive: &str, span: TokenSpan) -> ParseResult<()> {
        let body = strip_comment(directive.trim_start_matches('#')).trim();
        let (keyword, argument) = match body.find(char::is_whitespace) {
            Some(at) => (&body[..at], body[at..].trim()),
            None => (body, ""),
        };

        match keyword {
            "if" => {
                let parent_active = self.is_active();
                let condition = parent_active && self.evaluate(argument, span)?;
                self.frames.push(Frame {
                    parent_active,
                    taken: condition,
                    seen_else: false,
                    active: condition,
                    opened_at: span,
                });
            }
            "elif" => {
                let frame = self.open_frame("#elif", span)?;
                if frame.seen_else {
                    return Err(ParseError::invalid_syntax(span, "#elif after #else"));
                }
                let condition =
                    frame.parent_active && !frame.taken && self.evaluate(argument, span)?;
                self.update_top(|frame| {
                    frame.active = condition;
                    frame.taken |= condition;
                });
            }
            "else" => {
                let frame = self.open_frame("#else", span)?;
                if frame.seen_else {
                    return Err(ParseError::invalid_syntax(span, "Duplicate #else"));
                }
                self.update_top(|frame| {
                    frame.active = frame.parent_active && !frame.taken;
                    frame.taken = true;
                    frame.seen_else = true;
                });
            }
            "endif" => {
                self.open_frame("#endif", span)?;
                self.frames.pop();
            }
            "define" if self.is_active() => {
                self.defined.insert(symbol(argument, span)?.to_string());
            }
            "undef" if self.is_active() => {
                self.defined.remove(symbol(argument, span)?);
            }
            _ => {}
        }

        Ok(())
    }

    /// Walk the lines of a disabled region, applying the directives found,
    /// and return how many bytes of `rest` to skip. Stops right after the
    /// directive that re-enables tokenization.
    pub(crate) fn skip_disabled(&mut self, rest: &str, offset: usize) -> ParseResult<usize> {
        let mut line_start = 0;

        for line in rest.split_inclusive('\n') {
            let indent = line.len() - line.trim_start().len();
            let text = line.trim_end();
            if text.trim_start().starts_with('#') {
                let start = offset + line_start + indent;
                self.apply(
                    &text[indent..],
                    TokenSpan::new(start, offset + line_start + text.len()),
                )?;
                if self.is_active() {
                    return Ok(line_start + text.len());
                }
            }
            line_start += line.len();
        }

        Ok(rest.len())
    }

    /// Fail on an `#if` still open at the end of the file.
    pub(crate) fn finish(&self, end: usize) -> ParseResult<()> {
        match self.frames.last() {
            Some(frame) => Err(ParseError::lex_error(
                TokenSpan::new(frame.opened_at.start, end.max(frame.opened_at.end)),
                "Unterminated #if block, expected #endif",
            )),
            None => Ok(()),
        }
    }

    fn open_frame(&self, directive: &str, span: TokenSpan) -> ParseResult<Frame> {
        self.frames.last().copied().ok_or_else(|| {
            ParseError::invalid_syntax(span, format!("{} without matching #if", directive))
        })
    }

    fn update_top(&mut self, update: impl FnOnce(&mut Frame)) {
        if let Some(frame) = self.frames.last_mut() {
            update(frame);
        }
    }

    fn evaluate(&self, expression: &str, span: TokenSpan) -> ParseResult<bool> {
        let mut evaluator = Evaluator {
            chars: expression.chars().collect(),
            pos: 0,
            defined: &self.defined,
        };
        let value = evaluator.or();
        evaluator.skip_whitespace();
        match value {
            Some(value) if evaluator.pos == evaluator.chars.len() => Ok(value),
            _ => Err(ParseError::invalid_syntax(
                span,
                format!("Invalid preprocessor expression {:?}", expression),
            )),
        }
    }
}

fn strip_comment(text: &str) -> &str {
    match text.find("//") {
        Some(at) => &text[..at],
        None => text,
    }
}

fn symbol(argument: &str, span: TokenSpan) -> ParseResult<&str> {
    if is_symbol(argument) {
        Ok(argument)
    } else {
        Err(ParseError::invalid_syntax(
            span,
            format!("Invalid conditional symbol {:?}", argument),
        ))
    }
}

fn is_symbol(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Recursive-descent evaluator for `#if` expressions.
///
/// Precedence from loosest to tightest: `||`, `&&`, `==`/`!=`, `!`.
struct Evaluator<'a> {
    chars: Vec<char>,
    pos: usize,
    defined: &'a HashSet<String>,
}

impl Evaluator<'_> {
    fn or(&mut self) -> Option<bool> {
        let mut value = self.and()?;
        while self.eat("||") {
            let rhs = self.and()?;
            value = value || rhs;
        }
        Some(value)
    }

    fn and(&mut self) -> Option<bool> {
        let mut value = self.equality()?;
        while self.eat("&&") {
            let rhs = self.equality()?;
            value = value && rhs;
        }
        Some(value)
    }

    fn equality(&mut self) -> Option<bool> {
        let mut value = self.unary()?;
        loop {
            if self.eat("==") {
                value = value == self.unary()?;
            } else if self.eat("!=") {
                value = value != self.unary()?;
            } else {
                return Some(value);
            }
        }
    }

    fn unary(&mut self) -> Option<bool> {
        if self.eat("!") {
            return self.unary().map(|value| !value);
        }
        self.primary()
    }

    fn primary(&mut self) -> Option<bool> {
        if self.eat("(") {
            let value = self.or()?;
            return self.eat(")").then_some(value);
        }

        self.skip_whitespace();
        let start = self.pos;
        while self
            .chars
            .get(self.pos)
            .is_some_and(|c| c.is_alphanumeric() || *c == '_')
        {
            self.pos += 1;
        }
        let name: String = self.chars[start..self.pos].iter().collect();

        match name.as_str() {
            "" => None,
            "true" => Some(true),
            "false" => Some(false),
            _ if is_symbol(&name) => Some(self.defined.contains(&name)),
            _ => None,
        }
    }

    fn eat(&mut self, operator: &str) -> bool {
        self.skip_whitespace();
        let len = operator.chars().count();
        let matches = self.chars.len() >= self.pos + len
            && self.chars[self.pos..self.pos + len]
                .iter()
                .copied()
                .eq(operator.chars());
        // `!` must not swallow the first half of `!=`
        if matches && operator == "!" && self.chars.get(self.pos + 1) == Some(&'=') {
            return false;
        }
        if matches {
            self.pos += len;
        }
        matches
    }

    fn skip_whitespace(&mut self) {
        while self.chars.get(self.pos).is_some_and(|c| c.is_whitespace()) {
            self.pos += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> TokenSpan {
        TokenSpan::new(0, 0)
    }

    fn evaluate(defined: &[&str], expression: &str) -> ParseResult<bool> {
        let mut conditions = Conditions::default();
        for symbol in defined {
            conditions.defined.insert(symbol.to_string());
        }
        conditions.evaluate(expression, span())
    }

    #[test]
    fn test_expressions() {
        assert!(!evaluate(&[], "UNITY_EDITOR").unwrap());
        assert!(evaluate(&[], "!UNITY_EDITOR").unwrap());
        assert!(evaluate(&["DEBUG"], "DEBUG || UNITY_EDITOR").unwrap());
        assert!(!evaluate(&["DEBUG"], "DEBUG && UNITY_EDITOR").unwrap());
        assert!(evaluate(&["DEBUG"], "(DEBUG && !TRACE) == true").unwrap());
        assert!(evaluate(&[], "A != true").unwrap());
        assert!(evaluate(&[], "true").unwrap());
    }

    #[test]
    fn test_malformed_expressions_fail() {
        assert!(evaluate(&[], "").is_err());
        assert!(evaluate(&[], "(DEBUG").is_err());
        assert!(evaluate(&[], "DEBUG &&").is_err());
        assert!(evaluate(&[], "1 + 2").is_err());
    }

    #[test]
    fn test_branch_selection() {
        let mut conditions = Conditions::default();

        conditions.apply("#if A", span()).unwrap();
        assert!(!conditions.is_active());
        conditions.apply("#elif !B // fallback", span()).unwrap();
        assert!(conditions.is_active());
        conditions.apply("#else", span()).unwrap();
        assert!(!conditions.is_active());
        conditions.apply("#endif", span()).unwrap();
        assert!(conditions.is_active());
        assert!(conditions.finish(0).is_ok());
    }

    #[test]
    fn test_nested_blocks_inherit_disabled_parent() {
        let mut conditions = Conditions::default();

        conditions.apply("#if A", span()).unwrap();
        conditions.apply("#if true", span()).unwrap();
        assert!(!conditions.is_active());
        conditions.apply("#else", span()).unwrap();
        assert!(!conditions.is_active());
        conditions.apply("#endif", span()).unwrap();
        conditions.apply("#else", span()).unwrap();
        assert!(conditions.is_active());
    }

    #[test]
    fn test_define_only_applies_in_active_text() {
        let mut conditions = Conditions::default();

        conditions.apply("#if A", span()).unwrap();
        conditions.apply("#define B", span()).unwrap();
        conditions.apply("#endif", span()).unwrap();
        conditions.apply("#define C", span()).unwrap();

        assert!(!conditions.defined.contains("B"));
        assert!(conditions.defined.contains("C"));

        conditions.apply("#undef C", span()).unwrap();
        assert!(!conditions.defined.contains("C"));
    }

    #[test]
    fn test_unbalanced_directives_fail() {
        let mut conditions = Conditions::default();
        assert!(conditions.apply("#endif", span()).is_err());
        assert!(conditions.apply("#else", span()).is_err());

        conditions.apply("#if A", span()).unwrap();
        conditions.apply("#else", span()).unwrap();
        assert!(conditions.apply("#elif B", span()).is_err());
        assert!(conditions.apply("#else", span()).is_err());
        assert!(matches!(
            conditions.finish(10),
            Err(ParseError::LexError { .. })
        ));
    }

    #[test]
    fn test_skip_disabled_stops_after_reenabling_directive() {
        let mut conditions = Conditions::default();
        conditions.apply("#if A", span()).unwrap();

        let rest = "\n  ` not lexable\n  #else\ninterface";
        let skipped = conditions.skip_disabled(rest, 5).unwrap();

        assert!(conditions.is_active());
        assert_eq!(&rest[skipped..], "\ninterface");
    }
}
