//! Lexer for the Kythera programming language
//!
//! Handles tokenization including:
//! - Keywords and identifiers (closed keyword set, checked against the registry)
//! - Integer, float and string literals
//! - Maximal-munch operators and single-character punctuation
//! - Line (`//`) and block (`/* */`) comments
//! - Automatic statement termination (virtual `;` at end of line)
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token)

pub mod tokens;

pub use tokens::{Token, TokenKind, keyword_id};

use kythera_core::lang::operators::{self, OperatorId};
use kythera_core::lang::punctuation;

use crate::ast::{Position, Span};
use crate::diagnostics::CompileError;

// ============================================================================
// LEXER STATE
// ----------------------------------------------------------------------------
// Automatic statement termination (simplified):
//
// [token: ident | keyword | number | string | ) ] }]
//        ↓
//       skip ' ' '\t' '\r'
//        ↓
//       next is '\n', "//" or end of input → queue virtual ';'
// ============================================================================

/// Streaming lexer for Kythera source code.
///
/// Produces one token per [`Lexer::next_token`] call with a single-token lookahead buffer
/// ([`Lexer::peek_token`]). Errors are fail-fast: the first unrecognized input aborts the stream.
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    line: usize,
    col: usize,
    /// Virtual terminator waiting to be emitted before the next real token.
    pending_terminator: Option<(usize, Position)>,
    peeked: Option<Token>,
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            col: 1,
            pending_terminator: None,
            peeked: None,
            finished: false,
        }
    }

    /// Read and consume the next token.
    ///
    /// ## Errors
    /// - `LexError` for an unrecognized character, an unknown operator spelling, an unterminated string or block
    ///   comment, or an integer literal that does not fit in 64 bits.
    ///
    /// ## Notes
    /// - After the end of input every call returns an `Eof` token.
    pub fn next_token(&mut self) -> Result<Token, CompileError> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.scan_token(),
        }
    }

    /// Look at the next token without consuming it.
    pub fn peek_token(&mut self) -> Result<&Token, CompileError> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.scan_token()?,
        };
        Ok(self.peeked.insert(token))
    }

    /// Tokenize the entire source code.
    ///
    /// The token stream always ends with an `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, CompileError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.pos..].chars();
        iter.next();
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.col)
    }

    fn error(&self, message: String, start: usize, position: Position) -> CompileError {
        CompileError::lex(message, Span::new(start, self.pos.max(start + 1)), position)
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) -> Result<Token, CompileError> {
        if let Some((offset, position)) = self.pending_terminator.take() {
            return Ok(Token::terminator(offset, position));
        }
        if self.finished {
            return Ok(self.eof_token());
        }

        self.skip_trivia()?;

        let start = self.pos;
        let position = self.position();

        let Some(c) = self.advance() else {
            self.finished = true;
            return Ok(self.eof_token());
        };

        let kind = if c == '"' || c == '\'' {
            self.scan_string(c, start, position)?
        } else if c.is_ascii_digit() {
            self.scan_number(start, position)?
        } else if is_ident_start(c) {
            self.scan_identifier(start)
        } else if let Some(id) = punctuation::from_char(c) {
            TokenKind::Punctuation(id)
        } else if operators::is_operator_char(c) {
            TokenKind::Operator(self.scan_operator(start, position)?)
        } else {
            return Err(self.error(format!("Cannot handle character '{c}'"), start, position));
        };

        if ends_line_candidate(&kind) {
            self.check_terminator();
        }

        Ok(Token::new(kind, Span::new(start, self.pos), position))
    }

    fn eof_token(&self) -> Token {
        Token::new(TokenKind::Eof, Span::new(self.pos, self.pos), self.position())
    }

    /// Skip whitespace and comments.
    fn skip_trivia(&mut self) -> Result<(), CompileError> {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\r' | '\n') => {
                    self.advance();
                }
                Some('/') if self.peek_next() == Some('/') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('/') if self.peek_next() == Some('*') => {
                    let start = self.pos;
                    let position = self.position();
                    self.advance();
                    self.advance();
                    loop {
                        match self.advance() {
                            Some('*') if self.peek() == Some('/') => {
                                self.advance();
                                break;
                            }
                            Some(_) => {}
                            None => {
                                return Err(self.error("Unterminated block comment".to_string(), start, position));
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Automatic statement termination: if only horizontal whitespace (or a line comment) separates the token just
    /// scanned from the end of the line, queue a virtual terminator.
    fn check_terminator(&mut self) {
        while let Some(' ' | '\t' | '\r') = self.peek() {
            self.advance();
        }
        let at_line_end = match self.peek() {
            None | Some('\n') => true,
            Some('/') => self.peek_next() == Some('/'),
            Some(_) => false,
        };
        if at_line_end {
            self.pending_terminator = Some((self.pos, self.position()));
        }
    }

    // ========================================================================
    // Literal scanning
    // ========================================================================

    fn scan_string(&mut self, quote: char, start: usize, position: Position) -> Result<TokenKind, CompileError> {
        let mut value = String::new();
        loop {
            match self.advance() {
                Some('\\') => match self.advance() {
                    Some(c) => value.push(c),
                    None => break,
                },
                Some(c) if c == quote => return Ok(TokenKind::String(value)),
                Some(c) => value.push(c),
                None => break,
            }
        }
        Err(self.error("Unterminated string literal".to_string(), start, position))
    }

    /// Digits with at most one decimal point. The point only belongs to the number when a digit follows it.
    fn scan_number(&mut self, start: usize, position: Position) -> Result<TokenKind, CompileError> {
        let mut is_float = false;
        loop {
            match self.peek() {
                Some(c) if c.is_ascii_digit() => {
                    self.advance();
                }
                Some('.') if !is_float && self.peek_next().is_some_and(|c| c.is_ascii_digit()) => {
                    is_float = true;
                    self.advance();
                }
                _ => break,
            }
        }

        let text = &self.source[start..self.pos];
        if is_float {
            text.parse::<f64>()
                .map(TokenKind::Float)
                .map_err(|_| self.error(format!("Invalid float literal '{text}'"), start, position))
        } else {
            text.parse::<i64>()
                .map(TokenKind::Int)
                .map_err(|_| self.error(format!("Integer literal '{text}' is out of range"), start, position))
        }
    }

    fn scan_identifier(&mut self, start: usize) -> TokenKind {
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.advance();
            } else {
                break;
            }
        }

        let spelling = &self.source[start..self.pos];

        // Look up identifier spelling in the reserved-word registry (no allocation for keywords).
        match keyword_id(spelling) {
            Some(id) => TokenKind::Keyword(id),
            None => TokenKind::Ident(spelling.to_string()),
        }
    }

    // ========================================================================
    // Operator scanning
    // ========================================================================

    /// Maximal munch over the operator character class, keeping the longest registered spelling.
    ///
    /// The first character has already been consumed. A run stops before a comment opener, so `a +// c` lexes
    /// `+` followed by a comment.
    fn scan_operator(&mut self, start: usize, position: Position) -> Result<OperatorId, CompileError> {
        let mut end = self.pos;
        let rest = &self.source[self.pos..];
        let mut chars = rest.chars().peekable();
        while let Some(c) = chars.next() {
            if !operators::is_operator_char(c) {
                break;
            }
            if c == '/' && matches!(chars.peek(), Some('/' | '*')) {
                break;
            }
            end += c.len_utf8();
        }

        let run = &self.source[start..end];
        for len in (1..=run.len()).rev() {
            if let Some(id) = operators::from_str(&run[..len]) {
                // Operator characters are ASCII, so byte length equals char count.
                for _ in 1..len {
                    self.advance();
                }
                return Ok(id);
            }
        }
        Err(self.error(format!("Unknown operator '{run}'"), start, position))
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Check if a character can start an identifier (ASCII-only).
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Check if a character can continue an identifier (ASCII-only).
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Tokens after which a line end terminates the statement.
fn ends_line_candidate(kind: &TokenKind) -> bool {
    match kind {
        TokenKind::Ident(_)
        | TokenKind::Keyword(_)
        | TokenKind::Int(_)
        | TokenKind::Float(_)
        | TokenKind::String(_) => true,
        TokenKind::Punctuation(id) => punctuation::closes_group(*id),
        TokenKind::Operator(_) | TokenKind::Eof => false,
    }
}

/// Convenience function to lex a source string.
///
/// This is a shorthand for `Lexer::new(source).tokenize()`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, CompileError> {
    Lexer::new(source).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kythera_core::lang::keywords::KeywordId;
    use kythera_core::lang::punctuation::PunctuationId;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn semi() -> TokenKind {
        TokenKind::Punctuation(PunctuationId::Semicolon)
    }

    #[test]
    fn test_let_statement_gets_virtual_terminator() {
        let tokens = lex("let a = 1\n").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Keyword(KeywordId::Let),
                TokenKind::Ident("a".into()),
                TokenKind::Operator(OperatorId::Eq),
                TokenKind::Int(1),
                semi(),
                TokenKind::Eof,
            ]
        );
        assert!(tokens[4].is_virtual());
    }

    #[test]
    fn test_no_terminator_after_operator_or_open_brace() {
        assert_eq!(
            kinds("1 +\n2"),
            vec![
                TokenKind::Int(1),
                TokenKind::Operator(OperatorId::Plus),
                TokenKind::Int(2),
                semi(),
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("{\n}"),
            vec![
                TokenKind::Punctuation(PunctuationId::LBrace),
                TokenKind::Punctuation(PunctuationId::RBrace),
                semi(),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_terminator_before_line_comment() {
        assert_eq!(
            kinds("a // trailing\nb"),
            vec![TokenKind::Ident("a".into()), semi(), TokenKind::Ident("b".into()), semi(), TokenKind::Eof]
        );
    }

    #[test]
    fn test_explicit_semicolon_is_not_virtual() {
        let tokens = lex("a;").unwrap();
        assert!(!tokens[1].is_virtual());
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_written_and_inserted_terminators_both_end_statements() {
        let tokens = lex("a;\nb\n").unwrap();
        let ends: Vec<_> = tokens.iter().filter(|t| t.kind.is_terminator()).collect();
        assert_eq!(ends.len(), 2);
        assert!(!ends[0].is_virtual());
        assert!(ends[1].is_virtual());
        assert!(!tokens[0].kind.is_terminator());
    }

    #[test]
    fn test_reserved_keywords_are_distinguished() {
        let tokens = lex("each let").unwrap();
        assert_eq!(tokens[0].kind.reserved_keyword(), Some(KeywordId::Each));
        assert_eq!(tokens[1].kind.reserved_keyword(), None);
        assert!(tokens[1].kind.is_keyword(KeywordId::Let));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(kinds("6.0;")[0], TokenKind::Float(6.0));
        assert_eq!(kinds("6;")[0], TokenKind::Int(6));
        assert_eq!(
            kinds("1.5.2;")[..3],
            [TokenKind::Float(1.5), TokenKind::Punctuation(PunctuationId::Dot), TokenKind::Int(2)]
        );
        assert!(lex("99999999999999999999").is_err());
    }

    #[test]
    fn test_strings_close_on_opening_quote_and_escape() {
        assert_eq!(kinds(r#"'a"b';"#)[0], TokenKind::String("a\"b".into()));
        assert_eq!(kinds(r#""a\"b";"#)[0], TokenKind::String("a\"b".into()));
        let err = lex("\"abc").unwrap_err();
        assert_eq!(err.kind, crate::diagnostics::ErrorKind::Lex);
    }

    #[test]
    fn test_operator_munch_takes_longest_registered_prefix() {
        assert_eq!(
            kinds("a&&!b;")[..4],
            [
                TokenKind::Ident("a".into()),
                TokenKind::Operator(OperatorId::AndAnd),
                TokenKind::Operator(OperatorId::Bang),
                TokenKind::Ident("b".into()),
            ]
        );
        assert_eq!(kinds("<>int{}")[0], TokenKind::Operator(OperatorId::LtGt));
        assert_eq!(kinds("a<=b;")[1], TokenKind::Operator(OperatorId::LtEq));
    }

    #[test]
    fn test_unknown_operator_is_lex_error() {
        let err = lex("a ~ b").unwrap_err();
        assert_eq!(err.kind, crate::diagnostics::ErrorKind::Lex);
        assert_eq!(err.position, Some(Position::new(1, 3)));
    }

    #[test]
    fn test_unrecognized_character_carries_position() {
        let err = lex("let a = 1\nlet b = #").unwrap_err();
        assert_eq!(err.position, Some(Position::new(2, 9)));
        assert!(err.message.contains('#'));
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("/* block\ncomment */ a;"),
            vec![TokenKind::Ident("a".into()), semi(), TokenKind::Eof]
        );
        assert!(lex("/* open").is_err());
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut lexer = Lexer::new("a b");
        assert_eq!(lexer.peek_token().unwrap().kind, TokenKind::Ident("a".into()));
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Ident("a".into()));
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Ident("b".into()));
        assert!(lexer.next_token().unwrap().is_virtual());
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    }
}
