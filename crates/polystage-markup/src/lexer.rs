use crate::error::ParseError;
use crate::escape::unescape;

// ── Token ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `<name`
    Open(String),
    /// `</name`
    Close(String),
    /// Attribute name inside a tag.
    Name(String),
    /// Quoted attribute value, entities decoded.
    Str(String),
    Equals,
    /// `>`
    TagEnd,
    /// `/>`
    SelfClose,
    /// Character data between tags, entities decoded.
    Text(String),
    Eof,
}

/// A token with the 1-based position of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenWithPos {
    pub token: Token,
    pub line: usize,
    pub col: usize,
}

// ── Lexer ─────────────────────────────────────────────────────────────────

/// Markup is modal: character data outside tags, names and values inside.
pub struct Lexer<'s> {
    src: &'s str,
    pos: usize,
    line: usize,
    col: usize,
    token_line: usize,
    token_col: usize,
    in_tag: bool,
}

impl<'s> Lexer<'s> {
    pub fn new(src: &'s str) -> Self {
        Self { src, pos: 0, line: 1, col: 1, token_line: 1, token_col: 1, in_tag: false }
    }

    pub fn tokenize(mut self) -> Result<Vec<TokenWithPos>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            let token = if self.in_tag { self.next_in_tag()? } else { self.next_in_content()? };
            let eof = token == Token::Eof;
            tokens.push(TokenWithPos { token, line: self.token_line, col: self.token_col });
            if eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    /// Records the start of the token about to be lexed.
    fn mark(&mut self) {
        self.token_line = self.line;
        self.token_col = self.col;
    }

    fn advance_n(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    fn err(&self, msg: impl Into<String>) -> ParseError {
        ParseError::new(msg, self.line, self.col)
    }

    fn is_name_char(c: char) -> bool {
        c.is_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')
    }

    fn lex_name(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if Self::is_name_char(c)) {
            self.advance();
        }
        if start == self.pos {
            return Err(self.err("expected a name"));
        }
        Ok(self.src[start..self.pos].to_string())
    }

    // ── Content mode ──────────────────────────────────────────────────────

    fn next_in_content(&mut self) -> Result<Token, ParseError> {
        loop {
            self.mark();
            if self.rest().starts_with("<!--") {
                let Some(end) = self.rest().find("-->") else {
                    return Err(self.err("unterminated comment"));
                };
                let len = self.rest()[..end + 3].chars().count();
                self.advance_n(len);
                continue;
            }
            if self.rest().starts_with("<!") || self.rest().starts_with("<?") {
                // Doctype / processing instruction: skipped.
                let Some(end) = self.rest().find('>') else {
                    return Err(self.err("unterminated declaration"));
                };
                let len = self.rest()[..=end].chars().count();
                self.advance_n(len);
                continue;
            }
            break;
        }

        if self.rest().starts_with("</") {
            self.advance_n(2);
            let name = self.lex_name()?;
            self.in_tag = true;
            return Ok(Token::Close(name));
        }
        match self.peek() {
            None => Ok(Token::Eof),
            Some('<') => {
                self.advance();
                let name = self.lex_name()?;
                self.in_tag = true;
                Ok(Token::Open(name))
            }
            Some(_) => {
                let start = self.pos;
                while !matches!(self.peek(), None | Some('<')) {
                    self.advance();
                }
                Ok(Token::Text(unescape(&self.src[start..self.pos])))
            }
        }
    }

    // ── Tag mode ──────────────────────────────────────────────────────────

    fn next_in_tag(&mut self) -> Result<Token, ParseError> {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
        self.mark();

        if self.rest().starts_with("/>") {
            self.advance_n(2);
            self.in_tag = false;
            return Ok(Token::SelfClose);
        }
        match self.peek() {
            None => Ok(Token::Eof),
            Some('>') => {
                self.advance();
                self.in_tag = false;
                Ok(Token::TagEnd)
            }
            Some('=') => {
                self.advance();
                Ok(Token::Equals)
            }
            Some(q @ ('"' | '\'')) => self.lex_quoted(q),
            Some(c) if Self::is_name_char(c) => Ok(Token::Name(self.lex_name()?)),
            Some(other) => Err(self.err(format!("unexpected character {other:?} inside tag"))),
        }
    }

    fn lex_quoted(&mut self, quote: char) -> Result<Token, ParseError> {
        self.advance();
        let start = self.pos;
        loop {
            match self.peek() {
                None => return Err(self.err("unterminated attribute value")),
                Some(c) if c == quote => break,
                Some(_) => {
                    self.advance();
                }
            }
        }
        let value = unescape(&self.src[start..self.pos]);
        self.advance();
        Ok(Token::Str(value))
    }
}
