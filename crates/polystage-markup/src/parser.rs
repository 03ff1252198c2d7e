use crate::document::{Document, NodeId};
use crate::error::ParseError;
use crate::lexer::{Lexer, Token, TokenWithPos};

// ── Parser ────────────────────────────────────────────────────────────────

pub struct Parser {
    tokens: Vec<TokenWithPos>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<TokenWithPos>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn current_pos(&self) -> (usize, usize) {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|t| (t.line, t.col))
            .unwrap_or((1, 1))
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).map(|t| &t.token).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens.get(self.pos).map(|t| t.token.clone()).unwrap_or(Token::Eof);
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn err(&self, msg: impl Into<String>) -> ParseError {
        let (line, col) = self.current_pos();
        ParseError::new(msg, line, col)
    }

    // ── Content ───────────────────────────────────────────────────────────

    /// Parses nodes into `parent` until `</closing>` (or EOF at top level).
    pub fn parse_content(
        &mut self,
        doc: &mut Document,
        parent: NodeId,
        closing: Option<&str>,
    ) -> Result<(), ParseError> {
        loop {
            match self.peek().clone() {
                Token::Eof => {
                    return match closing {
                        None => Ok(()),
                        Some(tag) => Err(self.err(format!("unclosed <{tag}>"))),
                    };
                }
                Token::Text(text) => {
                    self.advance();
                    if !text.trim().is_empty() {
                        let node = doc.create_text(text);
                        doc.append_child(parent, node);
                    }
                }
                Token::Close(name) => {
                    if closing != Some(name.as_str()) {
                        return Err(self.err(format!("unexpected </{name}>")));
                    }
                    self.advance();
                    if self.advance() != Token::TagEnd {
                        return Err(self.err(format!("expected '>' after </{name}")));
                    }
                    return Ok(());
                }
                Token::Open(_) => self.parse_element(doc, parent)?,
                tok => return Err(self.err(format!("unexpected {tok:?} outside a tag"))),
            }
        }
    }

    // ── Element ───────────────────────────────────────────────────────────

    fn parse_element(&mut self, doc: &mut Document, parent: NodeId) -> Result<(), ParseError> {
        let Token::Open(tag) = self.advance() else {
            return Err(self.err("expected '<'"));
        };
        let el = doc.create_element(tag.clone());

        loop {
            match self.advance() {
                Token::TagEnd => {
                    doc.append_child(parent, el);
                    return self.parse_content(doc, el, Some(&tag));
                }
                Token::SelfClose => {
                    doc.append_child(parent, el);
                    return Ok(());
                }
                Token::Name(name) => {
                    // Bare names are boolean attributes.
                    let value = if self.peek() == &Token::Equals {
                        self.advance();
                        match self.advance() {
                            Token::Str(v) => v,
                            tok => return Err(self.err(format!("expected a quoted value, got {tok:?}"))),
                        }
                    } else {
                        String::new()
                    };
                    doc.set_attribute(el, &name, value);
                }
                Token::Eof => return Err(self.err(format!("unterminated <{tag}"))),
                tok => return Err(self.err(format!("unexpected {tok:?} inside <{tag}>"))),
            }
        }
    }
}

// ── Public parse entry points ─────────────────────────────────────────────

/// Parses markup into a fresh [`Document`].
pub fn parse_document(src: &str) -> Result<Document, ParseError> {
    let mut doc = Document::new();
    let root = doc.root();
    parse_into(&mut doc, root, src)?;
    Ok(doc)
}

/// Parses a markup fragment and appends its nodes under `parent`.
pub fn parse_into(doc: &mut Document, parent: NodeId, src: &str) -> Result<(), ParseError> {
    let tokens = Lexer::new(src).tokenize()?;
    Parser::new(tokens).parse_content(doc, parent, None)
}
