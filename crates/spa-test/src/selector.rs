//! Selector parsing for node queries.
//!
//! Supports:
//! - `"text='Option 1'"` - by painted text
//! - `"[data-testid='login']"` - by test ID
//! - `"[aria-label='Network mode']"` - by accessible name
//! - `"[role='combobox']"` - by accessible role

use std::fmt;

use thiserror::Error;

use crate::node::Node;

/// Parsed selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Match a text node whose content equals the value
    Text(String),
    /// Match by test ID (e.g., `[data-testid='foo']`)
    TestId(String),
    /// Match by accessible name (e.g., `[aria-label='foo']`)
    Label(String),
    /// Match by accessible role (e.g., `[role='combobox']`)
    Role(String),
}

impl Selector {
    /// Parse a selector string.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        SelectorParser::new(input).parse()
    }

    /// Selector matching text nodes with exactly this content.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Selector matching a test ID.
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId(id.into())
    }

    /// Check if this selector matches a node.
    #[must_use]
    pub fn matches(&self, node: &Node) -> bool {
        match self {
            Self::Text(text) => node.text.as_deref() == Some(text.as_str()),
            Self::TestId(id) => node.test_id.as_deref() == Some(id.as_str()),
            Self::Label(name) => node.accessible_name.as_deref() == Some(name.as_str()),
            Self::Role(role) => node.role.as_str() == role,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "text='{text}'"),
            Self::TestId(id) => write!(f, "[data-testid='{id}']"),
            Self::Label(name) => write!(f, "[aria-label='{name}']"),
            Self::Role(role) => write!(f, "[role='{role}']"),
        }
    }
}

/// Selector parser.
pub struct SelectorParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> SelectorParser<'a> {
    /// Create a new parser.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Parse the selector.
    pub fn parse(&mut self) -> Result<Selector, SelectorError> {
        self.skip_whitespace();

        let first = self.peek_char().ok_or(SelectorError::Empty)?;
        let selector = match first {
            '[' => self.parse_attribute()?,
            _ if first.is_alphabetic() => self.parse_text()?,
            _ => return Err(SelectorError::UnexpectedChar(first)),
        };

        self.skip_whitespace();
        match self.peek_char() {
            None => Ok(selector),
            Some(c) => Err(SelectorError::UnexpectedChar(c)),
        }
    }

    fn parse_text(&mut self) -> Result<Selector, SelectorError> {
        let name = self.read_identifier()?;
        if name != "text" {
            return Err(SelectorError::UnknownAttribute(name));
        }
        self.expect('=')?;
        Ok(Selector::Text(self.read_value()?))
    }

    fn parse_attribute(&mut self) -> Result<Selector, SelectorError> {
        self.advance(); // Skip '['

        let name = self.read_identifier()?;
        if self.peek_char() != Some('=') {
            return Err(SelectorError::InvalidAttribute);
        }
        self.advance(); // Skip '='

        let value = self.read_value()?;

        if self.peek_char() != Some(']') {
            return Err(SelectorError::UnclosedAttribute);
        }
        self.advance();

        match name.as_str() {
            "data-testid" => Ok(Selector::TestId(value)),
            "aria-label" => Ok(Selector::Label(value)),
            "role" => Ok(Selector::Role(value)),
            "text" => Ok(Selector::Text(value)),
            _ => Err(SelectorError::UnknownAttribute(name)),
        }
    }

    /// Quoted values may contain spaces; bare values end at `]` or whitespace.
    fn read_value(&mut self) -> Result<String, SelectorError> {
        match self.peek_char() {
            Some(quote @ ('\'' | '"')) => {
                self.advance();
                let value = self.read_until(|c| c == quote);
                if self.peek_char() != Some(quote) {
                    return Err(SelectorError::UnterminatedString);
                }
                self.advance();
                Ok(value)
            }
            _ => {
                let value = self.read_until(|c| c == ']' || c.is_whitespace());
                if value.is_empty() {
                    Err(SelectorError::InvalidAttribute)
                } else {
                    Ok(value)
                }
            }
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), SelectorError> {
        match self.peek_char() {
            Some(c) if c == expected => {
                self.advance();
                Ok(())
            }
            Some(c) => Err(SelectorError::UnexpectedChar(c)),
            None => Err(SelectorError::InvalidAttribute),
        }
    }

    fn read_identifier(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        if self.pos == start {
            return Err(SelectorError::ExpectedIdentifier);
        }

        Ok(self.input[start..self.pos].to_string())
    }

    fn read_until(&mut self, stop: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if stop(c) {
                break;
            }
            self.advance();
        }
        self.input[start..self.pos].to_string()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }
}

/// Selector parsing error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// Empty selector
    #[error("empty selector")]
    Empty,
    /// Unexpected character
    #[error("unexpected character: '{0}'")]
    UnexpectedChar(char),
    /// Expected identifier
    #[error("expected identifier")]
    ExpectedIdentifier,
    /// Invalid attribute syntax
    #[error("invalid attribute syntax")]
    InvalidAttribute,
    /// Unclosed attribute bracket
    #[error("unclosed attribute bracket")]
    UnclosedAttribute,
    /// Quoted value missing its closing quote
    #[error("unterminated quoted value")]
    UnterminatedString,
    /// Attribute name the harness cannot match on
    #[error("unknown attribute: '{0}'")]
    UnknownAttribute(String),
}
