//! Token string to key/button lookup.

use std::collections::HashMap;
use std::fmt;

use crate::error::InputError;
use crate::key::{Key, MouseButton};

/// A resolved input token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Key(Key),
    Mouse(MouseButton),
}

impl Token {
    pub const fn name(self) -> &'static str {
        match self {
            Token::Key(key) => key.token(),
            Token::Mouse(button) => button.token(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Key> for Token {
    fn from(key: Key) -> Self {
        Token::Key(key)
    }
}

impl From<MouseButton> for Token {
    fn from(button: MouseButton) -> Self {
        Token::Mouse(button)
    }
}

/// Fixed bijection between token strings and keys/buttons, built once.
#[derive(Debug, Clone)]
pub struct TokenTable {
    by_name: HashMap<&'static str, Token>,
}

impl TokenTable {
    pub fn new() -> Self {
        let keys = Key::ALL.iter().map(|&key| Token::Key(key));
        let buttons = MouseButton::ALL.iter().map(|&button| Token::Mouse(button));
        let by_name = keys.chain(buttons).map(|token| (token.name(), token)).collect();
        Self { by_name }
    }

    /// Look up a token. Empty and unregistered strings are errors, never `false`.
    pub fn resolve(&self, token: &str) -> Result<Token, InputError> {
        if token.is_empty() {
            return Err(InputError::EmptyToken);
        }
        self.by_name
            .get(token)
            .copied()
            .ok_or_else(|| InputError::UnknownToken(token.to_string()))
    }

    pub fn token_name(&self, token: Token) -> &'static str {
        token.name()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Token)> + '_ {
        self.by_name.iter().map(|(&name, &token)| (name, token))
    }
}

impl Default for TokenTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_a_bijection() {
        let table = TokenTable::new();
        assert_eq!(table.len(), Key::COUNT + MouseButton::COUNT);
        for &key in Key::ALL {
            assert_eq!(table.resolve(key.token()), Ok(Token::Key(key)));
        }
        for &button in MouseButton::ALL {
            assert_eq!(table.resolve(button.token()), Ok(Token::Mouse(button)));
        }
        for (name, token) in table.iter() {
            assert_eq!(table.token_name(token), name);
        }
    }

    #[test]
    fn test_resolve_examples() {
        let table = TokenTable::new();
        assert_eq!(table.resolve("a"), Ok(Token::Key(Key::A)));
        assert_eq!(table.resolve("f1"), Ok(Token::Key(Key::F1)));
        assert_eq!(table.resolve("lshift"), Ok(Token::Key(Key::LShift)));
        assert_eq!(table.resolve("mouse1"), Ok(Token::Mouse(MouseButton::Left)));
    }

    #[test]
    fn test_fail_fast() {
        let table = TokenTable::new();
        assert_eq!(table.resolve(""), Err(InputError::EmptyToken));
        assert_eq!(table.resolve("shift"), Err(InputError::UnknownToken("shift".into())));
        // No case folding and no aliases
        assert!(table.resolve("A").is_err());
        assert!(table.resolve("enter").is_err());
        assert!(table.resolve("mouse6").is_err());
    }
}
