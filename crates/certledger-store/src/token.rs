//! Random suffixes for certificate ids.

use std::collections::VecDeque;

use rand::Rng;

/// Length of generated tokens.
pub const TOKEN_LEN: usize = 9;

const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A source of id suffixes.
///
/// Tokens need not be unique; the store retries on collision.
pub trait TokenSource: Send + Sync {
    /// Produce the next token.
    fn next_token(&mut self) -> String;
}

/// Uppercase base-36 tokens of [`TOKEN_LEN`] characters from the thread RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTokens;

impl TokenSource for RandomTokens {
    fn next_token(&mut self) -> String {
        let mut rng = rand::thread_rng();
        (0..TOKEN_LEN)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

/// Hands out a fixed script of tokens, then repeats the last one forever.
///
/// Deterministic ids for tests and fixtures; an exhausted single-token
/// script is a convenient way to force collisions.
#[derive(Debug, Clone)]
pub struct ScriptedTokens {
    script: VecDeque<String>,
    last: String,
}

impl ScriptedTokens {
    /// Create a source that yields `tokens` in order.
    pub fn new<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            script: tokens.into_iter().map(Into::into).collect(),
            last: String::from("0"),
        }
    }
}

impl TokenSource for ScriptedTokens {
    fn next_token(&mut self) -> String {
        if let Some(token) = self.script.pop_front() {
            self.last = token;
        }
        self.last.clone()
    }
}
