//! Dictionary definitions
//!
//! A raw definition is a list of `/`-separated clauses, as in
//! `/book/letter/CL:本[ben3],冊|册[ce4]/`. Clauses may embed Chinese words as
//! `traditional|simplified[pinyin]` (or the other way round, depending on the
//! dictionary), `hanzi[pinyin]` or bare `hanzi`. [`MeaningFormatter`] splits the
//! clauses into meanings and measure words and keeps only the character form the
//! user prefers.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::token::{Pinyin, Token, TokenList};

lazy_static! {
    static ref EMBEDDED_CHINESE: Regex = Regex::new(
        r"(?:(?:([^|\[\s]*)\|([^|\[\s]*))|([^|\[\s]*))(?:\s*\[([^\]]*)\])?"
    )
    .unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

const MEASURE_WORD_PREFIX: &str = "MW:";
const CLASSIFIER_PREFIX: &str = "CL:";

/// Which character set to show when a definition offers both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimpTrad {
    #[default]
    Simp,
    Trad,
}

/// The clauses of one definition, split by kind. Each clause is a token list so
/// embedded pinyin can still be colored or voiced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedDefinition {
    pub meanings: Vec<TokenList>,
    pub measure_words: Vec<TokenList>,
}

pub struct MeaningFormatter {
    simplified_char_index: usize,
    prefer: SimpTrad,
}

impl MeaningFormatter {
    /// # Arguments
    ///
    /// * `simplified_char_index` - which side of `a|b` holds the simplified
    ///   form (0 or 1; anything else is treated as 1)
    /// * `prefer` - the character set to keep
    pub fn new(simplified_char_index: usize, prefer: SimpTrad) -> Self {
        MeaningFormatter {
            simplified_char_index: simplified_char_index.min(1),
            prefer,
        }
    }

    /// Split a raw definition into meanings and measure words, in source order.
    ///
    /// Never fails: text that does not look like an embedded Chinese word is kept
    /// as literal text.
    pub fn parse_definition(&self, raw_definition: &str) -> ParsedDefinition {
        let mut parsed = ParsedDefinition::default();
        let trimmed = raw_definition
            .trim()
            .trim_start_matches('/')
            .trim_end_matches('/');

        for clause in trimmed.split('/') {
            let clause = clause.trim().replace(CLASSIFIER_PREFIX, MEASURE_WORD_PREFIX);
            match clause.strip_prefix(MEASURE_WORD_PREFIX) {
                Some(measure_words) => {
                    let measure_words: Vec<&str> = measure_words.trim().split(',').collect();
                    parsed
                        .measure_words
                        .push(self.parse_clause(&measure_words.join(", ")));
                }
                None => parsed.meanings.push(self.parse_clause(&clause)),
            }
        }
        parsed
    }

    fn parse_clause(&self, clause: &str) -> TokenList {
        let mut tokens = TokenList::new();
        let mut last = 0;
        for captures in EMBEDDED_CHINESE.captures_iter(clause) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            if whole.is_empty() {
                continue;
            }
            if whole.start() > last {
                tokens.push(Token::text(&clause[last..whole.start()]));
            }
            tokens.extend(self.format_match(&captures).into_iter().map(Into::into));
            last = whole.end();
        }
        if last < clause.len() {
            tokens.push(Token::text(&clause[last..]));
        }
        tokens
    }

    fn format_match(&self, captures: &Captures) -> Vec<Token> {
        let choice = match self.prefer {
            SimpTrad::Simp => self.simplified_char_index,
            SimpTrad::Trad => 1 - self.simplified_char_index,
        };
        let character = captures
            .get(3)
            .or_else(|| captures.get(1 + choice))
            .map(|m| m.as_str())
            .unwrap_or_default();

        let mut tokens = vec![Token::text(character)];
        if let Some(pinyin) = captures.get(4) {
            tokens.push(Token::text(" - "));
            tokens.extend(pronunciation_tokens(pinyin.as_str()));
        }
        tokens
    }
}

/// Pinyin inside brackets, one token per syllable. Anything that does not parse
/// as pinyin is kept as text.
fn pronunciation_tokens(pronunciation: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut last = 0;
    for whitespace in WHITESPACE.find_iter(pronunciation) {
        tokens.push(syllable_token(&pronunciation[last..whitespace.start()]));
        tokens.push(Token::text(whitespace.as_str()));
        last = whitespace.end();
    }
    tokens.push(syllable_token(&pronunciation[last..]));
    tokens.retain(|token| !matches!(token, Token::Text(text) if text.is_empty()));
    tokens
}

fn syllable_token(syllable: &str) -> Token {
    match Pinyin::parse(syllable) {
        Some(pinyin) => Token::Pinyin(pinyin),
        None => Token::text(syllable),
    }
}
