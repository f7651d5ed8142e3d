//! Numeric pinyin readings
//!
//! Turns a reading written with tone digits, such as `"ni3hao3 ma5"`, into a
//! [`TokenList`] of words. Whitespace separates words and is kept as text so
//! that flattening the result gives back the input.

use lazy_static::lazy_static;
use regex::Regex;

use crate::token::{Node, Pinyin, Token, TokenList, Word};

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref SYLLABLE: Regex = Regex::new(r"[A-Za-zÜü][a-zü:]*[1-5]").unwrap();
}

/// Parse a numeric pinyin reading into words.
///
/// # Example
///
/// ```ignore
/// let reading = parse_reading("yi1ping2r lao3");
/// assert_eq!(reading.len(), 3); // word, " ", word
/// ```
pub fn parse_reading(input: &str) -> TokenList {
    let mut output = TokenList::new();
    let mut last = 0;
    for whitespace in WHITESPACE.find_iter(input) {
        push_group(&mut output, &input[last..whitespace.start()]);
        output.push(Token::text(whitespace.as_str()));
        last = whitespace.end();
    }
    push_group(&mut output, &input[last..]);
    output
}

fn push_group(output: &mut TokenList, group: &str) {
    if group.is_empty() {
        return;
    }
    let tokens = parse_group(group);
    if tokens.iter().any(Token::is_syllable) {
        output.push(Node::Word(Word::new(tokens)));
    } else {
        output.push(Token::text(group));
    }
}

fn parse_group(group: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut last = 0;
    for syllable in SYLLABLE.find_iter(group) {
        if !starts_syllable(group, syllable.start()) || !has_nucleus(syllable.as_str()) {
            continue;
        }
        if syllable.start() > last {
            tokens.push(gap_token(&tokens, &group[last..syllable.start()]));
        }
        match Pinyin::parse(syllable.as_str()) {
            Some(pinyin) => tokens.push(Token::Pinyin(pinyin)),
            None => tokens.push(Token::text(syllable.as_str())),
        }
        last = syllable.end();
    }
    if last < group.len() {
        tokens.push(gap_token(&tokens, &group[last..]));
    }
    tokens
}

/// A syllable cannot start in the middle of a Latin word (`MP3`, `NI3`).
fn starts_syllable(group: &str, start: usize) -> bool {
    group[..start]
        .chars()
        .next_back()
        .is_none_or(|c| !c.is_alphabetic() && c != ':')
}

/// Every syllable has a vowel, except the nasal interjections `m`, `n`, `ng`,
/// `hm` and `hng`.
fn has_nucleus(syllable: &str) -> bool {
    let spelling = syllable.trim_end_matches(|c: char| c.is_ascii_digit()).to_lowercase();
    spelling.contains(|c: char| "aeiouü".contains(c))
        || matches!(spelling.as_str(), "m" | "n" | "ng" | "hm" | "hng")
}

/// Text between syllables. A lone `r` right after a syllable is the erhua suffix.
fn gap_token(previous: &[Token], gap: &str) -> Token {
    let after_syllable = previous.last().is_some_and(Token::is_syllable);
    if after_syllable && gap.eq_ignore_ascii_case("r") {
        if let Some(erhua) = Pinyin::new(gap, 5) {
            return Token::Pinyin(erhua);
        }
    }
    Token::text(gap)
}
