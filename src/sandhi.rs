//! Tone sandhi
//!
//! Third-tone sandhi is decided per syllable from the shape of the surrounding
//! words: whether the syllable's own word is monosyllabic, whether it is the
//! last syllable of that word, and whether the neighbouring words are
//! monosyllabic. The words are walked left to right carrying the
//! "previous word was monosyllabic" flag.
//!
//! The lexical changes of 一 and 不 are a separate pass on character leaves.

use tracing::trace;

use crate::token::{Node, Token, TokenList, Word};

const YI: char = '一';
const BU: char = '不';

#[derive(Debug, Clone, Copy)]
struct Syllable {
    tone: u8,
    character: Option<char>,
}

/// A syllable-bearing word as seen by the sandhi rules.
#[derive(Debug)]
struct Unit {
    syllables: Vec<Syllable>,
    text: String,
}

impl Unit {
    fn from_word(word: &Word) -> Self {
        Unit {
            syllables: word.iter().filter_map(syllable).collect(),
            text: word.flatten(),
        }
    }

    fn is_monosyllabic(&self) -> bool {
        self.syllables.len() == 1
    }
}

fn syllable(token: &Token) -> Option<Syllable> {
    let tone = token.tone()?;
    let character = match token {
        Token::TonedCharacter(character) => Some(character.character()),
        _ => None,
    };
    Some(Syllable { tone, character })
}

/// Rewrites tones according to Mandarin tone sandhi.
#[derive(Debug, Clone)]
pub struct ToneSandhiVisitor {
    lexical_rules: bool,
}

impl Default for ToneSandhiVisitor {
    fn default() -> Self {
        Self {
            lexical_rules: true,
        }
    }
}

impl ToneSandhiVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the 一/不 tone changes (enabled by default).
    pub fn with_lexical_rules(mut self, enabled: bool) -> Self {
        self.lexical_rules = enabled;
        self
    }

    /// Apply sandhi to a reading, returning the rewritten copy.
    ///
    /// Bare syllable tokens count as monosyllabic words. Whitespace between words
    /// is ignored; any other text (punctuation, Latin words) ends the sandhi
    /// context, as does the end of the list.
    pub fn apply(&self, tokens: &TokenList) -> TokenList {
        let mut tones: Vec<u8> = Vec::new();
        for group in context_groups(tokens) {
            let mut group_tones = third_tone_sandhi(&group);
            if self.lexical_rules {
                lexical_sandhi(&group, &mut group_tones);
            }
            tones.extend(group_tones);
        }

        let mut tones = tones.into_iter();
        tokens.map(|token| {
            if !token.is_syllable() {
                return token.clone();
            }
            match tones.next() {
                Some(tone) if Some(tone) != token.tone() => {
                    trace!(token = %token, tone, "tone sandhi");
                    token.retone(tone)
                }
                _ => token.clone(),
            }
        })
    }
}

/// Split a reading into runs of words that share sandhi context.
fn context_groups(tokens: &TokenList) -> Vec<Vec<Unit>> {
    let mut groups = Vec::new();
    let mut current: Vec<Unit> = Vec::new();
    for node in tokens {
        let unit = match node {
            Node::Word(word) if word.syllable_count() > 0 => Some(Unit::from_word(word)),
            Node::Word(_) => None,
            Node::Token(token) => syllable(token).map(|syllable| Unit {
                syllables: vec![syllable],
                text: token.to_string(),
            }),
        };

        match unit {
            Some(unit) => current.push(unit),
            None => {
                let text = match node {
                    Node::Word(word) => word.flatten(),
                    Node::Token(token) => token.to_string(),
                };
                if breaks_context(&text) {
                    groups.push(std::mem::take(&mut current));
                }
            }
        }
    }
    groups.push(current);
    groups.retain(|group| !group.is_empty());
    groups
}

fn breaks_context(text: &str) -> bool {
    !text.trim().is_empty()
}

fn third_tone_sandhi(units: &[Unit]) -> Vec<u8> {
    let mut tones = Vec::new();
    let mut previous_monosyllabic = false;
    for (i, unit) in units.iter().enumerate() {
        let next_monosyllabic = units.get(i + 1).map(Unit::is_monosyllabic);
        let monosyllabic = unit.is_monosyllabic();
        let count = unit.syllables.len();

        for (j, syllable) in unit.syllables.iter().enumerate() {
            let last = j + 1 == count;
            let loses_third_tone = syllable.tone == 3
                && loses_third_tone(
                    monosyllabic,
                    last,
                    previous_monosyllabic,
                    next_monosyllabic,
                );
            tones.push(if loses_third_tone { 2 } else { syllable.tone });
        }

        previous_monosyllabic = monosyllabic;
    }
    tones
}

/// `next_monosyllabic` is `None` at the end of a context: with no following
/// word, neither "next is monosyllabic" nor "next is not" holds.
fn loses_third_tone(
    monosyllabic: bool,
    last_in_word: bool,
    previous_monosyllabic: bool,
    next_monosyllabic: Option<bool>,
) -> bool {
    (monosyllabic && next_monosyllabic == Some(true))
        || (!monosyllabic && !last_in_word && previous_monosyllabic)
        || (!monosyllabic && next_monosyllabic == Some(true))
        || (!monosyllabic && !last_in_word && next_monosyllabic == Some(false))
}

/// 不 becomes tone 2 before a fourth tone. 一 becomes tone 2 before a fourth or
/// neutral tone and tone 4 before the others. Both keep their base tone when
/// they stand alone between two copies of the same word (看一看, 好不好).
fn lexical_sandhi(units: &[Unit], tones: &mut [u8]) {
    let mut index = 0;
    for (i, unit) in units.iter().enumerate() {
        for syllable in &unit.syllables {
            let position = index;
            index += 1;

            let base_tone = match syllable.character {
                Some(YI) if syllable.tone == 1 => 1,
                Some(BU) if syllable.tone == 4 => 4,
                _ => continue,
            };

            let reduplicated = unit.is_monosyllabic()
                && i > 0
                && units
                    .get(i + 1)
                    .is_some_and(|next| next.text == units[i - 1].text);
            if reduplicated {
                continue;
            }

            let Some(&next_tone) = tones.get(position + 1) else {
                continue;
            };
            tones[position] = match (base_tone, next_tone) {
                (4, 4) => 2,
                (1, 4) | (1, 5) => 2,
                (1, _) => 4,
                _ => base_tone,
            };
        }
    }
}
