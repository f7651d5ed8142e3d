use crate::token::{Token, TokenList, TokenVisitor};

/// Removes erhua leaves (`r5`, 儿, 兒) already merged into the previous syllable.
///
/// The suffix is neither voiced nor colored on its own, so this runs before
/// audio resolution and colorization.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrimErhuaVisitor;

impl TrimErhuaVisitor {
    pub fn apply(tokens: &TokenList) -> TokenList {
        tokens.accept(&mut TrimErhuaVisitor)
    }
}

impl TokenVisitor for TrimErhuaVisitor {
    fn visit(&mut self, token: &Token) -> Vec<Token> {
        match token {
            Token::Text(_) => vec![token.clone()],
            Token::Pinyin(pinyin) if pinyin.is_erhua() => Vec::new(),
            Token::TonedCharacter(character) if character.is_erhua() => Vec::new(),
            Token::Pinyin(_) | Token::TonedCharacter(_) => vec![token.clone()],
        }
    }
}
