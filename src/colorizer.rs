use crate::token::{Token, TokenList, TokenVisitor};

/// Wraps every toned leaf in a `<span>` carrying the color of its tone.
///
/// `colors[0]` is the first tone and `colors[4]` the neutral tone. The list must
/// hold exactly five entries; [`crate::Config`] refuses anything else.
#[derive(Debug, Clone)]
pub struct ColorizerVisitor<'a> {
    colors: &'a [String],
}

impl<'a> ColorizerVisitor<'a> {
    pub fn new(colors: &'a [String]) -> Self {
        debug_assert_eq!(colors.len(), 5, "one color per tone is required");
        ColorizerVisitor { colors }
    }

    pub fn apply(&mut self, tokens: &TokenList) -> TokenList {
        tokens.accept(self)
    }

    fn open_tag(&self, tone: u8) -> String {
        format!(
            "<span style=\"color:{}\">",
            self.colors[usize::from(tone - 1)]
        )
    }
}

impl TokenVisitor for ColorizerVisitor<'_> {
    fn visit(&mut self, token: &Token) -> Vec<Token> {
        match token {
            Token::Text(_) => vec![token.clone()],
            Token::Pinyin(pinyin) => vec![
                Token::Text(self.open_tag(pinyin.tone())),
                token.clone(),
                Token::text("</span>"),
            ],
            Token::TonedCharacter(character) => vec![
                Token::Text(self.open_tag(character.tone())),
                token.clone(),
                Token::text("</span>"),
            ],
        }
    }
}
