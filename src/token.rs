use std::fmt;

/// Characters that mark an erhua (r-suffix) syllable in character readings.
const ERHUA_CHARACTERS: [char; 2] = ['儿', '兒'];

/// The spelling used for the umlaut-u inside a pinyin syllable (e.g. `nu:3`).
pub const UMLAUT_DIGRAPH: &str = "u:";

/// How pinyin syllables are rendered when a tree is turned back into text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneDisplay {
    /// Tone digits after the syllable: `hao3`
    Numeric,
    /// Tone diacritics on the vowel: `hǎo`
    #[default]
    Tonified,
}

fn valid_tone(tone: u8) -> bool {
    (1..=5).contains(&tone)
}

/// A romanized syllable with its tone (1-4, 5 for the neutral tone).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pinyin {
    word: String,
    tone: u8,
}

impl Pinyin {
    /// Create a syllable from its spelling and tone.
    ///
    /// Returns `None` when the tone is outside `1..=5` or the spelling is empty.
    pub fn new(word: impl Into<String>, tone: u8) -> Option<Self> {
        let word = word.into();
        if word.is_empty() || !valid_tone(tone) {
            return None;
        }
        Some(Pinyin { word, tone })
    }

    /// Parse a numeric pinyin syllable such as `hao3`, `nu:3`, `nü3` or `ma`.
    ///
    /// A syllable without a tone digit carries the neutral tone. `ü` is normalized
    /// to the `u:` digraph so every later stage only has to deal with one spelling.
    ///
    /// # Example
    /// ```ignore
    /// let p = Pinyin::parse("lu:4").unwrap();
    /// assert_eq!(p.tone(), 4);
    /// assert!(p.has_umlaut());
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (spelling, tone) = match text.chars().last() {
            Some(c) if c.is_ascii_digit() => {
                let tone = c.to_digit(10)? as u8;
                (&text[..text.len() - 1], tone)
            }
            Some(_) => (text, 5),
            None => return None,
        };

        if !spelling
            .chars()
            .all(|c| c.is_ascii_alphabetic() || matches!(c, 'ü' | 'Ü' | ':'))
        {
            return None;
        }

        let word = spelling.replace('ü', UMLAUT_DIGRAPH).replace('Ü', "U:");
        Pinyin::new(word, tone)
    }

    /// The spelling without tone, case preserved.
    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn tone(&self) -> u8 {
        self.tone
    }

    pub(crate) fn retone(&self, tone: u8) -> Self {
        debug_assert!(valid_tone(tone), "tone {} out of range", tone);
        Pinyin {
            word: self.word.clone(),
            tone,
        }
    }

    pub fn is_erhua(&self) -> bool {
        self.word.eq_ignore_ascii_case("r")
    }

    pub fn has_umlaut(&self) -> bool {
        self.word.to_lowercase().contains(UMLAUT_DIGRAPH)
    }

    /// Render with a tone digit. The neutral tone digit is dropped when
    /// `hide_neutral_tone` is set (`ma` instead of `ma5`).
    pub fn numeric(&self, hide_neutral_tone: bool) -> String {
        if self.tone == 5 && hide_neutral_tone {
            self.word.clone()
        } else {
            format!("{}{}", self.word, self.tone)
        }
    }

    /// Render with a tone diacritic: `hao3` becomes `hǎo`, `lu:4` becomes `lǜ`.
    ///
    /// The mark goes on `a` or `e` when present, on the `o` of `ou`, and on the
    /// last vowel otherwise. Syllables without a vowel (`m2`, `ng2`) keep the
    /// numeric spelling.
    pub fn tonified(&self) -> String {
        let chars: Vec<char> = self
            .word
            .replace(UMLAUT_DIGRAPH, "ü")
            .replace("U:", "Ü")
            .chars()
            .collect();
        if self.tone == 5 {
            return chars.into_iter().collect();
        }

        let lower: Vec<char> = chars
            .iter()
            .map(|c| c.to_lowercase().next().unwrap_or(*c))
            .collect();
        let target = lower
            .iter()
            .position(|c| *c == 'a' || *c == 'e')
            .or_else(|| {
                lower
                    .windows(2)
                    .position(|pair| pair[0] == 'o' && pair[1] == 'u')
            })
            .or_else(|| lower.iter().rposition(|c| "aeiouü".contains(*c)));

        let Some(target) = target else {
            return self.numeric(false);
        };

        chars
            .iter()
            .enumerate()
            .map(|(i, c)| {
                if i == target {
                    mark_vowel(*c, self.tone)
                } else {
                    *c
                }
            })
            .collect()
    }
}

fn mark_vowel(vowel: char, tone: u8) -> char {
    let marks: [char; 4] = match vowel {
        'a' => ['ā', 'á', 'ǎ', 'à'],
        'e' => ['ē', 'é', 'ě', 'è'],
        'i' => ['ī', 'í', 'ǐ', 'ì'],
        'o' => ['ō', 'ó', 'ǒ', 'ò'],
        'u' => ['ū', 'ú', 'ǔ', 'ù'],
        'ü' => ['ǖ', 'ǘ', 'ǚ', 'ǜ'],
        'A' => ['Ā', 'Á', 'Ǎ', 'À'],
        'E' => ['Ē', 'É', 'Ě', 'È'],
        'I' => ['Ī', 'Í', 'Ǐ', 'Ì'],
        'O' => ['Ō', 'Ó', 'Ǒ', 'Ò'],
        'U' => ['Ū', 'Ú', 'Ǔ', 'Ù'],
        'Ü' => ['Ǖ', 'Ǘ', 'Ǚ', 'Ǜ'],
        _ => return vowel,
    };
    marks[usize::from(tone - 1)]
}

impl fmt::Display for Pinyin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.numeric(true))
    }
}

/// A single Chinese character with the tone of its reading.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TonedCharacter {
    character: char,
    tone: u8,
}

impl TonedCharacter {
    pub fn new(character: char, tone: u8) -> Option<Self> {
        if !valid_tone(tone) {
            return None;
        }
        Some(TonedCharacter { character, tone })
    }

    pub fn character(&self) -> char {
        self.character
    }

    pub fn tone(&self) -> u8 {
        self.tone
    }

    pub(crate) fn retone(&self, tone: u8) -> Self {
        debug_assert!(valid_tone(tone), "tone {} out of range", tone);
        TonedCharacter {
            character: self.character,
            tone,
        }
    }

    pub fn is_erhua(&self) -> bool {
        ERHUA_CHARACTERS.contains(&self.character)
    }
}

impl fmt::Display for TonedCharacter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.character)
    }
}

/// A leaf of a reading tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Text(String),
    Pinyin(Pinyin),
    TonedCharacter(TonedCharacter),
}

impl Token {
    pub fn text(text: impl Into<String>) -> Self {
        Token::Text(text.into())
    }

    /// The tone of a syllable leaf, `None` for plain text.
    pub fn tone(&self) -> Option<u8> {
        match self {
            Token::Text(_) => None,
            Token::Pinyin(pinyin) => Some(pinyin.tone()),
            Token::TonedCharacter(character) => Some(character.tone()),
        }
    }

    /// True for leaves that carry a tone (pinyin syllables and toned characters).
    pub fn is_syllable(&self) -> bool {
        self.tone().is_some()
    }

    pub fn is_erhua(&self) -> bool {
        match self {
            Token::Text(_) => false,
            Token::Pinyin(pinyin) => pinyin.is_erhua(),
            Token::TonedCharacter(character) => character.is_erhua(),
        }
    }

    /// Same leaf with another tone. Plain text is returned unchanged.
    pub(crate) fn retone(&self, tone: u8) -> Token {
        match self {
            Token::Text(_) => self.clone(),
            Token::Pinyin(pinyin) => Token::Pinyin(pinyin.retone(tone)),
            Token::TonedCharacter(character) => Token::TonedCharacter(character.retone(tone)),
        }
    }

    pub fn render(&self, display: ToneDisplay) -> String {
        match (self, display) {
            (Token::Pinyin(pinyin), ToneDisplay::Tonified) => pinyin.tonified(),
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Text(text) => write!(f, "{}", text),
            Token::Pinyin(pinyin) => write!(f, "{}", pinyin),
            Token::TonedCharacter(character) => write!(f, "{}", character),
        }
    }
}

impl From<Pinyin> for Token {
    fn from(pinyin: Pinyin) -> Self {
        Token::Pinyin(pinyin)
    }
}

impl From<TonedCharacter> for Token {
    fn from(character: TonedCharacter) -> Self {
        Token::TonedCharacter(character)
    }
}

impl From<&str> for Token {
    fn from(text: &str) -> Self {
        Token::Text(text.to_string())
    }
}

/// A transformation defined once per leaf kind.
///
/// Each visit returns the tokens that replace the visited leaf: one token for a
/// plain rewrite, none to delete it, several to wrap or expand it. Composite
/// nodes are rebuilt by [`TokenList::accept`] and [`Word::accept`].
pub trait TokenVisitor {
    fn visit(&mut self, token: &Token) -> Vec<Token>;
}

/// One pronunciation unit, usually one written word.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Word(pub Vec<Token>);

impl Word {
    pub fn new(tokens: Vec<Token>) -> Self {
        Word(tokens)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.0.iter()
    }

    pub fn syllable_count(&self) -> usize {
        self.0.iter().filter(|token| token.is_syllable()).count()
    }

    pub fn is_monosyllabic(&self) -> bool {
        self.syllable_count() == 1
    }

    pub fn map<F>(&self, mut f: F) -> Word
    where
        F: FnMut(&Token) -> Token,
    {
        Word(self.0.iter().map(&mut f).collect())
    }

    pub fn concat_map<F>(&self, mut f: F) -> Word
    where
        F: FnMut(&Token) -> Vec<Token>,
    {
        Word(self.0.iter().flat_map(&mut f).collect())
    }

    pub fn accept<V: TokenVisitor + ?Sized>(&self, visitor: &mut V) -> Word {
        self.concat_map(|token| visitor.visit(token))
    }

    pub fn flatten(&self) -> String {
        self.0.iter().map(|token| token.to_string()).collect()
    }

    pub fn render(&self, display: ToneDisplay) -> String {
        self.0.iter().map(|token| token.render(display)).collect()
    }
}

impl<'a> IntoIterator for &'a Word {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Token> for Word {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Word(iter.into_iter().collect())
    }
}

/// An element of a [`TokenList`]: either a bare leaf or a whole word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Token(Token),
    Word(Word),
}

impl From<Token> for Node {
    fn from(token: Token) -> Self {
        Node::Token(token)
    }
}

impl From<Word> for Node {
    fn from(word: Word) -> Self {
        Node::Word(word)
    }
}

/// An ordered reading: the unit handed from one transformation to the next.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenList(pub Vec<Node>);

impl TokenList {
    pub fn new() -> Self {
        TokenList(Vec::new())
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.0.push(node.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.0.iter()
    }

    /// Every leaf of the tree in reading order.
    pub fn leaves(&self) -> impl Iterator<Item = &Token> {
        self.0.iter().flat_map(|node| match node {
            Node::Token(token) => std::slice::from_ref(token).iter(),
            Node::Word(word) => word.iter(),
        })
    }

    /// The leaves that carry a tone, in reading order.
    pub fn syllables(&self) -> impl Iterator<Item = &Token> {
        self.leaves().filter(|token| token.is_syllable())
    }

    /// Rebuild the tree replacing each leaf by exactly one token.
    pub fn map<F>(&self, mut f: F) -> TokenList
    where
        F: FnMut(&Token) -> Token,
    {
        self.0
            .iter()
            .map(|node| match node {
                Node::Token(token) => Node::Token(f(token)),
                Node::Word(word) => Node::Word(word.map(&mut f)),
            })
            .collect()
    }

    /// Rebuild the tree replacing each leaf by zero or more tokens.
    ///
    /// Words whose leaves are all removed are dropped from the list, so a word
    /// is never left empty.
    pub fn concat_map<F>(&self, mut f: F) -> TokenList
    where
        F: FnMut(&Token) -> Vec<Token>,
    {
        let mut output = TokenList::new();
        for node in &self.0 {
            match node {
                Node::Token(token) => output.extend(f(token).into_iter().map(Node::Token)),
                Node::Word(word) => {
                    let word = word.concat_map(&mut f);
                    if !word.is_empty() {
                        output.push(word);
                    }
                }
            }
        }
        output
    }

    pub fn accept<V: TokenVisitor + ?Sized>(&self, visitor: &mut V) -> TokenList {
        self.concat_map(|token| visitor.visit(token))
    }

    /// The literal concatenation of every leaf.
    pub fn flatten(&self) -> String {
        self.leaves().map(|token| token.to_string()).collect()
    }

    /// Like [`TokenList::flatten`], rendering pinyin with the given tone display.
    pub fn render(&self, display: ToneDisplay) -> String {
        self.leaves().map(|token| token.render(display)).collect()
    }
}

impl fmt::Display for TokenList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.flatten())
    }
}

impl FromIterator<Node> for TokenList {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        TokenList(iter.into_iter().collect())
    }
}

impl Extend<Node> for TokenList {
    fn extend<I: IntoIterator<Item = Node>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

impl From<Vec<Node>> for TokenList {
    fn from(nodes: Vec<Node>) -> Self {
        TokenList(nodes)
    }
}

impl IntoIterator for TokenList {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
