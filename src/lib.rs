pub mod audio;
pub mod colorizer;
pub mod config;
pub mod erhua;
pub mod error;
pub mod meanings;
pub mod reading;
pub mod sandhi;
pub mod token;

#[cfg(test)]
mod integration_tests;

use rand::Rng;

// Re-export the reading model and transformations for convenient access
pub use audio::{AudioReading, MediaPack, MemoryMediaPack, PinyinAudioReadings, PinyinAudioReadingsVisitor};
pub use colorizer::ColorizerVisitor;
pub use config::{Config, MeaningNumbering, MeaningSeparator};
pub use erhua::TrimErhuaVisitor;
pub use error::{ConfigError, ConfigResult};
pub use meanings::{MeaningFormatter, ParsedDefinition, SimpTrad};
pub use reading::parse_reading;
pub use sandhi::ToneSandhiVisitor;
pub use token::{Node, Pinyin, ToneDisplay, TonedCharacter, Token, TokenList, TokenVisitor, Word};

/// Meanings and measure words of one definition, ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedDefinition {
    pub meanings: String,
    pub measure_words: String,
}

/// Turns dictionary readings and definitions into study material, following
/// the user's settings.
pub struct Annotator {
    config: Config,
}

impl Annotator {
    pub fn new(config: Config) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Annotator { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Tone sandhi, erhua trimming and colorization, in that order.
    fn colorize(&self, tokens: &TokenList) -> TokenList {
        let tokens = ToneSandhiVisitor::new().apply(tokens);
        let tokens = TrimErhuaVisitor::apply(&tokens);
        ColorizerVisitor::new(&self.config.tone_colors).apply(&tokens)
    }

    /// Colorized pinyin for a reading, rendered with the configured tone display.
    ///
    /// Returns `None` when colorized pinyin generation is switched off.
    pub fn colorized_reading(&self, reading: &TokenList) -> Option<String> {
        if !self.config.colorized_pinyin_generation {
            return None;
        }
        Some(self.colorize(reading).render(self.config.tone_display))
    }

    /// Colorized characters for a reading made of toned characters.
    pub fn colorized_characters(&self, characters: &TokenList) -> Option<String> {
        if !self.config.colorized_character_generation {
            return None;
        }
        Some(self.colorize(characters).flatten())
    }

    /// Sound files for a reading, using the configured extension priority.
    pub fn audio_reading<P, R>(&self, reading: &TokenList, packs: &[P], rng: &mut R) -> Option<AudioReading>
    where
        P: MediaPack,
        R: Rng + ?Sized,
    {
        if !self.config.audio_generation {
            return None;
        }
        Some(PinyinAudioReadings::new(packs, &self.config.audio_extensions).audio_reading(reading, rng))
    }

    /// Split, number and join a raw definition.
    ///
    /// When measure word detection is off, measure word clauses stay among the
    /// meanings. Returns `None` when neither meanings nor measure words are wanted.
    pub fn format_definition(&self, raw_definition: &str, simplified_char_index: usize) -> Option<FormattedDefinition> {
        if !self.config.need_meanings() {
            return None;
        }

        let parsed = MeaningFormatter::new(simplified_char_index, self.config.prefer_simp_trad)
            .parse_definition(raw_definition);
        let render = |clause: &TokenList| clause.render(self.config.tone_display);

        let mut meanings: Vec<String> = parsed.meanings.iter().map(render).collect();
        let measure_words: Vec<String> = parsed.measure_words.iter().map(render).collect();

        let measure_words = if self.config.detect_measure_words {
            measure_words.join(", ")
        } else {
            meanings.extend(measure_words.iter().map(|mw| format!("MW: {}", mw)));
            String::new()
        };

        let meanings = if self.config.meaning_generation {
            self.config.format_meanings(&meanings)
        } else {
            String::new()
        };

        Some(FormattedDefinition {
            meanings,
            measure_words,
        })
    }
}
