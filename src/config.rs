//! Toolkit settings
//!
//! Every option the toolkit understands, with the defaults used when a setting
//! is absent. Settings are usually stored as JSON by the host application:
//!
//! ```json
//! {
//!     "tone_display": "numeric",
//!     "meaning_numbering": "arabicParens",
//!     "meaning_separator": "custom",
//!     "custom_meaning_separator": " | ",
//!     "audio_extensions": [".mp3"]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::meanings::SimpTrad;
use crate::token::ToneDisplay;

const CIRCLED_CHINESE: [&str; 20] = [
    "㊀", "㊁", "㊂", "㊃", "㊄", "㊅", "㊆", "㊇", "㊈", "㊉", "⑪", "⑫", "⑬", "⑭", "⑮", "⑯", "⑰",
    "⑱", "⑲", "⑳",
];

const CIRCLED_ARABIC: [&str; 20] = [
    "①", "②", "③", "④", "⑤", "⑥", "⑦", "⑧", "⑨", "⑩", "⑪", "⑫", "⑬", "⑭", "⑮", "⑯", "⑰",
    "⑱", "⑲", "⑳",
];

/// How multiple meanings are numbered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MeaningNumbering {
    /// ㊀ ㊁ ㊂ … for the first ten, then ⑪ … ⑳
    #[default]
    CircledChinese,
    /// ① ② ③ … ⑳
    CircledArabic,
    /// (1) (2) (3) …
    ArabicParens,
    /// No numbers
    None,
}

impl MeaningNumbering {
    /// The symbols for the first meanings. Meanings past the end of the list are
    /// numbered `(n)`. `None` means numbering is off.
    pub fn symbols(&self) -> Option<&'static [&'static str]> {
        match self {
            MeaningNumbering::CircledChinese => Some(&CIRCLED_CHINESE),
            MeaningNumbering::CircledArabic => Some(&CIRCLED_ARABIC),
            MeaningNumbering::ArabicParens => Some(&[]),
            MeaningNumbering::None => None,
        }
    }
}

/// What goes between meanings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeaningSeparator {
    #[default]
    Lines,
    Commas,
    /// Use `custom_meaning_separator`
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub dict_language: String,

    pub colorized_pinyin_generation: bool,
    pub colorized_character_generation: bool,
    pub meaning_generation: bool,
    pub audio_generation: bool,
    pub detect_measure_words: bool,

    pub tone_display: ToneDisplay,
    pub meaning_numbering: MeaningNumbering,
    pub meaning_separator: MeaningSeparator,
    pub custom_meaning_separator: String,
    pub prefer_simp_trad: SimpTrad,

    /// Descending order of priority
    pub audio_extensions: Vec<String>,

    /// One color per tone, the neutral tone last
    pub tone_colors: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dict_language: "en".to_string(),
            colorized_pinyin_generation: true,
            colorized_character_generation: true,
            meaning_generation: true,
            audio_generation: true,
            detect_measure_words: true,
            tone_display: ToneDisplay::Tonified,
            meaning_numbering: MeaningNumbering::CircledChinese,
            meaning_separator: MeaningSeparator::Lines,
            custom_meaning_separator: " | ".to_string(),
            prefer_simp_trad: SimpTrad::Simp,
            audio_extensions: vec![".ogg".to_string(), ".mp3".to_string(), ".wav".to_string()],
            tone_colors: vec![
                "#ff0000".to_string(), // red
                "#ffaa00".to_string(), // orange
                "#00aa00".to_string(), // green
                "#0000ff".to_string(), // blue
                "#545454".to_string(), // grey
            ],
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from JSON text. Missing settings take their default value;
    /// unknown settings are an error.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Config =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        debug!(?config, "loaded configuration");
        Ok(config)
    }

    /// Load settings from a JSON file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read '{}': {}", path.display(), e)))?;
        Self::from_json_str(&content).map_err(|e| match e {
            ConfigError::Parse(msg) => ConfigError::Parse(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Check the invariants the rest of the toolkit relies on.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.tone_colors.len() != 5 {
            return Err(ConfigError::InvalidValue(format!(
                "tone_colors needs exactly 5 colors, got {}",
                self.tone_colors.len()
            )));
        }
        if self.audio_extensions.is_empty() {
            return Err(ConfigError::InvalidValue(
                "audio_extensions must not be empty".to_string(),
            ));
        }
        if let Some(extension) = self.audio_extensions.iter().find(|e| !e.starts_with('.')) {
            return Err(ConfigError::InvalidValue(format!(
                "audio extension '{}' must start with '.'",
                extension
            )));
        }
        Ok(())
    }

    pub fn should_tonify(&self) -> bool {
        self.tone_display == ToneDisplay::Tonified
    }

    pub fn need_meanings(&self) -> bool {
        self.meaning_generation || self.detect_measure_words
    }

    pub fn meaning_numbering_symbols(&self) -> Option<&'static [&'static str]> {
        self.meaning_numbering.symbols()
    }

    pub fn meaning_separator_string(&self) -> &str {
        match self.meaning_separator {
            MeaningSeparator::Lines => "<br />",
            MeaningSeparator::Commas => ", ",
            MeaningSeparator::Custom => &self.custom_meaning_separator,
        }
    }

    /// Number the meanings (unless there is only one) and join them.
    ///
    /// # Example
    /// ```ignore
    /// let mut config = Config::new();
    /// config.meaning_numbering = MeaningNumbering::ArabicParens;
    /// assert_eq!(config.format_meanings(&["a".into(), "b".into()]), "(1) a<br />(2) b");
    /// ```
    pub fn format_meanings(&self, meanings: &[String]) -> String {
        let separator = self.meaning_separator_string();
        match self.meaning_numbering_symbols() {
            Some(symbols) if meanings.len() > 1 => meanings
                .iter()
                .enumerate()
                .map(|(n, meaning)| {
                    let number = symbols
                        .get(n)
                        .map(|symbol| symbol.to_string())
                        .unwrap_or_else(|| format!("({})", n + 1));
                    format!("{} {}", number, meaning)
                })
                .collect::<Vec<_>>()
                .join(separator),
            _ => meanings.join(separator),
        }
    }

    /// Color for a tone in `1..=5`.
    pub fn tone_color(&self, tone: u8) -> Option<&str> {
        let index = usize::from(tone.checked_sub(1)?);
        self.tone_colors.get(index).map(String::as_str)
    }

    pub fn set_tone_color(&mut self, tone: u8, color: &str) -> ConfigResult<()> {
        let index = tone
            .checked_sub(1)
            .map(usize::from)
            .filter(|index| *index < self.tone_colors.len())
            .ok_or_else(|| ConfigError::InvalidValue(format!("no tone {}", tone)))?;
        self.tone_colors[index] = color.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.dict_language, "en");
        assert!(config.should_tonify());
        assert!(config.validate().is_ok());
        assert_eq!(config.audio_extensions, strings(&[".ogg", ".mp3", ".wav"]));
        assert_eq!(config.tone_color(1), Some("#ff0000"));
        assert_eq!(config.tone_color(5), Some("#545454"));
        assert_eq!(config.tone_color(0), None);
        assert_eq!(config.tone_color(6), None);
    }

    #[test]
    fn test_from_json_keeps_defaults() {
        let config = Config::from_json_str(r#"{ "tone_display": "numeric" }"#).unwrap();
        assert!(!config.should_tonify());
        assert_eq!(config.meaning_numbering, MeaningNumbering::CircledChinese);
        assert_eq!(config.prefer_simp_trad, SimpTrad::Simp);

        let config = Config::from_json_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_from_json_enum_names() {
        let config = Config::from_json_str(
            r#"{
                "meaning_numbering": "arabicParens",
                "meaning_separator": "custom",
                "custom_meaning_separator": " ^_^ ",
                "prefer_simp_trad": "trad"
            }"#,
        )
        .unwrap();
        assert_eq!(config.meaning_numbering, MeaningNumbering::ArabicParens);
        assert_eq!(config.meaning_separator_string(), " ^_^ ");
        assert_eq!(config.prefer_simp_trad, SimpTrad::Trad);
    }

    #[test]
    fn test_unknown_setting_rejected() {
        let result = Config::from_json_str(r#"{ "cheese": "mice" }"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = Config::from_json_str(r##"{ "tone_colors": ["#000000", "#111111"] }"##);
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));

        let result = Config::from_json_str(r#"{ "audio_extensions": [] }"#);
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));

        let result = Config::from_json_str(r#"{ "audio_extensions": ["mp3"] }"#);
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_file(Path::new("/nonexistent/pinyin-toolkit.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_tone_color_setter() {
        let mut config = Config::new();
        config.set_tone_color(1, "hi").unwrap();
        assert_eq!(config.tone_color(1), Some("hi"));
        assert!(config.set_tone_color(0, "x").is_err());
        assert!(config.set_tone_color(6, "x").is_err());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_need_meanings() {
        let mut config = Config::new();
        for (generation, detect, expected) in [
            (true, true, true),
            (true, false, true),
            (false, true, true),
            (false, false, false),
        ] {
            config.meaning_generation = generation;
            config.detect_measure_words = detect;
            assert_eq!(config.need_meanings(), expected);
        }
    }

    #[test]
    fn test_format_meanings_options() {
        let meanings = strings(&["a", "b"]);
        let mut config = Config::new();

        config.meaning_numbering = MeaningNumbering::ArabicParens;
        config.meaning_separator = MeaningSeparator::Lines;
        assert_eq!(config.format_meanings(&meanings), "(1) a<br />(2) b");

        config.meaning_numbering = MeaningNumbering::CircledChinese;
        config.meaning_separator = MeaningSeparator::Commas;
        assert_eq!(config.format_meanings(&meanings), "㊀ a, ㊁ b");

        config.meaning_numbering = MeaningNumbering::CircledArabic;
        config.meaning_separator = MeaningSeparator::Custom;
        config.custom_meaning_separator = " | ".to_string();
        assert_eq!(config.format_meanings(&meanings), "① a | ② b");

        config.meaning_numbering = MeaningNumbering::None;
        config.custom_meaning_separator = " ^_^ ".to_string();
        assert_eq!(config.format_meanings(&meanings), "a ^_^ b");
    }

    #[test]
    fn test_format_single_meaning() {
        let mut config = Config::new();
        config.meaning_numbering = MeaningNumbering::ArabicParens;
        assert_eq!(config.format_meanings(&strings(&["a"])), "a");
        config.meaning_numbering = MeaningNumbering::CircledChinese;
        assert_eq!(config.format_meanings(&strings(&["a"])), "a");
    }

    #[test]
    fn test_format_too_many_meanings() {
        let mut config = Config::new();
        config.meaning_numbering = MeaningNumbering::CircledChinese;
        config.meaning_separator = MeaningSeparator::Commas;
        let meanings: Vec<String> = (1..22).map(|n| n.to_string()).collect();
        assert_eq!(
            config.format_meanings(&meanings),
            "㊀ 1, ㊁ 2, ㊂ 3, ㊃ 4, ㊄ 5, ㊅ 6, ㊆ 7, ㊇ 8, ㊈ 9, ㊉ 10, ⑪ 11, ⑫ 12, ⑬ 13, ⑭ 14, \
             ⑮ 15, ⑯ 16, ⑰ 17, ⑱ 18, ⑲ 19, ⑳ 20, (21) 21"
        );
    }
}
