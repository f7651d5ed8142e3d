//! End-to-end tests for the annotation pipelines
//!
//! Each test builds an [`Annotator`](crate::Annotator) from settings the way the
//! command line tool does and checks the finished output: colorized readings,
//! colorized characters, sound tags and formatted meanings.

#[cfg(test)]
mod tests {
    use crate::token::tests::character_word;
    use crate::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn span(color: &str, text: &str) -> String {
        format!("<span style=\"color:{}\">{}</span>", color, text)
    }

    const RED: &str = "#ff0000";
    const ORANGE: &str = "#ffaa00";
    const GREEN: &str = "#00aa00";
    const BLUE: &str = "#0000ff";

    fn characters(words: Vec<Word>) -> TokenList {
        words.into_iter().map(Node::Word).collect()
    }

    // ============================================================================
    // Settings loaded from JSON drive every pipeline
    // ============================================================================

    #[test]
    fn test_e2e_card_from_json_settings() {
        let config = Config::from_json_str(
            r#"{
                "tone_display": "numeric",
                "meaning_numbering": "circledArabic",
                "meaning_separator": "commas",
                "audio_extensions": [".mp3"]
            }"#,
        )
        .unwrap();
        let annotator = Annotator::new(config).unwrap();
        let reading = parse_reading("ni3 hao3");

        assert_eq!(
            annotator.colorized_reading(&reading).unwrap(),
            format!("{} {}", span(ORANGE, "ni2"), span(GREEN, "hao3"))
        );

        let packs = vec![
            MemoryMediaPack::new("complete", ["ni3.mp3", "hao3.mp3", "hao3.ogg"]),
            MemoryMediaPack::new("partial", ["ni3.mp3"]),
        ];
        let mut rng = StdRng::seed_from_u64(3);
        let audio = annotator.audio_reading(&reading, &packs, &mut rng).unwrap();
        assert_eq!(audio.pack.as_deref(), Some("complete"));
        assert_eq!(audio.sound_tags(), "[sound:ni3.mp3][sound:hao3.mp3]");
        assert!(!audio.incomplete);

        let formatted = annotator
            .format_definition("/hello/how are you/", 1)
            .unwrap();
        assert_eq!(formatted.meanings, "① hello, ② how are you");
        assert_eq!(formatted.measure_words, "");
    }

    // ============================================================================
    // Readings: sandhi, erhua and tone display together
    // ============================================================================

    #[test]
    fn test_e2e_chain_of_third_tones() {
        let mut config = Config::new();
        config.tone_display = ToneDisplay::Numeric;
        let annotator = Annotator::new(config).unwrap();
        assert_eq!(
            annotator
                .colorized_reading(&parse_reading("wo3 hen3 hao3"))
                .unwrap(),
            format!(
                "{} {} {}",
                span(ORANGE, "wo2"),
                span(ORANGE, "hen2"),
                span(GREEN, "hao3")
            )
        );
    }

    #[test]
    fn test_e2e_tonified_erhua_reading() {
        let annotator = Annotator::new(Config::new()).unwrap();
        assert_eq!(
            annotator
                .colorized_reading(&parse_reading("yi1 hua4r"))
                .unwrap(),
            format!("{} {}", span(RED, "yī"), span(BLUE, "huà"))
        );
    }

    #[test]
    fn test_e2e_reading_with_plain_text() {
        let mut config = Config::new();
        config.tone_display = ToneDisplay::Numeric;
        let annotator = Annotator::new(config).unwrap();
        assert_eq!(
            annotator.colorized_reading(&parse_reading("ma1 ?")).unwrap(),
            format!("{} ?", span(RED, "ma1"))
        );
    }

    #[test]
    fn test_e2e_third_tone_before_other_tone() {
        let mut config = Config::new();
        config.tone_display = ToneDisplay::Numeric;
        let annotator = Annotator::new(config).unwrap();
        assert_eq!(
            annotator
                .colorized_reading(&parse_reading("lao3 you3shi2"))
                .unwrap(),
            format!(
                "{} {}{}",
                span(GREEN, "lao3"),
                span(ORANGE, "you2"),
                span(ORANGE, "shi2")
            )
        );
    }

    #[test]
    fn test_e2e_units_and_chinese_pronunciations_stay_text() {
        let mut config = Config::new();
        config.tone_display = ToneDisplay::Numeric;
        let annotator = Annotator::new(config).unwrap();
        assert_eq!(
            annotator.colorized_reading(&parse_reading("MP3 ma1")).unwrap(),
            format!("MP3 {}", span(RED, "ma1"))
        );
        let formatted = annotator.format_definition("/see 个[个]/", 1).unwrap();
        assert_eq!(formatted.meanings, "see 个 - 个");
    }

    // ============================================================================
    // Characters: the 一 and 不 tone changes
    // ============================================================================

    #[test]
    fn test_e2e_yi_before_fourth_tone() {
        let annotator = Annotator::new(Config::new()).unwrap();
        let tokens = characters(vec![character_word(&[('一', 1), ('个', 4)])]);
        assert_eq!(
            annotator.colorized_characters(&tokens).unwrap(),
            format!("{}{}", span(ORANGE, "一"), span(BLUE, "个"))
        );
    }

    #[test]
    fn test_e2e_bu_before_fourth_tone() {
        let annotator = Annotator::new(Config::new()).unwrap();
        let tokens = characters(vec![character_word(&[('不', 4), ('是', 4)])]);
        assert_eq!(
            annotator.colorized_characters(&tokens).unwrap(),
            format!("{}{}", span(ORANGE, "不"), span(BLUE, "是"))
        );
    }

    #[test]
    fn test_e2e_reduplication_keeps_yi() {
        let annotator = Annotator::new(Config::new()).unwrap();
        let tokens = characters(vec![
            character_word(&[('看', 4)]),
            character_word(&[('一', 1)]),
            character_word(&[('看', 4)]),
        ]);
        assert_eq!(
            annotator.colorized_characters(&tokens).unwrap(),
            format!("{}{}{}", span(BLUE, "看"), span(RED, "一"), span(BLUE, "看"))
        );
    }

    // ============================================================================
    // Audio
    // ============================================================================

    #[test]
    fn test_e2e_umlaut_audio() {
        let annotator = Annotator::new(Config::new()).unwrap();
        let packs = vec![MemoryMediaPack::new("default", ["lv4.mp3"])];
        let mut rng = StdRng::seed_from_u64(0);
        let audio = annotator
            .audio_reading(&parse_reading("lu:4"), &packs, &mut rng)
            .unwrap();
        assert_eq!(audio.sound_tags(), "[sound:lv4.mp3]");
    }

    #[test]
    fn test_e2e_audio_choice_is_reproducible() {
        let annotator = Annotator::new(Config::new()).unwrap();
        let packs = vec![
            MemoryMediaPack::new("first", ["ni3.ogg"]),
            MemoryMediaPack::new("second", ["ni3.ogg"]),
            MemoryMediaPack::new("third", ["ni3.ogg"]),
        ];
        let reading = parse_reading("ni3");

        let pick = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            annotator
                .audio_reading(&reading, &packs, &mut rng)
                .and_then(|audio| audio.pack)
        };
        assert_eq!(pick(42), pick(42));
        assert!(pick(42).is_some());
    }

    #[test]
    fn test_e2e_audio_without_packs() {
        let annotator = Annotator::new(Config::new()).unwrap();
        let packs: Vec<MemoryMediaPack> = Vec::new();
        let mut rng = StdRng::seed_from_u64(0);
        let audio = annotator
            .audio_reading(&parse_reading("ni3"), &packs, &mut rng)
            .unwrap();
        assert_eq!(audio.pack, None);
        assert_eq!(audio.sound_tags(), "");
        assert!(audio.incomplete);
    }

    // ============================================================================
    // Meanings
    // ============================================================================

    #[test]
    fn test_e2e_meanings_custom_separator() {
        let mut config = Config::new();
        config.meaning_numbering = MeaningNumbering::ArabicParens;
        config.meaning_separator = MeaningSeparator::Custom;
        config.custom_meaning_separator = " | ".to_string();
        let annotator = Annotator::new(config).unwrap();

        let formatted = annotator
            .format_definition(
                "/book/letter/CL:本[ben3],冊|册[ce4]/",
                1,
            )
            .unwrap();
        assert_eq!(formatted.meanings, "(1) book | (2) letter");
        assert_eq!(formatted.measure_words, "本 - běn, 册 - cè");
    }

    #[test]
    fn test_e2e_measure_words_only() {
        let mut config = Config::new();
        config.meaning_generation = false;
        let annotator = Annotator::new(config).unwrap();

        let formatted = annotator
            .format_definition("/morning/CL:個|个[ge4]/", 1)
            .unwrap();
        assert_eq!(formatted.meanings, "");
        assert_eq!(formatted.measure_words, "个 - gè");
    }
}
