//! Audio readings
//!
//! Resolves the syllables of a reading to sound files. A [`MediaPack`] is one
//! installed voice; [`PinyinAudioReadingsVisitor`] resolves a reading against a
//! single pack, and [`PinyinAudioReadings`] tries every pack and keeps the one
//! that misses the fewest syllables.
//!
//! # Example
//!
//! ```ignore
//! use pinyin_toolkit::audio::{MemoryMediaPack, PinyinAudioReadings};
//! use rand::SeedableRng;
//!
//! let packs = vec![MemoryMediaPack::new("default", ["ni3.ogg", "hao3.ogg"])];
//! let extensions = vec![".ogg".to_string(), ".mp3".to_string()];
//! let reading = parse_reading("ni3hao3");
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let audio = PinyinAudioReadings::new(&packs, &extensions).audio_reading(&reading, &mut rng);
//! assert_eq!(audio.sound_tags(), "[sound:ni3.ogg][sound:hao3.ogg]");
//! ```

use std::collections::HashMap;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use crate::erhua::TrimErhuaVisitor;
use crate::token::{Pinyin, Token, TokenList, TokenVisitor, UMLAUT_DIGRAPH};

/// A collection of sound files for one voice.
///
/// Implementations answer lookups synchronously and must not change between
/// calls: the same query always returns the same answer.
pub trait MediaPack {
    /// Display name, used for diagnostics.
    fn name(&self) -> &str;

    /// True if the pack holds no files at all.
    fn is_empty(&self) -> bool;

    /// Find the file for `basename`, trying `extensions` in priority order.
    ///
    /// The basename is matched case-insensitively. Returns the file name as
    /// stored in the pack.
    fn media_for(&self, basename: &str, extensions: &[String]) -> Option<String>;
}

/// A media pack held in memory, keyed by lowercased file name.
#[derive(Debug, Clone, Default)]
pub struct MemoryMediaPack {
    name: String,
    files: HashMap<String, String>,
}

impl MemoryMediaPack {
    pub fn new<I, S>(name: &str, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let files = files
            .into_iter()
            .map(|file| {
                let file: String = file.into();
                (file.to_lowercase(), file)
            })
            .collect();
        MemoryMediaPack {
            name: name.to_string(),
            files,
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }
}

impl MediaPack for MemoryMediaPack {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn media_for(&self, basename: &str, extensions: &[String]) -> Option<String> {
        let basename = basename.to_lowercase();
        extensions.iter().find_map(|extension| {
            self.files
                .get(&format!("{}{}", basename, extension.to_lowercase()))
                .cloned()
        })
    }
}

/// Candidate file basenames for a syllable, most specific first.
///
/// `de5` gives `de5`, `de`, `de4`: packs often lack neutral tone recordings, and
/// the fourth tone is the usual stand-in. Spellings with `u:` are retried with
/// the common `v` file naming (`nu:3` → `nv3`).
pub fn candidate_basenames(pinyin: &Pinyin) -> Vec<String> {
    let mut candidates = vec![pinyin.numeric(false)];
    if pinyin.tone() == 5 {
        candidates.push(pinyin.word().to_string());
        candidates.push(format!("{}4", pinyin.word()));
    }

    if pinyin.has_umlaut() {
        let substituted: Vec<String> = candidates
            .iter()
            .map(|candidate| {
                candidate
                    .replace(UMLAUT_DIGRAPH, "v")
                    .replace("U:", "V")
            })
            .collect();
        candidates.extend(substituted);
    }
    candidates
}

/// Resolves the pinyin leaves of a reading against one media pack.
///
/// Leaves pass through unchanged; the visitor records the resolved files and
/// counts the syllables it could not find. Character and text leaves are not
/// voiced.
pub struct PinyinAudioReadingsVisitor<'a, P: MediaPack + ?Sized> {
    pack: &'a P,
    extensions: &'a [String],
    media: Vec<String>,
    missing: usize,
}

impl<'a, P: MediaPack + ?Sized> PinyinAudioReadingsVisitor<'a, P> {
    pub fn new(pack: &'a P, extensions: &'a [String]) -> Self {
        PinyinAudioReadingsVisitor {
            pack,
            extensions,
            media: Vec::new(),
            missing: 0,
        }
    }

    /// Files found so far, in reading order.
    pub fn media(&self) -> &[String] {
        &self.media
    }

    /// Number of syllables without a matching file.
    pub fn missing(&self) -> usize {
        self.missing
    }

    pub fn into_media(self) -> Vec<String> {
        self.media
    }

    /// Resolve every leaf of `tokens` without rebuilding the tree.
    pub fn collect(&mut self, tokens: &TokenList) {
        for token in tokens.leaves() {
            self.record(token);
        }
    }

    fn record(&mut self, token: &Token) {
        let Token::Pinyin(pinyin) = token else {
            return;
        };
        match self.resolve(pinyin) {
            Some(file) => self.media.push(file),
            None => {
                debug!(pack = self.pack.name(), syllable = %pinyin.numeric(false), "no audio");
                self.missing += 1;
            }
        }
    }

    fn resolve(&self, pinyin: &Pinyin) -> Option<String> {
        candidate_basenames(pinyin)
            .iter()
            .find_map(|candidate| self.pack.media_for(candidate, self.extensions))
    }
}

impl<P: MediaPack + ?Sized> TokenVisitor for PinyinAudioReadingsVisitor<'_, P> {
    fn visit(&mut self, token: &Token) -> Vec<Token> {
        self.record(token);
        vec![token.clone()]
    }
}

/// The outcome of resolving a reading against the available packs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioReading {
    /// Name of the pack the files come from, `None` if no pack was usable.
    pub pack: Option<String>,
    /// Resolved files in reading order.
    pub media: Vec<String>,
    /// True if some syllable had no file in the chosen pack.
    pub incomplete: bool,
}

impl AudioReading {
    fn unavailable() -> Self {
        AudioReading {
            pack: None,
            media: Vec::new(),
            incomplete: true,
        }
    }

    /// `[sound:a.mp3][sound:b.mp3]`, the form understood by the flashcard renderer.
    pub fn sound_tags(&self) -> String {
        self.media
            .iter()
            .map(|file| format!("[sound:{}]", file))
            .collect()
    }
}

/// Picks the best media pack for a reading.
pub struct PinyinAudioReadings<'a, P: MediaPack> {
    packs: &'a [P],
    extensions: &'a [String],
}

impl<'a, P: MediaPack> PinyinAudioReadings<'a, P> {
    pub fn new(packs: &'a [P], extensions: &'a [String]) -> Self {
        PinyinAudioReadings { packs, extensions }
    }

    /// Resolve `tokens` against every non-empty pack and keep the one with the
    /// fewest missing syllables. Ties are broken uniformly at random with `rng`.
    ///
    /// Erhua suffixes are trimmed first since they have no recording of their own.
    pub fn audio_reading<R: Rng + ?Sized>(&self, tokens: &TokenList, rng: &mut R) -> AudioReading {
        let tokens = TrimErhuaVisitor::apply(tokens);

        let mut results: Vec<(&P, Vec<String>, usize)> = Vec::new();
        for pack in self.packs.iter().filter(|pack| !pack.is_empty()) {
            let mut visitor = PinyinAudioReadingsVisitor::new(pack, self.extensions);
            visitor.collect(&tokens);
            let missing = visitor.missing();
            debug!(pack = pack.name(), missing, "evaluated media pack");
            results.push((pack, visitor.into_media(), missing));
        }

        let Some(fewest_missing) = results.iter().map(|(_, _, missing)| *missing).min() else {
            warn!("no usable media pack, audio reading skipped");
            return AudioReading::unavailable();
        };

        let best: Vec<&(&P, Vec<String>, usize)> = results
            .iter()
            .filter(|(_, _, missing)| *missing == fewest_missing)
            .collect();
        let Some((pack, media, missing)) = best.choose(rng).copied() else {
            return AudioReading::unavailable();
        };

        debug!(
            pack = pack.name(),
            tied = best.len(),
            "selected media pack"
        );
        AudioReading {
            pack: Some(pack.name().to_string()),
            media: media.clone(),
            incomplete: *missing > 0,
        }
    }
}
