use std::path::Path;

use clap::{Arg, ArgAction, ArgMatches, Command};
use pinyin_toolkit::{Annotator, Config, MemoryMediaPack, parse_reading};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("pinyin-toolkit")
        .version("0.1.0")
        .about("Annotate Mandarin readings and dictionary definitions")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("JSON settings file (default settings if omitted)"),
        )
        .subcommand(
            Command::new("color")
                .about("Colorize a pinyin reading, applying tone sandhi")
                .arg(
                    Arg::new("reading")
                        .help("Numbered pinyin, e.g. \"ni3 hao3\"")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("audio")
                .about("Pick sound files for a pinyin reading")
                .arg(
                    Arg::new("reading")
                        .help("Numbered pinyin, e.g. \"ni3 hao3\"")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("pack")
                        .long("pack")
                        .short('p')
                        .help("Media pack as NAME=file1,file2 (repeatable)")
                        .action(ArgAction::Append)
                        .value_parser(parse_pack),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help("Seed for choosing between equally good packs")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
        .subcommand(
            Command::new("meanings")
                .about("Format a raw dictionary definition")
                .arg(
                    Arg::new("definition")
                        .help("Definition such as \"/morning/CL:個|个[ge4]/\"")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("simplified-index")
                        .long("simplified-index")
                        .help("Side of trad|simp pairs holding the simplified form")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("1"),
                ),
        )
        .get_matches();

    let config = match matches.get_one::<String>("config") {
        Some(path) => Config::from_file(Path::new(path))?,
        None => Config::new(),
    };
    let annotator = Annotator::new(config)?;

    match matches.subcommand() {
        Some(("color", sub)) => color(&annotator, sub),
        Some(("audio", sub)) => audio(&annotator, sub),
        Some(("meanings", sub)) => meanings(&annotator, sub),
        _ => Err("Unknown command".into()),
    }
}

fn color(annotator: &Annotator, matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let reading = parse_reading(required(matches, "reading")?);
    match annotator.colorized_reading(&reading) {
        Some(colorized) => println!("{}", colorized),
        None => info!("colorized pinyin generation is disabled"),
    }
    Ok(())
}

fn audio(annotator: &Annotator, matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let reading = parse_reading(required(matches, "reading")?);
    let packs: Vec<MemoryMediaPack> = matches
        .get_many::<MemoryMediaPack>("pack")
        .map(|packs| packs.cloned().collect())
        .unwrap_or_default();

    let mut rng = match matches.get_one::<u64>("seed") {
        Some(seed) => StdRng::seed_from_u64(*seed),
        None => StdRng::from_entropy(),
    };

    let Some(audio) = annotator.audio_reading(&reading, &packs, &mut rng) else {
        info!("audio generation is disabled");
        return Ok(());
    };
    if let Some(pack) = &audio.pack {
        info!(pack = pack.as_str(), incomplete = audio.incomplete, "audio reading");
    }
    println!("{}", audio.sound_tags());
    if audio.incomplete {
        eprintln!("Some syllables have no sound file");
    }
    Ok(())
}

fn meanings(annotator: &Annotator, matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let definition = required(matches, "definition")?;
    let index = matches
        .get_one::<usize>("simplified-index")
        .copied()
        .unwrap_or(1);

    let Some(formatted) = annotator.format_definition(definition, index) else {
        info!("meaning generation is disabled");
        return Ok(());
    };
    if !formatted.meanings.is_empty() {
        println!("{}", formatted.meanings);
    }
    if !formatted.measure_words.is_empty() {
        println!("MW: {}", formatted.measure_words);
    }
    Ok(())
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str, Box<dyn std::error::Error>> {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| format!("Missing argument: {}", name).into())
}

/// `NAME=file1,file2` into an in-memory media pack.
fn parse_pack(value: &str) -> Result<MemoryMediaPack, String> {
    let (name, files) = value
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=file1,file2, got \"{}\"", value))?;
    if name.trim().is_empty() {
        return Err("media pack name is empty".to_string());
    }
    let files = files
        .split(',')
        .map(str::trim)
        .filter(|file| !file.is_empty());
    Ok(MemoryMediaPack::new(name.trim(), files))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinyin_toolkit::MediaPack;

    #[test]
    fn test_parse_pack() {
        let pack = parse_pack("default=ni3.ogg, hao3.mp3").unwrap();
        assert_eq!(pack.name(), "default");
        assert_eq!(pack.len(), 2);
        assert_eq!(
            pack.media_for("hao3", &[".mp3".to_string()]).as_deref(),
            Some("hao3.mp3")
        );
    }

    #[test]
    fn test_parse_pack_empty_files() {
        let pack = parse_pack("silent=").unwrap();
        assert!(pack.is_empty());
    }

    #[test]
    fn test_parse_pack_invalid() {
        assert!(parse_pack("ni3.ogg").is_err());
        assert!(parse_pack("=ni3.ogg").is_err());
    }
}
