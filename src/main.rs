//! text-annotator CLI
//!
//! Usage:
//!   text-annotator [OPTIONS] [FILE]
//!
//! Lays out a text file, applies labels and paths from an annotation file,
//! and writes the rendered SVG to stdout or a file.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;

use text_annotator::{render_svg, LabelSpec, LayoutOptions, LinkSpec, Theme};

#[derive(Parser)]
#[command(name = "text-annotator")]
#[command(about = "Entity and relation annotation over flowed text")]
struct Cli {
    /// Input text file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Annotation file with [[labels]] and [[paths]] tables (TOML)
    #[arg(short, long)]
    annotations: Option<PathBuf>,

    /// Theme file for label/mark/path colors (TOML)
    #[arg(short, long)]
    theme: Option<PathBuf>,

    /// Container width in pixels
    #[arg(short, long)]
    width: Option<f64>,

    /// Output file (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// One `[[labels]]` table in the annotation file.
#[derive(Deserialize)]
struct LabelEntry {
    start: usize,
    end: usize,
    text: String,
    /// Identity payload; paths reference labels by this value
    ex: Option<String>,
}

/// One `[[paths]]` table in the annotation file.
#[derive(Deserialize)]
struct PathEntry {
    from: String,
    to: String,
    text: String,
    ex: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct AnnotationFile {
    labels: Vec<LabelEntry>,
    paths: Vec<PathEntry>,
}

fn main() {
    let cli = Cli::parse();

    if cli.input.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    let theme = match &cli.theme {
        Some(path) => match Theme::from_file(path) {
            Ok(theme) => theme,
            Err(e) => {
                eprintln!("Error loading theme '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Theme::default(),
    };

    let text = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let annotations = match &cli.annotations {
        Some(path) => {
            let content = match fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) => {
                    eprintln!("Error reading annotations '{}': {}", path.display(), e);
                    std::process::exit(1);
                }
            };
            match toml::from_str::<AnnotationFile>(&content) {
                Ok(parsed) => parsed,
                Err(e) => {
                    eprintln!("Error parsing annotations '{}': {}", path.display(), e);
                    std::process::exit(1);
                }
            }
        }
        None => AnnotationFile::default(),
    };

    let mut options = LayoutOptions::default();
    if let Some(width) = cli.width {
        options = options.with_width(width);
    }

    let labels = annotations
        .labels
        .into_iter()
        .map(|entry| {
            let mut spec = LabelSpec::new(entry.start, entry.end, entry.text)
                .with_style(theme.label.clone());
            spec.ex_data = entry.ex;
            spec
        })
        .collect();
    let links = annotations
        .paths
        .into_iter()
        .map(|entry| {
            let mut link = LinkSpec::new(entry.from, entry.to, entry.text);
            link.style = theme.path.clone();
            link.ex_data = entry.ex;
            link
        })
        .collect();

    match render_svg(&text, labels, links, options, theme) {
        Ok(svg) => match &cli.output {
            Some(path) => {
                if let Err(e) = fs::write(path, svg) {
                    eprintln!("Error writing '{}': {}", path.display(), e);
                    std::process::exit(1);
                }
            }
            None => println!("{}", svg),
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_intro() {
    println!(
        r#"text-annotator - entity and relation annotation over flowed text

USAGE:
    text-annotator [OPTIONS] [FILE]
    echo 'some text' | text-annotator -a annotations.toml

OPTIONS:
    -a, --annotations  Annotation file (TOML)
    -t, --theme        Theme file (TOML)
    -w, --width        Container width in pixels
    -o, --output       Output SVG file (default: stdout)
    -h, --help         Print help

ANNOTATION FILE:
    [[labels]]
    start = 0
    end = 4
    text = "PER"
    ex = "subject"

    [[paths]]
    from = "subject"
    to = "object"
    text = "works-for"

Labels cover inclusive character ranges; paths reference labels by
their 'ex' identity value."#
    );
}
