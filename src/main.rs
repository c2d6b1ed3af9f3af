// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::io::Write;
use std::process;

use pico_args::Arguments;

const HELP: &str = "\
svgpdf compiles an SVG into a PDF content stream.

USAGE:
  svgpdf [OPTIONS] <in-svg> [out-file]     # compile, stdout by default
  svgpdf --subset-font <in-ttf> --text TEXT [out-file]

OPTIONS:
  -h, --help            Prints help information
  -V, --version         Prints version information

  --resources           Also prints the resource dictionaries
  --subset-font PATH    Subsets a TrueType font instead of compiling
  --text TEXT           Characters to keep during font subsetting

  --quiet               Disables warnings

ARGS:
  <in-svg>              Input file
  [out-file]            Output file, stdout when absent
";

#[derive(Debug)]
struct Args {
    resources: bool,
    subset_font: Option<String>,
    text: Option<String>,
    quiet: bool,
    input: Option<String>,
    output: Option<String>,
}

fn collect_args() -> Result<Args, pico_args::Error> {
    let mut input = Arguments::from_env();

    if input.contains(["-h", "--help"]) {
        print!("{}", HELP);
        process::exit(0);
    }

    if input.contains(["-V", "--version"]) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        process::exit(0);
    }

    Ok(Args {
        resources: input.contains("--resources"),
        subset_font: input.opt_value_from_str("--subset-font")?,
        text: input.opt_value_from_str("--text")?,
        quiet: input.contains("--quiet"),
        input: input.opt_free_from_str()?,
        output: input.opt_free_from_str()?,
    })
}

fn main() {
    let args = match collect_args() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {}.", e);
            process::exit(1);
        }
    };

    if !args.quiet {
        if let Ok(()) = log::set_logger(&LOGGER) {
            log::set_max_level(log::LevelFilter::Warn);
        }
    }

    if let Err(e) = process(args) {
        eprintln!("Error: {}.", e);
        process::exit(1);
    }
}

fn process(args: Args) -> Result<(), String> {
    if let Some(ref font_path) = args.subset_font {
        return subset_font(font_path, &args);
    }

    let input = args
        .input
        .as_deref()
        .ok_or_else(|| "an input file must be set".to_string())?;

    let data = std::fs::read(input).map_err(|e| e.to_string())?;
    let doc = svgscene::Document::from_data(&data).map_err(|e| e.to_string())?;
    let output = svgpdf::compile(&doc);

    let mut out = Vec::new();
    out.extend_from_slice(&output.content);

    if args.resources {
        for (name, dict) in &output.shadings {
            out.extend_from_slice(format!("% Shading {}: {}\n", name, dict).as_bytes());
        }
        for (name, dict) in &output.graphics_states {
            out.extend_from_slice(format!("% ExtGState {}: {}\n", name, dict).as_bytes());
        }
        for (name, pattern) in &output.patterns {
            out.extend_from_slice(
                format!("% Pattern {} via {}: {}\n", name, pattern.xobject, pattern.dict).as_bytes(),
            );
        }
        for name in &output.fonts {
            out.extend_from_slice(format!("% Font /{}\n", name).as_bytes());
        }
    }

    write_output(args.output.as_deref(), &out)
}

fn subset_font(font_path: &str, args: &Args) -> Result<(), String> {
    let text = args
        .text
        .as_deref()
        .ok_or_else(|| "--text must be set together with --subset-font".to_string())?;

    let data = std::fs::read(font_path).map_err(|e| e.to_string())?;
    let font = fontsub::Font::parse(&data).map_err(|e| e.to_string())?;

    let chars: std::collections::BTreeSet<char> = text.chars().collect();
    let subset = font.subset(&chars).map_err(|e| e.to_string())?;

    write_output(args.output.as_deref(), &subset.to_bytes())
}

fn write_output(path: Option<&str>, data: &[u8]) -> Result<(), String> {
    match path {
        Some(path) => std::fs::write(path, data).map_err(|e| e.to_string()),
        None => std::io::stdout().write_all(data).map_err(|e| e.to_string()),
    }
}

static LOGGER: SimpleLogger = SimpleLogger;
struct SimpleLogger;
impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::LevelFilter::Warn
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let target = if !record.target().is_empty() {
                record.target()
            } else {
                record.module_path().unwrap_or_default()
            };

            let line = record.line().unwrap_or(0);

            match record.level() {
                log::Level::Error => eprintln!("Error (in {}:{}): {}", target, line, record.args()),
                log::Level::Warn => eprintln!("Warning (in {}:{}): {}", target, line, record.args()),
                log::Level::Info => eprintln!("Info (in {}:{}): {}", target, line, record.args()),
                log::Level::Debug => eprintln!("Debug (in {}:{}): {}", target, line, record.args()),
                log::Level::Trace => eprintln!("Trace (in {}:{}): {}", target, line, record.args()),
            }
        }
    }

    fn flush(&self) {}
}
