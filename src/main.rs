// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#![allow(clippy::uninlined_format_args)]

use std::path::{Path, PathBuf};

use svglayer::{AspectPolicy, Color, Document, Error, Extraction, Options, WriteOptions};

/// Exit code for a wrong layer selection or bad usage.
const EXIT_SELECTION: i32 = 1;
/// Exit code for parsing, IO and size resolution failures.
const EXIT_FAILURE: i32 = 2;

fn main() {
    if let Err(code) = process() {
        std::process::exit(code);
    }
}

fn timed<F, T>(perf: bool, name: &str, mut f: F) -> T
where
    F: FnMut() -> T,
{
    let now = std::time::Instant::now();
    let result = f();
    if perf {
        let elapsed = now.elapsed().as_micros() as f64 / 1000.0;
        println!("{}: {:.2}ms", name, elapsed);
    }

    result
}

fn exit_code(e: &Error) -> i32 {
    if e.is_selection_error() {
        EXIT_SELECTION
    } else {
        EXIT_FAILURE
    }
}

fn process() -> Result<(), i32> {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            println!("{}", HELP);
            eprintln!("Error: {}.", e);
            return Err(EXIT_SELECTION);
        }
    };

    if !args.quiet {
        if let Ok(()) = log::set_logger(&LOGGER) {
            log::set_max_level(log::LevelFilter::Warn);
        }
    }

    let fail = |e: Error| {
        eprintln!("Error: {}.", e);
        exit_code(&e)
    };

    let svg_string = timed(args.perf, "Reading", || svglayer::read_file(&args.input)).map_err(fail)?;
    let doc = timed(args.perf, "Parsing", || Document::parse(&svg_string)).map_err(fail)?;

    if args.list_layers {
        list_layers(&args.input, &doc);
        return Ok(());
    }

    let layers = match doc.select_layers(&args.layers) {
        Ok(layers) => layers,
        Err(e) => {
            let code = fail(e);
            list_layers(&args.input, &doc);
            return Err(code);
        }
    };

    let extraction = timed(args.perf, "Extraction", || svglayer::extract(&layers));
    for diagnostic in &extraction.diagnostics {
        log::warn!("{}", diagnostic);
    }

    if extraction.is_empty() {
        log::warn!("Selected layers have no path or rect elements.");
    }

    // Each output is independent. Report all failures, exit with the worst one.
    let mut result = Ok(());
    for output in &args.outputs {
        let format = args.format.unwrap_or_else(|| Format::from_path(output));
        let res = match format {
            Format::Raster => write_raster(&args, &doc, &extraction, output),
            Format::Vector => write_vector(&args, &doc, &extraction, output),
        };

        if let Err(e) = res {
            let code = fail(e);
            result = match result {
                Err(prev) if prev >= code => Err(prev),
                _ => Err(code),
            };
        }
    }

    result
}

fn list_layers(path: &Path, doc: &Document) {
    let names = doc.layer_names();
    if names.is_empty() {
        println!("No layers in {}.", path.display());
        return;
    }

    println!("Layers in {}:", path.display());
    for (i, name) in names.iter().enumerate() {
        println!("  {}. {}", i + 1, name);
    }
}

fn write_raster(
    args: &CliArgs,
    doc: &Document,
    extraction: &Extraction,
    output: &Path,
) -> Result<(), Error> {
    let target = doc.render_target(&args.options)?;
    let pixmap = timed(args.perf, "Rendering", || {
        svglayer::render(&extraction.shapes(), &target, args.options.background)
    })?;

    timed(args.perf, "Saving", || svglayer::save_png(&pixmap, output))
}

fn write_vector(
    args: &CliArgs,
    doc: &Document,
    extraction: &Extraction,
    output: &Path,
) -> Result<(), Error> {
    let svg = timed(args.perf, "Exporting", || {
        svglayer::export(&extraction.layers, doc, &args.write)
    });

    timed(args.perf, "Saving", || {
        std::fs::write(output, &svg).map_err(|e| Error::Io(output.to_path_buf(), e))
    })
}

const HELP: &str = "\
svglayer extracts Inkscape layers from an SVG file.

USAGE:
  svglayer [OPTIONS] <in-svg>

  svglayer --list-layers drawing.svg
  svglayer -l Background -l Outline -o out.png drawing.svg
  svglayer -l Outline -o out.png -o out.svg --dpi 300 drawing.svg

OPTIONS:
      --help                    Prints this help
  -V, --version                 Prints version

      --list-layers             Lists all layers and exits
  -l, --layer NAME              Selects a layer by its label or ID.
                                This option can be set multiple times
  -o, --output PATH             Sets an output file.
                                This option can be set multiple times
  -f, --format FORMAT           Sets the output format for all outputs
                                [default: by the output file extension]
                                [possible values: raster, vector, png, svg]

      --dpi DPI                 Sets the resolution of raster output.
                                Used only when the document has a physical size
                                [possible values: 10..4000 (inclusive), fractions allowed]
      --fit                     Fits the canvas into the physical size
                                when their aspect ratios differ
      --background COLOR        Sets the background color of raster output
                                [default: transparent]
                                Examples: white, #fff, #fff000

      --absolute-paths          Writes path data in the absolute form
                                during vector output

      --perf                    Prints performance stats
      --quiet                   Disables warnings

ARGS:
  <in-svg>                      Input file
";

#[derive(Clone, Copy, PartialEq, Debug)]
enum Format {
    Raster,
    Vector,
}

impl Format {
    fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("svg") => Format::Vector,
            _ => Format::Raster,
        }
    }
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raster" | "png" => Ok(Format::Raster),
            "vector" | "svg" => Ok(Format::Vector),
            _ => Err(format!("unknown format '{}'", s)),
        }
    }
}

#[derive(Debug)]
struct CliArgs {
    list_layers: bool,
    layers: Vec<String>,
    outputs: Vec<PathBuf>,
    format: Option<Format>,
    options: Options,
    write: WriteOptions,
    perf: bool,
    quiet: bool,
    input: PathBuf,
}

fn collect_args() -> Result<CliArgs, pico_args::Error> {
    let mut input = pico_args::Arguments::from_env();

    if input.contains("--help") {
        print!("{}", HELP);
        std::process::exit(0);
    }

    if input.contains(["-V", "--version"]) {
        println!("{}", env!("CARGO_PKG_VERSION"));
        std::process::exit(0);
    }

    let dpi = input.opt_value_from_fn("--dpi", parse_dpi)?;
    let aspect = if input.contains("--fit") {
        AspectPolicy::Fit
    } else {
        AspectPolicy::default()
    };
    let background: Option<svgtypes::Color> = input.opt_value_from_str("--background")?;

    Ok(CliArgs {
        list_layers: input.contains("--list-layers"),
        layers: input.values_from_str(["-l", "--layer"])?,
        outputs: input.values_from_str(["-o", "--output"])?,
        format: input.opt_value_from_str(["-f", "--format"])?,
        options: Options {
            dpi,
            aspect,
            background: background.map(Color::from),
        },
        write: WriteOptions {
            absolute_paths: input.contains("--absolute-paths"),
            ..WriteOptions::default()
        },
        perf: input.contains("--perf"),
        quiet: input.contains("--quiet"),
        input: input.free_from_str()?,
    })
}

fn parse_args() -> Result<CliArgs, String> {
    let args = collect_args().map_err(|e| e.to_string())?;

    if !args.list_layers {
        if args.layers.is_empty() {
            return Err("no layers selected. Use --layer or --list-layers".to_string());
        }

        if args.outputs.is_empty() {
            return Err("no output files set. Use --output".to_string());
        }
    }

    Ok(args)
}

fn parse_dpi(s: &str) -> Result<f64, String> {
    let n: f64 = s.parse().map_err(|_| "invalid number")?;

    if (10.0..=4000.0).contains(&n) {
        Ok(n)
    } else {
        Err("DPI out of bounds".to_string())
    }
}

/// A simple stderr logger.
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
            let args = record.args();

            match record.level() {
                log::Level::Error => eprintln!("Error (in {}:{}): {}", target, line, args),
                log::Level::Warn => eprintln!("Warning (in {}:{}): {}", target, line, args),
                log::Level::Info => eprintln!("Info (in {}:{}): {}", target, line, args),
                log::Level::Debug => eprintln!("Debug (in {}:{}): {}", target, line, args),
                log::Level::Trace => eprintln!("Trace (in {}:{}): {}", target, line, args),
            }
        }
    }

    fn flush(&self) {}
}
