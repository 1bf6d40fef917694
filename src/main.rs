//! svgforge – command-line SVG template → PDF converter.
//!
//! Usage:
//!   svgforge <input.svg> [output.pdf] [--config FILE] [--title T]
//!            [--image-path DIR] [--font FAMILY=PATH[:STYLE]]... [--greyscale]
//!
//! If `output.pdf` is omitted the PDF is written next to the input file with
//! the same stem (e.g. `invoice.svg` → `invoice.pdf`).

use std::{env, fs, path::PathBuf, process};

use svg_forge::config::PipelineConfig;
use svg_forge::pipeline::SvgPdf;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut input_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut title: Option<String> = None;
    let mut image_path: Option<PathBuf> = None;
    let mut fonts: Vec<(String, PathBuf, String)> = Vec::new();
    let mut greyscale = false;
    let mut positional = 0usize;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--greyscale" | "-g" => greyscale = true,
            "--title" | "-t" => title = Some(flag_value(&mut iter, arg, &args[0])),
            "--config" | "-c" => config_path = Some(PathBuf::from(flag_value(&mut iter, arg, &args[0]))),
            "--image-path" | "-i" => {
                image_path = Some(PathBuf::from(flag_value(&mut iter, arg, &args[0])))
            }
            "--font" | "-f" => {
                let spec = flag_value(&mut iter, arg, &args[0]);
                match parse_font_spec(&spec) {
                    Some(font) => fonts.push(font),
                    None => {
                        eprintln!("Invalid font '{spec}', expected FAMILY=PATH[:STYLE]");
                        process::exit(1);
                    }
                }
            }
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown flag: {other}");
                print_usage(&args[0]);
                process::exit(1);
            }
            path => {
                if positional == 0 {
                    input_path = Some(PathBuf::from(path));
                } else if positional == 1 {
                    output_path = Some(PathBuf::from(path));
                } else {
                    eprintln!("Unexpected argument: {path}");
                    print_usage(&args[0]);
                    process::exit(1);
                }
                positional += 1;
            }
        }
    }

    let input = match input_path {
        Some(p) => p,
        None => {
            eprintln!("Error: no input file specified.");
            print_usage(&args[0]);
            process::exit(1);
        }
    };

    let output = output_path.unwrap_or_else(|| {
        let mut o = input.clone();
        o.set_extension("pdf");
        o
    });

    let svg = match fs::read_to_string(&input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading '{}': {e}", input.display());
            process::exit(1);
        }
    };

    let mut config = match &config_path {
        Some(path) => match PipelineConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error reading config '{}': {e}", path.display());
                process::exit(1);
            }
        },
        None => PipelineConfig {
            // Default title: stem of the input filename.
            title: input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("svg-forge output")
                .to_string(),
            ..PipelineConfig::default()
        },
    };
    if let Some(title) = title {
        config.title = title;
    }
    if let Some(dir) = image_path {
        config = config.with_image_path(dir);
    }
    for (family, path, style) in fonts {
        config = config.with_font(&family, path, &style);
    }
    if greyscale {
        config = config.with_greyscale(true);
    }

    let pdf = match SvgPdf::new(config).render_str(&svg) {
        Ok(pdf) => pdf,
        Err(e) => {
            eprintln!("Error generating PDF: {e}");
            process::exit(1);
        }
    };
    let pages = pdf.page_count();
    let bytes = match pdf.to_bytes() {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error generating PDF: {e}");
            process::exit(1);
        }
    };

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = fs::create_dir_all(parent) {
                eprintln!("Error creating output directory: {e}");
                process::exit(1);
            }
        }
    }
    if let Err(e) = fs::write(&output, &bytes) {
        eprintln!("Error writing '{}': {e}", output.display());
        process::exit(1);
    }
    eprintln!(
        "Wrote '{}' ({} bytes, {} page{})",
        output.display(),
        bytes.len(),
        pages,
        if pages == 1 { "" } else { "s" }
    );
}

fn flag_value<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str, prog: &str) -> String {
    match iter.next() {
        Some(v) => v.clone(),
        None => {
            eprintln!("Missing value for {flag}");
            print_usage(prog);
            process::exit(1);
        }
    }
}

/// `FAMILY=PATH[:STYLE]`, e.g. `DejaVu=/fonts/DejaVuSans-Bold.ttf:B`.
fn parse_font_spec(spec: &str) -> Option<(String, PathBuf, String)> {
    let (family, rest) = spec.split_once('=')?;
    let (path, style) = match rest.rsplit_once(':') {
        Some((path, style)) if !style.contains(['/', '\\']) && !path.is_empty() => (path, style),
        _ => (rest, ""),
    };
    if family.is_empty() || path.is_empty() {
        return None;
    }
    Some((family.to_string(), PathBuf::from(path), style.to_string()))
}

fn print_usage(prog: &str) {
    eprintln!("svgforge – SVG template to PDF converter (svg-forge)");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {prog} <input.svg> [output.pdf] [--config FILE] [--title T]");
    eprintln!("         [--image-path DIR] [--font FAMILY=PATH[:STYLE]]... [--greyscale]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <input.svg>       SVG template; the root element must declare width");
    eprintln!("  [output.pdf]      Output path  (default: same stem as input with .pdf)");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --config, -c      JSON pipeline configuration file");
    eprintln!("  --title, -t       Document title in PDF metadata (default: input filename stem)");
    eprintln!("  --image-path, -i  Directory <image href> values are resolved against");
    eprintln!("  --font, -f        Register a TTF font, style is B, I or BI (repeatable)");
    eprintln!("  --greyscale, -g   Convert all colors to greyscale");
    eprintln!("  --help            Print this message");
}
