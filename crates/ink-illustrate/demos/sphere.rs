//! InkEngine sphere demo
//!
//! Illustrates a synthetic, lit sphere with every generator enabled and
//! writes the result as SVG.
//!
//! # Usage
//!
//! ```bash
//! # Write sphere.svg in the current directory
//! cargo run --example sphere
//!
//! # Custom output, settings, and a JSON dump of the document
//! RUST_LOG=debug cargo run --example sphere -- out.svg --settings settings.json --json out.json
//! ```

use std::path::PathBuf;
use std::process;

use ink_core::Settings;
use ink_illustrate::synthetic::SphereScene;
use ink_illustrate::Illustrator;

fn print_usage() {
    eprintln!(
        r#"InkEngine sphere demo

USAGE:
    sphere [output.svg] [--settings <settings.json>] [--json <document.json>] [--size <px>]

OPTIONS:
    --settings      Load settings from a JSON file (missing fields use defaults)
    --json          Also write the document as JSON
    --size          Image size in pixels (default 256)
    --help          Show this help message"#
    );
}

struct Args {
    output: PathBuf,
    settings: Option<PathBuf>,
    json: Option<PathBuf>,
    size: usize,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        output: PathBuf::from("sphere.svg"),
        settings: None,
        json: None,
        size: 256,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            "--settings" => args.settings = Some(iter.next().ok_or("--settings needs a path")?.into()),
            "--json" => args.json = Some(iter.next().ok_or("--json needs a path")?.into()),
            "--size" => {
                let value = iter.next().ok_or("--size needs a value")?;
                args.size = value.parse().map_err(|_| format!("invalid size: {value}"))?;
            }
            other if other.starts_with("--") => return Err(format!("unknown option: {other}")),
            other => args.output = PathBuf::from(other),
        }
    }
    Ok(args)
}

fn run(args: &Args) -> ink_core::Result<()> {
    let settings = match &args.settings {
        Some(path) => Settings::from_json_file(path)?,
        None => Settings {
            cull_factor: 6,
            optimise_factor: 1.0,
            curve_sampling_interval: 8.0,
            streamline_segments: 12,
            uv_primary_trim_size: 0.01,
            enable_internal_edges: true,
            enable_streamlines: true,
            enable_stipples: true,
            optimise_clip_paths: true,
            ..Settings::default()
        },
    };

    let scene = SphereScene {
        with_shadow: true,
        ..SphereScene::new(args.size, args.size as f64 * 0.42)
    };
    let surface = scene.surface()?;
    let document = Illustrator::from_settings(&settings).illustrate(&surface, &settings)?;

    for layer in &document.layers {
        println!("{:>15}: {} stroke(s)", layer.class.name(), layer.len());
    }
    document.export_svg(&args.output)?;
    println!("Wrote {}", args.output.display());

    if let Some(json) = &args.json {
        document.export_json(json)?;
        println!("Wrote {}", json.display());
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("Error: {message}");
            print_usage();
            process::exit(2);
        }
    };
    if let Err(err) = run(&args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}
