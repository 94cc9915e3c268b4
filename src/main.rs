use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use zonemap::Error;
use zonemap::config::EngineConfig;
use zonemap::layout::{LayoutEngine, resolve_positions};
use zonemap::svg::SvgRenderer;
use zonemap::topology::Topology;

#[derive(Parser, Debug)]
#[command(name = "zonemap", version, about = "Lay out and draw zone/conduit network diagrams")]
struct Args {
    /// Topology JSON file or '-' for stdin
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,

    /// Output file. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Engine config JSON file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Run crossing-reduction sweeps
    #[arg(long)]
    optimize: bool,

    /// Keep saved zone positions even if the structure changed since they were saved
    #[arg(long = "use-persisted")]
    use_persisted: bool,

    #[arg(short = 'f', long = "format", value_enum, default_value = "svg")]
    format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum OutputFormat {
    Svg,
    /// Positions keyed by zone id plus the structure key
    Json,
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let config = EngineConfig::load(args.config.as_deref())?;
    let topology = match args.input.as_deref() {
        Some(path) if path != Path::new("-") => Topology::load(path)?,
        _ => Topology::from_json(&read_stdin()?)?,
    };

    let engine = LayoutEngine::new(config);
    let (nodes, edges) = (topology.layout_nodes(), topology.layout_edges());
    let layout = if args.optimize {
        engine.optimize(&nodes, &edges)
    } else {
        engine.compute(&nodes, &edges)
    };

    let use_persisted = args.use_persisted || topology.persisted_positions_current();
    let positions = resolve_positions(&layout.positions, &topology.persisted_positions(), use_persisted);

    let output = match args.format {
        OutputFormat::Svg => SvgRenderer::new(engine.config().clone()).render(&topology, &positions),
        OutputFormat::Json => {
            let dump = serde_json::json!({
                "positions": positions,
                "layoutKey": topology.structure_key(),
            });
            serde_json::to_string_pretty(&dump)? + "\n"
        }
    };

    write_output(&output, args.output.as_deref())
}

fn read_stdin() -> Result<String, Error> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .map_err(|source| Error::Io {
            path: "<stdin>".to_string(),
            source,
        })?;
    Ok(buf)
}

fn write_output(output: &str, path: Option<&Path>) -> Result<(), Error> {
    match path {
        Some(path) => std::fs::write(path, output).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        }),
        None => {
            print!("{}", output);
            Ok(())
        }
    }
}
