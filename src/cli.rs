use crate::config::load_config;
use crate::diagram::Diagram;
use crate::parser::parse_family;
use crate::render::{render_svg, write_output_svg};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "ftree", version, about = "Family tree diagram renderer in Rust")]
pub struct Args {
    /// Input family file (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme and layout constants)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Person to center the diagram on (overrides the file's current person)
    #[arg(short = 'p', long = "person")]
    pub person: Option<String>,

    /// Display-year filter; people born after it render dimmed
    #[arg(short = 'y', long = "year")]
    pub year: Option<i32>,

    /// Zoom factor applied to the whole diagram
    #[arg(short = 's', long = "scale", default_value_t = 1.0)]
    pub scale: f32,

    /// Write the computed layout as JSON next to the normal output
    #[arg(long = "layout-json")]
    pub layout_json: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    let input = read_input(args.input.as_deref())?;
    let mut graph = parse_family(&input)?;
    if let Some(person) = &args.person {
        if graph.person(person).is_none() {
            return Err(anyhow::anyhow!("person {person:?} not found in family"));
        }
        graph.set_current(Some(person));
    }
    if graph.current().is_none() {
        return Err(anyhow::anyhow!(
            "no current person: set \"current\" in the family file or pass --person"
        ));
    }

    let mut diagram = Diagram::new(config.theme.clone(), config.layout.clone());
    diagram.rebuild(&graph);
    if let Some(year) = args.year {
        diagram.set_display_year(year);
    }
    diagram.set_scale(args.scale);

    if let Some(path) = &args.layout_json {
        crate::layout_dump::write_layout_dump(path, &diagram)?;
    }

    let svg = render_svg(&diagram, &config.render);
    match args.output_format {
        OutputFormat::Svg => {
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output)?;
            write_png(&svg, &output, &config)?;
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &crate::config::Config) -> Result<()> {
    crate::render::write_output_png(svg, output, &config.render)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &crate::config::Config) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires the 'png' feature; rebuild with --features png"
    ))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>) -> Result<PathBuf> {
    output
        .clone()
        .ok_or_else(|| anyhow::anyhow!("Output path required for png output"))
}
