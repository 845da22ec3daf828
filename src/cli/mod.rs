use std::{path::PathBuf, process::exit};

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::{error, info, Level};
use pngmin::{
    colors::{parse_color, Rgba},
    ColorType, CompressionLevel, PixelGrid, PngConfig, PngError,
};
use thiserror::Error;

mod file_io;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Png(#[from] PngError),

    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub fn run() {
    let options = create_cmd_args().get_matches();
    setup_logger(&options);

    if let Err(err) = execute(&options) {
        error!("{err}");
        exit(1);
    }
}

#[rustfmt::skip]
pub fn create_cmd_args() -> Command {
    Command::new("pngmin")
        .about("Writes and inspects minimal truecolor PNG files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("solid")
            .about("Write a single-color placeholder texture")
            .arg(Arg::new("width")
                .long("width")
                .value_parser(value_parser!(u32))
                .default_value("16")
                .help("Image width in pixels"))
            .arg(Arg::new("height")
                .long("height")
                .value_parser(value_parser!(u32))
                .default_value("16")
                .help("Image height in pixels"))
            .arg(Arg::new("color")
                .long("color")
                .short('c')
                .required(true)
                .value_parser(|value: &str| parse_color(value))
                .help("Formatting code such as §d or &b§l, or #RRGGBB[AA]"))
            .arg(Arg::new("border")
                .long("border")
                .value_parser(|value: &str| parse_color(value))
                .default_value("§0")
                .help("Color of the one pixel outline"))
            .arg(Arg::new("no-border")
                .long("no-border")
                .action(ArgAction::SetTrue)
                .conflicts_with("border")
                .help("Fill the whole image, without an outline"))
            .arg(Arg::new("rgb")
                .long("rgb")
                .action(ArgAction::SetTrue)
                .help("Drop the alpha channel when every color is opaque"))
            .arg(Arg::new("compression")
                .long("compression")
                .value_parser(|value: &str| CompressionLevel::try_from(value))
                .default_value("default")
                .help("none, fast, default or best"))
            .arg(Arg::new("out")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("File to write, parent directories are created")))
        .subcommand(Command::new("inspect")
            .about("Decode a PNG file and print its geometry")
            .arg(Arg::new("file")
                .required(true)
                .value_parser(value_parser!(PathBuf))))
        .arg(Arg::new("debug")
            .long("debug")
            .global(true)
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display debug information and higher"))
        .arg(Arg::new("trace")
            .long("trace")
            .global(true)
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display very verbose information"))
        .arg(Arg::new("info")
            .long("info")
            .global(true)
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display information messages and higher"))
}

fn setup_logger(options: &ArgMatches) {
    let log_level = if options.get_flag("trace") {
        Level::Trace
    } else if options.get_flag("debug") {
        Level::Debug
    } else if options.get_flag("info") {
        Level::Info
    } else {
        Level::Warn
    };

    if let Err(err) = simple_logger::init_with_level(log_level) {
        eprintln!("could not initialize logger: {err}");
    }
}

fn execute(options: &ArgMatches) -> Result<(), CliError> {
    match options.subcommand() {
        Some(("solid", args)) => {
            let (grid, config) = solid_from_args(args);
            let out = args
                .get_one::<PathBuf>("out")
                .expect("out is a required argument");
            let encoded = pngmin::png::encode_png(&grid, &config)?;
            file_io::write_file(out, &encoded)?;

            info!(
                "wrote {}x{} placeholder to {} ({} bytes)",
                grid.width,
                grid.height,
                out.display(),
                encoded.len()
            );
        }
        Some(("inspect", args)) => {
            let file = args
                .get_one::<PathBuf>("file")
                .expect("file is a required argument");
            let bytes = file_io::read_file(file)?;
            let grid = pngmin::decode(&bytes)?;

            println!(
                "{}: {}x{} {:?}, {} bytes of pixel data",
                file.display(),
                grid.width,
                grid.height,
                grid.color_type,
                grid.data.len()
            );
        }
        _ => unreachable!("clap requires a subcommand"),
    }

    Ok(())
}

/// Placeholders are RGBA with a black one pixel outline unless `--rgb` or
/// `--no-border` say otherwise.
fn solid_from_args(args: &ArgMatches) -> (PixelGrid, PngConfig) {
    let width = *args.get_one::<u32>("width").expect("width has a default");
    let height = *args.get_one::<u32>("height").expect("height has a default");
    let fill = *args
        .get_one::<Rgba>("color")
        .expect("color is a required argument");
    let border = if args.get_flag("no-border") {
        fill
    } else {
        *args.get_one::<Rgba>("border").expect("border has a default")
    };
    let compression_level = *args
        .get_one::<CompressionLevel>("compression")
        .expect("compression has a default");

    let opaque = fill.is_opaque() && border.is_opaque();
    let color_type = if args.get_flag("rgb") && opaque {
        ColorType::Truecolor
    } else {
        ColorType::TrueColorAlpha
    };

    (
        PixelGrid::bordered(width, height, color_type, fill, border),
        PngConfig::new().compression_level(compression_level),
    )
}
