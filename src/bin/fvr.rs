use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{bail, eyre, WrapErr};
use console::style;
use fvr_codecs::archive::{PakArchive, PakWriter};
use fvr_codecs::image::{FrameGeometry, Rgb565Image};
use fvr_codecs::Decoded;
use tracing::{info, warn};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod progress;

#[derive(Parser, Debug)]
#[command(name = "fvr", version, about = "Unpack PAKF archives and block transform images", long_about = None)]
struct Cli {
    /// Print debug output of the codecs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the entry table of an archive
    List {
        archive: PathBuf,
    },
    /// Extract every supported entry of one or more archives
    Unpack {
        #[arg(required = true)]
        archives: Vec<PathBuf>,
        /// Directory the entries are written to
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,
        /// Fail on the first damaged entry instead of writing what could be recovered
        #[arg(long)]
        strict: bool,
    },
    /// Build an archive, every file is stored with compression level 3
    Pack {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Decode an image payload
    Image(ImageArgs),
}

#[derive(Args, Debug)]
struct ImageArgs {
    input: PathBuf,
    /// Byte offset of the payload inside the input file
    #[arg(long, default_value_t = 0)]
    offset: usize,
    #[arg(long, value_enum, conflicts_with_all = ["width", "height"])]
    preset: Option<Preset>,
    #[arg(long, requires = "height")]
    width: Option<usize>,
    #[arg(long, requires = "width")]
    height: Option<usize>,
    /// Quality the image was encoded with
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=100))]
    quality: u32,
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,
    #[arg(long, value_enum, default_value_t = Format::Ppm)]
    format: Format,
    /// Fail if any stream of the payload is damaged
    #[arg(long)]
    strict: bool,
    /// Write the six cube faces of a panorama strip instead of the strip itself
    #[arg(long)]
    faces: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Preset {
    /// 640x480 still picture
    Picture,
    /// 256x6144 panorama strip
    Panorama,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    /// Little-endian RGB565 words
    Raw,
    /// Binary PPM with 8 bits per channel
    Ppm,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let indicatif_layer = IndicatifLayer::new();
    tracing_subscriber::registry()
        .with(level)
        .with(tracing_subscriber::fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(indicatif_layer)
        .init();

    match cli.command {
        Commands::List { archive } => list(&archive),
        Commands::Unpack {
            archives,
            output,
            strict,
        } => {
            for archive in &archives {
                unpack(archive, &output, strict)?;
            }
            Ok(())
        }
        Commands::Pack { files, output } => pack(&files, &output),
        Commands::Image(args) => image(&args),
    }
}

fn list(path: &Path) -> color_eyre::Result<()> {
    let source = fs::read(path).wrap_err_with(|| format!("failed to read {}", path.display()))?;
    let archive = PakArchive::parse(&source)
        .wrap_err_with(|| format!("{} is not a valid archive", path.display()))?;

    println!(
        "{:<16} {:>5} {:>12} {:>12}",
        style("name").bold(),
        style("level").bold(),
        style("packed").bold(),
        style("size").bold()
    );
    for entry in &archive.entries {
        let level = if entry.is_supported() {
            style(entry.compression_level).green()
        } else {
            style(entry.compression_level).red()
        };
        println!(
            "{:<16} {:>5} {:>12} {:>12}",
            entry.name(),
            level,
            entry.data.len(),
            entry.uncompressed_size
        );
    }
    println!(
        "{} entries, {}",
        archive.entries.len(),
        progress::fmt_size(f64::from(archive.total_size))
    );
    Ok(())
}

fn unpack(path: &Path, output: &Path, strict: bool) -> color_eyre::Result<()> {
    let source = fs::read(path).wrap_err_with(|| format!("failed to read {}", path.display()))?;
    let archive = PakArchive::parse(&source)
        .wrap_err_with(|| format!("{} is not a valid archive", path.display()))?;
    fs::create_dir_all(output)
        .wrap_err_with(|| format!("failed to create {}", output.display()))?;

    let total = archive.entries.iter().map(|e| e.data.len()).sum();
    let mut progress = progress::ExtractionProgress::new(total)?;
    let mut skipped = 0;
    for (entry, result) in archive.extract_all() {
        let name = entry.name();
        let decoded = match result {
            Ok(decoded) => decoded,
            Err(err) => {
                warn!("skipping {}: {}", name, err);
                skipped += 1;
                progress.entry_done(&name, entry.data.len(), 0);
                continue;
            }
        };
        let data = accept(decoded, strict).wrap_err_with(|| format!("entry {name} is damaged"))?;
        let target = output.join(file_name(entry.raw_name())?);
        fs::write(&target, &data)
            .wrap_err_with(|| format!("failed to write {}", target.display()))?;
        progress.entry_done(&name, entry.data.len(), data.len());
    }
    progress.finish();
    if skipped > 0 {
        warn!(
            "{} of {} entries use an unsupported compression level",
            skipped,
            archive.entries.len()
        );
    }
    Ok(())
}

fn pack(files: &[PathBuf], output: &Path) -> color_eyre::Result<()> {
    let mut writer = PakWriter::new();
    for file in files {
        let name = file
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| eyre!("{} has no usable file name", file.display()))?;
        let data = fs::read(file).wrap_err_with(|| format!("failed to read {}", file.display()))?;
        writer.add_file(name, &data)?;
    }
    let entries = writer.entries();
    let archive = writer.finish()?;
    fs::write(output, &archive).wrap_err_with(|| format!("failed to write {}", output.display()))?;
    info!(
        "packed {} files into {}",
        entries,
        progress::fmt_size(archive.len() as f64)
    );
    Ok(())
}

fn image(args: &ImageArgs) -> color_eyre::Result<()> {
    let geometry = match (args.preset, args.width, args.height) {
        (Some(Preset::Picture), _, _) => FrameGeometry::STATIC_PICTURE,
        (Some(Preset::Panorama), _, _) => FrameGeometry::PANORAMA_STRIP,
        (None, Some(width), Some(height)) => FrameGeometry::new(width, height)?,
        _ => bail!("either --preset or both --width and --height are required"),
    };

    let source = fs::read(&args.input)
        .wrap_err_with(|| format!("failed to read {}", args.input.display()))?;
    let payload = source
        .get(args.offset..)
        .ok_or_else(|| eyre!("offset {} is past the end of the file", args.offset))?;
    let decoded = fvr_codecs::image::decode_image(
        payload,
        geometry.width(),
        geometry.height(),
        args.quality,
    )?;
    let image = accept(decoded, args.strict)?;

    if args.faces {
        let faces = image
            .cube_faces()
            .ok_or_else(|| eyre!("only panorama strips can be split into faces"))?;
        for (index, face) in faces.iter().enumerate() {
            write_image(&numbered(&args.output, index), face, args.format)?;
        }
    } else {
        write_image(&args.output, &image, args.format)?;
    }
    Ok(())
}

/// Logs the defects of a lenient decode, or turns the first one into an error.
fn accept<T>(decoded: Decoded<T>, strict: bool) -> color_eyre::Result<T> {
    if strict {
        return Ok(decoded.into_strict()?);
    }
    for defect in &decoded.defects {
        warn!("{}", defect);
    }
    Ok(decoded.into_lenient())
}

/// Entry names come from the archive, keep them inside the output directory.
fn file_name(raw: &[u8]) -> color_eyre::Result<String> {
    let name: String = raw
        .iter()
        .map(|b| match *b {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'.' | b'_' | b'-' => char::from(*b),
            _ => '_',
        })
        .collect();
    if name.is_empty() || name.bytes().all(|b| b == b'.') {
        bail!("entry name {:?} cannot be used as a file name", raw);
    }
    Ok(name)
}

fn numbered(path: &Path, index: usize) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name = format!("{stem}-{index}");
    if let Some(extension) = path.extension() {
        name.push('.');
        name.push_str(&extension.to_string_lossy());
    }
    path.with_file_name(name)
}

fn write_image(path: &Path, image: &Rgb565Image, format: Format) -> color_eyre::Result<()> {
    let bytes = match format {
        Format::Raw => image.to_le_bytes(),
        Format::Ppm => {
            let mut ppm = format!("P6\n{} {}\n255\n", image.width, image.height).into_bytes();
            ppm.extend_from_slice(&image.to_rgb888());
            ppm
        }
    };
    fs::write(path, bytes).wrap_err_with(|| format!("failed to write {}", path.display()))?;
    info!("wrote {}x{} image to {}", image.width, image.height, path.display());
    Ok(())
}
