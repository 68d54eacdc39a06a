//! h5scope - inspect a netCDF/HDF5 file from the command line.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use h5scope::data::netcdf::{load_store, read_dataset};
use h5scope::model::HierarchyModel;
use h5scope::navigation::FilterEngine;
use h5scope::plot::{ImageCursor, ImageFrame};
use h5scope::util::format_outline;
use ndarray::{Array2, ArrayD, Axis, Ix2};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "h5scope")]
#[command(
    about = "Browse, filter and probe hierarchical scientific data files",
    long_about = None
)]
struct Args {
    /// Enable logging to specified file
    #[arg(long, global = true)]
    log: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the visible tree of a file
    Tree {
        /// Path to the file
        file: PathBuf,

        /// Whitespace-separated search terms, all of which must match
        #[arg(long, default_value = "")]
        search: String,

        /// Show attribute rows
        #[arg(long)]
        attrs: bool,

        /// Show junk-marked subtrees
        #[arg(long)]
        junk: bool,
    },
    /// Pick the pixel nearest to a point of a 2D variable and print its cross-sections
    Probe {
        /// Path to the file
        file: PathBuf,

        /// Variable path, e.g. /scan/image
        variable: String,

        /// Cursor x coordinate
        #[arg(allow_hyphen_values = true)]
        x: f64,

        /// Cursor y coordinate
        #[arg(allow_hyphen_values = true)]
        y: f64,

        /// Coordinates of pixel (0, 0)
        #[arg(long, num_args = 2, value_names = ["X0", "Y0"], allow_hyphen_values = true)]
        origin: Option<Vec<f64>>,

        /// Pixel spacing along x and y
        #[arg(long, num_args = 2, value_names = ["DX", "DY"])]
        scale: Option<Vec<f64>>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging if --log option is provided
    if let Some(log_path) = &args.log {
        let file = std::fs::File::create(log_path)
            .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        tracing::info!("Starting h5scope");
    }

    match args.command {
        Command::Tree {
            file,
            search,
            attrs,
            junk,
        } => run_tree(&file, &search, attrs, junk),
        Command::Probe {
            file,
            variable,
            x,
            y,
            origin,
            scale,
        } => run_probe(&file, &variable, (x, y), pair(origin), pair(scale)),
    }
}

fn pair(values: Option<Vec<f64>>) -> Option<(f64, f64)> {
    match values.as_deref() {
        Some([a, b]) => Some((*a, *b)),
        _ => None,
    }
}

fn check_path(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("Path not found: {}", path.display());
    }
    Ok(())
}

fn run_tree(path: &Path, search: &str, attrs: bool, junk: bool) -> Result<()> {
    check_path(path)?;
    let store = load_store(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let model = HierarchyModel::new(store)?;

    let mut filter = FilterEngine::new();
    filter.toggle_attrs_visible(model.tree(), attrs);
    filter.toggle_junk_visible(model.tree(), junk);
    filter.set_match_term(model.tree(), search);

    print!("{}", format_outline(model.tree(), filter.visible()));
    if filter.config().terms().next().is_some() {
        eprintln!("{} match(es)", filter.match_count());
    }
    Ok(())
}

fn run_probe(
    path: &Path,
    variable: &str,
    cursor: (f64, f64),
    origin: Option<(f64, f64)>,
    scale: Option<(f64, f64)>,
) -> Result<()> {
    check_path(path)?;
    let data = read_dataset(path, variable)?;
    if data.ndim() < 2 {
        bail!("{} has {} dimension(s), need at least 2", variable, data.ndim());
    }
    let image = leading_slice(data)?;

    let mut frame = ImageFrame::new(image.view());
    if let Some((x0, y0)) = origin {
        frame = frame.with_origin(x0, y0);
    }
    if let Some((dx, dy)) = scale {
        frame = frame.with_scale(dx, dy);
    }

    let mut image_cursor = ImageCursor::centered(&frame);
    if !image_cursor.set_position(&frame, Some(cursor.0), Some(cursor.1)) {
        bail!("({}, {}) lies outside the image", cursor.0, cursor.1);
    }
    let sections = image_cursor.cross_sections(&frame)?;

    println!("pixel: ({}, {})", image_cursor.row, image_cursor.col);
    if let Some(readout) = image_cursor.readout(&frame) {
        println!("{}", readout);
    }
    println!("x trace: {}", sections.horizontal.values);
    println!("y trace: {}", sections.vertical.values);
    Ok(())
}

/// Fix every leading dimension at its first index, leaving a 2D image.
fn leading_slice(mut data: ArrayD<f64>) -> Result<Array2<f64>> {
    while data.ndim() > 2 {
        if data.len_of(Axis(0)) == 0 {
            bail!("Leading dimension is empty, nothing to probe");
        }
        data = data.index_axis_move(Axis(0), 0);
    }
    Ok(data.into_dimensionality::<Ix2>()?)
}
