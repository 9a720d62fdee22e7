use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use ar_overlay::{
    render, AnchorLayout, OverlayError, OverlayParams, RunReport, DEFAULT_ANCHOR_IDS,
};
use ar_overlay_aruco::Dictionary;
use clap::Parser;
use image::ImageReader;
use log::LevelFilter;

/// Overlay a source image onto the planar region bounded by four ArUco
/// markers in a scene image.
#[derive(Parser, Debug)]
#[command(name = "ar-overlay", version, about)]
struct Cli {
    /// Scene image containing the four anchor markers.
    #[arg(short = 'i', long = "image")]
    image: PathBuf,

    /// Source image to warp onto the marker-bounded region.
    #[arg(short = 's', long = "source")]
    source: PathBuf,

    /// Composited output image.
    #[arg(short = 'o', long = "output", default_value = "overlay.png")]
    output: PathBuf,

    /// Display width the scene is resized to.
    #[arg(long, default_value_t = 600)]
    width: u32,

    /// Anchor marker ids in TL,TR,BR,BL order.
    #[arg(long, value_delimiter = ',', num_args = 4, default_values_t = DEFAULT_ANCHOR_IDS)]
    anchor_ids: Vec<u32>,

    /// Maximum Hamming distance for marker matching.
    #[arg(long, default_value_t = 0)]
    max_hamming: u8,

    /// 3x3 dilation iterations applied to the quad mask.
    #[arg(long, default_value_t = 2)]
    dilate_iters: usize,

    /// Also write the warped source image here.
    #[arg(long)]
    save_warped: Option<PathBuf>,

    /// Also write the dilated quad mask here.
    #[arg(long)]
    save_mask: Option<PathBuf>,

    /// Write a JSON run report here.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    ar_overlay::core::init_with_level(level)?;

    let anchor_ids: [u32; 4] = cli
        .anchor_ids
        .clone()
        .try_into()
        .map_err(|_| "expected exactly four anchor ids")?;

    let dict = Dictionary::aruco_original();
    let anchors = AnchorLayout::new(anchor_ids, &dict)?;

    let params = OverlayParams {
        scene_width: cli.width,
        anchors,
        detector: ar_overlay_aruco::DetectorParams {
            max_hamming: cli.max_hamming,
            ..Default::default()
        },
        dilate_iterations: cli.dilate_iters,
    };

    let mut report = RunReport::new(&cli.image, &cli.source, &cli.output, cli.width, anchor_ids);
    let t_total = Instant::now();

    log::info!("loading scene and source images");
    let t_load = Instant::now();
    let scene = ImageReader::open(&cli.image)?.decode()?.to_rgb8();
    let source = ImageReader::open(&cli.source)?.decode()?.to_rgb8();
    report.timings_ms.load_images = t_load.elapsed().as_millis() as u64;

    let t_render = Instant::now();
    let outcome = render(&scene, &source, &params);
    report.timings_ms.render = t_render.elapsed().as_millis() as u64;
    report.timings_ms.total = t_total.elapsed().as_millis() as u64;

    match outcome {
        Ok(result) => {
            result.output.save(&cli.output)?;
            log::info!("wrote {}", cli.output.display());

            if let Some(path) = &cli.save_warped {
                result.warped.save(path)?;
                log::info!("wrote {}", path.display());
            }
            if let Some(path) = &cli.save_mask {
                result.mask.save(path)?;
                log::info!("wrote {}", path.display());
            }

            report.set_result(&result);
            write_report(&report, cli.report.as_deref())?;
            Ok(())
        }
        // The original tool exits cleanly when the scene does not show
        // exactly four markers; keep that contract.
        Err(err @ OverlayError::MarkerCount { .. }) => {
            log::info!("{err}; exiting without output");
            report.set_error(&err);
            write_report(&report, cli.report.as_deref())?;
            Ok(())
        }
        Err(err) => {
            report.set_error(&err);
            write_report(&report, cli.report.as_deref())?;
            Err(err.into())
        }
    }
}

fn write_report(report: &RunReport, path: Option<&std::path::Path>) -> std::io::Result<()> {
    if let Some(path) = path {
        report.write_json(path)?;
        log::info!("wrote report {}", path.display());
    }
    Ok(())
}
