use footprint_deblend::config::deblend::load_config;
use footprint_deblend::diagnostics::PipelineTrace;
use footprint_deblend::image::io::{save_plane_png, write_json_file};
use footprint_deblend::image::MaskPlanes;
use footprint_deblend::{DeblendReport, Deblender};
use serde::Serialize;
use std::env;
use std::path::Path;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    env_logger::init();
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config_path = Path::new(&config_path);
    let config = load_config(config_path)?;
    let base = config_path.parent().unwrap_or(Path::new("."));

    let image = config.load_image(base)?;
    let footprint = config.resolve_footprint(&image);
    let planes = MaskPlanes::with_deblend_planes();
    let deblender = Deblender::new(config.params.clone());
    let report = deblender
        .deblend(&image, &footprint, &config.peaks, &planes)
        .map_err(|e| format!("Deblend failed: {e}"))?;

    let vmax = image
        .image()
        .data
        .iter()
        .copied()
        .fold(0.0f32, f32::max);
    let children = save_children(&report, vmax, &config.output.children_dir)?;

    let summary = DeblendSummary {
        width: image.width(),
        height: image.height(),
        footprint_area: footprint.area(),
        children,
        trace: &report.trace,
    };
    write_json_file(&config.output.report_json, &summary)?;

    let params = deblender.params();
    println!(
        "Deblended {}/{} peaks in {:.3} ms (sigma1={}, median_halfsize={:?})",
        report.trace.deblended_count(),
        config.peaks.len(),
        report.trace.timings.total_ms,
        params.sigma1,
        params.median_halfsize
    );
    println!("Saved report to {}", config.output.report_json.display());
    Ok(())
}

fn save_children(
    report: &DeblendReport<f32>,
    vmax: f32,
    dir: &Path,
) -> Result<Vec<ChildSummary>, String> {
    let mut out = Vec::new();
    for (index, child) in report.peaks.iter().enumerate() {
        let Some(child) = child else {
            continue;
        };
        let path = dir.join(format!("child_{index:02}.png"));
        save_plane_png(child.flux.image(), vmax, &path)?;
        out.push(ChildSummary {
            index,
            x0: child.flux.x0(),
            y0: child.flux.y0(),
            flux: child.flux.image().data.iter().map(|&v| v as f64).sum(),
            image: path.display().to_string(),
        });
    }
    Ok(out)
}

fn usage() -> String {
    "Usage: deblend_demo <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChildSummary {
    index: usize,
    x0: i32,
    y0: i32,
    flux: f64,
    image: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeblendSummary<'a> {
    width: usize,
    height: usize,
    footprint_area: usize,
    children: Vec<ChildSummary>,
    trace: &'a PipelineTrace,
}
