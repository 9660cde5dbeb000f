use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use wdlfit_model::{
    bucket::SkipReason,
    observation::parse_entries,
    pipeline::{Calibration, CalibrationConfig},
    rates::RateSample,
};

use crate::{schema::summary::ModelSummary, util};

#[derive(Debug, Clone, Parser)]
#[command(author, version, about = "Fit a win-draw-loss model to game outcome statistics", long_about = None)]
pub struct CommandArgs {
    /// JSON file with the games' WDL statistics
    #[arg(default_value = "scoreWDLstat.json")]
    stats: PathBuf,

    /// Value used for converting the games' cp scores to internal scores
    #[arg(long, default_value_t = 328)]
    norm_factor: u32,

    /// Move at which a rescaled 100cp should correspond to 50:50 winning chances
    #[arg(long, default_value_t = 32)]
    target_move: u32,

    /// Width of the per-move fit buckets
    #[arg(long, default_value_t = 1)]
    bucket_width: u32,

    /// Skip the measured-vs-model preview at the target move.
    /// The model summary file is written regardless. Useful for batch processing.
    #[arg(long)]
    no_show: bool,

    /// Path of the model summary written for the plotting collaborator
    #[arg(long, default_value = "wdl_model_summary.json")]
    summary_output: PathBuf,
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();

    eprintln!("Reading score stats from {}.", args.stats.display());
    let raw = util::read_stats_file(&args.stats)?;
    let entries = parse_entries(raw.iter().map(|(key, count)| (key.as_str(), *count)))
        .context("Failed to decode observation keys")?;

    eprintln!("Converting scores with norm factor = {}.", args.norm_factor);
    let config = CalibrationConfig {
        norm_factor: args.norm_factor,
        target_move: args.target_move,
        bucket_width: args.bucket_width,
    };
    let calibration = Calibration::fit(entries, &config).context("Calibration failed")?;

    let retained = calibration.retained;
    eprintln!(
        "Retained (W,D,L) = ({}, {}, {}) positions.",
        retained.win, retained.draw, retained.loss
    );

    for skipped in &calibration.buckets.skipped {
        if let SkipReason::FitDiverged { message } = &skipped.reason {
            eprintln!(
                "Warning: move bucket {} excluded: {message}",
                skipped.bucket_start
            );
        }
    }
    eprintln!(
        "Fitted {} move buckets ({} excluded).",
        calibration.buckets.params.len(),
        calibration.buckets.skipped.len()
    );

    println!("{}", calibration.report());

    if !args.no_show {
        show_preview(&calibration);
    }

    let summary = ModelSummary::from_calibration(&calibration, Utc::now());
    util::write_json_file(&args.summary_output, &summary)?;
    println!("Saved model summary to {}.", args.summary_output.display());

    Ok(())
}

/// Prints the measured rates against the fitted model at the target move.
fn show_preview(calibration: &Calibration) {
    let config = calibration.config;
    let bucket = config.target_move..config.target_move + config.bucket_width;
    let rows: Vec<&RateSample> = calibration
        .samples
        .iter()
        .filter(|sample| bucket.contains(&sample.move_number))
        .collect();
    if rows.is_empty() {
        println!("No measured data at move {} to preview.", config.target_move);
        return;
    }

    let model = calibration.model();
    println!("Comparison of model and measured data at move {}:", config.target_move);
    println!(
        "  {:>10} {:>8} {:>8} {:>8}   {:>8} {:>8} {:>8}",
        "score", "win", "draw", "loss", "win fit", "draw fit", "loss fit"
    );
    for sample in rows {
        let wdl = model.expected(sample.score, sample.move_number);
        println!(
            "  {:>10.1} {:>8.3} {:>8.3} {:>8.3}   {:>8.3} {:>8.3} {:>8.3}",
            sample.score,
            sample.win_rate,
            sample.draw_rate,
            sample.loss_rate,
            f64::from(wdl.win) / 1000.0,
            f64::from(wdl.draw) / 1000.0,
            f64::from(wdl.loss) / 1000.0,
        );
    }
    println!();
}
