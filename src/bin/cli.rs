use anyhow::{anyhow, bail, Context, Result};
use crabshot::capture::{CapturedPhotoData, PhotoProcessor};
use crabshot::config::CrabShotConfig;
use crabshot::depth::{estimate_variability, DepthMap};
use crabshot::orientation::interpret;
use crabshot::quality::DepthQualityAnalyzer;
use crabshot::types::Metadata;
use std::env;
use std::fs;

fn main() -> Result<()> {
    crabshot::init_logging();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: crabshot-cli <orientation|depth-variance|process> [args]");
        std::process::exit(1);
    }

    let command = &args[1];
    match command.as_str() {
        "orientation" => cmd_orientation(&args),
        "depth-variance" => cmd_depth_variance(&args),
        "process" => cmd_process(&args),
        _ => {
            eprintln!("Unknown command: {}", command);
            std::process::exit(1);
        }
    }
}

fn cmd_orientation(args: &[String]) -> Result<()> {
    let code: i64 = args
        .get(2)
        .ok_or_else(|| anyhow!("Usage: crabshot-cli orientation <code> [--json]"))?
        .parse()
        .context("orientation code must be an integer")?;

    let info = interpret(code);
    if args.contains(&"--json".to_string()) {
        println!("{}", serde_json::to_string(&info)?);
    } else {
        println!("{} mirrored={}", info.rotation, info.is_mirrored);
    }
    Ok(())
}

fn cmd_depth_variance(args: &[String]) -> Result<()> {
    let path = args
        .get(2)
        .ok_or_else(|| anyhow!("Usage: crabshot-cli depth-variance <depth-image> [--json]"))?;

    let depth = load_depth_map(path)?;
    let variability = estimate_variability(Some(&depth));
    let report = DepthQualityAnalyzer::from_config(&CrabShotConfig::load_or_default().depth)
        .classify(variability);

    if args.contains(&"--json".to_string()) {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        match report.variability {
            Some(value) => println!("depth_variance={:.6} ({})", value, report.level.as_str()),
            None => println!("depth_variance unavailable ({:?})", report.unavailable_reason),
        }
    }
    Ok(())
}

fn cmd_process(args: &[String]) -> Result<()> {
    // Parse args: process <photo> [--depth <file>] [--orientation <n>] [--raw] [--config <file>] [--json]
    let mut photo_path = None;
    let mut depth_path = None;
    let mut orientation = None;
    let mut config_path = None;
    let mut raw = false;
    let mut json = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--depth" => {
                i += 1;
                depth_path = Some(flag_value(args, i, "--depth")?);
            }
            "--orientation" => {
                i += 1;
                orientation = Some(flag_value(args, i, "--orientation")?.parse::<i64>()?);
            }
            "--config" => {
                i += 1;
                config_path = Some(flag_value(args, i, "--config")?);
            }
            "--raw" => raw = true,
            "--json" => json = true,
            other => {
                if photo_path.is_none() {
                    photo_path = Some(other.to_string());
                } else {
                    bail!("Unexpected argument: {}", other);
                }
            }
        }
        i += 1;
    }

    let photo_path = photo_path.ok_or_else(|| anyhow!("photo path required"))?;
    let config = match config_path {
        Some(path) => CrabShotConfig::load_from_file(path)?,
        None => CrabShotConfig::load_or_default(),
    };

    let data = fs::read(&photo_path).with_context(|| format!("reading {}", photo_path))?;
    let mut photo = CapturedPhotoData::new(data);
    if let Some(code) = orientation {
        let mut metadata = Metadata::new();
        metadata.insert(config.capture.orientation_key.clone(), code.into());
        photo = photo.with_metadata(metadata);
    }
    if let Some(path) = depth_path {
        photo = photo.with_depth_map(load_depth_map(&path)?);
    }
    if raw {
        photo = photo.raw();
    }

    let result = PhotoProcessor::new(config).process(&photo)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "{}: {}x{} {} mirrored={}",
            result.path.display(),
            result.width,
            result.height,
            result.orientation,
            result.is_mirrored
        );
        if let Some(variance) = result.depth_variance {
            println!("depth_variance={:.6}", variance);
        }
    }
    Ok(())
}

fn flag_value(args: &[String], i: usize, flag: &str) -> Result<String> {
    args.get(i)
        .cloned()
        .ok_or_else(|| anyhow!("{} requires a value", flag))
}

fn load_depth_map(path: &str) -> Result<DepthMap> {
    let image = image::open(path).with_context(|| format!("decoding depth image {}", path))?;
    Ok(DepthMap::from_image(&image))
}
