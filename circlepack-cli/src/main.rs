//! Command line interface for the circlepack solver

mod input;

use circlepack_core::{
    ConsoleSink, Instance, RectSpec, RotationMode, Solution, SolveOptions, solve,
};
use clap::Parser;
use std::path::PathBuf;
use std::process;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "circlepack",
    about = "Pack rectangles into a minimal enclosing circle"
)]
struct Cli {
    /// Dimensions of a rectangle in format Width,Height (e.g. 10,20)
    #[arg(value_name = "W,H", conflicts_with = "json")]
    rects: Vec<String>,

    /// Path to a JSON input file (e.g. input/exampleInput.json)
    #[arg(long, short = 'f')]
    json: Option<PathBuf>,

    /// Rotation mode: fixed_0, discrete_90, discrete_45, free or auto
    #[arg(long, default_value = "auto")]
    mode: String,

    /// Stop as soon as a valid layout with this radius is found
    #[arg(long)]
    target_radius: Option<f64>,

    /// Random seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Override the per-stage generation budgets
    #[arg(long)]
    max_generations: Option<usize>,

    /// Run discrete-stage permutations sequentially
    #[arg(long)]
    serial: bool,

    /// Suppress the progress bar
    #[arg(long, short)]
    quiet: bool,

    /// Print the solution as JSON instead of text
    #[arg(long)]
    json_output: bool,
}

fn parse_rect_args(args: &[String]) -> Result<Vec<RectSpec>, String> {
    let mut rects = Vec::with_capacity(args.len());
    for arg in args {
        let parts: Vec<&str> = arg.split(',').collect();
        if parts.len() != 2 {
            return Err(format!("'{}' is not in Width,Height format", arg));
        }
        let w: f64 = parts[0]
            .trim()
            .parse()
            .map_err(|_| format!("'{}' is not a number", parts[0]))?;
        let h: f64 = parts[1]
            .trim()
            .parse()
            .map_err(|_| format!("'{}' is not a number", parts[1]))?;
        rects.push(RectSpec::new(w, h));
    }
    Ok(rects)
}

fn print_text(solution: &Solution, identifiers: &[String]) {
    println!();
    if solution.valid {
        println!("Minimum circle radius: {:.4}", solution.radius);
    } else {
        println!(
            "No feasible layout found; best attempt radius: {:.4}",
            solution.radius
        );
    }
    println!(
        "Stage: {}  Generations: {}  Permutations: {}",
        solution.stage, solution.generations, solution.permutations
    );
    println!("Positions (center x, y, rotation):");
    for (i, pose) in solution.poses.iter().enumerate() {
        let ident = identifiers
            .get(i)
            .map(String::as_str)
            .unwrap_or("Rect");
        println!(
            "  {}: ({:.4}, {:.4}) at {:.1} deg",
            ident,
            pose.x,
            pose.y,
            pose.theta.to_degrees()
        );
    }
}

fn main() {
    env_logger::Builder::from_default_env().init();
    let cli = Cli::parse();

    let (instance, identifiers, file_target) = if let Some(path) = &cli.json {
        match input::load_json(path) {
            Ok(loaded) => {
                eprintln!(
                    "Loaded from JSON: {} rectangles, padding inner={} outer={}",
                    loaded.instance.rects.len(),
                    loaded.instance.inner_padding,
                    loaded.instance.outer_padding
                );
                (loaded.instance, loaded.identifiers, loaded.target_radius)
            }
            Err(e) => {
                eprintln!("Error loading JSON: {}", e);
                process::exit(1);
            }
        }
    } else {
        if cli.rects.is_empty() {
            eprintln!("Error: provide rectangles as W,H arguments or --json FILE");
            process::exit(1);
        }
        let rects = match parse_rect_args(&cli.rects) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        };
        let identifiers = (1..=rects.len()).map(|i| format!("Rect_{}", i)).collect();
        (Instance::new(rects), identifiers, None)
    };

    let mode = match RotationMode::from_str(&cli.mode) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let mut options = SolveOptions::new().mode(mode).parallel(!cli.serial);
    if let Some(t) = cli.target_radius.or(file_target) {
        options = options.target_radius(t);
    }
    if let Some(s) = cli.seed {
        options = options.seed(s);
    }
    if let Some(g) = cli.max_generations {
        options = options.max_generations(g);
    }
    if !cli.quiet {
        options = options.progress(Arc::new(ConsoleSink));
    }

    match solve(&instance, &options) {
        Ok(solution) => {
            if !cli.quiet {
                // Terminate the carriage-return progress line.
                eprintln!();
            }
            if cli.json_output {
                match serde_json::to_string_pretty(&solution) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error serializing solution: {}", e);
                        process::exit(1);
                    }
                }
            } else {
                print_text(&solution, &identifiers);
            }
            if !solution.valid {
                process::exit(2);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rect_args() {
        let rects = parse_rect_args(&["10,20".into(), " 5 , 7.5 ".into()]).unwrap();
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0], RectSpec::new(10.0, 20.0));
        assert_eq!(rects[1], RectSpec::new(5.0, 7.5));
    }

    #[test]
    fn test_parse_rect_args_rejects_garbage() {
        assert!(parse_rect_args(&["10x20".into()]).is_err());
        assert!(parse_rect_args(&["a,b".into()]).is_err());
    }
}
