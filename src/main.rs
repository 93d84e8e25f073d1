use anyhow::{bail, Context};
use globeclock::config::AppConfig;
use globeclock::data::{default_winner_path, load_genome, save_genome};
use globeclock::engines::evaluation::{FitnessEvaluator, FitnessFunction, TargetSet};
use globeclock::engines::generation::{ConsoleProgressCallback, EvolutionEngine};
use globeclock::render::SoftwareRenderer;
use log::{info, warn};
use std::env;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::Instant;

const USAGE: &str = "usage: globeclock [--config <file>] [--write-config <file>] [--score <winner.json>] [output.json]";

#[derive(Debug, Default)]
struct CliArgs {
    config: Option<PathBuf>,
    write_config: Option<PathBuf>,
    score: Option<PathBuf>,
    output: Option<PathBuf>,
}

impl CliArgs {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> anyhow::Result<Self> {
        let mut parsed = Self::default();
        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .map(PathBuf::from)
                    .with_context(|| format!("{} needs a path\n{}", flag, USAGE))
            };
            match arg.as_str() {
                "--config" => parsed.config = Some(value("--config")?),
                "--write-config" => parsed.write_config = Some(value("--write-config")?),
                "--score" => parsed.score = Some(value("--score")?),
                "-h" | "--help" => {
                    println!("{}", USAGE);
                    std::process::exit(0);
                }
                flag if flag.starts_with("--") => bail!("unknown option {}\n{}", flag, USAGE),
                _ if parsed.output.is_none() => parsed.output = Some(PathBuf::from(&arg)),
                _ => bail!("unexpected argument {}\n{}", arg, USAGE),
            }
        }
        Ok(parsed)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let started = Instant::now();

    let args = CliArgs::parse(env::args().skip(1))?;
    let config = AppConfig::load(args.config.as_deref()).context("invalid settings")?;
    if let Some(path) = &args.write_config {
        config.save_to_file(path)?;
        info!("Resolved settings written to {}", path.display());
    }

    let targets = TargetSet::load(&config.fitness.target_paths()).context("cannot load target masks")?;
    let renderer = SoftwareRenderer::load(&config.render).context("cannot load digit glyphs")?;
    let mut evaluator = FitnessEvaluator::new(renderer, targets, config.fitness.fitness_function_factor);
    info!("Mismatch penalty factor {}", evaluator.penalty_factor());

    if let Some(path) = &args.score {
        let genome = load_genome(path).with_context(|| format!("cannot read {}", path.display()))?;
        for view in evaluator.view_scores(&genome)? {
            println!(
                "{:>10}  match {:8.5}  mismatch {:8.5}  score {:8.5}",
                view.viewpoint.to_string(),
                view.match_score,
                view.mismatch_score,
                view.score
            );
        }
        println!("fitness {:.5}", evaluator.evaluate(&genome)?);
        return Ok(());
    }

    info!("Starting genetic algorithm...");
    let mut engine = EvolutionEngine::new(config.evolution.clone(), config.layout.clone(), evaluator)?;
    let cancel = engine.cancel_handle();
    ctrlc::set_handler(move || {
        warn!("Interrupted, stopping after the current generation");
        cancel.store(true, Ordering::Relaxed);
    })
    .context("cannot install the interrupt handler")?;
    let summary = engine
        .run(&mut ConsoleProgressCallback::new())
        .context("evolution aborted, no winner written")?;

    let path = args.output.unwrap_or_else(default_winner_path);
    save_genome(&path, &summary.winner)
        .with_context(|| format!("cannot write winner to {}", path.display()))?;

    info!(
        "Finished after {} generations ({:?}), best fitness {:.5}",
        summary.generations, summary.termination, summary.best_fitness
    );
    info!("Total time elapsed {:.3} seconds", started.elapsed().as_secs_f64());
    info!("Winner configuration saved to {}", path.display());
    Ok(())
}
