use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use rand::{rngs::StdRng, SeedableRng};

use ferrite_backprop::data::{bitmap, cases};
use ferrite_backprop::{
    train_loop, IterationStats, ModelConfig, Network, SseLoss, TrainOutcome, TrainingSet,
    WeightSnapshot,
};

#[derive(Parser)]
#[command(name = "ferrite-backprop", version, about = "Train and run back-propagation networks described by JSON model configs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train the model described by a config file
    Train {
        config: PathBuf,
        /// Write trained weights back to the config, periodically and at the end
        #[arg(long)]
        save: bool,
        /// Save to this path instead of overwriting the config
        #[arg(long)]
        out: Option<PathBuf>,
        /// Seed for weight randomization
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run the model on a single input
    Run {
        config: PathBuf,
        /// Comma-separated input activations
        #[arg(long, required_unless_present = "bitmap", conflicts_with = "bitmap")]
        input: Option<String>,
        /// Image whose grayscale pels form the input
        #[arg(long)]
        bitmap: Option<PathBuf>,
        /// Resize the input image first, as WIDTHxHEIGHT
        #[arg(long, value_parser = parse_size)]
        resize: Option<Size>,
        /// Also write the output activations as a grayscale image
        #[arg(long, requires = "out_size")]
        out_bitmap: Option<PathBuf>,
        /// Dimensions of the output image, as WIDTHxHEIGHT
        #[arg(long, value_parser = parse_size)]
        out_size: Option<Size>,
        /// Seed for any weights the config leaves unset
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Debug, Clone, Copy)]
struct Size {
    width: u32,
    height: u32,
}

fn parse_size(text: &str) -> std::result::Result<Size, String> {
    let (w, h) = text.split_once('x').ok_or_else(|| format!("expected WIDTHxHEIGHT, got {text:?}"))?;
    let width = w.trim().parse().map_err(|_| format!("bad width {w:?}"))?;
    let height = h.trim().parse().map_err(|_| format!("bad height {h:?}"))?;
    Ok(Size { width, height })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Train { config, save, out, seed } => train(&config, save, out, seed),
        Command::Run { config, input, bitmap, resize, out_bitmap, out_size, seed } => {
            run(&config, input, bitmap, resize, out_bitmap.zip(out_size), seed)
        }
    }
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn load(path: &Path) -> Result<ModelConfig> {
    ModelConfig::load_json(path).with_context(|| format!("cannot read model config {}", path.display()))
}

fn train(config_path: &Path, save: bool, out: Option<PathBuf>, seed: Option<u64>) -> Result<()> {
    let mut config = load(config_path)?;
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let target = out.unwrap_or_else(|| config_path.to_path_buf());

    let mut network = config.build_network(&mut rng_from(seed))?;
    let training_set = config.training_set(base_dir)
        .with_context(|| format!("cannot load training cases of {}", config.name))?;

    let mut train_config = config.train_config();

    let (progress_tx, progress_rx) = mpsc::channel::<IterationStats>();
    train_config.progress_tx = Some(progress_tx);
    let reporter = thread::spawn(move || {
        for stats in progress_rx {
            info!(
                "iteration {}/{}: error {:.6e} (trend {:+}), learning rate {:.6e}, {} rollbacks",
                stats.iteration,
                stats.max_iterations,
                stats.total_error,
                stats.error_trend,
                stats.learning_rate,
                stats.reverts
            );
        }
    });

    let saver = if save && config.save_period > 0 {
        let (snapshot_tx, snapshot_rx) = mpsc::channel::<WeightSnapshot>();
        train_config.snapshot_tx = Some(snapshot_tx);
        let mut snapshot_config = config.clone();
        let path = target.clone();
        Some(thread::spawn(move || -> Result<()> {
            for snapshot in snapshot_rx {
                snapshot_config.set_weights(&snapshot.weights)?;
                snapshot_config.save_json(&path)?;
                info!("saved weights of iteration {} to {}", snapshot.iteration, path.display());
            }
            Ok(())
        }))
    } else {
        None
    };

    let outcome = train_loop(&mut network, &training_set, &train_config)?;
    drop(train_config);

    reporter.join().map_err(|_| anyhow!("progress reporter panicked"))?;
    if let Some(saver) = saver {
        saver.join().map_err(|_| anyhow!("weight saver panicked"))??;
    }

    report(&config.name, &outcome, &network, &training_set)?;

    if save {
        config.set_weights(network.weights())?;
        config.save_json(&target)
            .with_context(|| format!("cannot write {}", target.display()))?;
        info!("saved trained weights to {}", target.display());
    }
    Ok(())
}

fn report(name: &str, outcome: &TrainOutcome, network: &Network, training_set: &TrainingSet) -> Result<()> {
    println!("{name}: training ended, {}", outcome.reason);
    println!("iterations: {}", outcome.iterations);
    println!("learning rate: {}", outcome.learning_rate);
    println!("rollbacks: {}", outcome.reverts);
    println!("total error: {:.6e}", outcome.total_error());

    for (a, case) in training_set.iter().enumerate() {
        let output = network.infer(&case.input)?;
        println!(
            "case {a}: expected [{}] got [{}] error {:.6e}",
            cases::format_activations(&case.expected),
            cases::format_activations(&output),
            SseLoss::loss(&output, &case.expected)
        );
    }
    Ok(())
}

fn run(
    config_path: &Path,
    input: Option<String>,
    bitmap_path: Option<PathBuf>,
    resize: Option<Size>,
    output_image: Option<(PathBuf, Size)>,
    seed: Option<u64>,
) -> Result<()> {
    let config = load(config_path)?;
    if config.weights.is_none() {
        warn!("{} has no stored weights; running with random weights", config.name);
    }
    let network = config.build_network(&mut rng_from(seed))?;

    let activations = match (input, bitmap_path) {
        (Some(text), _) => cases::parse_activations(&text)?,
        (None, Some(path)) => bitmap::load_grayscale(&path, resize.map(|s| (s.width, s.height)))
            .with_context(|| format!("cannot read bitmap {}", path.display()))?,
        (None, None) => bail!("either --input or --bitmap is required"),
    };

    let output = network.infer(&activations)?;
    println!("{}", cases::format_activations(&output));

    if let Some((path, size)) = output_image {
        bitmap::save_grayscale(&output, size.width, size.height, &path)
            .with_context(|| format!("cannot write bitmap {}", path.display()))?;
        info!("wrote output bitmap {}", path.display());
    }
    Ok(())
}
