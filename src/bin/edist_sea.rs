//! EDIST2 on the SEA Concepts Stream
//!
//! The SEA threshold moves between concepts at fixed points, which shifts
//! only part of the decision boundary. Degradation is milder than a label
//! reversal, so Warning verdicts and background training matter more.
//!
//! The same stream is also replayed through a plain naive Bayes model to
//! show what drift handling buys.

use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use edist_drift::{
    Classifier, DriftLevel, Edist2, EdistConfig, GaussianNaiveBayes, InstanceStream,
    PoolingFormula, SeaStream, StepOutcome,
};

#[derive(Parser, Debug)]
#[command(about = "EDIST2 drift detection on the SEA concepts stream")]
struct Args {
    /// Number of instances to stream.
    #[arg(short, long, default_value = "60000")]
    instances: u64,

    /// Errors per window.
    #[arg(short, long, default_value = "30")]
    max_errors: usize,

    /// Label noise probability.
    #[arg(short, long, default_value = "0.1")]
    noise: f64,

    /// Reproduce the reference pooling arithmetic.
    #[arg(long)]
    literal_pooling: bool,

    /// RNG seed.
    #[arg(long, default_value = "7")]
    seed: u64,

    /// Log every verdict.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    println!("═══════════════════════════════════════════════════════════════");
    println!("  EDIST2: SEA Concepts Stream");
    println!("═══════════════════════════════════════════════════════════════\n");

    let quarter = args.instances / 4;
    let drift_points: Vec<u64> = (1..4).map(|k| k * quarter + 1).collect();

    let pooling = if args.literal_pooling {
        PoolingFormula::Literal
    } else {
        PoolingFormula::Standard
    };
    let config = EdistConfig::with_max_errors(args.max_errors).pooling(pooling);

    let mut stream = SeaStream::new(drift_points.clone(), args.noise, args.seed);
    let learner = GaussianNaiveBayes::new(stream.n_features(), stream.n_classes());
    let mut baseline = learner.clone();
    let mut detector = Edist2::new(config, learner)?;

    println!("Stream Parameters:");
    println!("  Instances     = {}", args.instances);
    println!("  Label noise   = {:.2}", args.noise);
    println!("  Drift points  = {:?}", drift_points);
    println!("\nDetector Parameters:");
    println!("  Errors/window = {}", args.max_errors);
    println!("  Pooling       = {:?}\n", pooling);

    let mut edist_correct = 0u64;
    let mut baseline_correct = 0u64;
    let mut concept_correct = [0u64; 2];
    let mut concept_seen = 0u64;

    for i in 1..=args.instances {
        let x = stream.next_instance();

        if drift_points.contains(&i) {
            println!(
                "  Concept change at {:6}: θ = {:.1}, accuracy since last = {:.4} (EDIST2) vs {:.4} (plain)",
                i,
                stream.threshold(),
                concept_correct[0] as f64 / concept_seen.max(1) as f64,
                concept_correct[1] as f64 / concept_seen.max(1) as f64
            );
            concept_correct = [0; 2];
            concept_seen = 0;
        }
        concept_seen += 1;

        if detector.correctly_classifies(&x)? {
            edist_correct += 1;
            concept_correct[0] += 1;
        }
        if baseline.correctly_classifies(&x)? {
            baseline_correct += 1;
            concept_correct[1] += 1;
        }

        match detector.train_on_instance(&x)? {
            StepOutcome::Evaluated(DriftLevel::Drift) => {
                println!(">>> DRIFT DETECTED at {:6}", i);
            }
            StepOutcome::Evaluated(level) if args.verbose => {
                println!("  [{:6}] verdict: {:?}", i, level);
            }
            _ => {}
        }
        baseline.train(&x)?;
    }

    println!("\n══════════════════════════════════════════════════════════════");
    println!("  Results");
    println!("══════════════════════════════════════════════════════════════\n");

    let n = args.instances as f64;
    let summary = detector.summary();
    println!("Prequential accuracy:");
    println!("  EDIST2 + naive Bayes: {:.4}", edist_correct as f64 / n);
    println!("  Plain naive Bayes:    {:.4}", baseline_correct as f64 / n);
    println!(
        "\nVerdicts: {} evaluations, {} control, {} warning, {} drift",
        summary.evaluations, summary.controls, summary.warnings, summary.drifts
    );

    if let Some(global) = detector.global() {
        println!(
            "Reference window: μ = {:.2}, δ = {:.2}, N = {}",
            global.mu(),
            global.delta(),
            global.n()
        );
    }

    println!("\n═══════════════════════════════════════════════════════════════");
    println!("  Analysis Complete");
    println!("═══════════════════════════════════════════════════════════════");

    Ok(())
}
