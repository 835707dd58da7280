//! CLI front-end for the facial-shape pipeline.
//!
//! Usage:
//!   faceshape photo.jpg                          # Human-readable report
//!   faceshape photo.jpg --json                   # JSON report
//!   faceshape photo.jpg --endpoint http://host/predict --attempts 3

use anyhow::{Context, Result};
use clap::Parser;
use faceshape::{
    ClientConfig, FaceDetector, RetryPolicy, RetryingClassifier, ShapeAnalyzer, ShapeReport,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "faceshape")]
#[command(author, version, about = "Classify the facial shape in a photo", long_about = None)]
struct Args {
    /// Input image file (JPEG, PNG, or WebP)
    #[arg(required = true)]
    image: PathBuf,

    /// Prediction endpoint URL
    #[arg(long, default_value = "http://localhost:8888/predict")]
    endpoint: String,

    /// Face detector model path (SeetaFace .bin)
    #[arg(long, default_value = "seeta_fd_frontal_v1.0.bin")]
    model: PathBuf,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// Classification attempts (1 = single attempt, no retry)
    #[arg(long, default_value = "1")]
    attempts: u32,

    /// Output as JSON
    #[arg(short, long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn build_detector(args: &Args) -> Result<Box<dyn FaceDetector>> {
    #[cfg(feature = "rustface")]
    {
        let detector = faceshape::RustfaceDetector::from_model_path(&args.model)
            .with_context(|| format!("loading detector model {:?}", args.model))?;
        Ok(Box::new(detector))
    }
    #[cfg(not(feature = "rustface"))]
    {
        let _ = args;
        anyhow::bail!("built without the `rustface` feature; rebuild with `--features rustface`")
    }
}

async fn run(args: &Args) -> Result<()> {
    let input = std::fs::read(&args.image)
        .with_context(|| format!("reading image {:?}", args.image))?;

    let mut client_config = ClientConfig::new(&args.endpoint);
    client_config.timeout = Duration::from_secs(args.timeout);

    let analyzer =
        ShapeAnalyzer::with_client_config(client_config.clone())?.detector(build_detector(args)?);

    let face = analyzer.prepare(&input)?;

    let policy = RetryPolicy {
        max_attempts: args.attempts.max(1),
        ..Default::default()
    };
    let classifier =
        RetryingClassifier::new(faceshape::ClassifierClient::new(client_config)?, policy)?;
    let classification = classifier.classify(&face).await?;
    let report = ShapeReport::from_classification(classification);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_human_readable(&report));
    }

    Ok(())
}

fn format_human_readable(report: &ShapeReport) -> String {
    let c = &report.classification;
    let mut s = String::new();

    s.push_str(&format!("Facial shape: {}\n", c.facial_shape));
    s.push_str(&format!("Confidence:   {:.2}%\n", c.confidence));
    s.push_str(&format!("\nFemale: {}\n", c.female_recommendation));
    s.push_str(&format!("Male:   {}\n", c.male_recommendation));

    match report.links {
        Some(links) => {
            s.push_str("\nReference links:\n");
            s.push_str(&format!("  Female: {}\n", links.female));
            s.push_str(&format!("  Male:   {}\n", links.male));
        }
        None => {
            s.push_str("\nNo reference links for this label.\n");
        }
    }

    if !c.female_images.is_empty() || !c.male_images.is_empty() {
        s.push_str("\nSample photos:\n");
        for url in c.female_images.iter().chain(c.male_images.iter()) {
            s.push_str(&format!("  {url}\n"));
        }
    }

    s
}
