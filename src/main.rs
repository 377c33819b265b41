use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use topic_quiz::timer::DEFAULT_SECONDS;
use topic_quiz::{DEFAULT_LOG_FILE, DEFAULT_QUESTIONS_DIR, Quiz, QuizConfig, QuizError};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding one <TOPIC>.json file per topic
    #[arg(short = 'd', long, default_value = DEFAULT_QUESTIONS_DIR)]
    questions_dir: PathBuf,

    /// Topic to quiz on; repeat for several. Skips the topic menu
    #[arg(short, long = "topic")]
    topics: Vec<String>,

    /// Seconds allowed per question
    #[arg(short, long, default_value_t = DEFAULT_SECONDS)]
    seconds: u32,

    /// Shuffle the questions before the first one is shown
    #[arg(long)]
    shuffle: bool,

    /// File receiving the log output (the terminal is busy with the quiz)
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,
}

fn init_logging(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "topic_quiz=info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

async fn run(args: Args) -> Result<(), QuizError> {
    let config = QuizConfig {
        questions_dir: args.questions_dir,
        topics: args.topics,
        seconds_per_question: args.seconds,
        shuffle: args.shuffle,
        log_file: args.log_file,
    };
    tracing::info!(?config, "starting topic quiz");

    Quiz::new(config)?.run().await
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = init_logging(&args.log_file) {
        eprintln!("Cannot open log file {}: {}", args.log_file.display(), e);
    }

    if let Err(e) = run(args).await {
        tracing::error!(error = %e, "quiz exited with an error");
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}
