use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use shiori_anki::AnkiConnectClient;
use shiori_core::error::ImportError;
use shiori_core::language::Tokenizer;
use shiori_import::{Collaborators, ImportReport};
use shiori_lang_japanese::{CommandTokenizer, KnownWordsLoader, NormalizerContext};
use shiori_vocab::VocabDb;
use tracing_subscriber::EnvFilter;

pub mod profile;
pub mod progress;

use self::profile::{Overrides, config_path, load_profile};
use self::progress::LogProgress;

/// Import Kindle highlights into Anki, matched against the lookup history
#[derive(Parser, Debug)]
#[command(name = "shiori", version)]
struct Args {
    /// Config file (default: $SHIORI_CONFIG, then ./config.json)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Mount point of the e-reader, overrides the config
    #[arg(long)]
    root: Option<PathBuf>,

    /// Leave progress reporting and the watermark untouched
    #[arg(long)]
    diagnostic: bool,

    /// Log notes instead of sending them to Anki; implies --diagnostic
    #[arg(long, short = 'n')]
    dry_run: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.log_json);

    match run(args).await {
        Ok(report) => {
            print_report(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Import failed: {e:#}");
            eprintln!("Import failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(args: Args) -> anyhow::Result<ImportReport> {
    let (mut file, config) = load_profile(
        config_path(args.config),
        Overrides {
            root: args.root,
            diagnostic: args.diagnostic,
            dry_run: args.dry_run,
        },
    )?;

    // Known words are loaded once per run
    let lexicon = KnownWordsLoader::load_paths(&config.dictionary.known_words_paths)
        .map_err(ImportError::from)?;
    let tokenizer = config.tokenizer.command.as_ref().map(|command| {
        tracing::info!("Using {} for tokenizer fallback", command);
        Box::new(CommandTokenizer::new(command.clone(), config.tokenizer.args.clone()))
            as Box<dyn Tokenizer>
    });
    let mut normalizer = NormalizerContext::japanese(Arc::new(lexicon), tokenizer);

    let vocab = VocabDb::open(&config.reader.vocab_db_path())?;
    tracing::info!("Reading lookups from {}", vocab.path().display());
    let anki = AnkiConnectClient::new(config.anki.url.clone());
    tracing::info!("Sending notes to {}", anki.base_url());

    let mut progress = LogProgress::default();
    let report = shiori_import::run(
        &config,
        Collaborators {
            notes: &anki,
            lookups: &vocab,
            normalizer: &mut normalizer,
            watermark: &mut file,
            progress: &mut progress,
        },
    )
    .await?;

    if let Some(watermark) = report.watermark {
        tracing::info!("Watermark {} saved to {}", watermark.to_iso(), file.path().display());
    }

    let stats = normalizer.stats();
    tracing::info!(
        "Words: {} known, {} deconjugated, {} segmented",
        stats.known,
        stats.deconjugated,
        stats.fallback
    );

    Ok(report)
}

fn print_report(report: &ImportReport) {
    if let Some(text) = report.bad_clippings_text() {
        println!("{text}\n");
    }
    if let Some(text) = report.unmatched_text() {
        println!("{text}\n");
    }
    println!("{report}");
}
