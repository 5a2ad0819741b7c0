use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use topicrec_core::Variant;
use topicrec_engine::{Recommender, RecommenderConfig, DEFAULT_OVERSAMPLE_MARGIN};
use topicrec_storage::ArtifactStore;

/// Restaurant recommendations from topic-compressed reviews
#[derive(Parser, Debug)]
#[command(name = "topicrec")]
#[command(about = "Recommend restaurants in a city for a free-text search", long_about = None)]
struct Args {
    /// Path to the artifact store directory
    #[arg(short, long, default_value = "./artifacts")]
    data_dir: PathBuf,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank restaurants of a city against a search
    Recommend {
        /// City label, matched exactly
        #[arg(long)]
        city: String,

        /// Number of restaurants to return
        #[arg(long, default_value_t = 10)]
        top: usize,

        /// Latent space to search in (lsa or nmf)
        #[arg(long, default_value = "lsa")]
        variant: Variant,

        /// Sample from the head of the ranking instead of taking the top
        #[arg(long)]
        random: bool,

        /// Extra ranked entries in the random-sampling pool
        #[arg(long, default_value_t = DEFAULT_OVERSAMPLE_MARGIN)]
        margin: usize,

        /// Search text; read from stdin when omitted
        query: Vec<String>,
    },
    /// List city labels and restaurant counts
    Cities {
        #[arg(long, default_value = "lsa")]
        variant: Variant,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting topicrec v{}", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {:?}", args.data_dir);

    let store = ArtifactStore::open(&args.data_dir)?;

    match args.command {
        Command::Recommend {
            city,
            top,
            variant,
            random,
            margin,
            query,
        } => {
            let config = RecommenderConfig {
                oversample_margin: margin,
                ..RecommenderConfig::default()
            };
            let recommender = Recommender::from_store(&store, config)?;
            let hits = if query.is_empty() {
                let mut bytes = Vec::new();
                std::io::stdin().read_to_end(&mut bytes)?;
                recommender.recommend_bytes(&bytes, &city, top, variant, random)?
            } else {
                recommender.recommend(&query.join(" "), &city, top, variant, random)?
            };
            println!("{}", serde_json::to_string_pretty(&hits)?);
        }
        Command::Cities { variant } => {
            let corpus = store.load_corpus(variant)?;
            for city in corpus.cities() {
                println!("{}\t{}", city, corpus.city_len(city));
            }
        }
    }

    Ok(())
}
