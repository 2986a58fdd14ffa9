//! Khabar command-line tool
//!
//! Checks a football news claim against the indexed corpus and prints the
//! closest article with a verdict.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use khabar::embed::BertEmbedder;
use khabar::store::{MemoryStore, SqliteStore};
use khabar::{
    ArticleStore, EntityExtractor, HeuristicLanguageDetector, LanguageDetector, LazyEmbedder,
    Lexicon, RankedResult, Retrieval, RetrievalConfig, RetrievalContext, Retriever, Verdict,
    VectorStore,
};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("khabar")
}

fn default_db_path() -> PathBuf {
    data_dir().join("khabar.db")
}

fn default_model_dir() -> PathBuf {
    data_dir().join("models").join("all-MiniLM-L6-v2")
}

#[derive(Parser)]
#[command(name = "khabar")]
#[command(about = "Check football news claims against an indexed corpus")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// SQLite database with `vectors` and `articles` tables
    #[arg(long, env = "KHABAR_DB", conflicts_with = "records")]
    db: Option<PathBuf>,

    /// JSON Lines file of records, loaded into memory instead of a database
    #[arg(long, env = "KHABAR_RECORDS")]
    records: Option<PathBuf>,

    /// JSON Lines file of article metadata, used with --records
    #[arg(long, env = "KHABAR_ARTICLES", requires = "records")]
    articles: Option<PathBuf>,

    /// Directory holding config.json, tokenizer.json and model.safetensors
    #[arg(long, env = "KHABAR_MODEL_DIR")]
    model_dir: Option<PathBuf>,

    /// JSON lexicon replacing the built-in gazetteers and keyword tables
    #[arg(long, env = "KHABAR_LEXICON")]
    lexicon: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the closest article to a claim and grade it
    Analyze {
        text: String,

        /// Query language; detected from the text when omitted
        #[arg(short, long)]
        language: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List re-ranked candidates with their score breakdown
    Search {
        text: String,

        #[arg(short, long)]
        language: Option<String>,

        /// Number of candidates kept by the cosine stage
        #[arg(short = 'n', long, default_value_t = khabar::config::DEFAULT_TOP_K)]
        limit: usize,
    },
    /// Print the entities found in a text as JSON
    Entities {
        text: String,

        #[arg(short, long)]
        language: Option<String>,
    },
}

#[derive(Serialize)]
struct AnalyzeReport<'a> {
    verdict: &'static str,
    verdict_text: String,
    #[serde(flatten)]
    retrieval: &'a Retrieval,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let lexicon = match &cli.lexicon {
        Some(path) => Lexicon::from_json_file(path)
            .with_context(|| format!("failed to load lexicon {}", path.display()))?,
        None => Lexicon::default(),
    };

    match &cli.command {
        Commands::Analyze {
            text,
            language,
            json,
        } => {
            let retriever = build_retriever(&cli, &lexicon, RetrievalConfig::default())?;
            let retrieval = retriever.retrieve(text, language.as_deref())?;
            print_analysis(&retrieval, *json)?;
        }
        Commands::Search {
            text,
            language,
            limit,
        } => {
            let config = RetrievalConfig::default().with_top_k(*limit);
            let retriever = build_retriever(&cli, &lexicon, config)?;
            let ranking = retriever.rank(text, language.as_deref())?;
            if ranking.unfiltered {
                println!(
                    "No {} article matched, showing results from every language.",
                    ranking.language
                );
            }
            for (rank, ranked) in ranking.results.iter().enumerate() {
                print_ranked(rank + 1, ranked);
            }
        }
        Commands::Entities { text, language } => {
            let language = match language {
                Some(tag) => tag.clone(),
                None => HeuristicLanguageDetector::new()?.detect(text),
            };
            let extractor = EntityExtractor::new(&lexicon)?;
            let entities = extractor.extract(text, &language);
            println!("{}", serde_json::to_string_pretty(&entities)?);
        }
    }

    Ok(())
}

fn build_retriever(cli: &Cli, lexicon: &Lexicon, config: RetrievalConfig) -> Result<Retriever> {
    let (store, articles) = open_stores(cli)?;

    let model_dir = cli.model_dir.clone().unwrap_or_else(default_model_dir);
    debug!(model_dir = %model_dir.display(), "embedding model directory");
    let embedder = LazyEmbedder::new(move || Ok(BertEmbedder::load(&model_dir)?));
    embedder
        .warm_up()
        .context("failed to load the embedding model")?;

    let mut context = RetrievalContext::new(Arc::new(embedder), store)?;
    if let Some(articles) = articles {
        context = context.with_articles(articles);
    }

    Ok(Retriever::with_config(context, lexicon, config)?)
}

type Stores = (Arc<dyn VectorStore>, Option<Arc<dyn ArticleStore>>);

fn open_stores(cli: &Cli) -> Result<Stores> {
    if let Some(records) = &cli.records {
        let store = MemoryStore::from_jsonl(records)
            .with_context(|| format!("failed to load records from {}", records.display()))?;
        if let Some(articles) = &cli.articles {
            store
                .load_articles_jsonl(articles)
                .with_context(|| format!("failed to load articles from {}", articles.display()))?;
        }
        let store = Arc::new(store);
        let vectors: Arc<dyn VectorStore> = store.clone();
        let articles: Arc<dyn ArticleStore> = store;
        return Ok((vectors, Some(articles)));
    }

    let path = cli.db.clone().unwrap_or_else(default_db_path);
    if !path.exists() {
        bail!(
            "no database at {} (pass --db or --records)",
            path.display()
        );
    }
    let store = Arc::new(
        SqliteStore::open(&path)
            .with_context(|| format!("failed to open database {}", path.display()))?,
    );
    info!(records = store.count()?, "database ready");
    let vectors: Arc<dyn VectorStore> = store.clone();
    let articles: Arc<dyn ArticleStore> = store;
    Ok((vectors, Some(articles)))
}

fn print_analysis(retrieval: &Retrieval, json: bool) -> Result<()> {
    let verdict = retrieval.verdict();
    if json {
        let report = AnalyzeReport {
            verdict: verdict.label(),
            verdict_text: verdict.to_string(),
            retrieval,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let result = &retrieval.result.result;
    println!("{}", verdict_line(verdict));
    println!("Score:    {:.4}", retrieval.final_score);
    println!("Language: {}", retrieval.language);
    println!("Closest:  {}", result.text);
    println!("Source:   {}", result.url);
    if let Some(article) = &result.article {
        if let Some(title) = article.title(&retrieval.language) {
            println!("Title:    {title}");
        }
        if let Some(image) = &article.image {
            println!("Image:    {image}");
        }
    }
    Ok(())
}

fn verdict_line(verdict: Verdict) -> String {
    let mark = match verdict {
        Verdict::LikelyTrue => "[+]",
        Verdict::Uncertain => "[?]",
        Verdict::LikelyFalse => "[-]",
    };
    format!("{mark} {verdict}")
}

fn print_ranked(rank: usize, ranked: &RankedResult) {
    println!(
        "{rank:>2}. {:.4}  (cos {:.4}, ent {:.2}, kw {:.2})  [{}] {}",
        ranked.score_final,
        ranked.score_cosine,
        ranked.score_entity,
        ranked.score_keyword,
        ranked.result.language,
        ranked.result.text
    );
    println!("    {}", ranked.result.url);
}
