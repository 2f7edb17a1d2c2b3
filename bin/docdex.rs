use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use docdex::catalog::VersionCatalog;
use docdex::index::{validate, SearchIndex};
use docdex::{loader, SearchSettings};
use tracing::info;

#[derive(Parser)]
#[command(name = "docdex")]
#[command(about = "Query and validate generated documentation search indexes", long_about = None)]
#[command(version)]
struct Cli {
    /// Emit machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Refuse artifacts that fail integrity validation
    #[arg(long, global = true, env = "DOCDEX_STRICT")]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search one artifact file
    Search {
        /// Path to a searchindex.js artifact
        index: PathBuf,
        /// Query string; supports -word, "quoted text", title: and obj:
        query: String,
        /// Maximum number of hits
        #[arg(long, default_value = "10", env = "DOCDEX_LIMIT")]
        limit: usize,
    },
    /// Check an artifact against its integrity invariants
    Validate {
        /// Path to a searchindex.js artifact
        index: PathBuf,
    },
    /// Print document, term and symbol counts for an artifact
    Stats {
        /// Path to a searchindex.js artifact
        index: PathBuf,
    },
    /// List documented API symbols
    Objects {
        /// Path to a searchindex.js artifact
        index: PathBuf,
        /// Only symbols containing this pattern (case-insensitive)
        #[arg(long)]
        pattern: Option<String>,
    },
    /// List the releases in a versions directory
    Versions {
        /// Directory containing <version>/searchindex.js releases
        dir: PathBuf,
    },
    /// Show which releases document a symbol
    Where {
        /// Directory containing <version>/searchindex.js releases
        dir: PathBuf,
        /// Full dotted symbol name, or its final component
        symbol: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let settings = SearchSettings::default().with_strict(cli.strict);

    match cli.command {
        Command::Search {
            index,
            query,
            limit,
        } => run_search(&index, &query, limit, &settings, cli.json),
        Command::Validate { index } => run_validate(&index, cli.json),
        Command::Stats { index } => run_stats(&index, &settings, cli.json),
        Command::Objects { index, pattern } => {
            run_objects(&index, pattern.as_deref(), &settings, cli.json)
        }
        Command::Versions { dir } => run_versions(&dir, &settings, cli.json),
        Command::Where { dir, symbol } => run_where(&dir, &symbol, &settings, cli.json),
    }
}

fn load_index(path: &PathBuf, settings: &SearchSettings) -> Result<SearchIndex> {
    let index = if settings.strict {
        SearchIndex::load_strict(path)?
    } else {
        SearchIndex::load(path)?
    };
    info!(path = %path.display(), docs = index.doc_count(), "index loaded");
    Ok(index)
}

fn run_search(
    path: &PathBuf,
    query: &str,
    limit: usize,
    settings: &SearchSettings,
    json: bool,
) -> Result<()> {
    let index = load_index(path, settings)?;
    let result = docdex::search(&index, query, settings, limit)?;

    if json {
        for hit in &result.hits {
            println!("{}", serde_json::to_string(hit)?);
        }
        return Ok(());
    }

    if result.hits.is_empty() {
        println!("no results for {:?}", query);
        return Ok(());
    }

    println!(
        "{} of {} result(s) in {}us",
        result.hits.len(),
        result.total_hits,
        result.stats.execution_time_us
    );
    for hit in &result.hits {
        println!("{:>8.2}  {}  ({})", hit.score, hit.title, hit.docname);
    }
    Ok(())
}

fn run_validate(path: &PathBuf, json: bool) -> Result<()> {
    let raw = loader::load_file(path)?;
    let violations = validate(&raw);

    if json {
        for violation in &violations {
            println!(
                "{}",
                serde_json::json!({
                    "invariant": violation.invariant,
                    "description": violation.description,
                    "context": violation.context,
                })
            );
        }
    } else {
        for violation in &violations {
            print!("{}", violation);
        }
    }

    if !violations.is_empty() {
        bail!("{} integrity violation(s)", violations.len());
    }
    if !json {
        println!("ok: {} documents, {} terms", raw.doc_count(), raw.terms.len());
    }
    Ok(())
}

fn run_stats(path: &PathBuf, settings: &SearchSettings, json: bool) -> Result<()> {
    let index = load_index(path, settings)?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "docs": index.doc_count(),
                "terms": index.dictionary(docdex::SearchField::Body).len(),
                "title_terms": index.dictionary(docdex::SearchField::Title).len(),
                "postings": index.dictionary(docdex::SearchField::Body).posting_count(),
                "objects": index.objects().len(),
                "object_types": index.object_types().len(),
                "headings": index.headings().len(),
                "index_entries": index.index_entries().len(),
            })
        );
        return Ok(());
    }

    println!("documents:     {}", index.doc_count());
    println!(
        "terms:         {} ({} postings)",
        index.dictionary(docdex::SearchField::Body).len(),
        index.dictionary(docdex::SearchField::Body).posting_count()
    );
    println!(
        "title terms:   {}",
        index.dictionary(docdex::SearchField::Title).len()
    );
    println!("objects:       {}", index.objects().len());
    println!("object types:  {}", index.object_types().len());
    println!("headings:      {}", index.headings().len());
    println!("index entries: {}", index.index_entries().len());
    Ok(())
}

fn run_objects(
    path: &PathBuf,
    pattern: Option<&str>,
    settings: &SearchSettings,
    json: bool,
) -> Result<()> {
    let index = load_index(path, settings)?;
    let pattern = pattern.map(|p| p.to_lowercase());

    for object in index.objects() {
        if let Some(ref pattern) = pattern {
            if !object.name.to_lowercase().contains(pattern) {
                continue;
            }
        }
        let type_label = index
            .object_types()
            .display(object.type_code)
            .unwrap_or("unknown");

        if json {
            println!(
                "{}",
                serde_json::json!({
                    "name": object.name,
                    "type": type_label,
                    "doc": object.doc.as_u32(),
                    "anchor": object.anchor,
                    "priority": object.priority,
                })
            );
        } else {
            println!("{}  [{}]", object.name, type_label);
        }
    }
    Ok(())
}

fn run_versions(dir: &PathBuf, settings: &SearchSettings, json: bool) -> Result<()> {
    let catalog = VersionCatalog::load_dir(dir, settings)?;

    if json {
        println!("{}", serde_json::json!({ "versions": catalog.labels() }));
        return Ok(());
    }

    for (label, index) in catalog.iter() {
        println!(
            "{:>8}  {} documents, {} symbols",
            label.to_string(),
            index.doc_count(),
            index.objects().len()
        );
    }
    Ok(())
}

fn run_where(dir: &PathBuf, symbol: &str, settings: &SearchSettings, json: bool) -> Result<()> {
    let catalog = VersionCatalog::load_dir(dir, settings)?;
    let releases = catalog.releases_with_symbol(symbol);

    if json {
        let labels: Vec<String> = releases.iter().map(|l| l.to_string()).collect();
        println!(
            "{}",
            serde_json::json!({ "symbol": symbol, "versions": labels })
        );
        return Ok(());
    }

    if releases.is_empty() {
        println!("{:?} is not documented in any release", symbol);
        return Ok(());
    }
    for label in releases {
        println!("{}", label);
    }
    Ok(())
}
