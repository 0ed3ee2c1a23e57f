// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lectern::build::{corpus_fingerprint, load_snapshot, run_build};
use lectern::clock::SystemClock;
use lectern::config::Config;
use lectern::gateway::{Gateway, Headers, Params};
use lectern::search::{corpus, extract_search_terms, highlight_terms, SearchEngine};
use lectern::service::SearchService;
use lectern::types::{DateRange, QueryRequest, SearchIndex, SortMode};
use lectern::utils::parse_timestamp;

mod cli;
use cli::display::*;
use cli::{Cli, Commands};

fn main() {
    init_tracing();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", themed(RED, &[BOLD], "error:"), e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so `query` output stays pipeable. `LECTERN_LOG`
/// takes an `EnvFilter` directive; the default is `info`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("LECTERN_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Index { input, output } => run_index(&input, &output),
        Commands::Inspect { file } => inspect_snapshot(&file),
        Commands::Search {
            index,
            query,
            limit,
            tag,
            sort,
            from,
            to,
        } => {
            let sort: SortMode = sort.parse().map_err(anyhow::Error::msg)?;
            let range = DateRange {
                from: parse_cli_date(from.as_deref(), "--from")?,
                to: parse_cli_date(to.as_deref(), "--to")?,
            };
            let request = QueryRequest::new(query)
                .with_limit(limit)
                .with_tags(tag)
                .sorted_by(sort)
                .within(range);
            search_snapshot(&index, &request, &config)
        }
        Commands::Query {
            client,
            body,
            params,
        } => run_query(config, client, body, &params),
    }
}

fn parse_cli_date(raw: Option<&str>, flag: &str) -> Result<Option<chrono::DateTime<Utc>>> {
    match raw {
        None => Ok(None),
        Some(s) => parse_timestamp(s)
            .map(Some)
            .with_context(|| format!("invalid {} date '{}'", flag, s)),
    }
}

fn read_snapshot(path: &Path) -> Result<SearchIndex> {
    match load_snapshot(path) {
        Some(index) => Ok(index),
        None => bail!("no readable search index at {}", path.display()),
    }
}

fn run_index(input: &Path, output: &Path) -> Result<()> {
    if !input.is_dir() {
        bail!("input directory not found: {}", input.display());
    }

    let start = Instant::now();
    let summary = run_build(input, output, Utc::now())
        .with_context(|| format!("building index from {}", input.display()))?;
    let elapsed = start.elapsed().as_secs_f64() * 1000.0;
    let size = fs::metadata(output).map(|m| m.len()).unwrap_or(0);

    println!();
    title("LECTERN INDEX");
    section_top("OUTPUT");
    field("Documents", &summary.documents.to_string());
    field("Tags", &summary.tags.to_string());
    field("Fingerprint", &format!("{:08x}", summary.fingerprint));
    field("File", &truncate_path(&output.display().to_string(), 60));
    field("Size", &format_size(size));
    field("Elapsed", &timing_ms(elapsed));
    section_bot();
    println!();
    Ok(())
}

fn inspect_snapshot(path: &Path) -> Result<()> {
    let index = read_snapshot(path)?;
    let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    let stats = corpus::corpus_stats(&index);

    println!();
    title("LECTERN SNAPSHOT");
    section_top("FILE");
    field("Path", &truncate_path(&path.display().to_string(), 60));
    field("Size", &format_size(size));
    field("Version", &index.schema_version);
    field("Built", &index.built_at.to_rfc3339());
    field("Fingerprint", &format!("{:08x}", corpus_fingerprint(&index)));
    section_bot();

    section_top("CORPUS");
    field("Posts", &stats.total_posts.to_string());
    field("Tags", &stats.total_tags.to_string());
    field("Avg words", &stats.average_word_count.to_string());
    field("Avg reading", &format!("{} min", stats.average_reading_time));
    field("Last updated", &stats.last_updated.date_naive().to_string());
    section_bot();

    let popular = corpus::popular_tags(&index, 10);
    if !popular.is_empty() {
        section_top("POPULAR TAGS");
        for entry in &popular {
            field(&entry.tag, &entry.count.to_string());
        }
        section_bot();
    }

    let recent = corpus::recent(&index, 5);
    if !recent.is_empty() {
        section_top("RECENT");
        for doc in &recent {
            row(&format!(
                "  {}  {}",
                themed(GRAY, &[], &doc.created_at.date_naive().to_string()),
                doc.title
            ));
        }
        section_bot();
    }
    println!();
    Ok(())
}

fn search_snapshot(path: &Path, request: &QueryRequest, config: &Config) -> Result<()> {
    let index = read_snapshot(path)?;
    let engine = SearchEngine::with_threshold(Arc::new(index), config.search.threshold);
    let response = engine.search(request);
    let terms = extract_search_terms(&request.text);

    println!();
    section_top(&format!("RESULTS FOR \"{}\"", response.echoed_query));
    if response.matches.is_empty() {
        row(&format!("  {}", themed(GRAY, &[], "no matches")));
    }
    for (rank, hit) in response.matches.iter().enumerate() {
        let doc = &hit.document;
        row(&format!(
            "  {:>2}. {}  {}",
            rank + 1,
            score_value(hit.score),
            render_marks(&highlight_terms(&doc.title, &terms)),
        ));
        row(&format!(
            "            {}  {}",
            themed(GRAY, &[], &doc.created_at.date_naive().to_string()),
            tag_badges(&doc.tags)
        ));
        row(&format!("            {}", themed(BLUE, &[], &doc.url)));
    }
    section_bot();

    let mut summary = format!(
        "{} of {} matches in {}",
        response.matches.len(),
        response.total_match_count,
        timing_ms(response.elapsed_millis as f64)
    );
    if response.has_more {
        summary.push_str(" (more available)");
    }
    println!("{}", summary);
    if !response.suggested_terms.is_empty() {
        println!(
            "{} {}",
            themed(GRAY, &[], "try:"),
            response.suggested_terms.join(", ")
        );
    }
    println!();
    Ok(())
}

fn parse_params(raw: &[String]) -> Result<Params> {
    raw.iter()
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => Ok((key.to_string(), value.to_string())),
            None => bail!("expected key=value, got '{}'", pair),
        })
        .collect()
}

fn run_query(
    config: Config,
    client: Option<String>,
    body: Option<String>,
    raw_params: &[String],
) -> Result<()> {
    let service = Arc::new(SearchService::from_config(config));
    let gateway = Gateway::new(Arc::clone(&service), Arc::new(SystemClock));

    let mut headers: Headers = HashMap::new();
    if let Some(client) = client {
        headers.insert("x-forwarded-for".to_string(), client);
    }

    let response = match body {
        Some(body) => gateway.handle_post(&body, &headers),
        None => gateway.handle_get(&parse_params(raw_params)?, &headers),
    };
    service.shutdown();

    eprintln!(
        "{} cache-control: {}{}",
        status_label(response.status),
        response.cache_control,
        response
            .etag
            .as_deref()
            .map(|etag| format!("  etag: {}", etag))
            .unwrap_or_default()
    );
    println!("{}", serde_json::to_string_pretty(&response.body)?);

    if !response.is_success() {
        std::process::exit(2);
    }
    Ok(())
}
