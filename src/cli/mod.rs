// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the lectern command-line interface.
//!
//! Four subcommands: `index` builds a JSON snapshot from a posts directory,
//! `inspect` summarizes a snapshot, `search` queries one directly, and
//! `query` pushes a single request through the full gateway (rate limit,
//! validation, cache, analytics) the way an HTTP handler would.

pub mod display;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "lectern",
    about = "Fuzzy full-text search for a folder of blog posts",
    version
)]
pub struct Cli {
    /// TOML config file (defaults apply to anything it leaves out)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a search index snapshot from a directory of posts
    Index {
        /// Directory containing .md / .mdx posts
        #[arg(short, long)]
        input: PathBuf,

        /// Snapshot file to write
        #[arg(short, long, default_value = "public/search-index.json")]
        output: PathBuf,
    },

    /// Summarize a search index snapshot
    Inspect {
        /// Path to the snapshot JSON
        file: PathBuf,
    },

    /// Search a snapshot and display results
    Search {
        /// Path to the snapshot JSON
        index: PathBuf,

        /// Search query
        query: String,

        /// Maximum number of results to return
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Only posts carrying this tag (repeatable, all must match)
        #[arg(short, long)]
        tag: Vec<String>,

        /// relevance, date or title
        #[arg(short, long, default_value = "relevance")]
        sort: String,

        /// Earliest creation date (inclusive)
        #[arg(long)]
        from: Option<String>,

        /// Latest creation date (inclusive)
        #[arg(long)]
        to: Option<String>,
    },

    /// Send one request through the gateway and print the JSON response
    Query {
        /// Client address, as an x-forwarded-for header would carry it
        #[arg(long)]
        client: Option<String>,

        /// POST this JSON body instead of a GET
        #[arg(long)]
        body: Option<String>,

        /// GET parameters as key=value (e.g. action=autocomplete q=rea)
        params: Vec<String>,
    },
}
