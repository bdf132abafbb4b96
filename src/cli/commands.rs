use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "newsdeck")]
#[command(about = "Paginated news reader with search and offline bookmarks")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Page through the latest articles from your sources
    Browse {
        /// Comma-separated source ids (overrides NEWS_SOURCES)
        #[arg(short, long)]
        sources: Option<String>,
    },

    /// Search articles from your sources
    Search {
        /// Text to search for
        query: String,

        /// Comma-separated source ids (overrides NEWS_SOURCES)
        #[arg(short, long)]
        sources: Option<String>,
    },

    /// List saved articles, most recent first
    Bookmarks,

    /// Show a saved article
    Show {
        /// URL of the saved article
        url: String,
    },

    /// Remove a saved article (interactive selection)
    Remove,
}
