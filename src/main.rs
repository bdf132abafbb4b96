use std::io::{self, Write};
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use newsdeck::cli::display::{self, NO_BOOKMARKS, ONBOARDING_PAGES};
use newsdeck::cli::{Cli, Commands, Pager, PagerExit};
use newsdeck::config::{parse_sources, Config};
use newsdeck::errors::{NewsError, NewsResult};
use newsdeck::paging::{CancelToken, PagingConfig};
use newsdeck::remote::NewsApiClient;
use newsdeck::services::{NewsRepository, SearchSession};
use newsdeck::storage::{
    ArticleStore, PreferenceStore, SqliteArticleStore, SqlitePreferenceStore, SqliteStorage,
};

type Repository = NewsRepository<NewsApiClient, SqliteArticleStore>;

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run() -> NewsResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize storage
    let storage = SqliteStorage::new(&config.db_path)?;
    let preferences = SqlitePreferenceStore::new(storage.clone());
    let store = SqliteArticleStore::new(storage)?;

    show_onboarding(&preferences)?;

    match cli.command {
        Commands::Browse { sources } => {
            let sources = resolve_sources(&config, sources)?;
            cmd_browse(&config, store, sources).await?;
        }
        Commands::Search { query, sources } => {
            let sources = resolve_sources(&config, sources)?;
            cmd_search(&config, store, sources, query).await?;
        }
        Commands::Bookmarks => cmd_bookmarks(&store)?,
        Commands::Show { url } => cmd_show(&store, &url)?,
        Commands::Remove => cmd_remove(&store)?,
    }

    Ok(())
}

fn show_onboarding(preferences: &impl PreferenceStore) -> NewsResult<()> {
    if preferences.read_app_entry()? {
        return Ok(());
    }

    for (i, (title, body)) in ONBOARDING_PAGES.iter().enumerate() {
        println!("[{}/{}] {}", i + 1, ONBOARDING_PAGES.len(), title);
        println!("      {}\n", body);
    }
    preferences.save_app_entry()
}

fn resolve_sources(config: &Config, flag: Option<String>) -> NewsResult<Vec<String>> {
    let sources = match flag {
        Some(raw) => parse_sources(&raw),
        None => config.sources.clone(),
    };

    if sources.is_empty() {
        return Err(NewsError::InvalidInput("No news sources given".to_string()));
    }
    Ok(sources)
}

fn build_repository(config: &Config, store: SqliteArticleStore) -> NewsResult<Repository> {
    let client = NewsApiClient::new(config)?;
    Ok(NewsRepository::new(
        Arc::new(client),
        store,
        PagingConfig::new(config.page_size),
    ))
}

async fn cmd_browse(
    config: &Config,
    store: SqliteArticleStore,
    sources: Vec<String>,
) -> NewsResult<()> {
    let repository = build_repository(config, store)?;
    let mut pager = Pager::new(&repository, config.page_size);

    println!("Latest from {}\n", sources.join(", "));
    let feed = Arc::new(repository.browse(&sources));

    let exit = pager.run(feed, CancelToken::new()).await?;
    if let PagerExit::Search(query) = exit {
        search_loop(&repository, &mut pager, sources, query).await?;
    }
    Ok(())
}

async fn cmd_search(
    config: &Config,
    store: SqliteArticleStore,
    sources: Vec<String>,
    query: String,
) -> NewsResult<()> {
    let repository = build_repository(config, store)?;
    let mut pager = Pager::new(&repository, config.page_size);

    search_loop(&repository, &mut pager, sources, query).await?;
    Ok(())
}

async fn search_loop(
    repository: &Repository,
    pager: &mut Pager<'_, NewsApiClient, SqliteArticleStore>,
    sources: Vec<String>,
    query: String,
) -> NewsResult<()> {
    let mut session = SearchSession::new(sources);
    let mut query = query;

    loop {
        session.update_query(query);
        let (Some(feed), Some(cancel)) = (session.search(repository), session.cancel_token())
        else {
            println!("Nothing to search for.");
            return Ok(());
        };

        println!("\nResults for \"{}\"\n", session.query().trim());
        match pager.run(feed, cancel).await? {
            PagerExit::Quit => return Ok(()),
            PagerExit::Search(next) => query = next,
        }
    }
}

/// Saved articles, most recently saved first.
fn saved_articles(store: &impl ArticleStore) -> NewsResult<Vec<newsdeck::domain::Article>> {
    let stream = store.get_all()?;
    let mut articles = stream.borrow().clone();
    articles.reverse();
    Ok(articles)
}

fn cmd_bookmarks(store: &impl ArticleStore) -> NewsResult<()> {
    let articles = saved_articles(store)?;

    if articles.is_empty() {
        println!("{}", NO_BOOKMARKS);
        return Ok(());
    }

    println!("Saved articles:\n");
    for (i, article) in articles.iter().enumerate() {
        println!("{}", display::article_line(i + 1, article, false));
        println!("        {}", article.url);
    }

    Ok(())
}

fn cmd_show(store: &impl ArticleStore, url: &str) -> NewsResult<()> {
    match store.get_by_url(url)? {
        Some(article) => {
            println!("{}", display::article_details(&article));
            Ok(())
        }
        None => Err(NewsError::InvalidInput(format!("No saved article for {}", url))),
    }
}

fn cmd_remove(store: &impl ArticleStore) -> NewsResult<()> {
    let articles = saved_articles(store)?;

    if articles.is_empty() {
        println!("{}", NO_BOOKMARKS);
        return Ok(());
    }

    // Display numbered list
    println!("Select an article to remove:\n");
    for (i, article) in articles.iter().enumerate() {
        println!("{}", display::article_line(i + 1, article, false));
    }
    println!();

    // Read user input
    print!("Enter number (or 'q' to cancel): ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    if input.eq_ignore_ascii_case("q") || input.is_empty() {
        println!("Cancelled.");
        return Ok(());
    }

    let index: usize = input
        .parse()
        .map_err(|_| NewsError::InvalidInput("Invalid number".to_string()))?;

    if index == 0 || index > articles.len() {
        return Err(NewsError::InvalidInput("Number out of range".to_string()));
    }

    let article = &articles[index - 1];
    store.delete(&article.url)?;
    println!("Removed: {}", article.title);

    Ok(())
}
