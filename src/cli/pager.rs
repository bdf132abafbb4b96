use std::future::Future;
use std::io::{self, Write};
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::cli::display;
use crate::errors::{NewsError, NewsResult};
use crate::paging::CancelToken;
use crate::remote::RemoteNewsSource;
use crate::services::{NewsFeed, NewsRepository};
use crate::storage::traits::ArticleStore;

/// A line typed at the pager prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagerCommand {
    Next,
    /// Toggle the bookmark of the article with this (1-based) number.
    Toggle(usize),
    Retry,
    Quit,
    Search(String),
}

impl PagerCommand {
    pub fn parse(input: &str) -> NewsResult<Self> {
        let input = input.trim();

        if let Some(query) = input.strip_prefix('/') {
            return Ok(PagerCommand::Search(query.trim().to_string()));
        }

        match input.to_ascii_lowercase().as_str() {
            "" | "m" => Ok(PagerCommand::Next),
            "r" => Ok(PagerCommand::Retry),
            "q" => Ok(PagerCommand::Quit),
            other => other
                .parse()
                .map(PagerCommand::Toggle)
                .map_err(|_| NewsError::InvalidInput(format!("Unknown command: {}", input))),
        }
    }
}

/// How a pager session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagerExit {
    Quit,
    Search(String),
}

/// Interactive, screen-at-a-time reader over a feed.
///
/// Ctrl-C is caught for the whole life of the pager: it cancels a load that
/// is running, and quits when the pager is waiting at the prompt.
pub struct Pager<'a, R: RemoteNewsSource + ?Sized, S: ArticleStore> {
    repository: &'a NewsRepository<R, S>,
    screen_size: usize,
    input: Lines<BufReader<Stdin>>,
    interrupts: mpsc::UnboundedReceiver<()>,
    listener: JoinHandle<()>,
}

impl<'a, R: RemoteNewsSource + ?Sized + 'static, S: ArticleStore> Pager<'a, R, S> {
    /// Must be called from within the tokio runtime.
    pub fn new(repository: &'a NewsRepository<R, S>, screen_size: usize) -> Self {
        let (interrupts, listener) = listen_for_ctrl_c();
        Self {
            repository,
            screen_size: screen_size.max(1),
            input: BufReader::new(tokio::io::stdin()).lines(),
            interrupts,
            listener,
        }
    }

    pub async fn run(&mut self, feed: Arc<NewsFeed<R>>, cancel: CancelToken) -> NewsResult<PagerExit> {
        let mut cancel = cancel;
        let mut shown: usize = 0;
        let mut advance = true;

        loop {
            if advance {
                let end = shown.saturating_add(self.screen_size);
                interruptible(&mut self.interrupts, &cancel, async {
                    for index in shown..end {
                        if feed.access(index, &cancel).await.is_none() {
                            break;
                        }
                    }
                })
                .await;

                let snapshot = feed.snapshot();
                let end = end.min(snapshot.len());
                let start = shown.min(end);
                for (index, article) in snapshot.items[start..end].iter().enumerate() {
                    let saved = self.repository.get_by_url(&article.url)?.is_some();
                    println!("{}", display::article_line(start + index + 1, article, saved));
                }
                shown = end;

                if let Some(status) = display::status_line(&snapshot) {
                    println!("\n{}", status);
                }
            }
            advance = false;

            if cancel.is_cancelled() {
                println!("Cancelled.");
                cancel = CancelToken::new();
            }

            print!("\n[Enter] more, [number] bookmark, [r]etry, [/text] search, [q]uit: ");
            io::stdout().flush()?;

            let Some(line) = prompt_line(&mut self.input, &mut self.interrupts).await? else {
                println!();
                return Ok(PagerExit::Quit);
            };

            match PagerCommand::parse(&line) {
                Ok(PagerCommand::Next) => advance = true,
                Ok(PagerCommand::Quit) => return Ok(PagerExit::Quit),
                Ok(PagerCommand::Search(query)) => return Ok(PagerExit::Search(query)),
                Ok(PagerCommand::Retry) => {
                    let outcome =
                        interruptible(&mut self.interrupts, &cancel, feed.retry(&cancel)).await;
                    tracing::debug!(?outcome, "retry finished");
                    advance = true;
                }
                Ok(PagerCommand::Toggle(number)) => {
                    match number.checked_sub(1).filter(|i| *i < shown).and_then(|i| feed.get(i)) {
                        Some(article) => {
                            let action = self.repository.toggle_bookmark(&article)?;
                            println!("{}: {}", action, article.title);
                        }
                        None => println!("No article number {} on screen.", number),
                    }
                }
                Err(e) => println!("{}", e),
            }
        }
    }
}

impl<R: RemoteNewsSource + ?Sized, S: ArticleStore> Drop for Pager<'_, R, S> {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

/// Forward every Ctrl-C to the returned channel until the task is aborted.
fn listen_for_ctrl_c() -> (mpsc::UnboundedReceiver<()>, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let listener = tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if tx.send(()).is_err() {
                break;
            }
        }
    });
    (rx, listener)
}

/// Run `work` to completion, cancelling `cancel` on each interrupt that
/// arrives meanwhile.
async fn interruptible<F: Future>(
    interrupts: &mut mpsc::UnboundedReceiver<()>,
    cancel: &CancelToken,
    work: F,
) -> F::Output {
    tokio::pin!(work);
    loop {
        tokio::select! {
            output = &mut work => return output,
            Some(()) = interrupts.recv() => cancel.cancel(),
        }
    }
}

/// Next line typed at the prompt. `None` on end of input or an interrupt.
async fn prompt_line<B: AsyncBufRead + Unpin>(
    input: &mut Lines<B>,
    interrupts: &mut mpsc::UnboundedReceiver<()>,
) -> NewsResult<Option<String>> {
    tokio::select! {
        biased;
        Some(()) = interrupts.recv() => Ok(None),
        line = input.next_line() => Ok(line?),
    }
}
