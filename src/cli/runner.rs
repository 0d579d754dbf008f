//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::cli::server::{serve, ServerConfig};
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::fetch::{FetchOutcome, HttpPageSource, PageSource};
use crate::pagination::PageRequest;
use crate::types::Invoice;
use crate::view::{list_location, InvoiceList, InvoicesApp};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const BROWSE_HELP: &str = "\
Commands:
  n, next       next page
  p, prev       previous page
  <number>      open invoice by row number
  b, back       go back
  r, refresh    reload the current page
  l, location   print the current location
  h, help       show this help
  q, quit       exit";

/// One line of input in browse mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseCommand {
    Next,
    Previous,
    Open(usize),
    Back,
    Refresh,
    Location,
    Help,
    Quit,
}

impl BrowseCommand {
    /// Parse a line of input; row numbers are 1-based
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim().to_ascii_lowercase();
        let command = match input.as_str() {
            "n" | "next" => Self::Next,
            "p" | "prev" | "previous" => Self::Previous,
            "b" | "back" => Self::Back,
            "r" | "refresh" => Self::Refresh,
            "l" | "location" => Self::Location,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            other => match other.parse::<usize>() {
                Ok(row) if row > 0 => Self::Open(row - 1),
                _ => return None,
            },
        };
        Some(command)
    }
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::List {
                page,
                page_size,
                format,
            } => self.list(*page, *page_size, *format).await,
            Commands::Browse { location } => self.browse(location.as_deref()).await,
            Commands::Fixtures { port, data } => {
                serve(ServerConfig {
                    data: data.clone(),
                    port: *port,
                })
                .await
            }
        }
    }

    /// Resolve configuration: flag, then environment, then file, then defaults
    fn load_config(&self) -> Result<AppConfig> {
        let config = match &self.cli.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };
        let config = config
            .with_env_overrides()
            .with_api_url_override(self.cli.api_url.clone());
        config.validate()?;
        debug!("Using API at {}", config.api_url);
        Ok(config)
    }

    fn source(config: &AppConfig) -> Result<Arc<dyn PageSource<Invoice>>> {
        let client = config.http_client()?;
        let source = HttpPageSource::<Invoice>::new(client, config.resource.clone());
        Ok(Arc::new(source))
    }

    /// Load a single page and print it
    async fn list(
        &self,
        page: Option<u32>,
        page_size: Option<u32>,
        format: OutputFormat,
    ) -> Result<()> {
        let config = self.load_config()?;
        let request = PageRequest::new(page.unwrap_or(1), page_size.unwrap_or(config.page_size));

        let mut list = InvoiceList::mount(Self::source(&config)?, request);
        list.settle().await;

        if let Some(FetchOutcome::Failed { reason }) = list.outcome() {
            return Err(Error::Other(format!("Couldn't load invoices: {reason}")));
        }

        match format {
            OutputFormat::Pretty => print!("{}", list.render()),
            OutputFormat::Json => {
                for invoice in list.invoices() {
                    println!("{}", serde_json::to_string(invoice)?);
                }
                eprintln!(
                    "page {} of {}",
                    list.paginator().current_page(),
                    list.paginator().total_pages()
                );
            }
        }
        Ok(())
    }

    /// Interactive browsing; page changes may be issued while a page loads
    async fn browse(&self, location: Option<&str>) -> Result<()> {
        let config = self.load_config()?;
        let start = match location {
            Some(location) => location.to_string(),
            None => list_location(PageRequest::new(1, config.page_size)),
        };

        let mut app = InvoicesApp::open(Self::source(&config)?, &start);
        println!("{BROWSE_HELP}\n");
        println!("{}", app.render());

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if line.trim().is_empty() {
                        continue;
                    }
                    let Some(command) = BrowseCommand::parse(&line) else {
                        println!("Unknown command '{}', type 'h' for help", line.trim());
                        continue;
                    };
                    if command == BrowseCommand::Quit {
                        break;
                    }
                    if apply_command(&mut app, command) {
                        println!("{}", app.render());
                    }
                }
                settled = app.settle(), if app.is_loading() => {
                    if settled {
                        println!("{}", app.render());
                    }
                }
            }
        }

        Ok(())
    }
}

/// Apply a browse command; returns whether the screen should be redrawn
pub fn apply_command(app: &mut InvoicesApp, command: BrowseCommand) -> bool {
    match command {
        BrowseCommand::Next => app.next_page(),
        BrowseCommand::Previous => app.previous_page(),
        BrowseCommand::Open(index) => {
            let opened = app.open_invoice(index);
            if !opened {
                println!("No invoice at row {}", index + 1);
            }
            opened
        }
        BrowseCommand::Back => app.go_back(),
        BrowseCommand::Refresh => app.refresh(),
        BrowseCommand::Location => {
            println!("{}", app.location());
            false
        }
        BrowseCommand::Help => {
            println!("{BROWSE_HELP}");
            false
        }
        BrowseCommand::Quit => false,
    }
}
