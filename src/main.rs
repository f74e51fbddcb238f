use anyhow::Result;
use clap::{Parser, Subcommand};

use reading_feed::environment::Settings;
use reading_feed::feed::{create_http_client, CachePolicy};
use reading_feed::logging;
use reading_feed::reading::ReadingList;
use reading_feed::web;

#[derive(Parser)]
#[clap(name = "reading-feed", about = "Serve a reading list from a read-later JSON export")]
struct Cli {
    /// Feed URL (overrides READING_FEED_URL)
    #[clap(long, global = true)]
    feed_url: Option<String>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Port to listen on (overrides PORT)
        #[clap(short, long)]
        port: Option<u16>,
    },

    /// Print the normalized reading list as JSON
    Reading {
        /// Revalidate the feed instead of accepting a cached copy
        #[clap(short, long)]
        live: bool,

        /// Skip Open-Graph enrichment
        #[clap(long)]
        no_enrich: bool,
    },

    /// Print the RSS document
    Rss,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::configure_logging();

    let cli = Cli::parse();

    let mut settings = Settings::from_env();
    if let Some(url) = cli.feed_url {
        settings.feed_url = Some(url);
    }

    let client = create_http_client(&settings.user_agent)?;
    let port = settings.port;
    let list = ReadingList::new(client, settings);

    match cli.command {
        Commands::Serve { port: override_port } => {
            web::serve(list, override_port.unwrap_or(port)).await?;
        }
        Commands::Reading { live, no_enrich } => {
            let policy = if live {
                CachePolicy::NoCache
            } else {
                list.hourly_policy()
            };
            let articles = list.articles(policy, !no_enrich).await?;
            println!("{}", serde_json::to_string_pretty(&articles)?);
        }
        Commands::Rss => {
            println!("{}", list.rss().await?);
        }
    }

    Ok(())
}
