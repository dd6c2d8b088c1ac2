pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "spicerack")]
#[command(about = "Spicerack - recipe search service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the search server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, env = "HOST")]
        host: Option<String>,
    },

    /// Search for recipes against a running server
    Search {
        /// Search query
        query: String,

        /// Filter by exact category
        #[arg(long)]
        category: Option<String>,

        /// Sort mode (relevance|newest|oldest|rating|popular)
        #[arg(long)]
        sort: Option<String>,

        /// Result page
        #[arg(long)]
        page: Option<usize>,

        /// Results per page
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Run database migrations
    Migrate,
}
