mod graphql;
mod links;
mod output;
mod parser;
mod scrape;

use std::path::Path;
use std::time::Instant;

use clap::{Parser, Subcommand};

const INPUT_PATH: &str = "links.txt";
const OUTPUT_PATH: &str = "output/leetcode_topics.csv";
const PROBLEM_URL_PREFIX: &str = "https://leetcode.com/problems/";

#[derive(Parser)]
#[command(name = "lc_topics", about = "LeetCode problem topic scraper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape topics for every link in links.txt
    Run {
        /// Max links to process (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Resolve a single problem and print its topics
    Lookup {
        /// Problem slug (e.g. "two-sum") or full problem URL
        problem: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { limit } => {
            let mut problems = links::load_links(Path::new(INPUT_PATH))?;
            if let Some(n) = limit {
                problems.truncate(n);
            }
            if problems.is_empty() {
                println!("No links to process. Add problem URLs to {} first.", INPUT_PATH);
                return Ok(());
            }
            println!("Starting to process {} links...", problems.len());

            let client = scrape::http_client()?;
            let stats = scrape::run(&client, problems, Path::new(OUTPUT_PATH)).await?;
            println!(
                "Done: {} processed ({} with topics, {} not found, {} errors).",
                stats.total, stats.found, stats.not_found, stats.errors
            );
            println!("Results saved to: {}", OUTPUT_PATH);
            Ok(())
        }
        Commands::Lookup { problem } => {
            let problem = if problem.contains('/') {
                links::ProblemRef::from_url(&problem)
            } else {
                links::ProblemRef::from_url(&format!("{}{}", PROBLEM_URL_PREFIX, problem))
            };
            let client = scrape::http_client()?;
            let record = scrape::resolve_topics(&client, &problem).await;
            println!("{}: {}", record.problem_id, record.topics);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
