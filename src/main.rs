use anyhow::{Context, Result};
use env_logger::Env;
use log::info;
use std::env;
use std::io;
use std::time::{Duration, Instant};

use sitemap_walker::sitemap::{PairingMode, Walker, WalkerConfig};

fn print_usage(program: &str) {
    eprintln!("Usage:");
    eprintln!(
        "  {} <sitemap_index_url> [--json] [--no-probe] [--legacy-pairing] [--timeout SECS]",
        program
    );
    eprintln!("  --json            Print the walk report as JSON instead of progress lines");
    eprintln!("  --no-probe        Do not issue a GET request for every page URL");
    eprintln!("  --legacy-pairing  Pair loc/lastmod with the nearest following tags");
    eprintln!("  --timeout SECS    Give up on a request after SECS seconds (default: never)");
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(|s| s.as_str()).unwrap_or("sitemap-walker");

    let mut url = None;
    let mut json = false;
    let mut builder = WalkerConfig::builder();

    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--no-probe" => builder = builder.probe_pages(false),
            "--legacy-pairing" => builder = builder.pairing(PairingMode::FollowingNode),
            "--timeout" => {
                let secs: u64 = rest
                    .next()
                    .context("--timeout needs a value")?
                    .parse()
                    .context("--timeout must be a whole number of seconds")?;
                builder = builder.timeout(Duration::from_secs(secs));
            }
            "-h" | "--help" => {
                print_usage(program);
                return Ok(());
            }
            other if url.is_none() && !other.starts_with("--") => url = Some(other.to_string()),
            other => {
                print_usage(program);
                anyhow::bail!("Unexpected argument: {}", other);
            }
        }
    }

    let Some(url) = url else {
        print_usage(program);
        anyhow::bail!("A sitemap index URL is required");
    };

    let walker = Walker::new(builder.build())?;

    let start = Instant::now();

    let report = if json {
        let report = walker
            .walk(&url, &mut io::sink())
            .await
            .with_context(|| format!("Failed to walk {}", url))?;
        println!("{}", report.to_json()?);
        report
    } else {
        walker
            .walk(&url, &mut io::stdout())
            .await
            .with_context(|| format!("Failed to walk {}", url))?
    };

    info!(
        "Visited {} sitemaps and {} page URLs in {:?}",
        report.sitemaps.len(),
        report.page_count(),
        start.elapsed()
    );

    Ok(())
}
