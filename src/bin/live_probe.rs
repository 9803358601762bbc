//! Live probe against the Guidecom catalog
//!
//! Lists the brand facets for a keyword, then runs one ranked search and prints both
//! as JSON. Developer tool for checking that selectors still match the live site.
//!
//! Usage: `live_probe <keyword> [--sort <order>] [--limit <n>] [--maker <code>]... [--config <path>]`
//! `GUIDECOM_CONFIG` names a config file when `--config` is absent.

use std::path::PathBuf;

use anyhow::{Context, bail};
use serde_json::json;
use tracing::{info, warn};

use guidecom_search::infrastructure::logging::init_logging_with_config;
use guidecom_search::{CancellationToken, CatalogService, SearchConfig, SortOrder};

const DEFAULT_LIMIT: usize = 10;

struct ProbeArgs {
    keyword: String,
    sort: SortOrder,
    limit: usize,
    makers: Vec<String>,
    config_path: Option<PathBuf>,
}

fn parse_args() -> anyhow::Result<ProbeArgs> {
    let mut args = std::env::args().skip(1);
    let mut keyword: Option<String> = None;
    let mut sort = SortOrder::PriceAsc;
    let mut limit = DEFAULT_LIMIT;
    let mut makers = Vec::new();
    let mut config_path = std::env::var_os("GUIDECOM_CONFIG").map(PathBuf::from);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--sort" => {
                let value = args.next().context("--sort needs a value")?;
                sort = value.parse()?;
            }
            "--limit" => {
                let value = args.next().context("--limit needs a value")?;
                limit = value.parse().with_context(|| format!("invalid limit: {value}"))?;
            }
            "--maker" => makers.push(args.next().context("--maker needs a value")?),
            "--config" => config_path = Some(PathBuf::from(args.next().context("--config needs a value")?)),
            flag if flag.starts_with("--") => bail!("unknown option: {flag}"),
            _ => match keyword {
                Some(ref mut existing) => {
                    existing.push(' ');
                    existing.push_str(&arg);
                }
                None => keyword = Some(arg),
            },
        }
    }

    Ok(ProbeArgs {
        keyword: keyword.context("usage: live_probe <keyword> [--sort <order>] [--limit <n>] [--maker <code>]... [--config <path>]")?,
        sort,
        limit,
        makers,
        config_path,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = parse_args()?;
    let config = SearchConfig::load(args.config_path.as_deref())?;
    init_logging_with_config(&config.logging)?;

    info!("🔎 Probing '{}' ({}, limit {})", args.keyword, args.sort, args.limit);
    let service = CatalogService::with_http_client(&config)?;

    let facets = match service.list_facets(&args.keyword).await {
        Ok(facets) => facets,
        Err(e) => {
            warn!("Facet discovery failed: {}", e);
            Vec::new()
        }
    };

    let cancel = CancellationToken::new();
    let products = service
        .search_unique(&args.keyword, args.sort, &args.makers, args.limit, &cancel)
        .await?;
    info!("✅ {} facets, {} products", facets.len(), products.len());

    let report = json!({
        "keyword": args.keyword,
        "sort": args.sort,
        "makers": args.makers,
        "facets": facets,
        "products": products,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
