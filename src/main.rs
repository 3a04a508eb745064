use std::env;
use std::sync::Arc;

use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, EnvFilter};

use slabscan::cache::MarketCache;
use slabscan::catalog::Catalog;
use slabscan::config::Config;
use slabscan::market::{
    discover_slabs, slab_to_sticker_name, CancelFlag, EngineConfig, HttpTransport, MarketClient,
    ProxyPool, RequestEngine,
};
use slabscan::scanner::{ScanEvent, Scanner};

const DEFAULT_CONFIG_PATH: &str = "configs/config.yaml";

fn parse_config_path() -> String {
    for arg in env::args().skip(1) {
        if let Some(path) = arg.strip_prefix("--config=") {
            return path.to_string();
        }
    }
    DEFAULT_CONFIG_PATH.to_string()
}

fn init_tracing(log_level: Option<&str>) {
    let level = match log_level {
        Some("debug") => Level::DEBUG,
        Some("info") => Level::INFO,
        Some("warn") | Some("warning") => Level::WARN,
        Some("error") => Level::ERROR,
        Some("trace") => Level::TRACE,
        _ => Level::INFO,
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

fn build_engine(config: &Config, cancel: CancelFlag) -> Option<RequestEngine> {
    let transport = match HttpTransport::new(&config.market) {
        Ok(transport) => transport,
        Err(e) => {
            error!(error = %e, "Failed to build http transport");
            return None;
        }
    };

    let pool = ProxyPool::from_specs(&config.market.proxies);
    if pool.len() < config.market.proxies.len() {
        warn!(
            configured = config.market.proxies.len(),
            usable = pool.len(),
            "Some proxy specs were malformed and skipped"
        );
    }

    Some(RequestEngine::new(
        Arc::new(transport),
        pool,
        EngineConfig::from_market(&config.market),
        cancel,
    ))
}

#[tokio::main]
async fn main() {
    let config_path = parse_config_path();
    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            return;
        }
    };

    init_tracing(config.app.log_level.as_deref());
    info!(config = %config_path, app = %config.app.name, "Starting");

    if env::args().any(|arg| arg == "--discover") {
        run_discovery(&config).await;
        return;
    }

    run_scan(&config).await;
}

/// Scans the catalog pairs, logging every price event, until completion or
/// Ctrl-C.
async fn run_scan(config: &Config) {
    let catalog = match Catalog::load(&config.catalog) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!(error = %e, "Failed to load catalog");
            return;
        }
    };
    let pairs = catalog.filter_pairs(&config.scan);
    info!(
        total = catalog.pairs.len(),
        selected = pairs.len(),
        "Catalog loaded"
    );
    if pairs.is_empty() {
        warn!("No pairs match the configured filters");
        return;
    }

    let cache = Arc::new(MarketCache::open(&config.cache.path));
    info!(path = %config.cache.path, entries = cache.len(), "Cache opened");

    let cancel = CancelFlag::new();
    let Some(engine) = build_engine(config, cancel.clone()) else {
        return;
    };
    let client = Arc::new(MarketClient::new(engine, cache.clone(), &config.market));
    let scanner = Scanner::new(client, &config.scan);

    let mut handle = match scanner.start(pairs, cancel.clone()) {
        Ok(handle) => handle,
        Err(e) => {
            error!(error = %e, "Failed to start scan");
            return;
        }
    };

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Stop requested");
            cancel.cancel();
        }
    });

    while let Some(event) = handle.events.recv().await {
        match event {
            ScanEvent::Progress { message } => info!("{}", message),
            ScanEvent::IdResolved {
                index,
                side,
                item_nameid,
            } => {
                info!(index = index, side = %side, item_nameid = %item_nameid, "Id resolved");
            }
            ScanEvent::PriceUpdated { index, side, price } => {
                info!(
                    index = index,
                    side = %side,
                    buy = ?price.buy,
                    sell = ?price.sell,
                    "Price updated"
                );
            }
            ScanEvent::PriceFailed {
                index,
                side,
                message,
            } => {
                warn!(index = index, side = %side, "{}", message);
            }
            ScanEvent::PairCompleted { result } => {
                info!(
                    index = result.pair.index,
                    slab = %result.pair.slab_name,
                    difference = ?result.difference,
                    flag = ?result.flag,
                    "Pair completed"
                );
            }
            ScanEvent::Finished => {
                info!("Scan finished");
                break;
            }
        }
    }

    handle.join().await;
    if let Err(e) = cache.flush() {
        warn!(error = %e, "Failed to flush cache");
    }
}

/// Walks the marketplace search pages and logs every slab listing found with
/// its derived sticker name.
async fn run_discovery(config: &Config) {
    let cancel = CancelFlag::new();
    let Some(engine) = build_engine(config, cancel.clone()) else {
        return;
    };

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Stop requested");
            cancel.cancel();
        }
    });

    match discover_slabs(&engine, &config.market).await {
        Ok(slabs) => {
            for slab in &slabs {
                info!(
                    slab = %slab.name,
                    sticker = %slab_to_sticker_name(&slab.name),
                    sell_price = %slab.sell_price,
                    "Slab found"
                );
            }
            info!(count = slabs.len(), "Discovery finished");
        }
        Err(e) => error!(error = %e, "Discovery failed"),
    }
}
