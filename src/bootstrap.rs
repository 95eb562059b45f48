// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Wiring for the `vagarish` binary

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use alloy_provider::RootProvider;
use anyhow::Context;
use dotenvy::dotenv;
use futures::future::{LocalBoxFuture, OptionFuture};
use futures::FutureExt;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::{
    ContentResolver, DiskContentCache, FsStore, HttpGateway, IndexerConfig, IngestionPipeline,
    RpcChain,
};

type Pipeline = IngestionPipeline<RpcChain<RootProvider>, FsStore>;

/// Main entry point for the application.
///
/// Runs ingestion once, or on every `INGEST_INTERVAL_SECS` tick when set.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();

    let config = IndexerConfig::from_env().context("Invalid configuration")?;
    let pipeline = Arc::new(build_pipeline(&config).await?);

    info!(
        chain = %config.chain,
        root_contract = %config.root_contract,
        data_dir = %config.data_dir.display(),
        "Starting vagarish"
    );

    match config.ingest_interval {
        None => {
            let report = pipeline.run().await?;
            info!(%report, "Ingestion complete");
            Ok(())
        }
        Some(period) => {
            run_periodically(period, move || {
                let pipeline = pipeline.clone();
                async move {
                    match pipeline.run().await {
                        Ok(report) => info!(%report, "Ingestion complete"),
                        Err(e) => error!(error = %e, "Ingestion failed"),
                    }
                }
            })
            .await;
            Ok(())
        }
    }
}

/// Construct the pipeline and its collaborators from `config`
pub async fn build_pipeline(config: &IndexerConfig) -> anyhow::Result<Pipeline> {
    let rpc_url = config.rpc_url.as_deref().context("RPC_URL must be set")?;
    let chain = Arc::new(RpcChain::connect_http(rpc_url)?);

    let records_dir = config.records_dir();
    let store = Arc::new(
        FsStore::open(&records_dir)
            .await
            .with_context(|| format!("Failed to open store at {}", records_dir.display()))?,
    );

    let gateway = HttpGateway::new(&config.ipfs_gateway, config.content_timeout)?;
    let resolver = ContentResolver::new(
        Arc::new(gateway),
        Box::new(DiskContentCache::new(config.content_cache_dir())),
    )
    .with_retries(config.content_retries);

    Ok(IngestionPipeline::new(chain, store, resolver, config))
}

/// Outcome of one wait in [`run_periodically`]
enum Wake {
    Tick,
    Finished(std::thread::Result<()>),
}

/// Tick forever, running `job` on each tick
///
/// At most one run is in flight; a tick that lands while a run is in
/// progress is skipped. A run that panics is logged and the next tick runs
/// again. Runs are polled on the calling task, so `job` need not be `Send`.
async fn run_periodically<F, Fut>(period: Duration, mut job: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()> + 'static,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut in_flight: Option<LocalBoxFuture<'static, std::thread::Result<()>>> = None;

    loop {
        let wake = tokio::select! {
            _ = ticker.tick() => Wake::Tick,
            Some(outcome) = OptionFuture::from(in_flight.as_mut()) => Wake::Finished(outcome),
        };

        match wake {
            Wake::Tick if in_flight.is_some() => {
                warn!("Previous ingestion still running, skipping this tick");
            }
            Wake::Tick => {
                in_flight = Some(AssertUnwindSafe(job()).catch_unwind().boxed_local());
            }
            Wake::Finished(outcome) => {
                in_flight = None;
                if outcome.is_err() {
                    error!("Ingestion panicked");
                }
            }
        }
    }
}
