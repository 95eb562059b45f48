// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Searching records produced by an ingestion run

mod helpers;

use std::sync::Arc;

use alloy_primitives::Address;
use tempfile::TempDir;
use vagarish::{
    search, ContentResolver, FsStore, IndexerConfigBuilder, IngestionPipeline,
    MemoryContentCache, SearchQuery,
};

use helpers::{creation_log, dispute_log, evidence_log, ipfs_path, MockChain, MockGateway};

const ROOT: Address = Address::repeat_byte(0x98);
const ESCROW: Address = Address::repeat_byte(0xaa);
const CURATE: Address = Address::repeat_byte(0xbb);
const BUYER: Address = Address::repeat_byte(0x01);
const SELLER: Address = Address::repeat_byte(0x02);

/// Two disputes in different courts, three evidence items, one with a file
async fn ingested_store(temp_dir: &TempDir) -> Arc<FsStore> {
    let chain = Arc::new(
        MockChain::new(200)
            .with_log(creation_log(ROOT, 1, ESCROW, 10))
            .with_log(creation_log(ROOT, 2, CURATE, 20))
            .with_log(dispute_log(ESCROW, ROOT, 1, 0, 100, 11))
            .with_log(dispute_log(CURATE, ROOT, 2, 0, 200, 21))
            .with_log(evidence_log(ESCROW, ROOT, 100, BUYER, &ipfs_path("buyer.json"), 30))
            .with_log(evidence_log(ESCROW, ROOT, 100, SELLER, &ipfs_path("seller.json"), 31))
            .with_log(evidence_log(CURATE, ROOT, 200, SELLER, &ipfs_path("list.json"), 32))
            .with_court(1, 0)
            .with_court(2, 5),
    );
    let seller_doc = format!(
        r#"{{"title":"Shipping proof","fileURI":"{}"}}"#,
        ipfs_path("tracking.txt")
    );
    let gateway = Arc::new(
        MockGateway::new()
            .with(ipfs_path("buyer.json"), br#"{"title":"Item never arrived"}"#.to_vec())
            .with(ipfs_path("seller.json"), seller_doc.into_bytes())
            .with(ipfs_path("tracking.txt"), b"Parcel DELIVERED on Monday".to_vec())
            .with(ipfs_path("list.json"), br#"{"description":"Token is on the list"}"#.to_vec()),
    );

    let config = IndexerConfigBuilder::with_defaults()
        .root_contract(ROOT)
        .data_dir(temp_dir.path())
        .build();
    let store = Arc::new(FsStore::open(config.records_dir()).await.unwrap());
    let resolver = ContentResolver::new(gateway, Box::new(MemoryContentCache::new()));
    IngestionPipeline::new(chain, store.clone(), resolver, &config)
        .run()
        .await
        .unwrap();
    store
}

#[tokio::test]
async fn test_text_search_covers_extracted_file_text() {
    let temp_dir = TempDir::new().unwrap();
    let store = ingested_store(&temp_dir).await;

    let results = search(store.as_ref(), &SearchQuery::new().with_text("delivered"))
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].dispute.kleros_liquid_id, "1");
    assert_eq!(results[0].evidence.len(), 1);
    assert_eq!(results[0].evidence[0].by_address, SELLER);
}

#[tokio::test]
async fn test_filters_combine() {
    let temp_dir = TempDir::new().unwrap();
    let store = ingested_store(&temp_dir).await;

    let seller_in_court_5 = SearchQuery::new()
        .with_submitter(SELLER)
        .with_court_ids([5]);
    let results = search(store.as_ref(), &seller_in_court_5).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].dispute.kleros_liquid_id, "2");

    let buyer_in_court_5 = SearchQuery::new().with_submitter(BUYER).with_court_ids([5]);
    assert!(search(store.as_ref(), &buyer_in_court_5).await.unwrap().is_empty());

    let by_id = search(store.as_ref(), &SearchQuery::new().with_dispute_id("1"))
        .await
        .unwrap();
    assert_eq!(by_id.len(), 1);
    assert_eq!(by_id[0].evidence.len(), 2);
}
