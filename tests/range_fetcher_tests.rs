// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Range splitting against a capped log source
//!
//! The fetcher must return exactly what an uncapped source would, in
//! ascending block order, no matter where the cap sits.

mod helpers;

use alloy_primitives::Address;
use proptest::prelude::*;
use vagarish::{BlockTarget, EventFetchError, EventKind, EvidenceSubmitted, RangeFetcher};

use helpers::{evidence_log, ipfs_path, MockChain};

const ROOT: Address = Address::repeat_byte(0x98);
const ARBITRABLE: Address = Address::repeat_byte(0xaa);
const PARTY: Address = Address::repeat_byte(0x01);

/// One evidence log per entry of `blocks`, group id = position
fn evidence_chain(head: u64, blocks: &[u64]) -> MockChain {
    MockChain::new(head).with_logs(blocks.iter().enumerate().map(|(i, block)| {
        evidence_log(
            ARBITRABLE,
            ROOT,
            i as u64,
            PARTY,
            &ipfs_path("e.json"),
            *block,
        )
    }))
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_capped_source_returns_all_logs_in_order() {
    let blocks = [3, 3, 7, 20, 21, 22, 50, 99];
    let chain = evidence_chain(100, &blocks).with_cap(2);
    let fetcher = RangeFetcher::new(chain);

    let events: Vec<EvidenceSubmitted> = fetcher
        .fetch(Some(ARBITRABLE), 0, BlockTarget::Latest)
        .await
        .unwrap();

    let got: Vec<u64> = events.iter().map(|e| e.meta.block_number).collect();
    assert_eq!(got, blocks);
    let groups: Vec<&str> = events.iter().map(|e| e.evidence_group_id.as_str()).collect();
    assert_eq!(groups, vec!["0", "1", "2", "3", "4", "5", "6", "7"]);
    assert!(fetcher.chain().get_logs_calls() > 1);
}

#[tokio::test]
async fn test_queries_stay_inside_requested_range() {
    let chain = evidence_chain(1_000, &[10, 11, 12, 500, 501, 502]).with_cap(1);
    let fetcher = RangeFetcher::new(chain);

    fetcher
        .fetch_event_range(EventKind::Evidence, Some(ARBITRABLE), 5, BlockTarget::Number(600))
        .await
        .unwrap();

    for query in fetcher.chain().seen_queries() {
        assert!(query.from_block >= 5 && query.to_block <= 600, "{query:?}");
        assert!(query.from_block <= query.to_block, "{query:?}");
        assert_eq!(query.address, Some(ARBITRABLE));
    }
}

#[tokio::test]
async fn test_same_block_overflow_is_fatal() {
    let chain = evidence_chain(10, &[4, 4, 4]).with_cap(2);
    let fetcher = RangeFetcher::new(chain);

    let err = fetcher
        .fetch_event_range(EventKind::Evidence, None, 0, BlockTarget::Latest)
        .await
        .unwrap_err();

    assert!(matches!(err, EventFetchError::RangeUnsplittable { .. }), "{err}");
}

#[tokio::test]
async fn test_other_streams_are_not_returned() {
    let chain = evidence_chain(10, &[1, 2]);
    let fetcher = RangeFetcher::new(chain);

    let logs = fetcher
        .fetch_event_range(EventKind::DisputeCreation, None, 0, BlockTarget::Latest)
        .await
        .unwrap();
    assert!(logs.is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: for any cap that fits the densest block, splitting is invisible
    #[test]
    fn prop_split_is_transparent(
        mut blocks in prop::collection::vec(0u64..200, 0..60),
        cap in 1usize..20,
        concurrent in any::<bool>(),
    ) {
        blocks.sort_unstable();
        let densest = blocks
            .chunk_by(|a, b| a == b)
            .map(<[u64]>::len)
            .max()
            .unwrap_or(0);
        let cap = cap.max(densest);

        let uncapped = runtime().block_on(async {
            RangeFetcher::new(evidence_chain(199, &blocks))
                .fetch_event_range(EventKind::Evidence, None, 0, BlockTarget::Latest)
                .await
                .unwrap()
        });
        let capped = runtime().block_on(async {
            RangeFetcher::new(evidence_chain(199, &blocks).with_cap(cap))
                .with_concurrent_split(concurrent)
                .fetch_event_range(EventKind::Evidence, None, 0, BlockTarget::Latest)
                .await
                .unwrap()
        });

        prop_assert_eq!(capped, uncapped);
    }
}
