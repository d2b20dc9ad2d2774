//! Concurrent submission load test.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use serde_json::json;

mod common;

#[tokio::test]
async fn test_concurrent_inserts_get_unique_ids() {
    let server = common::start_server(common::test_config(false)).await;

    let num_requests = 100;
    let start = Instant::now();

    let mut handles = Vec::with_capacity(num_requests);
    for i in 0..num_requests {
        let client = server.client.clone();
        let url = server.url("/reviews/insertReview");
        handles.push(tokio::spawn(async move {
            let res = client
                .post(url)
                .json(&json!({
                    "productName": "Headphones",
                    "rateCode": (i % 5) as i32 + 1,
                    "comments": format!("review {}", i),
                }))
                .send()
                .await
                .unwrap();
            assert_eq!(res.status(), 201);
            res.text().await.unwrap()
        }));
    }

    let mut ids = HashSet::new();
    for handle in handles {
        let text = handle.await.unwrap();
        let id = text
            .trim_start_matches("Review added successfully with reviewId: ")
            .parse::<u64>()
            .unwrap();
        assert!(ids.insert(id), "duplicate review id {}", id);
    }

    let elapsed = start.elapsed();
    println!("{} concurrent inserts in {:?}", num_requests, elapsed);

    assert_eq!(ids, (1..=num_requests as u64).collect::<HashSet<_>>());
    assert!(elapsed < Duration::from_secs(30));
}
