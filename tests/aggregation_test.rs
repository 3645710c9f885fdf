use httpmock::prelude::*;
use review_gateway::app::gateway::build_aggregator;
use review_gateway::config::{FallbackConfig, GoogleConfig, HostawayConfig};
use review_gateway::core::aggregator::ProviderOutcome;
use review_gateway::{GatewayConfig, InMemoryPublicationStore, ProviderName, ReviewGateway};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

fn hostaway(endpoint: String) -> HostawayConfig {
    HostawayConfig {
        account_id: "61148".to_string(),
        api_key: "test-key".to_string(),
        endpoint,
        timeout_seconds: Some(5),
    }
}

fn google(endpoint: String, place_ids: &[&str]) -> GoogleConfig {
    GoogleConfig {
        api_key: "gkey".to_string(),
        place_ids: place_ids.iter().map(|s| s.to_string()).collect(),
        endpoint,
        timeout_seconds: Some(1),
    }
}

fn seeded_fallback() -> FallbackConfig {
    FallbackConfig {
        seed: Some(2024),
        ..FallbackConfig::default()
    }
}

fn hostaway_body() -> serde_json::Value {
    serde_json::json!({
        "status": "success",
        "result": [
            {
                "id": 7453,
                "type": "guest-to-host",
                "status": "published",
                "rating": null,
                "publicReview": "Shane and family are wonderful!",
                "reviewCategory": [
                    {"category": "cleanliness", "rating": 10},
                    {"category": "communication", "rating": 9}
                ],
                "submittedAt": "2024-08-21 22:45:14",
                "guestName": "Shane Finkelstein",
                "listingName": "2B N1 A - 29 Shoreditch Heights"
            },
            {
                "id": 7460,
                "type": "guest-to-host",
                "status": "published",
                "rating": 6,
                "publicReview": "Bit noisy at night",
                "reviewCategory": [],
                "submittedAt": "2024-09-02 08:00:00",
                "guestName": "Mike Ross",
                "listingName": "1B Kensington Luxury Suite"
            }
        ]
    })
}

#[tokio::test]
async fn test_hostaway_forbidden_serves_full_fallback() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/v1/reviews");
        then.status(403);
    });

    let config = GatewayConfig {
        hostaway: Some(hostaway(server.url("/v1/reviews"))),
        fallback: seeded_fallback(),
        ..GatewayConfig::default()
    };

    let aggregator = build_aggregator(&config, &reqwest::Client::new());
    let report = aggregator.aggregate_with_report().await;

    api_mock.assert();
    assert!(report.used_fallback);
    assert_eq!(report.reviews.len(), 45);
    assert!(report.reviews.iter().all(|r| !r.is_published));
    assert!(report
        .reviews
        .iter()
        .all(|r| (0.0..=10.0).contains(&r.calculated_rating)));
    assert!(report
        .reviews
        .windows(2)
        .all(|w| w[0].submitted_at >= w[1].submitted_at));
    assert_eq!(
        report.providers[0].outcome,
        ProviderOutcome::Failed {
            reason: "HTTP 403 Forbidden".to_string()
        }
    );
}

#[tokio::test]
async fn test_google_failure_for_one_place_keeps_the_other() {
    let server = MockServer::start();
    let place_a = server.mock(|when, then| {
        when.method(GET).path("/details/json").query_param("place_id", "A");
        then.status(200).json_body(serde_json::json!({
            "result": {
                "name": "Shoreditch Heights",
                "reviews": [
                    {"author_name": "Ana", "rating": 5, "text": "Superb", "time": 1717200000},
                    {"author_name": "Ben", "rating": 4, "text": "Nice", "time": 1717300000}
                ]
            }
        }));
    });
    // B 逾時，相當於網路錯誤
    let place_b = server.mock(|when, then| {
        when.method(GET).path("/details/json").query_param("place_id", "B");
        then.status(200)
            .delay(Duration::from_secs(3))
            .json_body(serde_json::json!({"result": {"name": "Late", "reviews": []}}));
    });

    let config = GatewayConfig {
        google: Some(google(server.url("/details/json"), &["A", "B"])),
        fallback: seeded_fallback(),
        ..GatewayConfig::default()
    };

    let report = build_aggregator(&config, &reqwest::Client::new())
        .aggregate_with_report()
        .await;

    place_a.assert();
    place_b.assert();
    assert!(!report.used_fallback);
    assert_eq!(report.reviews.len(), 2);
    // 由新到舊
    assert_eq!(report.reviews[0].id, "google-A-1-1717300000");
    assert_eq!(report.reviews[1].id, "google-A-0-1717200000");
    assert!(report
        .reviews
        .iter()
        .all(|r| r.provider_name == ProviderName::Google));
}

#[tokio::test]
async fn test_one_provider_succeeds_while_other_fails() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/reviews");
        then.status(200).json_body(hostaway_body());
    });
    server.mock(|when, then| {
        when.method(GET).path("/details/json");
        then.status(500);
    });

    let config = GatewayConfig {
        hostaway: Some(hostaway(server.url("/v1/reviews"))),
        google: Some(google(server.url("/details/json"), &["A"])),
        fallback: seeded_fallback(),
        ..GatewayConfig::default()
    };

    let report = build_aggregator(&config, &reqwest::Client::new())
        .aggregate_with_report()
        .await;

    assert!(!report.used_fallback);
    let ids: Vec<_> = report.reviews.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["7460", "7453"]);
    assert_eq!(report.reviews[0].calculated_rating, 6.0);
    assert_eq!(report.reviews[1].calculated_rating, 9.5);
    assert_eq!(
        report.providers[0].outcome,
        ProviderOutcome::Succeeded { count: 2 }
    );
    // Google 單一 place 失敗只是零貢獻
    assert_eq!(
        report.providers[1].outcome,
        ProviderOutcome::Succeeded { count: 0 }
    );
}

#[tokio::test]
async fn test_gateway_merges_moderation_snapshot() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/reviews");
        then.status(200).json_body(hostaway_body());
    });

    let config = GatewayConfig {
        hostaway: Some(hostaway(server.url("/v1/reviews"))),
        ..GatewayConfig::default()
    };

    let store = Arc::new(InMemoryPublicationStore::with_snapshot(BTreeMap::from([(
        "7453".to_string(),
        true,
    )])));
    let gateway = ReviewGateway::new(build_aggregator(&config, &reqwest::Client::new()), store);

    let reviews = gateway.reviews().await;

    let published: BTreeMap<_, _> = reviews
        .iter()
        .map(|r| (r.id.as_str(), r.is_published))
        .collect();
    assert_eq!(published.get("7453"), Some(&true));
    assert_eq!(published.get("7460"), Some(&false));
}

#[tokio::test]
async fn test_unconfigured_gateway_never_returns_empty() {
    let gateway = ReviewGateway::from_config(&GatewayConfig::default())
        .await
        .unwrap();

    let reviews = gateway.reviews().await;
    assert_eq!(reviews.len(), 45);
}

#[tokio::test]
async fn test_hanging_google_place_with_env_config_keeps_other_place() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/details/json").query_param("place_id", "A");
        then.status(200).json_body(serde_json::json!({
            "result": {
                "name": "Shoreditch Heights",
                "reviews": [
                    {"author_name": "Ana", "rating": 5, "text": "Superb", "time": 1717200000},
                    {"author_name": "Ben", "rating": 4, "text": "Nice", "time": 1717300000}
                ]
            }
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/details/json").query_param("place_id", "B");
        then.status(200)
            .delay(Duration::from_secs(4))
            .json_body(serde_json::json!({"result": {"name": "Late", "reviews": []}}));
    });

    let endpoint = server.url("/details/json");
    let config = GatewayConfig::from_lookup(|key| match key {
        "GOOGLE_API_KEY" => Some("gkey".to_string()),
        "GOOGLE_PLACE_IDS" => Some("A,B".to_string()),
        "GOOGLE_ENDPOINT" => Some(endpoint.clone()),
        "PROVIDER_TIMEOUT_SECONDS" => Some("2".to_string()),
        _ => None,
    });
    assert_eq!(config.google.as_ref().unwrap().timeout_seconds, None);

    let report = build_aggregator(&config, &reqwest::Client::new())
        .aggregate_with_report()
        .await;

    assert!(!report.used_fallback);
    assert_eq!(report.reviews.len(), 2);
    assert_eq!(
        report.providers[0].outcome,
        ProviderOutcome::Succeeded { count: 2 }
    );
}
