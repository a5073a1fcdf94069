//! Small auctions with a single obvious answer.

use {
    crate::tests::{self, pool, token, uid},
    reqwest::StatusCode,
    serde_json::json,
};

const X: &str = "0x1111111111111111111111111111111111111111";
const Y: &str = "0x2222222222222222222222222222222222222222";
const Z: &str = "0x3333333333333333333333333333333333333333";
const ETH: &str = "1000000000000000000";

fn order(
    id: u8,
    (sell, sell_amount): (&str, &str),
    (buy, buy_amount): (&str, &str),
) -> serde_json::Value {
    json!({
        "uid": uid(id),
        "sellToken": sell,
        "buyToken": buy,
        "sellAmount": sell_amount,
        "buyAmount": buy_amount,
        "feeAmount": "0",
        "kind": "sell",
        "partiallyFillable": false,
        "class": "market",
    })
}

#[tokio::test]
async fn crosses_opposite_orders_directly() {
    let engine = tests::SolverEngine::new(tests::Config::None).await;

    let solution = engine
        .solve(json!({
            "id": "1",
            "tokens": {
                X: token(ETH),
                Y: token(ETH),
            },
            "orders": [
                order(1, (X, "100"), (Y, "90")),
                order(2, (Y, "100"), (X, "90")),
            ],
            "liquidity": [],
            "effectiveGasPrice": "0",
            "deadline": "2106-01-01T00:00:00.000Z",
        }))
        .await;

    assert_eq!(
        solution,
        json!({
            "solutions": [{
                "id": 0,
                "prices": {
                    X: "1",
                    Y: "1",
                },
                "trades": [
                    {
                        "kind": "fulfillment",
                        "order": uid(1),
                        "executedAmount": "100",
                    },
                    {
                        "kind": "fulfillment",
                        "order": uid(2),
                        "executedAmount": "100",
                    },
                ],
                "interactions": [],
                "gas": 106391,
            }]
        }),
    );
}

#[tokio::test]
async fn limit_price_violated() {
    let engine = tests::SolverEngine::new(tests::Config::None).await;

    // The pool pays floor(100 * 1040 / 1100) = 94 for 100.
    let solution = engine
        .solve(json!({
            "id": "1",
            "tokens": {
                X: token(ETH),
                Y: token(ETH),
            },
            "orders": [order(1, (X, "100"), (Y, "95"))],
            "liquidity": [pool("0", (X, "1000"), (Y, "1040"), "0")],
            "effectiveGasPrice": "0",
            "deadline": "2106-01-01T00:00:00.000Z",
        }))
        .await;

    assert_eq!(
        solution,
        json!({
            "solutions": [{
                "id": 0,
                "prices": {},
                "trades": [],
                "interactions": [],
                "gas": 0,
            }]
        }),
    );
}

#[tokio::test]
async fn fills_order_exactly_through_pool() {
    let engine = tests::SolverEngine::new(tests::Config::None).await;

    // The pool pays floor(50 * 1029 / 1050) = 49 for 50.
    let solution = engine
        .solve(json!({
            "id": "1",
            "tokens": {
                X: token(ETH),
                Y: token(ETH),
            },
            "orders": [order(1, (X, "50"), (Y, "49"))],
            "liquidity": [pool("0", (X, "1000"), (Y, "1029"), "0")],
            "effectiveGasPrice": "0",
            "deadline": "2106-01-01T00:00:00.000Z",
        }))
        .await;

    assert_eq!(
        solution,
        json!({
            "solutions": [{
                "id": 0,
                "prices": {
                    X: "49",
                    Y: "50",
                },
                "trades": [{
                    "kind": "fulfillment",
                    "order": uid(1),
                    "executedAmount": "50",
                }],
                "interactions": [{
                    "kind": "liquidity",
                    "internalize": false,
                    "id": "0",
                    "inputToken": X,
                    "outputToken": Y,
                    "inputAmount": "50",
                    "outputAmount": "49",
                }],
                "gas": 216391,
            }]
        }),
    );
}

#[tokio::test]
async fn rejects_order_with_unknown_token() {
    let engine = tests::SolverEngine::new(tests::Config::None).await;

    let (status, body) = engine
        .solve_raw(json!({
            "id": "1",
            "tokens": {
                X: token(ETH),
            },
            "orders": [order(1, (X, "100"), (Z, "90"))],
            "liquidity": [],
            "effectiveGasPrice": "0",
            "deadline": "2106-01-01T00:00:00.000Z",
        }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&body).unwrap(),
        json!({
            "kind": "InvalidAuction",
            "message": format!("order {} references token {Z} missing from the token map", uid(1)),
        }),
    );
}

/// Asserts that the response is a structured invalid auction error.
fn assert_invalid_auction(status: StatusCode, body: &str) {
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    let error = serde_json::from_str::<serde_json::Value>(body).unwrap();
    assert_eq!(error["kind"], "InvalidAuction");
    assert!(!error["message"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn rejects_malformed_json() {
    let engine = tests::SolverEngine::new(tests::Config::None).await;

    let (status, body) = engine
        .solve_raw(json!({
            "id": "1",
            "tokens": {},
            "orders": [{ "uid": "0x01" }],
            "liquidity": [],
            "effectiveGasPrice": "0",
            "deadline": "2106-01-01T00:00:00.000Z",
        }))
        .await;

    assert_invalid_auction(status, &body);
}

#[tokio::test]
async fn rejects_negative_amounts() {
    let engine = tests::SolverEngine::new(tests::Config::None).await;

    let (status, body) = engine
        .solve_raw(json!({
            "id": "1",
            "tokens": {
                X: token(ETH),
                Y: token(ETH),
            },
            "orders": [order(1, (X, "-100"), (Y, "90"))],
            "liquidity": [],
            "effectiveGasPrice": "0",
            "deadline": "2106-01-01T00:00:00.000Z",
        }))
        .await;

    assert_invalid_auction(status, &body);
}

#[tokio::test]
async fn solving_is_deterministic() {
    let engine = tests::SolverEngine::new(tests::Config::None).await;

    let auction = json!({
        "id": "1",
        "tokens": {
            X: token(ETH),
            Y: token(ETH),
            Z: token(ETH),
        },
        "orders": [
            order(1, (X, "100"), (Y, "90")),
            order(2, (Y, "50"), (X, "40")),
            order(3, (Z, "1000"), (Y, "900")),
        ],
        "liquidity": [
            pool("0", (X, "100000"), (Y, "100000"), "0.003"),
            pool("1", (Y, "100000"), (Z, "100000"), "0.003"),
        ],
        "effectiveGasPrice": "1",
        "deadline": "2106-01-01T00:00:00.000Z",
    });

    let (status, first) = engine.solve_raw(auction.clone()).await;
    assert_eq!(status, StatusCode::OK);
    for _ in 0..3 {
        let (_, again) = engine.solve_raw(auction.clone()).await;
        assert_eq!(first, again);
    }
}
