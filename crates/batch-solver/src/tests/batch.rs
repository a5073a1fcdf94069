//! All orders of a token pair settled together through one pool.

use {
    crate::tests::{self, pool, token, uid},
    serde_json::json,
};

const A: &str = "0x000000000000000000000000000000000000000a";
const B: &str = "0x000000000000000000000000000000000000000b";

#[tokio::test]
async fn sell_orders_on_one_side() {
    let engine = tests::SolverEngine::new(tests::Config::None).await;

    let solution = engine
        .solve(json!({
            "id": "1",
            "tokens": {
                A: token("1000000000000000000"),
                B: token("1000000000000000000"),
            },
            "orders": [
                {
                    "uid": uid(1),
                    "sellToken": A,
                    "buyToken": B,
                    "sellAmount": "40000000000000000000",
                    "buyAmount": "30000000000000000000",
                    "feePolicies": [],
                    "kind": "sell",
                    "partiallyFillable": false,
                    "class": "market",
                },
                {
                    "uid": uid(2),
                    "sellToken": A,
                    "buyToken": B,
                    "sellAmount": "100000000000000000000",
                    "buyAmount": "90000000000000000000",
                    "feePolicies": [],
                    "kind": "sell",
                    "partiallyFillable": false,
                    "class": "market",
                },
            ],
            "liquidity": [pool(
                "0",
                (A, "1000000000000000000000000"),
                (B, "1000000000000000000000000"),
                "0.003",
            )],
            "effectiveGasPrice": "15000000000",
            "deadline": "2106-01-01T00:00:00.000Z",
        }))
        .await;

    assert_eq!(
        solution,
        json!({
            "solutions": [{
                "id": 0,
                "prices": {
                    A: "139560520142598496101",
                    B: "140000000000000000000",
                },
                "trades": [
                    {
                        "kind": "fulfillment",
                        "order": uid(1),
                        "executedAmount": "40000000000000000000",
                    },
                    {
                        "kind": "fulfillment",
                        "order": uid(2),
                        "executedAmount": "100000000000000000000",
                    },
                ],
                "interactions": [{
                    "kind": "liquidity",
                    "internalize": false,
                    "id": "0",
                    "inputToken": A,
                    "outputToken": B,
                    "inputAmount": "139999999999999999999",
                    "outputAmount": "139560520142598496100",
                }],
                "gas": 216391,
            }]
        }),
    );
}
