//! End-to-end tests that run the solver engine HTTP server and post auctions
//! to it.

use {
    reqwest::{StatusCode, Url},
    std::io::Write,
    tokio::{sync::oneshot, task::JoinHandle},
};

mod batch;
mod scenarios;

/// A solver engine handle for E2E testing.
pub struct SolverEngine {
    url: Url,
    client: reqwest::Client,
    handle: JoinHandle<()>,
    _config: Option<tempfile::NamedTempFile>,
}

/// How the solver engine under test is configured.
pub enum Config {
    /// Run with the default configuration.
    None,
    /// Run with a configuration file with the given TOML contents.
    String(String),
}

impl SolverEngine {
    /// Starts a new solver engine on an ephemeral port.
    pub async fn new(config: Config) -> Self {
        let config = match config {
            Config::None => None,
            Config::String(contents) => {
                let mut file = tempfile::NamedTempFile::new().unwrap();
                file.write_all(contents.as_bytes()).unwrap();
                Some(file)
            }
        };

        let mut args = vec![
            "/test/batch-solver/path".to_owned(),
            "--addr=127.0.0.1:0".to_owned(),
            "--log=error".to_owned(),
        ];
        if let Some(file) = &config {
            args.push(format!("--config={}", file.path().display()));
        }

        let (bind, bind_receiver) = oneshot::channel();
        let handle = tokio::spawn(crate::run(args, Some(bind)));
        let addr = bind_receiver.await.unwrap();

        Self {
            url: format!("http://{addr}").parse().unwrap(),
            client: reqwest::Client::new(),
            handle,
            _config: config,
        }
    }

    /// Posts an auction and returns the raw response.
    pub async fn solve_raw(&self, auction: serde_json::Value) -> (StatusCode, String) {
        let response = self
            .client
            .post(self.url.join("solve").unwrap())
            .json(&auction)
            .send()
            .await
            .unwrap();
        let status = response.status();
        (status, response.text().await.unwrap())
    }

    /// Posts an auction that is expected to be solved successfully and returns
    /// the solutions.
    pub async fn solve(&self, auction: serde_json::Value) -> serde_json::Value {
        let (status, body) = self.solve_raw(auction).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        serde_json::from_str(&body).unwrap()
    }

    pub async fn notify(&self, notification: serde_json::Value) -> StatusCode {
        self.client
            .post(self.url.join("notify").unwrap())
            .json(&notification)
            .send()
            .await
            .unwrap()
            .status()
    }

    pub async fn healthz(&self) -> StatusCode {
        self.client
            .get(self.url.join("healthz").unwrap())
            .send()
            .await
            .unwrap()
            .status()
    }

    pub async fn metrics(&self) -> String {
        self.client
            .get(self.url.join("metrics").unwrap())
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap()
    }
}

impl Drop for SolverEngine {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A `0x` prefixed order UID made of a repeated byte.
pub fn uid(byte: u8) -> String {
    format!("0x{}", const_hex::encode([byte; 56]))
}

/// A token entry with the given reference price in wei.
pub fn token(reference_price: &str) -> serde_json::Value {
    serde_json::json!({
        "decimals": 18,
        "referencePrice": reference_price,
        "availableBalance": "0",
        "trusted": false,
    })
}

/// A constant product pool with a gas estimate of 110000.
pub fn pool(
    id: &str,
    (a, reserve_a): (&str, &str),
    (b, reserve_b): (&str, &str),
    fee: &str,
) -> serde_json::Value {
    serde_json::json!({
        "kind": "constantProduct",
        "id": id,
        "address": "0xffffffffffffffffffffffffffffffffffffffff",
        "router": "0xffffffffffffffffffffffffffffffffffffffff",
        "gasEstimate": "110000",
        "tokens": {
            a: { "balance": reserve_a },
            b: { "balance": reserve_b },
        },
        "fee": fee,
    })
}
