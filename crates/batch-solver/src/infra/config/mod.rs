use {
    crate::domain::{eth, matching, solver},
    serde::Deserialize,
    std::{fmt::Debug, path::Path, time::Duration},
    tokio::fs,
};

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct Config {
    /// Time reserved before the auction deadline for sending the response.
    #[serde(with = "humantime_serde", default = "default_deadline_buffer")]
    deadline_buffer: Duration,

    /// Maximum number of intermediate tokens in a routed path.
    #[serde(default = "default_max_hops")]
    max_hops: usize,

    /// Maximum number of bisection steps for partially fillable orders.
    #[serde(default = "default_max_partial_fill_iterations")]
    max_partial_fill_iterations: u32,

    /// Gas used by a settlement on top of its interactions.
    #[serde(default = "default_settlement_overhead")]
    settlement_overhead: u64,

    /// Whether disjoint settlements are merged.
    #[serde(default = "default_merge")]
    merge: bool,
}

fn default_deadline_buffer() -> Duration {
    Duration::from_secs(1)
}

fn default_max_hops() -> usize {
    1
}

fn default_max_partial_fill_iterations() -> u32 {
    32
}

fn default_settlement_overhead() -> u64 {
    106_391
}

fn default_merge() -> bool {
    true
}

/// Load the solver configuration from a TOML file.
///
/// # Panics
///
/// This method panics if the config is invalid or on I/O errors.
pub async fn load(path: &Path) -> solver::Config {
    let data = fs::read_to_string(path)
        .await
        .unwrap_or_else(|e| panic!("I/O error while reading {path:?}: {e:?}"));
    // Not printing detailed error because it could potentially leak secrets.
    let config = unwrap_or_log(toml::de::from_str::<Config>(&data), &path);
    config.into_domain()
}

impl Config {
    fn into_domain(self) -> solver::Config {
        solver::Config {
            deadline_buffer: self.deadline_buffer,
            engine: matching::Config {
                max_hops: self.max_hops,
                max_partial_fill_iterations: self.max_partial_fill_iterations,
                merge: self.merge,
                settlement_overhead: eth::Gas(eth::U256::from(self.settlement_overhead)),
            },
        }
    }
}

/// Unwraps result or logs a `TOML` parsing error.
fn unwrap_or_log<T, E, P>(result: Result<T, E>, path: &P) -> T
where
    E: Debug,
    P: Debug,
{
    result.unwrap_or_else(|err| {
        if std::env::var("TOML_TRACE_ERROR").is_ok_and(|v| v == "1") {
            panic!("failed to parse TOML config at {path:?}: {err:#?}")
        } else {
            panic!(
                "failed to parse TOML config at: {path:?}. Set TOML_TRACE_ERROR=1 to print \
                 parsing error but this may leak secrets."
            )
        }
    })
}
