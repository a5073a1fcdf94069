use serde::Serialize;

mod healthz;
mod metrics;
mod notify;
mod solve;

pub(super) use {healthz::healthz, metrics::metrics, notify::notify, solve::solve};

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Response<T> {
    Ok(T),
    Err(Error),
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum Kind {
    InvalidAuction,
}

#[derive(Debug, Serialize)]
pub struct Error {
    pub kind: Kind,
    pub message: String,
}
