use {
    crate::domain::{auction, settlement},
    chrono::Utc,
};

pub mod metrics;

pub fn solve(auction: &auction::Auction) {
    tracing::info!(
        id = ?auction.id,
        orders = auction.orders.len(),
        liquidity = auction.liquidity.len(),
        "solving auction"
    );
    metrics::get()
        .time_limit
        .observe(remaining_time(&auction.deadline));
}

pub fn solved(deadline: &auction::Deadline, found: bool) {
    tracing::info!(found, "finished solving");
    metrics::get()
        .remaining_time
        .observe(remaining_time(deadline));
    if found {
        metrics::get().solutions.inc();
    }
}

pub fn candidate(strategy: &'static str) {
    metrics::get()
        .candidates
        .with_label_values(&[strategy])
        .inc();
}

pub fn rejected(rejection: &settlement::Rejection) {
    metrics::get()
        .rejections
        .with_label_values(&[rejection.reason()])
        .inc();
}

pub fn input_error(err: &auction::InputError) {
    tracing::warn!(%err, "invalid auction");
    metrics::get().input_errors.inc();
}

pub fn malformed_auction(err: &str) {
    tracing::warn!(%err, "malformed auction");
    metrics::get().input_errors.inc();
}

fn remaining_time(deadline: &auction::Deadline) -> f64 {
    deadline
        .0
        .signed_duration_since(Utc::now())
        .num_milliseconds() as f64
        / 1000.0
}
