use tracing::Instrument;

/// Receive a status notification about a previously provided solution. The
/// solver keeps no state across auctions, so notifications are only logged.
pub async fn notify(
    notification: axum::extract::Json<serde_json::Value>,
) -> axum::http::StatusCode {
    let handle_request = async {
        let auction_id = notification.get("auctionId").cloned();
        let kind = notification
            .get("kind")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned);
        tracing::debug!(
            ?auction_id,
            ?kind,
            notification = %notification.0,
            "received notification"
        );

        axum::http::StatusCode::OK
    };

    handle_request
        .instrument(tracing::info_span!("/notify"))
        .await
}
