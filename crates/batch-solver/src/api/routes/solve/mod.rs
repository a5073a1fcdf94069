use {
    super::{Error, Kind, Response},
    crate::{domain::solver::Solver, infra},
    axum::{extract::rejection::JsonRejection, http::StatusCode},
    solvers_dto::{auction::Auction, solution::Solutions},
    tracing::Instrument,
};

mod dto;

pub async fn solve(
    state: axum::extract::State<Solver>,
    auction: Result<axum::extract::Json<Auction>, JsonRejection>,
) -> (StatusCode, axum::response::Json<Response<Solutions>>) {
    let auction = match auction {
        Ok(axum::extract::Json(auction)) => auction,
        Err(rejection) => {
            let message = rejection.body_text();
            infra::observe::malformed_auction(&message);
            return invalid_auction(message);
        }
    };

    let handle_request = async {
        let auction = match dto::auction::to_domain(&auction) {
            Ok(value) => value,
            Err(err) => {
                infra::observe::input_error(&err);
                return invalid_auction(err.to_string());
            }
        };

        let solutions = match state.solve(auction).await {
            Some(settlement) => dto::solution::from_domain(&settlement),
            None => dto::solution::trivial(),
        };

        (StatusCode::OK, axum::response::Json(Response::Ok(solutions)))
    };

    handle_request
        .instrument(tracing::info_span!("/solve", auction_id = ?auction.id))
        .await
}

fn invalid_auction(message: String) -> (StatusCode, axum::response::Json<Response<Solutions>>) {
    (
        StatusCode::BAD_REQUEST,
        axum::response::Json(Response::Err(Error {
            kind: Kind::InvalidAuction,
            message,
        })),
    )
}
