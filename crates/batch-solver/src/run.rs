#[cfg(unix)]
use tokio::signal::unix::{self, SignalKind};
use {
    crate::{
        domain::solver,
        infra::{cli, config, observe},
    },
    clap::Parser,
    std::net::SocketAddr,
    tokio::sync::oneshot,
};

pub async fn start(args: impl IntoIterator<Item = String>) {
    run(args, None).await;
}

pub async fn run(
    args: impl IntoIterator<Item = String>,
    bind: Option<oneshot::Sender<SocketAddr>>,
) {
    let args = cli::Args::parse_from(args);
    ::observe::tracing::initialize_reentrant(
        &::observe::Config::new(&args.log).with_json_format(args.log_json),
    );
    observe::metrics::init();
    tracing::info!("running batch solver with {args:#?}");

    let config = match &args.config {
        Some(path) => config::load(path).await,
        None => solver::Config::default(),
    };
    tracing::info!(?config, "loaded configuration");

    if let Err(err) = (crate::api::Api {
        addr: args.addr,
        solver: solver::Solver::new(config),
    })
    .serve(bind, shutdown_signal())
    .await
    {
        tracing::error!(?err, "server stopped with an error");
    }
}

#[cfg(unix)]
async fn shutdown_signal() {
    // Intercept main signals for graceful shutdown.
    // Kubernetes sends sigterm, whereas locally sigint (ctrl-c) is most common.
    let (Ok(mut interrupt), Ok(mut terminate)) = (
        unix::signal(SignalKind::interrupt()),
        unix::signal(SignalKind::terminate()),
    ) else {
        tracing::error!("failed to install signal handlers");
        return std::future::pending().await;
    };
    tokio::select! {
        _ = interrupt.recv() => (),
        _ = terminate.recv() => (),
    };
}

#[cfg(windows)]
async fn shutdown_signal() {
    // We don't support signal handling on Windows.
    std::future::pending().await
}
