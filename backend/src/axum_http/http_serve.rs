use crate::{
    auth::TokenKeys,
    axum_http::{default_routers, routers},
    config::config_model::DotEnvyConfig,
    usecases::payments::PaymentUrls,
};
use anyhow::Result;
use axum::{
    Extension, Router,
    http::{
        HeaderName, Method, Request,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use crates::{
    infra::db::postgres::postgres_connection::PgPoolSquad, payments::mayar_client::MayarClient,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info, info_span};

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn app(config: &DotEnvyConfig, db_pool: Arc<PgPoolSquad>) -> Result<Router> {
    let token_keys = Arc::new(TokenKeys::new(
        &config.auth.jwt_secret,
        config.auth.token_ttl_seconds,
    ));
    let mayar_client = Arc::new(MayarClient::new(
        config.mayar.api_key.clone(),
        config.mayar.base_url.clone(),
    ));
    let payment_urls = PaymentUrls::new(&config.urls.frontend_url, &config.urls.backend_url);

    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    let app = Router::new()
        .fallback(default_routers::not_found)
        .merge(routers::users::routes(
            Arc::clone(&db_pool),
            Arc::clone(&token_keys),
        ))
        .merge(routers::fields::routes(Arc::clone(&db_pool)))
        .merge(routers::bookings::routes(Arc::clone(&db_pool)))
        .nest(
            "/payment",
            routers::payments::routes(Arc::clone(&db_pool), mayar_client, payment_urls),
        )
        .nest("/admin", routers::admin_bookings::routes(Arc::clone(&db_pool)))
        .route("/health-check", get(default_routers::health_check))
        .layer(Extension(token_keys))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.backend_server.timeout,
        )))
        .layer(RequestBodyLimitLayer::new(
            (config.backend_server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::PUT,
                    Method::DELETE,
                ])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(Any), // TODO restrict to FRONTEND_URL once the production domain is fixed
        )
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let request_id = request
                    .extensions()
                    .get::<RequestId>()
                    .and_then(|id| id.header_value().to_str().ok())
                    .unwrap_or("-");

                info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid));

    Ok(app)
}

pub async fn start(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Result<()> {
    let app = app(&config, db_pool)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.backend_server.port));
    let listener = TcpListener::bind(addr).await?;

    info!(
        port = config.backend_server.port,
        stage = %config.stage,
        "Server is running"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
