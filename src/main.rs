mod db;
mod error;
mod providers;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use providers::Dispatcher;
use routes::auth::DevUser;
use services::intent::KeywordClassifier;

const DEFAULT_PORT: u16 = 5000;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let pool = db::init_pool(&database_url)
        .await
        .expect("database init failed");
    let dispatcher = Dispatcher::from_env().expect("provider configuration invalid");
    let classifier = KeywordClassifier::standard().expect("intent vocabulary failed to compile");
    let dev_user = DevUser::from_env();
    tracing::info!(user_id = %dev_user.id, "requests attributed to dev user");

    let state = state::AppState::new(pool, Arc::new(dispatcher), Arc::new(classifier), dev_user);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "funmi gateway listening");
    axum::serve(listener, app).await.expect("server failed");
}
