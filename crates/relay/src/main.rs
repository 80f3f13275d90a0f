//! The prompt relay server.
//!
//! One HTTP endpoint that wraps incoming prompts in a fixed instruction
//! template, forwards them to the configured completion service, and
//! answers with the generated text (or a normalized failure payload).

#[macro_use]
extern crate tracing;

mod service;

use std::env;
use std::net::{Ipv4Addr, SocketAddr};

use codepane_gemini_model::{GeminiConfigBuilder, GeminiProvider};
use tokio::net::TcpListener;

const PORT: u16 = 3001;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let Ok(api_key) = env::var("GEMINI_API_KEY") else {
        eprintln!("GEMINI_API_KEY environment variable is not set");
        return;
    };
    let mut config = GeminiConfigBuilder::with_api_key(api_key);
    if let Ok(model) = env::var("GEMINI_MODEL") {
        config = config.with_model(model);
    }
    if let Ok(base_url) = env::var("GEMINI_BASE_URL") {
        config = config.with_base_url(base_url);
    }
    let provider = GeminiProvider::new(config.build());

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, PORT));
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            eprintln!("failed to bind {addr}: {err}");
            return;
        }
    };
    info!("server running at http://localhost:{PORT}");
    if let Err(err) = axum::serve(listener, service::router(provider)).await {
        error!("server error: {err}");
    }
}
