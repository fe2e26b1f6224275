// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::ErrorBody,
    models::{
        AirdropRequest, BalanceResponse, GenerateWalletRequest, GenerateWalletsRequest,
        MnemonicResponse, SendTransactionRequest, SignatureResponse, Wallet, WalletType,
        WalletsResponse,
    },
    state::AppState,
    validation::FieldViolation,
};

pub mod airdrop;
pub mod balance;
pub mod extract;
pub mod health;
pub mod mnemonic;
pub mod rate_limit;
pub mod transfer;
pub mod wallets;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/generate-mnemonic", post(mnemonic::generate_mnemonic))
        .route("/generate-wallet", post(wallets::generate_wallet))
        .route("/generate-wallets", post(wallets::generate_wallets))
        .route("/request-airdrop", post(airdrop::request_airdrop))
        .route("/send-transaction", post(transfer::send_transaction))
        .route("/get-balance/{public_key}", get(balance::get_balance))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit_middleware,
        ));

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    Router::new()
        .merge(api_routes)
        .merge(health_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CorsLayer::permissive()),
        )
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HD Wallet Server",
        description = "Stateless BIP-39 / HD wallet generation for Solana and Ethereum"
    ),
    paths(
        mnemonic::generate_mnemonic,
        wallets::generate_wallet,
        wallets::generate_wallets,
        airdrop::request_airdrop,
        transfer::send_transaction,
        balance::get_balance,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            Wallet,
            WalletType,
            MnemonicResponse,
            GenerateWalletRequest,
            GenerateWalletsRequest,
            WalletsResponse,
            AirdropRequest,
            SendTransactionRequest,
            SignatureResponse,
            BalanceResponse,
            ErrorBody,
            FieldViolation,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Wallets", description = "Mnemonic generation and key derivation"),
        (name = "Network", description = "Balances, airdrops and transfers"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::{
        blockchain::{
            testing::{stub_registry, StubGateway},
            ChainError, ChainRegistry,
        },
        config::Config,
        wallet::mnemonic as phrases,
    };

    const ABANDON_ABOUT: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
    const SOL_ADDRESS: &str = "HAgk14JpMQLgt6rVgv7cBQFJWFto5Dqxi472uT3DKpqk";
    const ETH_ADDRESS: &str = "0x9858EfFD232B4033E47d90003D41EC34EcaEda94";

    fn app_with(registry: ChainRegistry, config: Config) -> Router {
        router(AppState::new(&config, registry))
    }

    fn app() -> (Router, Arc<StubGateway>, Arc<StubGateway>) {
        let (registry, solana, ethereum) = stub_registry();
        (app_with(registry, Config::default()), solana, ethereum)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn call(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn transfer_body(amount: Value) -> Value {
        json!({
            "fromPublicKey": SOL_ADDRESS,
            "toPublicKey": "11111111111111111111111111111112",
            "amount": amount,
            "privateKey": "secret",
        })
    }

    #[tokio::test]
    async fn generate_mnemonic_returns_valid_phrase() {
        let (app, _, _) = app();
        let (status, body) = call(&app, post_json("/generate-mnemonic", json!({}))).await;
        assert_eq!(status, StatusCode::OK);

        let phrase = body["mnemonic"].as_str().unwrap();
        assert_eq!(phrase.split(' ').count(), 12);
        assert!(phrases::validate(phrase));
    }

    #[tokio::test]
    async fn generate_wallet_matches_reference_vectors() {
        let (app, _, _) = app();

        let (status, body) = call(
            &app,
            post_json(
                "/generate-wallet",
                json!({ "mnemonic": ABANDON_ABOUT, "walletType": "solana", "index": 0 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let wallet = &body["wallets"][0];
        assert_eq!(wallet["path"], "m/44'/501'/0'/0'");
        assert_eq!(wallet["publicKey"], SOL_ADDRESS);
        assert_eq!(wallet["type"], "solana");

        let (status, body) = call(
            &app,
            post_json(
                "/generate-wallet",
                json!({ "mnemonic": ABANDON_ABOUT, "walletType": "ethereum", "index": 0 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["wallets"][0]["publicKey"], ETH_ADDRESS);
        assert_eq!(body["wallets"][0]["path"], "m/44'/60'/0'/0/0");
    }

    #[tokio::test]
    async fn invalid_mnemonics_are_rejected() {
        let (app, _, _) = app();
        let eleven_words = ABANDON_ABOUT.rsplit_once(' ').unwrap().0;
        let bad_word = ABANDON_ABOUT.replace("about", "aboot");

        for mnemonic in [eleven_words.to_string(), bad_word] {
            let (status, body) = call(
                &app,
                post_json(
                    "/generate-wallet",
                    json!({ "mnemonic": mnemonic, "walletType": "solana", "index": 0 }),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "Invalid mnemonic phrase");
        }
    }

    #[tokio::test]
    async fn missing_fields_are_listed() {
        let (app, _, _) = app();
        let (status, body) = call(&app, post_json("/generate-wallet", json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation failed");

        let fields: Vec<_> = body["details"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["mnemonic", "walletType", "index"]);
    }

    #[tokio::test]
    async fn generate_wallets_enumerates_indices() {
        let (app, _, _) = app();
        let (status, body) = call(
            &app,
            post_json(
                "/generate-wallets",
                json!({ "mnemonic": ABANDON_ABOUT, "walletCount": 3 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let paths: Vec<_> = body["wallets"]
            .as_array()
            .unwrap()
            .iter()
            .map(|w| w["path"].as_str().unwrap())
            .collect();
        assert_eq!(paths, vec!["m/44'/501'/0'/0'", "m/44'/501'/1'/0'", "m/44'/501'/2'/0'"]);
        assert_eq!(body["wallets"][0]["publicKey"], SOL_ADDRESS);
    }

    #[tokio::test]
    async fn non_positive_amount_never_reaches_the_chain() {
        let (app, solana, _) = app();
        for amount in [json!(0), json!(-1), json!("0.0")] {
            let (status, body) =
                call(&app, post_json("/send-transaction", transfer_body(amount))).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["details"][0]["field"], "amount");
        }
        assert_eq!(solana.network_calls(), 0);
    }

    #[tokio::test]
    async fn send_transaction_submits_smallest_units() {
        let (app, solana, _) = app();
        let (status, body) =
            call(&app, post_json("/send-transaction", transfer_body(json!(0.5)))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["signature"], "sig-solana-500000000");
        assert_eq!(solana.network_calls(), 1);
    }

    #[tokio::test]
    async fn small_numeric_amounts_are_accepted() {
        let (app, solana, _) = app();
        for (amount, signature) in [
            (json!(1e-7), "sig-solana-100"),
            (json!(0.0000001), "sig-solana-100"),
            (json!(0.00001), "sig-solana-10000"),
            (json!(1e-9), "sig-solana-1"),
        ] {
            let (status, body) =
                call(&app, post_json("/send-transaction", transfer_body(amount))).await;
            assert_eq!(status, StatusCode::OK, "{body}");
            assert_eq!(body["signature"], signature);
        }
        assert_eq!(solana.network_calls(), 4);

        let (status, body) =
            call(&app, post_json("/send-transaction", transfer_body(json!(1e-10)))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"][0]["field"], "amount");
        assert_eq!(solana.network_calls(), 4);
    }

    #[tokio::test]
    async fn balance_uses_full_precision() {
        let (app, _, _) = app();

        let (status, body) = call(&app, get(&format!("/get-balance/{SOL_ADDRESS}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["balance"], "1.000000000");
        assert_eq!(body["raw"], "1000000000");
        assert_eq!(body["walletType"], "solana");

        let (status, body) = call(
            &app,
            get(&format!("/get-balance/{ETH_ADDRESS}?walletType=ethereum")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["balance"], "2.500000000000000000");
    }

    #[tokio::test]
    async fn balance_rejects_bad_address_and_chain() {
        let (app, solana, _) = app();

        let (status, body) = call(&app, get("/get-balance/not-an-address")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"][0]["field"], "publicKey");

        let (status, body) =
            call(&app, get(&format!("/get-balance/{SOL_ADDRESS}?walletType=bitcoin"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"][0]["field"], "walletType");

        assert_eq!(solana.network_calls(), 0);
    }

    #[tokio::test]
    async fn airdrop_is_solana_only() {
        let (app, _, ethereum) = app();

        let (status, body) = call(
            &app,
            post_json("/request-airdrop", json!({ "publicKey": SOL_ADDRESS })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["signature"], format!("airdrop-{SOL_ADDRESS}"));

        let (status, body) = call(
            &app,
            post_json(
                "/request-airdrop",
                json!({ "publicKey": ETH_ADDRESS, "walletType": "ethereum" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("ethereum"));
        assert_eq!(ethereum.network_calls(), 0);
    }

    #[tokio::test]
    async fn upstream_failures_are_masked() {
        let registry = ChainRegistry::new().with_gateway(Arc::new(
            StubGateway::new(WalletType::Solana)
                .failing(|| ChainError::RemoteUnavailable("connect to 10.1.2.3 refused".into())),
        ));
        let app = app_with(registry, Config::default());

        let (status, body) = call(&app, get(&format!("/get-balance/{SOL_ADDRESS}"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], crate::error::UPSTREAM_FAILURE);
    }

    #[tokio::test]
    async fn insufficient_funds_is_a_client_error() {
        let registry = ChainRegistry::new().with_gateway(Arc::new(
            StubGateway::new(WalletType::Solana)
                .failing(|| ChainError::InsufficientFunds("insufficient lamports".into())),
        ));
        let app = app_with(registry, Config::default());

        let (status, _) = call(&app, post_json("/send-transaction", transfer_body(json!(1)))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rate_limit_returns_429() {
        let (registry, _, _) = stub_registry();
        let config = Config {
            rate_limit_max_requests: 2,
            ..Config::default()
        };
        let app = app_with(registry, config);

        let limited = |ip: &str| {
            Request::builder()
                .method("POST")
                .uri("/generate-mnemonic")
                .header("x-forwarded-for", ip)
                .body(Body::empty())
                .unwrap()
        };

        for remaining in ["1", "0"] {
            let response = app.clone().oneshot(limited("198.51.100.1")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(response.headers()["x-ratelimit-remaining"], remaining);
        }

        let response = app.clone().oneshot(limited("198.51.100.1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().contains_key(header::RETRY_AFTER));

        let response = app.clone().oneshot(limited("198.51.100.2")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Probes are not rate limited.
        let response = app.clone().oneshot(get("/health/live")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_reports_each_chain() {
        let (app, _, _) = app();
        let (status, body) = call(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["checks"]["chains"]["solana"], "ok");
        assert_eq!(body["checks"]["chains"]["ethereum"], "ok");

        let registry = ChainRegistry::new().with_gateway(Arc::new(
            StubGateway::new(WalletType::Ethereum)
                .failing(|| ChainError::RemoteUnavailable("down".into())),
        ));
        let (status, body) = call(&app_with(registry, Config::default()), get("/health/ready")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["checks"]["chains"]["ethereum"], "unavailable");
    }

    #[tokio::test]
    async fn responses_carry_request_id_and_cors() {
        let (app, _, _) = app();
        let req = Request::builder()
            .uri("/health/live")
            .header(header::ORIGIN, "http://localhost:3000")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert!(response.headers().contains_key("x-request-id"));
        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn openapi_document_lists_routes() {
        let (app, _, _) = app();
        let (status, body) = call(&app, get("/api-doc/openapi.json")).await;
        assert_eq!(status, StatusCode::OK);
        for path in ["/generate-wallet", "/send-transaction", "/get-balance/{public_key}"] {
            assert!(body["paths"].get(path).is_some(), "missing {path}");
        }
    }
}
