use axum::{
    extract::{MatchedPath, Request},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put, MethodRouter},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, Level};
use utoipa::OpenApi;

use common::types::Health;

use crate::auth::{self, Endpoint};
use crate::handlers::{comments, questions};
use crate::openapi::ApiDoc;
use crate::state::AppState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics() -> Response {
    match common::metrics::render() {
        Ok(body) => body.into_response(),
        Err(e) => {
            error!(err = %e, "metrics encoding failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// 按路由模板计数，避免把查询参数写进标签
async fn track_metrics(req: Request, next: Next) -> Response {
    let endpoint = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());
    let res = next.run(req).await;
    common::metrics::record_request(&endpoint, res.status().as_u16());
    res
}

fn method_router(endpoint: Endpoint) -> MethodRouter<AppState> {
    match endpoint {
        Endpoint::AddQuestion => post(questions::add_question),
        Endpoint::GetQuestion => get(questions::get_question),
        Endpoint::GetFaqs => get(questions::get_faqs),
        Endpoint::UpdateQuestion => put(questions::update_question).patch(questions::update_question),
        Endpoint::DeleteQuestion => delete(questions::delete_question),
        Endpoint::AddComment => post(comments::add_comment),
        Endpoint::GetComments => get(comments::get_comments),
        Endpoint::UpdateComment => put(comments::update_comment),
        Endpoint::DeleteComment => delete(comments::delete_comment),
    }
}

/// Build the full application router. Endpoints named by the auth policy get
/// the session guard as a route layer; everything else is public.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let api = Endpoint::ALL.into_iter().fold(Router::new(), |router, endpoint| {
        let mut route = Router::new().route(endpoint.path(), method_router(endpoint));
        if state.policy.requires(endpoint) {
            route = route.route_layer(middleware::from_fn_with_state(
                state.guard.clone(),
                auth::require_session,
            ));
        }
        router.merge(route)
    });

    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api-docs/openapi.json", get(openapi_json));

    public
        .merge(api)
        .with_state(state)
        .layer(middleware::from_fn(track_metrics))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
