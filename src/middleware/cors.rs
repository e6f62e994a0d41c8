use axum::http::header::{self, InvalidHeaderValue};
use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

/// `*` 放行任意来源，否则只放行给定的单个 origin。
///
/// 匿名投票接口不需要 credentials，所以通配符和 `allow_headers` 可以同时使用。
pub fn build_cors_layer(origin: &str) -> Result<CorsLayer, InvalidHeaderValue> {
    let origin = origin.trim();
    let layer = CorsLayer::new()
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_methods(Any);

    if origin == "*" {
        return Ok(layer.allow_origin(Any));
    }
    Ok(layer.allow_origin(origin.parse::<HeaderValue>()?))
}
