use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::feed::{CachePolicy, RSS_CACHE_CONTROL};
use crate::reading::ReadingList;

/// Build the router serving the reading list, its live variant and the RSS feed.
pub fn router(list: ReadingList) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/reading", get(reading))
        .route("/reading/live", get(reading_live))
        .route("/feed.xml", get(feed_xml))
        .with_state(list)
}

/// Bind to `port` on all interfaces and serve until the process exits.
pub async fn serve(list: ReadingList, port: u16) -> Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Server running on http://{}", addr);

    axum::serve(listener, router(list))
        .await
        .context("HTTP server terminated")?;

    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

/// Reading page: feed cached for the configured TTL, articles enriched.
async fn reading(State(list): State<ReadingList>) -> Response {
    let policy = list.hourly_policy();
    articles_response(&list, policy).await
}

/// Live list: feed revalidated on every request.
async fn reading_live(State(list): State<ReadingList>) -> Response {
    articles_response(&list, CachePolicy::NoCache).await
}

async fn articles_response(list: &ReadingList, policy: CachePolicy) -> Response {
    match list.articles(policy, true).await {
        Ok(articles) => (
            [(header::CACHE_CONTROL, policy.response_directive())],
            Json(articles),
        )
            .into_response(),
        Err(err) => {
            error!("Failed to prepare reading list: {:#}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn feed_xml(State(list): State<ReadingList>) -> Response {
    match list.rss().await {
        Ok(xml) => (
            [
                (header::CONTENT_TYPE, "application/xml"),
                (header::CACHE_CONTROL, RSS_CACHE_CONTROL),
            ],
            xml,
        )
            .into_response(),
        Err(err) => {
            error!("Failed to build feed.xml: {:#}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Settings;
    use crate::feed::{create_http_client, CanonicalArticle, DEFAULT_USER_AGENT};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tokio::time::Duration;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn list_for(feed_url: Option<String>) -> ReadingList {
        let mut settings = Settings::from_env();
        settings.feed_url = feed_url;
        settings.feed_ttl_seconds = 3600;
        settings.feed_timeout = Duration::from_secs(2);
        settings.og_timeout = Duration::from_millis(500);
        settings.site = Default::default();
        ReadingList::new(create_http_client(DEFAULT_USER_AGENT).unwrap(), settings)
    }

    async fn feed_server() -> MockServer {
        let server = MockServer::start().await;
        let body = format!(
            r#"{{"items":[
                {{"title":"Linked","url":"{uri}/article","date_published":"2024-02-29T12:00:00Z"}},
                {{}}
            ]}}"#,
            uri = server.uri()
        );
        Mock::given(method("GET"))
            .and(path("/liked.json"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/article"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"<html><head><meta property="og:site_name" content="Example Weekly"/></head></html>"#,
                "text/html",
            ))
            .mount(&server)
            .await;
        server
    }

    async fn get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_reading_route() {
        let server = feed_server().await;
        let app = router(list_for(Some(format!("{}/liked.json", server.uri()))));

        let response = get(app, "/reading").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "public, max-age=3600"
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let articles: Vec<CanonicalArticle> = serde_json::from_slice(&body).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Linked");
        assert_eq!(articles[0].publication_name, "Example Weekly");
        assert_eq!(articles[0].date_iso, "2024-02-29");
        assert_eq!(articles[1].title, "Untitled");
        assert_eq!(articles[1].href, "#");
    }

    #[tokio::test]
    async fn test_reading_route_with_failing_feed_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;
        let app = router(list_for(Some(server.uri())));

        let response = get(app, "/reading/live").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"[]");
    }

    #[tokio::test]
    async fn test_feed_xml_route() {
        let server = feed_server().await;
        let app = router(list_for(Some(format!("{}/liked.json", server.uri()))));

        let response = get(app, "/feed.xml").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/xml");
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "s-maxage=31556952"
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let channel = rss::Channel::read_from(&body[..]).unwrap();
        assert_eq!(channel.items().len(), 2);
        assert_eq!(channel.items()[0].title(), Some("Linked"));
        // No enrichment on the RSS path.
        assert_eq!(channel.items()[0].description(), Some("No description found"));
    }

    #[tokio::test]
    async fn test_feed_xml_route_with_failing_feed_is_empty_channel() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let app = router(list_for(Some(server.uri())));

        let response = get(app, "/feed.xml").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/xml");
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "s-maxage=31556952"
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let channel = rss::Channel::read_from(&body[..]).unwrap();
        assert!(channel.items().is_empty());
    }

    #[tokio::test]
    async fn test_feed_xml_route_with_relative_item_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"items":[{"title":"Kept","url":"https://a.example/x"},{"title":"Relative","url":"/relative/post"}]}"#,
                "application/json",
            ))
            .mount(&server)
            .await;
        let app = router(list_for(Some(server.uri())));

        let response = get(app, "/feed.xml").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let channel = rss::Channel::read_from(&body[..]).unwrap();
        assert_eq!(channel.items().len(), 2);
        assert_eq!(channel.items()[1].link(), None);
    }

    #[tokio::test]
    async fn test_missing_feed_url_is_server_error() {
        let app = router(list_for(None));
        let response = get(app, "/reading").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_health() {
        let app = router(list_for(None));
        let response = get(app, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
