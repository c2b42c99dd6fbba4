//! Route table.
//!
//! Every endpoint is also served under the legacy `/api/...` path used by
//! older frontends.

use axum::{
    Router,
    routing::{MethodRouter, get, post, put},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::handlers;
use crate::api::state::AppState;

/// Extension trait for Router to register an endpoint under two paths.
pub trait AliasedRouterExt<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Register `method_router` at both `path` and `alias`.
    ///
    /// # Example
    /// ```ignore
    /// let router = Router::new()
    ///     .aliased_route("/files", "/api/audio-files/get-files", get(handlers::list_files));
    /// ```
    fn aliased_route(self, path: &str, alias: &str, method_router: MethodRouter<S>) -> Self;
}

impl<S> AliasedRouterExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn aliased_route(self, path: &str, alias: &str, method_router: MethodRouter<S>) -> Self {
        self.route(path, method_router.clone())
            .route(alias, method_router)
    }
}

/// Build the application router with CORS and request tracing.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .aliased_route(
            "/files",
            "/api/audio-files/get-files",
            get(handlers::list_files),
        )
        .aliased_route(
            "/annotations",
            "/api/audio-files/json/update",
            post(handlers::update_annotation),
        )
        .aliased_route(
            "/metadata",
            "/api/audio-files/metadata/update",
            post(handlers::update_metadata),
        )
        .aliased_route("/stream", "/api/audio-files/stream", get(handlers::stream))
        .aliased_route(
            "/playlists",
            "/api/playlists",
            get(handlers::get_playlists).post(handlers::create_playlist),
        )
        .aliased_route(
            "/playlists/reconcile",
            "/api/playlists/reconcile",
            post(handlers::reconcile_playlists)
                .put(handlers::update_reserved_playlist)
                .delete(handlers::delete_reserved_playlist),
        )
        .aliased_route(
            "/playlists/{id}",
            "/api/playlists/{id}",
            put(handlers::update_playlist).delete(handlers::delete_playlist),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::library::{LibraryPaths, LibraryService};
    use crate::playlists::PlaylistService;
    use crate::store::{AnnotationMap, MemoryStore, PlaylistList};
    use crate::tagging::TagWriterRegistry;

    fn app(root: &Path) -> Router {
        let state = AppState::new(
            LibraryService::new(
                LibraryPaths::new(root),
                Arc::new(MemoryStore::<AnnotationMap>::default()),
            ),
            PlaylistService::new(Arc::new(MemoryStore::<PlaylistList>::default())),
            TagWriterRegistry::default(),
        );
        create_router(state)
    }

    fn library() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("A")).unwrap();
        fs::write(dir.path().join("A/song1.mp3"), b"not really audio").unwrap();
        let bytes: Vec<u8> = (0..1000).map(|i| (i % 256) as u8).collect();
        fs::write(dir.path().join("A/song2.flac"), bytes).unwrap();
        fs::write(dir.path().join("A/cover.jpg"), b"jpg").unwrap();
        dir
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_list_files_reports_unreadable_tags() {
        let dir = library();
        let app = app(dir.path());

        let response = send(&app, get_request("/files")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let files = body_json(response).await;
        let files = files.as_array().unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0]["relPath"], "A/song1.mp3");
        assert_eq!(files[0]["name"], "song1.mp3");
        assert_eq!(files[0]["metadata"]["error"], "Could not read metadata");
        assert_eq!(files[0]["document"], json!({}));
    }

    #[tokio::test]
    async fn test_list_files_rejects_escaping_dir() {
        let dir = library();
        let response = send(&app(dir.path()), get_request("/files?dir=../..")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_annotation_round_trip_through_listing() {
        let dir = library();
        let app = app(dir.path());

        let update = json_request(
            "POST",
            "/annotations",
            json!({"relPath": "A/song1.mp3", "document": {"mood": "calm", "tags": ["a", "b"]}}),
        );
        let response = send(&app, update).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"success": true}));

        let files = body_json(send(&app, get_request("/files?dir=A")).await).await;
        assert_eq!(
            files[0]["document"],
            json!({"mood": "calm", "tags": ["a", "b"]})
        );
    }

    #[tokio::test]
    async fn test_legacy_annotation_route_accepts_json_data() {
        let dir = library();
        let app = app(dir.path());

        let update = json_request(
            "POST",
            "/api/audio-files/json/update",
            json!({"relPath": "A/song2.flac", "jsonData": {"rating": "5"}}),
        );
        assert_eq!(send(&app, update).await.status(), StatusCode::OK);

        let files = body_json(send(&app, get_request("/api/audio-files/get-files")).await).await;
        assert_eq!(files[1]["document"], json!({"rating": "5"}));
    }

    #[tokio::test]
    async fn test_annotation_requires_rel_path() {
        let dir = library();
        let request = json_request("POST", "/annotations", json!({"document": {}}));
        let response = send(&app(dir.path()), request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_stream_range_request() {
        let dir = library();
        let request = Request::builder()
            .uri("/stream?path=A/song2.flac")
            .header(header::RANGE, "bytes=0-99")
            .body(Body::empty())
            .unwrap();
        let response = send(&app(dir.path()), request).await;

        assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_RANGE], "bytes 0-99/1000");
        assert_eq!(headers[header::CONTENT_LENGTH], "100");
        assert_eq!(headers[header::CONTENT_TYPE], "audio/flac");
        assert_eq!(headers[header::ACCEPT_RANGES], "bytes");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let expected: Vec<u8> = (0..100).map(|i| i as u8).collect();
        assert_eq!(body.as_ref(), expected.as_slice());
    }

    #[tokio::test]
    async fn test_stream_full_and_unsatisfiable() {
        let dir = library();
        let app = app(dir.path());

        let response = send(&app, get_request("/stream?path=A/song1.mp3")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/mpeg");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body.as_ref(), b"not really audio");

        let request = Request::builder()
            .uri("/api/audio-files/stream?path=A/song2.flac")
            .header(header::RANGE, "bytes=5000-")
            .body(Body::empty())
            .unwrap();
        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert_eq!(response.headers()[header::CONTENT_RANGE], "bytes */1000");
    }

    #[tokio::test]
    async fn test_stream_errors() {
        let dir = library();
        let app = app(dir.path());

        let missing = send(&app, get_request("/stream?path=A/nope.mp3")).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let no_path = send(&app, get_request("/stream")).await;
        assert_eq!(no_path.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_metadata_update_validation() {
        let dir = library();
        let app = app(dir.path());

        let missing = json_request("POST", "/metadata", json!({"relPath": "A/song1.mp3"}));
        assert_eq!(send(&app, missing).await.status(), StatusCode::BAD_REQUEST);

        let before = fs::read(dir.path().join("A/cover.jpg")).unwrap();
        let unsupported = json_request(
            "POST",
            "/metadata",
            json!({"relPath": "A/cover.jpg", "metadata": {"title": "x"}}),
        );
        let response = send(&app, unsupported).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "Unsupported file type: .jpg"
        );
        assert_eq!(fs::read(dir.path().join("A/cover.jpg")).unwrap(), before);
    }

    #[tokio::test]
    async fn test_playlist_lifecycle() {
        let dir = library();
        let app = app(dir.path());

        let created = body_json(
            send(
                &app,
                json_request("POST", "/playlists", json!({"name": "Road", "tracks": ["A/song1.mp3"]})),
            )
            .await,
        )
        .await;
        let id = created["id"].as_i64().unwrap();
        assert_eq!(created["name"], "Road");

        let update = json_request(
            "PUT",
            &format!("/playlists/{}", id),
            json!({"tracks": ["A/song2.flac", "A/song2.flac", "gone.mp3"]}),
        );
        let response = send(&app, update).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await["tracks"],
            json!(["A/song2.flac", "A/song2.flac", "gone.mp3"])
        );

        let unknown = json_request("PUT", "/playlists/42", json!({"tracks": []}));
        assert_eq!(send(&app, unknown).await.status(), StatusCode::NOT_FOUND);

        let delete = Request::builder()
            .method("DELETE")
            .uri(format!("/api/playlists/{}", id))
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(&app, delete).await.status(), StatusCode::OK);

        let delete_again = Request::builder()
            .method("DELETE")
            .uri(format!("/playlists/{}", id))
            .body(Body::empty())
            .unwrap();
        let response = send(&app, delete_again).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"success": true}));

        let all = body_json(send(&app, get_request("/playlists")).await).await;
        assert_eq!(all, json!([]));
    }

    #[tokio::test]
    async fn test_create_playlist_requires_name() {
        let dir = library();
        let request = json_request("POST", "/playlists", json!({"tracks": []}));
        let response = send(&app(dir.path()), request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_bodies_are_validation_errors() {
        let dir = library();
        let app = app(dir.path());

        let wrong_type = json_request("POST", "/playlists", json!({"name": 5}));
        let response = send(&app, wrong_type).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());

        let not_a_document = json_request(
            "POST",
            "/annotations",
            json!({"relPath": "a.mp3", "document": ["x"]}),
        );
        let response = send(&app, not_a_document).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());

        let no_content_type = Request::builder()
            .method("POST")
            .uri("/playlists")
            .body(Body::from(r#"{"name":"Road"}"#))
            .unwrap();
        let response = send(&app, no_content_type).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());

        let broken = Request::builder()
            .method("POST")
            .uri("/metadata")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{ not json"))
            .unwrap();
        let response = send(&app, broken).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_reconcile_segment_behaves_like_unknown_id() {
        let dir = library();
        let app = app(dir.path());

        let delete = Request::builder()
            .method("DELETE")
            .uri("/playlists/reconcile")
            .body(Body::empty())
            .unwrap();
        let response = send(&app, delete).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"success": true}));

        let update = json_request("PUT", "/api/playlists/reconcile", json!({"tracks": []}));
        let response = send(&app, update).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_reconcile_endpoint_is_idempotent() {
        let dir = library();
        let app = app(dir.path());

        let request = || {
            Request::builder()
                .method("POST")
                .uri("/playlists/reconcile")
                .body(Body::empty())
                .unwrap()
        };
        let first = body_json(send(&app, request()).await).await;
        assert_eq!(first.as_array().unwrap().len(), 1);
        assert_eq!(first[0]["name"], "Album: Unknown Album");
        assert_eq!(first[0]["tracks"], json!(["A/song1.mp3", "A/song2.flac"]));

        let second = body_json(send(&app, request()).await).await;
        assert_eq!(second, first);
    }
}
