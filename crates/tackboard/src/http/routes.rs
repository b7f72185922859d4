use super::error::ApiError;
use super::AppState;
use axum::body::{Body, Bytes};
use axum::extract::multipart::{Field, Multipart, MultipartRejection};
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use std::io;
use std::sync::Arc;
use tackboardapp::api::BoardApi;
use tackboardapp::launcher::Launcher;
use tackboardapp::model::UploadReceipt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::io::{ReaderStream, StreamReader, SyncIoBridge};
use tracing::warn;

/// Multipart chunks buffered between the request and the disk write.
const UPLOAD_QUEUE_DEPTH: usize = 8;

#[derive(Debug, Serialize)]
struct FileEntry {
    name: String,
    size: u64,
    /// Seconds since the Unix epoch
    modified: f64,
}

/// Runs a store call on the blocking pool.
async fn run_blocking<L, T, F>(state: &AppState<L>, f: F) -> Result<T, ApiError>
where
    L: Launcher + Send + Sync + 'static,
    T: Send + 'static,
    F: FnOnce(&BoardApi<L>) -> tackboardapp::error::Result<T> + Send + 'static,
{
    let api = Arc::clone(&state.api);
    let result = tokio::task::spawn_blocking(move || f(&api)).await?;
    Ok(result?)
}

fn success(msg: &str) -> Json<Value> {
    Json(json!({ "success": true, "msg": msg }))
}

pub async fn index<L>(State(state): State<AppState<L>>) -> Response
where
    L: Launcher + Send + Sync + 'static,
{
    let Some(dir) = state.index_dir.as_ref() else {
        return (StatusCode::NOT_FOUND, "No front end configured").into_response();
    };
    let page = dir.join("index.html");
    match tokio::fs::read_to_string(&page).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            warn!(path = %page.display(), error = %e, "index page unavailable");
            (StatusCode::NOT_FOUND, "index.html not found").into_response()
        }
    }
}

pub async fn load_document<L>(State(state): State<AppState<L>>) -> Result<Json<Value>, ApiError>
where
    L: Launcher + Send + Sync + 'static,
{
    let doc = run_blocking(&state, |api| Ok(api.load_document())).await?;
    Ok(Json(doc.into_value()))
}

pub async fn save_document<L>(
    State(state): State<AppState<L>>,
    body: Bytes,
) -> Result<Json<Value>, ApiError>
where
    L: Launcher + Send + Sync + 'static,
{
    run_blocking(&state, move |api| api.save_document_bytes(&body)).await?;
    Ok(Json(json!({ "success": true })))
}

pub async fn upload<L>(
    State(state): State<AppState<L>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError>
where
    L: Launcher + Send + Sync + 'static,
{
    let mut multipart = multipart.map_err(|e| ApiError::invalid_input(e.body_text()))?;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::invalid_input(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let receipt = stream_upload(&state, &mut field).await?;
        return Ok(Json(json!({
            "success": true,
            "filename": receipt.filename,
            "url": receipt.url,
        })));
    }

    Err(ApiError::invalid_input("no file was sent"))
}

/// Pipes the field into a blocking store write. At most
/// `UPLOAD_QUEUE_DEPTH` chunks sit in memory at a time.
async fn stream_upload<L>(
    state: &AppState<L>,
    field: &mut Field<'_>,
) -> Result<UploadReceipt, ApiError>
where
    L: Launcher + Send + Sync + 'static,
{
    let filename = field.file_name().unwrap_or_default().to_string();
    let (tx, rx) = mpsc::channel::<io::Result<Bytes>>(UPLOAD_QUEUE_DEPTH);
    let reader = SyncIoBridge::new(StreamReader::new(ReceiverStream::new(rx)));

    let api = Arc::clone(&state.api);
    let store =
        tokio::task::spawn_blocking(move || api.upload_attachment(&filename, Some(reader)));

    let mut client_error = None;
    loop {
        match field.chunk().await {
            Ok(Some(chunk)) => {
                if tx.send(Ok(chunk)).await.is_err() {
                    // The store stopped reading; its result says why
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                let msg = e.body_text();
                let _ = tx.send(Err(io::Error::other(msg.clone()))).await;
                client_error = Some(msg);
                break;
            }
        }
    }
    drop(tx);

    let stored = store.await?;
    if let Some(msg) = client_error {
        return Err(ApiError::invalid_input(msg));
    }
    Ok(stored?)
}

pub async fn download<L>(
    State(state): State<AppState<L>>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError>
where
    L: Launcher + Send + Sync + 'static,
{
    let handle = run_blocking(&state, move |api| api.download_attachment(&filename)).await?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        handle.name.replace('"', "\\\"")
    );
    let disposition = HeaderValue::from_str(&disposition)
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    let headers = [
        (
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/octet-stream"),
        ),
        (header::CONTENT_LENGTH, HeaderValue::from(handle.size)),
        (header::CONTENT_DISPOSITION, disposition),
    ];
    let body = Body::from_stream(ReaderStream::new(tokio::fs::File::from_std(handle.file)));
    Ok((headers, body).into_response())
}

pub async fn delete_file<L>(
    State(state): State<AppState<L>>,
    Path(filename): Path<String>,
) -> Result<Json<Value>, ApiError>
where
    L: Launcher + Send + Sync + 'static,
{
    run_blocking(&state, move |api| api.delete_attachment(&filename)).await?;
    Ok(success("File deleted"))
}

pub async fn open_file<L>(
    State(state): State<AppState<L>>,
    Path(filename): Path<String>,
) -> Result<Json<Value>, ApiError>
where
    L: Launcher + Send + Sync + 'static,
{
    run_blocking(&state, move |api| api.open_attachment(&filename)).await?;
    Ok(success("Opened with the default application"))
}

pub async fn list_files<L>(State(state): State<AppState<L>>) -> Result<Json<Value>, ApiError>
where
    L: Launcher + Send + Sync + 'static,
{
    let files = run_blocking(&state, |api| api.list_attachments()).await?;
    let files: Vec<FileEntry> = files
        .into_iter()
        .map(|info| FileEntry {
            modified: info.modified.timestamp_millis() as f64 / 1000.0,
            name: info.name,
            size: info.size,
        })
        .collect();
    Ok(Json(json!({ "success": true, "files": files })))
}

#[cfg(test)]
mod tests {
    use super::super::router;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use axum::Router;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tackboardapp::test_utils::{RecordingLauncher, TestEnv};
    use tempfile::TempDir;
    use tower::ServiceExt;

    const BOUNDARY: &str = "tackboard-test-boundary";

    struct Harness {
        _dir: TempDir,
        app: Router,
        launcher: RecordingLauncher,
        root: PathBuf,
    }

    fn harness_with(launcher: RecordingLauncher, index_dir: Option<PathBuf>) -> Harness {
        let TestEnv {
            _temp_dir,
            api,
            launcher,
            root,
        } = TestEnv::with_launcher(launcher);
        let app = router(Arc::new(api), index_dir);
        Harness {
            _dir: _temp_dir,
            app,
            launcher,
            root,
        }
    }

    fn harness() -> Harness {
        harness_with(RecordingLauncher::new(), None)
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    async fn send_json(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = send(app, req).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn multipart(field: &str, filename: &str, content: &str) -> Request<Body> {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n{content}\r\n--{b}--\r\n",
            b = BOUNDARY,
        );
        Request::builder()
            .method(Method::POST)
            .uri("/api/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn upload(app: &Router, filename: &str, content: &str) -> String {
        let (status, body) = send_json(app, multipart("file", filename, content)).await;
        assert_eq!(status, StatusCode::OK, "upload failed: {}", body);
        body["filename"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_load_default_document() {
        let h = harness();
        let (status, body) = send_json(&h.app, request(Method::GET, "/api/data")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "columns": [] }));
    }

    #[tokio::test]
    async fn test_load_corrupt_document_is_default() {
        let h = harness();
        fs::write(h.root.join("data.json"), "{{{{").unwrap();
        let (status, body) = send_json(&h.app, request(Method::GET, "/api/data")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "columns": [] }));
    }

    #[tokio::test]
    async fn test_save_all_round_trip() {
        let h = harness();
        let doc = json!({ "columns": [{ "title": "Todo", "cards": [{ "text": "ship" }] }] });
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/save-all")
            .header("content-type", "application/json")
            .body(Body::from(doc.to_string()))
            .unwrap();

        let (status, body) = send_json(&h.app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true }));

        let (_, loaded) = send_json(&h.app, request(Method::GET, "/api/data")).await;
        assert_eq!(loaded, doc);
    }

    #[tokio::test]
    async fn test_save_all_non_json_fails_and_keeps_document() {
        let h = harness();
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/save-all")
            .body(Body::from("{ not json"))
            .unwrap();

        let (status, body) = send_json(&h.app, req).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], json!(false));
        assert!(body["msg"].as_str().unwrap().starts_with("Serialization error"));

        let (_, loaded) = send_json(&h.app, request(Method::GET, "/api/data")).await;
        assert_eq!(loaded, json!({ "columns": [] }));
    }

    #[tokio::test]
    async fn test_upload_assigns_unique_names() {
        let h = harness();
        let (status, body) = send_json(&h.app, multipart("file", "report.pdf", "one")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "success": true, "filename": "report.pdf", "url": "/download/report.pdf" })
        );

        assert_eq!(upload(&h.app, "report.pdf", "two").await, "report(1).pdf");
        assert_eq!(upload(&h.app, "report.pdf", "three").await, "report(2).pdf");
    }

    #[tokio::test]
    async fn test_upload_without_file_field() {
        let h = harness();
        let (status, body) = send_json(&h.app, multipart("attachment", "a.txt", "x")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn test_upload_with_empty_filename() {
        let h = harness();
        let (status, _) = send_json(&h.app, multipart("file", "", "x")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_rejects_non_multipart() {
        let h = harness();
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/upload")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let (status, body) = send_json(&h.app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn test_download() {
        let h = harness();
        let name = upload(&h.app, "notes.txt", "hello").await;

        let response = h
            .app
            .clone()
            .oneshot(request(Method::GET, &format!("/download/{}", name)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-disposition"],
            "attachment; filename=\"notes.txt\""
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"hello");
    }

    #[tokio::test]
    async fn test_large_attachment_round_trip() {
        let h = harness();
        let content = "0123456789abcdef".repeat(128 * 1024);
        let name = upload(&h.app, "big.bin", &content).await;

        let stored = fs::read(h.root.join("uploads").join(&name)).unwrap();
        assert_eq!(stored.len(), content.len());
        assert_eq!(stored, content.as_bytes());

        let response = h
            .app
            .clone()
            .oneshot(request(Method::GET, &format!("/download/{}", name)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-length"],
            content.len().to_string().as_str()
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], content.as_bytes());
    }

    #[tokio::test]
    async fn test_truncated_upload_leaves_no_file() {
        let h = harness();
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"cut.txt\"\r\n\r\nhalf of the dat",
            b = BOUNDARY,
        );
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();

        let (status, body) = send_json(&h.app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        assert_eq!(fs::read_dir(h.root.join("uploads")).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_download_missing_and_traversal() {
        let h = harness();
        fs::write(h.root.join("data.json.bak"), "secret").unwrap();

        let (status, body) = send_json(&h.app, request(Method::GET, "/download/ghost.txt")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], json!(false));

        let (status, _) = send(
            &h.app,
            request(Method::GET, "/download/..%2F..%2Fetc%2Fpasswd"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&h.app, request(Method::GET, "/download/..%2Fdata.json.bak")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_file() {
        let h = harness();
        let name = upload(&h.app, "a.txt", "a").await;
        let uri = format!("/api/delete-file/{}", name);

        let (status, body) = send_json(&h.app, request(Method::DELETE, &uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));

        let (status, _) = send(&h.app, request(Method::GET, &format!("/download/{}", name))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send_json(&h.app, request(Method::DELETE, &uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn test_open_file() {
        let h = harness();
        let name = upload(&h.app, "plan.txt", "plan").await;

        let (status, body) = send_json(
            &h.app,
            request(Method::POST, &format!("/api/open-file/{}", name)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        let launched = h.launcher.launched();
        assert_eq!(launched.len(), 1);
        assert!(launched[0].ends_with("plan.txt"));

        let (status, _) = send(&h.app, request(Method::POST, "/api/open-file/ghost.txt")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_open_file_without_handler() {
        let h = harness_with(RecordingLauncher::without_handler(), None);
        let name = upload(&h.app, "plan.txt", "plan").await;

        let (status, body) = send_json(
            &h.app,
            request(Method::POST, &format!("/api/open-file/{}", name)),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["msg"].as_str().unwrap().contains("no application"));
    }

    #[tokio::test]
    async fn test_list_files() {
        let h = harness();
        let a = upload(&h.app, "a.txt", "aaaa").await;
        upload(&h.app, "b.txt", "bb").await;
        fs::create_dir(h.root.join("uploads").join("folder")).unwrap();
        send(&h.app, request(Method::DELETE, &format!("/api/delete-file/{}", a))).await;

        let (status, body) = send_json(&h.app, request(Method::GET, "/api/files")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        let files = body["files"].as_array().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0]["name"], json!("b.txt"));
        assert_eq!(files[0]["size"], json!(2));
        assert!(files[0]["modified"].as_f64().unwrap() > 0.0);
    }

    #[tokio::test]
    async fn test_index_page() {
        let h = harness();
        let (status, _) = send(&h.app, request(Method::GET, "/")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let site = TempDir::new().unwrap();
        fs::write(site.path().join("index.html"), "<h1>Board</h1>").unwrap();
        let h = harness_with(RecordingLauncher::new(), Some(site.path().to_path_buf()));
        let (status, body) = send(&h.app, request(Method::GET, "/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<h1>Board</h1>");
    }
}
