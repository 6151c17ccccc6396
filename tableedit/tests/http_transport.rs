use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Duration;

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tableedit::protocol::FormData;
use tableedit::{HttpTransport, PostRequest, Transport, TransportError};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// What the server saw of one request.
#[derive(Debug)]
struct Seen {
    method: String,
    path: String,
    content_type: Option<String>,
    requested_with: Option<String>,
    csrf: Option<String>,
    body: String,
}

/// Local server: `/list/` answers JSON, `/broken/` a 500, `/login/` HTML, and
/// `/slow/` nothing for a while.
async fn serve() -> (SocketAddr, mpsc::UnboundedReceiver<Seen>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let tx = tx.clone();
            tokio::spawn(async move {
                let service = service_fn(move |req: Request<Incoming>| {
                    let tx = tx.clone();
                    async move { Ok::<_, Infallible>(respond(req, &tx).await) }
                });
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await;
            });
        }
    });

    (addr, rx)
}

async fn respond(req: Request<Incoming>, tx: &mpsc::UnboundedSender<Seen>) -> Response<Full<Bytes>> {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let content_type = header("content-type");
    let requested_with = header("x-requested-with");
    let csrf = header("x-csrftoken");
    let body = req.into_body().collect().await.unwrap().to_bytes();
    let body = String::from_utf8_lossy(&body).into_owned();

    let (status, reply) = match path.as_str() {
        "/list/" => (
            StatusCode::OK,
            r#"{"success": true, "content": "<form></form>"}"#,
        ),
        "/broken/" => (StatusCode::INTERNAL_SERVER_ERROR, "Traceback"),
        "/slow/" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            (StatusCode::OK, "{}")
        }
        _ => (StatusCode::OK, "<html>login</html>"),
    };

    let _ = tx.send(Seen {
        method,
        path,
        content_type,
        requested_with,
        csrf,
        body,
    });

    Response::builder()
        .status(status)
        .body(Full::new(Bytes::from(reply)))
        .unwrap()
}

fn transport(addr: SocketAddr) -> HttpTransport {
    HttpTransport::builder()
        .url(format!("http://{addr}/list/"))
        .csrf_token("tok")
        .timeout(Duration::from_millis(500))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_post_form_to_page() {
    let (addr, mut seen) = serve().await;
    let transport = transport(addr);

    let form = FormData::new()
        .with("_action", "edit")
        .with("_column", "price")
        .with("id", "7");
    let body = transport.post(&PostRequest::to_page(form)).await.unwrap();
    assert_eq!(body, r#"{"success": true, "content": "<form></form>"}"#);

    let seen = seen.recv().await.unwrap();
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.path, "/list/");
    assert_eq!(
        seen.content_type.as_deref(),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(seen.requested_with.as_deref(), Some("XMLHttpRequest"));
    assert_eq!(seen.csrf.as_deref(), Some("tok"));
    assert_eq!(seen.body, "_action=edit&_column=price&id=7");
}

#[tokio::test]
async fn test_relative_path_resolves_against_page() {
    let (addr, mut seen) = serve().await;
    let transport = transport(addr);

    transport
        .post(&PostRequest::to("../broken/", FormData::new()))
        .await
        .unwrap_err();
    assert_eq!(seen.recv().await.unwrap().path, "/broken/");
}

#[tokio::test]
async fn test_error_status_is_http_error() {
    let (addr, _seen) = serve().await;
    let transport = transport(addr);

    let err = transport
        .post(&PostRequest::to("/broken/", FormData::new()))
        .await
        .unwrap_err();
    match &err {
        TransportError::Http { status, body, .. } => {
            assert_eq!(*status, 500);
            assert_eq!(body.as_deref(), Some("Traceback"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.alert_message(), "error:Internal Server Error");
}

#[tokio::test]
async fn test_html_body_is_returned_raw() {
    let (addr, _seen) = serve().await;
    let transport = transport(addr);

    let body = transport
        .post(&PostRequest::to("/login/", FormData::new()))
        .await
        .unwrap();
    assert_eq!(body, "<html>login</html>");
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let (addr, _seen) = serve().await;
    let transport = transport(addr);

    let err = transport
        .post(&PostRequest::to("/slow/", FormData::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Timeout(_)));
    assert_eq!(err.status_text(), "timeout");
}
