use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, Mutex};
use std::time::Duration;

use axum::{
    Router,
    extract::Request,
    http::{StatusCode, header},
};
use shortfront::{
    configuration::get_configuration,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};
use tokio::net::TcpListener;

static TRACING: LazyLock<()> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, None, std::io::stdout)
            .expect("Failed to build subscriber");
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, None, std::io::sink)
            .expect("Failed to build subscriber");
        init_subscriber(subscriber);
    };
});

/// One request as the fake backend saw it.
#[derive(Clone, Debug)]
pub struct SeenRequest {
    pub path: String,
    pub authorization: Option<String>,
}

/// Stand-in for the URL-shortener API. Every request, whatever its path,
/// gets the same canned answer and is recorded.
pub struct MockBackend {
    pub origin: String,
    hits: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl MockBackend {
    pub async fn json(status: StatusCode, body: serde_json::Value) -> Self {
        Self::spawn(status, body.to_string(), Duration::ZERO).await
    }

    pub async fn raw(status: StatusCode, body: &str) -> Self {
        Self::spawn(status, body.to_string(), Duration::ZERO).await
    }

    /// Answers only after `delay`, long enough to trip the app's timeout.
    pub async fn stalled(delay: Duration) -> Self {
        Self::spawn(StatusCode::OK, "[]".to_string(), delay).await
    }

    async fn spawn(status: StatusCode, body: String, delay: Duration) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let handler = {
            let hits = hits.clone();
            let seen = seen.clone();
            move |request: Request| {
                let hits = hits.clone();
                let seen = seen.clone();
                let body = body.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    seen.lock().unwrap().push(SeenRequest {
                        path: request.uri().path().to_string(),
                        authorization: request
                            .headers()
                            .get(header::AUTHORIZATION)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string),
                    });
                    tokio::time::sleep(delay).await;
                    (status, [(header::CONTENT_TYPE, "application/json")], body)
                }
            }
        };

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, Router::new().fallback(handler))
                .await
                .expect("Mock backend crashed");
        });

        Self {
            origin: format!("http://{}", address),
            hits,
            seen,
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> SeenRequest {
        self.seen
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("Backend was never called")
    }
}

pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}{}", self.address, path))
            .header(header::COOKIE, format!("token={}", token))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

pub async fn spawn_app(backend: &MockBackend) -> TestApp {
    spawn_app_with_retries(backend, 0).await
}

pub async fn spawn_app_with_retries(backend: &MockBackend, retries: u32) -> TestApp {
    LazyLock::force(&TRACING);

    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        c.application.host = "127.0.0.1".into();
        c.application.port = 0;
        c.backend.origin = backend.origin.clone();
        c.backend.timeout_milliseconds = 200;
        c.backend.retries = retries;
        c
    };

    let application = Application::build(configuration)
        .await
        .expect("Failed to build application.");
    let address = format!("http://127.0.0.1:{}", application.port());
    tokio::spawn(application.run_until_stopped());

    let api_client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        address,
        api_client,
    }
}

pub fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("No Location header")
        .to_str()
        .unwrap()
}
