//! # Common Test Utilities
//!
//! `TestApp` spawns the real server on a random port with its upload and
//! results directories in a temporary directory. By default the generation
//! provider is an OpenAI-compatible `local` provider pointed at an
//! `httpmock::MockServer`; tests can inject a `MockAiProvider` instead.

// Not every test binary uses every helper.
#![allow(unused)]

use anyhow::Result;
use httpmock::{prelude::*, Mock, MockServer};
use mcqgen::providers::ai::AiProvider;
use mcqgen_server::{
    config::{get_config, AppConfig},
    router,
    state::{build_app_state, build_app_state_with_provider, AppState},
};
use reqwest::{multipart, Client, Response};
use serde_json::json;
use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
};
use tempfile::{tempdir, TempDir};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub app_state: AppState,
    pub upload_dir: PathBuf,
    pub results_dir: PathBuf,
    _dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the server with the default test configuration.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(|_| {}, None).await
    }

    /// Spawns the server around an injected provider, e.g. a `MockAiProvider`.
    pub async fn spawn_with_provider(provider: Box<dyn AiProvider>) -> Result<Self> {
        Self::spawn_with(|_| {}, Some(provider)).await
    }

    /// Spawns the server after letting the caller adjust the loaded configuration.
    pub async fn spawn_with(
        configure: impl FnOnce(&mut AppConfig),
        provider: Option<Box<dyn AiProvider>>,
    ) -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let mock_server = MockServer::start();
        let dir = tempdir()?;
        let upload_dir = dir.path().join("uploads");
        let results_dir = dir.path().join("results");

        let config_path = dir.path().join("config.yml");
        let config_content = format!(
            r#"
port: 0
storage:
  upload_dir: '{}'
  results_dir: '{}'
  keep_uploads: true
artifacts:
  text: true
  pdf: true
generation:
  provider: "local_default"
  default_question_count: 5
  max_question_count: 20
providers:
  local_default:
    provider: "local"
    api_url: '{}'
    api_key: null
    model_name: "mock-chat-model"
"#,
            upload_dir.display(),
            results_dir.display(),
            mock_server.url("/v1/chat/completions")
        );
        fs::write(&config_path, config_content)?;

        let mut config = get_config(Some(config_path.to_str().unwrap()))?;
        configure(&mut config);

        let app_state = match provider {
            Some(provider) => build_app_state_with_provider(config, provider).await?,
            None => build_app_state(config).await?,
        };
        let app_state_for_harness = app_state.clone();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = axum::serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            app_state: app_state_for_harness,
            upload_dir,
            results_dir,
            _dir: dir,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Posts a document to `/generate`, optionally with a `num_questions` field.
    pub async fn post_document(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        num_questions: Option<&str>,
    ) -> Result<Response> {
        let mut form = multipart::Form::new()
            .part("file", multipart::Part::bytes(bytes).file_name(file_name.to_string()));
        if let Some(count) = num_questions {
            form = form.text("num_questions", count.to_string());
        }
        self.post_form(form).await
    }

    pub async fn post_form(&self, form: multipart::Form) -> Result<Response> {
        Ok(self
            .client
            .post(format!("{}/generate", self.address))
            .multipart(form)
            .send()
            .await?)
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self
            .client
            .get(format!("{}{}", self.address, path))
            .send()
            .await?)
    }

    /// Mocks a successful chat completion for requests whose body contains `needle`.
    pub fn mock_completion(&self, needle: &str, content: &str) -> Mock<'_> {
        let needle = needle.to_string();
        let content = content.to_string();
        self.mock_server.mock(move |when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .body_contains(needle);
            then.status(200).json_body(json!({
                "choices": [{"message": {"role": "assistant", "content": content}}]
            }));
        })
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Lists the file names in a directory, sorted. A missing directory is empty.
pub fn list_dir(path: &Path) -> Vec<String> {
    let mut names: Vec<String> = match fs::read_dir(path) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}

/// Extracts the download links from a rendered result page.
pub fn download_links(html: &str) -> Vec<String> {
    html.match_indices("href=\"/download/")
        .filter_map(|(start, marker)| {
            let rest = &html[start + marker.len()..];
            rest.find('"').map(|end| rest[..end].to_string())
        })
        .collect()
}
