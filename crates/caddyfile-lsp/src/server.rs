//! LSP server implementation

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::completion::completions_at;
use crate::diagnostics::compute_diagnostics;
use crate::document::DocumentStore;
use crate::hover::hover_at;

/// The Caddyfile language server
pub struct CaddyLanguageServer {
    /// LSP client for sending notifications
    client: Client,
    /// Open documents
    documents: DocumentStore,
}

impl CaddyLanguageServer {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            documents: DocumentStore::new(),
        }
    }

    /// Reparse, reanalyze and publish diagnostics for a document
    async fn publish_diagnostics(&self, uri: Url, content: &str, version: Option<i32>) {
        let diagnostics = compute_diagnostics(content);
        debug!(%uri, count = diagnostics.len(), "publishing diagnostics");
        self.client
            .publish_diagnostics(uri, diagnostics, version)
            .await;
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for CaddyLanguageServer {
    async fn initialize(&self, _params: InitializeParams) -> Result<InitializeResult> {
        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::FULL),
                        save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                            include_text: Some(true),
                        })),
                        ..Default::default()
                    },
                )),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                completion_provider: Some(CompletionOptions {
                    trigger_characters: Some(vec![" ".into()]),
                    resolve_provider: Some(false),
                    ..Default::default()
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "caddy-ls".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        info!("client initialized");
        self.client
            .log_message(MessageType::INFO, "Caddyfile language server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        info!("shutdown requested");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let content = params.text_document.text;
        let version = params.text_document.version;

        self.publish_diagnostics(uri.clone(), &content, Some(version))
            .await;
        self.documents.open(uri, content).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        // Full sync: the last change carries the whole document
        let Some(change) = params.content_changes.into_iter().last() else {
            return;
        };
        let content = change.text;

        self.publish_diagnostics(uri.clone(), &content, Some(version))
            .await;
        self.documents.update(uri, content).await;
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let uri = params.text_document.uri;
        match params.text {
            Some(content) => {
                self.publish_diagnostics(uri.clone(), &content, None).await;
                self.documents.update(uri, content).await;
            }
            // Clients may omit the text; reanalyze what we already have
            None => {
                let Some(content) = self.documents.get(&uri).await else {
                    debug!(%uri, "save for unknown document");
                    return;
                };
                self.publish_diagnostics(uri, &content, None).await;
            }
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.close(&uri).await;

        // Clear diagnostics
        self.client.publish_diagnostics(uri, vec![], None).await;
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        let Some(content) = self.documents.get(&uri).await else {
            return Ok(None);
        };
        Ok(hover_at(&content, position))
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri;
        let position = params.text_document_position.position;

        let Some(content) = self.documents.get(&uri).await else {
            return Ok(None);
        };
        let items = completions_at(&content, position.line, position.character);
        Ok(Some(CompletionResponse::Array(items)))
    }
}

/// Install the global `tracing` subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init_logging(level: LevelFilter) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Run the LSP server on stdin/stdout
pub async fn run() -> eyre::Result<()> {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    info!(version = env!("CARGO_PKG_VERSION"), "starting caddy-ls");
    let (service, socket) = LspService::new(CaddyLanguageServer::new);
    Server::new(stdin, stdout, socket).serve(service).await;

    Ok(())
}
