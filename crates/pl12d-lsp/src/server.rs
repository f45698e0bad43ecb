//! Session dispatcher.
//!
//! One session owns the document store and the parser. Messages are read,
//! dispatched and answered strictly in arrival order; the loop only ends
//! on `exit`, end of input or a fatal transport error.

use std::io::{BufRead, Write};

use lsp_server::{Message, Notification, Request, Response};
use lsp_types::{
    CompletionItem, CompletionOptions, CompletionParams, DidChangeTextDocumentParams,
    DidOpenTextDocumentParams, DocumentFormattingParams, GotoDefinitionParams, HoverParams,
    HoverProviderCapability, InitializeResult, OneOf, ServerCapabilities, ServerInfo,
    TextDocumentSyncCapability, TextDocumentSyncKind, Uri,
};
use pl12d_syntax::{SyntaxParser, SyntaxTree};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ServerConfig;
use crate::error::{RequestError, ServerError};
use crate::handlers::completion::{handle_completion, resolve_completion};
use crate::handlers::definition::handle_goto_definition;
use crate::handlers::formatting::handle_formatting;
use crate::handlers::hover::handle_hover;
use crate::store::DocumentStore;
use crate::transport::{read_message, write_message};

/// A decoded method name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// `initialize`
    Initialize,
    /// `initialized`
    Initialized,
    /// `shutdown`
    Shutdown,
    /// `exit`
    Exit,
    /// `textDocument/didOpen`
    DidOpen,
    /// `textDocument/didChange`
    DidChange,
    /// `textDocument/completion`
    Completion,
    /// `completionItem/resolve`
    CompletionResolve,
    /// `textDocument/definition`
    Definition,
    /// `textDocument/formatting`
    Formatting,
    /// `textDocument/hover`
    Hover,
    /// A `$/` method.
    Reserved(String),
    /// Anything else.
    Unknown(String),
}

impl Method {
    /// Decode a method name.
    pub fn parse(method: &str) -> Self {
        match method {
            "initialize" => Self::Initialize,
            "initialized" => Self::Initialized,
            "shutdown" => Self::Shutdown,
            "exit" => Self::Exit,
            "textDocument/didOpen" => Self::DidOpen,
            "textDocument/didChange" => Self::DidChange,
            "textDocument/completion" => Self::Completion,
            "completionItem/resolve" => Self::CompletionResolve,
            "textDocument/definition" => Self::Definition,
            "textDocument/formatting" => Self::Formatting,
            "textDocument/hover" => Self::Hover,
            reserved if reserved.len() > 2 && reserved.starts_with("$/") => {
                Self::Reserved(reserved.to_string())
            }
            unknown => Self::Unknown(unknown.to_string()),
        }
    }

    /// Whether the method never gets a reply, even when sent with an id.
    pub const fn is_notification(&self) -> bool {
        matches!(
            self,
            Self::Initialized | Self::Exit | Self::DidOpen | Self::DidChange
        )
    }
}

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Answering requests.
    Running,
    /// `shutdown` was answered; requests are still served until `exit`.
    ShuttingDown,
    /// `exit` was received.
    Terminated,
}

/// A language server session.
#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    store: DocumentStore,
    parser: SyntaxParser,
    phase: Phase,
}

#[derive(Serialize)]
struct JsonRpc<'a> {
    jsonrpc: &'static str,
    #[serde(flatten)]
    msg: &'a Message,
}

impl Server {
    /// Create a session.
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        Ok(Self {
            config,
            store: DocumentStore::new(),
            parser: SyntaxParser::new()?,
            phase: Phase::Running,
        })
    }

    /// Current lifecycle phase.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Open documents.
    pub const fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Serve messages from `reader` until `exit` or end of input, writing
    /// replies to `writer`.
    pub fn serve<R: BufRead, W: Write>(
        &mut self,
        mut reader: R,
        mut writer: W,
    ) -> Result<(), ServerError> {
        tracing::info!(version = crate::VERSION, "language server started");

        while self.phase != Phase::Terminated {
            let body = match read_message(&mut reader) {
                Ok(Some(body)) => body,
                Ok(None) => {
                    tracing::info!("input closed");
                    break;
                }
                Err(err) if err.is_recoverable() => {
                    tracing::warn!(%err, "skipping malformed message");
                    continue;
                }
                Err(err) => {
                    tracing::error!(%err, "transport failed");
                    return Err(err.into());
                }
            };

            let message: Message = match serde_json::from_slice(&body) {
                Ok(message) => message,
                Err(err) => {
                    tracing::warn!(%err, "dropping undecodable message");
                    continue;
                }
            };

            if let Some(response) = self.handle_message(message) {
                let reply = Message::Response(response);
                let body = serde_json::to_vec(&JsonRpc {
                    jsonrpc: "2.0",
                    msg: &reply,
                })?;
                write_message(&mut writer, &body)?;
            }
        }

        tracing::info!(phase = ?self.phase, "language server stopped");
        Ok(())
    }

    /// Dispatch one decoded message, returning the reply if it needs one.
    pub fn handle_message(&mut self, message: Message) -> Option<Response> {
        match message {
            Message::Request(request) => self.handle_request(request),
            Message::Notification(notification) => {
                self.handle_notification(notification);
                None
            }
            Message::Response(response) => {
                tracing::debug!(id = %response.id, "ignoring client response");
                None
            }
        }
    }

    fn handle_request(&mut self, request: Request) -> Option<Response> {
        tracing::debug!(id = %request.id, method = %request.method, "request");

        let method = Method::parse(&request.method);
        if method.is_notification() {
            tracing::warn!(method = %request.method, "notification sent as a request");
            self.handle_notification(Notification::new(request.method, request.params));
            return None;
        }

        let response = match self.dispatch(method, request.params) {
            Ok(result) => Response::new_ok(request.id, result),
            Err(err) => {
                tracing::warn!(method = %request.method, %err, "request failed");
                Response::new_err(request.id, err.code() as i32, err.to_string())
            }
        };
        Some(response)
    }

    fn dispatch(&mut self, method: Method, params: Value) -> Result<Value, RequestError> {
        match method {
            Method::Initialize => {
                tracing::info!("initialize");
                encode(initialize_result())
            }
            Method::Shutdown => {
                tracing::info!("shutdown requested");
                self.phase = Phase::ShuttingDown;
                Ok(Value::Null)
            }
            Method::Completion => {
                let params: CompletionParams = decode(params)?;
                let uri = &params.text_document_position.text_document.uri;
                let filter = self.config.filter_completions;
                encode(
                    self.parse_document(uri)
                        .and_then(|tree| handle_completion(&params, &tree, filter)),
                )
            }
            Method::CompletionResolve => {
                let item: CompletionItem = decode(params)?;
                encode(resolve_completion(item))
            }
            Method::Definition => {
                let params: GotoDefinitionParams = decode(params)?;
                let uri = &params.text_document_position_params.text_document.uri;
                encode(
                    self.parse_document(uri)
                        .and_then(|tree| handle_goto_definition(&params, &tree)),
                )
            }
            Method::Formatting => {
                let params: DocumentFormattingParams = decode(params)?;
                let edits = self
                    .parse_document(&params.text_document.uri)
                    .map(|tree| handle_formatting(&params, &tree))
                    .unwrap_or_default();
                encode(edits)
            }
            Method::Hover => {
                let params: HoverParams = decode(params)?;
                let uri = &params.text_document_position_params.text_document.uri;
                encode(
                    self.parse_document(uri)
                        .and_then(|tree| handle_hover(&params, &tree)),
                )
            }
            Method::Reserved(name) | Method::Unknown(name) => {
                Err(RequestError::MethodNotFound(name))
            }
            Method::Initialized | Method::Exit | Method::DidOpen | Method::DidChange => {
                Err(RequestError::MethodNotFound(format!("{method:?}")))
            }
        }
    }

    fn handle_notification(&mut self, notification: Notification) {
        match Method::parse(&notification.method) {
            Method::Initialized => tracing::info!("client initialized"),
            Method::Exit => {
                if self.phase != Phase::ShuttingDown {
                    tracing::info!("exit without shutdown");
                }
                self.phase = Phase::Terminated;
            }
            Method::DidOpen => match decode::<DidOpenTextDocumentParams>(notification.params) {
                Ok(params) => self.did_open(params),
                Err(err) => tracing::warn!(%err, "bad didOpen"),
            },
            Method::DidChange => match decode::<DidChangeTextDocumentParams>(notification.params) {
                Ok(params) => self.did_change(params),
                Err(err) => tracing::warn!(%err, "bad didChange"),
            },
            _ => tracing::debug!(method = %notification.method, "ignoring notification"),
        }
    }

    fn did_open(&mut self, params: DidOpenTextDocumentParams) {
        let document = params.text_document;
        if document.language_id != self.config.language_id {
            tracing::warn!(
                uri = document.uri.as_str(),
                language_id = %document.language_id,
                "ignoring document in another language"
            );
            return;
        }
        self.store
            .open(document.uri.as_str(), &document.text, document.version);
    }

    fn did_change(&mut self, params: DidChangeTextDocumentParams) {
        let document = params.text_document;
        // Whole-document sync: the last change carries the full text.
        let Some(change) = params.content_changes.into_iter().last() else {
            tracing::debug!(uri = document.uri.as_str(), "empty change");
            return;
        };
        self.store
            .replace(document.uri.as_str(), &change.text, document.version);
    }

    /// Parse a snapshot of a stored document.
    fn parse_document(&mut self, uri: &Uri) -> Option<SyntaxTree> {
        let Some(text) = self.store.text(uri.as_str()) else {
            tracing::debug!(uri = uri.as_str(), "document not open");
            return None;
        };
        match self.parser.parse(&text) {
            Ok(tree) => Some(tree),
            Err(err) => {
                tracing::warn!(uri = uri.as_str(), %err, "parse failed");
                None
            }
        }
    }
}

/// Capabilities advertised in response to `initialize`.
pub fn server_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
        completion_provider: Some(CompletionOptions {
            resolve_provider: Some(true),
            ..Default::default()
        }),
        hover_provider: Some(HoverProviderCapability::Simple(true)),
        definition_provider: Some(OneOf::Left(true)),
        document_formatting_provider: Some(OneOf::Left(true)),
        ..Default::default()
    }
}

fn initialize_result() -> InitializeResult {
    InitializeResult {
        capabilities: server_capabilities(),
        server_info: Some(ServerInfo {
            name: "pl12d-lsp".to_string(),
            version: Some(crate::VERSION.to_string()),
        }),
    }
}

fn decode<P: DeserializeOwned>(params: Value) -> Result<P, RequestError> {
    serde_json::from_value(params).map_err(RequestError::InvalidParams)
}

fn encode<T: Serialize>(result: T) -> Result<Value, RequestError> {
    serde_json::to_value(result).map_err(RequestError::Internal)
}
