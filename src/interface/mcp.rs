//! MCP Server for bookshelf-mcp
//!
//! MCP Protocol (stdio) <-> application::Bookshelf
//!
//! 7 tools: book_add, book_update, book_delete, book_toggle, book_get, book_list, book_search

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use rmcp::{
    handler::server::{tool::ToolCallContext, tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolRequestParams, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
    transport::stdio,
    ErrorData as McpError, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::application::notify::ShelfEvent;
use crate::application::shelf::Bookshelf;
use crate::domain::error::DomainError;
use crate::domain::model::book::{Book, BookDraft};
use crate::domain::model::coerce;
use crate::domain::model::id::BookId;
use crate::infra::json_store::JsonFileStore;

use super::render::{format_book, format_matches, format_shelves};

// =============================================================================
// Public entry point
// =============================================================================

/// MCP Serverを起動する。data_dirは本棚データの保存先ディレクトリ。
pub async fn run(data_dir: PathBuf) -> anyhow::Result<()> {
    let server = BookshelfMcpServer::new(data_dir);
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}

// =============================================================================
// MCP Server
// =============================================================================

#[derive(Clone)]
struct BookshelfMcpServer {
    shelf: Arc<Mutex<Bookshelf<JsonFileStore>>>,
    tool_router: ToolRouter<Self>,
}

impl BookshelfMcpServer {
    fn new(data_dir: PathBuf) -> Self {
        tracing::info!(dir = %data_dir.display(), "opening bookshelf");
        let mut shelf = Bookshelf::new(JsonFileStore::new(data_dir));
        shelf.subscribe(|event: ShelfEvent, books: &[Book]| match event {
            ShelfEvent::Changed => tracing::debug!(count = books.len(), "bookshelf changed"),
            ShelfEvent::Persisted => tracing::debug!(count = books.len(), "bookshelf saved"),
        });
        shelf.load_from_storage();
        Self {
            shelf: Arc::new(Mutex::new(shelf)),
            tool_router: Self::tool_router(),
        }
    }

    fn shelf(&self) -> Result<MutexGuard<'_, Bookshelf<JsonFileStore>>, McpError> {
        self.shelf
            .lock()
            .map_err(|_| McpError::internal_error("Lock poisoned", None))
    }

    fn to_mcp_error(e: DomainError) -> McpError {
        McpError::invalid_params(format!("{e}"), None)
    }
}

// =============================================================================
// ServerHandler impl
// =============================================================================

impl ServerHandler for BookshelfMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "bookshelf-mcp".to_string(),
                title: Some("Bookshelf MCP".to_string()),
                description: Some(
                    "Personal bookshelf: track books as unfinished or finished, persisted to disk."
                        .to_string(),
                ),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Manage a reading list.\n\
                 \n\
                 Tools: `book_list` to see both shelves with IDs, `book_add` to add, \
                 `book_update`/`book_toggle`/`book_delete` with an ID from `book_list`, \
                 `book_search` to filter by title."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let tool_ctx = ToolCallContext::new(self, request, context);
        self.tool_router.call(tool_ctx).await
    }
}

// =============================================================================
// Request types
// =============================================================================

/// フォーム入力相当の年。数値でも文字列でも受け付ける。
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
enum YearInput {
    Number(f64),
    Text(String),
}

impl YearInput {
    fn coerce(&self) -> i32 {
        match self {
            YearInput::Number(n) => coerce::year_from_value(&serde_json::Value::from(*n)),
            YearInput::Text(s) => coerce::parse_year(s),
        }
    }
}

/// タイトルは空白のみを許さない。
fn validate_title(title: &str) -> Result<(), McpError> {
    if title.trim().is_empty() {
        return Err(McpError::invalid_params("title must not be empty", None));
    }
    Ok(())
}

fn parse_book_id(s: &str) -> Result<BookId, McpError> {
    s.parse().map_err(BookshelfMcpServer::to_mcp_error)
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpBookAddRequest {
    #[schemars(description = "Book title (required)")]
    pub title: String,
    #[schemars(description = "Author name")]
    #[serde(default)]
    pub author: String,
    #[schemars(description = "Publication year (number or numeric text)")]
    pub year: Option<YearInput>,
    #[schemars(description = "Already finished reading (default: false)")]
    #[serde(default)]
    pub is_complete: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpBookUpdateRequest {
    #[schemars(description = "Book ID from `book_list` output")]
    pub book_id: String,
    #[schemars(description = "New title (omit to keep current)")]
    pub title: Option<String>,
    #[schemars(description = "New author (omit to keep current)")]
    pub author: Option<String>,
    #[schemars(description = "New year, number or numeric text (omit to keep current)")]
    pub year: Option<YearInput>,
    #[schemars(description = "New finished flag (omit to keep current)")]
    pub is_complete: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpBookIdRequest {
    #[schemars(description = "Book ID from `book_list` output")]
    pub book_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpBookListRequest {}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpBookSearchRequest {
    #[schemars(description = "Case-insensitive part of the title. Empty matches every book.")]
    #[serde(default)]
    pub keyword: String,
}

// =============================================================================
// Tool implementations
// =============================================================================

#[tool_router]
impl BookshelfMcpServer {
    #[tool(
        name = "book_add",
        description = "Add a book to the shelf. Returns the new book's ID.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = false
        )
    )]
    async fn book_add(
        &self,
        Parameters(req): Parameters<McpBookAddRequest>,
    ) -> Result<CallToolResult, McpError> {
        validate_title(&req.title)?;
        let draft = BookDraft::new(
            req.title,
            req.author,
            req.year.as_ref().map(YearInput::coerce).unwrap_or(0),
            req.is_complete,
        );

        let mut shelf = self.shelf()?;
        let id = shelf.add(draft);
        let line = shelf.find(id).map(format_book).unwrap_or_default();

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Added: {line}"
        ))]))
    }

    #[tool(
        name = "book_update",
        description = "Edit a book's title, author, year, or finished flag. Only specified fields are changed.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn book_update(
        &self,
        Parameters(req): Parameters<McpBookUpdateRequest>,
    ) -> Result<CallToolResult, McpError> {
        let id = parse_book_id(&req.book_id)?;
        if let Some(title) = &req.title {
            validate_title(title)?;
        }

        let mut shelf = self.shelf()?;
        // 編集フォームと同様、現在値を起点に上書きする
        let current = shelf
            .find(id)
            .ok_or_else(|| Self::to_mcp_error(DomainError::BookNotFound(id)))?;
        let draft = BookDraft {
            title: req.title.unwrap_or_else(|| current.title().to_string()),
            author: req.author.unwrap_or_else(|| current.author().to_string()),
            year: req
                .year
                .as_ref()
                .map(YearInput::coerce)
                .unwrap_or(current.year()),
            is_complete: req.is_complete.unwrap_or(current.is_complete()),
        };

        shelf.update(id, draft).map_err(Self::to_mcp_error)?;
        let line = shelf.find(id).map(format_book).unwrap_or_default();

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Updated: {line}"
        ))]))
    }

    #[tool(
        name = "book_delete",
        description = "Remove a book from the shelf.",
        annotations(
            read_only_hint = false,
            destructive_hint = true,
            idempotent_hint = false,
            open_world_hint = false
        )
    )]
    async fn book_delete(
        &self,
        Parameters(req): Parameters<McpBookIdRequest>,
    ) -> Result<CallToolResult, McpError> {
        let id = parse_book_id(&req.book_id)?;
        let mut shelf = self.shelf()?;

        // 削除前に表示行を取得
        let line = shelf.find(id).map(format_book).unwrap_or_default();
        shelf.delete(id).map_err(Self::to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Removed: {line}"
        ))]))
    }

    #[tool(
        name = "book_toggle",
        description = "Move a book between the unfinished and finished shelves.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = false
        )
    )]
    async fn book_toggle(
        &self,
        Parameters(req): Parameters<McpBookIdRequest>,
    ) -> Result<CallToolResult, McpError> {
        let id = parse_book_id(&req.book_id)?;
        let mut shelf = self.shelf()?;
        shelf.toggle_completion(id).map_err(Self::to_mcp_error)?;
        let line = shelf.find(id).map(format_book).unwrap_or_default();

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Toggled: {line}"
        ))]))
    }

    #[tool(
        name = "book_get",
        description = "Show one book as JSON (the stored record).",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn book_get(
        &self,
        Parameters(req): Parameters<McpBookIdRequest>,
    ) -> Result<CallToolResult, McpError> {
        let id = parse_book_id(&req.book_id)?;
        let shelf = self.shelf()?;
        let book = shelf
            .find(id)
            .ok_or_else(|| Self::to_mcp_error(DomainError::BookNotFound(id)))?;
        let json = serde_json::to_string_pretty(book)
            .map_err(|e| McpError::internal_error(format!("JSON error: {e}"), None))?;

        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(
        name = "book_list",
        description = "Show every book, split into unfinished and finished shelves, with IDs.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn book_list(
        &self,
        Parameters(_req): Parameters<McpBookListRequest>,
    ) -> Result<CallToolResult, McpError> {
        let shelf = self.shelf()?;
        if shelf.is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(
                "Shelf is empty. Use `book_add` to add books.",
            )]));
        }
        let output = format_shelves(&shelf.shelves());
        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    #[tool(
        name = "book_search",
        description = "Find books whose title contains the keyword (case-insensitive). Shelf is NOT modified.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn book_search(
        &self,
        Parameters(req): Parameters<McpBookSearchRequest>,
    ) -> Result<CallToolResult, McpError> {
        let shelf = self.shelf()?;
        let hits = shelf.search(&req.keyword);
        Ok(CallToolResult::success(vec![Content::text(format_matches(
            &req.keyword,
            &hits,
        ))]))
    }
}
