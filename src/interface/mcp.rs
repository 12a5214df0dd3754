//! MCP Server for catalog-mcp
//!
//! MCP Protocol (stdio) <-> application::CatalogService / domain::query
//!
//! 8 tools: book_add, book_remove, book_edit, book_list, book_search,
//! book_sort, report, recommend

use std::path::PathBuf;

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

use crate::application::error::AppError;
use crate::application::render::{render_recommendation, render_summary, render_table};
use crate::application::service::CatalogService;
use crate::domain::error::DomainError;
use crate::domain::model::book::Book;
use crate::domain::model::catalog::Catalog;
use crate::domain::query::{self, SortKey};
use crate::infra::json_store::JsonCatalogRepository;

// =============================================================================
// Public entry point
// =============================================================================

/// MCP Serverを起動する。catalog_pathは蔵書JSONファイル。
pub async fn run(catalog_path: PathBuf) -> anyhow::Result<()> {
    tracing::info!(path = %catalog_path.display(), "starting catalog-mcp server");
    let server = CatalogMcpServer::new(catalog_path);
    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}

// =============================================================================
// MCP Server
// =============================================================================

#[derive(Clone)]
struct CatalogMcpServer {
    catalog_path: PathBuf,
    tool_router: ToolRouter<Self>,
}

impl CatalogMcpServer {
    fn new(catalog_path: PathBuf) -> Self {
        Self {
            catalog_path,
            tool_router: Self::tool_router(),
        }
    }

    /// 呼び出し毎に新しいServiceを作る。状態はファイルだけが持つ。
    fn service(&self) -> CatalogService<JsonCatalogRepository> {
        CatalogService::new(JsonCatalogRepository::new(&self.catalog_path))
    }

    fn to_mcp_error(e: AppError) -> McpError {
        match e {
            AppError::Domain(_) => McpError::invalid_params(format!("{e}"), None),
            AppError::Io(_) | AppError::CorruptData(_) => {
                tracing::error!(error = %e, "catalog storage failure");
                McpError::internal_error(format!("{e}"), None)
            }
        }
    }
}

// =============================================================================
// ServerHandler impl
// =============================================================================

impl ServerHandler for CatalogMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "catalog-mcp".to_string(),
                title: Some("Catalog MCP: Personal Book Manager".to_string()),
                description: Some(
                    "Personal book catalog stored as one JSON file. \
                     Add, edit, remove, search, sort, summarize and get recommendations."
                        .to_string(),
                ),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Manage a personal book catalog.\n\
                 \n\
                 Books are identified by title. Use `book_list` to see titles before \
                 `book_edit` or `book_remove`.\n\
                 \n\
                 Tools: `book_add`, `book_edit`, `book_remove`, `book_list`, `book_search`, \
                 `book_sort`, `report`, `recommend`."
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

/// 空文字列（空白のみも含む）を弾く。検索・推薦は空入力では実行しない。
fn require_text<'a>(field: &str, value: &'a str) -> Result<&'a str, McpError> {
    if value.trim().is_empty() {
        return Err(McpError::invalid_params(
            format!("{field} must not be empty"),
            None,
        ));
    }
    Ok(value)
}

/// 削除・編集の対象選択用にtitle一覧を返す。
fn format_titles(catalog: &Catalog) -> String {
    if catalog.is_empty() {
        return "No books available.".to_string();
    }
    let mut output = String::from("Available titles:\n");
    for title in catalog.titles() {
        output.push_str(&format!("- {title}\n"));
    }
    output
}

fn parse_sort_key(s: &str) -> Result<SortKey, McpError> {
    s.parse().map_err(|msg: String| McpError::invalid_params(msg, None))
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpBookAddRequest {
    #[schemars(description = "Book title (used as the book's key)")]
    pub title: String,
    #[schemars(description = "Author name")]
    pub author: String,
    #[schemars(description = "Publication year")]
    pub year: i64,
    #[schemars(description = "Page count")]
    pub pages: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpBookRemoveRequest {
    #[schemars(description = "Exact title of the book to remove (case-sensitive)")]
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpBookEditRequest {
    #[schemars(description = "Exact title of the book to edit (case-sensitive)")]
    pub title: String,
    #[schemars(description = "New title (omit to keep current)")]
    pub new_title: Option<String>,
    #[schemars(description = "New author (omit to keep current)")]
    pub author: Option<String>,
    #[schemars(description = "New publication year (omit to keep current)")]
    pub year: Option<i64>,
    #[schemars(description = "New page count (omit to keep current)")]
    pub pages: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpBookListRequest {}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpBookSearchRequest {
    #[schemars(description = "Keyword matched against title or author (case-insensitive)")]
    pub keyword: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpBookSortRequest {
    #[schemars(description = "Sort key: year, pages, or title")]
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpReportRequest {}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpRecommendRequest {
    #[schemars(description = "A title or author you liked")]
    pub query: String,
}

impl McpBookEditRequest {
    /// 未指定フィールドを現在値で埋めて、4フィールド揃ったBookにする。
    fn merge_into(self, current: &Book) -> Book {
        Book::new(
            self.new_title.unwrap_or_else(|| current.title().to_string()),
            self.author.unwrap_or_else(|| current.author().to_string()),
            self.year.unwrap_or(current.year()),
            self.pages.unwrap_or(current.pages()),
        )
    }
}

// =============================================================================
// Tool implementations
// =============================================================================

#[tool_router]
impl CatalogMcpServer {
    #[tool(
        name = "book_add",
        description = "Add a new book to the catalog. All four fields are required.",
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
        let book = Book::new(req.title, req.author, req.year, req.pages);
        let title = book.title().to_string();
        self.service()
            .add_book(book)
            .map_err(Self::to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Book added: {title}"
        ))]))
    }

    #[tool(
        name = "book_remove",
        description = "Remove a book by exact title. Every book with that title is removed.",
        annotations(
            read_only_hint = false,
            destructive_hint = true,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn book_remove(
        &self,
        Parameters(req): Parameters<McpBookRemoveRequest>,
    ) -> Result<CallToolResult, McpError> {
        let removed = self
            .service()
            .remove_book(&req.title)
            .map_err(Self::to_mcp_error)?;

        let text = match removed {
            0 => {
                let catalog = self.service().load_books().map_err(Self::to_mcp_error)?;
                format!(
                    "No book titled '{}'. Nothing removed.\n\n{}",
                    req.title,
                    format_titles(&catalog)
                )
            }
            1 => format!("Book removed: {}", req.title),
            n => format!("Removed {n} books titled '{}'", req.title),
        };
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        name = "book_edit",
        description = "Edit a book selected by exact title. Omitted fields keep their current values; the record is rewritten as a whole.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn book_edit(
        &self,
        Parameters(req): Parameters<McpBookEditRequest>,
    ) -> Result<CallToolResult, McpError> {
        let svc = self.service();
        let catalog = svc.load_books().map_err(Self::to_mcp_error)?;
        let current = catalog
            .find_by_title(&req.title)
            .ok_or_else(|| {
                McpError::invalid_params(
                    format!(
                        "{}\n\n{}",
                        DomainError::BookNotFound(req.title.clone()),
                        format_titles(&catalog)
                    ),
                    None,
                )
            })?
            .clone();

        let target = req.title.clone();
        let updated = req.merge_into(&current);
        let new_title = updated.title().to_string();
        svc.edit_book(&target, updated)
            .map_err(Self::to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Book updated: {new_title}"
        ))]))
    }

    #[tool(
        name = "book_list",
        description = "Show all books in insertion order.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn book_list(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpBookListRequest>,
    ) -> Result<CallToolResult, McpError> {
        let catalog = self.service().load_books().map_err(Self::to_mcp_error)?;
        if catalog.is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(
                "No books available.",
            )]));
        }
        let books: Vec<&Book> = catalog.iter().collect();
        Ok(CallToolResult::success(vec![Content::text(format!(
            "# All Books ({})\n\n{}",
            catalog.len(),
            render_table(&books)
        ))]))
    }

    #[tool(
        name = "book_search",
        description = "Search books whose title or author contains the keyword (case-insensitive).",
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
        let keyword = require_text("keyword", &req.keyword)?;
        let catalog = self.service().load_books().map_err(Self::to_mcp_error)?;
        let results = query::search(&catalog, keyword);
        if results.is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(
                "No results found.",
            )]));
        }
        Ok(CallToolResult::success(vec![Content::text(format!(
            "## Results\n\n{}",
            render_table(&results)
        ))]))
    }

    #[tool(
        name = "book_sort",
        description = "List books sorted ascending by year, pages, or title (title ignores case). Equal keys keep insertion order.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn book_sort(
        &self,
        Parameters(req): Parameters<McpBookSortRequest>,
    ) -> Result<CallToolResult, McpError> {
        let key = parse_sort_key(&req.key)?;
        let catalog = self.service().load_books().map_err(Self::to_mcp_error)?;
        if catalog.is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(
                "No books available.",
            )]));
        }
        let sorted = query::sort(&catalog, key);
        Ok(CallToolResult::success(vec![Content::text(format!(
            "## Sorted by {key}\n\n{}",
            render_table(&sorted)
        ))]))
    }

    #[tool(
        name = "report",
        description = "Summary report: total books, average pages, most pages, oldest and newest book.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn report(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpReportRequest>,
    ) -> Result<CallToolResult, McpError> {
        let catalog = self.service().load_books().map_err(Self::to_mcp_error)?;
        let summary = query::report(&catalog)
            .map_err(|e| Self::to_mcp_error(e.into()))?;
        Ok(CallToolResult::success(vec![Content::text(
            render_summary(&summary),
        )]))
    }

    #[tool(
        name = "recommend",
        description = "Recommend books: first by author match; if none, by titles similar to the query (up to 5).",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn recommend(
        &self,
        Parameters(req): Parameters<McpRecommendRequest>,
    ) -> Result<CallToolResult, McpError> {
        let q = require_text("query", &req.query)?;
        let catalog = self.service().load_books().map_err(Self::to_mcp_error)?;
        if catalog.is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(
                "No books to recommend.",
            )]));
        }
        let rec = query::recommend(&catalog, q);
        Ok(CallToolResult::success(vec![Content::text(
            render_recommendation(&rec),
        )]))
    }
}

// =============================================================================
// Tests
// =============================================================================
