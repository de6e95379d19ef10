use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout is the MCP transport; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bookshelf_mcp=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let data_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("bookshelf-data"));

    bookshelf_mcp::interface::mcp::run(data_dir).await
}
