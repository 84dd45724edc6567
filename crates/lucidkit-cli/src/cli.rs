//! Command-line interface for the lucidkit utility
//!
//! Builds sample documents, validates and re-arranges document JSON, packs
//! `.lucid` import archives and talks to the Lucid API.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use lucidkit::client::{archive, ClientConfig, LucidchartClient};
use lucidkit::core::logging::init_logging;
use lucidkit::layout::Layout;
use lucidkit::model::Document;

/// Lucidkit - Build and upload Lucidchart documents
#[derive(Parser)]
#[command(name = "lucidkit")]
#[command(about = "Build, validate and upload Lucidchart standard import documents")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    /// Client config file with an [api] table
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// API key, overriding any configured one
    #[arg(long, global = true)]
    pub api_key: Option<String>,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a sample flowchart document
    Example {
        /// Output file for the document JSON (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Arrangement applied after building
        #[arg(long, value_enum, default_value_t = LayoutChoice::None)]
        layout: LayoutChoice,

        /// Document title
        #[arg(long, default_value = "Example Flowchart")]
        title: String,
    },

    /// Check a document (JSON or .lucid archive)
    Validate {
        /// Input file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Re-arrange the shapes on every page of a document
    Layout {
        /// Input file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Arrangement pattern
        #[arg(long, value_enum, default_value_t = Pattern::Grid)]
        pattern: Pattern,

        /// Grid columns
        #[arg(long, default_value_t = 3)]
        columns: usize,

        /// Horizontal spacing (also the gap for horizontal and center)
        #[arg(long, default_value_t = 100.0)]
        spacing_x: f64,

        /// Vertical spacing
        #[arg(long, default_value_t = 100.0)]
        spacing_y: f64,

        /// Origin x (center x for the center pattern)
        #[arg(long, default_value_t = 50.0)]
        origin_x: f64,

        /// Origin y (center y for the center pattern)
        #[arg(long, default_value_t = 50.0)]
        origin_y: f64,
    },

    /// Pack a document into a .lucid import archive
    Pack {
        /// Input file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Archive to write
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Upload a document as a new Lucidchart document
    Upload {
        /// Input file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Title in Lucidchart (defaults to the document title)
        #[arg(long)]
        title: Option<String>,
    },

    /// Fetch a document's metadata
    Get {
        /// Document identifier
        id: String,

        /// Fetch the page and shape contents instead
        #[arg(long)]
        contents: bool,
    },

    /// Search documents
    Search {
        /// Keywords (all documents when empty)
        #[arg(long, default_value = "")]
        keywords: String,
    },

    /// Move a document to the trash
    Trash {
        /// Document identifier
        id: String,
    },
}

/// Arrangement for the example command
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum LayoutChoice {
    /// Keep the hand-placed coordinates
    #[default]
    None,
    Grid,
    Horizontal,
    Vertical,
    Center,
}

impl LayoutChoice {
    fn layout(self) -> Option<Layout> {
        match self {
            LayoutChoice::None => None,
            LayoutChoice::Grid => Some(Layout::grid()),
            LayoutChoice::Horizontal => Some(Layout::horizontal(200.0)),
            LayoutChoice::Vertical => Some(Layout::vertical(150.0)),
            LayoutChoice::Center => Some(Layout::center((400.0, 300.0), 50.0)),
        }
    }
}

/// Patterns for the layout command
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum Pattern {
    Grid,
    Horizontal,
    Vertical,
    Center,
}

/// Build a layout from the layout command's arguments
pub fn layout_for(
    pattern: Pattern,
    columns: usize,
    spacing: (f64, f64),
    origin: (f64, f64),
) -> Layout {
    match pattern {
        Pattern::Grid => Layout::Grid {
            columns,
            spacing_x: spacing.0,
            spacing_y: spacing.1,
            origin,
        },
        Pattern::Horizontal => Layout::Horizontal {
            spacing: spacing.0,
            start_x: origin.0,
            y: origin.1,
        },
        Pattern::Vertical => Layout::Vertical {
            spacing: spacing.1,
            x: origin.0,
            start_y: origin.1,
        },
        Pattern::Center => Layout::Center {
            center: origin,
            spacing: spacing.0,
        },
    }
}

/// The sample flowchart: start, two steps, a decision and an end
pub fn example_document(title: &str, layout: Option<Layout>) -> lucidkit::Result<Document> {
    let mut doc = Document::create(title);
    let mut builder = doc
        .first_page_mut()
        .builder()
        .add_circle(50.0, 50.0, 30.0, "Start")?
        .add_rectangle(200.0, 40.0, 120.0, 80.0, "Collect input")?
        .connect_last_two(None)?
        .add_rectangle(400.0, 40.0, 120.0, 80.0, "Process")?
        .connect_last_two(None)?
        .add_diamond(600.0, 30.0, 100.0, 100.0, "Valid?")?
        .connect_last_two(None)?
        .add_circle(780.0, 50.0, 30.0, "End")?
        .connect_last_two(Some("yes"))?;
    if let Some(layout) = layout {
        builder = builder.apply_layout(&layout)?;
    }
    builder.build();
    Ok(doc)
}

/// Main CLI application
#[derive(Default)]
pub struct LucidkitApp {
    config_path: Option<PathBuf>,
    api_key: Option<String>,
}

impl LucidkitApp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the application with the given CLI arguments
    pub fn run(mut self, cli: Cli) -> Result<()> {
        let log_level = cli
            .log_level
            .map(|l| l.as_str())
            .or(if cli.verbose { Some("info") } else { None });
        if let Err(e) = init_logging(log_level, cli.log_format.map(|f| f.as_str())) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("lucidkit v{}", env!("CARGO_PKG_VERSION"));
        }

        self.config_path = cli.config;
        self.api_key = cli.api_key;

        match cli.command {
            Commands::Example {
                output,
                layout,
                title,
            } => self.example_command(output, layout, &title, cli.verbose),
            Commands::Validate { input } => self.validate_command(input, cli.verbose),
            Commands::Layout {
                input,
                output,
                pattern,
                columns,
                spacing_x,
                spacing_y,
                origin_x,
                origin_y,
            } => {
                let layout =
                    layout_for(pattern, columns, (spacing_x, spacing_y), (origin_x, origin_y));
                self.layout_command(input, output, &layout, cli.verbose)
            }
            Commands::Pack { input, output } => self.pack_command(input, &output, cli.verbose),
            Commands::Upload { input, title } => self.upload_command(input, title, cli.verbose),
            Commands::Get { id, contents } => {
                let client = self.client()?;
                let value = if contents {
                    client.get_document_contents(&id)?
                } else {
                    client.get_document(&id)?
                };
                self.print_json(&value)
            }
            Commands::Search { keywords } => {
                let value = self.client()?.search_documents(&keywords)?;
                self.print_json(&value)
            }
            Commands::Trash { id } => {
                let value = self.client()?.trash_document(&id)?;
                if cli.verbose {
                    eprintln!("Moved document {} to the trash", id);
                }
                self.print_json(&value)
            }
        }
    }

    fn example_command(
        &self,
        output: Option<PathBuf>,
        layout: LayoutChoice,
        title: &str,
        verbose: bool,
    ) -> Result<()> {
        let doc = example_document(title, layout.layout())?;
        if verbose {
            eprintln!(
                "Built example with {} shapes and {} lines",
                doc.shape_count(),
                doc.line_count()
            );
        }
        self.write_output(output, &doc.to_json()?)
    }

    fn validate_command(&self, input: Option<PathBuf>, verbose: bool) -> Result<()> {
        let bytes = self.read_input_bytes(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", bytes.len());
        }

        match read_document(&bytes) {
            Ok(doc) => {
                println!(
                    "✓ Valid document '{}': {} pages, {} shapes, {} lines",
                    doc.title,
                    doc.pages().len(),
                    doc.shape_count(),
                    doc.line_count()
                );
                Ok(())
            }
            Err(e) => {
                println!("✗ Invalid document: {}", e);
                Err(e)
            }
        }
    }

    fn layout_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        layout: &Layout,
        verbose: bool,
    ) -> Result<()> {
        let mut doc = read_document(&self.read_input_bytes(input)?)?;
        for page in doc.pages_mut() {
            layout.apply(page.shapes_mut())?;
        }
        if verbose {
            eprintln!(
                "Applied {} layout to {} shapes",
                layout.name(),
                doc.shape_count()
            );
        }
        self.write_output(output, &doc.to_json()?)
    }

    fn pack_command(&self, input: Option<PathBuf>, output: &Path, verbose: bool) -> Result<()> {
        let doc = read_document(&self.read_input_bytes(input)?)?;
        let bytes = archive::build_import_archive(&doc.to_json()?)?;
        fs::write(output, &bytes)
            .map_err(|e| anyhow!("Failed to write archive '{}': {}", output.display(), e))?;
        if verbose {
            eprintln!("Wrote {} bytes to {}", bytes.len(), output.display());
        }
        Ok(())
    }

    fn upload_command(
        &self,
        input: Option<PathBuf>,
        title: Option<String>,
        verbose: bool,
    ) -> Result<()> {
        let doc = read_document(&self.read_input_bytes(input)?)?;
        let title = title.unwrap_or_else(|| doc.title.clone());
        let client = self.client()?;
        info!(title = %title, pages = doc.pages().len(), "Uploading document");
        let created = client.create_document(&title, &doc)?;
        if verbose {
            eprintln!("Uploaded '{}'", title);
        }
        self.print_json(&created)
    }

    /// Client from `--api-key`, `--config` or the default lookup
    fn client(&self) -> Result<LucidchartClient> {
        let config = match (&self.config_path, &self.api_key) {
            (Some(path), key) => ClientConfig::from_file_with_key(path, key.as_deref())?,
            (None, Some(key)) => ClientConfig::new(key.clone()),
            (None, None) => ClientConfig::load()?,
        };
        Ok(LucidchartClient::with_config(config)?)
    }

    fn print_json(&self, value: &serde_json::Value) -> Result<()> {
        self.write_output(None, &serde_json::to_string_pretty(value)?)
    }

    /// Read raw input from file or stdin
    pub fn read_input_bytes(&self, input: Option<PathBuf>) -> Result<Vec<u8>> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = Vec::new();
                io::stdin().read_to_end(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        let stdout_content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", stdout_content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}

/// Parse document JSON or a `.lucid` archive holding it
pub fn read_document(bytes: &[u8]) -> Result<Document> {
    let json = if archive::is_archive(bytes) {
        archive::read_import_archive(bytes)?
    } else {
        String::from_utf8(bytes.to_vec()).context("Input is neither UTF-8 JSON nor a .lucid archive")?
    };
    Ok(Document::from_json(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_cli_parsing_example_command() {
        let args = vec!["lucidkit", "example", "--output", "out.json", "--layout", "grid"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Example {
                output,
                layout,
                title,
            } => {
                assert_eq!(output.unwrap().to_string_lossy(), "out.json");
                assert_eq!(layout, LayoutChoice::Grid);
                assert_eq!(title, "Example Flowchart");
            }
            _ => panic!("Expected Example command"),
        }
    }

    #[test]
    fn test_cli_parsing_layout_defaults() {
        let args = vec!["lucidkit", "layout", "-i", "doc.json"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Layout {
                pattern,
                columns,
                spacing_x,
                origin_y,
                ..
            } => {
                assert_eq!(pattern, Pattern::Grid);
                assert_eq!(columns, 3);
                assert_eq!(spacing_x, 100.0);
                assert_eq!(origin_y, 50.0);
            }
            _ => panic!("Expected Layout command"),
        }
    }

    #[test]
    fn test_cli_parsing_get_command() {
        let args = vec!["lucidkit", "get", "abc-123", "--contents"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Get { id, contents } => {
                assert_eq!(id, "abc-123");
                assert!(contents);
            }
            _ => panic!("Expected Get command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = vec![
            "lucidkit",
            "validate",
            "--verbose",
            "--log-level",
            "debug",
            "--log-format",
            "json",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        assert_eq!(cli.log_format, Some(LogFormat::Json));
    }

    #[test]
    fn test_pack_requires_output() {
        assert!(Cli::try_parse_from(vec!["lucidkit", "pack"]).is_err());
    }

    #[test]
    fn test_example_document_shape() {
        let doc = example_document("Demo", None).unwrap();
        assert_eq!(doc.pages().len(), 1);
        assert_eq!(doc.shape_count(), 5);
        assert_eq!(doc.line_count(), 4);
        assert_eq!(doc.first_page().lines()[3].label(), Some("yes"));
    }

    #[test]
    fn test_example_document_with_layout() {
        let doc = example_document("Demo", LayoutChoice::Vertical.layout()).unwrap();
        let positions: Vec<_> = doc
            .first_page()
            .shapes()
            .iter()
            .map(|s| s.position())
            .collect();
        assert_eq!(positions[0], (50.0, 50.0));
        assert_eq!(positions[4], (50.0, 650.0));
    }

    #[test]
    fn test_layout_for_patterns() {
        let layout = layout_for(Pattern::Vertical, 3, (10.0, 20.0), (1.0, 2.0));
        assert_eq!(
            layout,
            Layout::Vertical {
                spacing: 20.0,
                x: 1.0,
                start_y: 2.0
            }
        );
        assert_eq!(
            layout_for(Pattern::Center, 3, (10.0, 20.0), (1.0, 2.0)).name(),
            "center"
        );
    }

    #[test]
    fn test_read_document_json_and_archive() {
        let doc = example_document("Demo", None).unwrap();
        let json = doc.to_json().unwrap();
        assert_eq!(read_document(json.as_bytes()).unwrap(), doc);

        let bytes = archive::build_import_archive(&json).unwrap();
        assert_eq!(read_document(&bytes).unwrap(), doc);

        assert!(read_document(b"{\"title\": \"no pages\"}").is_err());
    }

    #[test]
    fn test_read_input_from_file() {
        let app = LucidkitApp::new();
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("doc.json");
        fs::write(&file_path, b"{}").unwrap();

        let content = app.read_input_bytes(Some(file_path)).unwrap();
        assert_eq!(content, b"{}");
    }

    #[test]
    fn test_write_output_to_file() {
        let app = LucidkitApp::new();
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("output.json");

        app.write_output(Some(file_path.clone()), "{}").unwrap();

        let read_content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(read_content, "{}");
    }

    #[test]
    fn test_client_uses_explicit_key() {
        let app = LucidkitApp {
            config_path: None,
            api_key: Some("cli-key".to_string()),
        };
        let client = app.client().unwrap();
        assert_eq!(client.config().api_key, "cli-key");
    }

    #[test]
    fn test_client_key_overrides_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api]\nkey = \"file-key\"\nproduct = \"lucidspark\"\n").unwrap();
        let app = LucidkitApp {
            config_path: Some(path),
            api_key: Some("cli-key".to_string()),
        };
        let client = app.client().unwrap();
        assert_eq!(client.config().api_key, "cli-key");
        assert_eq!(client.config().product, "lucidspark");
    }

    #[test]
    fn test_client_key_fills_keyless_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api]\nbase_url = \"http://localhost:9000\"\n").unwrap();

        let app = LucidkitApp {
            config_path: Some(path.clone()),
            api_key: Some("cli-key".to_string()),
        };
        let client = app.client().unwrap();
        assert_eq!(client.config().api_key, "cli-key");
        assert_eq!(client.config().base_url, "http://localhost:9000");

        let keyless = LucidkitApp {
            config_path: Some(path),
            api_key: None,
        };
        assert!(keyless.client().is_err());
    }
}
