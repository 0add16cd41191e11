//! # Certcanvas CLI
//!
//! Command-line interface for certificate templates.
//!
//! ## Usage
//!
//! ```bash
//! # List the tokens a template expects
//! certcanvas placeholders template.json
//!
//! # Fill a template and print the resulting document
//! certcanvas substitute template.json --data '{"name": "Ada"}'
//!
//! # Render one certificate to PNG
//! certcanvas render template.json --data data.json --png out.png \
//!     --image logo.png=assets/logo.png --qr
//!
//! # Render one certificate per entry of a JSON array
//! certcanvas batch template.json --data people.json --out-dir certificates/
//! ```
//!
//! `--data` accepts inline JSON or a path to a JSON file. Logging goes to
//! stderr and follows `RUST_LOG`.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use certcanvas::{
    AssetResolver, CanvasError, Document, RenderLimits, Renderer, SubstitutionMap,
    document::QrCodeProducer, extract_placeholders, substitute,
};

/// Certcanvas - Certificate template renderer
#[derive(Parser, Debug)]
#[command(name = "certcanvas")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log every painted element
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the placeholder names a template refers to
    Placeholders {
        /// Template document (JSON)
        document: PathBuf,
    },

    /// Substitute values into a template and print the document as JSON
    Substitute {
        /// Template document (JSON)
        document: PathBuf,

        /// Substitution map: inline JSON object or path to a JSON file
        #[arg(long)]
        data: String,

        /// Write to a file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Render a template to PNG
    Render {
        /// Template document (JSON)
        document: PathBuf,

        /// Substitution map: inline JSON object or path to a JSON file
        #[arg(long)]
        data: Option<String>,

        /// Output PNG file
        #[arg(long, value_name = "FILE")]
        png: PathBuf,

        #[command(flatten)]
        assets: AssetArgs,

        #[command(flatten)]
        limits: LimitArgs,
    },

    /// Render one PNG per substitution map in a JSON array
    Batch {
        /// Template document (JSON)
        document: PathBuf,

        /// JSON array of substitution maps: inline or path to a file
        #[arg(long)]
        data: String,

        /// Directory for the numbered PNG files
        #[arg(long, value_name = "DIR")]
        out_dir: PathBuf,

        #[command(flatten)]
        assets: AssetArgs,

        #[command(flatten)]
        limits: LimitArgs,
    },
}

#[derive(clap::Args, Debug)]
struct AssetArgs {
    /// Register an image source, as REF=PATH (repeatable)
    #[arg(long = "image", value_name = "REF=PATH", value_parser = parse_image_arg)]
    images: Vec<(String, PathBuf)>,

    /// Generate QR codes for QrCode elements
    #[arg(long)]
    qr: bool,
}

impl AssetArgs {
    fn load(&self) -> Result<AssetResolver, CanvasError> {
        let mut assets = AssetResolver::new();
        for (source_ref, path) in &self.images {
            assets.load_image_file(source_ref.clone(), path)?;
        }
        if self.qr {
            assets = assets.with_qr_producer(QrCodeProducer::default());
        }
        Ok(assets)
    }
}

#[derive(clap::Args, Debug)]
struct LimitArgs {
    /// Start from the small preview limits instead of the defaults
    #[arg(long)]
    preview: bool,

    /// Maximum surface width in pixels
    #[arg(long)]
    max_width: Option<u32>,

    /// Maximum surface height in pixels
    #[arg(long)]
    max_height: Option<u32>,

    /// Maximum number of elements
    #[arg(long)]
    max_elements: Option<usize>,
}

impl LimitArgs {
    fn limits(&self) -> RenderLimits {
        let base = if self.preview {
            RenderLimits::PREVIEW
        } else {
            RenderLimits::DEFAULT
        };
        RenderLimits {
            max_width: self.max_width.unwrap_or(base.max_width),
            max_height: self.max_height.unwrap_or(base.max_height),
            max_elements: self.max_elements.unwrap_or(base.max_elements),
            ..base
        }
    }
}

fn parse_image_arg(s: &str) -> Result<(String, PathBuf), String> {
    match s.split_once('=') {
        Some((source_ref, path)) if !source_ref.is_empty() && !path.is_empty() => {
            Ok((source_ref.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected REF=PATH, got '{}'", s)),
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), CanvasError> {
    match command {
        Commands::Placeholders { document } => {
            let doc = load_document(&document)?;
            for name in extract_placeholders(&doc) {
                println!("{}", name);
            }
        }

        Commands::Substitute {
            document,
            data,
            out,
        } => {
            let doc = load_document(&document)?;
            let map: SubstitutionMap = serde_json::from_str(&read_json_arg(&data)?)?;
            let json = substitute(&doc, &map).to_json()?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("Saved to {}", path.display());
                }
                None => println!("{}", json),
            }
        }

        Commands::Render {
            document,
            data,
            png,
            assets,
            limits,
        } => {
            let doc = load_document(&document)?;
            let map: SubstitutionMap = match data {
                Some(data) => serde_json::from_str(&read_json_arg(&data)?)?,
                None => SubstitutionMap::new(),
            };
            let assets = assets.load()?;
            let renderer = Renderer::new()
                .with_limits(limits.limits())
                .with_assets(&assets);

            println!("Rendering {} ({}x{})...", document.display(), doc.width, doc.height);
            renderer.render_substituted(&doc, &map)?.save_png(&png)?;
            println!("Saved to {}", png.display());
        }

        Commands::Batch {
            document,
            data,
            out_dir,
            assets,
            limits,
        } => {
            let doc = load_document(&document)?;
            let maps: Vec<SubstitutionMap> = serde_json::from_str(&read_json_arg(&data)?)?;
            let assets = assets.load()?;
            let renderer = Renderer::new()
                .with_limits(limits.limits())
                .with_assets(&assets);

            std::fs::create_dir_all(&out_dir)?;
            println!("Rendering {} certificates...", maps.len());

            let mut first_error = None;
            for (i, result) in renderer.render_batch(&doc, &maps).into_iter().enumerate() {
                let path = out_dir.join(format!("certificate-{:04}.png", i + 1));
                match result.and_then(|surface| surface.save_png(&path)) {
                    Ok(()) => println!("  {}", path.display()),
                    Err(e) => {
                        eprintln!("  entry {}: {}", i, e);
                        first_error.get_or_insert(e);
                    }
                }
            }
            if let Some(e) = first_error {
                return Err(e);
            }
            println!("Saved to {}", out_dir.display());
        }
    }

    Ok(())
}

fn load_document(path: &Path) -> Result<Document, CanvasError> {
    let json = std::fs::read_to_string(path)?;
    Document::from_json(&json)
}

/// Inline JSON when it looks like JSON, otherwise a path to read.
fn read_json_arg(arg: &str) -> Result<String, CanvasError> {
    let trimmed = arg.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        Ok(arg.to_string())
    } else {
        Ok(std::fs::read_to_string(arg)?)
    }
}
