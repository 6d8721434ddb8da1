//! # qrkit CLI
//!
//! Command-line front end for the QR form.
//!
//! ## Usage
//!
//! ```bash
//! # List content types
//! qrkit kinds
//!
//! # Print the encoded payload
//! qrkit payload --type wifi "MyNet,secret123"
//!
//! # Render a URL as PNG
//! qrkit render --type url example.com --out qr.png
//!
//! # vCard with a logo and a title
//! qrkit render --type vcard --field first_name=Ada --field last_name=Lovelace \
//!     --logo logo.png --level H --title "Contact" --out card.png
//!
//! # Start from a saved form file and override the size
//! qrkit render --form form.json --size 300 --out qr.png
//! ```
//!
//! Set `LOG_LEVEL=debug` to see what the renderer is doing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level as TraceLevel;
use tracing_subscriber::FmtSubscriber;

use qrkit::{
    ContentKind, QrKitError, RasterRenderer,
    render::{self, Color, ErrorCorrection, Placement, RenderRequest},
    session::{Form, Session},
};

/// qrkit - QR code generator
#[derive(Parser, Debug)]
#[command(name = "qrkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the supported content types
    Kinds,

    /// Print the string a QR code would encode
    Payload {
        #[command(flatten)]
        content: ContentArgs,
    },

    /// Render a QR code image
    Render {
        #[command(flatten)]
        content: ContentArgs,

        #[command(flatten)]
        style: StyleArgs,

        #[command(flatten)]
        logo: LogoArgs,

        /// Write SVG instead of PNG (no logo, no title)
        #[arg(long)]
        svg: bool,

        /// Output file
        #[arg(long, short, value_name = "FILE")]
        out: PathBuf,
    },
}

#[derive(Args, Debug)]
struct ContentArgs {
    /// Content type (text, url, vcard, email, phone, sms, wifi, twitter, facebook, maps)
    #[arg(long = "type", short = 't', value_name = "KIND")]
    kind: Option<ContentKind>,

    /// Content for single-line types (for wifi: "ssid,password")
    content: Option<String>,

    /// Structured field for vcard/email, as name=value (repeatable)
    #[arg(long = "field", short = 'f', value_name = "NAME=VALUE")]
    fields: Vec<String>,

    /// Load a form file (JSON) before applying flags
    #[arg(long, value_name = "FILE")]
    form: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct StyleArgs {
    /// Foreground color
    #[arg(long, value_name = "HEX")]
    fg: Option<Color>,

    /// Background color
    #[arg(long, value_name = "HEX")]
    bg: Option<Color>,

    /// Symbol size in pixels (100-400)
    #[arg(long)]
    size: Option<u32>,

    /// Margin in pixels (0-10)
    #[arg(long)]
    margin: Option<u32>,

    /// Error correction level (L, M, Q, H)
    #[arg(long)]
    level: Option<ErrorCorrection>,

    /// Title shown above the code
    #[arg(long)]
    title: Option<String>,
}

#[derive(Args, Debug)]
struct LogoArgs {
    /// Image to draw on top of the code
    #[arg(long, value_name = "FILE")]
    logo: Option<PathBuf>,

    /// Logo width in pixels (10-100)
    #[arg(long)]
    logo_width: Option<u32>,

    /// Logo height in pixels (10-100)
    #[arg(long)]
    logo_height: Option<u32>,

    /// Logo opacity (0.0-1.0)
    #[arg(long)]
    opacity: Option<f32>,

    /// Logo left edge; with --logo-y, disables centering
    #[arg(long, requires = "logo_y", allow_negative_numbers = true)]
    logo_x: Option<i32>,

    /// Logo top edge; with --logo-x, disables centering
    #[arg(long, requires = "logo_x", allow_negative_numbers = true)]
    logo_y: Option<i32>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logging();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "warn".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "info" => TraceLevel::INFO,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install logger: {}", e);
    }
}

async fn run() -> Result<(), QrKitError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Kinds => {
            for kind in ContentKind::ALL {
                println!("  {:<10} {}", kind.tag(), kind.label());
            }
        }
        Commands::Payload { content } => {
            let session = build_session(&content)?;
            println!("{}", session.encoded_value());
        }
        Commands::Render {
            content,
            style,
            logo,
            svg,
            out,
        } => {
            let mut session = build_session(&content)?;
            apply_style(&mut session, style);
            apply_logo(&mut session, &logo).await?;

            if svg {
                let Some(request) = session.render_request()? else {
                    return Err(QrKitError::Config("nothing to render: content is empty".to_string()));
                };
                let request = RenderRequest {
                    overlay: None,
                    ..request
                };
                std::fs::write(&out, render::render_svg(&request)?)?;
            } else {
                let image = session
                    .render(&RasterRenderer)?
                    .ok_or_else(|| QrKitError::Config("nothing to render: content is empty".to_string()))?;
                render::save_png(&out, &image)?;
            }
            println!("Saved to {}", out.display());
        }
    }

    Ok(())
}

/// Build a session from an optional form file plus content flags.
fn build_session(args: &ContentArgs) -> Result<Session, QrKitError> {
    let mut session = match &args.form {
        Some(path) => Session::from_form(Form::load(path)?),
        None => Session::new(),
    };

    let collector = session.collector_mut();
    if let Some(kind) = args.kind
        && kind != collector.kind()
    {
        collector.set_kind(kind);
    }
    if let Some(content) = &args.content {
        collector.set_content(content.clone());
    }
    for field in &args.fields {
        let (name, value) = field
            .split_once('=')
            .ok_or_else(|| QrKitError::Config(format!("field '{}' is not NAME=VALUE", field)))?;
        if !collector.set_field(name, value) {
            return Err(QrKitError::Config(format!(
                "unknown field '{}' for content type {}",
                name,
                collector.kind()
            )));
        }
    }

    Ok(session)
}

fn apply_style(session: &mut Session, style: StyleArgs) {
    let config = session.config_mut();
    if let Some(fg) = style.fg {
        config.foreground = fg;
    }
    if let Some(bg) = style.bg {
        config.background = bg;
    }
    if let Some(size) = style.size {
        config.size = size;
    }
    if let Some(margin) = style.margin {
        config.margin = margin;
    }
    if let Some(level) = style.level {
        config.error_level = level;
    }
    if let Some(title) = style.title {
        config.title = title;
    }
    config.clamp_to_form_ranges();
}

async fn apply_logo(session: &mut Session, args: &LogoArgs) -> Result<(), QrKitError> {
    let overlay = session.overlay_mut();
    if let Some(width) = args.logo_width {
        overlay.width = width;
    }
    if let Some(height) = args.logo_height {
        overlay.height = height;
    }
    if let Some(opacity) = args.opacity {
        overlay.opacity = opacity;
    }
    if let (Some(x), Some(y)) = (args.logo_x, args.logo_y) {
        overlay.placement = Placement::Offset { x, y };
    }
    overlay.clamp_to_form_ranges();
    // Size is final here: apply_style has already run.
    let size = session.config().size;
    session.overlay_mut().clamp_offset(size);

    if let Some(path) = &args.logo {
        session.load_overlay(path).await?;
    }
    Ok(())
}
