use std::io::{self, IsTerminal, Read};

use anyhow::{Result, anyhow};
use clap::Parser;

use verse_caption_renderer::{Config, RawRenderSettings};

#[derive(Parser, Debug)]
#[command(
    name = "verse-caption-renderer",
    version,
    about = "Render verse text files as transparent caption images"
)]
struct Cli {
    /// Verse text file (sections separated by 20 or more '-'); reads stdin when omitted
    #[arg(short = 'd', long = "data")]
    data: Option<String>,

    /// Directory for the NN.png captions (default: captions)
    #[arg(short = 'o', long = "out-dir")]
    out_dir: Option<String>,

    /// Also write all captions into a single ZIP file
    #[arg(long = "archive")]
    archive: Option<String>,

    /// Body text size in px (invalid values fall back to the default)
    #[arg(long = "content-font-size")]
    content_font_size: Option<String>,

    /// Verse number size in px
    #[arg(long = "number-font-size")]
    number_font_size: Option<String>,

    /// Gap between the verse number and the first body line in px
    #[arg(long = "number-content-spacing")]
    number_content_spacing: Option<String>,

    /// Distance between body lines in px
    #[arg(long = "line-spacing")]
    line_spacing: Option<String>,

    /// Font file used for captions
    #[arg(long = "font-path")]
    font_path: Option<String>,

    /// Installed font family used for captions
    #[arg(long = "font-family")]
    font_family: Option<String>,

    /// Read extra settings from a local TOML file
    #[arg(short = 'r', long = "read-settings")]
    read_settings: Option<String>,

    /// Show the effective settings and exit
    #[arg(long = "show-settings")]
    show_settings: bool,

    /// Print the parsed captions as JSON instead of rendering
    #[arg(long = "dry-run")]
    dry_run: bool,

    /// Run the HTTP service on the given address (use "default" for the configured one)
    #[arg(long = "server")]
    server: Option<String>,

    /// Enable verbose logging
    #[arg(long = "verbose")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    verse_caption_renderer::logging::init(cli.verbose)?;

    if let Some(addr) = cli.server.clone() {
        return run_server(cli, addr).await;
    }

    let needs_input = !cli.show_settings && cli.data.is_none();
    let input = if needs_input {
        if io::stdin().is_terminal() {
            return Err(anyhow!("no input: pass --data <FILE> or pipe text on stdin"));
        }
        let mut buffer = Vec::new();
        io::stdin().read_to_end(&mut buffer)?;
        let text = String::from_utf8(buffer)
            .map_err(|_| anyhow!("stdin must be UTF-8 text (binary detected)"))?;
        Some(text)
    } else {
        None
    };

    let output = verse_caption_renderer::run(config_from_cli(cli), input)?;

    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

fn config_from_cli(cli: Cli) -> Config {
    Config {
        data: cli.data,
        out_dir: cli.out_dir,
        archive: cli.archive,
        raw_settings: RawRenderSettings {
            content_font_size: cli.content_font_size,
            number_font_size: cli.number_font_size,
            number_content_spacing: cli.number_content_spacing,
            line_spacing: cli.line_spacing,
        },
        font_path: cli.font_path,
        font_family: cli.font_family,
        settings_path: cli.read_settings,
        show_settings: cli.show_settings,
        dry_run: cli.dry_run,
    }
}

async fn run_server(cli: Cli, addr: String) -> Result<()> {
    let settings = verse_caption_renderer::effective_settings(&config_from_cli(cli))?;
    let addr = if addr.trim().eq_ignore_ascii_case("default") {
        settings.server_addr.clone()
    } else {
        addr.trim().to_string()
    };
    let renderer = verse_caption_renderer::build_renderer(&settings)?;
    verse_caption_renderer::server::run_server(settings, renderer, addr).await
}
