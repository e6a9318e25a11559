use clap::{Parser, Subcommand};
use ix_srcset::compat::{self, LegacyArg};
use ix_srcset::config::{self, CdnConfig};
use ix_srcset::types::split_params;
use ix_srcset::widths::{self, BaseDimensions, Tolerance, WidthBounds};
use ix_srcset::{ImageRequest, ImageUrls, logging, output};
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("IX_SRCSET_ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("IX_SRCSET_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "ix-srcset")]
#[command(about = "Build image CDN URLs and responsive srcsets")]
#[command(long_about = "\
Build image CDN URLs and responsive srcsets

Sources, signing tokens and width tolerance come from a TOML config file.
Trailing key=value arguments become query parameters:

  ix-srcset url /photos/cat.jpg w=400 fit=crop
  ix-srcset url cdn-b.example.net /photos/cat.jpg w=400
  ix-srcset srcset /photos/cat.jpg --min-width 300 --max-width 1600 fit=crop
  ix-srcset srcset /photos/cat.jpg --width 400 --height 300
  ix-srcset dpr-srcset /photos/cat.jpg w=400

Run 'ix-srcset gen-config' to generate a documented ix-srcset.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Log debug events to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Arguments shared by the srcset commands.
#[derive(clap::Args)]
struct RequestArgs {
    /// Image path, or a full URL for web-proxy sources
    path: String,

    /// Source domain (multi-source configs)
    #[arg(long)]
    source: Option<String>,

    /// Skip path encoding
    #[arg(long)]
    no_encode: bool,

    /// Print descriptors as JSON
    #[arg(long)]
    json: bool,

    /// Query parameters as key=value
    params: Vec<String>,
}

impl RequestArgs {
    fn request(&self) -> Result<ImageRequest, Box<dyn std::error::Error>> {
        let (params, rest) = split_params(&self.params);
        if let Some(stray) = rest.first() {
            return Err(format!("expected key=value, got '{stray}'").into());
        }
        let mut request = ImageRequest::new(&self.path).params(params);
        request.source = self.source.clone();
        request.disable_path_encoding = self.no_encode;
        Ok(request)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Print a single URL: [SOURCE] PATH [key=value...]
    Url {
        #[arg(required = true, num_args = 1..)]
        args: Vec<String>,
    },
    /// Print a width srcset (w descriptors)
    Srcset {
        #[command(flatten)]
        request: RequestArgs,

        /// Smallest width to include
        #[arg(long)]
        min_width: Option<u32>,

        /// Largest width to include
        #[arg(long)]
        max_width: Option<u32>,

        /// Explicit widths, comma-separated (overrides min/max)
        #[arg(long, value_delimiter = ',')]
        widths: Option<Vec<u32>>,

        /// Width tolerance for this request
        #[arg(long)]
        tolerance: Option<f64>,

        /// Rendered width; emits 1x/2x/3x multiples
        #[arg(long)]
        width: Option<u32>,

        /// Rendered height; fixes the aspect ratio with --width
        #[arg(long)]
        height: Option<u32>,
    },
    /// Print a resolution srcset (x descriptors)
    DprSrcset {
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Print the standard width ladder
    Ladder {
        #[arg(long, default_value_t = config::DEFAULT_WIDTH_TOLERANCE)]
        tolerance: f64,
    },
    /// Validate the config file
    Check,
    /// Print a stock ix-srcset.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Url { args } => {
            let urls = ImageUrls::new(load(&cli.config)?)?;
            let (params, positional) = split_params(&args);
            let mut legacy: Vec<LegacyArg> = positional.into_iter().map(LegacyArg::from).collect();
            if !params.is_empty() {
                legacy.push(params.into());
            }
            println!("{}", compat::image_url(&urls, &legacy)?);
        }
        Command::Srcset {
            request,
            min_width,
            max_width,
            widths,
            tolerance,
            width,
            height,
        } => {
            let urls = ImageUrls::new(load(&cli.config)?)?;
            let bounds = WidthBounds {
                min_width,
                max_width,
                widths,
                tolerance,
            };
            let base = BaseDimensions::new(width, height);
            let variants = urls.build_width_srcset(&request.request()?, &bounds, &base)?;
            emit(&variants, request.json)?;
        }
        Command::DprSrcset { request } => {
            let urls = ImageUrls::new(load(&cli.config)?)?;
            let variants = urls.build_resolution_srcset(&request.request()?)?;
            emit(&variants, request.json)?;
        }
        Command::Ladder { tolerance } => {
            let tolerance = Tolerance::new(tolerance)?;
            output::print_ladder(tolerance.value(), &widths::standard_widths(tolerance.value()));
        }
        Command::Check => {
            println!("==> Checking {}", cli.config.display());
            let config = load(&cli.config)?;
            ImageUrls::new(config.clone())?;
            let tolerance = Tolerance::new(config.srcset_width_tolerance)?;
            let ladder = widths::standard_widths(tolerance.value());
            output::print_check(&config, ladder.len());
            println!("==> Config is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn load(path: &Path) -> Result<CdnConfig, Box<dyn std::error::Error>> {
    config::load_config(path).map_err(|e| format!("{}: {e}", path.display()).into())
}

fn emit(
    variants: &[ix_srcset::VariantDescriptor],
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", output::format_srcset_json(variants)?);
    } else {
        output::print_srcset(variants);
    }
    Ok(())
}
