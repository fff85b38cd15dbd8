use clap::Parser;
use std::path::PathBuf;

use area_places::config::Config;
use area_places::finder::PlaceFinder;
use area_places::maps::{GoogleMapsClient, SearchMode, SearchRequest};
use area_places::report::{render_text, Report};

/// Area Places: find the most-reviewed places inside a Vietnamese district.
///
/// Geocodes the area, pages through Google Places results around it, keeps
/// the places whose address or location falls in the area, and ranks them
/// by review count.
///
/// Examples:
///   areaplaces
///   areaplaces "Quận 3" --type dentist
///   areaplaces "Phú Nhuận" --mode text --keyword "bệnh viện"
///   areaplaces "Đà Lạt" --type any --keyword cafe --top 20 --json
///   areaplaces --serve --port 8080
#[derive(Parser)]
#[command(name = "areaplaces", version, about, long_about = None)]
struct Cli {
    /// Area name (district, ward, city).
    #[arg(index = 1, default_value = "Phú Nhuận")]
    area: String,

    /// Free-text keyword, e.g. "nha khoa".
    #[arg(long, short = 'k')]
    keyword: Option<String>,

    /// Provider place type. "any" searches every type.
    #[arg(long = "type", short = 't', default_value = "hospital")]
    place_type: String,

    /// "nearby" (coordinate + radius) or "text" (free-text query).
    #[arg(long, short = 'm', default_value = "nearby", value_parser = parse_mode)]
    mode: SearchMode,

    /// Length of the ranked listing. Defaults to 10 (nearby) or 5 (text).
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    top: Option<u16>,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// API key. Overrides GOOGLE_MAPS_API_KEY and the config file.
    #[arg(long)]
    api_key: Option<String>,

    /// Config file. Defaults to ~/.area_places/config.json.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Delay before each continuation page, in milliseconds.
    #[arg(long)]
    page_delay_ms: Option<u64>,

    /// Log progress to stderr.
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Run the HTTP API instead of a one-off search.
    #[arg(long)]
    serve: bool,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 3000)]
    port: u16,
}

fn parse_mode(s: &str) -> Result<SearchMode, String> {
    s.parse()
}

fn main() {
    let cli = Cli::parse();
    area_places::init_logging(cli.verbose);

    // ── Configuration ───────────────────────────────────────────

    let path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load_from(&path)
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        })
        .apply_env()
        .with_overrides(cli.api_key.clone(), cli.page_delay_ms);

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    tracing::info!(config = ?config, path = %path.display(), "configuration loaded");

    // ── Server mode ─────────────────────────────────────────────

    if cli.serve {
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("Error: Cannot start runtime: {}", e);
            std::process::exit(1);
        });
        rt.block_on(area_places::server::start(&cli.host, cli.port, config));
        return;
    }

    // ── One-off search ──────────────────────────────────────────

    let area = cli.area.trim();
    if area.is_empty() {
        eprintln!("Error: Area must not be empty.");
        std::process::exit(1);
    }

    let place_type = Some(cli.place_type.trim())
        .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case("any"))
        .map(str::to_string);
    let request = SearchRequest {
        mode: cli.mode,
        keyword: cli.keyword.clone().filter(|k| !k.trim().is_empty()),
        place_type,
    };
    let top_n = cli.top.map(usize::from).unwrap_or_else(|| cli.mode.default_top_n());

    let client = GoogleMapsClient::new(config);
    let findings = PlaceFinder::new(&client, client.config()).find(area, &request);
    let report = Report::build(&findings, top_n, client.config());

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: Cannot serialize report: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", render_text(&report));
    }
}
