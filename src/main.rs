use clap::Parser;

use snapsight::acquire::{CameraPicker, LibraryPicker};
use snapsight::analysis::{Analyzer, ApiKey, GROQ_API_KEY_ENV};
use snapsight::cli::{self, Args, Command, Session};
use snapsight::config::Config;

/// Load .env file and read the API key.
///
/// Does not override existing environment variables. Warns if the key is
/// missing; analysis stays blocked until it is set.
fn load_env() -> ApiKey {
    // dotenv::dotenv() returns Err if .env doesn't exist, which is fine
    let _ = dotenv::dotenv();

    let api_key = ApiKey::from_env();
    if api_key.is_empty() {
        eprintln!("Warning: {} environment variable not set.", GROQ_API_KEY_ENV);
        eprintln!("         Image analysis will be unavailable.");
        eprintln!("         Set {} in .env or environment to enable.\n", GROQ_API_KEY_ENV);
    }
    api_key
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn load_config(args: &Args) -> Result<Config, String> {
    Config::load(args.config.as_deref()).map_err(|e| e.to_string())
}

fn build_analyzer(api_key: ApiKey, config: &Config) -> Result<Analyzer, String> {
    Analyzer::from_config(api_key, config)
        .map_err(|e| format!("Failed to create HTTP client: {}", e))
}

fn runtime() -> Result<tokio::runtime::Runtime, String> {
    tokio::runtime::Runtime::new().map_err(|e| format!("Failed to create async runtime: {}", e))
}

/// Describe an existing photo and print the result
fn run_describe(args: &Args, api_key: ApiKey, path: &std::path::Path) -> Result<(), String> {
    let config = load_config(args)?;
    let analyzer = build_analyzer(api_key, &config)?;
    let picker = LibraryPicker::new(path);

    let description = runtime()?.block_on(cli::describe_with(&picker, &analyzer))?;
    println!("{}", description);
    Ok(())
}

/// Take a picture and print its description
fn run_capture(args: &Args, api_key: ApiKey, camera: Option<String>) -> Result<(), String> {
    let config = load_config(args)?;
    let analyzer = build_analyzer(api_key, &config)?;
    let picker = CameraPicker::new().with_device(camera.or(config.capture.device.clone()));

    let description = runtime()?.block_on(cli::describe_with(&picker, &analyzer))?;
    println!("{}", description);
    Ok(())
}

fn run_interactive(args: &Args, api_key: ApiKey) -> Result<(), String> {
    let config = load_config(args)?;
    let analyzer = build_analyzer(api_key, &config)?;
    let camera = CameraPicker::new().with_device(config.capture.device.clone());

    runtime()?
        .block_on(Session::new(analyzer, camera).run())
        .map_err(|e| format!("Failed to read input: {}", e))
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match &args.command {
        Some(Command::ListCameras) => cli::list_cameras(),
        Some(Command::Config { action }) => {
            cli::handle_config_action(action.clone(), args.config.as_deref())
        }
        Some(Command::Describe { path }) => run_describe(&args, load_env(), path),
        Some(Command::Capture { camera }) => run_capture(&args, load_env(), camera.clone()),
        None => run_interactive(&args, load_env()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
