use std::io::prelude::*;
use std::process;
use std::time::Duration;

use clap::Parser;
use log::{debug, info, warn};
use tokio::signal;

use pingboard::utils::CLEAR_SCREEN;
use pingboard::{
    build_client, check_health, Config, ConfigError, DisplayZone, PingStatusView, Phase, Renderer,
    DEFAULT_BASE_URL,
};

#[derive(Parser, Debug)]
#[clap(name = "pingboard", version, about = "Shows ping statistics from a pinger backend")]
struct Args {
    /// Backend base url
    #[clap(short, long, env = "PINGBOARD_URL", default_value = DEFAULT_BASE_URL)]
    url: String,

    /// Seconds between refreshes
    #[clap(short, long, env = "PINGBOARD_INTERVAL", default_value_t = 10)]
    interval: u64,

    /// Request timeout in seconds
    #[clap(short, long, default_value_t = 5)]
    timeout: u64,

    /// Show timestamps in UTC instead of local time
    #[clap(long)]
    utc: bool,

    /// Disable colors and screen clearing
    #[clap(long)]
    no_color: bool,

    /// Fetch once, print and exit
    #[clap(long)]
    once: bool,
}

fn build_config(args: &Args) -> Result<Config, ConfigError> {
    let zone = if args.utc {
        DisplayZone::utc()
    } else {
        DisplayZone::Local
    };

    let config = Config::new(&args.url)?
        .with_interval(Duration::from_secs(args.interval))?
        .with_timeout(Duration::from_secs(args.timeout))
        .with_zone(zone)
        .with_color(!args.no_color);
    Ok(config)
}

fn draw(frame: &str, clear: bool) {
    let mut stdout = std::io::stdout();
    if clear {
        let _r = stdout.write_all(CLEAR_SCREEN.as_bytes());
    } else {
        let _r = stdout.write_all(b"\n");
    }
    let _r = stdout.write_all(frame.as_bytes());
    let _r = stdout.flush();
}

async fn probe_health(config: &Config) {
    let client = match build_client(config) {
        Ok(c) => c,
        Err(e) => {
            warn!("Health check skipped: {e}");
            return;
        }
    };

    match check_health(&client, config.health_url()).await {
        Ok(health) if health.is_ok() => info!("Backend is healthy"),
        Ok(health) => warn!("Backend reports status {:?}", health.status),
        Err(e) => warn!("Health check failed: {e}"),
    }
}

#[tokio::main]
async fn run(config: Config, once: bool) -> i32 {
    probe_health(&config).await;

    let view = match PingStatusView::http(&config) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Create http client error: {e}");
            return 2;
        }
    };
    let renderer = Renderer::new(config.zone, config.color);

    if once {
        view.fetch_records().await;
        print!("{}", view.render(&renderer));
        return match view.state().phase() {
            Phase::Errored => 1,
            _ => 0,
        };
    }

    let mut updates = view.subscribe();
    view.mount();
    draw(&view.render(&renderer), config.color);

    let ctrl_c = signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let frame = renderer.render(&updates.borrow_and_update());
                draw(&frame, config.color);
            }
            _ = &mut ctrl_c => {
                info!("Interrupted");
                break;
            }
        }
    }

    view.unmount();
    0
}

fn main() {
    let args = Args::parse();

    env_logger::init();
    debug!("Args: {args:?}");

    let config = match build_config(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            process::exit(2);
        }
    };

    info!("Watching {}", config.records_url());
    let code = run(config, args.once);
    process::exit(code)
}
