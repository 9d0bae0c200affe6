//! uncertainty-layout: drive a scattered page layout from the clock, scroll
//! behaviour or the weather, and print the resulting styles.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand, ValueEnum};

use uncertainty_layout::config::{Settings, OPEN_METEO_URL};
use uncertainty_layout::dom::page::HtmlPage;
use uncertainty_layout::dom::sink::{CssSink, MemorySink, StyleSink};
use uncertainty_layout::dom::{ElementProvider, StaticElements};
use uncertainty_layout::engine::pipeline::{Frame, UncertaintySession, WeatherSession};
use uncertainty_layout::engine::schedule::{Interval, Trigger};
use uncertainty_layout::net::fetch::OpenMeteo;
use uncertainty_layout::net::poller::WeatherPoller;
use uncertainty_layout::render::layout::Container;
use uncertainty_layout::signal::clock::{Clock, ClockSource, FixedClock, SystemClock};
use uncertainty_layout::signal::weather::{LiveWeather, Preset, WeatherControls};

#[derive(Parser)]
#[command(name = "uncertainty-layout")]
#[command(
    about = "Scatter a page layout by time of day, scroll behaviour or weather",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// HTML page holding .project-item / .photo-item elements (default: built-in demo)
    #[arg(short, long, global = true)]
    page: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Css, global = true)]
    format: OutputFormat,

    /// Container width in px when the page does not declare one
    #[arg(long, default_value_t = 1200.0, global = true, value_parser = positive_px)]
    width: f64,

    /// Container height in px when the page does not declare one
    #[arg(long, default_value_t = 800.0, global = true, value_parser = positive_px)]
    height: f64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Css,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Time-of-day uncertainty
    Clock {
        /// Local time to evaluate (YYYY-MM-DDTHH:MM[:SS]); defaults to now
        #[arg(long)]
        at: Option<String>,
    },

    /// Replay scroll events ("<timestamp_ms> <position>" per line)
    Scroll {
        #[arg(long)]
        events: PathBuf,

        /// Local time for the clock score; defaults to now
        #[arg(long)]
        at: Option<String>,
    },

    /// Simulated weather from presets or explicit control values
    Weather {
        /// sunny, cloudy, rainy, stormy or cold
        #[arg(long)]
        preset: Option<Preset>,
        /// Wind direction, degrees
        #[arg(long)]
        wind_dir: Option<f64>,
        /// Wind speed, km/h
        #[arg(long)]
        wind_speed: Option<f64>,
        /// Temperature, °C
        #[arg(long)]
        temp: Option<f64>,
        /// Cloud cover, percent
        #[arg(long)]
        clouds: Option<f64>,
        /// Rain, mm/h
        #[arg(long)]
        rain: Option<f64>,
    },

    /// Live weather from Open-Meteo
    Live {
        /// Keep running and re-render on every refresh
        #[arg(long)]
        watch: bool,

        #[arg(long, env = "UNCERTAINTY_LAT", default_value_t = 51.4408)]
        lat: f64,

        #[arg(long, env = "UNCERTAINTY_LON", default_value_t = 5.4778)]
        lon: f64,

        /// Refresh period in seconds
        #[arg(long, env = "UNCERTAINTY_REFRESH_SECS", default_value_t = 600)]
        refresh_secs: u64,

        #[arg(long, env = "OPEN_METEO_URL", default_value = OPEN_METEO_URL)]
        forecast_url: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let settings = Settings::default().with_container(cli.width, cli.height);
    let fallback = Container {
        width: settings.container_width,
        height: settings.container_height,
    };

    let provider: Box<dyn ElementProvider> = match &cli.page {
        Some(path) => Box::new(HtmlPage::load(path, fallback)?),
        None => Box::new(StaticElements::demo(fallback)),
    };
    let provider = provider.as_ref();
    let format = cli.format;

    match cli.command {
        Command::Clock { at } => match parse_at(at.as_deref())? {
            Some(at) => run_clock(FixedClock(at), &settings, provider, format),
            None => run_clock(SystemClock, &settings, provider, format),
        },
        Command::Scroll { events, at } => {
            let events = read_events(&events)?;
            match parse_at(at.as_deref())? {
                Some(at) => run_scroll(FixedClock(at), &events, &settings, provider, format),
                None => run_scroll(SystemClock, &events, &settings, provider, format),
            }
        }
        Command::Weather {
            preset,
            wind_dir,
            wind_speed,
            temp,
            clouds,
            rain,
        } => {
            let mut session = WeatherSession::simulated(WeatherControls::default());
            if let Some(preset) = preset {
                session.controls_mut().load_preset(preset);
            }
            let controls = session.controls_mut();
            if let Some(v) = wind_dir {
                controls.set_wind_dir(v);
            }
            if let Some(v) = wind_speed {
                controls.set_wind_speed(v);
            }
            if let Some(v) = temp {
                controls.set_temp(v);
            }
            if let Some(v) = clouds {
                controls.set_clouds(v);
            }
            if let Some(v) = rain {
                controls.set_rain(v);
            }
            emit(format, |sink| Some(session.apply(provider, sink)))
        }
        Command::Live {
            watch,
            lat,
            lon,
            refresh_secs,
            forecast_url,
        } => {
            let settings = settings
                .with_location(lat, lon)
                .with_refresh_interval(Duration::from_secs(refresh_secs.max(1)))
                .with_forecast_url(forecast_url);
            run_live(&settings, watch, provider, format)
        }
    }
}

/// Render into the sink matching the output format and print the result.
fn emit<F>(format: OutputFormat, render: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut dyn StyleSink) -> Option<Frame>,
{
    match format {
        OutputFormat::Css => {
            let mut sink = CssSink::new();
            if render(&mut sink).is_some() {
                println!("{}", sink.finish());
            }
        }
        OutputFormat::Json => {
            let mut sink = MemorySink::default();
            if let Some(frame) = render(&mut sink) {
                println!("{}", serde_json::to_string_pretty(&frame)?);
            }
        }
    }
    Ok(())
}

fn run_clock<C: Clock>(
    clock: C,
    settings: &Settings,
    provider: &dyn ElementProvider,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut source = ClockSource::new(clock);
    let mut session =
        UncertaintySession::start(&mut source, settings.scroll_debounce, Instant::now());
    emit(format, |sink| Some(session.render(provider, sink, Trigger::Load)))
}

fn run_scroll<C: Clock>(
    clock: C,
    events: &[(u64, f64)],
    settings: &Settings,
    provider: &dyn ElementProvider,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let origin = Instant::now();
    let mut source = ClockSource::new(clock);
    let mut session = UncertaintySession::start(&mut source, settings.scroll_debounce, origin);
    emit(format, |sink| Some(session.render(provider, sink, Trigger::Load)))?;

    // Replay on a virtual clock: fire the debounce whenever it would have
    // elapsed before the next event
    for &(time_ms, position) in events {
        let now = origin + Duration::from_millis(time_ms);
        if let Some(due) = session.next_deadline().filter(|due| *due <= now) {
            emit(format, |sink| session.poll(due, provider, sink))?;
        }
        session.on_scroll(position, now);
    }
    if let Some(due) = session.next_deadline() {
        emit(format, |sink| session.poll(due, provider, sink))?;
    }
    Ok(())
}

fn run_live(
    settings: &Settings,
    watch: bool,
    provider: &dyn ElementProvider,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let client = OpenMeteo::new(settings).context("building weather client")?;
    log::info!("weather endpoint: {}", client.url());
    let mut session = WeatherSession::live(LiveWeather::new(WeatherPoller::open_meteo(client)));

    emit(format, |sink| Some(session.load(settings.fetch_grace, provider, sink)))?;
    if !watch {
        return Ok(());
    }

    let mut timer = Interval::new(settings.refresh_interval, Instant::now());
    loop {
        let now = Instant::now();
        emit(format, |sink| session.tick(now, &mut timer, provider, sink))?;

        let nap = if session.is_fetching() {
            Duration::from_millis(100)
        } else {
            timer
                .next_deadline()
                .saturating_duration_since(now)
                .min(Duration::from_secs(1))
        };
        std::thread::sleep(nap);
    }
}

/// Container sizes divide element positions, so zero is rejected.
fn positive_px(s: &str) -> Result<f64, String> {
    let px: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if px.is_finite() && px > 0.0 {
        Ok(px)
    } else {
        Err(format!("size must be a positive number of pixels, got {s}"))
    }
}

fn parse_at(at: Option<&str>) -> anyhow::Result<Option<NaiveDateTime>> {
    let Some(s) = at else {
        return Ok(None);
    };
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(Some)
        .with_context(|| format!("cannot parse time '{s}' (expected YYYY-MM-DDTHH:MM[:SS])"))
}

fn read_events(path: &Path) -> anyhow::Result<Vec<(u64, f64)>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading scroll events from {}", path.display()))?;

    let mut events = Vec::new();
    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(t), Some(y), None) = (fields.next(), fields.next(), fields.next()) else {
            bail!("{}:{}: expected '<timestamp_ms> <position>'", path.display(), n + 1);
        };
        let t: u64 = t
            .parse()
            .with_context(|| format!("{}:{}: bad timestamp '{t}'", path.display(), n + 1))?;
        let y: f64 = y
            .parse()
            .with_context(|| format!("{}:{}: bad position '{y}'", path.display(), n + 1))?;
        events.push((t, y));
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_size_must_be_positive() {
        assert_eq!(positive_px("640"), Ok(640.0));
        assert!(positive_px("0").is_err());
        assert!(positive_px("-5").is_err());
        assert!(positive_px("inf").is_err());
        assert!(positive_px("wide").is_err());
    }

    #[test]
    fn cli_rejects_zero_width() {
        assert!(Cli::try_parse_from(["uncertainty-layout", "--width", "0", "clock"]).is_err());
        let cli = Cli::try_parse_from(["uncertainty-layout", "--height", "480", "clock"]).unwrap();
        assert_eq!(cli.height, 480.0);
    }
}
