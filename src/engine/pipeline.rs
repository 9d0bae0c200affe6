use std::time::{Duration, Instant};

use serde::Serialize;

use super::schedule::{Debouncer, Interval, Trigger};
use crate::dom::sink::StyleSink;
use crate::dom::ElementProvider;
use crate::reduce::{scroll_volatility, time_uncertainty, ClockMood, UncertaintyScore};
use crate::render::layout::{map_elements, map_weather, Element, LayoutResult, UncertaintyField};
use crate::render::status::StatusDisplay;
use crate::render::style::{
    uncertainty_style, weather_status, weather_style, PageStyle, StatusProfile,
};
use crate::render::Variant;
use crate::signal::clock::{Clock, ClockSource};
use crate::signal::scroll::ScrollTracker;
use crate::signal::weather::{LiveWeather, Preset, WeatherControls, WeatherReading};
use crate::signal::SignalSource;

/// Output of one recomputation pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    #[serde(skip)]
    pub trigger: Trigger,
    pub elements: Vec<Element>,
    pub layout: Vec<LayoutResult>,
    pub page: PageStyle,
    pub status: StatusDisplay,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<UncertaintyScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherReading>,
}

impl Frame {
    /// Write the frame to a sink.
    pub fn apply(&self, sink: &mut dyn StyleSink) {
        for (element, layout) in self.elements.iter().zip(&self.layout) {
            sink.set_element(element, layout);
        }
        sink.set_page(&self.page);
        sink.set_status(&self.status);
    }
}

/// Last rendered values, overwritten wholesale on every pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DisplayState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<UncertaintyScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusDisplay>,
    pub renders: u64,
}

impl DisplayState {
    fn record(&mut self, frame: &Frame) {
        self.score = frame.score;
        self.weather = frame.weather;
        self.status = Some(frame.status.clone());
        self.renders += 1;
    }

    /// Everything except the render counter.
    pub fn same_values(&self, other: &DisplayState) -> bool {
        self.score == other.score && self.weather == other.weather && self.status == other.status
    }
}

/// Clock/scroll frame. Pure in its inputs.
pub fn compose_uncertainty(
    mood: &ClockMood,
    scroll_score: f64,
    provider: &dyn ElementProvider,
    trigger: Trigger,
) -> Frame {
    let score = UncertaintyScore::new(mood.score, scroll_score);
    let elements = provider.elements();
    let field = UncertaintyField {
        combined: score.combined,
    };
    let layout = map_elements(&elements, provider.container(), &field);

    Frame {
        trigger,
        elements,
        layout,
        page: uncertainty_style(&score),
        status: mood.status.clone(),
        score: Some(score),
        weather: None,
    }
}

/// Weather frame. Pure in its inputs.
pub fn compose_weather(
    reading: &WeatherReading,
    profile: StatusProfile,
    provider: &dyn ElementProvider,
    trigger: Trigger,
) -> Frame {
    let elements = provider.elements();
    let layout = map_weather(&elements, provider.container(), reading);

    Frame {
        trigger,
        elements,
        layout,
        page: weather_style(reading),
        status: weather_status(reading, profile),
        score: None,
        weather: Some(*reading),
    }
}

/// Time-of-day + scroll page.
///
/// The clock score is computed once at start (or on an explicit
/// [`refresh_clock`](Self::refresh_clock)); scroll events update the rolling
/// window immediately and the volatility score once scrolling goes quiet.
pub struct UncertaintySession {
    mood: ClockMood,
    tracker: ScrollTracker,
    scroll_score: f64,
    debounce: Debouncer,
    origin: Instant,
    display: DisplayState,
}

impl UncertaintySession {
    pub fn start<C: Clock>(
        clock: &mut ClockSource<C>,
        debounce: Duration,
        origin: Instant,
    ) -> Self {
        Self {
            mood: time_uncertainty(&clock.current_reading()),
            tracker: ScrollTracker::new(0),
            scroll_score: 0.0,
            debounce: Debouncer::new(debounce),
            origin,
            display: DisplayState::default(),
        }
    }

    /// Re-read the clock. Takes effect on the next render.
    pub fn refresh_clock<C: Clock>(&mut self, clock: &mut ClockSource<C>) {
        self.mood = time_uncertainty(&clock.current_reading());
    }

    /// Recompute and write everything.
    pub fn render(
        &mut self,
        provider: &dyn ElementProvider,
        sink: &mut dyn StyleSink,
        trigger: Trigger,
    ) -> Frame {
        let frame = compose_uncertainty(&self.mood, self.scroll_score, provider, trigger);
        if let Some(score) = frame.score {
            log::debug!(
                "uncertainty render ({:?}): time={} scroll={:.2} combined={:.2}",
                trigger,
                score.time,
                score.scroll,
                score.combined
            );
        }
        frame.apply(sink);
        self.display.record(&frame);
        frame
    }

    /// Record a scroll event; restarts the quiet-period wait.
    pub fn on_scroll(&mut self, position: f64, now: Instant) {
        let time_ms = now.saturating_duration_since(self.origin).as_millis() as u64;
        self.tracker.record(position, time_ms);
        self.debounce.schedule(now);
    }

    /// Re-render if scrolling has been quiet long enough.
    pub fn poll(
        &mut self,
        now: Instant,
        provider: &dyn ElementProvider,
        sink: &mut dyn StyleSink,
    ) -> Option<Frame> {
        if !self.debounce.poll(now) {
            return None;
        }
        let window = self.tracker.current_reading();
        self.scroll_score = scroll_volatility(&window);
        Some(self.render(provider, sink, Trigger::Debounced))
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debounce.next_deadline()
    }

    pub fn scroll_score(&self) -> f64 {
        self.scroll_score
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }
}

/// A weather-driven page, simulated or live.
pub struct WeatherSession<S> {
    source: S,
    profile: StatusProfile,
    variant: Variant,
    display: DisplayState,
    /// Trigger to report when the in-flight fetch lands
    fetch_trigger: Option<Trigger>,
}

impl<S: SignalSource<Reading = WeatherReading>> WeatherSession<S> {
    pub fn render(
        &mut self,
        provider: &dyn ElementProvider,
        sink: &mut dyn StyleSink,
        trigger: Trigger,
    ) -> Frame {
        let reading = self.source.current_reading();
        log::debug!("{:?} render ({:?}): {:?}", self.variant, trigger, reading);
        let frame = compose_weather(&reading, self.profile, provider, trigger);
        frame.apply(sink);
        self.display.record(&frame);
        frame
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }
}

impl WeatherSession<WeatherControls> {
    pub fn simulated(controls: WeatherControls) -> Self {
        Self {
            source: controls,
            profile: StatusProfile::Simulated,
            variant: Variant::SimulatedWeather,
            display: DisplayState::default(),
            fetch_trigger: None,
        }
    }

    /// Slider access; changes take effect on the next [`apply`](Self::apply).
    pub fn controls_mut(&mut self) -> &mut WeatherControls {
        &mut self.source
    }

    /// The apply button.
    pub fn apply(&mut self, provider: &dyn ElementProvider, sink: &mut dyn StyleSink) -> Frame {
        self.render(provider, sink, Trigger::Manual)
    }

    /// Overwrite every control with a preset and re-render.
    pub fn load_preset(
        &mut self,
        preset: Preset,
        provider: &dyn ElementProvider,
        sink: &mut dyn StyleSink,
    ) -> Frame {
        self.source.load_preset(preset);
        self.render(provider, sink, Trigger::Manual)
    }
}

impl WeatherSession<LiveWeather> {
    pub fn live(source: LiveWeather) -> Self {
        Self {
            source,
            profile: StatusProfile::Live,
            variant: Variant::LiveWeather,
            display: DisplayState::default(),
            fetch_trigger: None,
        }
    }

    /// First render: start a fetch, wait at most `grace`, render regardless.
    pub fn load(
        &mut self,
        grace: Duration,
        provider: &dyn ElementProvider,
        sink: &mut dyn StyleSink,
    ) -> Frame {
        self.source.refresh();
        if !self.source.settle(grace) {
            self.fetch_trigger = Some(Trigger::DataArrived);
        }
        self.render(provider, sink, Trigger::Load)
    }

    /// Drive the refresh timer and pick up finished fetches.
    pub fn tick(
        &mut self,
        now: Instant,
        timer: &mut Interval,
        provider: &dyn ElementProvider,
        sink: &mut dyn StyleSink,
    ) -> Option<Frame> {
        if timer.poll(now) && self.source.refresh() {
            log::info!("refreshing weather");
            self.fetch_trigger = Some(Trigger::Timer);
        }
        if self.source.poll() {
            let trigger = self.fetch_trigger.take().unwrap_or(Trigger::DataArrived);
            return Some(self.render(provider, sink, trigger));
        }
        None
    }

    pub fn is_fetching(&self) -> bool {
        self.source.is_fetching()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::sink::MemorySink;
    use crate::dom::StaticElements;
    use crate::error::FetchError;
    use crate::net::poller::WeatherPoller;
    use crate::render::layout::Container;
    use crate::render::status::Icon;
    use crate::signal::clock::FixedClock;
    use chrono::NaiveDate;

    fn demo() -> StaticElements {
        StaticElements::demo(Container {
            width: 1200.0,
            height: 800.0,
        })
    }

    fn clock_at(day: u32, hour: u32) -> ClockSource<FixedClock> {
        // June 2024: the 12th is a Wednesday, the 15th a Saturday
        let at = NaiveDate::from_ymd_opt(2024, 6, day)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .unwrap();
        ClockSource::new(FixedClock(at))
    }

    #[test]
    fn deep_night_render() {
        let t0 = Instant::now();
        let mut session =
            UncertaintySession::start(&mut clock_at(12, 3), Duration::from_millis(150), t0);
        let mut sink = MemorySink::default();
        let frame = session.render(&demo(), &mut sink, Trigger::Load);

        let score = frame.score.unwrap();
        assert_eq!(score.combined, 189.0);
        assert_eq!(frame.status.icon, Icon::Moon);
        assert_eq!(frame.page.body_classes, vec!["uncertainty-extreme"]);
        assert_eq!(sink.elements.len(), demo().elements.len());
        assert_eq!(sink.status.as_ref().map(|s| s.icon), Some(Icon::Moon));
        assert_eq!(session.display().score, Some(score));
    }

    #[test]
    fn refreshed_clock_applies_on_next_render() {
        let t0 = Instant::now();
        let mut session =
            UncertaintySession::start(&mut clock_at(12, 10), Duration::from_millis(150), t0);
        let page = demo();
        let mut sink = MemorySink::default();
        let before = session.render(&page, &mut sink, Trigger::Load);
        assert_eq!(before.score.map(|s| s.time), Some(30.0));

        session.refresh_clock(&mut clock_at(12, 3));
        let after = session.render(&page, &mut sink, Trigger::Manual);
        assert_eq!(after.score.map(|s| s.time), Some(270.0));
        assert_eq!(after.status.icon, Icon::Moon);
    }

    #[test]
    fn pipeline_is_idempotent() {
        let t0 = Instant::now();
        let mut session =
            UncertaintySession::start(&mut clock_at(15, 10), Duration::from_millis(150), t0);
        let page = demo();
        let mut sink = MemorySink::default();

        let a = session.render(&page, &mut sink, Trigger::Load);
        let state_a = session.display().clone();
        let sink_a = sink.clone();
        let b = session.render(&page, &mut sink, Trigger::Manual);

        assert_eq!(a.layout, b.layout);
        assert!(session.display().same_values(&state_a));
        assert_eq!(sink, sink_a);
    }

    #[test]
    fn scroll_burst_rerenders_once_after_quiet_period() {
        let t0 = Instant::now();
        let mut session =
            UncertaintySession::start(&mut clock_at(12, 10), Duration::from_millis(150), t0);
        let page = demo();
        let mut sink = MemorySink::default();
        session.render(&page, &mut sink, Trigger::Load);

        // jittery up/down scrolling
        let positions = [100.0, 40.0, 300.0, 120.0, 600.0, 80.0];
        let mut rerenders = 0;
        for (i, y) in positions.iter().enumerate() {
            let now = t0 + Duration::from_millis(20 * (i as u64 + 1));
            session.on_scroll(*y, now);
            if session.poll(now, &page, &mut sink).is_some() {
                rerenders += 1;
            }
        }
        assert_eq!(rerenders, 0);
        assert_eq!(session.scroll_score(), 0.0);

        let quiet = t0 + Duration::from_millis(120 + 150);
        let frame = session.poll(quiet, &page, &mut sink).unwrap();
        assert_eq!(frame.trigger, Trigger::Debounced);
        assert!(session.scroll_score() > 0.0);
        let score = frame.score.unwrap();
        assert!((score.combined - (30.0 * 0.7 + session.scroll_score() * 0.3)).abs() < 1e-9);
        assert!(session.poll(quiet + Duration::from_secs(1), &page, &mut sink).is_none());
    }

    #[test]
    fn presets_render_through_the_sink() {
        let mut session = WeatherSession::simulated(WeatherControls::default());
        let page = demo();
        let mut sink = MemorySink::default();

        let frame = session.load_preset(Preset::Stormy, &page, &mut sink);
        assert_eq!(frame.status.text, "Stormy conditions");
        assert_eq!(frame.weather, Some(Preset::Stormy.reading()));
        assert_eq!(sink.page.as_ref().and_then(|p| p.background), Some(200.0));

        session.controls_mut().set_rain(0.0);
        session.controls_mut().set_clouds(10.0);
        session.controls_mut().set_temp(25.0);
        // nothing changes until apply
        assert_eq!(session.display().status.as_ref().map(|s| s.icon), Some(Icon::Storm));
        let frame = session.apply(&page, &mut sink);
        assert_eq!(frame.status.icon, Icon::Sun);
        assert_eq!(frame.page.body_classes, vec!["temp-warm"]);
    }

    #[test]
    fn live_fetch_failure_renders_fallback() {
        let poller = WeatherPoller::from_fn(|| Err(FetchError::Status(500)));
        let mut session = WeatherSession::live(LiveWeather::new(poller));
        let mut sink = MemorySink::default();
        let frame = session.load(Duration::from_secs(5), &demo(), &mut sink);

        assert_eq!(frame.weather, Some(WeatherReading::FALLBACK));
        assert_eq!(frame.status.text, "12°C");
        assert_eq!(frame.trigger, Trigger::Load);
    }

    #[test]
    fn late_first_fetch_arrives_as_data() {
        let (release, gate) = std::sync::mpsc::channel::<()>();
        let gate = std::sync::Mutex::new(gate);
        let fetched = Preset::Sunny.reading();
        let poller = WeatherPoller::from_fn(move || {
            let _ = gate.lock().map(|rx| rx.recv());
            Ok(fetched)
        });
        let mut session = WeatherSession::live(LiveWeather::new(poller));
        let page = demo();
        let mut sink = MemorySink::default();
        let first = session.load(Duration::from_millis(10), &page, &mut sink);
        assert_eq!(first.weather, Some(WeatherReading::FALLBACK));

        release.send(()).unwrap();
        let t0 = Instant::now();
        let mut timer = Interval::new(Duration::from_secs(600), t0);
        let mut frame = None;
        let deadline = Instant::now() + Duration::from_secs(5);
        while frame.is_none() && Instant::now() < deadline {
            frame = session.tick(t0, &mut timer, &page, &mut sink);
            std::thread::sleep(Duration::from_millis(5));
        }
        let frame = frame.unwrap();
        assert_eq!(frame.trigger, Trigger::DataArrived);
        assert_eq!(frame.weather, Some(fetched));
    }

    #[test]
    fn live_timer_refreshes_and_rerenders() {
        let fetched = WeatherReading {
            wind_dir: 250.0,
            wind_speed: 24.0,
            temp: 6.2,
            clouds: 90.0,
            rain: 0.4,
        };
        let poller = WeatherPoller::from_fn(move || Ok(fetched));
        let mut session = WeatherSession::live(LiveWeather::new(poller));
        let page = demo();
        let mut sink = MemorySink::default();
        session.load(Duration::from_secs(5), &page, &mut sink);
        assert_eq!(session.display().weather, Some(fetched));

        let t0 = Instant::now();
        let mut timer = Interval::new(Duration::from_secs(600), t0);
        assert!(session.tick(t0, &mut timer, &page, &mut sink).is_none());
        assert!(!session.is_fetching());

        // the due tick only starts the fetch; the frame comes when it lands
        let due = t0 + Duration::from_secs(600);
        let mut frame = session.tick(due, &mut timer, &page, &mut sink);
        let deadline = Instant::now() + Duration::from_secs(5);
        while frame.is_none() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
            frame = session.tick(due, &mut timer, &page, &mut sink);
        }
        let frame = frame.unwrap();
        assert_eq!(frame.trigger, Trigger::Timer);
        assert_eq!(frame.status.text, "6°C · Cloudy · 24 km/h wind");
        assert_eq!(session.display().renders, 2);
    }
}
