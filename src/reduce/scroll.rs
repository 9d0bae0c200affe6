use crate::signal::scroll::ScrollSample;

/// Fewer samples than this score zero.
pub const MIN_SAMPLES: usize = 3;

/// Score how erratic the recent scrolling was, 0..=100.
///
/// Half the score comes from speed variance (capped at 50), half from how
/// often the direction flipped between neighbouring samples.
pub fn scroll_volatility(samples: &[ScrollSample]) -> f64 {
    if samples.len() < MIN_SAMPLES {
        return 0.0;
    }

    let n = samples.len() as f64;
    let mean = samples.iter().map(|s| s.speed).sum::<f64>() / n;
    let variance = samples
        .iter()
        .map(|s| (s.speed - mean).powi(2))
        .sum::<f64>()
        / n;

    let flips = samples
        .windows(2)
        .filter(|pair| pair[0].direction != pair[1].direction)
        .count();

    let speed_volatility = (variance * 10.0).min(50.0);
    let direction_volatility = (flips as f64 / n) * 50.0;

    (speed_volatility + direction_volatility).min(100.0)
}
