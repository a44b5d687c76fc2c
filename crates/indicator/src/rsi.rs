// Relative strength index with Wilder smoothing.
//
//   delta_i   = close_i - close_{i-1}
//   seed      = simple mean of the first `window` gains / losses
//   avg_t     = (avg_{t-1} * (window - 1) + x_t) / window
//   rsi       = 100 - 100 / (1 + avg_gain / avg_loss)
//
// The recursion runs over the whole series, so the value at the last bar
// depends on every earlier close, not only on the trailing window.

/// # Summary
/// Wilder RSI over `closes`, aligned with the input.
///
/// # Logic
/// 1. The first value sits at index `window` (it needs `window` deltas).
/// 2. `avg_loss == 0` yields 100, including the flat case.
/// 3. A non-finite close ends the series, as in `ema`.
///
/// # Returns
/// One entry per close; `None` where undefined. Defined values lie in `[0, 100]`.
pub fn rsi(closes: &[f64], window: u32) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    let Ok(n) = usize::try_from(window) else {
        return out;
    };
    if n == 0 || closes.len() < n + 1 {
        return out;
    }

    let w = f64::from(window);
    let deltas: Vec<f64> = closes.windows(2).map(|pair| pair[1] - pair[0]).collect();

    let (gain_sum, loss_sum) = deltas[..n]
        .iter()
        .fold((0.0_f64, 0.0_f64), |(g, l), &d| (g + d.max(0.0), l + (-d).max(0.0)));
    let mut avg_gain = gain_sum / w;
    let mut avg_loss = loss_sum / w;

    let Some(first) = from_averages(avg_gain, avg_loss) else {
        return out;
    };
    out[n] = Some(first);

    for (slot, &delta) in out[n + 1..].iter_mut().zip(&deltas[n..]) {
        avg_gain = (avg_gain * (w - 1.0) + delta.max(0.0)) / w;
        avg_loss = (avg_loss * (w - 1.0) + (-delta).max(0.0)) / w;
        match from_averages(avg_gain, avg_loss) {
            Some(value) => *slot = Some(value),
            None => break,
        }
    }
    out
}

fn from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if !avg_gain.is_finite() || !avg_loss.is_finite() {
        return None;
    }
    if avg_loss == 0.0 {
        return Some(100.0);
    }
    Some(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
}
