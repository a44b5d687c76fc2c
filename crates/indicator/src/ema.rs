/// # Summary
/// Exponential moving average over `closes`, aligned with the input.
///
/// # Logic
/// 1. Seed with the simple average of the first `window` closes, placed at
///    index `window - 1`.
/// 2. Apply `ema = alpha * close + (1 - alpha) * prev` forward, with
///    `alpha = 2 / (window + 1)`.
/// 3. Indices before the seed are `None`. A non-finite value ends the series:
///    it and every later index stay `None`.
///
/// # Arguments
/// * `closes`: close prices, oldest first.
/// * `window`: smoothing window, must be positive.
///
/// # Returns
/// One entry per close.
pub fn ema(closes: &[f64], window: u32) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    let Ok(n) = usize::try_from(window) else {
        return out;
    };
    if n == 0 || closes.len() < n {
        return out;
    }

    let w = f64::from(window);
    let alpha = 2.0 / (w + 1.0);
    let seed = closes[..n].iter().sum::<f64>() / w;
    if !seed.is_finite() {
        return out;
    }
    out[n - 1] = Some(seed);

    let mut prev = seed;
    for (slot, &close) in out[n..].iter_mut().zip(&closes[n..]) {
        let next = alpha * close + (1.0 - alpha) * prev;
        if !next.is_finite() {
            break;
        }
        *slot = Some(next);
        prev = next;
    }
    out
}
