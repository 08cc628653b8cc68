//! 滚动窗口与指数平滑的基础数值函数。
//!
//! 所有函数返回与输入等长的 `Vec<Option<f64>>`，回溯期不足的位置为 `None`。

/// 将长度转换为 f64，超出 u32 范围时饱和
pub(crate) fn len_f64(n: usize) -> f64 {
    u32::try_from(n).map(f64::from).unwrap_or(f64::from(u32::MAX))
}

fn leading_none(period: usize, len: usize) -> Vec<Option<f64>> {
    vec![None; period.saturating_sub(1).min(len)]
}

/// # Summary
/// 简单移动平均，窗口未满时为 `None`。
pub fn sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 || values.len() < period {
        return vec![None; values.len()];
    }
    let n = len_f64(period);
    let mut out = leading_none(period, values.len());
    out.extend(
        values
            .windows(period)
            .map(|w| Some(w.iter().sum::<f64>() / n)),
    );
    out
}

/// # Summary
/// 滚动总体标准差 (ddof = 0)，窗口未满时为 `None`。
pub fn rolling_std(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 || values.len() < period {
        return vec![None; values.len()];
    }
    let n = len_f64(period);
    let mut out = leading_none(period, values.len());
    out.extend(values.windows(period).map(|w| {
        let mean = w.iter().sum::<f64>() / n;
        let var = w.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(var.sqrt())
    }));
    out
}

/// # Summary
/// 递推式指数平滑 `y = α·x + (1-α)·y_prev`。
///
/// # Logic
/// 1. 以第一个有效值作为初值，前导 `None` 不参与计算。
/// 2. 中间出现的 `None` 沿用上一个平滑值，不计入观测数。
/// 3. 有效观测数达到 `min_periods` 之前输出 `None`。
pub fn ema_alpha(values: &[Option<f64>], alpha: f64, min_periods: usize) -> Vec<Option<f64>> {
    let mut state: Option<f64> = None;
    let mut observed = 0usize;

    values
        .iter()
        .map(|value| {
            if let Some(x) = *value {
                observed += 1;
                state = Some(match state {
                    Some(prev) => alpha * x + (1.0 - alpha) * prev,
                    None => x,
                });
            }
            if observed >= min_periods.max(1) {
                state
            } else {
                None
            }
        })
        .collect()
}

/// # Summary
/// 以 span 表示的 EMA，`α = 2 / (span + 1)`，要求至少 `span` 个观测。
pub fn ema(values: &[Option<f64>], span: usize) -> Vec<Option<f64>> {
    if span == 0 {
        return vec![None; values.len()];
    }
    ema_alpha(values, 2.0 / (len_f64(span) + 1.0), span)
}

/// # Summary
/// Wilder RSI。
///
/// # Logic
/// 1. 逐根差分，拆分为上涨幅度与下跌幅度；首根没有前值，差分记为 0 并参与平滑。
/// 2. 两者分别以 `α = 1/period` 平滑，从下标 `period - 1` 起有值。
/// 3. `RSI = 100 - 100 / (1 + up/down)`；平均跌幅为 0 时取 100。
pub fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; closes.len()];
    }
    let diffs: Vec<Option<f64>> = std::iter::once(Some(0.0))
        .chain(closes.windows(2).map(|w| Some(w[1] - w[0])))
        .take(closes.len())
        .collect();
    let ups: Vec<Option<f64>> = diffs.iter().map(|d| d.map(|v| v.max(0.0))).collect();
    let downs: Vec<Option<f64>> = diffs.iter().map(|d| d.map(|v| (-v).max(0.0))).collect();

    let alpha = 1.0 / len_f64(period);
    let avg_up = ema_alpha(&ups, alpha, period);
    let avg_down = ema_alpha(&downs, alpha, period);

    avg_up
        .iter()
        .zip(&avg_down)
        .map(|(up, down)| match (*up, *down) {
            (Some(_), Some(d)) if d == 0.0 => Some(100.0),
            (Some(u), Some(d)) => Some(100.0 - 100.0 / (1.0 + u / d)),
            _ => None,
        })
        .collect()
}

/// # Summary
/// MACD 主线与信号线。
///
/// # Returns
/// `(macd, signal)`：`macd = EMA(fast) - EMA(slow)`，`signal = EMA(macd, signal_span)`。
pub fn macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal_span: usize,
) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let prices: Vec<Option<f64>> = closes.iter().copied().map(Some).collect();
    let fast_line = ema(&prices, fast);
    let slow_line = ema(&prices, slow);

    let macd_line: Vec<Option<f64>> = fast_line
        .iter()
        .zip(&slow_line)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();
    let signal_line = ema(&macd_line, signal_span);
    (macd_line, signal_line)
}

/// # Summary
/// 布林带上下轨：`SMA(period) ± k · σ(period)`。
pub fn bollinger(
    closes: &[f64],
    period: usize,
    k: f64,
) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let mid = sma(closes, period);
    let std = rolling_std(closes, period);
    mid.iter()
        .zip(&std)
        .map(|(m, s)| match (*m, *s) {
            (Some(m), Some(s)) => (Some(m + k * s), Some(m - k * s)),
            _ => (None, None),
        })
        .unzip()
}

/// # Summary
/// 近 `period` 根的百分比涨跌幅 `(close[t] / close[t-period] - 1) · 100`。
///
/// 基准价为 0 时结果非有限，记为 `None`。
pub fn percent_change(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    (0..closes.len())
        .map(|i| {
            let base = closes[i.checked_sub(period)?];
            let change = (closes[i] / base - 1.0) * 100.0;
            change.is_finite().then_some(change)
        })
        .collect()
}
