use vigil_core::common::InstrumentConfig;
use vigil_core::notify::entity::{AlertKind, AlertMessage};
use vigil_core::signal::entity::{IndicatorSnapshot, Signal};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";

pub fn startup(instrument: &InstrumentConfig) -> AlertMessage {
    AlertMessage {
        kind: AlertKind::StartupNotice,
        payload: format!(
            "🚀 Monitoring started for {} on {}.",
            instrument.symbol, instrument.interval
        ),
    }
}

pub fn stopped(instrument: &InstrumentConfig) -> AlertMessage {
    AlertMessage {
        kind: AlertKind::StoppedNotice,
        payload: format!(
            "🛑 Monitoring for {} on {} has stopped.",
            instrument.symbol, instrument.interval
        ),
    }
}

pub fn error(instrument: &InstrumentConfig, reason: &str) -> AlertMessage {
    AlertMessage {
        kind: AlertKind::ErrorNotice,
        payload: format!(
            "⚠️ Monitor for {} stopped due to an error: {}",
            instrument.symbol, reason
        ),
    }
}

/// # Summary
/// Renders the alert for a non-neutral snapshot.
///
/// # Logic
/// Price with 4 decimals, RSI with 2, bar time as `YYYY-MM-DD HH:MM:SS+00:00`,
/// followed by the two conditions that held.
///
/// # Returns
/// `None` for `Signal::None` or a snapshot without an RSI value.
pub fn signal_alert(
    instrument: &InstrumentConfig,
    snapshot: &IndicatorSnapshot,
) -> Option<AlertMessage> {
    let rsi = snapshot.rsi5?;
    let (kind, headline, conditions) = match snapshot.signal {
        Signal::None => return None,
        Signal::Overbought => (
            AlertKind::OverboughtAlert,
            "🔴 OVERBOUGHT ALERT",
            "Price < EMA50\nEMA50 > EMA35",
        ),
        Signal::Oversold => (
            AlertKind::OversoldAlert,
            "🟢 OVERSOLD ALERT",
            "Price > EMA50\nEMA50 < EMA35",
        ),
    };

    let payload = format!(
        "{} {}\nInterval: {}\nPrice: {:.4}\nRSI(5): {:.2}\n{}\nTime: {}",
        headline,
        instrument.symbol,
        instrument.interval,
        snapshot.close,
        rsi,
        conditions,
        snapshot.time.format(TIME_FORMAT)
    );
    Some(AlertMessage { kind, payload })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use vigil_core::common::Interval;

    fn snapshot(signal: Signal) -> IndicatorSnapshot {
        IndicatorSnapshot {
            time: Utc.with_ymd_and_hms(2024, 3, 1, 14, 0, 0).unwrap(),
            close: 1.084_567_89,
            ema35: Some(1.09),
            ema50: Some(1.1),
            rsi5: Some(78.692_4),
            signal,
        }
    }

    #[test]
    fn test_overbought_payload() {
        let instrument = InstrumentConfig::new("EURUSD=X", Interval::Hour1);
        let alert = signal_alert(&instrument, &snapshot(Signal::Overbought)).unwrap();
        assert_eq!(alert.kind, AlertKind::OverboughtAlert);
        assert_eq!(
            alert.payload,
            "🔴 OVERBOUGHT ALERT EURUSD=X\nInterval: 1h\nPrice: 1.0846\nRSI(5): 78.69\n\
             Price < EMA50\nEMA50 > EMA35\nTime: 2024-03-01 14:00:00+00:00"
        );
    }

    #[test]
    fn test_oversold_payload() {
        let instrument = InstrumentConfig::new("GC=F", Interval::Day1);
        let alert = signal_alert(&instrument, &snapshot(Signal::Oversold)).unwrap();
        assert_eq!(alert.kind, AlertKind::OversoldAlert);
        assert!(alert.payload.starts_with("🟢 OVERSOLD ALERT GC=F\nInterval: 1d\n"));
        assert!(alert.payload.contains("Price > EMA50\nEMA50 < EMA35"));
    }

    #[test]
    fn test_neutral_has_no_alert() {
        let instrument = InstrumentConfig::new("GC=F", Interval::Day1);
        assert!(signal_alert(&instrument, &snapshot(Signal::None)).is_none());
    }

    #[test]
    fn test_lifecycle_notices() {
        let instrument = InstrumentConfig::new("USDJPY=X", Interval::Minute30);
        assert_eq!(
            startup(&instrument).payload,
            "🚀 Monitoring started for USDJPY=X on 30m."
        );
        assert_eq!(
            stopped(&instrument).payload,
            "🛑 Monitoring for USDJPY=X on 30m has stopped."
        );
        let err = error(&instrument, "boom");
        assert_eq!(err.kind, AlertKind::ErrorNotice);
        assert!(err.payload.ends_with("stopped due to an error: boom"));
    }
}
