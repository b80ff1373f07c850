//! Normalization of the optional page globals that tune the board.

/// A blank string means "use the page origin".
pub(crate) fn base_url_override(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Page globals arrive as JS numbers; anything non-finite or non-positive is ignored.
pub(crate) fn poll_interval_override(raw: Option<f64>) -> Option<u64> {
    let value = raw?;
    if !value.is_finite() || value <= 0.0 {
        return None;
    }
    Some(value.floor().min(u64::MAX as f64) as u64)
}

/// Unknown or blank level names fall back to `info`.
pub(crate) fn log_level_override(raw: Option<String>) -> tracing::Level {
    raw.and_then(|value| value.trim().parse().ok())
        .unwrap_or(tracing::Level::INFO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_base_url_means_same_origin() {
        assert_eq!(base_url_override(None), None);
        assert_eq!(base_url_override(Some("   ".to_string())), None);
        assert_eq!(
            base_url_override(Some(" https://board.example.com ".to_string())),
            Some("https://board.example.com".to_string())
        );
    }

    #[test]
    fn poll_interval_accepts_positive_finite_numbers() {
        assert_eq!(poll_interval_override(Some(7_500.9)), Some(7_500));
        assert_eq!(poll_interval_override(Some(0.0)), None);
        assert_eq!(poll_interval_override(Some(-1.0)), None);
        assert_eq!(poll_interval_override(Some(f64::NAN)), None);
        assert_eq!(poll_interval_override(Some(f64::INFINITY)), None);
        assert_eq!(poll_interval_override(None), None);
    }

    #[test]
    fn log_level_defaults_to_info() {
        assert_eq!(log_level_override(None), tracing::Level::INFO);
        assert_eq!(log_level_override(Some("verbose".to_string())), tracing::Level::INFO);
        assert_eq!(log_level_override(Some(" debug ".to_string())), tracing::Level::DEBUG);
        assert_eq!(log_level_override(Some("WARN".to_string())), tracing::Level::WARN);
    }
}
