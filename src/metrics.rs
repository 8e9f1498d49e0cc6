use std::time::Duration;

/// Half-up rounding, so 2.5 -> 3 and -2.5 -> -2
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

fn to_score(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        round_half_up(value) as u32
    } else {
        0
    }
}

/// Space-separated token count of the typed buffer, minus the token still
/// being typed unless the buffer ends in a space.
pub fn typed_words(typed: &str) -> usize {
    let tokens = typed.split(' ').count();
    if typed.ends_with(' ') {
        tokens
    } else {
        tokens.saturating_sub(1)
    }
}

/// Words per minute while typing; 0 before the first keystroke
pub fn live_wpm(typed: &str, elapsed: Option<Duration>) -> u32 {
    let Some(elapsed) = elapsed else {
        return 0;
    };
    let minutes = elapsed.as_millis() as f64 / 60_000.0;
    if minutes <= 0.0 {
        return 0;
    }
    to_score(typed_words(typed) as f64 / minutes)
}

/// Percentage of correct keystrokes; 100 when nothing was typed yet
pub fn live_accuracy(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 100;
    }
    to_score(correct as f64 / total as f64 * 100.0)
}

/// Final words per minute of a finished text, counting every space-separated token
pub fn completion_wpm(text: &str, elapsed: Duration) -> u32 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return 0;
    }
    let words = text.split(' ').count() as f64;
    to_score(words / secs * 60.0)
}

/// Final accuracy of a finished text.
///
/// Takes the counters as they stood before the finishing keystroke was
/// tallied and adds that keystroke to both sides.
pub fn completion_accuracy(correct_before: usize, total_before: usize) -> u32 {
    to_score((correct_before + 1) as f64 / (total_before + 1) as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(2.49), 2.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(0.0), 0.0);
    }

    #[test]
    fn test_typed_words() {
        assert_eq!(typed_words(""), 0);
        assert_eq!(typed_words("hel"), 0);
        assert_eq!(typed_words("hello wor"), 1);
        assert_eq!(typed_words("hello world again"), 2);
        assert_eq!(typed_words("hello "), 2);
    }

    #[test]
    fn test_live_wpm_without_start() {
        assert_eq!(live_wpm("hello world ", None), 0);
    }

    #[test]
    fn test_live_wpm_zero_elapsed() {
        assert_eq!(live_wpm("hello world ", Some(Duration::ZERO)), 0);
    }

    #[test]
    fn test_live_wpm() {
        assert_eq!(live_wpm("one two thr", Some(Duration::from_secs(30))), 4);
        // 2 finished words in one minute
        assert_eq!(live_wpm("one two thr", Some(Duration::from_secs(60))), 2);
    }

    #[test]
    fn test_live_accuracy() {
        assert_eq!(live_accuracy(0, 0), 100);
        assert_eq!(live_accuracy(3, 4), 75);
        assert_eq!(live_accuracy(2, 3), 67);
        assert_eq!(live_accuracy(0, 5), 0);
    }

    #[test]
    fn test_completion_wpm() {
        // 4 words in 6 seconds
        assert_eq!(completion_wpm("a b c d", Duration::from_secs(6)), 40);
        assert_eq!(completion_wpm("ab", Duration::from_millis(1500)), 40);
    }

    #[test]
    fn test_completion_wpm_zero_elapsed() {
        assert_eq!(completion_wpm("a b c", Duration::ZERO), 0);
    }

    #[test]
    fn test_completion_accuracy_counts_final_keystroke() {
        assert_eq!(completion_accuracy(1, 1), 100);
        assert_eq!(completion_accuracy(2, 3), 75);
        assert_eq!(completion_accuracy(0, 0), 100);
        assert_eq!(completion_accuracy(0, 1), 50);
    }
}
