use std::fmt;

/// Reading-speed verdict for a script squeezed into the fixed scene duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recommendation {
    Empty,
    Slow,
    Medium,
    Fast,
    VeryFast,
}

impl Recommendation {
    pub fn for_word_count(words: usize) -> Self {
        match words {
            0 => Self::Empty,
            1..50 => Self::Slow,
            50..=100 => Self::Medium,
            101..=150 => Self::Fast,
            _ => Self::VeryFast,
        }
    }

    pub fn is_warning(self) -> bool {
        matches!(self, Self::Fast | Self::VeryFast)
    }
}

/// Values shown next to the script input whenever it changes.
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptSummary {
    pub word_count: usize,
    pub scene_count: usize,
    pub duration_ms: u64,
    pub recommendation: Recommendation,
}

impl ScriptSummary {
    pub fn from_script(script: &str, duration_ms: u64) -> Self {
        let word_count = count_words(script);
        Self {
            word_count,
            scene_count: 1,
            duration_ms,
            recommendation: Recommendation::for_word_count(word_count),
        }
    }

    pub fn words_per_second(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        self.word_count as f64 / (self.duration_ms as f64 / 1000.0)
    }

    /// Estimated length as `m:ss`.
    pub fn duration_label(&self) -> String {
        format_duration(self.duration_ms)
    }

    pub fn recommendation_text(&self) -> String {
        let secs = self.duration_ms / 1000;
        let lead = format!(
            "{} words ({:.1} words/sec)",
            self.word_count,
            self.words_per_second()
        );
        match self.recommendation {
            Recommendation::Empty => format!(
                "{secs} second video - any script length works, scrolling adjusts automatically"
            ),
            Recommendation::Slow => format!("{lead} - very slow, easily readable scrolling"),
            Recommendation::Medium => format!("{lead} - medium speed scrolling, still readable"),
            Recommendation::Fast => format!("{lead} - fast scrolling, viewers must read quickly"),
            Recommendation::VeryFast => {
                format!("{lead} - very fast scrolling, fewer words recommended")
            }
        }
    }
}

impl fmt::Display for ScriptSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "words: {} | duration: {} | scenes: {} | {}",
            self.word_count,
            self.duration_label(),
            self.scene_count,
            self.recommendation_text()
        )
    }
}

pub fn count_words(script: &str) -> usize {
    script.split_whitespace().count()
}

/// `m:ss` with seconds rounded to the nearest whole second.
pub fn format_duration(ms: u64) -> String {
    let secs = (ms + 500) / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// `mm:ss` with seconds floored, used by the running time display.
pub fn format_clock(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
#[path = "../../tests/unit/script/summary.rs"]
mod tests;
