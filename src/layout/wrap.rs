use std::collections::HashMap;
use std::sync::Arc;

use crate::layout::{FontSpec, TextMeasurer};

/// Wrap `text` into lines no wider than `max_width_px`.
///
/// Paragraphs are split on `\n`. A blank paragraph becomes one empty line; every non-blank
/// paragraph except the last is followed by one empty line. A single word wider than
/// `max_width_px` is kept on its own line rather than split.
pub fn wrap(
    text: &str,
    max_width_px: f64,
    font: &FontSpec,
    measurer: &dyn TextMeasurer,
) -> Vec<String> {
    let paragraphs: Vec<&str> = text.split('\n').collect();
    let last = paragraphs.len().saturating_sub(1);
    let mut lines = Vec::new();

    for (p_idx, paragraph) in paragraphs.iter().enumerate() {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
            let candidate = if current.is_empty() {
                word.to_owned()
            } else {
                format!("{current} {word}")
            };
            if !current.is_empty() && measurer.measure(&candidate, font) > max_width_px {
                lines.push(std::mem::replace(&mut current, word.to_owned()));
            } else {
                current = candidate;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }

        if p_idx < last {
            lines.push(String::new());
        }
    }

    lines
}

/// Wrapped lines for one scene, shared cheaply with each frame snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WrappedText {
    lines: Arc<[String]>,
}

impl WrappedText {
    pub fn new(lines: Vec<String>) -> Self {
        Self {
            lines: lines.into(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

#[derive(Debug)]
struct CacheEntry {
    text: String,
    max_width_bits: u64,
    font: FontSpec,
    wrapped: WrappedText,
}

/// Per-scene wrap results, recomputed only when text, width, or font change.
#[derive(Debug, Default)]
pub struct LayoutCache {
    entries: HashMap<usize, CacheEntry>,
    wraps: u64,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines_for(
        &mut self,
        scene_index: usize,
        text: &str,
        max_width_px: f64,
        font: &FontSpec,
        measurer: &dyn TextMeasurer,
    ) -> WrappedText {
        let bits = max_width_px.to_bits();
        if let Some(entry) = self.entries.get(&scene_index)
            && entry.max_width_bits == bits
            && entry.text == text
            && entry.font == *font
        {
            return entry.wrapped.clone();
        }

        let wrapped = WrappedText::new(wrap(text, max_width_px, font, measurer));
        self.wraps += 1;
        tracing::debug!(
            scene_index,
            lines = wrapped.line_count(),
            max_width_px,
            "wrapped scene text"
        );
        self.entries.insert(
            scene_index,
            CacheEntry {
                text: text.to_owned(),
                max_width_bits: bits,
                font: font.clone(),
                wrapped: wrapped.clone(),
            },
        );
        wrapped
    }

    /// Number of full wrap passes performed so far.
    pub fn wrap_passes(&self) -> u64 {
        self.wraps
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/wrap.rs"]
mod tests;
