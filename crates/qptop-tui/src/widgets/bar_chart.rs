//! Width-bounded ASCII bar lines.
//!
//! Every line has the shape `<label><glyph × n> (<value>)` and is cut to
//! `width - 1` characters so it never wraps the terminal. Bars are scaled
//! against the series maximum and never shorter than one glyph.

/// Renders bar lines for one terminal width and glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarChart {
    width: usize,
    glyph: char,
    cap: Option<usize>,
}

impl BarChart {
    pub fn new(width: u16, glyph: char) -> Self {
        Self {
            width: usize::from(width),
            glyph,
            cap: None,
        }
    }

    /// Fixed-length bars of at most `cap` glyphs, ignoring magnitude.
    pub fn capped(mut self, cap: usize) -> Self {
        self.cap = Some(cap);
        self
    }

    /// Largest value in the series, floored at 1 so scaling never divides
    /// by zero.
    pub fn series_max(values: impl IntoIterator<Item = u64>) -> u64 {
        values.into_iter().max().unwrap_or(0).max(1)
    }

    /// Room left for the bar once the label and count suffix are placed.
    fn available(&self, label: &str, suffix: &str) -> usize {
        self.width
            .saturating_sub(label.chars().count() + suffix.chars().count() + 1)
    }

    /// Bar length for `value` on a chart whose largest value is `series_max`.
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    pub fn bar_len(&self, available: usize, value: u64, series_max: u64) -> usize {
        let len = match self.cap {
            Some(cap) => cap.min(available),
            None => {
                let scaled = u128::from(value) * available as u128 / u128::from(series_max.max(1));
                usize::try_from(scaled).unwrap_or(available).min(available)
            }
        };
        len.max(1)
    }

    /// One bar line for `value`, scaled against `series_max`.
    pub fn line(&self, label: &str, value: u64, series_max: u64) -> String {
        let suffix = format!(" ({value})");
        let bar_len = self.bar_len(self.available(label, &suffix), value, series_max);

        let mut line = String::with_capacity(label.len() + bar_len + suffix.len());
        line.push_str(label);
        line.extend(std::iter::repeat_n(self.glyph, bar_len));
        line.push_str(&suffix);
        truncate(&line, self.width.saturating_sub(1))
    }

    /// Bar lines for a whole series, scaled against its own maximum.
    pub fn render<S: AsRef<str>>(&self, rows: &[(S, u64)]) -> Vec<String> {
        let series_max = Self::series_max(rows.iter().map(|(_, v)| *v));
        rows.iter()
            .map(|(label, value)| self.line(label.as_ref(), *value, series_max))
            .collect()
    }
}

/// Cut `text` to at most `max_chars` characters.
pub fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Number of leading `glyph` characters after `label` in a rendered line.
#[cfg(test)]
pub(crate) fn glyph_run(line: &str, label: &str, glyph: char) -> usize {
    line.strip_prefix(label)
        .map_or(0, |rest| rest.chars().take_while(|c| *c == glyph).count())
}
