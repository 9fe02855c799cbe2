//! Formatting policy: indentation, line terminators and line wrapping
//!
//! A [`Layout`] is immutable. Descending into nested content asks for
//! [`Layout::indent`], which hands back a new policy one level deeper.
//!
//! Wrapping is greedy and tag-aware: a logical line is only ever broken right
//! after a space, and only where the text before the break has as many `<` as
//! `>`. This keeps tags and their attribute lists on one physical line.

use serde::{Deserialize, Serialize};

/// Smallest width a wrapped segment is allowed to aim for, whatever the
/// indentation depth.
const WRAP_FLOOR: usize = 48;

/// Settings and routines for laying out markup text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    indent_style: String,
    indent_count: usize,
    line_ending: String,
    line_wrap: usize,

    indentation: String,
    default_wrap: usize,
    min_wrap: usize,
}

impl Layout {
    /// Create a layout. A `line_wrap` of zero disables wrapping.
    pub fn new(
        indent_style: impl Into<String>,
        indent_count: usize,
        line_ending: impl Into<String>,
        line_wrap: usize,
    ) -> Self {
        let indent_style = indent_style.into();
        let indentation = indent_style.repeat(indent_count);
        let default_wrap =
            WRAP_FLOOR.max(line_wrap.saturating_sub(indentation.chars().count())) + 1;
        Self {
            indent_style,
            indent_count,
            line_ending: line_ending.into(),
            line_wrap,
            indentation,
            default_wrap,
            min_wrap: default_wrap / 2,
        }
    }

    /// Tab indentation, newline terminators, 80-column wrapping
    pub fn readable() -> Self {
        Self::new("\t", 0, "\n", 80)
    }

    /// One node per line, no indentation, no wrapping
    pub fn spartan() -> Self {
        Self::new("", 0, "\n", 0)
    }

    /// Smallest possible output: no indentation, terminators or wrapping
    pub fn minimal() -> Self {
        Self::new("", 0, "", 0)
    }

    /// A layout one indentation level deeper.
    ///
    /// With an empty indent style, indenting changes nothing and the same
    /// policy is returned.
    pub fn indent(&self) -> Self {
        if self.indent_style.is_empty() {
            self.clone()
        } else {
            Self::new(
                self.indent_style.clone(),
                self.indent_count + 1,
                self.line_ending.clone(),
                self.line_wrap,
            )
        }
    }

    pub fn indent_style(&self) -> &str {
        &self.indent_style
    }

    pub fn indent_count(&self) -> usize {
        self.indent_count
    }

    pub fn line_ending(&self) -> &str {
        &self.line_ending
    }

    pub fn line_wrap(&self) -> usize {
        self.line_wrap
    }

    /// The indentation string prefixed to every line at this depth
    pub fn indentation(&self) -> &str {
        &self.indentation
    }

    /// Target width of a wrapped segment at this depth
    pub fn default_wrap(&self) -> usize {
        self.default_wrap
    }

    /// Narrowest width the break search will back off to
    pub fn min_wrap(&self) -> usize {
        self.min_wrap
    }

    /// The serializable settings this layout was built from (depth excluded)
    pub fn settings(&self) -> LayoutSettings {
        LayoutSettings {
            indent_style: self.indent_style.clone(),
            line_ending: self.line_ending.clone(),
            line_wrap: self.line_wrap,
        }
    }

    /// Lay out a single line: indentation, the line, then the terminator.
    pub fn format(&self, line: &str) -> String {
        let mut out =
            String::with_capacity(self.indentation.len() + line.len() + self.line_ending.len());
        out.push_str(&self.indentation);
        out.push_str(line);
        out.push_str(&self.line_ending);
        out
    }

    /// Lay out a logical line, wrapping it into several physical lines when
    /// it is wider than this layout allows.
    ///
    /// Wrapping only happens when both a wrap column and a line terminator
    /// are configured; otherwise this is [`Layout::format`].
    pub fn format_wrapped(&self, line: &str) -> String {
        if self.line_wrap == 0 || self.line_ending.is_empty() {
            return self.format(line);
        }

        let chars: Vec<char> = line.chars().collect();
        if chars.len() <= self.default_wrap {
            return self.format(line);
        }

        let mut depth = Vec::with_capacity(chars.len() + 1);
        depth.push(0isize);
        for c in &chars {
            let last = depth[depth.len() - 1];
            depth.push(match c {
                '<' => last + 1,
                '>' => last - 1,
                _ => last,
            });
        }

        let mut parts = Vec::new();
        let mut start = 0;
        while chars.len() - start > self.default_wrap {
            let rest = &chars[start..];
            let base = depth[start];
            let cut = self.break_index(rest, |i| depth[start + i] - base);
            let part: String = rest[..cut].iter().collect();
            parts.push(format!("{}{}", self.indentation, part.trim()));
            start += cut;
        }
        if start < chars.len() {
            let part: String = chars[start..].iter().collect();
            parts.push(format!("{}{}", self.indentation, part));
        }

        let mut out = parts.join(&self.line_ending);
        out.push_str(&self.line_ending);
        out
    }

    /// Find where to cut `text`, which is known to be wider than
    /// `default_wrap`.
    ///
    /// Searches backward from the target width down to `min_wrap`, then
    /// forward past the target width. Returns `text.len()` when no valid
    /// break exists at all.
    fn break_index(&self, text: &[char], depth: impl Fn(usize) -> isize) -> usize {
        let fits = |index: usize| depth(index) == 0 && text[index - 1] == ' ';

        let mut index = self.default_wrap;
        while !fits(index) {
            if self.min_wrap < index && index <= self.default_wrap {
                index -= 1;
            } else if index == self.min_wrap {
                index = self.default_wrap + 1;
            } else {
                index += 1;
            }
            if index >= text.len() {
                return text.len();
            }
        }
        index
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::readable()
    }
}

/// Serializable layout knobs, without the current indentation depth
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSettings {
    /// String repeated once per indentation level (empty disables indenting)
    pub indent_style: String,

    /// Terminator appended to every physical line
    pub line_ending: String,

    /// Wrap column, or 0 to never wrap
    pub line_wrap: usize,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Layout::readable().settings()
    }
}

impl From<LayoutSettings> for Layout {
    fn from(settings: LayoutSettings) -> Self {
        Layout::new(settings.indent_style, 0, settings.line_ending, settings.line_wrap)
    }
}

impl From<&LayoutSettings> for Layout {
    fn from(settings: &LayoutSettings) -> Self {
        Layout::new(
            settings.indent_style.clone(),
            0,
            settings.line_ending.clone(),
            settings.line_wrap,
        )
    }
}

/// The three canonical layouts, addressable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutPreset {
    Readable,
    Spartan,
    Minimal,
}

impl From<LayoutPreset> for Layout {
    fn from(preset: LayoutPreset) -> Self {
        match preset {
            LayoutPreset::Readable => Layout::readable(),
            LayoutPreset::Spartan => Layout::spartan(),
            LayoutPreset::Minimal => Layout::minimal(),
        }
    }
}
