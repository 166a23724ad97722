//! Placeholder templates (`{field}` with `{{`/`}}` as literal braces).
//!
//! Templates are parsed once into literal and field segments so that a typo'd
//! placeholder is caught when the template is loaded, and rendering is a plain
//! walk over the segments.

use std::borrow::Cow;
use std::collections::BTreeSet;

use crate::error::{Result, WebStatsError};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a template source.
    ///
    /// Field names are ASCII alphanumerics and `_`. An unmatched brace or an
    /// empty/invalid field name is a `TemplateUnavailable` error.
    pub fn parse(src: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = src.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' => {
                    if matches!(chars.peek(), Some((_, '{'))) {
                        chars.next();
                        literal.push('{');
                        continue;
                    }
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        name.push(c);
                    }
                    if !closed {
                        return Err(WebStatsError::TemplateUnavailable(format!(
                            "unterminated placeholder at byte {pos}"
                        )));
                    }
                    if !is_field_name(&name) {
                        return Err(WebStatsError::TemplateUnavailable(format!(
                            "invalid placeholder `{{{name}}}` at byte {pos}"
                        )));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(name));
                }
                '}' => {
                    if matches!(chars.peek(), Some((_, '}'))) {
                        chars.next();
                        literal.push('}');
                    } else {
                        return Err(WebStatsError::TemplateUnavailable(format!(
                            "single `}}` at byte {pos} (use `}}}}` for a literal brace)"
                        )));
                    }
                }
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    /// Distinct placeholder names, sorted.
    pub fn placeholders(&self) -> BTreeSet<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Field(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Fail with `MissingField` if the template uses a name outside `known`.
    pub fn ensure_fields(&self, known: &[&str]) -> Result<()> {
        for name in self.placeholders() {
            if !known.contains(&name) {
                return Err(WebStatsError::MissingField(name.to_string()));
            }
        }
        Ok(())
    }

    /// Render into a fresh string.
    pub fn render<'v, F>(&self, lookup: F) -> Result<String>
    where
        F: FnMut(&str) -> Option<Cow<'v, str>>,
    {
        let mut out = String::new();
        self.render_into(&mut out, lookup)?;
        Ok(out)
    }

    /// Append the rendered template to `out`.
    ///
    /// Every placeholder must resolve; the first one `lookup` cannot supply
    /// aborts the render with `MissingField`. `out` may hold a partial render
    /// in that case.
    pub fn render_into<'v, F>(&self, out: &mut String, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<Cow<'v, str>>,
    {
        for seg in &self.segments {
            match seg {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(name) => {
                    let value =
                        lookup(name.as_str()).ok_or_else(|| WebStatsError::MissingField(name.clone()))?;
                    out.push_str(&value);
                }
            }
        }
        Ok(())
    }
}

fn is_field_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
