//! Parsers for the option encodings carried on [`Question::options`].
//!
//! Single-choice questions declare `key=value` pairs separated by commas, e.g.
//! `"yes=Y, no=N"`. Multi-choice questions declare groups as `group=item|item`,
//! e.g. `"Medication=Insulin|Tablets,Treatment=Diet"`, and each raw answer names
//! one item as `<group>-<item>`. Neither encoding supports escaping.
//!
//! [`Question::options`]: crate::spec::Question::options

pub const OPTION_SEPARATOR: char = ',';
pub const PAIR_SEPARATOR: char = '=';
pub const ITEM_SEPARATOR: char = '|';
pub const GROUP_SEPARATOR: char = '-';

/// A `key=value` option, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub key: String,
    pub value: String,
}

/// A declared checkbox group with its allowed items (empty allows any item).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceGroup {
    pub name: String,
    pub items: Vec<String>,
}

impl ChoiceGroup {
    pub fn allows(&self, item: &str) -> bool {
        self.items.is_empty() || self.items.iter().any(|candidate| candidate == item)
    }
}

/// Segment that is not a `key=value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedSegment(pub String);

pub fn parse_choices(raw: &str) -> Result<Vec<ChoiceOption>, MalformedSegment> {
    segments(raw)
        .map(|segment| {
            split_pair(segment).map(|(key, value)| ChoiceOption {
                key: key.to_string(),
                value: value.to_string(),
            })
        })
        .collect()
}

pub fn parse_groups(raw: &str) -> Result<Vec<ChoiceGroup>, MalformedSegment> {
    segments(raw)
        .map(|segment| {
            split_pair(segment).map(|(name, items)| ChoiceGroup {
                name: name.to_string(),
                items: items
                    .split(ITEM_SEPARATOR)
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect(),
            })
        })
        .collect()
}

/// Splits a checkbox answer on its first hyphen into `(group, item)`.
pub fn split_composite(answer: &str) -> Option<(&str, &str)> {
    answer.split_once(GROUP_SEPARATOR)
}

/// Group part of a checkbox answer; the whole answer when there is no hyphen.
pub fn group_of(answer: &str) -> &str {
    split_composite(answer).map_or(answer, |(group, _)| group)
}

fn segments(raw: &str) -> impl Iterator<Item = &str> {
    raw.trim()
        .split(OPTION_SEPARATOR)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
}

fn split_pair(segment: &str) -> Result<(&str, &str), MalformedSegment> {
    segment
        .split_once(PAIR_SEPARATOR)
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| MalformedSegment(segment.to_string()))
}
