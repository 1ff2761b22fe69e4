use std::fmt;
use std::path::Path;

use chrono::{DateTime, FixedOffset};
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use spdlog::debug;

use crate::content::front_matter::split_front_matter;
use crate::content::{ContentRecord, FrontMatterFormat};
use crate::error::{ContentError, ContentResult};
use crate::text_utils::parse_date_time;
use crate::util::toml_date::datetimes_to_strings;

/// Front matter keys this crate understands. Anything else is ignored.
#[derive(Deserialize, Default, Debug)]
#[serde(default)]
struct RawFrontMatter {
    title: Option<Text>,
    date: Option<Text>,
    lastmod: Option<Text>,
    author: Option<Text>,
    description: Option<Text>,
    slug: Option<Text>,
    tags: Option<Terms>,
    categories: Option<Terms>,
    draft: Option<bool>,
}

/// A text value. Bare numbers and booleans (`title: 1984`) are kept as their text;
/// lists and mappings are rejected.
#[derive(Debug, PartialEq)]
struct Text(String);

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TextVisitor)
    }
}

struct TextVisitor;

impl<'de> Visitor<'de> for TextVisitor {
    type Value = Text;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string, number or boolean")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Text, E> {
        Ok(Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Text, E> {
        Ok(Text(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Text, E> {
        Ok(Text(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Text, E> {
        Ok(Text(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Text, E> {
        Ok(Text(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Text, E> {
        Ok(Text(v.to_string()))
    }
}

/// `tags: rust` and `tags: [rust, podman]` are both accepted.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum Terms {
    One(Text),
    Many(Vec<Text>),
}

impl Terms {
    fn into_vec(self) -> Vec<String> {
        match self {
            Terms::One(term) => vec![term.0],
            Terms::Many(terms) => terms.into_iter().map(|t| t.0).collect(),
        }
    }
}

/// Parses the full text of one content file into a record identified by `path`.
pub fn parse_content(path: &Path, text: &str) -> ContentResult<ContentRecord> {
    let front_matter = split_front_matter(text)?;
    let raw = decode_front_matter(front_matter.format, front_matter.block)?;

    let title = match raw.title {
        Some(Text(ref title)) if !title.trim().is_empty() => title.trim().to_string(),
        Some(_) => return Err(ContentError::validation("title", "title is empty")),
        None => return Err(ContentError::validation("title", "title is missing")),
    };

    let published_at = match raw.date {
        Some(Text(ref date)) => parse_date_field("date", date)?,
        None => return Err(ContentError::validation("date", "date is missing")),
    };

    let updated_at = match raw.lastmod {
        Some(Text(ref lastmod)) => Some(parse_date_field("lastmod", lastmod)?),
        None => None,
    };

    let tags = extract_terms(path, "tags", raw.tags)?;
    let categories = extract_terms(path, "categories", raw.categories)?;

    Ok(ContentRecord {
        path: path.to_path_buf(),
        format: front_matter.format,
        title,
        published_at,
        updated_at,
        author: non_blank(raw.author),
        description: non_blank(raw.description),
        slug: non_blank(raw.slug),
        tags,
        categories,
        draft: raw.draft.unwrap_or(false),
        body: front_matter.body.to_string(),
    })
}

fn decode_front_matter(format: FrontMatterFormat, block: &str) -> ContentResult<RawFrontMatter> {
    if block.trim().is_empty() {
        return Ok(RawFrontMatter::default());
    }

    match format {
        FrontMatterFormat::Yaml => decode_yaml(block),
        FrontMatterFormat::Toml => decode_toml(block),
    }
}

fn decode_yaml(block: &str) -> ContentResult<RawFrontMatter> {
    let value: serde_yaml::Value = serde_yaml::from_str(block)
        .map_err(|e| ContentError::MalformedFrontMatter(e.to_string()))?;

    match value {
        serde_yaml::Value::Null => Ok(RawFrontMatter::default()),
        serde_yaml::Value::Mapping(_) => serde_yaml::from_value(value)
            .map_err(|e| ContentError::MalformedFrontMatter(e.to_string())),
        _ => Err(ContentError::MalformedFrontMatter("front matter is not a key/value mapping".to_string())),
    }
}

fn decode_toml(block: &str) -> ContentResult<RawFrontMatter> {
    let table: toml::Table = toml::from_str(block)
        .map_err(|e| ContentError::MalformedFrontMatter(e.to_string()))?;

    datetimes_to_strings(toml::Value::Table(table))
        .try_into()
        .map_err(|e: toml::de::Error| ContentError::MalformedFrontMatter(e.to_string()))
}

fn parse_date_field(field: &'static str, value: &str) -> ContentResult<DateTime<FixedOffset>> {
    parse_date_time(value).map_err(|e| ContentError::validation(field, e))
}

/// Trims every term, rejects blank ones and drops repeats, keeping the first occurrence.
fn extract_terms(path: &Path, field: &'static str, terms: Option<Terms>) -> ContentResult<Vec<String>> {
    let Some(terms) = terms else {
        return Ok(vec![]);
    };

    let mut unique: Vec<String> = vec![];
    for term in terms.into_vec() {
        let term = term.trim();
        if term.is_empty() {
            return Err(ContentError::validation(field, "entries cannot be empty"));
        }
        if unique.iter().any(|t| t == term) {
            debug!("Dropping repeated {} entry '{}' - file={}", field, term, path.display());
            continue;
        }
        unique.push(term.to_string());
    }

    Ok(unique)
}

fn non_blank(value: Option<Text>) -> Option<String> {
    value.map(|Text(v)| v.trim().to_string()).filter(|v| !v.is_empty())
}
