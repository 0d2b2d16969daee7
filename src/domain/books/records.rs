use std::fmt;

use chrono::NaiveDate;
use serde::de::{self, IgnoredAny, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::dates::parse_book_date;
use crate::domain::ids::BookId;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ReadingStatus {
    #[default]
    ToRead,
    Reading,
    Completed,
}

/// One author name or an ordered list of co-authors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Authors {
    Single(String),
    Many(Vec<String>),
}

impl Authors {
    pub fn names(&self) -> &[String] {
        match self {
            Authors::Single(name) => std::slice::from_ref(name),
            Authors::Many(names) => names,
        }
    }
}

impl Default for Authors {
    fn default() -> Self {
        Authors::Many(Vec::new())
    }
}

/// A book as held by the persistence/search layer. The statistics engine
/// only ever reads these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub id: BookId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: Authors,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub number_of_pages: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ReadingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_reading_date: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub reading_time_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchased: Option<bool>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub subjects: Vec<String>,
}

/// Outcome of reading an optional date field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Missing,
    Parsed(NaiveDate),
    Malformed,
}

impl DateField {
    fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            None => DateField::Missing,
            Some(value) if value.trim().is_empty() => DateField::Missing,
            Some(value) => parse_book_date(value).map_or(DateField::Malformed, DateField::Parsed),
        }
    }

    pub fn date(self) -> Option<NaiveDate> {
        match self {
            DateField::Parsed(date) => Some(date),
            DateField::Missing | DateField::Malformed => None,
        }
    }
}

impl BookRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: BookId::new(id),
            title: title.into(),
            author: Authors::default(),
            number_of_pages: None,
            status: ReadingStatus::default(),
            completion_date: None,
            start_reading_date: None,
            reading_time_days: None,
            purchased: None,
            subjects: Vec::new(),
        }
    }

    /// Page count contribution; missing or invalid counts are zero.
    pub fn page_count(&self) -> u64 {
        self.number_of_pages.map_or(0, u64::from)
    }

    pub fn author_names(&self) -> &[String] {
        self.author.names()
    }

    pub fn completed_on(&self) -> DateField {
        DateField::from_raw(self.completion_date.as_deref())
    }

    pub fn started_on(&self) -> DateField {
        DateField::from_raw(self.start_reading_date.as_deref())
    }
}

/// Deserialize a field whose explicit `null` means the same as leaving it
/// out.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize an optional non-negative count without ever failing.
///
/// Numbers and numeric strings are accepted (fractions truncate). Negative,
/// non-finite and non-numeric values of any JSON shape become `None`.
pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientCountVisitor;

    impl<'de> Visitor<'de> for LenientCountVisitor {
        type Value = Option<u32>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a count, numeric string, or any other value")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(u32::try_from(v).unwrap_or(u32::MAX)))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(u64::try_from(v)
                .ok()
                .map(|n| u32::try_from(n).unwrap_or(u32::MAX)))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(count_from_f64(v))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            let trimmed = v.trim();
            if let Ok(n) = trimmed.parse::<u32>() {
                return Ok(Some(n));
            }
            Ok(trimmed.parse::<f64>().ok().and_then(count_from_f64))
        }

        fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<Self::Value, D2::Error> {
            d.deserialize_any(self)
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            while seq.next_element::<IgnoredAny>()?.is_some() {}
            Ok(None)
        }

        fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
            Ok(None)
        }
    }

    deserializer.deserialize_any(LenientCountVisitor)
}

fn count_from_f64(v: f64) -> Option<u32> {
    (v.is_finite() && v >= 0.0).then(|| v.trunc() as u32)
}
