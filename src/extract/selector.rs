//! Rule-driven extractor built on CSS selectors
//!
//! Each element matching the container selector becomes one record. Every
//! field rule is evaluated inside that element:
//!
//! | Situation | Result |
//! |-----------|--------|
//! | Field found | `Some(value)` |
//! | Optional field missing or empty | `None` in the record |
//! | Required field missing or empty | Record dropped, index left empty |

use crate::config::ExtractSection;
use crate::extract::{ExtractedRecord, PageExtractor, RecordSet};
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};

/// How to pull a single field out of a container element
#[derive(Debug, Clone)]
pub struct FieldRule {
    name: String,
    selector: Selector,
    attribute: Option<String>,
    required: bool,
}

impl FieldRule {
    /// A field holding the text of the first element matching `selector`
    pub fn text(name: &str, selector: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            name: name.to_string(),
            selector: parse_selector(selector)?,
            attribute: None,
            required: false,
        })
    }

    /// A field holding an attribute of the first element matching `selector`
    pub fn attribute(name: &str, selector: &str, attribute: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            attribute: Some(attribute.to_string()),
            ..Self::text(name, selector)?
        })
    }

    /// Marks the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn value_in(&self, element: &ElementRef<'_>) -> Option<String> {
        let found = element.select(&self.selector).next()?;

        let value = match &self.attribute {
            Some(attr) => found.value().attr(attr)?.trim().to_string(),
            None => found.text().collect::<Vec<_>>().join(" "),
        };

        let value = value.split_whitespace().collect::<Vec<_>>().join(" ");
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

/// Extracts one record per container element using a list of field rules
#[derive(Debug, Clone)]
pub struct SelectorExtractor {
    container: Selector,
    fields: Vec<FieldRule>,
}

impl SelectorExtractor {
    /// Creates an extractor with no fields for the given container selector
    ///
    /// # Example
    ///
    /// ```
    /// use sumi_gather::extract::{FieldRule, PageExtractor, SelectorExtractor};
    ///
    /// let extractor = SelectorExtractor::new("div.item")
    ///     .unwrap()
    ///     .with_field(FieldRule::text("title", ".title").unwrap());
    ///
    /// let records = extractor.extract(r#"<div class="item"><p class="title">A</p></div>"#);
    /// assert_eq!(records[&1]["title"], Some("A".to_string()));
    /// ```
    pub fn new(container: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            container: parse_selector(container)?,
            fields: Vec::new(),
        })
    }

    /// Adds a field rule
    pub fn with_field(mut self, rule: FieldRule) -> Self {
        self.fields.push(rule);
        self
    }

    /// Builds an extractor from the `[extract]` config table
    pub fn from_section(section: &ExtractSection) -> Result<Self, ConfigError> {
        let mut extractor = Self::new(&section.container)?;

        for entry in &section.fields {
            let rule = match &entry.attribute {
                Some(attr) => FieldRule::attribute(&entry.name, &entry.selector, attr)?,
                None => FieldRule::text(&entry.name, &entry.selector)?,
            };
            extractor = extractor.with_field(if entry.required {
                rule.required()
            } else {
                rule
            });
        }

        Ok(extractor)
    }

    pub fn fields(&self) -> &[FieldRule] {
        &self.fields
    }

    /// Builds the record for one container, or `None` if a required field is missing
    fn record_for(&self, element: &ElementRef<'_>) -> Option<ExtractedRecord> {
        let mut record = ExtractedRecord::new();

        for rule in &self.fields {
            let value = rule.value_in(element);
            if value.is_none() && rule.required {
                tracing::debug!("Required field '{}' missing, skipping record", rule.name);
                return None;
            }
            record.insert(rule.name.clone(), value);
        }

        Some(record)
    }
}

impl PageExtractor for SelectorExtractor {
    fn extract(&self, body: &str) -> RecordSet {
        let document = Html::parse_document(body);

        document
            .select(&self.container)
            .enumerate()
            .filter_map(|(i, element)| self.record_for(&element).map(|record| (i + 1, record)))
            .collect()
    }
}

/// Parses a CSS selector, mapping failures to a config error
pub(crate) fn parse_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {}", selector, e)))
}
