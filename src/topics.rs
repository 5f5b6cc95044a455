//! Topics file reader: query id -> raw query text
//!
//! ```xml
//! <topics>
//!   <topic number="1">
//!     <query>alan turing</query>
//!     <description>...</description>
//!   </topic>
//! </topics>
//! ```
//!
//! Each child of the root names its query id in a `number` attribute; the
//! direct text of its first child element is the query.

use std::collections::BTreeMap;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::warn;

use crate::error::{Result, RetrievalError};

/// Load and parse a topics file
pub fn load_topics(path: impl AsRef<Path>) -> Result<BTreeMap<String, String>> {
    let path = path.as_ref();
    let xml = std::fs::read_to_string(path).map_err(|e| {
        RetrievalError::TopicsLoad(format!("cannot read topics file {:?}: {}", path, e))
    })?;
    parse_topics(&xml)
}

fn topic_number(start: &BytesStart<'_>) -> Result<String> {
    let attr = start
        .try_get_attribute("number")
        .map_err(|e| RetrievalError::TopicsLoad(e.to_string()))?
        .ok_or_else(|| {
            RetrievalError::TopicsLoad(format!(
                "<{}> element has no 'number' attribute",
                String::from_utf8_lossy(start.name().as_ref())
            ))
        })?;
    let value = attr
        .unescape_value()
        .map_err(|e| RetrievalError::TopicsLoad(e.to_string()))?;
    Ok(value.trim().to_string())
}

/// Parse topics XML
pub fn parse_topics(xml: &str) -> Result<BTreeMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut topics = BTreeMap::new();
    let mut depth = 0usize;
    let mut number: Option<String> = None;
    let mut query: Option<String> = None;
    let mut capturing = false;

    let mut finish_topic = |number: &mut Option<String>, query: &mut Option<String>| -> Result<()> {
        if let Some(id) = number.take() {
            let text = query.take().ok_or_else(|| {
                RetrievalError::TopicsLoad(format!("topic {} has no query element", id))
            })?;
            if topics.insert(id.clone(), text).is_some() {
                warn!(topic = %id, "duplicate topic number, keeping the last one");
            }
        }
        Ok(())
    };

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(RetrievalError::TopicsLoad(format!(
                    "malformed XML at byte {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        };

        match event {
            Event::Start(start) => {
                depth += 1;
                if depth == 2 {
                    number = Some(topic_number(&start)?);
                    query = None;
                } else if depth == 3 && query.is_none() {
                    query = Some(String::new());
                    capturing = true;
                }
            }
            Event::Empty(start) => {
                if depth == 1 {
                    let id = topic_number(&start)?;
                    return Err(RetrievalError::TopicsLoad(format!(
                        "topic {} has no query element",
                        id
                    )));
                } else if depth == 2 && query.is_none() {
                    query = Some(String::new());
                }
            }
            Event::Text(text) if capturing && depth == 3 => {
                let text = text
                    .unescape()
                    .map_err(|e| RetrievalError::TopicsLoad(e.to_string()))?;
                if let Some(q) = query.as_mut() {
                    q.push_str(&text);
                }
            }
            Event::CData(data) if capturing && depth == 3 => {
                if let Some(q) = query.as_mut() {
                    q.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::End(_) => {
                if depth == 3 {
                    capturing = false;
                } else if depth == 2 {
                    finish_topic(&mut number, &mut query)?;
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(topics
        .into_iter()
        .map(|(id, text)| (id, text.trim().to_string()))
        .collect())
}
