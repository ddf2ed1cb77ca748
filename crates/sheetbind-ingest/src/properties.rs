//! Custom document properties (`docProps/custom.xml` in OOXML packages).

use std::collections::BTreeMap;

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};

use crate::error::Result;

/// Parses a custom-properties part into a name to value map.
///
/// Values are kept as the text of the typed `vt:*` element, whatever its type.
/// Properties without a name are ignored; a repeated name keeps the last value.
pub fn parse_custom_properties(xml: &str) -> Result<BTreeMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    let mut properties = BTreeMap::new();

    let mut name: Option<String> = None;
    let mut value = String::new();
    let mut value_depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(start) if start.local_name().as_ref() == b"property" => {
                name = property_name(&start)?;
                value.clear();
                value_depth = 0;
            }
            Event::Start(_) if name.is_some() => value_depth += 1,
            Event::End(end) if end.local_name().as_ref() == b"property" => {
                if let Some(name) = name.take() {
                    properties.insert(name, std::mem::take(&mut value));
                }
            }
            Event::End(_) if name.is_some() => value_depth = value_depth.saturating_sub(1),
            Event::Text(text) if value_depth > 0 => {
                value.push_str(&text.decode().map_err(quick_xml::Error::from)?);
            }
            Event::CData(data) if value_depth > 0 => {
                value.push_str(&String::from_utf8_lossy(&data));
            }
            Event::GeneralRef(reference) if value_depth > 0 => {
                if let Some(ch) = reference.resolve_char_ref()? {
                    value.push(ch);
                } else {
                    let entity = reference.decode().map_err(quick_xml::Error::from)?;
                    match resolve_predefined_entity(&entity) {
                        Some(resolved) => value.push_str(resolved),
                        None => {
                            value.push('&');
                            value.push_str(&entity);
                            value.push(';');
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    tracing::trace!(count = properties.len(), "parsed custom properties");
    Ok(properties)
}

fn property_name(start: &BytesStart<'_>) -> Result<Option<String>> {
    let Some(attribute) = start
        .try_get_attribute("name")
        .map_err(quick_xml::Error::from)?
    else {
        return Ok(None);
    };
    let name = attribute.unescape_value()?;
    Ok((!name.is_empty()).then(|| name.into_owned()))
}
