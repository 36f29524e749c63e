//! JSON rendering of harvest results
//!
//! The result map is written as
//! `{ "<url>": { "<index>": { "<field>": "<value>" | null } } }`,
//! URLs and indices in ascending order.

use crate::crawler::{Harvest, ResultMap};
use serde::Serialize;
use std::io::Write;

/// Renders the result map as a JSON string
pub fn render_json(results: &ResultMap, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(results)
    } else {
        serde_json::to_string(results)
    }
}

#[derive(Serialize)]
struct HarvestDocument<'a> {
    results: &'a ResultMap,
    exhausted: &'a [String],
}

/// Writes the results, plus any exhausted URLs, followed by a newline
pub fn write_harvest<W: Write>(
    writer: &mut W,
    harvest: &Harvest,
    pretty: bool,
) -> Result<(), crate::GatherError> {
    if harvest.exhausted.is_empty() {
        writer.write_all(render_json(&harvest.results, pretty)?.as_bytes())?;
    } else {
        let document = HarvestDocument {
            results: &harvest.results,
            exhausted: &harvest.exhausted,
        };
        if pretty {
            serde_json::to_writer_pretty(&mut *writer, &document)?;
        } else {
            serde_json::to_writer(&mut *writer, &document)?;
        }
    }

    writeln!(writer)?;
    Ok(())
}
