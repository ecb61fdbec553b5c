//! "Top influences": the tags cited most often in a window.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::MoodRecord;
use crate::window::{Window, observations};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Influence {
    pub tag: String,
    pub count: usize,
}

/// Tags from records in the last `window_days` days, most frequent first, at
/// most `limit` of them.
///
/// Every occurrence counts, including repeats inside one record and tags
/// outside [`crate::KNOWN_TAGS`]. Blank tags are ignored. Equal counts keep
/// the order in which each tag was first seen in `records`.
pub fn top_influences(
    records: &[MoodRecord],
    now: DateTime<Utc>,
    window_days: u32,
    limit: usize,
) -> Vec<Influence> {
    let mut ranked: Vec<Influence> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for (record, _) in observations(records, Window::last_days(window_days, now), now) {
        for tag in record.tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
            match index.get(tag) {
                Some(&i) => ranked[i].count += 1,
                None => {
                    index.insert(tag, ranked.len());
                    ranked.push(Influence {
                        tag: tag.to_string(),
                        count: 1,
                    });
                }
            }
        }
    }

    // stable sort keeps first-seen order among ties
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}
