use crate::model::Record;

pub fn filter(records: &[Record], query: &str) -> Vec<Record> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|r| r.item_name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
