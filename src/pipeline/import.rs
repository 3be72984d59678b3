//! Upload handling: CSV text → verification items, training labels and the
//! novel catalog.
//!
//! Column names vary between datasets, so every logical field is looked up
//! through an ordered synonym list ([`Field::columns`]); the first non-empty
//! column wins.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use serde::Deserialize;

use super::types::{LabelValue, Novel, NovelStatus, TrainLabel, VerificationItem};

/// Rough size of one chunk, used to estimate chunk counts for uploaded books.
pub const BYTES_PER_CHUNK: u64 = 2000;

const DEFAULT_BOOK: &str = "Unknown Book";
const DEFAULT_CHARACTER: &str = "Unknown";
const DEFAULT_AUTHOR: &str = "Unknown";
const DEFAULT_LABEL: &str = "0";
const GENERATED_ID_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ImportError {
    #[error("Unterminated quoted field starting on line {line}")]
    UnterminatedQuote { line: usize },
}

// ═══════════════════════════════════════════
// Field mapping
// ═══════════════════════════════════════════

/// Logical field of an uploaded record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Book,
    Character,
    Claim,
    Evidence,
    Label,
}

impl Field {
    /// Accepted column names, in priority order.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Self::Id => &["id"],
            Self::Book => &["book_name"],
            Self::Character => &["char", "character"],
            Self::Claim => &["content", "claim"],
            Self::Evidence => &["context", "caption"],
            Self::Label => &["label", "contradiction"],
        }
    }
}

/// One parsed CSV row keyed by header name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvRecord {
    fields: HashMap<String, String>,
}

impl CsvRecord {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(|s| s.as_str())
    }

    /// First non-empty value among the field's synonyms.
    pub fn lookup(&self, field: Field) -> Option<&str> {
        field
            .columns()
            .iter()
            .filter_map(|c| self.get(c))
            .map(str::trim)
            .find(|v| !v.is_empty())
    }
}

// ═══════════════════════════════════════════
// CSV reading
// ═══════════════════════════════════════════

/// Split CSV text into rows of raw fields.
///
/// Supports `"`-quoted fields with `""` escapes and embedded commas or
/// newlines. Blank lines are skipped and CRLF line endings are accepted.
fn split_rows(text: &str) -> Result<Vec<Vec<String>>, ImportError> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quote_line = 0;
    let mut line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
                quote_line = line;
            }
            ',' => row.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                line += 1;
                row.push(std::mem::take(&mut field));
                if row.iter().any(|f| !f.trim().is_empty()) {
                    rows.push(std::mem::take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(ImportError::UnterminatedQuote { line: quote_line });
    }

    row.push(field);
    if row.iter().any(|f| !f.trim().is_empty()) {
        rows.push(row);
    }

    Ok(rows)
}

/// Parse CSV text with a header row into keyed records.
pub fn parse_csv(text: &str) -> Result<Vec<CsvRecord>, ImportError> {
    let mut rows = split_rows(text)?.into_iter();
    let headers: Vec<String> = match rows.next() {
        Some(h) => h.into_iter().map(|h| h.trim().to_string()).collect(),
        None => return Ok(Vec::new()),
    };

    Ok(rows
        .map(|values| {
            let fields = headers
                .iter()
                .enumerate()
                .map(|(i, h)| {
                    let value = values.get(i).map(|v| v.trim().to_string()).unwrap_or_default();
                    (h.clone(), value)
                })
                .collect();
            CsvRecord { fields }
        })
        .collect())
}

// ═══════════════════════════════════════════
// Verification items
// ═══════════════════════════════════════════

fn random_id(rng: &mut impl Rng) -> String {
    let suffix: String = (0..GENERATED_ID_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("t-{suffix}")
}

/// Map parsed records to verification items.
pub fn items_from_records(records: &[CsvRecord]) -> Vec<VerificationItem> {
    let mut taken: HashSet<String> = records
        .iter()
        .filter_map(|r| r.lookup(Field::Id))
        .map(str::to_string)
        .collect();
    let mut rng = rand::thread_rng();

    records
        .iter()
        .map(|record| {
            let id = match record.lookup(Field::Id) {
                Some(id) => id.to_string(),
                None => loop {
                    let candidate = random_id(&mut rng);
                    if taken.insert(candidate.clone()) {
                        break candidate;
                    }
                },
            };

            let evidence = record
                .lookup(Field::Evidence)
                .map(|e| vec![e.to_string()])
                .unwrap_or_default();

            VerificationItem::new(
                id,
                record.lookup(Field::Book).unwrap_or(DEFAULT_BOOK),
                record.lookup(Field::Character).unwrap_or(DEFAULT_CHARACTER),
                record.lookup(Field::Claim).unwrap_or_default(),
                evidence,
            )
        })
        .collect()
}

/// Parse a test CSV upload into verification items.
pub fn parse_test_items(text: &str) -> Result<Vec<VerificationItem>, ImportError> {
    let records = parse_csv(text)?;
    let items = items_from_records(&records);
    tracing::info!(count = items.len(), "Parsed verification items from upload");
    Ok(items)
}

// ═══════════════════════════════════════════
// Training labels
// ═══════════════════════════════════════════

pub fn labels_from_records(records: &[CsvRecord]) -> Vec<TrainLabel> {
    records
        .iter()
        .enumerate()
        .map(|(idx, record)| TrainLabel {
            id: record
                .lookup(Field::Id)
                .map(str::to_string)
                .unwrap_or_else(|| format!("train-{idx}")),
            label: LabelValue::parse(record.lookup(Field::Label).unwrap_or(DEFAULT_LABEL)),
        })
        .collect()
}

/// Parse a training CSV upload into labels.
pub fn parse_train_labels(text: &str) -> Result<Vec<TrainLabel>, ImportError> {
    let records = parse_csv(text)?;
    let labels = labels_from_records(&records);
    tracing::info!(count = labels.len(), "Parsed training labels from upload");
    Ok(labels)
}

// ═══════════════════════════════════════════
// Novel catalog
// ═══════════════════════════════════════════

/// Metadata of an uploaded book file.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedBook {
    pub file_name: String,
    pub size_bytes: u64,
}

fn strip_extension(file_name: &str) -> String {
    static EXTENSION_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\.[^/.]+$").expect("valid regex"));
    EXTENSION_RE.replace(file_name, "").to_string()
}

/// Catalog uploaded books as pending novels. `batch_millis` tags the ids of
/// one upload batch.
pub fn catalog_books(books: &[UploadedBook], batch_millis: i64) -> Vec<Novel> {
    books
        .iter()
        .enumerate()
        .map(|(idx, book)| Novel {
            id: format!("book-{batch_millis}-{idx}"),
            title: strip_extension(&book.file_name),
            author: DEFAULT_AUTHOR.to_string(),
            chunk_count: book.size_bytes.div_ceil(BYTES_PER_CHUNK) as u32,
            status: NovelStatus::Pending,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_csv() {
        let records = parse_csv("id,char,content\nt1,Gatsby,He was rich\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("id"), Some("t1"));
        assert_eq!(records[0].get("char"), Some("Gatsby"));
        assert_eq!(records[0].get("content"), Some("He was rich"));
    }

    #[test]
    fn quoted_fields_keep_commas_quotes_and_newlines() {
        let text = "id,content\r\nt1,\"He said \"\"no\"\", then left\"\r\nt2,\"line one\nline two\"\r\n";
        let records = parse_csv(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("content"), Some("He said \"no\", then left"));
        assert_eq!(records[1].get("content"), Some("line one\nline two"));
    }

    #[test]
    fn blank_lines_and_short_rows() {
        let records = parse_csv("id,claim,context\n\n t1 ,Only a claim\n\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("id"), Some("t1"));
        assert_eq!(records[0].get("context"), Some(""));
    }

    #[test]
    fn empty_text_has_no_records() {
        assert!(parse_csv("").unwrap().is_empty());
        assert!(parse_csv("id,claim\n").unwrap().is_empty());
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        let err = parse_csv("id,claim\nt1,\"never closed\n").unwrap_err();
        assert_eq!(err, ImportError::UnterminatedQuote { line: 2 });
    }

    #[test]
    fn field_synonyms_follow_priority() {
        let records =
            parse_csv("id,character,char,claim,content,caption,context\nt1,Long,Short,C1,C2,Cap,Ctx\n")
                .unwrap();
        let items = items_from_records(&records);
        assert_eq!(items[0].character, "Short");
        assert_eq!(items[0].claim, "C2");
        assert_eq!(items[0].evidence, vec!["Ctx".to_string()]);
    }

    #[test]
    fn fallback_columns_are_used_when_preferred_missing() {
        let items = parse_test_items("id,character,claim,caption\nt1,Daisy,She waited,A caption\n")
            .unwrap();
        assert_eq!(items[0].character, "Daisy");
        assert_eq!(items[0].claim, "She waited");
        assert_eq!(items[0].evidence, vec!["A caption".to_string()]);
    }

    #[test]
    fn empty_preferred_column_falls_through() {
        let items = parse_test_items("id,content,claim\nt1,,Fallback claim\n").unwrap();
        assert_eq!(items[0].claim, "Fallback claim");
    }

    #[test]
    fn defaults_apply_when_fields_absent() {
        let items = parse_test_items("id,note\nt1,hello\n").unwrap();
        assert_eq!(items[0].book_name, "Unknown Book");
        assert_eq!(items[0].character, "Unknown");
        assert_eq!(items[0].claim, "");
        assert!(items[0].evidence.is_empty());
        assert!(items[0].result.is_none());
    }

    #[test]
    fn missing_ids_are_synthesized_uniquely() {
        let text = "content\na\nb\nc\nd\n";
        let items = parse_test_items(text).unwrap();
        let ids: HashSet<_> = items.iter().map(|i| i.id.clone()).collect();
        assert_eq!(ids.len(), 4);
        for id in &ids {
            assert!(id.starts_with("t-"));
            assert_eq!(id.len(), 2 + GENERATED_ID_LEN);
        }
    }

    #[test]
    fn train_labels_default_id_and_label() {
        let labels = parse_train_labels("label,note\n1,x\n,y\nmaybe,z\n").unwrap();
        assert_eq!(labels[0].id, "train-0");
        assert_eq!(labels[0].label, LabelValue::Known(crate::pipeline::types::Prediction::Consistent));
        assert_eq!(labels[1].label, LabelValue::Known(crate::pipeline::types::Prediction::Contradicted));
        assert_eq!(labels[2].label, LabelValue::Raw("maybe".into()));
    }

    #[test]
    fn train_labels_accept_contradiction_column() {
        let labels = parse_train_labels("id,contradiction\nt9,1\n").unwrap();
        assert_eq!(labels[0].id, "t9");
        assert_eq!(labels[0].label.prediction(), Some(crate::pipeline::types::Prediction::Consistent));
    }

    #[test]
    fn books_are_cataloged_with_chunk_estimate() {
        let books = vec![
            UploadedBook {
                file_name: "The Count of Monte Cristo.txt".into(),
                size_bytes: 4001,
            },
            UploadedBook {
                file_name: "notes".into(),
                size_bytes: 0,
            },
        ];
        let novels = catalog_books(&books, 1700000000000);
        assert_eq!(novels[0].id, "book-1700000000000-0");
        assert_eq!(novels[0].title, "The Count of Monte Cristo");
        assert_eq!(novels[0].chunk_count, 3);
        assert_eq!(novels[0].status, NovelStatus::Pending);
        assert_eq!(novels[1].title, "notes");
        assert_eq!(novels[1].chunk_count, 0);
    }
}
