//! Question bank loading from the CSV files of the data directory.
//!
//! The directory holds `4-1.csv` (common questions) and one
//! `4-2_<year>.csv` per exam year (specialist questions). Files may be
//! UTF-8, with or without a byte order mark, or Shift_JIS as exported by
//! Japanese spreadsheet tools.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use encoding_rs::SHIFT_JIS;

use rccm_core::model::{
    AnswerError, Choice, Department, ExamYear, Question, QuestionError, QuestionId,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::bank::QuestionBank;

pub const BASIC_FILE_NAME: &str = "4-1.csv";

pub const REQUIRED_COLUMNS: [&str; 8] = [
    "id",
    "category",
    "question",
    "option_a",
    "option_b",
    "option_c",
    "option_d",
    "correct_answer",
];

/// Invalid rows logged per file before the rest are only counted.
const LOGGED_ROW_ERRORS: usize = 5;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CsvLoadError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("{0} is neither UTF-8 nor Shift_JIS")]
    Encoding(PathBuf),

    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<&'static str>),

    #[error("no loadable questions under {0}")]
    NoQuestions(PathBuf),
}

/// Reason a single row was skipped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RowError {
    #[error("unreadable row: {0}")]
    Malformed(String),

    #[error("invalid id {0:?}")]
    InvalidId(String),

    #[error("unknown category {0:?}")]
    UnknownCategory(String),

    #[error("common category {0:?} in a specialist file")]
    BasicInSpecialistFile(String),

    #[error("duplicate id {0}")]
    Duplicate(QuestionId),

    #[error(transparent)]
    Answer(#[from] AnswerError),

    #[error(transparent)]
    Question(#[from] QuestionError),
}

//
// ─── ENCODING ──────────────────────────────────────────────────────────────────
//

/// Text encoding a question file was read with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    ShiftJis,
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::ShiftJis => "Shift_JIS",
        })
    }
}

/// Decode raw file bytes, trying UTF-8 first and Shift_JIS second.
///
/// A UTF-8 byte order mark is dropped. Shift_JIS here is the Windows
/// code page 932 superset. Returns `None` if neither decodes cleanly.
#[must_use]
pub fn decode_text(bytes: &[u8]) -> Option<(Cow<'_, str>, TextEncoding)> {
    let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    if let Ok(text) = std::str::from_utf8(body) {
        return Some((Cow::Borrowed(text), TextEncoding::Utf8));
    }
    SHIFT_JIS
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| (text, TextEncoding::ShiftJis))
}

//
// ─── SOURCES ───────────────────────────────────────────────────────────────────
//

/// Which question file is being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFile {
    Basic,
    Specialist(ExamYear),
}

impl SourceFile {
    #[must_use]
    pub fn file_name(self) -> String {
        match self {
            SourceFile::Basic => BASIC_FILE_NAME.to_string(),
            SourceFile::Specialist(year) => format!("4-2_{year}.csv"),
        }
    }

    /// The common file followed by every supported year.
    pub fn all() -> impl Iterator<Item = SourceFile> {
        std::iter::once(SourceFile::Basic).chain(ExamYear::supported().map(SourceFile::Specialist))
    }
}

//
// ─── REPORTS ───────────────────────────────────────────────────────────────────
//

/// Questions read from one file.
#[derive(Debug, Default)]
pub struct ParsedFile {
    pub questions: Vec<Question>,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub loaded: usize,
    pub skipped: usize,
}

/// Outcome of loading a whole data directory.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub files: Vec<FileReport>,
    pub missing: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl LoadReport {
    #[must_use]
    pub fn loaded(&self) -> usize {
        self.files.iter().map(|f| f.loaded).sum()
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.files.iter().map(|f| f.skipped).sum()
    }
}

//
// ─── ROWS ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    id: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    question: String,
    #[serde(default)]
    option_a: String,
    #[serde(default)]
    option_b: String,
    #[serde(default)]
    option_c: String,
    #[serde(default)]
    option_d: String,
    #[serde(default)]
    correct_answer: String,
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    reference: String,
    #[serde(default)]
    difficulty: String,
    #[serde(default)]
    keywords: String,
}

impl CsvRow {
    fn into_question(self, source: SourceFile) -> Result<Question, RowError> {
        let number = parse_row_number(&self.id)?;
        let id = match source {
            SourceFile::Basic => QuestionId::basic(number),
            SourceFile::Specialist(year) => {
                let department = Department::from_category(&self.category)
                    .ok_or_else(|| RowError::UnknownCategory(self.category.clone()))?;
                if department.is_basic() {
                    return Err(RowError::BasicInSpecialistFile(self.category));
                }
                QuestionId::specialist(department, year, number)
            }
        };

        let correct = Choice::normalize(&self.correct_answer)?;
        let options = [self.option_a, self.option_b, self.option_c, self.option_d];

        Ok(Question::new(id, self.question, options, correct)?
            .with_explanation(self.explanation)
            .with_reference(self.reference)
            .with_difficulty(self.difficulty)
            .with_keywords(self.keywords))
    }
}

/// Row ids are integers, but spreadsheet exports sometimes write `12.0`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_row_number(raw: &str) -> Result<u32, RowError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<u32>()
        .ok()
        .or_else(|| {
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.fract() == 0.0 && *v >= 0.0 && *v <= f64::from(u32::MAX))
                .map(|v| v as u32)
        })
        .ok_or_else(|| RowError::InvalidId(trimmed.to_string()))
}

//
// ─── PARSING ───────────────────────────────────────────────────────────────────
//

/// Parse one question file.
///
/// Invalid rows are skipped and counted; the first few are logged.
///
/// # Errors
///
/// Returns `CsvLoadError::MissingColumns` if the header lacks a required
/// column, or `CsvLoadError::Csv` if the header cannot be read.
pub fn parse_questions<R: Read>(reader: R, source: SourceFile) -> Result<ParsedFile, CsvLoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: csv::StringRecord = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let missing: Vec<&'static str> = REQUIRED_COLUMNS
        .into_iter()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        return Err(CsvLoadError::MissingColumns(missing));
    }
    rdr.set_headers(headers);

    let mut parsed = ParsedFile::default();
    let mut seen = HashSet::new();
    for (index, row) in rdr.deserialize::<CsvRow>().enumerate() {
        let outcome = row
            .map_err(|e| RowError::Malformed(e.to_string()))
            .and_then(|row| row.into_question(source))
            .and_then(|question| {
                if seen.insert(question.id()) {
                    Ok(question)
                } else {
                    Err(RowError::Duplicate(question.id()))
                }
            });

        match outcome {
            Ok(question) => parsed.questions.push(question),
            Err(err) => {
                if parsed.skipped < LOGGED_ROW_ERRORS {
                    // header is line 1
                    warn!(file = %source.file_name(), line = index + 2, %err, "skipping row");
                }
                parsed.skipped += 1;
            }
        }
    }

    Ok(parsed)
}

/// Read, decode and parse one question file.
///
/// # Errors
///
/// Returns `CsvLoadError::Io` if the file cannot be read,
/// `CsvLoadError::Encoding` if it is neither UTF-8 nor Shift_JIS, otherwise
/// the errors of [`parse_questions`].
pub fn load_file(path: &Path, source: SourceFile) -> Result<ParsedFile, CsvLoadError> {
    let bytes = std::fs::read(path).map_err(|source| CsvLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let (text, encoding) =
        decode_text(&bytes).ok_or_else(|| CsvLoadError::Encoding(path.to_path_buf()))?;
    debug!(path = %path.display(), %encoding, "decoded question file");
    parse_questions(text.as_bytes(), source)
}

/// Load every question file found under `dir`.
///
/// Missing or unreadable files are logged and reported but do not abort
/// the load.
///
/// # Errors
///
/// Returns `CsvLoadError::NoQuestions` if not a single question was loaded.
pub fn load_question_bank(dir: &Path) -> Result<(QuestionBank, LoadReport), CsvLoadError> {
    let mut bank = QuestionBank::new();
    let mut report = LoadReport::default();

    for source in SourceFile::all() {
        let path = dir.join(source.file_name());
        if !path.is_file() {
            warn!(path = %path.display(), "question file not found");
            report.missing.push(path);
            continue;
        }

        match load_file(&path, source) {
            Ok(parsed) => {
                let mut file_report = FileReport {
                    path: path.clone(),
                    loaded: 0,
                    skipped: parsed.skipped,
                };
                for question in parsed.questions {
                    match bank.insert(question) {
                        Ok(()) => file_report.loaded += 1,
                        Err(_) => file_report.skipped += 1,
                    }
                }
                info!(
                    path = %path.display(),
                    loaded = file_report.loaded,
                    skipped = file_report.skipped,
                    "loaded question file"
                );
                report.files.push(file_report);
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "question file rejected");
                report.failed.push((path, err.to_string()));
            }
        }
    }

    if bank.is_empty() {
        return Err(CsvLoadError::NoQuestions(dir.to_path_buf()));
    }

    info!(
        total = bank.len(),
        files = report.files.len(),
        missing = report.missing.len(),
        "question bank ready"
    );
    Ok((bank, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "id,category,question,option_a,option_b,option_c,option_d,correct_answer,explanation\n";

    fn parse(body: &str, source: SourceFile) -> ParsedFile {
        let csv = format!("{HEADER}{body}");
        parse_questions(csv.as_bytes(), source).unwrap()
    }

    fn y2015() -> ExamYear {
        ExamYear::new(2015).unwrap()
    }

    #[test]
    fn basic_rows_ignore_category() {
        let parsed = parse(
            "1,共通,Q1,a,b,c,d,A,why\n2.0,whatever,Q2,a,b,c,d,ｃ,\n",
            SourceFile::Basic,
        );
        assert_eq!(parsed.skipped, 0);
        assert_eq!(parsed.questions.len(), 2);
        assert_eq!(parsed.questions[0].id(), QuestionId::basic(1));
        assert_eq!(parsed.questions[0].explanation(), "why");
        assert_eq!(parsed.questions[1].id(), QuestionId::basic(2));
        assert_eq!(parsed.questions[1].correct(), Choice::C);
    }

    #[test]
    fn specialist_rows_take_the_file_year() {
        let parsed = parse(
            "1,道路,Q1,a,b,c,d,B,\n1,河川・砂防及び海岸・海洋,Q2,a,b,c,d,4,\n",
            SourceFile::Specialist(y2015()),
        );
        assert_eq!(parsed.skipped, 0);
        assert_eq!(
            parsed.questions[0].id(),
            QuestionId::specialist(Department::Road, y2015(), 1)
        );
        assert_eq!(
            parsed.questions[1].id(),
            QuestionId::specialist(Department::RiverSabo, y2015(), 1)
        );
        assert_eq!(parsed.questions[1].correct(), Choice::D);
    }

    #[test]
    fn invalid_rows_are_skipped() {
        let parsed = parse(
            concat!(
                "x,道路,Q,a,b,c,d,A,\n",
                "2,電気電子,Q,a,b,c,d,A,\n",
                "3,共通,Q,a,b,c,d,A,\n",
                "4,道路,,a,b,c,d,A,\n",
                "5,道路,Q,a,,c,d,A,\n",
                "6,道路,Q,a,b,c,d,E,\n",
                "7,道路,Q,a,b,c,d,A,\n",
                "7,道路,Q again,a,b,c,d,A,\n",
            ),
            SourceFile::Specialist(y2015()),
        );
        assert_eq!(parsed.questions.len(), 1);
        assert_eq!(parsed.skipped, 7);
    }

    #[test]
    fn bom_and_optional_columns_are_handled() {
        let csv = "\u{feff}id,category,question,option_a,option_b,option_c,option_d,correct_answer,difficulty,keywords\n\
                   1,共通,Q,a,b,c,d,a,難,橋梁\n";
        let parsed = parse_questions(csv.as_bytes(), SourceFile::Basic).unwrap();
        assert_eq!(parsed.questions.len(), 1);
        assert_eq!(parsed.questions[0].difficulty(), "難");
        assert_eq!(parsed.questions[0].keywords(), "橋梁");
        assert_eq!(parsed.questions[0].reference(), "");
    }

    #[test]
    fn missing_required_columns_reject_the_file() {
        let csv = "id,category,question,option_a,option_b,option_c\n1,共通,Q,a,b,c\n";
        let err = parse_questions(csv.as_bytes(), SourceFile::Basic).unwrap_err();
        match err {
            CsvLoadError::MissingColumns(missing) => {
                assert_eq!(missing, vec!["option_d", "correct_answer"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn text_decodes_as_utf8_or_shift_jis() {
        let csv = format!("{HEADER}1,共通,道路の設計,ア,イ,ウ,エ,B,解説\n");

        let (text, encoding) = decode_text(csv.as_bytes()).unwrap();
        assert_eq!(encoding, TextEncoding::Utf8);
        assert_eq!(text, csv);

        let with_bom = [b"\xEF\xBB\xBF".as_slice(), csv.as_bytes()].concat();
        let (text, encoding) = decode_text(&with_bom).unwrap();
        assert_eq!(encoding, TextEncoding::Utf8);
        assert!(text.starts_with("id,"));

        let (sjis, _, unmappable) = SHIFT_JIS.encode(&csv);
        assert!(!unmappable);
        assert!(std::str::from_utf8(&sjis).is_err());
        let (text, encoding) = decode_text(&sjis).unwrap();
        assert_eq!(encoding, TextEncoding::ShiftJis);
        let parsed = parse_questions(text.as_bytes(), SourceFile::Basic).unwrap();
        assert_eq!(parsed.questions[0].text(), "道路の設計");
        assert_eq!(parsed.questions[0].option(Choice::A), "ア");
    }

    #[test]
    fn undecodable_bytes_are_rejected() {
        // 0xFF is neither a UTF-8 nor a Shift_JIS byte
        assert!(decode_text(b"id,category\xFF\n").is_none());
    }

    #[test]
    fn row_numbers_accept_float_spelling() {
        assert_eq!(parse_row_number("12"), Ok(12));
        assert_eq!(parse_row_number(" 12.0 "), Ok(12));
        assert!(parse_row_number("12.5").is_err());
        assert!(parse_row_number("-1").is_err());
        assert!(parse_row_number("").is_err());
    }

    #[test]
    fn source_files_cover_every_year() {
        let names: Vec<String> = SourceFile::all().map(SourceFile::file_name).collect();
        assert_eq!(names.first().map(String::as_str), Some("4-1.csv"));
        assert_eq!(names.last().map(String::as_str), Some("4-2_2019.csv"));
        assert_eq!(names.len(), 13);
    }
}
