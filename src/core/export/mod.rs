//! Caption Export
//!
//! Serializes caption tracks into SRT, VTT, TXT, and CSV text with strict
//! field-escaping and CRLF line endings, plus a multilingual CSV join
//! across tracks. Formatting produces plain strings; persistence prefixes
//! a UTF-8 byte-order mark for compatibility with third-party subtitle
//! consumers.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{
    captions::{Caption, Track},
    timecode::{format_frame_timestamp, format_srt_timestamp, format_vtt_timestamp},
    CoreError, CoreResult, TrackId,
};

/// Byte-order mark prefixed to persisted export files
pub const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

// =============================================================================
// Export Format
// =============================================================================

/// Target subtitle file format
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Srt,
    Vtt,
    Csv,
    Txt,
}

impl ExportFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Vtt => "vtt",
            Self::Csv => "csv",
            Self::Txt => "txt",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "srt" => Ok(Self::Srt),
            "vtt" => Ok(Self::Vtt),
            "csv" => Ok(Self::Csv),
            "txt" => Ok(Self::Txt),
            other => Err(CoreError::ExportError(format!(
                "Unknown export format: {}",
                other
            ))),
        }
    }
}

// =============================================================================
// Export Selection
// =============================================================================

/// Which tracks an export covers
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExportSelection {
    /// One output file per listed track
    Tracks(Vec<TrackId>),
    /// A single CSV joining a primary track with secondary-language columns
    #[serde(rename_all = "camelCase")]
    Bilingual {
        primary_track: TrackId,
        secondary_tracks: Vec<TrackId>,
    },
}

// =============================================================================
// Export File
// =============================================================================

/// A produced export: suggested filename plus file content.
///
/// The caller owns the actual save/download mechanism; [`ExportFile::write_to`]
/// is provided for direct filesystem persistence.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportFile {
    pub filename: String,
    pub content: String,
}

impl ExportFile {
    /// Content bytes with the UTF-8 byte-order mark prefixed
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(UTF8_BOM.len() + self.content.len());
        bytes.extend_from_slice(UTF8_BOM);
        bytes.extend_from_slice(self.content.as_bytes());
        bytes
    }

    /// Writes the BOM-prefixed content into `dir` under the suggested filename
    pub fn write_to(&self, dir: &Path) -> CoreResult<std::path::PathBuf> {
        let path = dir.join(&self.filename);
        std::fs::write(&path, self.to_bytes())?;
        debug!(path = %path.display(), bytes = self.content.len(), "Wrote export file");
        Ok(path)
    }
}

// =============================================================================
// Format Serializers
// =============================================================================

/// Serializes captions as SRT blocks with CRLF line endings
pub fn export_to_srt(captions: &[&Caption]) -> String {
    let mut out = String::new();
    for (i, caption) in captions.iter().enumerate() {
        out.push_str(&format!(
            "{}\r\n{} --> {}\r\n{}\r\n\r\n",
            i + 1,
            format_srt_timestamp(caption.start),
            format_srt_timestamp(caption.end),
            caption.text.replace('\n', "\r\n"),
        ));
    }
    out
}

/// Serializes captions as WebVTT, keeping a numeric index line before each
/// cue (optional in the standard, retained for compatibility)
pub fn export_to_vtt(captions: &[&Caption]) -> String {
    let mut out = String::from("WEBVTT\r\n\r\n");
    for (i, caption) in captions.iter().enumerate() {
        out.push_str(&format!(
            "{}\r\n{} --> {}\r\n{}\r\n\r\n",
            i + 1,
            format_vtt_timestamp(caption.start),
            format_vtt_timestamp(caption.end),
            caption.text.replace('\n', "\r\n"),
        ));
    }
    out
}

/// Serializes caption texts only, blank-line-separated blocks, no timestamps
pub fn export_to_txt(captions: &[&Caption]) -> String {
    let mut out = String::new();
    for caption in captions {
        out.push_str(&caption.text.replace('\n', "\r\n"));
        out.push_str("\r\n\r\n");
    }
    out
}

/// Serializes captions as CSV with frame-coded timestamps
pub fn export_to_csv(captions: &[&Caption]) -> String {
    let mut out = String::from("Number,Start Time,End Time,Text\r\n");
    for (i, caption) in captions.iter().enumerate() {
        out.push_str(&format!(
            "{},{},{},{}\r\n",
            i + 1,
            format_frame_timestamp(caption.start),
            format_frame_timestamp(caption.end),
            escape_csv_field(&caption.text),
        ));
    }
    out
}

/// Serializes a multilingual CSV anchored to the primary track's captions.
///
/// Each secondary track contributes one column; a row's column value is the
/// text of the first secondary caption (in start order) whose interval
/// overlaps the primary caption's, or empty when none does.
pub fn export_to_bilingual_csv(primary: &Track, secondary: &[&Track]) -> String {
    let mut out = String::from("Number,Start Time,End Time");
    out.push_str(&format!(",{} text", primary.language));
    for track in secondary {
        out.push_str(&format!(",{} text", track.language));
    }
    out.push_str("\r\n");

    let secondary_sorted: Vec<Vec<&Caption>> =
        secondary.iter().map(|t| t.sorted_captions()).collect();

    for (i, caption) in primary.sorted_captions().iter().enumerate() {
        out.push_str(&format!(
            "{},{},{},{}",
            i + 1,
            format_frame_timestamp(caption.start),
            format_frame_timestamp(caption.end),
            escape_csv_field(&caption.text),
        ));
        for candidates in &secondary_sorted {
            let matched = candidates
                .iter()
                .find(|c| c.overlaps(caption))
                .map(|c| c.text.as_str())
                .unwrap_or("");
            out.push(',');
            out.push_str(&escape_csv_field(matched));
        }
        out.push_str("\r\n");
    }
    out
}

/// Wraps a field in double quotes (doubling embedded quotes) when it
/// contains a comma, quote, or any newline character
fn escape_csv_field(field: &str) -> String {
    if field.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

// =============================================================================
// Export Entry Point
// =============================================================================

/// Produces export files for the given selection.
///
/// Per-track selection yields one file per listed track; the bilingual
/// selection yields a single CSV and rejects any other format. A selection
/// that resolves to zero captions is an error.
pub fn export_captions(
    tracks: &[Track],
    format: ExportFormat,
    selection: &ExportSelection,
) -> CoreResult<Vec<ExportFile>> {
    match selection {
        ExportSelection::Tracks(ids) => {
            if ids.is_empty() {
                return Err(CoreError::ExportError(
                    "No tracks selected for export".to_string(),
                ));
            }
            let mut files = Vec::with_capacity(ids.len());
            for id in ids {
                let track = tracks
                    .iter()
                    .find(|t| t.id == *id)
                    .ok_or(CoreError::TrackNotFound(*id))?;
                if track.is_empty() {
                    return Err(CoreError::ExportError(format!(
                        "Track '{}' has no captions to export",
                        track.name
                    )));
                }
                let sorted = track.sorted_captions();
                let content = match format {
                    ExportFormat::Srt => export_to_srt(&sorted),
                    ExportFormat::Vtt => export_to_vtt(&sorted),
                    ExportFormat::Csv => export_to_csv(&sorted),
                    ExportFormat::Txt => export_to_txt(&sorted),
                };
                files.push(ExportFile {
                    filename: format!(
                        "{}_captions.{}",
                        sanitize_filename(&track.name),
                        format.extension()
                    ),
                    content,
                });
            }
            Ok(files)
        }
        ExportSelection::Bilingual {
            primary_track,
            secondary_tracks,
        } => {
            if format != ExportFormat::Csv {
                return Err(CoreError::ExportError(
                    "Multilingual export is only available as CSV".to_string(),
                ));
            }
            if secondary_tracks.is_empty() {
                return Err(CoreError::ExportError(
                    "Multilingual export requires at least one secondary track".to_string(),
                ));
            }
            let primary = tracks
                .iter()
                .find(|t| t.id == *primary_track)
                .ok_or(CoreError::TrackNotFound(*primary_track))?;
            if primary.is_empty() {
                return Err(CoreError::ExportError(format!(
                    "Track '{}' has no captions to export",
                    primary.name
                )));
            }
            let secondary: Vec<&Track> = secondary_tracks
                .iter()
                .map(|id| {
                    tracks
                        .iter()
                        .find(|t| t.id == *id)
                        .ok_or(CoreError::TrackNotFound(*id))
                })
                .collect::<CoreResult<_>>()?;

            let mut languages = vec![primary.language.clone()];
            languages.extend(secondary.iter().map(|t| t.language.clone()));
            Ok(vec![ExportFile {
                filename: format!("multilingual_captions_{}.csv", languages.join("_")),
                content: export_to_bilingual_csv(primary, &secondary),
            }])
        }
    }
}

fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    sanitized.to_lowercase()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn track_with(name: &str, language: &str, captions: &[(f64, f64, &str)]) -> Track {
        let mut track = Track::new(1, name, language);
        for (start, end, text) in captions {
            track.add_caption(Caption::create(1, *start, *end, text));
        }
        track
    }

    // -------------------------------------------------------------------------
    // SRT / VTT Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_srt_block_shape() {
        let track = track_with("en", "en", &[(1.0, 3.0, "Hello world")]);
        let srt = export_to_srt(&track.sorted_captions());
        assert_eq!(srt, "1\r\n00:00:01,000 --> 00:00:03,000\r\nHello world\r\n\r\n");
    }

    #[test]
    fn test_srt_renumbers_and_sorts() {
        let track = track_with("en", "en", &[(5.0, 6.0, "Second"), (1.0, 2.0, "First")]);
        let srt = export_to_srt(&track.sorted_captions());
        assert!(srt.starts_with("1\r\n00:00:01,000"));
        assert!(srt.contains("2\r\n00:00:05,000"));
        assert!(srt.find("First").unwrap() < srt.find("Second").unwrap());
    }

    #[test]
    fn test_srt_converts_embedded_newlines_to_crlf() {
        let track = track_with("en", "en", &[(0.0, 2.0, "line one\nline two")]);
        let srt = export_to_srt(&track.sorted_captions());
        assert!(srt.contains("line one\r\nline two"));
    }

    #[test]
    fn test_vtt_has_header_and_dot_timestamps() {
        let track = track_with("en", "en", &[(1.5, 3.0, "Hello")]);
        let vtt = export_to_vtt(&track.sorted_captions());
        assert!(vtt.starts_with("WEBVTT\r\n\r\n"));
        assert!(vtt.contains("1\r\n00:00:01.500 --> 00:00:03.000\r\nHello\r\n\r\n"));
    }

    // -------------------------------------------------------------------------
    // TXT / CSV Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_txt_is_text_only() {
        let track = track_with("en", "en", &[(0.0, 2.0, "one\ntwo"), (3.0, 4.0, "three")]);
        let txt = export_to_txt(&track.sorted_captions());
        assert_eq!(txt, "one\r\ntwo\r\n\r\nthree\r\n\r\n");
    }

    #[test]
    fn test_csv_uses_frame_timestamps() {
        let track = track_with("en", "en", &[(1.5, 3.25, "Hello")]);
        let csv = export_to_csv(&track.sorted_captions());
        assert!(csv.starts_with("Number,Start Time,End Time,Text\r\n"));
        // 1.5s = frame 15, 3.25s = frame 7 at 30fps
        assert!(csv.contains("1,00:00:01:15,00:00:03:07,Hello\r\n"));
    }

    #[test]
    fn test_csv_field_escaping() {
        assert_eq!(escape_csv_field("plain"), "plain");
        assert_eq!(escape_csv_field("a,b"), "\"a,b\"");
        assert_eq!(escape_csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_csv_escapes_caption_text() {
        let track = track_with("en", "en", &[(0.0, 1.0, "Hello, world")]);
        let csv = export_to_csv(&track.sorted_captions());
        assert!(csv.contains("\"Hello, world\""));
    }

    // -------------------------------------------------------------------------
    // Bilingual CSV Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_bilingual_csv_joins_overlapping_captions() {
        let primary = track_with("English", "en", &[(0.0, 2.0, "Hello"), (5.0, 7.0, "Bye")]);
        let secondary = track_with("Korean", "ko", &[(0.5, 1.5, "안녕"), (5.0, 6.0, "잘가")]);

        let csv = export_to_bilingual_csv(&primary, &[&secondary]);
        assert!(csv.starts_with("Number,Start Time,End Time,en text,ko text\r\n"));
        assert!(csv.contains("1,00:00:00:00,00:00:02:00,Hello,안녕\r\n"));
        assert!(csv.contains("2,00:00:05:00,00:00:07:00,Bye,잘가\r\n"));
    }

    #[test]
    fn test_bilingual_csv_empty_field_when_no_overlap() {
        let primary = track_with("English", "en", &[(0.0, 1.0, "Hello")]);
        let secondary = track_with("Korean", "ko", &[(5.0, 6.0, "잘가")]);

        let csv = export_to_bilingual_csv(&primary, &[&secondary]);
        assert!(csv.contains("1,00:00:00:00,00:00:01:00,Hello,\r\n"));
    }

    #[test]
    fn test_bilingual_csv_picks_first_overlap_by_start() {
        let primary = track_with("English", "en", &[(0.0, 10.0, "Long")]);
        let secondary = track_with("Korean", "ko", &[(4.0, 5.0, "later"), (1.0, 2.0, "earlier")]);

        let csv = export_to_bilingual_csv(&primary, &[&secondary]);
        assert!(csv.contains(",Long,earlier\r\n"));
    }

    // -------------------------------------------------------------------------
    // Round-trip Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_srt_output_parses_back_losslessly() {
        use crate::core::captions::parse_subtitle_file;

        let track = track_with(
            "en",
            "en",
            &[
                (1.0, 3.0, "Hello world"),
                (5.5, 8.25, "two lines\nof text"),
                (10.0, 12.345, "third"),
            ],
        );
        let srt = export_to_srt(&track.sorted_captions());
        let parsed = parse_subtitle_file(&srt).unwrap();

        let originals = track.sorted_captions();
        assert_eq!(parsed.len(), originals.len());
        for (roundtripped, original) in parsed.iter().zip(&originals) {
            assert!((roundtripped.start - original.start).abs() <= 0.001);
            assert!((roundtripped.end - original.end).abs() <= 0.001);
            // CRLF in the file collapses back to the embedded line break
            assert_eq!(roundtripped.text, original.text);
        }
    }

    /// Minimal RFC4180 record reader: unquotes fields and collapses doubled
    /// quotes, stopping at the first record terminator outside quotes
    fn parse_csv_record(record: &str) -> Vec<String> {
        let mut fields = vec![];
        let mut field = String::new();
        let mut in_quotes = false;
        let mut chars = record.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '"' if in_quotes => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                '"' => in_quotes = true,
                ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
                '\r' if !in_quotes && chars.peek() == Some(&'\n') => break,
                c => field.push(c),
            }
        }
        fields.push(field);
        fields
    }

    #[test]
    fn test_csv_row_with_all_special_characters_parses_back() {
        // Comma, quote, and newline in one field
        let text = "He said, \"wait\"\nthen left";
        let track = track_with("en", "en", &[(0.0, 1.0, text)]);
        let csv = export_to_csv(&track.sorted_captions());

        let record = csv.split_once("\r\n").unwrap().1;
        let fields = parse_csv_record(record);

        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0], "1");
        assert_eq!(fields[1], "00:00:00:00");
        assert_eq!(fields[2], "00:00:01:00");
        assert_eq!(fields[3], text);
    }

    // -------------------------------------------------------------------------
    // Entry Point Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_export_produces_one_file_per_track() {
        let mut a = track_with("English Subs", "en", &[(0.0, 1.0, "hi")]);
        a.id = 1;
        let mut b = track_with("Korean Subs", "ko", &[(0.0, 1.0, "안녕")]);
        b.id = 2;
        for caption in &mut b.captions {
            caption.track = 2;
        }

        let files = export_captions(
            &[a, b],
            ExportFormat::Srt,
            &ExportSelection::Tracks(vec![1, 2]),
        )
        .unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].filename, "english_subs_captions.srt");
        assert_eq!(files[1].filename, "korean_subs_captions.srt");
    }

    #[test]
    fn test_export_empty_track_fails() {
        let track = Track::new(1, "Empty", "en");
        let result = export_captions(
            &[track],
            ExportFormat::Srt,
            &ExportSelection::Tracks(vec![1]),
        );
        assert!(matches!(result, Err(CoreError::ExportError(_))));
    }

    #[test]
    fn test_export_unknown_track_fails() {
        let result = export_captions(
            &[],
            ExportFormat::Srt,
            &ExportSelection::Tracks(vec![9]),
        );
        assert!(matches!(result, Err(CoreError::TrackNotFound(9))));
    }

    #[test]
    fn test_bilingual_export_rejects_empty_secondary_list() {
        let mut a = track_with("English", "en", &[(0.0, 1.0, "hi")]);
        a.id = 1;
        let result = export_captions(
            &[a],
            ExportFormat::Csv,
            &ExportSelection::Bilingual {
                primary_track: 1,
                secondary_tracks: vec![],
            },
        );
        assert!(matches!(result, Err(CoreError::ExportError(_))));
    }

    #[test]
    fn test_bilingual_export_rejects_non_csv() {
        let mut a = track_with("English", "en", &[(0.0, 1.0, "hi")]);
        a.id = 1;
        let mut b = track_with("Korean", "ko", &[(0.0, 1.0, "안녕")]);
        b.id = 2;

        let selection = ExportSelection::Bilingual {
            primary_track: 1,
            secondary_tracks: vec![2],
        };
        let result = export_captions(&[a.clone(), b.clone()], ExportFormat::Srt, &selection);
        assert!(matches!(result, Err(CoreError::ExportError(_))));

        let files = export_captions(&[a, b], ExportFormat::Csv, &selection).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].filename, "multilingual_captions_en_ko.csv");
    }

    #[test]
    fn test_export_file_bytes_are_bom_prefixed() {
        let file = ExportFile {
            filename: "x.srt".to_string(),
            content: "abc".to_string(),
        };
        assert_eq!(file.to_bytes(), vec![0xEF, 0xBB, 0xBF, b'a', b'b', b'c']);
    }

    #[test]
    fn test_export_file_write_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let file = ExportFile {
            filename: "subs.srt".to_string(),
            content: "1\r\n".to_string(),
        };
        let path = file.write_to(dir.path()).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("SRT".parse::<ExportFormat>().unwrap(), ExportFormat::Srt);
        assert_eq!("vtt".parse::<ExportFormat>().unwrap(), ExportFormat::Vtt);
        assert!("ass".parse::<ExportFormat>().is_err());
    }
}
