//! Aggregate the Newsela aligned-sentence file into per-level pair files.

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use super::sanitize_field;
use crate::detok;

/// Fixed name of the aligned-sentence file inside the newsela_data_share
/// directory.
const ALIGNED_SENTS_FILE: &str = "newsela_articles_20150302.aligned.sents.txt";

/// Columns of one aligned-sentence row that the exporter consumes. The first
/// column (document id) is parsed for the column count but not used.
struct AlignedLine<'a> {
    src_v: &'a str,
    tgt_v: &'a str,
    src_text: &'a str,
    tgt_text: &'a str,
}

/// Split one aligned line into its 5 tab-separated columns.
fn parse_aligned_line(line: &str) -> Result<AlignedLine<'_>> {
    let cols: Vec<&str> = line.split('\t').collect();
    if cols.len() != 5 {
        bail!("expected 5 tab-separated columns, found {}", cols.len());
    }
    Ok(AlignedLine {
        src_v: cols[1],
        tgt_v: cols[2],
        src_text: cols[3],
        tgt_text: cols[4],
    })
}

/// Copy the rows matching (`src_level`, `tgt_level`) from the aligned file
/// into `out` as `<source>\t<target>` lines. Returns the number of rows
/// written. A line with the wrong column count aborts with its 1-based line
/// number rather than being silently dropped.
fn export_level<R: BufRead, W: Write>(
    input: R,
    out: &mut W,
    src_level: &str,
    tgt_level: &str,
    detok: bool,
) -> Result<usize> {
    let mut written = 0usize;
    for (idx, line) in input.lines().enumerate() {
        let line = line.context("read aligned line")?;
        let parsed = parse_aligned_line(line.trim())
            .with_context(|| format!("aligned line {}", idx + 1))?;
        if parsed.src_v != src_level || parsed.tgt_v != tgt_level {
            continue;
        }
        let (src_text, tgt_text) = if detok {
            (
                detok::detokenize(parsed.src_text),
                detok::detokenize(parsed.tgt_text),
            )
        } else {
            (parsed.src_text.to_string(), parsed.tgt_text.to_string())
        };
        writeln!(
            out,
            "{}\t{}",
            sanitize_field(&src_text),
            sanitize_field(&tgt_text)
        )
        .context("write pair line")?;
        written += 1;
    }
    Ok(written)
}

/// Aggregate the Newsela aligned sentences by target level and save each
/// level to `newsela_<src>_<level>.tsv` (e.g. newsela_v0_V2.tsv).
///
/// A row is kept when its source version equals `src_level` and its target
/// version equals the level being written. The shared input file is
/// re-scanned once per level; a level with no matching rows still produces
/// its (empty) output file.
pub fn save_newsela_to_disk(
    newsela_path: &Path,
    out_dir: &Path,
    detok: bool,
    src_level: &str,
    tgt_levels: &[String],
) -> Result<()> {
    let aligned_sents = newsela_path.join(ALIGNED_SENTS_FILE);

    for tgt_level in tgt_levels {
        let input =
            File::open(&aligned_sents).with_context(|| format!("open {:?}", aligned_sents))?;
        let outfile = out_dir.join(format!(
            "newsela_{}_{}.tsv",
            src_level.to_lowercase(),
            tgt_level
        ));
        let mut out = BufWriter::new(
            File::create(&outfile).with_context(|| format!("create {:?}", outfile))?,
        );
        let written = export_level(BufReader::new(input), &mut out, src_level, tgt_level, detok)
            .with_context(|| format!("{:?}", aligned_sents))?;
        out.flush().context("flush output")?;
        println!(
            "NEWSELA {}-{} ({} items) saved to disk ({})",
            src_level,
            tgt_level,
            written,
            outfile.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_five_columns() {
        let parsed = parse_aligned_line("doc1\tV0\tV2\tThe cat sat.\tThe cat sat .").unwrap();
        assert_eq!(parsed.src_v, "V0");
        assert_eq!(parsed.tgt_v, "V2");
        assert_eq!(parsed.src_text, "The cat sat.");
        assert_eq!(parsed.tgt_text, "The cat sat .");
    }

    #[test]
    fn wrong_column_count_is_fatal() {
        assert!(parse_aligned_line("doc1\tV0\tV2\tonly four").is_err());
        assert!(parse_aligned_line("doc1\tV0\tV2\ta\tb\textra").is_err());
        assert!(parse_aligned_line("").is_err());
    }

    #[test]
    fn keeps_only_the_requested_version_pair() {
        let input = "doc1\tV0\tV2\ta a\tb b\n\
                     doc1\tV1\tV2\tc c\td d\n\
                     doc2\tV0\tV3\te e\tf f\n\
                     doc2\tV0\tV2\tg g\th h\n";
        let mut out = Vec::new();
        let written = export_level(input.as_bytes(), &mut out, "V0", "V2", false).unwrap();
        assert_eq!(written, 2);
        assert_eq!(out, b"a a\tb b\ng g\th h\n");
    }

    #[test]
    fn src_level_is_configurable() {
        let input = "doc1\tV0\tV2\ta a\tb b\n\
                     doc1\tV1\tV2\tc c\td d\n";
        let mut out = Vec::new();
        let written = export_level(input.as_bytes(), &mut out, "V1", "V2", false).unwrap();
        assert_eq!(written, 1);
        assert_eq!(out, b"c c\td d\n");
    }

    #[test]
    fn no_matching_rows_writes_nothing() {
        let input = "doc1\tV0\tV1\ta a\tb b\n";
        let mut out = Vec::new();
        let written = export_level(input.as_bytes(), &mut out, "V0", "V4", true).unwrap();
        assert_eq!(written, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn detokenizes_both_sides_when_enabled() {
        let input = "doc1\tV0\tV2\tThe cat sat.\tThe cat sat .\n";
        let mut out = Vec::new();
        let written = export_level(input.as_bytes(), &mut out, "V0", "V2", true).unwrap();
        assert_eq!(written, 1);
        assert_eq!(out, b"The cat sat.\tThe cat sat.\n");
    }

    #[test]
    fn detok_off_keeps_tokenized_text() {
        let input = "doc1\tV0\tV2\tThe cat sat.\tThe cat sat .\n";
        let mut out = Vec::new();
        export_level(input.as_bytes(), &mut out, "V0", "V2", false).unwrap();
        assert_eq!(out, b"The cat sat.\tThe cat sat .\n");
    }

    #[test]
    fn malformed_line_error_names_the_line() {
        let input = "doc1\tV0\tV2\ta a\tb b\n\
                     doc1\tV0\tV2\tonly four\n";
        let mut out = Vec::new();
        let err = export_level(input.as_bytes(), &mut out, "V0", "V2", false).unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("aligned line 2"), "unexpected error: {}", msg);
        assert!(msg.contains("found 4"), "unexpected error: {}", msg);
    }

    #[test]
    fn files_on_disk_are_reproducible() {
        let dir = tempfile::tempdir().unwrap();
        let newsela = dir.path().join("newsela");
        std::fs::create_dir_all(&newsela).unwrap();
        std::fs::write(
            newsela.join(ALIGNED_SENTS_FILE),
            "doc1\tV0\tV2\tThe cat sat.\tThe cat sat .\n\
             doc1\tV0\tV1\tA big dog .\tA dog .\n",
        )
        .unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir_all(&out).unwrap();
        let levels: Vec<String> = ["V1", "V2", "V3"].iter().map(|s| s.to_string()).collect();

        save_newsela_to_disk(&newsela, &out, true, "V0", &levels).unwrap();
        let v1 = std::fs::read(out.join("newsela_v0_V1.tsv")).unwrap();
        let v2 = std::fs::read(out.join("newsela_v0_V2.tsv")).unwrap();
        let v3 = std::fs::read(out.join("newsela_v0_V3.tsv")).unwrap();
        assert_eq!(v1.as_slice(), b"A big dog.\tA dog.\n");
        assert_eq!(v2.as_slice(), b"The cat sat.\tThe cat sat.\n");
        assert!(v3.is_empty());

        // Running the same import again produces byte-identical files.
        save_newsela_to_disk(&newsela, &out, true, "V0", &levels).unwrap();
        assert_eq!(std::fs::read(out.join("newsela_v0_V1.tsv")).unwrap(), v1);
        assert_eq!(std::fs::read(out.join("newsela_v0_V2.tsv")).unwrap(), v2);
    }
}
