//! Download the TURK simplification corpus from the Hugging Face Hub and
//! save each split as a local tab-separated file.

use anyhow::{bail, Context, Result};
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::{ListAccessor, Row, RowAccessor};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::sanitize_field;

/// TURK corpus on the Hugging Face Hub (Xu et al. 2016): Simple Wikipedia
/// sentences, each with 8 manually written crowdsourced simplifications.
const TURK_DATASET_ID: &str = "turk";
/// Revision under which the Hub serves auto-converted parquet files.
const PARQUET_REVISION: &str = "refs/convert/parquet";

/// List the parquet files of every TURK split (Hub API only, no download).
/// Returns split name -> sorted parquet rfilenames.
fn turk_parquet_splits(api: &hf_hub::api::sync::Api) -> Result<BTreeMap<String, Vec<String>>> {
    use hf_hub::{Repo, RepoType};

    let repo = Repo::with_revision(
        TURK_DATASET_ID.to_string(),
        RepoType::Dataset,
        PARQUET_REVISION.to_string(),
    );
    let api_repo = api.repo(repo);
    let info = api_repo
        .info()
        .map_err(|e| anyhow::anyhow!("hub info: {}", e))?;

    let mut splits: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for sibling in info.siblings {
        if !sibling.rfilename.ends_with(".parquet") {
            continue;
        }
        let Some(split) = split_of_rfilename(&sibling.rfilename) else {
            continue;
        };
        splits.entry(split).or_default().push(sibling.rfilename);
    }
    for rfilenames in splits.values_mut() {
        rfilenames.sort();
    }
    Ok(splits)
}

/// Split component of a converted-parquet path such as
/// "default/test/0000.parquet" -> "test".
fn split_of_rfilename(rfilename: &str) -> Option<String> {
    let mut parts: Vec<&str> = rfilename.split('/').collect();
    parts.pop()?; // file name
    parts.pop().map(|s| s.to_string())
}

/// Open parquet readers for the given rfilenames (downloads files via the
/// Hub; hf-hub caches them locally, so re-runs read from disk).
fn split_parquet_readers(
    api: &hf_hub::api::sync::Api,
    rfilenames: &[String],
) -> Result<Vec<SerializedFileReader<File>>> {
    use hf_hub::{Repo, RepoType};

    let repo = Repo::with_revision(
        TURK_DATASET_ID.to_string(),
        RepoType::Dataset,
        PARQUET_REVISION.to_string(),
    );
    let api_repo = api.repo(repo);

    let mut readers = Vec::with_capacity(rfilenames.len());
    for rfilename in rfilenames {
        let local_path = api_repo
            .get(rfilename)
            .map_err(|e| anyhow::anyhow!("hub get: {}", e))?;
        let file = File::open(local_path).context("open parquet file")?;
        readers.push(SerializedFileReader::new(file).context("parquet reader")?);
    }
    Ok(readers)
}

/// One TURK record out of a parquet row: the original sentence (first string
/// column) and its reference simplifications in order (first list column).
fn extract_record_from_row(row: &Row) -> Result<(String, Vec<String>)> {
    let mut original: Option<String> = None;
    let mut references: Option<Vec<String>> = None;
    let n = row.len();
    for i in 0..n {
        if original.is_none() {
            if let Ok(s) = row.get_string(i) {
                original = Some(s.clone());
                continue;
            }
        }
        if references.is_none() {
            if let Ok(list) = row.get_list(i) {
                let mut refs = Vec::with_capacity(list.len());
                for j in 0..list.len() {
                    let s = list
                        .get_string(j)
                        .map_err(|e| anyhow::anyhow!("reference {} is not a string: {}", j, e))?;
                    refs.push(s.clone());
                }
                references = Some(refs);
            }
        }
    }
    match (original, references) {
        (Some(original), Some(references)) => Ok((original, references)),
        _ => bail!("row has no original/simplifications columns"),
    }
}

/// Write one `<original>\t<ref_1>\t...\t<ref_k>` line.
fn write_turk_record<W: Write>(w: &mut W, original: &str, references: &[String]) -> Result<()> {
    let src = sanitize_field(original);
    let tgts = references
        .iter()
        .map(|r| sanitize_field(r))
        .collect::<Vec<_>>()
        .join("\t");
    writeln!(w, "{}\t{}", src, tgts).context("write record line")?;
    Ok(())
}

/// Download the TURK corpus and save every split to `turk_<split>.tsv` in
/// `out_dir`: one line per record, the original sentence followed by all of
/// its reference simplifications, tab-separated, references in corpus order.
///
/// Retrieval failure is fatal and propagated; there is no retry.
pub fn save_turk_to_disk(out_dir: &Path) -> Result<()> {
    let api = hf_hub::api::sync::Api::new().context("hf-hub API")?;
    let splits = turk_parquet_splits(&api)?;
    if splits.is_empty() {
        bail!("dataset '{}' has no parquet files", TURK_DATASET_ID);
    }

    for (split, rfilenames) in &splits {
        eprintln!(
            "Downloading TURK {} ({} parquet file(s))...",
            split,
            rfilenames.len()
        );
        let readers = split_parquet_readers(&api, rfilenames)?;

        let outfile = out_dir.join(format!("turk_{}.tsv", split));
        let mut out = BufWriter::new(
            File::create(&outfile).with_context(|| format!("create {:?}", outfile))?,
        );

        let mut written = 0usize;
        for reader in &readers {
            let iter = reader
                .get_row_iter(None)
                .map_err(|e| anyhow::anyhow!("parquet row iter: {}", e))?;
            for row_result in iter {
                let row = row_result.map_err(|e| anyhow::anyhow!("parquet row: {}", e))?;
                let (original, references) = extract_record_from_row(&row)
                    .with_context(|| format!("TURK split '{}'", split))?;
                write_turk_record(&mut out, &original, &references)?;
                written += 1;
            }
        }
        out.flush().context("flush output")?;
        println!(
            "TURK {} ({} items) saved to disk ({})",
            split,
            written,
            outfile.display()
        );
    }
    Ok(())
}
