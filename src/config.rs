use anyhow::{bail, Result};
use std::path::PathBuf;

/// Default location of the newsela_data_share directory on the experiment host.
const DEFAULT_NEWSELA_PATH: &str =
    "/srv/scratch6/kew/ats/data/en/newsela_article_corpus_2016-01-29/newsela_data_share-20150302/";

/// Source-version label a row must carry to be kept (V0 = original article).
const DEFAULT_SRC_LEVEL: &str = "V0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Turk,
    Newsela,
}

impl Dataset {
    fn from_name(name: &str) -> Result<Self> {
        match name {
            "turk" => Ok(Self::Turk),
            "newsela" => Ok(Self::Newsela),
            other => bail!("unknown dataset '{}' (expected 'turk' or 'newsela')", other),
        }
    }
}

#[derive(Debug)]
pub struct Config {
    pub outpath: PathBuf,
    pub datasets: Vec<Dataset>,
    pub newsela_path: PathBuf,
    pub detok: bool,
    pub src_level: String,
    pub tgt_levels: Vec<String>,
}

impl Config {
    /// Parse a flag slice (program name already stripped). Kept separate from
    /// `env::args` so it can be driven directly in tests.
    pub fn from_arg_slice(args: &[String]) -> Result<Self> {
        let mut outpath = None;
        let mut datasets = vec![Dataset::Turk, Dataset::Newsela];
        let mut newsela_path = PathBuf::from(DEFAULT_NEWSELA_PATH);
        let mut detok = true;
        let mut src_level = DEFAULT_SRC_LEVEL.to_string();
        let mut tgt_levels: Vec<String> =
            ["V1", "V2", "V3", "V4"].iter().map(|s| s.to_string()).collect();

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "-o" | "--outpath" => {
                    outpath = Some(PathBuf::from(take_value(args, &mut i, "--outpath")?));
                }
                "--datasets" => {
                    datasets = take_values(args, &mut i, "--datasets")?
                        .iter()
                        .map(|name| Dataset::from_name(name))
                        .collect::<Result<_>>()?;
                }
                "--newsela-path" => {
                    newsela_path = PathBuf::from(take_value(args, &mut i, "--newsela-path")?);
                }
                "--no-detok" => {
                    detok = false;
                    i += 1;
                }
                "--src-level" => {
                    src_level = take_value(args, &mut i, "--src-level")?;
                }
                "--levels" => {
                    tgt_levels = take_values(args, &mut i, "--levels")?;
                }
                other => bail!("unrecognized argument '{}'", other),
            }
        }

        let Some(outpath) = outpath else {
            bail!("missing required --outpath <dir>");
        };
        Ok(Self {
            outpath,
            datasets,
            newsela_path,
            detok,
            src_level,
            tgt_levels,
        })
    }
}

fn take_value(args: &[String], i: &mut usize, flag: &str) -> Result<String> {
    match args.get(*i + 1).filter(|v| !v.starts_with('-')) {
        Some(value) => {
            *i += 2;
            Ok(value.clone())
        }
        None => bail!("{} expects a value", flag),
    }
}

fn take_values(args: &[String], i: &mut usize, flag: &str) -> Result<Vec<String>> {
    let mut values = Vec::new();
    let mut j = *i + 1;
    while let Some(value) = args.get(j) {
        if value.starts_with('-') {
            break;
        }
        values.push(value.clone());
        j += 1;
    }
    if values.is_empty() {
        bail!("{} expects at least one value", flag);
    }
    *i = j;
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_cover_both_datasets() {
        let config = Config::from_arg_slice(&args(&["--outpath", "out"])).unwrap();
        assert_eq!(config.outpath, PathBuf::from("out"));
        assert_eq!(config.datasets, vec![Dataset::Turk, Dataset::Newsela]);
        assert!(config.detok);
        assert_eq!(config.src_level, "V0");
        assert_eq!(config.tgt_levels, ["V1", "V2", "V3", "V4"]);
    }

    #[test]
    fn dataset_selection_keeps_requested_order() {
        let config =
            Config::from_arg_slice(&args(&["--datasets", "newsela", "-o", "out"])).unwrap();
        assert_eq!(config.datasets, vec![Dataset::Newsela]);

        let config =
            Config::from_arg_slice(&args(&["--datasets", "newsela", "turk", "-o", "out"])).unwrap();
        assert_eq!(config.datasets, vec![Dataset::Newsela, Dataset::Turk]);
    }

    #[test]
    fn unknown_dataset_is_fatal() {
        let err = Config::from_arg_slice(&args(&["-o", "out", "--datasets", "wiki"])).unwrap_err();
        assert!(err.to_string().contains("unknown dataset 'wiki'"));
    }

    #[test]
    fn missing_outpath_is_fatal() {
        assert!(Config::from_arg_slice(&args(&["--datasets", "turk"])).is_err());
    }

    #[test]
    fn flag_without_value_is_fatal() {
        assert!(Config::from_arg_slice(&args(&["--outpath"])).is_err());
        assert!(Config::from_arg_slice(&args(&["-o", "out", "--levels", "--no-detok"])).is_err());
    }

    #[test]
    fn detok_and_levels_are_configurable() {
        let config = Config::from_arg_slice(&args(&[
            "-o", "out", "--no-detok", "--src-level", "V1", "--levels", "V2", "V3",
        ]))
        .unwrap();
        assert!(!config.detok);
        assert_eq!(config.src_level, "V1");
        assert_eq!(config.tgt_levels, ["V2", "V3"]);
    }
}
