use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "find-dupes")]
#[command(about = "Find byte-for-byte duplicate files in a directory tree and delete them")]
pub struct Cli {
    /// Directory to scan for duplicates
    pub directory: PathBuf,

    /// Delete identified duplicates (otherwise only preview them)
    #[arg(short = 'd', long = "delete")]
    pub delete: bool,

    /// Paranoid check: compare file contents byte-for-byte before trusting a hash match
    #[arg(short = 'p', long = "paranoid")]
    pub paranoid: bool,

    /// Report each duplicate and the file it duplicates
    #[arg(short = 'r', long = "report")]
    pub report: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Substring marking a path as preferred for deletion; repeat to give
    /// several in priority order (default: "unfiltered", then "preferDelete")
    #[arg(long = "delete-marker", value_name = "SUBSTRING")]
    pub delete_markers: Vec<String>,

    /// Write a JSON summary of the run to FILE
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,
}

impl Cli {
    /// Parses arguments, accepting `/d`, `/p` and `/r` as aliases for the
    /// dash flags.
    pub fn parse_normalized<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::parse_from(normalize_args(args))
    }
}

/// Rewrites slash-style flags to dash flags. The program name and the
/// directory slot right after it are left alone so a directory named `/d`
/// is still usable.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::<OsString>::into)
        .enumerate()
        .map(|(i, arg)| {
            if i < 2 {
                return arg;
            }
            match arg.to_str() {
                Some("/d") => "-d".into(),
                Some("/p") => "-p".into(),
                Some("/r") => "-r".into(),
                _ => arg,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_flags_are_rewritten_after_directory() {
        let args = normalize_args(["find-dupes", "/d", "/d", "/p", "-r"]);
        assert_eq!(args, ["find-dupes", "/d", "-d", "-p", "-r"].map(OsString::from).to_vec());
    }

    #[test]
    fn parses_all_flags() {
        let cli = Cli::parse_normalized(["find-dupes", "/tmp/x", "/d", "-p", "/r"]);
        assert_eq!(cli.directory, PathBuf::from("/tmp/x"));
        assert!(cli.delete && cli.paranoid && cli.report);
        assert!(cli.delete_markers.is_empty());
    }

    #[test]
    fn defaults_to_dry_run() {
        let cli = Cli::parse_normalized(["find-dupes", "."]);
        assert!(!cli.delete && !cli.paranoid && !cli.report && cli.json.is_none());
    }

    #[test]
    fn delete_markers_keep_order() {
        let cli = Cli::parse_normalized([
            "find-dupes",
            ".",
            "--delete-marker",
            "tmp",
            "--delete-marker",
            "copy",
        ]);
        assert_eq!(cli.delete_markers, vec!["tmp", "copy"]);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(normalize_args(["find-dupes", ".", "-x"])).is_err());
        assert!(Cli::try_parse_from(["find-dupes"]).is_err());
    }
}
