use anyhow::{bail, Context, Result};
use rsdlc::tone::pedal::PedalCatalog;
use std::{
    borrow::Cow,
    io::{stdin, stdout, Write},
    path::{Path, PathBuf},
};
use walkdir::{DirEntry, WalkDir};

/// Iterate over the (non-hidden) files at a set of paths, walking into directories
pub fn iter_files<'a, I>(paths: I, recursive: bool) -> impl Iterator<Item = DirEntry> + 'a
where
    I: IntoIterator + 'a,
    <I as IntoIterator>::Item: AsRef<Path>,
{
    paths
        .into_iter()
        .flat_map(move |path| {
            let mut walk_dir = WalkDir::new(path.as_ref());
            if !recursive {
                walk_dir = walk_dir.max_depth(1);
            }

            walk_dir
        })
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file() && !is_hidden(entry))
}

/// Fail if any of the given input paths doesn't exist
pub fn check_paths_exist<I>(paths: I) -> Result<()>
where
    I: IntoIterator,
    <I as IntoIterator>::Item: AsRef<Path>,
{
    for path in paths {
        let path = path.as_ref();
        if !path.exists() {
            bail!("{} does not exist", path.to_string_lossy());
        }
    }

    Ok(())
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Does a file name end in a (possibly multi-part) extension, like `dlc.json`?
pub fn has_extension(path: &Path, extension: &str) -> bool {
    match path.file_name() {
        Some(name) => name
            .to_string_lossy()
            .to_lowercase()
            .ends_with(&format!(".{extension}")),
        None => false,
    }
}

/// Ask a yes/no question on the terminal
pub fn ask(question: &str) -> Result<bool> {
    loop {
        print!("{question} Y/n ");
        stdout().flush().context("Could not write to the terminal")?;

        let mut line = String::new();
        stdin()
            .read_line(&mut line)
            .context("Could not read terminal input")?;

        if let Some(answer) = parse_answer(&line) {
            return Ok(answer);
        }
    }
}

fn parse_answer(line: &str) -> Option<bool> {
    match line.trim() {
        "Y" | "y" => Some(true),
        "N" | "n" => Some(false),
        _ => None,
    }
}

/// Ask before overwriting an existing file, returning whether to go ahead
pub fn check_for_overwrite(path: &Path) -> Result<bool> {
    if path.exists() {
        ask(&format!(
            "{} already exists. Do you want to overwrite it?",
            path.to_string_lossy()
        ))
    } else {
        Ok(true)
    }
}

/// The pedal catalog to build tones from: a JSON override, or the built-in one
pub fn pedal_catalog(path: Option<&PathBuf>) -> Result<Cow<'static, PedalCatalog>> {
    match path {
        Some(path) => {
            let catalog = PedalCatalog::from_path(path)
                .context(format!("Could not read pedal catalog {}", path.display()))?;
            Ok(Cow::Owned(catalog))
        }
        None => Ok(Cow::Borrowed(PedalCatalog::builtin())),
    }
}
