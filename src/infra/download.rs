// ============================================================
// Layer 6 — Download Cache
// ============================================================
// Fetches remote files once and reuses them on later runs.
//
//   .cache/
//     sst2/SST-2.zip                             ← dataset archive
//     sst2/SST-2/{train,dev,test}.tsv            ← extracted splits
//     FacebookAI--xlm-roberta-base/config.json   ← pretrained files
//     FacebookAI--xlm-roberta-base/pytorch_model.bin
//
// Downloads stream to a `.part` file which is renamed into
// place only after the body has been fully written, so an
// interrupted run never leaves a truncated file that looks
// complete.

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
    time::Duration,
};

/// Root directory for cached downloads
#[derive(Debug, Clone)]
pub struct DownloadCache {
    root: PathBuf,
}

impl DownloadCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return `<root>/<relative>`, downloading `url` there first
    /// if the file is not cached yet.
    pub fn fetch(&self, url: &str, relative: impl AsRef<Path>) -> Result<PathBuf> {
        let path = self.root.join(relative);
        if path.exists() {
            tracing::debug!("Cache hit: {}", path.display());
            return Ok(path);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create '{}'", parent.display()))?;
        }
        download_file(url, &path)?;
        Ok(path)
    }

    /// Fetch a file from a model repository on the Hugging Face hub.
    pub fn fetch_hub_file(&self, model_id: &str, filename: &str) -> Result<PathBuf> {
        let url = format!("https://huggingface.co/{model_id}/resolve/main/{filename}");
        self.fetch(&url, Path::new(&model_id.replace('/', "--")).join(filename))
    }
}

/// Stream `url` into `output_path` with a byte progress bar.
pub fn download_file(url: &str, output_path: &Path) -> Result<()> {
    tracing::info!("Downloading from: {}", url);

    let mut response = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(3600))
        .build()?
        .get(url)
        .send()
        .with_context(|| format!("Failed to send request to {url}"))?;

    if !response.status().is_success() {
        bail!("Download of {url} failed with status: {}", response.status());
    }

    let pb = ProgressBar::new(response.content_length().unwrap_or(0));
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-"),
    );

    let partial = output_path.with_extension("part");
    let file = File::create(&partial)
        .with_context(|| format!("Failed to create '{}'", partial.display()))?;
    std::io::copy(&mut response, &mut pb.wrap_write(file))
        .with_context(|| format!("Failed to read response body from {url}"))?;
    fs::rename(&partial, output_path)
        .with_context(|| format!("Failed to move download to '{}'", output_path.display()))?;

    pb.finish_with_message("Downloaded");
    Ok(())
}

/// Extract every entry of a ZIP archive below `output_dir`.
pub fn extract_zip(archive_path: &Path, output_dir: &Path) -> Result<()> {
    tracing::info!("Extracting '{}'", archive_path.display());

    let file = File::open(archive_path)
        .with_context(|| format!("Cannot open '{}'", archive_path.display()))?;
    let mut archive = zip::ZipArchive::new(file)
        .with_context(|| format!("'{}' is not a ZIP archive", archive_path.display()))?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let outpath = output_dir.join(entry.mangled_name());

        if entry.is_dir() {
            fs::create_dir_all(&outpath)?;
        } else {
            if let Some(parent) = outpath.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut outfile = File::create(&outpath)?;
            std::io::copy(&mut entry, &mut outfile)?;
        }
    }

    tracing::debug!("Extracted {} entries", archive.len());
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_cached_file_is_not_downloaded_again() {
        let dir   = TempDir::new().unwrap();
        let cache = DownloadCache::new(dir.path());
        let path  = dir.path().join("FacebookAI--xlm-roberta-base").join("config.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{}").unwrap();

        // The URL is never contacted because the file is already cached
        let got = cache.fetch_hub_file("FacebookAI/xlm-roberta-base", "config.json").unwrap();
        assert_eq!(got, path);
    }

    #[test]
    fn test_extract_zip_writes_nested_entries() {
        let dir = TempDir::new().unwrap();
        let archive_path = dir.path().join("data.zip");
        {
            let file = File::create(&archive_path).unwrap();
            let mut zip = zip::ZipWriter::new(file);
            let options = zip::write::SimpleFileOptions::default();
            zip.add_directory("SST-2/", options).unwrap();
            zip.start_file("SST-2/dev.tsv", options).unwrap();
            zip.write_all(b"sentence\tlabel\nfine .\t1\n").unwrap();
            zip.finish().unwrap();
        }

        let out = dir.path().join("out");
        extract_zip(&archive_path, &out).unwrap();
        let body = fs::read_to_string(out.join("SST-2").join("dev.tsv")).unwrap();
        assert!(body.ends_with("fine .\t1\n"));
    }
}
