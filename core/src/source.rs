use crate::stopwords::StopwordSet;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Expand files and directories into the ordered list of document files.
///
/// Files keep the order they were given in; a directory contributes its
/// `*.txt` files sorted by path.
pub fn document_paths<P: AsRef<Path>>(inputs: &[P]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        let input = input.as_ref();
        if input.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(input)
                .into_iter()
                .filter_map(|e| e.ok())
                .map(|e| e.into_path())
                .filter(|p| p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("txt"))
                .collect();
            found.sort();
            files.extend(found);
        } else if input.is_file() {
            files.push(input.to_path_buf());
        } else {
            anyhow::bail!("document path {} does not exist", input.display());
        }
    }
    Ok(files)
}

/// Read every document named by `inputs`, in order.
pub fn load_documents<P: AsRef<Path>>(inputs: &[P]) -> Result<Vec<String>> {
    let files = document_paths(inputs)?;
    let documents = files
        .iter()
        .map(|f| fs::read_to_string(f).with_context(|| format!("reading document {}", f.display())))
        .collect::<Result<Vec<_>>>()?;
    tracing::info!(num_docs = documents.len(), "loaded documents");
    Ok(documents)
}

/// Newline-separated stopword file.
pub fn load_stopwords(path: &Path) -> Result<StopwordSet> {
    let text = fs::read_to_string(path).with_context(|| format!("reading stopwords {}", path.display()))?;
    let stopwords = StopwordSet::from_lines(&text);
    tracing::info!(count = stopwords.len(), path = %path.display(), "loaded stopwords");
    Ok(stopwords)
}
