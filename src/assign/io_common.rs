use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::assign::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

pub fn make_default_id(path: &str) -> impl Fn(usize) -> String {
    let simplified_file_name = simplify_file_name(path);
    move |lineno| format!("{}-{:08}", simplified_file_name, lineno)
}

/// Finds a column by its header. Surrounding whitespace in the header is ignored.
pub fn column_index(header: &[String], column: &str) -> AssignResult<usize> {
    header
        .iter()
        .position(|h| h.trim() == column)
        .context(MissingColumnSnafu { column })
}

pub fn get_cell<'a>(
    response: &'a ParsedResponse,
    idx: usize,
    column: &str,
) -> AssignResult<&'a str> {
    response
        .cells
        .get(idx)
        .map(|s| s.as_str())
        .context(CsvLineTooShortSnafu {
            lineno: response.lineno,
            column,
        })
}

/// Splits a cell listing several projects.
///
/// Any of the characters in `delimiters` separates two entries. Blank entries
/// are dropped.
pub fn split_choices(cell: &str, delimiters: &str) -> Vec<String> {
    cell.split(|c: char| delimiters.contains(c))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// A file written next to its destination, and moved into place by
/// [StagedFile::commit].
///
/// The temporary file is removed when a staged file is dropped before its commit.
pub struct StagedFile {
    path: String,
    tmp: PathBuf,
    committed: bool,
}

impl StagedFile {
    pub fn stage(path: &str, content: &[u8]) -> AssignResult<StagedFile> {
        let tmp = Path::new(path).with_file_name(format!(".{}.tmp", simplify_file_name(path)));
        debug!("StagedFile::stage: {} through {}", path, tmp.display());
        let staged = StagedFile {
            path: path.to_string(),
            tmp,
            committed: false,
        };
        fs::File::create(&staged.tmp)
            .and_then(|mut f| {
                f.write_all(content)?;
                f.sync_all()
            })
            .context(WritingOutputSnafu { path })?;
        Ok(staged)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn commit(mut self) -> AssignResult<()> {
        fs::rename(&self.tmp, &self.path).context(WritingOutputSnafu {
            path: self.path.as_str(),
        })?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.tmp);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn strings(l: &[&str]) -> Vec<String> {
        l.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn choices() {
        let expected = strings(&["red", "blu"]);
        assert_eq!(split_choices("red, blu", ";,"), expected);
        assert_eq!(split_choices("red,blu", ";,"), expected);
        assert_eq!(split_choices("red;blu", ";,"), expected);
        assert_eq!(split_choices(" red ;; blu; ", ";,"), expected);
        assert_eq!(split_choices("", ";,"), Vec::<String>::new());
        assert_eq!(split_choices("red, blu", ";"), strings(&["red, blu"]));
    }

    #[test]
    fn columns() {
        let header = strings(&["Timestamp", " Name ", "Interested?"]);
        assert_eq!(column_index(&header, "Name").unwrap(), 1);
        assert!(matches!(
            column_index(&header, "Leader?"),
            Err(AssignError::MissingColumn { .. })
        ));
    }

    #[test]
    fn default_ids() {
        let default_id = make_default_id("/tmp/forms/responses.csv");
        assert_eq!(default_id(12), "responses.csv-00000012");
    }

    #[test]
    fn atomic_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("teams.csv");
        let path_s = path.display().to_string();
        StagedFile::stage(&path_s, b"first").unwrap().commit().unwrap();
        StagedFile::stage(&path_s, b"second").unwrap().commit().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        // Only the destination remains.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn failed_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("out.csv");
        let res = StagedFile::stage(&path.display().to_string(), b"content");
        assert!(matches!(res, Err(AssignError::WritingOutput { .. })));
    }

    #[test]
    fn staged_file_dropped_before_commit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("teams.csv");
        let staged = StagedFile::stage(&path.display().to_string(), b"content").unwrap();
        assert!(!path.exists());
        drop(staged);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
