use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;

use crate::error::{BayesError, Result};

/// Default CSV header naming the label column.
pub const DEFAULT_LABEL_COLUMN: &str = "tag";

/// Default CSV header naming the content column.
pub const DEFAULT_CONTENT_COLUMN: &str = "content";

/// A labeled post read from a corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub label: String,
    pub content: String,
}

impl Post {
    pub fn new(label: impl Into<String>, content: impl Into<String>) -> Self {
        Post {
            label: label.into(),
            content: content.into(),
        }
    }
}

/// Streams [`Post`]s out of a headered CSV corpus, in file order.
///
/// The label and content columns are located by header name. Any other
/// columns are ignored. Record numbers in errors are 1-based; record 0 is
/// the header row.
pub struct CorpusReader<R> {
    reader: csv::Reader<R>,
    label_column: String,
    content_column: String,
    label_index: usize,
    content_index: usize,
    record: u64,
}

impl CorpusReader<File> {
    /// Opens a corpus file using the default `tag` and `content` columns.
    ///
    /// # Errors
    /// Returns [`BayesError::FileOpen`] if the file cannot be opened, or
    /// [`BayesError::MalformedInput`] if a required column is absent from
    /// the header.
    pub fn from_path(path: &Path) -> Result<Self> {
        Self::from_path_with_columns(path, DEFAULT_LABEL_COLUMN, DEFAULT_CONTENT_COLUMN)
    }

    /// Opens a corpus file whose label and content live under the given headers.
    ///
    /// # Arguments
    /// * `path` - The CSV file to read.
    /// * `label_column` - Header of the label column.
    /// * `content_column` - Header of the content column.
    ///
    /// # Errors
    /// Same as [`CorpusReader::from_path`].
    pub fn from_path_with_columns(
        path: &Path,
        label_column: &str,
        content_column: &str,
    ) -> Result<Self> {
        let reader = ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|source| BayesError::FileOpen {
                path: path.to_path_buf(),
                source,
            })?;
        Self::new(reader, label_column, content_column)
    }
}

impl<R: Read> CorpusReader<R> {
    /// Reads a corpus from any byte source using the default columns.
    pub fn from_reader(rdr: R) -> Result<Self> {
        Self::from_reader_with_columns(rdr, DEFAULT_LABEL_COLUMN, DEFAULT_CONTENT_COLUMN)
    }

    pub fn from_reader_with_columns(rdr: R, label_column: &str, content_column: &str) -> Result<Self> {
        let reader = ReaderBuilder::new().flexible(true).from_reader(rdr);
        Self::new(reader, label_column, content_column)
    }

    fn new(mut reader: csv::Reader<R>, label_column: &str, content_column: &str) -> Result<Self> {
        let headers = reader.headers()?.clone();
        let label_index = column_index(&headers, label_column)?;
        let content_index = column_index(&headers, content_column)?;

        Ok(CorpusReader {
            reader,
            label_column: label_column.to_string(),
            content_column: content_column.to_string(),
            label_index,
            content_index,
            record: 0,
        })
    }

    fn post_from(&self, record: &StringRecord) -> Result<Post> {
        let field = |index: usize, name: &str| {
            record
                .get(index)
                .ok_or_else(|| BayesError::MalformedInput {
                    record: self.record,
                    field: name.to_string(),
                })
        };
        let label = field(self.label_index, &self.label_column)?;
        let content = field(self.content_index, &self.content_column)?;
        Ok(Post::new(label, content))
    }
}

impl<R: Read> Iterator for CorpusReader<R> {
    type Item = Result<Post>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut record = StringRecord::new();
        match self.reader.read_record(&mut record) {
            Ok(false) => None,
            Ok(true) => {
                self.record += 1;
                Some(self.post_from(&record))
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| BayesError::MalformedInput {
            record: 0,
            field: name.to_string(),
        })
}

/// Reads every post of a corpus file into memory.
///
/// # Errors
/// Returns the first error the underlying [`CorpusReader`] yields.
pub fn read_posts(path: &Path, label_column: &str, content_column: &str) -> Result<Vec<Post>> {
    CorpusReader::from_path_with_columns(path, label_column, content_column)?.collect()
}
