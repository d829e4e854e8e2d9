use crate::core::attribute_set::AttributeSet;
use crate::core::error::Result;
use crate::core::items::{Item, ItemCollection, WeightedItemSet};
use crate::streams::arff::parser::{is_comment_or_empty, parse_header, parse_item};
use crate::streams::item_stream::ItemStream;
use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader, Error, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug)]
pub struct ArffFileStream {
    path: PathBuf,
    reader: BufReader<File>,
    relation: String,
    attribute_set: Arc<AttributeSet>,
    data_start_pos: u64,
    next_line: Option<(usize, String)>,
    line_number: usize,
    finished: bool,
}

impl ItemStream for ArffFileStream {
    fn attribute_set(&self) -> &Arc<AttributeSet> {
        &self.attribute_set
    }

    fn has_more_items(&self) -> bool {
        self.next_line.is_some()
    }

    /// Next well-formed row. Malformed rows are logged and skipped.
    fn next_item(&mut self) -> Option<Item> {
        loop {
            let (number, line) = self.next_line.take()?;
            if let Err(e) = self.fill_next_line() {
                warn!("{}: read failed after line {number}: {e}", self.path.display());
                self.finished = true;
                self.next_line = None;
            }

            match parse_item(&self.attribute_set, &line) {
                Ok(item) => return Some(item),
                Err(e) => warn!(
                    "{}:{number}: skipping invalid row '{line}': {e}",
                    self.path.display()
                ),
            }
        }
    }

    fn restart(&mut self) -> std::result::Result<(), Error> {
        self.reader = BufReader::new(File::open(&self.path)?);
        self.reader.seek(SeekFrom::Start(self.data_start_pos))?;
        self.finished = false;
        self.next_line = None;
        self.line_number = 0;
        self.fill_next_line()
    }
}

impl ArffFileStream {
    pub fn new(path: PathBuf) -> std::result::Result<Self, Error> {
        let file = File::open(&path)?;
        let mut reader = BufReader::new(file);
        let header = parse_header(&mut reader)?;

        let mut stream = ArffFileStream {
            path,
            reader,
            relation: header.relation,
            attribute_set: Arc::new(header.attribute_set),
            data_start_pos: header.data_start_pos,
            next_line: None,
            line_number: 0,
            finished: false,
        };

        stream.fill_next_line()?;
        Ok(stream)
    }

    pub fn relation(&self) -> &str {
        &self.relation
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn fill_next_line(&mut self) -> std::result::Result<(), Error> {
        if self.finished {
            self.next_line = None;
            return Ok(());
        }
        let mut line = String::new();
        loop {
            line.clear();
            let n = self.reader.read_line(&mut line)?;
            if n == 0 {
                self.finished = true;
                self.next_line = None;
                return Ok(());
            }
            self.line_number += 1;
            if !is_comment_or_empty(&line) {
                self.next_line = Some((self.line_number, line.trim().to_string()));
                return Ok(());
            }
        }
    }
}

/// Reads a whole ARFF file into a set of unit-weight items.
pub fn read_item_set(path: impl AsRef<Path>) -> Result<WeightedItemSet> {
    let mut stream = ArffFileStream::new(path.as_ref().to_path_buf())?;
    let set = stream.collect_item_set()?;
    info!(
        "read {} items of relation '{}' from {}",
        set.num_of_items(),
        stream.relation(),
        stream.path().display()
    );
    Ok(set)
}
