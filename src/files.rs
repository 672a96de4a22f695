//! File and stdin access for `LOAD` and `EXPECT`: read lines from a file or
//! stdin, trimming the trailing newline, one line at a time.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;

use crate::messages::{DebugLevel, Msg};

#[derive(Debug, PartialEq)]
pub enum FileMode {
    RW,
    RO,
    WO,
}

#[derive(Debug)]
pub enum FType {
    Stdin,
    File(File),
    BReader(BufReader<File>),
}

#[derive(Debug)]
pub struct FileHandle {
    pub source: FType,
    pub file_mode: FileMode,
    msg: Msg,
}

impl FileHandle {
    pub fn stdin() -> FileHandle {
        let mut msg = Msg::new();
        msg.set_level(DebugLevel::Warning);
        FileHandle {
            source: FType::Stdin,
            file_mode: FileMode::RO,
            msg,
        }
    }

    /// Opens `path` read-only, for `LOAD`. Returns an `IoError`-shaped
    /// message through `msg` and `None` if the file cannot be opened.
    pub fn open_for_load(path: &Path) -> io::Result<FileHandle> {
        let file = File::open(path)?;
        let mut msg = Msg::new();
        msg.set_level(DebugLevel::Warning);
        Ok(FileHandle {
            source: FType::BReader(BufReader::new(file)),
            file_mode: FileMode::RO,
            msg,
        })
    }

    /// Reads one line, trimming the trailing newline. `None` at end of input.
    pub fn get_line(&mut self) -> Option<String> {
        let mut line = String::new();
        let result = match &mut self.source {
            FType::Stdin => {
                let _ = io::stdout().flush();
                io::stdin().read_line(&mut line)
            }
            FType::BReader(br) => {
                if self.file_mode == FileMode::WO {
                    return None;
                }
                br.read_line(&mut line)
            }
            FType::File(_) => return None,
        };
        match result {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\n', '\r']).to_string()),
            Err(e) => {
                self.msg.error("get_line", "read_line error", Some(e.to_string()));
                None
            }
        }
    }

    pub fn read_char(&self) -> Option<char> {
        let mut buf = [0; 1];
        let mut handle = io::stdin().lock();
        match handle.read(&mut buf) {
            Ok(1) => Some(buf[0] as char),
            _ => None,
        }
    }
}
