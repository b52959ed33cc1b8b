// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::io::Write;
use std::sync::Mutex;

use csv::Writer;

/// A snapshot of search statistics, emitted once per completed deepening
/// iteration.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Record {
    pub depth: u32,
    pub nodes: u64,
    pub beta_cutoffs: u64,
    pub best_move: String,
    pub score: f32,
    pub elapsed_ms: u64,
}

pub trait DataRecorder {
    fn record(&self, rec: &Record);
}

pub struct NullDataRecorder;
impl DataRecorder for NullDataRecorder {
    fn record(&self, _rec: &Record) {}
}

pub struct CsvDataRecorder<W: Write> {
    writer: Mutex<Writer<W>>,
}

impl<W: Write> CsvDataRecorder<W> {
    pub fn new(writer: W) -> CsvDataRecorder<W> {
        CsvDataRecorder {
            writer: Mutex::new(Writer::from_writer(writer)),
        }
    }
}

impl<W: Write> DataRecorder for CsvDataRecorder<W> {
    fn record(&self, rec: &Record) {
        let mut writer = self.writer.lock().unwrap();
        writer.serialize(rec).unwrap();
        writer.flush().unwrap();
    }
}
