use regex::Regex;

use crate::model::Record;

// serial, shortest name, first `@` token, rest
const RECORD_PATTERN: &str = r"^(\d+)\s+(.+?)\s+(\S+@\S+)\s+(.*)$";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRecords {
    pub records: Vec<Record>,
    pub dropped_lines: usize,
}

#[derive(Debug, Clone)]
pub struct RecordParser {
    pattern: Regex,
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(RECORD_PATTERN).expect("hardcoded record pattern is valid"),
        }
    }

    fn match_line(&self, line: &str) -> Option<Record> {
        let captures = self.pattern.captures(line)?;
        let group = |index: usize| captures.get(index).map_or("", |m| m.as_str());
        Some(Record {
            serial: group(1).to_string(),
            name: group(2).to_string(),
            email: group(3).to_string(),
            remainder: group(4).trim().to_string(),
        })
    }

    pub fn parse<I, S>(&self, lines: I) -> ParsedRecords
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = ParsedRecords::default();

        for line in lines {
            let line = line.as_ref();
            if let Some(record) = self.match_line(line) {
                parsed.records.push(record);
                continue;
            }

            match parsed.records.last_mut() {
                Some(current) => {
                    current.remainder.push(' ');
                    current.remainder.push_str(line);
                }
                None => parsed.dropped_lines += 1,
            }
        }

        parsed
    }
}
