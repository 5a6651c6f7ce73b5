// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Lazy decoder for `go test -json` streams

use std::io::{BufReader, Read};

use serde_json::StreamDeserializer;
use serde_json::de::IoRead;

use crate::error::EventsError;
use crate::event::TestEvent;

/// Iterator over the events of a `go test -json` stream
///
/// Yields one item per JSON object. The first malformed (or truncated)
/// object is yielded as an error and ends the iteration; end of input ends
/// it normally.
pub struct EventDecoder<R: Read> {
    deserializer: StreamDeserializer<'static, IoRead<BufReader<R>>, TestEvent>,
    done: bool,
}

impl<R: Read> EventDecoder<R> {
    /// Create a new decoder from a reader
    pub fn new(reader: R) -> Self {
        let deserializer = serde_json::Deserializer::from_reader(BufReader::new(reader)).into_iter();
        Self {
            deserializer,
            done: false,
        }
    }

    /// Number of bytes consumed so far
    #[must_use]
    pub fn byte_offset(&self) -> usize {
        self.deserializer.byte_offset()
    }
}

impl<R: Read> Iterator for EventDecoder<R> {
    type Item = Result<TestEvent, EventsError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.deserializer.next() {
            Some(Ok(event)) => Some(Ok(event)),
            Some(Err(err)) => {
                self.done = true;
                Some(Err(EventsError::from(err)))
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

impl<R: Read> std::iter::FusedIterator for EventDecoder<R> {}

/// Decode every event of a stream, failing on the first malformed object
///
/// # Errors
///
/// Returns `EventsError::Decode` for malformed input and `EventsError::Io`
/// if reading fails.
pub fn decode_all<R: Read>(reader: R) -> Result<Vec<TestEvent>, EventsError> {
    EventDecoder::new(reader).collect()
}
