// SPDX-License-Identifier: GPL-3.0-only

use std::io::{self, Write};

use serde::Serialize;

/// Newline-delimited JSON writer. Every message is written as one line and
/// flushed before `emit` returns.
pub struct Emitter<W: Write> {
    out: W,
}

impl Emitter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Emitter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn emit<T: Serialize + ?Sized>(&mut self, message: &T) -> io::Result<()> {
        let mut line = serde_json::to_vec(message)?;
        line.push(b'\n');
        self.out.write_all(&line)?;
        self.out.flush()
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }
}
