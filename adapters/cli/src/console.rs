use std::{
    fmt::Display,
    io::{self, BufRead, Write},
};

/// Line-oriented prompt over any reader and writer pair.
#[derive(Debug)]
pub(crate) struct Console<I, O> {
    input: I,
    output: O,
}

impl<I: BufRead, O: Write> Console<I, O> {
    pub(crate) fn new(input: I, output: O) -> Self {
        Self { input, output }
    }

    /// Prints one line.
    pub(crate) fn say(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    /// Prints `prompt` and reads the trimmed answer. `None` means the input closed.
    pub(crate) fn ask(&mut self, prompt: impl Display) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    #[cfg(test)]
    pub(crate) fn output(&self) -> &O {
        &self.output
    }
}
