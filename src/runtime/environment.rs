//! Numeric I/O port used by `guoleila` and `tulalilloo ti amo`

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use rust_decimal::Decimal;

use crate::runtime::value::format_number;
use crate::utils::{Error, Result};

/// Source of input numbers and sink for output numbers
pub trait Environment {
    /// Read the next number; fails with `InputExhausted` or `InvalidInput`
    fn read_number(&mut self) -> Result<Decimal>;

    fn write_number(&mut self, value: Decimal) -> Result<()>;
}

impl<E: Environment + ?Sized> Environment for &mut E {
    fn read_number(&mut self) -> Result<Decimal> {
        (**self).read_number()
    }

    fn write_number(&mut self, value: Decimal) -> Result<()> {
        (**self).write_number(value)
    }
}

/// Rendering options for [`ConsoleEnvironment`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleOptions {
    /// Printed before every value; `None` prints the bare number
    pub prefix: Option<String>,
    /// Maximum fractional digits shown
    pub precision: u32,
}

impl Default for ConsoleOptions {
    fn default() -> Self {
        Self {
            prefix: Some("Result: ".to_string()),
            precision: 5,
        }
    }
}

/// Line-oriented environment over a reader and a writer
pub struct ConsoleEnvironment<R, W> {
    reader: R,
    writer: W,
    options: ConsoleOptions,
}

impl<R: BufRead, W: Write> ConsoleEnvironment<R, W> {
    pub fn new(reader: R, writer: W, options: ConsoleOptions) -> Self {
        Self {
            reader,
            writer,
            options,
        }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl ConsoleEnvironment<io::StdinLock<'static>, io::Stdout> {
    /// Console environment over the process's stdin and stdout
    pub fn stdio(options: ConsoleOptions) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), options)
    }
}

impl<R: BufRead, W: Write> Environment for ConsoleEnvironment<R, W> {
    fn read_number(&mut self) -> Result<Decimal> {
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(Error::InputExhausted);
        }

        let input = line.trim();
        if input.is_empty() {
            return Err(Error::InputExhausted);
        }

        input
            .parse::<Decimal>()
            .or_else(|_| Decimal::from_scientific(input))
            .map_err(|_| Error::InvalidInput {
                input: input.to_string(),
            })
    }

    fn write_number(&mut self, value: Decimal) -> Result<()> {
        let rendered = format_number(value, self.options.precision);
        match &self.options.prefix {
            Some(prefix) => writeln!(self.writer, "{}{}", prefix, rendered)?,
            None => writeln!(self.writer, "{}", rendered)?,
        }
        Ok(())
    }
}

/// Replays queued inputs and records every output
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ScriptedEnvironment {
    inputs: VecDeque<Decimal>,
    outputs: Vec<Decimal>,
}

impl ScriptedEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inputs(inputs: impl IntoIterator<Item = Decimal>) -> Self {
        Self {
            inputs: inputs.into_iter().collect(),
            outputs: Vec::new(),
        }
    }

    pub fn push_input(&mut self, value: Decimal) {
        self.inputs.push_back(value);
    }

    pub fn outputs(&self) -> &[Decimal] {
        &self.outputs
    }

    /// Inputs not consumed yet
    pub fn remaining_inputs(&self) -> usize {
        self.inputs.len()
    }
}

impl Environment for ScriptedEnvironment {
    fn read_number(&mut self) -> Result<Decimal> {
        self.inputs.pop_front().ok_or(Error::InputExhausted)
    }

    fn write_number(&mut self, value: Decimal) -> Result<()> {
        self.outputs.push(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn console(input: &str, options: ConsoleOptions) -> ConsoleEnvironment<&[u8], Vec<u8>> {
        ConsoleEnvironment::new(input.as_bytes(), Vec::new(), options)
    }

    #[test]
    fn test_console_reads_lines() {
        let mut env = console(" 12.5 \n-3\n1e3\n", ConsoleOptions::default());
        assert_eq!(env.read_number().unwrap(), Decimal::new(125, 1));
        assert_eq!(env.read_number().unwrap(), Decimal::from(-3));
        assert_eq!(env.read_number().unwrap(), Decimal::from(1000));
        assert_eq!(env.read_number(), Err(Error::InputExhausted));
    }

    #[test]
    fn test_console_rejects_bad_input() {
        let mut env = console("banana\n\n", ConsoleOptions::default());
        assert_eq!(
            env.read_number(),
            Err(Error::InvalidInput {
                input: "banana".to_string()
            })
        );
        assert_eq!(env.read_number(), Err(Error::InputExhausted));
    }

    #[test]
    fn test_console_output_format() {
        let mut env = console("", ConsoleOptions::default());
        env.write_number(Decimal::new(314, 2)).unwrap();
        env.write_number(Decimal::new(2_718_281_828, 9)).unwrap();
        env.write_number(Decimal::from(120)).unwrap();
        let written = String::from_utf8(env.into_writer()).unwrap();
        assert_eq!(written, "Result: 3.14\nResult: 2.71828\nResult: 120\n");
    }

    #[test]
    fn test_console_plain_output() {
        let options = ConsoleOptions {
            prefix: None,
            precision: 2,
        };
        let mut env = console("", options);
        env.write_number(Decimal::new(1005, 3)).unwrap();
        let written = String::from_utf8(env.into_writer()).unwrap();
        assert_eq!(written, "1.01\n");
    }

    #[test]
    fn test_scripted_environment() {
        let mut env = ScriptedEnvironment::with_inputs([Decimal::from(10)]);
        env.push_input(Decimal::from(20));
        assert_eq!(env.read_number().unwrap(), Decimal::from(10));
        assert_eq!(env.remaining_inputs(), 1);
        assert_eq!(env.read_number().unwrap(), Decimal::from(20));
        assert_eq!(env.read_number(), Err(Error::InputExhausted));

        env.write_number(Decimal::from(30)).unwrap();
        assert_eq!(env.outputs(), &[Decimal::from(30)]);
    }
}
