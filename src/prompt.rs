use std::io;

use anyhow::Context;

pub trait Prompter {
    /// Reads one trimmed line, or `None` once the input is exhausted.
    /// Bytes that are not UTF-8 are replaced rather than rejected.
    fn read(&mut self) -> anyhow::Result<Option<String>>;
    fn prompt(&mut self, prompt: &str) -> anyhow::Result<()>;
    fn report(&mut self, message: &str) -> anyhow::Result<()>;
}

pub struct ConsolePrompter<R: io::BufRead, W: io::Write, E: io::Write> {
    reader: R,
    writer: W,
    error_writer: E,
}

impl<R: io::BufRead, W: io::Write, E: io::Write> Prompter for ConsolePrompter<R, W, E> {
    fn read(&mut self) -> anyhow::Result<Option<String>> {
        let mut input = Vec::new();
        let read = self
            .reader
            .read_until(b'\n', &mut input)
            .context("Error reading input")?;

        if read == 0 {
            return Ok(None);
        }

        return Ok(Some(String::from_utf8_lossy(&input).trim().to_string()));
    }

    fn prompt(&mut self, prompt: &str) -> anyhow::Result<()> {
        write!(self.writer, "{}", prompt)?;
        self.writer.flush()?;

        return Ok(());
    }

    fn report(&mut self, message: &str) -> anyhow::Result<()> {
        write!(self.error_writer, "{}", message)?;
        self.error_writer.flush()?;

        return Ok(());
    }
}

impl<R: io::BufRead, W: io::Write, E: io::Write> ConsolePrompter<R, W, E> {
    pub fn new(reader: R, writer: W, error_writer: E) -> Self {
        return ConsolePrompter {
            reader,
            writer,
            error_writer,
        };
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[test]
    fn prompter() {
        let input = b"  Hi there \nsecond\n";
        let mut output = Vec::new();
        let mut errors = Vec::new();

        let mut prompter = ConsolePrompter::new(input.as_slice(), &mut output, &mut errors);

        prompter.prompt("first line\n").unwrap();
        prompter.prompt("second line\n").unwrap();
        prompter.report("oops\n").unwrap();

        let first = prompter.read().unwrap();
        let second = prompter.read().unwrap();
        let end = prompter.read().unwrap();

        assert_eq!(Some("Hi there".to_string()), first);
        assert_eq!(Some("second".to_string()), second);
        assert_eq!(None, end);
        assert_eq!("first line\nsecond line\n", String::from_utf8(output).unwrap());
        assert_eq!("oops\n", String::from_utf8(errors).unwrap());
    }

    #[test]
    fn last_line_without_newline_is_still_read() {
        let mut prompter = ConsolePrompter::new(b"echo hi".as_slice(), Vec::new(), Vec::new());

        assert_eq!(Some("echo hi".to_string()), prompter.read().unwrap());
        assert_eq!(None, prompter.read().unwrap());
    }

    #[test]
    fn blank_line_is_not_end_of_input() {
        let mut prompter = ConsolePrompter::new(b"\n".as_slice(), Vec::new(), Vec::new());

        assert_eq!(Some(String::new()), prompter.read().unwrap());
        assert_eq!(None, prompter.read().unwrap());
    }

    pub(crate) struct BrokenReader {}

    impl io::Read for BrokenReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            return Err(io::Error::new(io::ErrorKind::Other, "device gone"));
        }
    }

    impl io::BufRead for BrokenReader {
        fn fill_buf(&mut self) -> io::Result<&[u8]> {
            return Err(io::Error::new(io::ErrorKind::Other, "device gone"));
        }

        fn consume(&mut self, _amt: usize) {}
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let mut prompter =
            ConsolePrompter::new(b"echo caf\xe9\nnext\n".as_slice(), Vec::new(), Vec::new());

        assert_eq!(Some("echo caf\u{FFFD}".to_string()), prompter.read().unwrap());
        assert_eq!(Some("next".to_string()), prompter.read().unwrap());
        assert_eq!(None, prompter.read().unwrap());
    }

    #[test]
    fn io_failure_is_a_read_error() {
        let mut prompter = ConsolePrompter::new(BrokenReader {}, Vec::new(), Vec::new());

        let error = prompter.read().unwrap_err();
        assert_eq!(format!("{:#}", error), "Error reading input: device gone");
    }
}
