//! Character output sink

use std::fmt;
use std::io::Write;

use crate::error::Fault;

/// Collects bytes written by `putc` and optionally forwards them to a writer
pub struct IOHandler {
    output: Vec<u8>,
    echo: Option<Box<dyn Write + Send>>,
}

impl IOHandler {
    /// Capture only
    pub fn new() -> Self {
        IOHandler {
            output: Vec::new(),
            echo: None,
        }
    }

    /// Capture and echo to process stdout
    pub fn stdout() -> Self {
        Self::with_sink(std::io::stdout())
    }

    /// Capture and echo to an arbitrary writer
    pub fn with_sink<W: Write + Send + 'static>(sink: W) -> Self {
        IOHandler {
            output: Vec::new(),
            echo: Some(Box::new(sink)),
        }
    }

    pub fn putc(&mut self, byte: u8) -> Result<(), Fault> {
        if let Some(sink) = self.echo.as_mut() {
            sink.write_all(&[byte])?;
            sink.flush()?;
        }
        self.output.push(byte);
        Ok(())
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }

    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }

    pub fn clear(&mut self) {
        self.output.clear();
    }
}

impl Default for IOHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IOHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IOHandler")
            .field("output", &String::from_utf8_lossy(&self.output))
            .field("echo", &self.echo.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_capture() {
        let mut io = IOHandler::new();
        io.putc(b'o').unwrap();
        io.putc(b'k').unwrap();
        assert_eq!(io.output(), b"ok");
        assert_eq!(io.take_output(), b"ok".to_vec());
        assert!(io.output().is_empty());
    }

    #[test]
    fn test_echo_to_sink() {
        let buf = SharedBuf::default();
        let mut io = IOHandler::with_sink(buf.clone());
        io.putc(b'A').unwrap();
        assert_eq!(*buf.0.lock().unwrap(), b"A".to_vec());
        assert_eq!(io.output(), b"A");
    }

    #[test]
    fn test_sink_failure() {
        let mut io = IOHandler::with_sink(Broken);
        assert!(matches!(io.putc(b'x'), Err(Fault::Output(_))));
        assert!(io.output().is_empty());
    }
}
