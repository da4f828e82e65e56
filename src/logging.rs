use env_logger::{ Builder, Env, Target };
use log::warn;
use std::fs::{ File, OpenOptions };
use std::io::{ self, Write };
use std::path::Path;

/// Writes every record to stdout and appends it to a log file.
struct TeeWriter<W: Write> {
    stdout: W,
    file: File,
}

impl<W: Write> Write for TeeWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stdout.write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()?;
        self.file.flush()
    }
}

/// Target that tees stdout into `log_file`, created if absent and appended
/// to otherwise.
fn open_target(log_file: &str) -> io::Result<Target> {
    let file = OpenOptions::new().create(true).append(true).open(Path::new(log_file))?;
    Ok(Target::Pipe(Box::new(TeeWriter { stdout: io::stdout(), file })))
}

/// `RUST_LOG` wins over `level` when set.
pub fn init(level: &str, log_file: &str) {
    let mut builder = Builder::from_env(Env::default().default_filter_or(level.to_lowercase()));

    let open_err = match open_target(log_file) {
        Ok(target) => {
            builder.target(target);
            None
        }
        Err(e) => Some(e),
    };

    builder.init();

    if let Some(e) = open_err {
        warn!("Could not open log file {}: {}. Logging to stdout only.", log_file, e);
    }
}
