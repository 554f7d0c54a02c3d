use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

/// The file behind a path arg; `None` (or "-") selects stdio.
fn file_path(path: &Option<PathBuf>) -> Option<&Path> {
    path.as_deref().filter(|p| p.as_os_str() != "-")
}

/// Text input argument group.
#[derive(clap::Args, Debug)]
pub struct InputArgs {
    /// Input file, read line by line; "-" or absent reads stdin.
    #[arg(long, value_name = "PATH")]
    pub input: Option<PathBuf>,
}

impl InputArgs {
    /// Open a line reader over the input.
    pub fn open_reader(&self) -> Result<Box<dyn BufRead>, Box<dyn std::error::Error>> {
        Ok(match file_path(&self.input) {
            Some(path) => Box::new(BufReader::new(File::open(path)?)),
            None => Box::new(std::io::stdin().lock()),
        })
    }
}

/// Output argument group.
#[derive(clap::Args, Debug)]
pub struct OutputArgs {
    /// Output file; "-" or absent writes stdout.
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

impl OutputArgs {
    /// Open a buffered writer over the output.
    pub fn open_writer(&self) -> Result<Box<dyn Write>, Box<dyn std::error::Error>> {
        Ok(match file_path(&self.output) {
            Some(path) => Box::new(BufWriter::new(File::create(path)?)),
            None => Box::new(BufWriter::new(std::io::stdout().lock())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_path() {
        assert_eq!(file_path(&None), None);
        assert_eq!(file_path(&Some(PathBuf::from("-"))), None);
        assert_eq!(
            file_path(&Some(PathBuf::from("lines.txt"))),
            Some(Path::new("lines.txt"))
        );
    }
}
