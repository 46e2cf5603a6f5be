use std::{fs, io::ErrorKind, path::PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};
use twenty48_engine::BestScoreSink;

/// Best score kept as a single decimal integer in a text file.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: PathBuf) -> Self {
        FileSink { path }
    }

    fn read(&self) -> Result<u64> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        text.trim()
            .parse()
            .with_context(|| format!("parsing best score in {}", self.path.display()))
    }

    fn write(&self, best: u64) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        }
        fs::write(&self.path, format!("{best}\n"))
            .with_context(|| format!("writing {}", self.path.display()))
    }
}

impl BestScoreSink for FileSink {
    fn load(&mut self) -> u64 {
        match self.read() {
            Ok(best) => best,
            Err(e) => {
                let missing = e
                    .downcast_ref::<std::io::Error>()
                    .is_some_and(|io| io.kind() == ErrorKind::NotFound);
                if missing {
                    debug!("no best score at {} yet", self.path.display());
                } else {
                    warn!("{e:#}");
                }
                0
            }
        }
    }

    fn store(&mut self, best: u64) {
        if let Err(e) = self.write(best) {
            warn!("{e:#}");
        }
    }
}

#[cfg(test)]
mod test {
    use std::{env, fs, process};

    use twenty48_engine::BestScoreSink;

    use super::FileSink;

    #[test]
    fn stores_and_loads_a_single_integer() {
        let dir = env::temp_dir().join(format!("twenty48-cli-{}", process::id()));
        let path = dir.join("best");
        let mut sink = FileSink::new(path.clone());
        assert_eq!(sink.load(), 0);

        sink.store(4096);
        assert_eq!(fs::read_to_string(&path).unwrap(), "4096\n");
        assert_eq!(FileSink::new(path.clone()).load(), 4096);

        fs::write(&path, "not a number").unwrap();
        assert_eq!(sink.load(), 0);

        fs::remove_dir_all(dir).unwrap();
    }
}
