use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use crate::errors::Result;

/// Text persistence of a trained model.
pub trait Model: Sized {
    fn write<W: Write>(&self, w: &mut W) -> Result<()>;

    fn read<R: BufRead>(r: R) -> Result<Self>;

    fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut w = BufWriter::new(File::create(path)?);
        self.write(&mut w)?;
        w.flush()?;
        log::info!("wrote model to {}", path.display());
        Ok(())
    }

    fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let model = Self::read(BufReader::new(File::open(path)?))?;
        log::info!("loaded model from {}", path.display());
        Ok(model)
    }
}

/// Parses an integer field of a model file.
pub(crate) fn parse_int<T: std::str::FromStr>(s: &str, line: usize) -> Result<T> {
    s.trim()
        .parse()
        .map_err(|_| crate::Error::invalid_model(line, format!("not an integer: {s:?}")))
}
