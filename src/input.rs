use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use crate::error::{AnalysisError, Result};

/// Compression detected from the first bytes of a source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Zstd,
}

impl Compression {
    /// Gzip starts with 1F 8B 08, zstd with 28 B5 2F FD.
    pub fn detect(head: &[u8]) -> Self {
        if head.len() >= 3 && head[..3] == [0x1F, 0x8B, 0x08] {
            Compression::Gzip
        } else if head.len() >= 4 && head[..4] == [0x28, 0xB5, 0x2F, 0xFD] {
            Compression::Zstd
        } else {
            Compression::None
        }
    }
}

/// An opened source, decompressing transparently when needed
pub struct Source {
    pub compression: Compression,
    /// Size of a regular file; `None` for pipes and other special files.
    pub size_on_disk: Option<u64>,
    pub reader: Box<dyn Read + Send>,
}

impl std::fmt::Debug for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Source")
            .field("compression", &self.compression)
            .field("size_on_disk", &self.size_on_disk)
            .finish_non_exhaustive()
    }
}

/// Open `path` for analysis, detecting gzip or zstd by magic bytes.
pub fn open_source(path: &Path) -> Result<Source> {
    let open_error = |source| AnalysisError::Open {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(open_error)?;
    let metadata = file.metadata().map_err(open_error)?;
    if metadata.is_dir() {
        return Err(open_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "is a directory",
        )));
    }

    let read_error = |source| AnalysisError::Read { offset: 0, source };
    let (compression, prefix) = sniff_magic(&mut file).map_err(read_error)?;
    let reader = wrap(compression, prefix, file).map_err(read_error)?;

    Ok(Source {
        compression,
        size_on_disk: metadata.is_file().then(|| metadata.len()),
        reader,
    })
}

/// Read up to four bytes of magic, retrying short reads.
fn sniff_magic<R: Read>(reader: &mut R) -> std::io::Result<(Compression, Vec<u8>)> {
    let mut head = [0u8; 4];
    let mut filled = 0;
    while filled < head.len() {
        match reader.read(&mut head[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok((Compression::detect(&head[..filled]), head[..filled].to_vec()))
}

/// Put the sniffed bytes back in front and decode as detected.
fn wrap<R: Read + Send + 'static>(
    compression: Compression,
    prefix: Vec<u8>,
    rest: R,
) -> std::io::Result<Box<dyn Read + Send>> {
    let chained = Cursor::new(prefix).chain(rest);
    Ok(match compression {
        Compression::Gzip => Box::new(MultiGzDecoder::new(chained)),
        Compression::Zstd => Box::new(zstd::Decoder::new(chained)?),
        Compression::None => Box::new(chained),
    })
}
