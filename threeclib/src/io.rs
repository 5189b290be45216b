use std::fs::File;
use std::ops::Deref;
use log::warn;
use crate::error::SimError;

/// Gets the bytes of a trace file
///
/// On unix the file is memory mapped and the OS is told reads will be sequential. Elsewhere, or
/// if the mapping fails, the whole file is read into memory
pub fn get_trace_bytes(path: &str) -> Result<impl Deref<Target = [u8]>, SimError> {
    let io_error = |source| SimError::Io { path: path.to_string(), source };
    let file = File::open(path).map_err(io_error)?;
    #[cfg(unix)]
    {
        use memmap2::{Advice, Mmap};
        // Safety: the trace isn't expected to be modified while the simulator runs
        match unsafe { Mmap::map(&file) } {
            Ok(m) => {
                if let Err(e) = m.advise(Advice::Sequential) {
                    warn!("Failed to provide access advice to the OS, {e}");
                }
                return Ok(TraceBytes::Mapped(m));
            }
            Err(e) => warn!("Couldn't memory map {path}, reading it instead: {e}"),
        }
    }
    read_all(file).map(TraceBytes::Owned).map_err(io_error)
}

fn read_all(mut file: File) -> std::io::Result<Vec<u8>> {
    use std::io::Read;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)?;
    Ok(buf)
}

enum TraceBytes {
    #[cfg(unix)]
    Mapped(memmap2::Mmap),
    Owned(Vec<u8>),
}

impl Deref for TraceBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            #[cfg(unix)]
            TraceBytes::Mapped(m) => &m[..],
            TraceBytes::Owned(v) => &v[..],
        }
    }
}
