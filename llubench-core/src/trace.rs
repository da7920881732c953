//! ## llubench-core::trace
//! **Allocation and access address streams**
//!
//! Two append-only streams: one line per allocated element and one line per
//! visited element (traversal and tail search). Each line is the element
//! address as `0x` followed by lowercase hex digits.
//!
//! The benchmark code is generic over [`TraceSink`], so with [`NullTrace`]
//! the recording calls compile away and the measured loop does no extra work.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// File name of the allocation stream inside the trace directory.
pub const ALLOC_TRACE_FILE: &str = "ptr_alloca_file";
/// File name of the access stream inside the trace directory.
pub const ACCESS_TRACE_FILE: &str = "ptr_access_file";

/// Destination for recorded element addresses.
pub trait TraceSink {
    /// Records an address returned by the allocator.
    fn record_alloc(&mut self, addr: usize) -> io::Result<()>;

    /// Records an address visited during traversal or tail search.
    fn record_access(&mut self, addr: usize) -> io::Result<()>;

    /// Pushes buffered records to their destination.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: TraceSink + ?Sized> TraceSink for &mut T {
    #[inline]
    fn record_alloc(&mut self, addr: usize) -> io::Result<()> {
        (**self).record_alloc(addr)
    }

    #[inline]
    fn record_access(&mut self, addr: usize) -> io::Result<()> {
        (**self).record_access(addr)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Discards everything. Used when tracing is off.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTrace;

impl TraceSink for NullTrace {
    #[inline(always)]
    fn record_alloc(&mut self, _addr: usize) -> io::Result<()> {
        Ok(())
    }

    #[inline(always)]
    fn record_access(&mut self, _addr: usize) -> io::Result<()> {
        Ok(())
    }
}

/// Keeps both streams in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryTrace {
    allocations: Vec<usize>,
    accesses: Vec<usize>,
}

impl MemoryTrace {
    pub fn allocations(&self) -> &[usize] {
        &self.allocations
    }

    pub fn accesses(&self) -> &[usize] {
        &self.accesses
    }
}

impl TraceSink for MemoryTrace {
    fn record_alloc(&mut self, addr: usize) -> io::Result<()> {
        self.allocations.push(addr);
        Ok(())
    }

    fn record_access(&mut self, addr: usize) -> io::Result<()> {
        self.accesses.push(addr);
        Ok(())
    }
}

/// Writes both streams to text files.
///
/// The writers are buffered. [`FileTrace::finish`] flushes them and reports
/// errors; if the trace is dropped on an error path instead, `BufWriter`
/// still flushes what it holds.
pub struct FileTrace {
    alloc_path: PathBuf,
    access_path: PathBuf,
    alloc: BufWriter<File>,
    access: BufWriter<File>,
}

impl FileTrace {
    /// Creates (truncating) `ptr_alloca_file` and `ptr_access_file` in `dir`.
    pub fn create<P: AsRef<Path>>(dir: P) -> io::Result<Self> {
        let dir = dir.as_ref();
        let alloc_path = dir.join(ALLOC_TRACE_FILE);
        let access_path = dir.join(ACCESS_TRACE_FILE);
        let alloc = BufWriter::new(File::create(&alloc_path)?);
        let access = BufWriter::new(File::create(&access_path)?);
        Ok(Self {
            alloc_path,
            access_path,
            alloc,
            access,
        })
    }

    pub fn alloc_path(&self) -> &Path {
        &self.alloc_path
    }

    pub fn access_path(&self) -> &Path {
        &self.access_path
    }

    /// Flushes both streams and closes the files.
    pub fn finish(mut self) -> io::Result<()> {
        TraceSink::flush(&mut self)
    }
}

impl TraceSink for FileTrace {
    fn record_alloc(&mut self, addr: usize) -> io::Result<()> {
        writeln!(self.alloc, "{addr:#x}")
    }

    fn record_access(&mut self, addr: usize) -> io::Result<()> {
        writeln!(self.access, "{addr:#x}")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.alloc.flush()?;
        self.access.flush()
    }
}

/// Parses one trace line back into an address.
pub fn parse_address(line: &str) -> Option<usize> {
    let digits = line.trim().strip_prefix("0x")?;
    usize::from_str_radix(digits, 16).ok()
}
