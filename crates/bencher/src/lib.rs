/// A named wire capture used as benchmark input.
#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    file: TestFile,
    read_size: ReadSize,
}

impl TestCase {
    pub fn new(name: &'static str, file: TestFile, read_size: ReadSize) -> Self {
        Self { name, file, read_size }
    }

    /// The whole capture is available in a single read.
    pub fn whole(name: &'static str, file: TestFile) -> Self {
        Self::new(name, file, ReadSize::Whole)
    }

    /// The capture arrives `size` bytes at a time.
    pub fn chunked(name: &'static str, file: TestFile, size: usize) -> Self {
        Self::new(name, file, ReadSize::Chunk(size))
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn file(&self) -> &TestFile {
        &self.file
    }

    /// Splits the capture the way a connection would deliver it.
    pub fn reads(&self) -> Vec<&'static [u8]> {
        let content = self.file.content().as_bytes();
        match self.read_size {
            ReadSize::Whole => vec![content],
            ReadSize::Chunk(size) => content.chunks(size.max(1)).collect(),
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct TestFile {
    file_name: &'static str,
    content: &'static str,
}

impl TestFile {
    pub const fn new(file_name: &'static str, content: &'static str) -> Self {
        Self { file_name, content }
    }

    pub fn content(&self) -> &'static str {
        self.content
    }

    pub fn file_name(&self) -> &'static str {
        self.file_name
    }
}

#[derive(Clone, Copy, Debug)]
pub enum ReadSize {
    Whole,
    Chunk(usize),
}
