use winnow::Bytes;

/// Complete input, running out of bytes is an error rather than a request for more
pub type Stream<'i> = &'i Bytes;

pub fn new(b: &[u8]) -> Stream<'_> {
    Bytes::new(b)
}

/// Number of bytes consumed from `start` to reach `current`
pub fn offset(start: &[u8], current: Stream<'_>) -> usize {
    start.len() - current.len()
}
