use slice_deque::SliceDeque;
use std::io;

type ByteDeque = SliceDeque<u8>;

const BUF_SIZE_INCREMENT: usize = 65536;

/// A dynamically sized, double-ended, buffered FIFO byte queue. Data is
/// appended at the tail and consumed from the head. Used by the reliable
/// channel to coalesce partial socket reads/writes into whole frames.
pub struct Buffer {
    data: ByteDeque,
    size: usize,
}

impl Buffer {
    #[inline]
    pub fn new(size: usize) -> Buffer {
        if size % BUF_SIZE_INCREMENT != 0 {
            panic!(
                "Buffer size must be divisible by {}, got {}",
                BUF_SIZE_INCREMENT, size
            );
        }

        let mut data = ByteDeque::new();
        data.reserve(size);
        Buffer { data, size }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn free_capacity(&self) -> usize {
        self.data.capacity() - self.data.len()
    }

    #[inline]
    pub fn move_head(&mut self, count: usize) {
        unsafe { self.data.move_head(count as isize) }
    }

    #[inline]
    pub fn move_tail(&mut self, count: usize) {
        unsafe { self.data.move_tail(count as isize) }
    }

    /// Slice containing the first `count` unread bytes and advances the head past them.
    #[inline]
    pub fn take(&mut self, count: usize) -> Vec<u8> {
        let out = self.data[..count].to_vec();
        self.move_head(count);
        out
    }

    #[inline]
    pub fn read_slice(&self) -> &[u8] {
        self.data.as_slice()
    }

    #[inline]
    pub fn clear(&mut self) {
        let len = self.len();
        self.move_head(len);
    }

    /// Keeps reading from `reader` until at least `count` bytes are buffered.
    /// Blocks on the underlying reader exactly as long as it does. A zero-byte
    /// read means the peer closed the connection mid-frame.
    pub fn fill_at_least<R: io::Read>(&mut self, count: usize, mut reader: R) -> io::Result<()> {
        if count > self.size {
            return Err(io::Error::new(io::ErrorKind::Other, "Buffer overrun"));
        }

        while self.data.len() < count {
            let read_count = unsafe { reader.read(self.data.tail_head_slice())? };

            if read_count == 0 {
                return Err(io::ErrorKind::UnexpectedEof.into());
            }

            self.move_tail(read_count);
        }

        Ok(())
    }

    /// Appends bytes to the tail, growing egress payload before a flush.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.data.extend(bytes);
    }

    /// Writes the buffered contents to `writer`, advancing the head, looping
    /// until every byte has been accepted by the writer.
    #[inline]
    pub fn egress<W: io::Write>(&mut self, mut writer: W) -> io::Result<usize> {
        let orig_len = self.data.len();

        while self.data.len() > 0 {
            let write_count = writer.write(&self.data)?;

            if write_count == 0 {
                return Err(io::ErrorKind::WriteZero.into());
            }

            self.move_head(write_count);
        }

        Ok(orig_len - self.data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::min;

    struct MockChannel {
        data: Vec<u8>,
        cursor: usize,
        chunk: usize,
    }

    impl MockChannel {
        fn new(data: Vec<u8>, chunk: usize) -> MockChannel {
            MockChannel { data, cursor: 0, chunk }
        }
    }

    impl io::Read for MockChannel {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let offset = min(min(self.chunk, buf.len()), self.data.len() - self.cursor);
            buf[..offset].copy_from_slice(&self.data[self.cursor..self.cursor + offset]);
            self.cursor += offset;
            Ok(offset)
        }
    }

    #[test]
    fn test_fill_at_least_accumulates_partial_reads() {
        let mock_data: Vec<u8> = (0..1000).map(|i| i as u8).collect();
        let mut channel = MockChannel::new(mock_data.clone(), 37);
        let mut buffer = Buffer::new(BUF_SIZE_INCREMENT);

        buffer.fill_at_least(1000, &mut channel).unwrap();

        assert_eq!(buffer.len(), 1000);
        assert_eq!(buffer.take(1000), mock_data);
    }

    #[test]
    fn test_fill_at_least_eof_mid_frame() {
        let mut channel = MockChannel::new(vec![1, 2, 3], 37);
        let mut buffer = Buffer::new(BUF_SIZE_INCREMENT);

        let err = buffer.fill_at_least(10, &mut channel).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_egress_error_on_zero_write() {
        let mut zero_vec: Vec<u8> = vec![];
        let mut buffer = Buffer::new(BUF_SIZE_INCREMENT);
        buffer.extend(&[1]);

        let result = buffer.egress(&mut zero_vec[..]);

        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::WriteZero);
    }

    #[test]
    fn test_egress_roundtrip() {
        let mut buffer = Buffer::new(BUF_SIZE_INCREMENT);
        buffer.extend(&[1, 2, 3, 4]);
        let mut out = Vec::new();
        let count = buffer.egress(&mut out).unwrap();
        assert_eq!(count, 4);
        assert_eq!(out, vec![1, 2, 3, 4]);
        assert!(buffer.is_empty());
    }

    #[test]
    #[should_panic(expected = "Buffer size must be divisible by 65536, got 100000")]
    fn test_fail_on_incorrect_increment() {
        let _ = Buffer::new(100000);
    }
}
