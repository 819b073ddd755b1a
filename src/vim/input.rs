use zeroize::Zeroize;

/// Single-line text field with a character cursor.
///
/// Content is stored as chars so cursor arithmetic never lands inside a
/// multi-byte sequence. Masked buffers hold secrets and are wiped on drop.
#[derive(Default, Clone)]
pub struct InputBuffer {
    chars: Vec<char>,
    cursor: usize,
    masked: bool,
    limit: Option<usize>,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn masked() -> Self {
        let mut buf = Self::default();
        buf.masked = true;
        buf
    }

    /// Cap the number of characters accepted by `insert`
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn content(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn display(&self, mask_char: char) -> String {
        if self.masked {
            mask_char.to_string().repeat(self.len())
        } else {
            self.content()
        }
    }

    pub fn insert(&mut self, c: char) {
        if self.limit.is_some_and(|limit| self.chars.len() >= limit) {
            return;
        }
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
    }

    pub fn delete_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.chars.remove(self.cursor);
        true
    }

    pub fn delete_forward(&mut self) -> bool {
        if self.cursor >= self.chars.len() {
            return false;
        }
        self.chars.remove(self.cursor);
        true
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.chars.len() {
            self.cursor += 1;
        }
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.chars.len();
    }

    pub fn clear(&mut self) {
        self.chars.zeroize();
        self.chars.clear();
        self.cursor = 0;
    }
}

impl Drop for InputBuffer {
    fn drop(&mut self) {
        if self.masked {
            self.chars.zeroize();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> InputBuffer {
        let mut buf = InputBuffer::new();
        text.chars().for_each(|c| buf.insert(c));
        buf
    }

    #[test]
    fn edits_at_cursor() {
        let mut buf = typed("acd");
        buf.move_start();
        buf.move_right();
        buf.insert('b');
        assert_eq!(buf.content(), "abcd");
        assert_eq!(buf.cursor(), 2);

        assert!(buf.delete_back());
        assert!(buf.delete_forward());
        assert_eq!(buf.content(), "ad");

        buf.move_end();
        assert!(!buf.delete_forward());
    }

    #[test]
    fn limit_rejects_overflow() {
        let mut buf = InputBuffer::new().with_limit(3);
        "abcdef".chars().for_each(|c| buf.insert(c));
        assert_eq!(buf.content(), "abc");
    }

    #[test]
    fn masked_display_hides_content() {
        let mut buf = InputBuffer::masked();
        "s3cr\u{e9}t".chars().for_each(|c| buf.insert(c));
        assert_eq!(buf.display('*'), "******");
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.cursor(), 0);
    }
}
