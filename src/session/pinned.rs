use crate::files::UploadedReference;

/// Uploaded files re-sent with every turn, most recent last.
#[derive(Debug, Clone)]
pub struct PinnedFiles {
    refs: Vec<UploadedReference>,
    capacity: usize,
}

impl PinnedFiles {
    pub fn new(capacity: usize) -> Self {
        Self {
            refs: Vec::new(),
            capacity,
        }
    }

    /// Pins `reference` unless a file with the same handle is already pinned.
    ///
    /// Returns whether it was added. The oldest entries are dropped past capacity.
    pub fn pin(&mut self, reference: UploadedReference) -> bool {
        if self.contains(reference.handle()) {
            return false;
        }
        self.refs.push(reference);
        let overflow = self.refs.len().saturating_sub(self.capacity);
        self.refs.drain(..overflow);
        true
    }

    pub fn contains(&self, handle: &str) -> bool {
        self.refs.iter().any(|r| r.handle() == handle)
    }

    pub fn clear(&mut self) {
        self.refs.clear();
    }

    pub fn as_slice(&self) -> &[UploadedReference] {
        &self.refs
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::RemoteFile;

    fn reference(id: usize) -> UploadedReference {
        let file = RemoteFile {
            name: format!("files/{id}"),
            uri: Some(format!("https://example.test/v1beta/files/{id}")),
            ..RemoteFile::default()
        };
        UploadedReference::new(file, "image/png", format!("{id}.png"))
    }

    #[test]
    fn dedupes_by_handle() {
        let mut pinned = PinnedFiles::new(6);
        assert!(pinned.pin(reference(1)));
        assert!(!pinned.pin(reference(1)));
        assert_eq!(pinned.len(), 1);
    }

    #[test]
    fn keeps_most_recent_within_capacity() {
        let mut pinned = PinnedFiles::new(6);
        for id in 0..8 {
            pinned.pin(reference(id));
        }

        let names: Vec<&str> = pinned.as_slice().iter().map(|r| r.name()).collect();
        assert_eq!(names, ["2.png", "3.png", "4.png", "5.png", "6.png", "7.png"]);
    }

    #[test]
    fn clear_empties() {
        let mut pinned = PinnedFiles::new(2);
        pinned.pin(reference(1));
        pinned.clear();
        assert!(pinned.is_empty());
    }
}
