use image::RgbaImage;

/// Full-frame snapshots taken before each edit, most recent last.
#[derive(Debug, Default, Clone)]
pub struct HistoryStack {
    snapshots: Vec<RgbaImage>,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, snapshot: RgbaImage) {
        self.snapshots.push(snapshot);
    }

    /// Most recent snapshot, or `None` when there is nothing to undo.
    pub fn pop(&mut self) -> Option<RgbaImage> {
        self.snapshots.pop()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(value: u8) -> RgbaImage {
        RgbaImage::from_pixel(4, 4, Rgba([value, value, value, 255]))
    }

    #[test]
    fn pop_returns_snapshots_in_reverse_push_order() {
        let mut history = HistoryStack::new();
        history.push(solid(1));
        history.push(solid(2));
        assert_eq!(history.len(), 2);

        assert_eq!(history.pop().expect("second snapshot"), solid(2));
        assert_eq!(history.pop().expect("first snapshot"), solid(1));
        assert!(history.is_empty());
    }

    #[test]
    fn pop_on_empty_stack_is_none() {
        let mut history = HistoryStack::new();
        assert!(history.pop().is_none());
        assert!(history.is_empty());
    }

    #[test]
    fn clear_drops_every_snapshot() {
        let mut history = HistoryStack::new();
        history.push(solid(1));
        history.push(solid(2));
        history.clear();
        assert_eq!(history.len(), 0);
        assert!(history.pop().is_none());
    }
}
