use crate::error::Error;

/// A decoded background image plus whatever the renderer keeps for it
/// (a texture on the GPU side, `()` in tests).
#[derive(Clone, Debug)]
pub struct SourceImage<T> {
    /// Width / height.
    pub aspect: f32,
    pub payload: T,
}

#[derive(Clone, Debug)]
enum Slot<T> {
    Pending,
    Loaded(SourceImage<T>),
    Failed,
}

/// Background images in the order the host listed them.
///
/// Images arrive asynchronously; a slot that fails to load is skipped for the
/// rest of the session. The first image to arrive becomes current. While a
/// wash runs, `next` names the incoming image.
#[derive(Clone, Debug)]
pub struct ImageSet<T> {
    slots: Vec<Slot<T>>,
    current: Option<usize>,
    next: Option<usize>,
}

impl<T> ImageSet<T> {
    pub fn with_slots(count: usize) -> Self {
        Self {
            slots: (0..count).map(|_| Slot::Pending).collect(),
            current: None,
            next: None,
        }
    }

    /// Store a decoded image. Degenerate dimensions count as a failed load.
    pub fn insert(&mut self, slot: usize, width: u32, height: u32, payload: T) -> Result<(), Error> {
        let Some(entry) = self.slots.get_mut(slot) else {
            return Err(Error::AssetDecode {
                slot,
                reason: "no such slot".into(),
            });
        };
        if width == 0 || height == 0 {
            *entry = Slot::Failed;
            return Err(Error::AssetDecode {
                slot,
                reason: format!("degenerate size {width}x{height}"),
            });
        }
        *entry = Slot::Loaded(SourceImage {
            aspect: width as f32 / height as f32,
            payload,
        });
        if self.current.is_none() {
            self.current = Some(slot);
        }
        Ok(())
    }

    pub fn mark_failed(&mut self, slot: usize) {
        if let Some(entry) = self.slots.get_mut(slot) {
            if matches!(entry, Slot::Pending) {
                *entry = Slot::Failed;
            }
        }
    }

    pub fn loaded_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Slot::Loaded(_)))
            .count()
    }

    /// True once every slot has either loaded or failed and none loaded: the
    /// source stage stays on its procedural pattern for good.
    pub fn all_failed(&self) -> bool {
        self.slots.iter().all(|s| matches!(s, Slot::Failed))
    }

    pub fn can_wash(&self) -> bool {
        self.loaded_count() >= 2 && self.current.is_some()
    }

    pub fn get(&self, slot: usize) -> Option<&SourceImage<T>> {
        match self.slots.get(slot) {
            Some(Slot::Loaded(img)) => Some(img),
            _ => None,
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn next_index(&self) -> Option<usize> {
        self.next
    }

    pub fn current(&self) -> Option<&SourceImage<T>> {
        self.current.and_then(|i| self.get(i))
    }

    pub fn next(&self) -> Option<&SourceImage<T>> {
        self.next.and_then(|i| self.get(i))
    }

    /// Pick the next loaded image after the current one, wrapping around.
    pub fn begin_crossfade(&mut self) -> Option<usize> {
        let current = self.current?;
        let n = self.slots.len();
        let next = (1..n)
            .map(|k| (current + k) % n)
            .find(|&i| matches!(self.slots[i], Slot::Loaded(_)))?;
        self.next = Some(next);
        Some(next)
    }

    /// Make the incoming image current. Returns the new current slot.
    pub fn complete_crossfade(&mut self) -> Option<usize> {
        if let Some(next) = self.next.take() {
            self.current = Some(next);
        }
        self.current
    }
}
