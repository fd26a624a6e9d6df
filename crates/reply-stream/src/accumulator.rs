/// Model text rebuilt from stream events. One per generation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StreamAccumulator {
    text: String,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, delta: &str) {
        self.text.push_str(delta);
    }

    pub fn replace(&mut self, snapshot: &str) {
        self.text.clear();
        self.text.push_str(snapshot);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
