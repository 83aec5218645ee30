/// Hands out temporary numbers. One generator lives for one compilation, so numbering
/// restarts at 1 for every new [`super::OperandPool`].
#[derive(Debug, Default)]
pub struct TempGenerator {
    index: usize,
}

impl TempGenerator {
    pub fn new() -> Self {
        Self { index: 0 }
    }

    /// Generates a new unique temporary number.
    pub fn next_temp(&mut self) -> usize {
        self.index += 1;
        self.index
    }

    /// The number of temporaries generated so far.
    pub fn count(&self) -> usize {
        self.index
    }
}
