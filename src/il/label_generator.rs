use std::fmt::{self, Display, Formatter};

/// A jump destination that has not been emitted yet. Jumps to it are recorded against the
/// label and patched once the label is bound to a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ForwardLabel(usize);
impl ForwardLabel {
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    pub fn id(self) -> usize {
        self.0
    }
}
impl Display for ForwardLabel {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "F{}", self.0)
    }
}

#[derive(Debug, Default)]
pub struct LabelGenerator {
    index: usize,
}
impl LabelGenerator {
    pub fn new() -> Self {
        Self { index: 0 }
    }

    /// Generates a new unique label.
    pub fn next_label(&mut self) -> ForwardLabel {
        self.index += 1;
        ForwardLabel(self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_label_generates_ascending_labels() {
        let mut lbl_gen = LabelGenerator::new();

        assert_eq!("F1", lbl_gen.next_label().to_string());
        assert_eq!("F2", lbl_gen.next_label().to_string());
    }
}
