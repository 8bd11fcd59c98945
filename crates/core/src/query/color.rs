/// Highlight palette, indexed by first-seen capture name position.
pub const PALETTE: [&str; 13] = [
    "#80cbc4", "#ffb757", "#e0b8ff", "#ff9492", "#56d364", "#a5d6ff", "#ffa198", "#d2a8ff",
    "#ff7b72", "#7ee787", "#ffa657", "#9ca3af", "#79c0ff",
];

/// Maps capture names to palette colors for one query run.
///
/// The first distinct name gets the first color, the second the next one,
/// and so on, wrapping around the palette.
#[derive(Debug, Clone, Default)]
pub struct ColorAssigner {
    names: Vec<String>,
}

impl ColorAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, name: &str) -> &'static str {
        let index = match self.names.iter().position(|n| n == name) {
            Some(index) => index,
            None => {
                self.names.push(name.to_string());
                self.names.len() - 1
            }
        };
        PALETTE[index % PALETTE.len()]
    }

    pub fn reset(&mut self) {
        self.names.clear();
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
