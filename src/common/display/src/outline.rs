//! Depth-annotated outlines rendered with box-drawing rails.

use std::fmt;

/// Lines pushed in pre-order, each tagged with its nesting depth.
///
/// Depth `0` lines print flush left. Deeper lines get a `├─`/`└─` connector
/// chosen by looking ahead for a sibling at the same depth, and a `│` rail
/// for every ancestor that still has siblings below it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outline {
    lines: Vec<(usize, String)>,
}

impl Outline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line at `depth`. A depth more than one below the previous
    /// line is rendered as if the missing levels had no further siblings.
    pub fn push(&mut self, depth: usize, text: impl Into<String>) -> &mut Self {
        self.lines.push((depth, text.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn has_sibling_after(&self, index: usize) -> bool {
        let depth = self.lines[index].0;
        self.lines[index + 1..]
            .iter()
            .map(|(d, _)| *d)
            .take_while(|d| *d >= depth)
            .any(|d| d == depth)
    }
}

impl fmt::Display for Outline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // rails[k] is set while the latest line at depth k + 1 has a sibling pending.
        let mut rails: Vec<bool> = Vec::new();
        for (index, (depth, text)) in self.lines.iter().enumerate() {
            if *depth == 0 {
                rails.clear();
                writeln!(f, "{text}")?;
                continue;
            }
            rails.resize(depth - 1, false);
            for open in &rails {
                f.write_str(if *open { "│  " } else { "   " })?;
            }
            let more = self.has_sibling_after(index);
            writeln!(f, "{}{text}", if more { "├─ " } else { "└─ " })?;
            rails.push(more);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rails_follow_open_ancestors() {
        let mut outline = Outline::new();
        outline
            .push(0, "DataContainerArray")
            .push(1, "Image")
            .push(2, "CellData")
            .push(3, "RGB")
            .push(3, "Gray")
            .push(1, "Mesh")
            .push(2, "VertexData");

        let text = outline.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "DataContainerArray",
                "├─ Image",
                "│  └─ CellData",
                "│     ├─ RGB",
                "│     └─ Gray",
                "└─ Mesh",
                "   └─ VertexData",
            ]
        );
    }

    #[test]
    fn test_skipped_depth_and_empty() {
        assert_eq!(Outline::new().to_string(), "");

        let mut outline = Outline::new();
        outline.push(0, "root").push(2, "deep").push(1, "near");
        assert_eq!(outline.len(), 3);
        assert_eq!(outline.to_string(), "root\n   └─ deep\n└─ near\n");
    }
}
