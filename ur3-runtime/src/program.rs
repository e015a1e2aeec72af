use std::{collections::VecDeque, path::Path};

/// Queue of joint poses, base first, in radians.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program(VecDeque<[f32; 6]>);

impl Program {
    /// Load a program from a JSON array of six angle poses.
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let str = std::fs::read_to_string(path)?;

        str.parse()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[f32; 6]> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn next(&mut self) -> Option<[f32; 6]> {
        self.0.pop_front()
    }
}

impl std::str::FromStr for Program {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str::<Vec<[f32; 6]>>(s)?.into_iter().collect())
    }
}

impl FromIterator<[f32; 6]> for Program {
    fn from_iter<T: IntoIterator<Item = [f32; 6]>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_program() {
        let mut program: Program = "[[0, -1.5, 0, -1.5, 0, 0], [0.5, 0, 0, 0, 0, 1]]"
            .parse()
            .unwrap();

        assert_eq!(program.len(), 2);
        assert_eq!(program.next(), Some([0.0, -1.5, 0.0, -1.5, 0.0, 0.0]));
        assert_eq!(program.next(), Some([0.5, 0.0, 0.0, 0.0, 0.0, 1.0]));
        assert_eq!(program.next(), None);
        assert!(program.is_empty());
    }

    #[test]
    fn test_invalid_program() {
        assert!(matches!(
            "[[0, 1, 2]]".parse::<Program>(),
            Err(crate::Error::Program(_))
        ));
        assert!(matches!(
            Program::load("/nonexistent/program.json"),
            Err(crate::Error::Io(_))
        ));
    }

    #[test]
    fn test_from_iter() {
        let program: Program = (0..3).map(|i| [i as f32; 6]).collect();

        assert_eq!(program.iter().count(), 3);
        assert_eq!(program.iter().next(), Some(&[0.0; 6]));
    }
}
