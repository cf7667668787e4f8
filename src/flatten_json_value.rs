use {
    itertools::Itertools,
    std::{borrow::Cow, fmt},
    tap::{Pipe, Tap},
};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment<'a> {
    Idx(usize),
    Field(Cow<'a, str>),
}

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Idx(idx) => write!(f, "{idx}"),
            Segment::Field(cow) => f.write_str(cow),
        }
    }
}

impl<'a> Segment<'a> {
    /// Only canonical decimals (`"0"`, `"17"`, not `"01"` or `"+1"`) parse as indices,
    /// so that rendering a parsed segment gives back the original text.
    #[expect(clippy::should_implement_trait, reason = "this can never fail")]
    pub fn from_str(segment: &'a str) -> Segment<'a> {
        segment
            .parse::<usize>()
            .ok()
            .filter(|idx| idx.to_string() == segment)
            .map(Segment::Idx)
            .unwrap_or_else(|| segment.pipe(Cow::Borrowed).pipe(Segment::Field))
    }

    pub fn as_idx(&self) -> Option<usize> {
        match self {
            Segment::Idx(idx) => Some(*idx),
            Segment::Field(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FieldPath<'a>(Vec<Segment<'a>>);

impl<'a> FieldPath<'a> {
    /// Every piece between delimiters is kept, empty ones included.
    pub fn split(key: &'a str, delimiter: &str) -> Self {
        key.split(delimiter)
            .map(|segment| segment.pipe(Cow::Borrowed).pipe(Segment::Field))
            .collect::<Vec<_>>()
            .pipe(FieldPath)
    }

    pub fn join(&self, segment: Segment<'a>) -> Self {
        self.clone().tap_mut(|p| p.0.push(segment))
    }

    pub fn render(&self, delimiter: &str) -> String {
        self.0.iter().join(delimiter)
    }

    pub fn segments(&self) -> &[Segment<'a>] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub fn boxed_iter<'a, T, I>(iter: I) -> Box<dyn Iterator<Item = T> + 'a>
where
    T: 'a,
    I: Iterator<Item = T> + 'a,
{
    Box::new(iter)
}

pub mod flatten;
pub mod unflatten;
