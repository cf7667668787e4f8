use {
    super::{FieldPath, Segment},
    crate::{
        error::{Error, Result, kind_of},
        options::{Conflict, MAX_NESTING, Options},
    },
    indexmap::{IndexMap, map::Entry},
    itertools::Itertools,
    serde_json::{Map, Value},
    std::borrow::Cow,
    tap::Pipe,
    tracing::{debug, instrument, trace},
};

/// Merge accumulator. Supplied objects stay [`Node::Leaf`] until a merge needs to look inside them.
#[derive(Debug)]
enum Node {
    Branch(Branch),
    Leaf(Value),
}

#[derive(Debug, Default)]
struct Branch {
    children: IndexMap<String, Node>,
    /// Set when a split key contributed to this container; only those may become arrays.
    from_path: bool,
}

impl Node {
    fn promote(self) -> Node {
        match self {
            Node::Leaf(Value::Object(map)) => Branch::supplied(map).pipe(Node::Branch),
            other => other,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Node::Branch(_) => "Value::Object",
            Node::Leaf(value) => kind_of(value),
        }
    }

    fn into_value(self, options: &Options) -> Value {
        match self {
            Node::Branch(branch) => branch.into_value(options),
            Node::Leaf(value) => value,
        }
    }
}

impl Branch {
    fn supplied(map: Map<String, Value>) -> Self {
        Self {
            children: map.into_iter().map(|(key, value)| (key, Node::Leaf(value))).collect(),
            from_path: false,
        }
    }

    fn single(key: String, node: Node) -> Self {
        Self {
            children: IndexMap::from([(key, node)]),
            from_path: true,
        }
    }

    fn absorb(&mut self, other: Branch, path: &FieldPath<'_>, options: &Options) -> Result<()> {
        self.from_path |= other.from_path;
        other
            .children
            .into_iter()
            .try_for_each(|(key, node)| match self.children.entry(key) {
                Entry::Occupied(mut slot) => {
                    let path = path.join(Segment::Field(Cow::Owned(slot.key().clone())));
                    merge(slot.get_mut(), node, &path, options)
                }
                Entry::Vacant(slot) => {
                    slot.insert(node);
                    Ok(())
                }
            })
    }

    fn into_object(self, options: &Options) -> Map<String, Value> {
        self.children
            .into_iter()
            .map(|(key, node)| (key, node.into_value(options)))
            .collect()
    }

    fn into_value(self, options: &Options) -> Value {
        let len = self.children.len();
        let indices = self
            .children
            .keys()
            .map(|key| Segment::from_str(key).as_idx().filter(|idx| *idx < len))
            .collect::<Option<Vec<_>>>()
            .filter(|_| options.rebuild_arrays && self.from_path && len > 0);
        match indices {
            Some(indices) => {
                trace!(len, "rebuilding array from index keys");
                indices
                    .into_iter()
                    .zip(self.children.into_values())
                    .sorted_by_key(|(idx, _)| *idx)
                    .map(|(_, node)| node.into_value(options))
                    .collect::<Vec<_>>()
                    .pipe(Value::Array)
            }
            None => self.into_object(options).pipe(Value::Object),
        }
    }
}

fn conflict(path: &FieldPath<'_>, existing: &Node, incoming: &Node, options: &Options) -> Error {
    Error::MergeConflict {
        path: path.render(&options.delimiter),
        existing: existing.kind(),
        incoming: incoming.kind(),
    }
}

/// Merges `incoming` into `slot`. Two containers merge field by field, a leaf shadows
/// any structure at or beneath its path, and of two leaves the one already present wins.
fn merge(slot: &mut Node, incoming: Node, path: &FieldPath<'_>, options: &Options) -> Result<()> {
    let existing = std::mem::replace(slot, Node::Leaf(Value::Null)).promote();
    *slot = match (existing, incoming.promote()) {
        (Node::Branch(mut existing), Node::Branch(incoming)) => {
            existing.absorb(incoming, path, options)?;
            Node::Branch(existing)
        }
        (Node::Leaf(existing), Node::Leaf(incoming)) if existing == incoming => Node::Leaf(existing),
        (existing @ Node::Leaf(_), incoming) => match options.on_conflict {
            Conflict::KeepLeaf => {
                debug!(path = %path.render(&options.delimiter), discarded = incoming.kind(), "keeping existing leaf");
                existing
            }
            Conflict::Fail => return Err(conflict(path, &existing, &incoming, options)),
        },
        (existing @ Node::Branch(_), incoming @ Node::Leaf(_)) => match options.on_conflict {
            Conflict::KeepLeaf => {
                debug!(path = %path.render(&options.delimiter), "leaf shadows nested entries");
                incoming
            }
            Conflict::Fail => return Err(conflict(path, &existing, &incoming, options)),
        },
    };
    Ok(())
}

/// `["a", "b"]` and `v` become `{"a": {"b": v}}`.
fn chain(path: &FieldPath<'_>, value: Value) -> Branch {
    let mut segments = path.segments().iter().rev().map(ToString::to_string);
    let innermost = Branch::single(segments.next().unwrap_or_default(), Node::Leaf(value));
    segments.fold(innermost, |branch, segment| Branch::single(segment, Node::Branch(branch)))
}

/// Rebuilds a nested object from a flat map whose keys are `options.delimiter` joined paths.
///
/// The result is always an object. Entries are merged without clobbering each other's
/// structure; see [`Conflict`] for what happens when a leaf collides with something.
#[instrument(skip_all, fields(entries = flat.len(), delimiter = %options.delimiter))]
pub fn unflattened(flat: Map<String, Value>, options: &Options) -> Result<Value> {
    options.validate()?;
    flat.into_iter()
        .try_fold(Branch::default(), |mut root, (key, value)| {
            let path = FieldPath::split(&key, &options.delimiter);
            if path.len() > MAX_NESTING {
                return Err(Error::TooDeep { limit: MAX_NESTING });
            }
            root.absorb(chain(&path, value), &FieldPath::default(), options)
                .map(|()| root)
        })
        .map(|root| root.into_object(options).pipe(Value::Object))
}

fn expanded(value: Value, depth: usize, options: &Options) -> Result<Value> {
    if depth > MAX_NESTING {
        return Err(Error::TooDeep { limit: MAX_NESTING });
    }
    match value {
        Value::Object(map) => map
            .into_iter()
            .map(|(key, value)| expanded(value, depth + 1, options).map(|value| (key, value)))
            .collect::<Result<Map<_, _>>>()
            .and_then(|flat| unflattened(flat, options)),
        Value::Array(values) => values
            .into_iter()
            .map(|value| expanded(value, depth + 1, options))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        scalar => Ok(scalar),
    }
}

/// Unflattens an arbitrary decoded value.
///
/// Objects nested inside the input may use flat keys too, and arrays (including an array
/// root) keep their elements in place, each element unflattened on its own.
#[instrument(skip_all)]
pub fn unflattened_value(value: Value, options: &Options) -> Result<Value> {
    options.validate()?;
    match value {
        value @ (Value::Object(_) | Value::Array(_)) => expanded(value, 0, options),
        other => {
            debug!("other=\n{other:#?}");
            Err(Error::UnsupportedTopLevelValue(kind_of(&other)))
        }
    }
}
