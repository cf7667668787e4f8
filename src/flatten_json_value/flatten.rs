use {
    super::{FieldPath, Segment, boxed_iter},
    crate::{error::Result, options::Options},
    serde_json::{Map, Value},
    std::{borrow::Cow, iter::once},
    tap::Pipe,
    tracing::{instrument, trace},
};

/// Lazily walks `value` depth-first, yielding one `(path, leaf)` pair per flat entry.
///
/// Empty containers, safe-mode arrays and containers at the depth limit are yielded as leaves.
pub fn flattened_iter<'opts>(
    prefix: FieldPath<'static>,
    depth: usize,
    value: Value,
    options: &'opts Options,
) -> Box<dyn Iterator<Item = (FieldPath<'static>, Value)> + 'opts> {
    match value {
        Value::Object(map) if options.stops_at(depth) => {
            trace!(depth, "depth limit reached, keeping object as a leaf");
            once((prefix, Value::Object(map))).pipe(boxed_iter)
        }
        Value::Object(map) if map.is_empty() => once((prefix, Value::Object(map))).pipe(boxed_iter),
        Value::Object(map) => map
            .into_iter()
            .flat_map(move |(key, value)| {
                flattened_iter(prefix.join(Segment::Field(Cow::Owned(key))), depth + 1, value, options)
            })
            .pipe(boxed_iter),
        Value::Array(arr) if options.safe || arr.is_empty() => once((prefix, Value::Array(arr))).pipe(boxed_iter),
        Value::Array(arr) if depth >= crate::options::MAX_NESTING => {
            trace!(depth, "nesting ceiling reached, keeping array as a leaf");
            once((prefix, Value::Array(arr))).pipe(boxed_iter)
        }
        Value::Array(arr) => arr
            .into_iter()
            .enumerate()
            .flat_map(move |(idx, value)| flattened_iter(prefix.join(Segment::Idx(idx)), depth + 1, value, options))
            .pipe(boxed_iter),
        scalar => once((prefix, scalar)).pipe(boxed_iter),
    }
}

/// Flattens `value` into a single level map whose keys are `options.delimiter` joined paths.
///
/// A scalar root becomes `{"": scalar}`, an empty root container `{"": {}}` / `{"": []}`.
/// When two paths render to the same key (only possible with keys containing the delimiter)
/// the one visited last wins.
#[instrument(skip_all, fields(delimiter = %options.delimiter, safe = options.safe, max_depth = options.max_depth))]
pub fn flattened(value: Value, options: &Options) -> Result<Map<String, Value>> {
    options.validate()?;
    flattened_iter(FieldPath::default(), 0, value, options)
        .map(|(path, value)| (path.render(&options.delimiter), value))
        .collect::<Map<_, _>>()
        .pipe(Ok)
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::error::Error,
        serde_json::json,
        tap::Tap,
    };

    fn flat(value: Value, options: &Options) -> Value {
        flattened(value, options)
            .expect("valid options")
            .pipe(Value::Object)
    }

    #[test]
    fn test_flatten_simple() {
        let input = json!({
            "name": "John",
            "age": 30
        });

        let result = flattened(input, &Options::default()).unwrap();
        assert_eq!(result.get("name").unwrap(), &json!("John"));
        assert_eq!(result.get("age").unwrap(), &json!(30));
    }

    #[test]
    fn test_flatten_nested() {
        let input = json!({
            "user": {
                "name": "John",
                "address": {
                    "city": "NYC",
                    "zip": "10001"
                }
            },
            "active": true
        });

        let result = flattened(input, &Options::default()).unwrap();
        assert_eq!(
            (&result)
                .tap(|r| println!("{r:#?}"))
                .get("user.address.city")
                .unwrap(),
            &json!("NYC")
        );
        assert_eq!(result.get("user.address.zip").unwrap(), &json!("10001"));
        assert_eq!(result.get("user.name").unwrap(), &json!("John"));
        assert_eq!(result.get("active").unwrap(), &json!(true));
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn test_flatten_arrays_use_index_segments() {
        assert_eq!(
            flat(json!({"a": [{"b": 1}, 2, [true]]}), &Options::default()),
            json!({"a.0.b": 1, "a.1": 2, "a.2.0": true})
        );
    }

    #[test]
    fn test_empty_containers_are_kept() {
        assert_eq!(flat(json!({"a": {}}), &Options::default()), json!({"a": {}}));
        assert_eq!(flat(json!({"a": []}), &Options::default()), json!({"a": []}));
        assert_eq!(
            flat(json!({"a": {"b": [], "c": {"d": {}}}}), &Options::default()),
            json!({"a.b": [], "a.c.d": {}})
        );
    }

    #[test]
    fn test_root_edge_cases() {
        assert_eq!(flat(json!("bare"), &Options::default()), json!({"": "bare"}));
        assert_eq!(flat(json!({}), &Options::default()), json!({"": {}}));
        assert_eq!(flat(json!([]), &Options::default()), json!({"": []}));
        assert_eq!(flat(json!([1, 2]), &Options::default()), json!({"0": 1, "1": 2}));
    }

    #[test]
    fn test_empty_keys_keep_their_segment() {
        assert_eq!(
            flat(json!({"": {"x": 1}, "a": {"": 2}}), &Options::default()),
            json!({".x": 1, "a.": 2})
        );
    }

    #[test]
    fn test_max_depth_stops_descending() {
        let options = Options::default().max_depth(2);
        assert_eq!(
            flat(json!({"a": {"b": {"c": 1}}}), &options),
            json!({"a.b": {"c": 1}})
        );
        assert_eq!(
            flat(json!({"a": [{"b": {"c": 1}}]}), &options),
            json!({"a.0": {"b": {"c": 1}}})
        );
        assert_eq!(
            flat(json!({"a": {"b": {"c": 1}}}), &Options::default().max_depth(1)),
            json!({"a": {"b": {"c": 1}}})
        );
    }

    #[test]
    fn test_safe_keeps_arrays_whole() {
        let options = Options::default().safe(true);
        assert_eq!(flat(json!({"a": [1, 2]}), &options), json!({"a": [1, 2]}));
        assert_eq!(
            flat(json!({"a": {"b": [{"c": 1}]}}), &options),
            json!({"a.b": [{"c": 1}]})
        );
    }

    #[test]
    fn test_custom_delimiter() {
        assert_eq!(
            flat(
                json!({"hello": {"world": {"again": "good morning"}}}),
                &Options::default().with_delimiter(" ")
            ),
            json!({"hello world again": "good morning"})
        );
    }

    #[test]
    fn test_colliding_paths_last_write_wins() {
        assert_eq!(
            flat(json!({"a.b": 1, "a": {"b": 2}}), &Options::default()),
            json!({"a.b": 2})
        );
    }

    #[test]
    fn test_nesting_ceiling_applies_without_max_depth() {
        let deep = (0..crate::options::MAX_NESTING + 10).fold(json!(1), |inner, _| json!({"k": inner}));
        let result = flattened(deep, &Options::default()).unwrap();
        assert_eq!(result.len(), 1);
        let (key, value) = result.iter().next().unwrap();
        assert_eq!(key.split('.').count(), crate::options::MAX_NESTING);
        assert!(value.is_object());
    }

    #[test]
    fn test_empty_delimiter_is_rejected() {
        assert_eq!(
            flattened(json!({"a": 1}), &Options::default().with_delimiter("")),
            Err(Error::InvalidConfiguration("delimiter must not be empty"))
        );
    }
}
