use {
    crate::{FlattenedRef, options::Options},
    serde::{Serialize, ser::SerializeMap},
};

impl<T> Serialize for FlattenedRef<'_, T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serde_json::to_value(self.0)
            .map_err(serde::ser::Error::custom)
            .and_then(|value| {
                crate::flatten_json_value::flatten::flattened(value, &Options::default())
                    .map_err(serde::ser::Error::custom)
            })
            .and_then(move |flat| {
                serializer
                    .serialize_map(Some(flat.len()))
                    .and_then(|mut serialize_map| {
                        flat.iter()
                            .try_for_each(|(k, v)| serialize_map.serialize_entry(k, v))
                            .and_then(|()| serialize_map.end())
                    })
            })
    }
}
