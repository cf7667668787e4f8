use {
    crate::{
        error::Result,
        flatten_json_value::{flatten, unflatten},
        options::Options,
    },
    serde_json::{Map, Value},
};

#[extension_traits::extension(pub trait ValueFlattenExt)]
impl Value {
    fn flattened(self, options: &Options) -> Result<Map<String, Value>> {
        flatten::flattened(self, options)
    }

    fn unflattened(self, options: &Options) -> Result<Value> {
        unflatten::unflattened_value(self, options)
    }
}

#[extension_traits::extension(pub trait FlatMapUnflattenExt)]
impl Map<String, Value> {
    fn unflattened(self, options: &Options) -> Result<Value> {
        unflatten::unflattened(self, options)
    }
}
