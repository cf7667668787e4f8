mod flattened;
mod flattened_ref;
