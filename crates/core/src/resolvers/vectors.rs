use std::collections::HashMap;

use crate::consts::ATMEGA32U4_VECTORS;
use crate::traits::VectorResolver;

pub struct VectorTable {
    vector_map: HashMap<u32, String>,
}

impl VectorTable {
    /// ATmega32U4 vector table
    pub fn new() -> Self {
        Self::from_entries(ATMEGA32U4_VECTORS.iter().map(|(idx, name)| (*idx, *name)))
    }

    /// Builds a table for another part from `(index, name)` pairs. Later
    /// entries win on duplicate indices.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (u32, S)>,
        S: Into<String>,
    {
        let vector_map = entries
            .into_iter()
            .map(|(idx, name)| (idx, name.into()))
            .collect();

        Self { vector_map }
    }

    /// Get the name of a vector by its index
    pub fn get_vector_name(&self, vector_index: u32) -> Option<&str> {
        self.vector_map.get(&vector_index).map(String::as_str)
    }
}

impl Default for VectorTable {
    fn default() -> Self {
        Self::new()
    }
}

impl VectorResolver for VectorTable {
    fn name(&self) -> &'static str {
        "vector_table"
    }

    fn resolve(&self, vector_index: u32) -> String {
        match self.get_vector_name(vector_index) {
            Some(name) => name.to_string(),
            None => format!("VECTOR_{}_vect", vector_index),
        }
    }
}
