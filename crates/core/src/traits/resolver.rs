/// Maps an interrupt vector index to its symbolic name
pub trait VectorResolver {
    fn name(&self) -> &'static str;
    /// Canonical name for `vector_index`, or a synthesized placeholder
    fn resolve(&self, vector_index: u32) -> String;
}
