pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Required fields not present: {}", fields.join(", "))]
    MissingFields { fields: Vec<String> },

    #[error("Field `{field}` has the wrong type: expected {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },

    #[error(
        "Fields source/target/value must be the same length (got {source_len}/{target_len}/{value_len})"
    )]
    RaggedColumns {
        source_len: usize,
        target_len: usize,
        value_len: usize,
    },
}
